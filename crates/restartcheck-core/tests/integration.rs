//! Integration tests for restartcheck-core.
//!
//! These tests drive the full restart pipeline:
//! samples → restart matrix → sanity check → estimator battery → validation.

use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use restartcheck_core::{
    DataClass, EstimatorKind, Orientation, RestartConfig, RestartError, RestartMatrix, SampleSet,
    binomial_tail, run_orientation, run_restart_test, run_restart_test_file, sanity_check,
    transpose,
};
use statrs::distribution::{Binomial, DiscreteCDF};

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn uniform_symbols(n: usize, alphabet_size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| rng.random_range(0..alphabet_size) as u8)
        .collect()
}

/// Row `i`, column `j` is 1 when `(i + j) mod n < ones`: every row and every
/// column holds exactly `ones` ones.
fn circulant_bits(n: usize, ones: usize) -> Vec<u8> {
    (0..n * n)
        .map(|k| {
            let (i, j) = (k / n, k % n);
            u8::from((i + j) % n < ones)
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn most_common_value_never_exceeds_word_size() {
    let mut rng = StdRng::seed_from_u64(0xA11CE);
    for alphabet_size in [2usize, 3, 5, 16, 17, 100, 255, 256] {
        let word_size = (alphabet_size as f64).log2().ceil().max(1.0) as u8;
        let data: Vec<u8> = (0..5000)
            .map(|_| rng.random_range(0..alphabet_size) as u8)
            .collect();
        let result = run_orientation(
            &data,
            alphabet_size,
            word_size,
            Orientation::Rows,
            &[EstimatorKind::MostCommonValue],
        );
        let h = result.records[0].estimate.value().unwrap();
        assert!(
            h <= f64::from(word_size),
            "a={alphabet_size} w={word_size}: {h}"
        );
    }
}

#[test]
fn reshaping_is_an_involution() {
    let n = 1000;
    let data = uniform_symbols(n * n, 256, 1);
    let matrix = RestartMatrix::new(data.clone(), n, n).unwrap();
    let back = transpose(matrix.column_buffer(), n, n);
    assert_eq!(back, data);
}

#[test]
fn tail_is_monotone_in_threshold() {
    let p = 2f64.powf(-0.5);
    let tails: Vec<f64> = (0..=1001).map(|x| binomial_tail(1000, p, x)).collect();
    assert!(tails.iter().all(|t| (0.0..=1.0).contains(t)));
    assert!(tails.windows(2).all(|w| w[1] <= w[0] + 1e-10));
}

// ═══════════════════════════════════════════════════════════════════════════════
// End-to-end scenarios
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn uniform_bits_iid_validate_near_one_bit() {
    let samples = SampleSet::from_symbols(uniform_symbols(1_000_000, 2, 2024), 2, 1).unwrap();
    let config = RestartConfig::new(1, 1.0, DataClass::Iid);
    let report = run_restart_test(samples, &config).unwrap();

    assert!(report.sanity.passed);
    assert!(report.mode_counts.rows > 500 && report.mode_counts.rows < 600);
    assert!(report.mode_counts.columns > 500 && report.mode_counts.columns < 600);
    assert_eq!(report.estimates.len(), 2);

    let v = report.validation;
    assert!(v.h_row > 0.99 && v.h_row <= 1.0, "H_r = {}", v.h_row);
    assert!(v.h_column > 0.99 && v.h_column <= 1.0, "H_c = {}", v.h_column);
    assert!(v.accepted);
    let bound = v.certified_bound.unwrap();
    assert!(bound > 0.99 && bound <= 1.0);
}

#[test]
fn constant_data_with_two_symbol_alphabet_fails_validation() {
    // Sanity passes only for a tiny claim: p^1000 >= 5e-6 needs H_I < ~0.0176.
    let samples = SampleSet::from_symbols(vec![0u8; 1_000_000], 2, 1).unwrap();
    let config = RestartConfig::new(1, 0.01, DataClass::Iid);
    let report = run_restart_test(samples, &config).unwrap();

    assert_eq!(report.mode_counts.rows, 1000);
    assert_eq!(report.validation.h_row, 0.0);
    assert_eq!(report.validation.h_column, 0.0);
    assert!(!report.validation.accepted);
    assert_eq!(report.validation.certified_bound, None);
}

#[test]
fn constant_data_with_real_claim_fails_sanity() {
    let samples = SampleSet::from_symbols(vec![0u8; 1_000_000], 2, 1).unwrap();
    let config = RestartConfig::new(1, 0.5, DataClass::NonIid);
    match run_restart_test(samples, &config) {
        Err(RestartError::SanityCheckFailed {
            x_max,
            alpha,
            tail_probability,
        }) => {
            assert_eq!(x_max, 1000);
            assert!((alpha - 5e-6).abs() < 1e-18);
            assert!(tail_probability < alpha);
        }
        other => panic!("expected sanity failure, got {other:?}"),
    }
}

#[test]
fn sanity_tail_matches_reference_at_520() {
    let matrix = RestartMatrix::new(circulant_bits(1000, 520), 1000, 1000).unwrap();
    let counts = matrix.mode_counts();
    assert_eq!(counts.rows, 520);
    assert_eq!(counts.columns, 520);

    let report = sanity_check(counts, 1000, 1000, 0.5);
    let reference = Binomial::new(2f64.powf(-0.5), 1000).unwrap().sf(519);
    assert!(
        (report.tail_probability - reference).abs() < 1e-9,
        "{} vs {reference}",
        report.tail_probability
    );
    assert!(report.passed);
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn circulant_bits_non_iid_full_run() {
    let samples = SampleSet::from_symbols(circulant_bits(1000, 520), 2, 1).unwrap();
    let config = RestartConfig::new(1, 0.5, DataClass::NonIid);
    let report = run_restart_test(samples, &config).unwrap();

    let reference = Binomial::new(2f64.powf(-0.5), 1000).unwrap().sf(519);
    assert!((report.sanity.tail_probability - reference).abs() < 1e-9);
    assert_eq!(report.estimates.len(), 20);
    // Long periodic runs: the tuple and predictor estimates collapse.
    assert!(!report.validation.accepted);
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn uniform_bytes_non_iid_full_run() {
    let samples = SampleSet::from_symbols(uniform_symbols(1_000_000, 256, 77), 256, 8).unwrap();
    let config = RestartConfig::new(8, 7.0, DataClass::NonIid);
    let report = run_restart_test(samples, &config).unwrap();

    assert_eq!(report.estimates.len(), 14);
    assert!(
        report
            .records_for(Orientation::Rows)
            .all(|r| !r.estimator.bit_strings_only())
    );
    let v = report.validation;
    assert!(v.h_row > 7.0 && v.h_row <= 8.0, "H_r = {}", v.h_row);
    assert!(v.h_column > 7.0 && v.h_column <= 8.0, "H_c = {}", v.h_column);
    assert_eq!(v.certified_bound, Some(7.0));
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn uniform_bits_non_iid_full_run() {
    let samples = SampleSet::from_symbols(uniform_symbols(1_000_000, 2, 78), 2, 1).unwrap();
    let config = RestartConfig::new(1, 0.9, DataClass::NonIid);
    let report = run_restart_test(samples, &config).unwrap();

    assert_eq!(report.estimates.len(), 20);
    let v = report.validation;
    assert!(v.accepted);
    assert!(v.h_row > 0.7 && v.h_column > 0.7, "H_r = {}, H_c = {}", v.h_row, v.h_column);
    let bound = v.certified_bound.unwrap();
    assert!(bound <= 0.9 && bound <= v.h_row.min(v.h_column));
}

// ═══════════════════════════════════════════════════════════════════════════════
// File input
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn file_run_masks_to_word_size() {
    let mut rng = StdRng::seed_from_u64(99);
    let raw: Vec<u8> = (0..1_000_000).map(|_| rng.random::<u8>()).collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&raw).unwrap();

    let config = RestartConfig::new(1, 0.9, DataClass::Iid);
    let report = run_restart_test_file(file.path(), &config).unwrap();
    assert_eq!(report.alphabet_size, 2);
    assert!(!report.remapped);
    assert!(report.validation.accepted);
    assert_eq!(report.validation.certified_bound, Some(0.9));
}

#[test]
fn file_run_short_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0, 1, 2, 3]).unwrap();
    let config = RestartConfig::new(2, 1.0, DataClass::Iid);
    assert!(matches!(
        run_restart_test_file(file.path(), &config),
        Err(RestartError::InsufficientSamples {
            required: 1_000_000,
            actual: 4
        })
    ));
}

#[test]
fn file_run_bad_config_skips_io() {
    let config = RestartConfig::new(9, 1.0, DataClass::Iid);
    assert!(matches!(
        run_restart_test_file("/definitely/not/here.bin", &config),
        Err(RestartError::InvalidWordSize(9))
    ));
}
