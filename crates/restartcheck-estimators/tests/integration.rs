//! Integration tests for restartcheck-estimators.
//!
//! These run every estimator over seeded synthetic sources and check the
//! bounds the battery relies on: estimates stay within `[0, log2(k)]` and a
//! more predictable source never scores higher than a less predictable one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use restartcheck_estimators::{
    Estimate, collision_estimate, compression_estimate, lag_estimate, lrs_estimate,
    lz78y_estimate, markov_estimate, most_common_value, multi_mcw_estimate, multi_mmc_estimate,
    t_tuple_estimate,
};

fn uniform(n: usize, alphabet_size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| rng.random_range(0..alphabet_size) as u8)
        .collect()
}

/// Symbol 0 with probability `p0`, otherwise uniform over the rest.
fn skewed(n: usize, alphabet_size: usize, p0: f64, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            if rng.random::<f64>() < p0 {
                0
            } else {
                rng.random_range(1..alphabet_size) as u8
            }
        })
        .collect()
}

fn all_estimates(data: &[u8], alphabet_size: usize) -> Vec<(&'static str, Estimate)> {
    let tuple = t_tuple_estimate(data);
    let mut out = vec![
        ("mcv", most_common_value(data)),
        ("t-tuple", tuple.estimate),
        ("lrs", lrs_estimate(data, tuple.u)),
        ("multi-mcw", multi_mcw_estimate(data, alphabet_size)),
        ("lag", lag_estimate(data, alphabet_size)),
        ("multi-mmc", multi_mmc_estimate(data, alphabet_size)),
        ("lz78y", lz78y_estimate(data, alphabet_size)),
    ];
    if alphabet_size == 2 {
        out.push(("collision", collision_estimate(data)));
        out.push(("markov", markov_estimate(data)));
        out.push(("compression", compression_estimate(data)));
    }
    out
}

#[test]
fn estimates_bounded_by_alphabet_width() {
    for &(alphabet_size, seed) in &[(2usize, 1u64), (4, 2), (16, 3), (256, 4)] {
        let data = uniform(40_000, alphabet_size, seed);
        let ceiling = (alphabet_size as f64).log2() + 1e-9;
        for (name, est) in all_estimates(&data, alphabet_size) {
            if let Some(h) = est.value() {
                assert!(
                    (0.0..=ceiling).contains(&h),
                    "{name} on k={alphabet_size}: {h} outside [0, {ceiling}]"
                );
            }
        }
    }
}

#[test]
fn bit_string_estimators_skip_wide_symbols() {
    let data = uniform(20_000, 4, 9);
    assert_eq!(collision_estimate(&data), Estimate::NotApplicable);
    assert_eq!(markov_estimate(&data), Estimate::NotApplicable);
    assert_eq!(compression_estimate(&data), Estimate::NotApplicable);
}

#[test]
fn skewed_source_scores_lower_than_uniform() {
    let flat = uniform(40_000, 8, 21);
    let biased = skewed(40_000, 8, 0.6, 22);
    let flat_mcv = most_common_value(&flat).value().unwrap();
    let biased_mcv = most_common_value(&biased).value().unwrap();
    assert!(biased_mcv < flat_mcv);
    // -log2(0.6) ~ 0.737
    assert!(biased_mcv > 0.6 && biased_mcv < 0.75, "mcv = {biased_mcv}");

    let flat_min = all_estimates(&flat, 8)
        .into_iter()
        .filter_map(|(_, e)| e.value())
        .fold(f64::INFINITY, f64::min);
    let biased_min = all_estimates(&biased, 8)
        .into_iter()
        .filter_map(|(_, e)| e.value())
        .fold(f64::INFINITY, f64::min);
    assert!(biased_min < flat_min, "{biased_min} vs {flat_min}");
}

#[test]
fn tuple_parameter_feeds_lrs() {
    let data = uniform(60_000, 2, 33);
    let tuple = t_tuple_estimate(&data);
    assert!(tuple.estimate.is_applicable());
    assert!(tuple.u > 1);
    assert!(lrs_estimate(&data, tuple.u).is_applicable());
}
