//! Restart test orchestration.
//!
//! `Init -> MatrixBuilt -> SanityChecked -> BatteryRun -> Validated`. A failed
//! sanity check ends the run with an error; a failed validation test is
//! recorded in the report and the run still succeeds.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::battery::{EstimatorRecord, plan, run_battery};
use crate::config::RestartConfig;
use crate::data::{SampleSet, load_samples};
use crate::error::{RestartError, Result};
use crate::matrix::{ModeCounts, Orientation, RestartMatrix};
use crate::sanity::{SanityReport, sanity_check};
use crate::validation::{ValidationResult, validate};

#[derive(Debug, Clone, Copy)]
enum Phase {
    Init,
    MatrixBuilt,
    SanityChecked,
    BatteryRun,
    Validated,
}

fn enter(phase: Phase) {
    info!("restart test: {phase:?}");
}

/// Full outcome of a restart test that got past the sanity check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartReport {
    pub config: RestartConfig,
    /// Symbols used: exactly `R * C`.
    pub symbol_count: usize,
    pub alphabet_size: usize,
    /// The raw values were renumbered onto a smaller alphabet.
    pub remapped: bool,
    pub mode_counts: ModeCounts,
    pub sanity: SanityReport,
    /// One record per estimator and orientation, rows before columns for
    /// each estimator.
    pub estimates: Vec<EstimatorRecord>,
    pub validation: ValidationResult,
}

impl RestartReport {
    pub fn records_for(&self, orientation: Orientation) -> impl Iterator<Item = &EstimatorRecord> {
        self.estimates
            .iter()
            .filter(move |r| r.orientation == orientation)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the restart test over `samples`.
///
/// Only the first `R * C` symbols are used. Fails on a bad configuration,
/// unusable samples or a failed sanity check.
pub fn run_restart_test(mut samples: SampleSet, config: &RestartConfig) -> Result<RestartReport> {
    enter(Phase::Init);
    config.validate()?;
    if samples.word_size() != config.word_size {
        return Err(RestartError::WordSizeMismatch {
            configured: config.word_size,
            samples: samples.word_size(),
        });
    }
    if samples.alphabet_size() < 2 {
        return Err(RestartError::SingleSymbolAlphabet);
    }
    let required = config.sample_count();
    if samples.len() < required {
        return Err(RestartError::InsufficientSamples {
            required,
            actual: samples.len(),
        });
    }

    let alphabet_size = samples.alphabet_size();
    let remapped = samples.was_remapped();
    samples.truncate(required);

    let matrix = RestartMatrix::new(samples.into_symbols(), config.rows, config.cols)?;
    enter(Phase::MatrixBuilt);

    let mode_counts = matrix.mode_counts();
    let sanity = sanity_check(mode_counts, config.rows, config.cols, config.initial_entropy)
        .into_result()?;
    enter(Phase::SanityChecked);

    let battery = plan(config.data_class, config.word_size);
    let (rows, columns) = run_battery(
        &matrix,
        alphabet_size,
        config.word_size,
        &battery,
        config.parallel,
    );
    enter(Phase::BatteryRun);

    let validation = validate(rows.min_entropy, columns.min_entropy, config.initial_entropy);
    enter(Phase::Validated);

    let estimates = rows
        .records
        .into_iter()
        .zip(columns.records)
        .flat_map(|(r, c)| [r, c])
        .collect();

    Ok(RestartReport {
        config: config.clone(),
        symbol_count: required,
        alphabet_size,
        remapped,
        mode_counts,
        sanity,
        estimates,
        validation,
    })
}

/// Load `path` with the configured word size and run the restart test.
pub fn run_restart_test_file(path: impl AsRef<Path>, config: &RestartConfig) -> Result<RestartReport> {
    config.validate()?;
    let samples = load_samples(path, config.word_size)?;
    run_restart_test(samples, config)
}
