//! Estimator battery over the two orientations of the restart matrix.
//!
//! Each orientation owns an [`EntropyAccumulator`] that starts at the word
//! size and only ever shrinks. The two accumulators never meet until
//! validation, so rows and columns can run on separate threads.

use log::debug;
use serde::{Deserialize, Serialize};

use restartcheck_estimators::{
    Estimate, collision_estimate, compression_estimate, lag_estimate, lrs_estimate,
    lz78y_estimate, markov_estimate, most_common_value, multi_mcw_estimate, multi_mmc_estimate,
    t_tuple_estimate,
};

use crate::config::DataClass;
use crate::matrix::{Orientation, RestartMatrix};

// ---------------------------------------------------------------------------
// Estimator catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    MostCommonValue,
    Collision,
    Markov,
    Compression,
    TTuple,
    LongestRepeatedSubstring,
    MultiMcw,
    Lag,
    MultiMmc,
    Lz78y,
}

/// Group of estimators announced together in the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    MostCommonValue,
    EntropicStatistic,
    Tuple,
    Predictor,
}

impl Stage {
    pub fn banner(self) -> &'static str {
        match self {
            Self::MostCommonValue => "Running Most Common Value Estimate...",
            Self::EntropicStatistic => "Running Entropic Statistic Estimates (bit strings only)...",
            Self::Tuple => "Running Tuple Estimates...",
            Self::Predictor => "Running Predictor Estimates...",
        }
    }
}

impl EstimatorKind {
    pub const ALL: [Self; 10] = [
        Self::MostCommonValue,
        Self::Collision,
        Self::Markov,
        Self::Compression,
        Self::TTuple,
        Self::LongestRepeatedSubstring,
        Self::MultiMcw,
        Self::Lag,
        Self::MultiMmc,
        Self::Lz78y,
    ];

    /// Display name used in verbose output.
    pub fn name(self) -> &'static str {
        match self {
            Self::MostCommonValue => "Most Common Value Estimate",
            Self::Collision => "Collision Test Estimate",
            Self::Markov => "Markov Test Estimate",
            Self::Compression => "Compression Test Estimate",
            Self::TTuple => "T-Tuple Test Estimate",
            Self::LongestRepeatedSubstring => "LRS Test Estimate",
            Self::MultiMcw => {
                "Multi Most Common in Window (MultiMCW) Prediction Test Estimate"
            }
            Self::Lag => "Lag Prediction Test Estimate",
            Self::MultiMmc => {
                "Multi Markov Model with Counting (MultiMMC) Prediction Test Estimate"
            }
            Self::Lz78y => "LZ78Y Prediction Test Estimate",
        }
    }

    pub fn stage(self) -> Stage {
        match self {
            Self::MostCommonValue => Stage::MostCommonValue,
            Self::Collision | Self::Markov | Self::Compression => Stage::EntropicStatistic,
            Self::TTuple | Self::LongestRepeatedSubstring => Stage::Tuple,
            Self::MultiMcw | Self::Lag | Self::MultiMmc | Self::Lz78y => Stage::Predictor,
        }
    }

    /// Only defined for 1-bit samples.
    pub fn bit_strings_only(self) -> bool {
        self.stage() == Stage::EntropicStatistic
    }

    /// Skipped when the source is declared IID.
    pub fn non_iid_only(self) -> bool {
        self != Self::MostCommonValue
    }
}

/// Estimators to run, in invocation order.
///
/// Most common value always runs. Everything else is for non-IID data, and
/// the entropic statistics additionally need one bit per sample.
pub fn plan(data_class: DataClass, word_size: u8) -> Vec<EstimatorKind> {
    EstimatorKind::ALL
        .into_iter()
        .filter(|k| !k.non_iid_only() || !data_class.is_iid())
        .filter(|k| !k.bit_strings_only() || word_size == 1)
        .collect()
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

/// Running minimum of the applicable estimates for one orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyAccumulator {
    bound: f64,
}

impl EntropyAccumulator {
    /// Start at the largest possible min-entropy for `word_size`-bit samples.
    pub fn new(word_size: u8) -> Self {
        Self {
            bound: f64::from(word_size),
        }
    }

    /// Fold one estimate in. Not-applicable results leave the bound alone.
    pub fn fold(&mut self, estimate: Estimate) -> f64 {
        if let Estimate::Applicable(h) = estimate {
            self.bound = self.bound.min(h);
        }
        self.bound
    }

    pub fn value(&self) -> f64 {
        self.bound
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorRecord {
    pub estimator: EstimatorKind,
    pub orientation: Orientation,
    pub estimate: Estimate,
}

/// Everything one orientation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrientationResult {
    pub orientation: Orientation,
    /// `H_r` or `H_c`.
    pub min_entropy: f64,
    pub records: Vec<EstimatorRecord>,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run `plan` over one buffer.
///
/// The t-tuple estimate hands its tuple length `u` to the LRS estimate; if
/// the plan asks for LRS without a preceding t-tuple, `u` is computed on
/// the spot.
pub fn run_orientation(
    data: &[u8],
    alphabet_size: usize,
    word_size: u8,
    orientation: Orientation,
    plan: &[EstimatorKind],
) -> OrientationResult {
    let mut acc = EntropyAccumulator::new(word_size);
    let mut tuple_u: Option<usize> = None;
    let mut records = Vec::with_capacity(plan.len());

    for &kind in plan {
        let estimate = match kind {
            EstimatorKind::MostCommonValue => most_common_value(data),
            EstimatorKind::Collision => collision_estimate(data),
            EstimatorKind::Markov => markov_estimate(data),
            EstimatorKind::Compression => compression_estimate(data),
            EstimatorKind::TTuple => {
                let tuple = t_tuple_estimate(data);
                tuple_u = Some(tuple.u);
                tuple.estimate
            }
            EstimatorKind::LongestRepeatedSubstring => {
                let u = tuple_u.unwrap_or_else(|| t_tuple_estimate(data).u);
                lrs_estimate(data, u)
            }
            EstimatorKind::MultiMcw => multi_mcw_estimate(data, alphabet_size),
            EstimatorKind::Lag => lag_estimate(data, alphabet_size),
            EstimatorKind::MultiMmc => multi_mmc_estimate(data, alphabet_size),
            EstimatorKind::Lz78y => lz78y_estimate(data, alphabet_size),
        };
        let bound = acc.fold(estimate);
        debug!(
            "{orientation}: {} = {estimate} (running min {bound:.6})",
            kind.name()
        );
        records.push(EstimatorRecord {
            estimator: kind,
            orientation,
            estimate,
        });
    }

    OrientationResult {
        orientation,
        min_entropy: acc.value(),
        records,
    }
}

/// Run `plan` over both orientations of `matrix`: rows first, then columns.
///
/// With `parallel` set, the two orientations run on scoped threads.
pub fn run_battery(
    matrix: &RestartMatrix,
    alphabet_size: usize,
    word_size: u8,
    plan: &[EstimatorKind],
    parallel: bool,
) -> (OrientationResult, OrientationResult) {
    let run = |orientation| {
        run_orientation(
            matrix.buffer(orientation),
            alphabet_size,
            word_size,
            orientation,
            plan,
        )
    };

    if !parallel {
        return (run(Orientation::Rows), run(Orientation::Columns));
    }

    std::thread::scope(|s| {
        let columns = s.spawn(|| run(Orientation::Columns));
        let rows = run(Orientation::Rows);
        let columns = columns
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (rows, columns)
    })
}
