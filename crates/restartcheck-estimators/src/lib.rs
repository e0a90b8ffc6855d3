//! NIST SP 800-90B min-entropy estimator battery.
//!
//! Provides the ten estimators the standard applies to non-IID sources:
//! most common value, the entropic-statistic estimates for bit strings
//! (collision, Markov, compression), the tuple estimates (t-tuple and longest
//! repeated substring) and the four predictor estimates (MultiMCW, Lag,
//! MultiMMC, LZ78Y).
//!
//! Every estimator takes a slice of symbols already compacted to
//! `0..alphabet_size` and returns an [`Estimate`] in bits per symbol.
//! [`Estimate::NotApplicable`] marks an input the estimator cannot assess
//! (wrong symbol width, too few samples); it is never a number and must not
//! take part in a running minimum.

use serde::{Deserialize, Serialize};

mod entropic;
mod predictor;
mod suffix;
mod tuple;

pub use entropic::{collision_estimate, compression_estimate, markov_estimate};
pub use predictor::{lag_estimate, lz78y_estimate, multi_mcw_estimate, multi_mmc_estimate};
pub use tuple::{TUPLE_CUTOFF, TupleEstimate, lrs_estimate, t_tuple_estimate};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Upper 0.995 quantile of the standard normal distribution.
///
/// Every confidence bound in the battery is a one-sided 99.5% bound.
pub const Z_ALPHA: f64 = 2.575_829_303_548_900_8;

/// Outcome of a single estimator run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "bits", rename_all = "snake_case")]
pub enum Estimate {
    /// Min-entropy estimate in bits per symbol.
    Applicable(f64),
    /// The estimator does not apply to this input.
    NotApplicable,
}

impl Estimate {
    /// Estimate from the probability of the most likely outcome: `-log2(p)`.
    ///
    /// `p` is clamped into `(0, 1]` so the result is always finite and
    /// non-negative.
    pub fn from_probability(p: f64) -> Self {
        let p = if p.is_nan() {
            1.0
        } else {
            p.clamp(f64::MIN_POSITIVE, 1.0)
        };
        Self::Applicable((-p.log2()).max(0.0))
    }

    /// The estimate in bits, if applicable.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Applicable(h) => Some(h),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(self) -> bool {
        matches!(self, Self::Applicable(_))
    }
}

impl std::fmt::Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applicable(h) => write!(f, "{h:.6}"),
            Self::NotApplicable => write!(f, "n/a"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// One-sided 99.5% upper confidence bound on a proportion estimated from `n`
/// observations, capped at 1.
pub fn upper_bound(p_hat: f64, n: usize) -> f64 {
    if n < 2 {
        return 1.0;
    }
    let spread = Z_ALPHA * (p_hat * (1.0 - p_hat) / (n as f64 - 1.0)).max(0.0).sqrt();
    (p_hat + spread).min(1.0)
}

/// True if every symbol is a bit (0 or 1).
fn is_bit_string(data: &[u8]) -> bool {
    data.iter().all(|&s| s <= 1)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Most common value
// ═══════════════════════════════════════════════════════════════════════════════

/// Most common value estimate: `-log2` of the upper bound on the frequency of
/// the modal symbol.
pub fn most_common_value(data: &[u8]) -> Estimate {
    let n = data.len();
    if n < 2 {
        return Estimate::NotApplicable;
    }
    let mut hist = [0u64; 256];
    for &s in data {
        hist[s as usize] += 1;
    }
    let max = hist.iter().copied().max().unwrap_or(0);
    let p_hat = max as f64 / n as f64;
    Estimate::from_probability(upper_bound(p_hat, n))
}
