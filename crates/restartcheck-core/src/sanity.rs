//! Restart sanity check.
//!
//! If the source really delivers `H_I` bits per sample, the most likely
//! symbol has probability at most `p = 2^-H_I`, and its count in any single
//! restart (row) or position (column) is bounded by a binomial tail. A mode
//! count so large that its tail probability drops below
//! `alpha = 0.01 / (R + C)` means the restart data contradicts `H_I`.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::binomial::binomial_tail;
use crate::error::{RestartError, Result};
use crate::matrix::ModeCounts;

/// Overall significance level of the check, split across all rows and columns.
pub const SANITY_SIGNIFICANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SanityReport {
    /// `max(X_r, X_c)`.
    pub x_max: usize,
    /// Per-line significance level `0.01 / (R + C)`.
    pub alpha: f64,
    /// Smallest tail probability over the two orientations.
    pub tail_probability: f64,
    pub passed: bool,
}

impl SanityReport {
    /// Convert a failed report into the fatal error the run aborts with.
    pub fn into_result(self) -> Result<Self> {
        if self.passed {
            Ok(self)
        } else {
            Err(RestartError::SanityCheckFailed {
                x_max: self.x_max,
                alpha: self.alpha,
                tail_probability: self.tail_probability,
            })
        }
    }
}

/// Evaluate the sanity check for an `rows x cols` restart matrix.
///
/// The row mode count `X_r` comes from `cols` trials and the column mode
/// count `X_c` from `rows` trials; each is bounded with its own trial count
/// and the smaller tail is reported. For a square matrix this is
/// `P(X >= max(X_r, X_c))` with `X ~ Binomial(R, 2^-H_I)`.
pub fn sanity_check(
    counts: ModeCounts,
    rows: usize,
    cols: usize,
    initial_entropy: f64,
) -> SanityReport {
    let p = 2f64.powf(-initial_entropy);
    let alpha = SANITY_SIGNIFICANCE / (rows + cols) as f64;

    let row_tail = binomial_tail(cols, p, counts.rows);
    let column_tail = binomial_tail(rows, p, counts.columns);
    let tail_probability = row_tail.min(column_tail);
    let passed = tail_probability >= alpha;

    let report = SanityReport {
        x_max: counts.max(),
        alpha,
        tail_probability,
        passed,
    };
    if passed {
        info!(
            "sanity check passed: X_r={} X_c={} tail={tail_probability:.6e} alpha={alpha:.6e}",
            counts.rows, counts.columns
        );
    } else {
        warn!(
            "sanity check failed: X_r={} X_c={} tail={tail_probability:.6e} alpha={alpha:.6e}",
            counts.rows, counts.columns
        );
    }
    report
}
