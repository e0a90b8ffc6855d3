//! Validation test: the final accept/reject decision.

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `H_r`: minimum over the row estimates.
    pub h_row: f64,
    /// `H_c`: minimum over the column estimates.
    pub h_column: f64,
    /// `H_I`: the claimed initial entropy.
    pub h_initial: f64,
    pub accepted: bool,
    /// `min(H_r, H_c, H_I)`, present only when accepted.
    pub certified_bound: Option<f64>,
}

/// Accept when `min(H_r, H_c) >= H_I / 2`.
///
/// A rejection is an ordinary outcome, not an error: the measured values are
/// still reported, only the certified bound is withheld.
pub fn validate(h_row: f64, h_column: f64, h_initial: f64) -> ValidationResult {
    let measured = h_row.min(h_column);
    let accepted = measured >= h_initial / 2.0;
    let certified_bound = accepted.then(|| measured.min(h_initial));

    match certified_bound {
        Some(bound) => info!("validation passed: min(H_r, H_c, H_I) = {bound:.6}"),
        None => warn!(
            "validation failed: min(H_r, H_c) = {measured:.6} < H_I/2 = {:.6}",
            h_initial / 2.0
        ),
    }

    ValidationResult {
        h_row,
        h_column,
        h_initial,
        accepted,
        certified_bound,
    }
}
