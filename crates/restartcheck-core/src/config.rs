//! Restart test configuration.

use serde::{Deserialize, Serialize};

use crate::binomial::MAX_TRIALS;
use crate::data::check_word_size;
use crate::error::{RestartError, Result};

/// Restarts in the standard configuration.
pub const DEFAULT_ROWS: usize = 1000;
/// Samples per restart in the standard configuration.
pub const DEFAULT_COLS: usize = 1000;

/// Whether the source has been judged IID; selects the estimator battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClass {
    Iid,
    NonIid,
}

impl DataClass {
    pub fn is_iid(self) -> bool {
        matches!(self, Self::Iid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartConfig {
    /// Number of restarts (`R`).
    pub rows: usize,
    /// Samples per restart (`C`).
    pub cols: usize,
    /// Bits per sample, 1 to 8.
    pub word_size: u8,
    /// Claimed min-entropy per sample (`H_I`).
    pub initial_entropy: f64,
    pub data_class: DataClass,
    /// Assess rows and columns on separate threads.
    pub parallel: bool,
}

impl RestartConfig {
    pub fn new(word_size: u8, initial_entropy: f64, data_class: DataClass) -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            word_size,
            initial_entropy,
            data_class,
            parallel: true,
        }
    }

    pub fn with_dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Total samples consumed by one run: `R * C`.
    pub fn sample_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Check every parameter before any data is touched.
    pub fn validate(&self) -> Result<()> {
        check_word_size(self.word_size)?;
        let h = self.initial_entropy;
        if !h.is_finite() || h < 0.0 || h > f64::from(self.word_size) {
            return Err(RestartError::InvalidInitialEntropy {
                value: h,
                word_size: self.word_size,
            });
        }
        // Binomial trial counts are R and C.
        if !(1..=MAX_TRIALS).contains(&self.rows) || !(1..=MAX_TRIALS).contains(&self.cols) {
            return Err(RestartError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
                max: MAX_TRIALS,
            });
        }
        Ok(())
    }
}
