//! Error taxonomy for the restart test.
//!
//! Configuration and input errors stop the run before any statistics are
//! computed. A failed sanity check is fatal too: no entropy value may be
//! reported for restart data that is statistically implausible. A failed
//! validation test is *not* an error; it is part of the
//! [`ValidationResult`](crate::ValidationResult).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestartError {
    // Configuration
    #[error("bits per word must be between 1 and 8, got {0}")]
    InvalidWordSize(u8),

    #[error("H_I must be nonnegative and at most bits per word ({word_size}), got {value}")]
    InvalidInitialEntropy { value: f64, word_size: u8 },

    #[error("restart matrix dimensions must be between 1 and {max}, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize, max: usize },

    #[error("samples use {samples} bits per word but the test is configured for {configured}")]
    WordSizeMismatch { configured: u8, samples: u8 },

    // Input
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input contains no samples")]
    EmptyInput,

    #[error("alphabet of {alphabet_size} symbols does not fit in {word_size} bits per word")]
    InvalidAlphabet { alphabet_size: usize, word_size: u8 },

    #[error("symbol {symbol} is outside the alphabet of {alphabet_size} symbols")]
    SymbolOutOfRange { symbol: u8, alphabet_size: usize },

    #[error("symbol alphabet consists of 1 symbol, no entropy awarded")]
    SingleSymbolAlphabet,

    #[error("data contains less than {required} samples ({actual} found)")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("a {rows}x{cols} restart matrix needs exactly {} samples, got {actual}", rows * cols)]
    MatrixSize {
        rows: usize,
        cols: usize,
        actual: usize,
    },

    // Statistical rejection
    #[error(
        "restart sanity check failed: alpha {alpha:.6}, tail probability {tail_probability:.6} (max mode count {x_max})"
    )]
    SanityCheckFailed {
        x_max: usize,
        alpha: f64,
        tail_probability: f64,
    },
}

impl RestartError {
    /// True for the statistical rejection, as opposed to bad configuration or
    /// unusable input.
    pub fn is_statistical(&self) -> bool {
        matches!(self, Self::SanityCheckFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, RestartError>;
