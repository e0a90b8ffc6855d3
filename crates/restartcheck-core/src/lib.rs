//! # restartcheck-core
//!
//! NIST SP 800-90B restart test (Section 3.1.4).
//!
//! An entropy source is restarted `R` times and `C` samples are collected
//! after each restart. The samples form an `R x C` matrix: each row is one
//! restart, each column one sample position across restarts. The test
//!
//! 1. bounds the largest per-row and per-column symbol frequency with a
//!    binomial tail (the *sanity check*),
//! 2. runs the min-entropy estimator battery over the row-major and the
//!    column-major sample streams, and
//! 3. accepts the claimed entropy `H_I` only if neither stream measures below
//!    `H_I / 2` (the *validation test*).
//!
//! ## Quick Start
//!
//! ```no_run
//! use restartcheck_core::{DataClass, RestartConfig, run_restart_test_file};
//!
//! let config = RestartConfig::new(8, 7.2, DataClass::NonIid);
//! let report = run_restart_test_file("restart.bin", &config)?;
//! match report.validation.certified_bound {
//!     Some(h) => println!("validated: {h:.6} bits/sample"),
//!     None => println!("validation failed"),
//! }
//! # Ok::<(), restartcheck_core::RestartError>(())
//! ```

pub mod battery;
pub mod binomial;
pub mod config;
pub mod data;
pub mod error;
pub mod matrix;
pub mod restart;
pub mod sanity;
pub mod validation;

pub use battery::{
    EntropyAccumulator, EstimatorKind, EstimatorRecord, OrientationResult, Stage, plan,
    run_battery, run_orientation,
};
pub use binomial::{MAX_TRIALS, binomial_tail};
pub use config::{DEFAULT_COLS, DEFAULT_ROWS, DataClass, RestartConfig};
pub use data::{MAX_WORD_SIZE, SampleSet, load_samples};
pub use error::{RestartError, Result};
pub use matrix::{ModeCounts, Orientation, RestartMatrix, max_mode_count, transpose};
pub use restart::{RestartReport, run_restart_test, run_restart_test_file};
pub use sanity::{SANITY_SIGNIFICANCE, SanityReport, sanity_check};
pub use validation::{ValidationResult, validate};

pub use restartcheck_estimators::Estimate;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
