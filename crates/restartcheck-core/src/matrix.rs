//! Restart matrix: the row-major sample buffer and its transpose.
//!
//! Row `i` holds the `C` samples of restart `i`; column `j` holds sample
//! position `j` across all `R` restarts. Both buffers are owned and
//! immutable once built, so the two orientations can be assessed on
//! separate threads without sharing anything.

use serde::{Deserialize, Serialize};

use crate::error::{RestartError, Result};

/// Which view of the restart matrix a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Rows,
    Columns,
}

impl Orientation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rows => "row",
            Self::Columns => "column",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Largest per-line symbol frequency in each orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCounts {
    /// `X_r`: max over rows of the row's modal frequency, in `[1, C]`.
    pub rows: usize,
    /// `X_c`: max over columns of the column's modal frequency, in `[1, R]`.
    pub columns: usize,
}

impl ModeCounts {
    pub fn max(&self) -> usize {
        self.rows.max(self.columns)
    }
}

#[derive(Debug, Clone)]
pub struct RestartMatrix {
    rows: usize,
    cols: usize,
    row_major: Vec<u8>,
    column_major: Vec<u8>,
}

impl RestartMatrix {
    /// Lay `symbols` out as `rows` restarts of `cols` samples each.
    ///
    /// `symbols` must hold exactly `rows * cols` entries; truncation is the
    /// caller's job.
    pub fn new(symbols: Vec<u8>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || symbols.len() != rows * cols {
            return Err(RestartError::MatrixSize {
                rows,
                cols,
                actual: symbols.len(),
            });
        }
        let column_major = transpose(&symbols, rows, cols);
        Ok(Self {
            rows,
            cols,
            row_major: symbols,
            column_major,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i` occupies `[i * C, (i + 1) * C)`.
    pub fn row_buffer(&self) -> &[u8] {
        &self.row_major
    }

    /// Column `j` occupies `[j * R, (j + 1) * R)`.
    pub fn column_buffer(&self) -> &[u8] {
        &self.column_major
    }

    pub fn buffer(&self, orientation: Orientation) -> &[u8] {
        match orientation {
            Orientation::Rows => &self.row_major,
            Orientation::Columns => &self.column_major,
        }
    }

    /// Length of one line in the given orientation.
    pub fn line_len(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Rows => self.cols,
            Orientation::Columns => self.rows,
        }
    }

    pub fn mode_counts(&self) -> ModeCounts {
        ModeCounts {
            rows: max_mode_count(&self.row_major, self.cols),
            columns: max_mode_count(&self.column_major, self.rows),
        }
    }
}

/// Transpose a row-major `rows x cols` buffer: `out[j * rows + i] = data[i * cols + j]`.
pub fn transpose(data: &[u8], rows: usize, cols: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), rows * cols);
    let mut out = vec![0u8; data.len()];
    for (i, row) in data.chunks_exact(cols).enumerate() {
        for (j, &s) in row.iter().enumerate() {
            out[j * rows + i] = s;
        }
    }
    out
}

/// Maximum, over consecutive lines of `width` symbols, of the line's modal
/// frequency. A trailing partial line is ignored.
pub fn max_mode_count(buffer: &[u8], width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let mut counts = [0usize; 256];
    let mut best = 0;
    for line in buffer.chunks_exact(width) {
        counts.fill(0);
        for &s in line {
            counts[s as usize] += 1;
        }
        let line_max = counts.iter().copied().max().unwrap_or(0);
        best = best.max(line_max);
    }
    best
}
