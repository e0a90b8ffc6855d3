//! Sample loading and alphabet compaction.
//!
//! Raw files hold one sample per byte. Only the low `word_size` bits of each
//! byte are significant; the distinct values that actually occur are mapped,
//! in ascending order, onto the dense alphabet `0..alphabet_size`.

use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::{RestartError, Result};

/// Largest supported sample width in bits.
pub const MAX_WORD_SIZE: u8 = 8;

/// An ordered sequence of symbols over a dense alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleSet {
    #[serde(skip)]
    symbols: Vec<u8>,
    alphabet_size: usize,
    word_size: u8,
}

impl SampleSet {
    /// Build a sample set from raw file bytes.
    ///
    /// Each byte is masked to its low `word_size` bits and the occurring
    /// values are remapped to `0..alphabet_size` preserving their order.
    pub fn from_bytes(raw: &[u8], word_size: u8) -> Result<Self> {
        check_word_size(word_size)?;
        if raw.is_empty() {
            return Err(RestartError::EmptyInput);
        }

        let mask = word_mask(word_size);
        let mut seen = [false; 256];
        for &b in raw {
            seen[(b & mask) as usize] = true;
        }

        let mut map = [0u8; 256];
        let mut alphabet_size = 0usize;
        for (value, _) in seen.iter().enumerate().filter(|(_, s)| **s) {
            map[value] = alphabet_size as u8;
            alphabet_size += 1;
        }

        let symbols = raw.iter().map(|&b| map[(b & mask) as usize]).collect();
        debug!(
            "loaded {} samples, {alphabet_size} distinct symbols at {word_size} bits/word",
            raw.len()
        );
        Ok(Self {
            symbols,
            alphabet_size,
            word_size,
        })
    }

    /// Wrap symbols that are already compacted to `0..alphabet_size`.
    ///
    /// Useful when samples come from somewhere other than a raw file. Every
    /// symbol must lie inside the declared alphabet and the alphabet must fit
    /// in `word_size` bits. The alphabet may be larger than the set of
    /// symbols actually present.
    pub fn from_symbols(symbols: Vec<u8>, alphabet_size: usize, word_size: u8) -> Result<Self> {
        check_word_size(word_size)?;
        if symbols.is_empty() {
            return Err(RestartError::EmptyInput);
        }
        if alphabet_size == 0 || alphabet_size > 1usize << word_size {
            return Err(RestartError::InvalidAlphabet {
                alphabet_size,
                word_size,
            });
        }
        if let Some(&symbol) = symbols.iter().find(|&&s| s as usize >= alphabet_size) {
            return Err(RestartError::SymbolOutOfRange {
                symbol,
                alphabet_size,
            });
        }
        Ok(Self {
            symbols,
            alphabet_size,
            word_size,
        })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn word_size(&self) -> u8 {
        self.word_size
    }

    /// Keep only the first `n` symbols. No-op if the set is already shorter.
    pub fn truncate(&mut self, n: usize) {
        self.symbols.truncate(n);
    }

    /// True when fewer than `2^word_size` symbols occur, so the raw values
    /// were renumbered.
    pub fn was_remapped(&self) -> bool {
        self.alphabet_size < 1usize << self.word_size
    }

    pub(crate) fn into_symbols(self) -> Vec<u8> {
        self.symbols
    }
}

/// Read a whole sample file and compact it with [`SampleSet::from_bytes`].
pub fn load_samples(path: impl AsRef<Path>, word_size: u8) -> Result<SampleSet> {
    let path = path.as_ref();
    check_word_size(word_size)?;
    let raw = std::fs::read(path).map_err(|source| RestartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SampleSet::from_bytes(&raw, word_size)
}

pub(crate) fn check_word_size(word_size: u8) -> Result<()> {
    if (1..=MAX_WORD_SIZE).contains(&word_size) {
        Ok(())
    } else {
        Err(RestartError::InvalidWordSize(word_size))
    }
}

fn word_mask(word_size: u8) -> u8 {
    if word_size >= 8 {
        0xFF
    } else {
        (1u8 << word_size) - 1
    }
}
