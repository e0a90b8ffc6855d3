//! Predictor estimates: MultiMCW, Lag, MultiMMC and LZ78Y.
//!
//! Each predictor walks the sample once, guessing every symbol from the ones
//! before it. The global hit rate and the longest run of hits are turned into
//! two probability bounds; the larger (or `1/k`, whichever is larger) gives
//! the estimate.

use std::collections::HashMap;

use crate::{Estimate, upper_bound};

/// Confidence level for the longest-run bound.
const LOCAL_CONFIDENCE: f64 = 0.99;
const LOCAL_ITERATIONS: usize = 10;
const BISECTION_STEPS: usize = 64;

// ---------------------------------------------------------------------------
// Scoring shared by all predictors
// ---------------------------------------------------------------------------

/// Running tally of prediction outcomes.
#[derive(Debug, Default)]
struct PredictionTally {
    total: usize,
    correct: usize,
    run: usize,
    longest_run: usize,
}

impl PredictionTally {
    fn record(&mut self, hit: bool) {
        self.total += 1;
        if hit {
            self.correct += 1;
            self.run += 1;
            self.longest_run = self.longest_run.max(self.run);
        } else {
            self.run = 0;
        }
    }

    fn finish(&self, alphabet_size: usize) -> Estimate {
        predictor_estimate(self.correct, self.total, self.longest_run, alphabet_size)
    }
}

/// Convert predictor outcomes into a min-entropy estimate.
fn predictor_estimate(
    correct: usize,
    total: usize,
    longest_run: usize,
    alphabet_size: usize,
) -> Estimate {
    if total < 2 {
        return Estimate::NotApplicable;
    }
    let n = total as f64;
    let p_global = if correct == 0 {
        1.0 - 0.01f64.powf(1.0 / n)
    } else {
        upper_bound(correct as f64 / n, total)
    };
    let p_local = local_bound(longest_run + 1, total);
    let floor = 1.0 / alphabet_size.max(1) as f64;
    Estimate::from_probability(p_global.max(p_local).max(floor))
}

/// Smallest hit probability `p` for which a longest run shorter than `r` in
/// `n` trials has probability at most 0.99.
fn local_bound(r: usize, n: usize) -> f64 {
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if no_run_probability(mid, r, n) > LOCAL_CONFIDENCE {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Probability that `n` trials with hit probability `p` contain no run of
/// `r` consecutive hits.
fn no_run_probability(p: f64, r: usize, n: usize) -> f64 {
    let q = 1.0 - p;
    if q <= 0.0 {
        return 0.0;
    }
    let rf = r as f64;
    let mut x = 1.0f64;
    for _ in 0..LOCAL_ITERATIONS {
        x = 1.0 + q * p.powf(rf) * x.powf(rf + 1.0);
    }
    if !x.is_finite() {
        return 0.0;
    }
    let numerator = 1.0 - p * x;
    let denominator = (rf + 1.0 - rf * x) * q;
    if numerator <= 0.0 || denominator <= 0.0 {
        return 0.0;
    }
    (numerator.ln() - denominator.ln() - (n as f64 + 1.0) * x.ln()).exp()
}

/// Observed output counts following one context.
#[derive(Debug, Default, Clone)]
struct FollowerCounts {
    counts: Vec<(u8, u32)>,
}

impl FollowerCounts {
    fn bump(&mut self, symbol: u8) {
        match self.counts.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, c)) => *c += 1,
            None => self.counts.push((symbol, 1)),
        }
    }

    /// Most frequent follower; ties go to the larger symbol.
    fn best(&self) -> Option<(u8, u32)> {
        self.counts
            .iter()
            .copied()
            .max_by_key(|&(s, c)| (c, s))
    }
}

// ---------------------------------------------------------------------------
// MultiMCW
// ---------------------------------------------------------------------------

const MCW_WINDOWS: [usize; 4] = [63, 255, 1023, 4095];

/// Most common symbol over a sliding window, ties broken toward the symbol
/// seen most recently.
struct WindowMode {
    width: usize,
    alphabet_size: usize,
    counts: [u32; 256],
    mode: Option<u8>,
}

impl WindowMode {
    fn new(width: usize, alphabet_size: usize) -> Self {
        Self {
            width,
            alphabet_size,
            counts: [0; 256],
            mode: None,
        }
    }

    /// Add `data[i]`, evicting the symbol that falls out of the window.
    /// `last_seen[s]` must already reflect position `i`.
    fn push(&mut self, data: &[u8], i: usize, last_seen: &[usize; 256]) {
        let s = data[i];
        self.counts[s as usize] += 1;
        match self.mode {
            Some(m) if self.counts[s as usize] < self.counts[m as usize] => {}
            _ => self.mode = Some(s),
        }
        if i >= self.width {
            let old = data[i - self.width];
            self.counts[old as usize] -= 1;
            if self.mode == Some(old) {
                self.rescan(last_seen);
            }
        }
    }

    fn rescan(&mut self, last_seen: &[usize; 256]) {
        self.mode = (0..self.alphabet_size)
            .filter(|&s| self.counts[s] > 0)
            .max_by_key(|&s| (self.counts[s], last_seen[s]))
            .map(|s| s as u8);
    }
}

/// Multi most-common-in-window prediction estimate.
///
/// Four sub-predictors guess the most common symbol of the last 63, 255,
/// 1023 and 4095 samples; the sub-predictor with the best score so far makes
/// the prediction.
pub fn multi_mcw_estimate(data: &[u8], alphabet_size: usize) -> Estimate {
    let start = MCW_WINDOWS[0];
    if data.len() <= start + 1 {
        return Estimate::NotApplicable;
    }
    let alphabet = alphabet_size.clamp(1, 256);

    let mut windows: Vec<WindowMode> = MCW_WINDOWS
        .iter()
        .map(|&w| WindowMode::new(w, alphabet))
        .collect();
    let mut last_seen = [0usize; 256];
    let mut scores = [0usize; MCW_WINDOWS.len()];
    let mut winner = 0;
    let mut tally = PredictionTally::default();

    for (i, &s) in data.iter().enumerate() {
        if i >= start {
            let mut guesses = [None; MCW_WINDOWS.len()];
            for (j, window) in windows.iter().enumerate() {
                if i >= window.width {
                    guesses[j] = window.mode;
                }
            }
            tally.record(guesses[winner] == Some(s));
            for (j, guess) in guesses.iter().enumerate() {
                let Some(g) = *guess else { continue };
                if g == s {
                    scores[j] += 1;
                }
                if scores[j] >= scores[winner] {
                    winner = j;
                }
            }
        }
        last_seen[s as usize] = i + 1;
        for window in &mut windows {
            window.push(data, i, &last_seen);
        }
    }

    tally.finish(alphabet_size)
}

// ---------------------------------------------------------------------------
// Lag
// ---------------------------------------------------------------------------

const LAG_DEPTH: usize = 128;

/// Lag prediction estimate.
///
/// Sub-predictor `d` guesses the symbol seen `d` steps ago, for `d` up to
/// 128; the best-scoring lag so far makes the prediction.
pub fn lag_estimate(data: &[u8], alphabet_size: usize) -> Estimate {
    if data.len() < 3 {
        return Estimate::NotApplicable;
    }
    let mut scores = [0usize; LAG_DEPTH];
    let mut winner = 0;
    let mut tally = PredictionTally::default();

    for i in 1..data.len() {
        let s = data[i];
        tally.record(data[i - winner - 1] == s);
        for d in 0..LAG_DEPTH.min(i) {
            if data[i - d - 1] == s {
                scores[d] += 1;
            }
            if scores[d] >= scores[winner] {
                winner = d;
            }
        }
    }

    tally.finish(alphabet_size)
}

// ---------------------------------------------------------------------------
// MultiMMC
// ---------------------------------------------------------------------------

const MMC_DEPTH: usize = 16;
const MMC_MAX_ENTRIES: usize = 100_000;

/// Multi Markov model with counting prediction estimate.
///
/// Sub-predictor `d` learns which symbol follows each `d`-symbol context
/// (d = 1..16, at most 100,000 contexts each) and predicts the most frequent
/// follower of the current context.
pub fn multi_mmc_estimate(data: &[u8], alphabet_size: usize) -> Estimate {
    if data.len() < 3 {
        return Estimate::NotApplicable;
    }
    let mut models: Vec<HashMap<u128, FollowerCounts>> = vec![HashMap::new(); MMC_DEPTH];
    let mut scores = [0usize; MMC_DEPTH];
    let mut winner = 0;
    let mut tally = PredictionTally::default();

    for i in 2..data.len() {
        // Learn: context data[i-1-d..i-1] was followed by data[i-1].
        let follower = data[i - 1];
        let mut key = 0u128;
        for d in 1..=MMC_DEPTH.min(i - 1) {
            key |= (data[i - 1 - d] as u128) << (8 * (d - 1));
            let model = &mut models[d - 1];
            if let Some(entry) = model.get_mut(&key) {
                entry.bump(follower);
            } else if model.len() < MMC_MAX_ENTRIES {
                model.entry(key).or_default().bump(follower);
            }
        }

        // Predict data[i] from context data[i-d..i].
        let s = data[i];
        let mut guesses = [None; MMC_DEPTH];
        let mut key = 0u128;
        for d in 1..=MMC_DEPTH.min(i) {
            key |= (data[i - d] as u128) << (8 * (d - 1));
            guesses[d - 1] = models[d - 1]
                .get(&key)
                .and_then(FollowerCounts::best)
                .map(|(y, _)| y);
        }
        tally.record(guesses[winner] == Some(s));
        for (d, guess) in guesses.iter().enumerate() {
            let Some(g) = *guess else { continue };
            if g == s {
                scores[d] += 1;
            }
            if scores[d] >= scores[winner] {
                winner = d;
            }
        }
    }

    tally.finish(alphabet_size)
}

// ---------------------------------------------------------------------------
// LZ78Y
// ---------------------------------------------------------------------------

const LZ_MAX_PREFIX: usize = 16;
const LZ_MAX_DICTIONARY: usize = 65_536;

/// LZ78Y prediction estimate.
///
/// Builds a dictionary of every prefix of up to 16 symbols seen so far
/// (capped at 65,536 entries) and predicts the follower with the highest
/// count among all matching prefixes, longer prefixes winning ties.
pub fn lz78y_estimate(data: &[u8], alphabet_size: usize) -> Estimate {
    if data.len() <= LZ_MAX_PREFIX + 2 {
        return Estimate::NotApplicable;
    }
    let mut dictionary: HashMap<(usize, u128), FollowerCounts> = HashMap::new();
    let mut tally = PredictionTally::default();

    for i in (LZ_MAX_PREFIX + 1)..data.len() {
        // Learn: prefixes ending at data[i-2] were followed by data[i-1].
        let follower = data[i - 1];
        let mut key = 0u128;
        let mut keys = [0u128; LZ_MAX_PREFIX];
        for j in 1..=LZ_MAX_PREFIX {
            key |= (data[i - 1 - j] as u128) << (8 * (j - 1));
            keys[j - 1] = key;
        }
        for j in (1..=LZ_MAX_PREFIX).rev() {
            let entry_key = (j, keys[j - 1]);
            if !dictionary.contains_key(&entry_key) && dictionary.len() < LZ_MAX_DICTIONARY {
                dictionary.insert(entry_key, FollowerCounts::default());
            }
            if let Some(entry) = dictionary.get_mut(&entry_key) {
                entry.bump(follower);
            }
        }

        // Predict data[i] from prefixes ending at data[i-1].
        let mut key = 0u128;
        for j in 1..=LZ_MAX_PREFIX {
            key |= (data[i - j] as u128) << (8 * (j - 1));
            keys[j - 1] = key;
        }
        let mut prediction = None;
        let mut max_count = 0;
        for j in (1..=LZ_MAX_PREFIX).rev() {
            if let Some((y, c)) = dictionary.get(&(j, keys[j - 1])).and_then(FollowerCounts::best) {
                if c > max_count {
                    prediction = Some(y);
                    max_count = c;
                }
            }
        }
        tally.record(prediction == Some(data[i]));
    }

    tally.finish(alphabet_size)
}
