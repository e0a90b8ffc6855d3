//! Entropic-statistic estimates. These three apply to bit strings only; any
//! symbol above 1 makes the estimate not applicable.

use log::debug;

use crate::{Estimate, Z_ALPHA, is_bit_string};

// ---------------------------------------------------------------------------
// Collision
// ---------------------------------------------------------------------------

/// Collision estimate over a bit string.
///
/// Walks the sequence measuring the distance to the first repeated value
/// (2 or 3 for binary data), bounds the mean distance from below and solves
/// `2 + 2p(1 - p) = X'` for the most likely bit probability.
pub fn collision_estimate(bits: &[u8]) -> Estimate {
    if !is_bit_string(bits) {
        return Estimate::NotApplicable;
    }
    let n = bits.len();
    let mut i = 0;
    let mut v = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    while i + 1 < n {
        let t = if bits[i] == bits[i + 1] {
            2
        } else if i + 2 < n {
            3
        } else {
            break;
        };
        v += 1;
        sum += t as f64;
        sum_sq += (t * t) as f64;
        i += t;
    }
    if v < 2 {
        return Estimate::NotApplicable;
    }

    let vf = v as f64;
    let mean = sum / vf;
    let sigma = ((sum_sq - sum * mean) / (vf - 1.0)).max(0.0).sqrt();
    let mean_lower = mean - Z_ALPHA * sigma / vf.sqrt();

    let p = if mean_lower >= 2.5 {
        0.5
    } else {
        (0.5 + (1.25 - 0.5 * mean_lower).sqrt()).min(1.0)
    };
    Estimate::from_probability(p)
}

// ---------------------------------------------------------------------------
// Markov
// ---------------------------------------------------------------------------

/// Number of bits in each sequence class considered by the Markov estimate.
const MARKOV_SEQUENCE_BITS: f64 = 128.0;

/// Markov estimate over a bit string.
///
/// Fits a first-order Markov model and finds the most likely 128-bit output
/// among the six sequence classes that can maximise it (constant, alternating,
/// and a single switch at either end). Computed in the log domain so long
/// runs never underflow.
pub fn markov_estimate(bits: &[u8]) -> Estimate {
    let n = bits.len();
    if n < 2 || !is_bit_string(bits) {
        return Estimate::NotApplicable;
    }

    let ones = bits.iter().filter(|&&b| b == 1).count();
    let p1 = ones as f64 / n as f64;
    let p0 = 1.0 - p1;

    let mut transitions = [[0u64; 2]; 2];
    for w in bits.windows(2) {
        transitions[w[0] as usize][w[1] as usize] += 1;
    }
    let row = |from: usize| -> (f64, f64) {
        let total = transitions[from][0] + transitions[from][1];
        if total == 0 {
            (0.0, 0.0)
        } else {
            (
                transitions[from][0] as f64 / total as f64,
                transitions[from][1] as f64 / total as f64,
            )
        }
    };
    let (p00, p01) = row(0);
    let (p10, p11) = row(1);

    // log2(0) is -inf, which simply rules a class out.
    let (l0, l1) = (p0.log2(), p1.log2());
    let (l00, l01, l10, l11) = (p00.log2(), p01.log2(), p10.log2(), p11.log2());
    let classes = [
        l0 + 127.0 * l00,
        l0 + 64.0 * l01 + 63.0 * l10,
        l0 + l01 + 126.0 * l11,
        l1 + l10 + 126.0 * l00,
        l1 + 64.0 * l10 + 63.0 * l01,
        l1 + 127.0 * l11,
    ];
    let log_p_max = classes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !log_p_max.is_finite() {
        return Estimate::NotApplicable;
    }

    let h = (-log_p_max / MARKOV_SEQUENCE_BITS).clamp(0.0, 1.0);
    Estimate::Applicable(h)
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

/// Bits per compression block.
const BLOCK_BITS: usize = 6;
/// Blocks used to seed the dictionary.
const DICTIONARY_BLOCKS: usize = 1000;
/// Correction factor applied to the standard deviation of log distances.
const SIGMA_SCALE: f64 = 0.5907;
const BISECTION_STEPS: usize = 64;

/// Compression estimate over a bit string (Maurer universal statistic).
///
/// Groups bits into 6-bit blocks, measures the log2 distance since each
/// block value last appeared, and finds the block probability whose expected
/// statistic matches the lower-bounded observed mean. Not applicable when the
/// sample is too short to fill the dictionary or when the observed statistic
/// exceeds what a uniform source would produce.
pub fn compression_estimate(bits: &[u8]) -> Estimate {
    if !is_bit_string(bits) {
        return Estimate::NotApplicable;
    }
    let blocks: Vec<usize> = bits
        .chunks_exact(BLOCK_BITS)
        .map(|chunk| chunk.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize))
        .collect();
    let total = blocks.len();
    if total <= DICTIONARY_BLOCKS + 1 {
        return Estimate::NotApplicable;
    }
    let v = total - DICTIONARY_BLOCKS;

    // Positions are 1-based; 0 means "not seen yet".
    let mut last_seen = [0usize; 1 << BLOCK_BITS];
    for (i, &b) in blocks[..DICTIONARY_BLOCKS].iter().enumerate() {
        last_seen[b] = i + 1;
    }
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for (offset, &b) in blocks[DICTIONARY_BLOCKS..].iter().enumerate() {
        let pos = DICTIONARY_BLOCKS + offset + 1;
        let distance = pos - last_seen[b];
        last_seen[b] = pos;
        let lg = (distance as f64).log2();
        sum += lg;
        sum_sq += lg * lg;
    }

    let vf = v as f64;
    let mean = sum / vf;
    let sigma = SIGMA_SCALE * (sum_sq / (vf - 1.0) - mean * mean).max(0.0).sqrt();
    let target = mean - Z_ALPHA * sigma / vf.sqrt();

    let others = ((1usize << BLOCK_BITS) - 1) as f64;
    let expected = |p: f64| {
        let q = (1.0 - p) / others;
        block_expectation(p, total) + others * block_expectation(q, total)
    };

    let mut lo = 1.0 / (1usize << BLOCK_BITS) as f64;
    let mut hi = 1.0;
    if target > expected(lo) {
        debug!("compression: statistic {target:.4} exceeds the uniform-source expectation");
        return Estimate::NotApplicable;
    }
    if target <= 0.0 {
        return Estimate::Applicable(0.0);
    }
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if expected(mid) > target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    match Estimate::from_probability(hi) {
        Estimate::Applicable(h) => Estimate::Applicable(h / BLOCK_BITS as f64),
        other => other,
    }
}

/// Expected mean log2 distance contributed by one block value of probability
/// `z`, averaged over the test section of a `total`-block sequence.
///
/// Evaluates `(1/v) Σ_t Σ_{u<=t} log2(u) F(z, t, u)` in a single pass by
/// carrying the partial sum over `u < t`.
fn block_expectation(z: f64, total: usize) -> f64 {
    let v = (total - DICTIONARY_BLOCKS) as f64;
    let q = 1.0 - z;
    let mut partial = 0.0;
    let mut q_pow = 1.0;
    let mut acc = 0.0;
    for t in 1..=total {
        let lg = (t as f64).log2();
        if t > DICTIONARY_BLOCKS {
            acc += z * z * partial + z * lg * q_pow;
        }
        partial += lg * q_pow;
        q_pow *= q;
    }
    acc / v
}
