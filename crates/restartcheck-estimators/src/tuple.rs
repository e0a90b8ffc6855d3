//! t-Tuple and longest-repeated-substring estimates.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::suffix::RepeatProfile;
use crate::{Estimate, upper_bound};

/// A tuple length is used by the t-tuple estimate while its most common
/// tuple occurs at least this many times.
pub const TUPLE_CUTOFF: usize = 35;

/// Result of the t-tuple estimate.
///
/// `u` is the smallest tuple length whose most common tuple occurs fewer than
/// [`TUPLE_CUTOFF`] times; the LRS estimate starts from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TupleEstimate {
    pub estimate: Estimate,
    pub u: usize,
}

/// t-Tuple estimate.
///
/// For every tuple length `i` up to `t` (the largest length whose most common
/// tuple still occurs [`TUPLE_CUTOFF`] times) the per-symbol probability
/// `(Q[i] / (L - i + 1))^(1/i)` is computed; the maximum is bounded above and
/// converted to bits.
pub fn t_tuple_estimate(data: &[u8]) -> TupleEstimate {
    let profile = RepeatProfile::new(data);
    tuple_from_profile(&profile)
}

fn tuple_from_profile(profile: &RepeatProfile) -> TupleEstimate {
    let n = profile.len();
    let mut t = 0;
    while profile.max_count(t + 1) >= TUPLE_CUTOFF {
        t += 1;
    }
    if t == 0 {
        return TupleEstimate {
            estimate: Estimate::NotApplicable,
            u: 1,
        };
    }

    let p_hat = (1..=t)
        .map(|i| {
            let p = profile.max_count(i) as f64 / (n - i + 1) as f64;
            p.powf(1.0 / i as f64)
        })
        .fold(0.0, f64::max);

    TupleEstimate {
        estimate: Estimate::from_probability(upper_bound(p_hat, n)),
        u: t + 1,
    }
}

/// Longest repeated substring estimate, starting at tuple length `u`.
///
/// For each length `W` from `u` to the longest repeated length `v`, the
/// collision probability of `W`-tuples is `Σ C(c, 2) / C(L - W + 1, 2)`; its
/// `W`-th root bounds the per-symbol probability. Not applicable when no
/// tuple of length `u` repeats.
pub fn lrs_estimate(data: &[u8], u: usize) -> Estimate {
    let profile = RepeatProfile::new(data);
    lrs_from_profile(&profile, u)
}

fn lrs_from_profile(profile: &RepeatProfile, u: usize) -> Estimate {
    let n = profile.len();
    let v = profile.longest_repeat();
    if u == 0 || u > v {
        debug!("lrs: no repeated tuple of length {u} (longest repeat {v})");
        return Estimate::NotApplicable;
    }

    let p_hat = (u..=v)
        .map(|w| {
            let tuples = (n - w + 1) as f64;
            let total_pairs = tuples * (tuples - 1.0) / 2.0;
            let p = profile.colliding_pairs(w) as f64 / total_pairs;
            p.powf(1.0 / w as f64)
        })
        .fold(0.0, f64::max);

    Estimate::from_probability(upper_bound(p_hat, n))
}
