//! Binomial upper tail by forward recurrence.
//!
//! `C(1000, 500)` is about `2.7e299`, within `f64` range, but the factorials
//! it is built from are not. The coefficient is therefore grown one ratio at
//! a time and never formed from factorials. The recurrence stays finite for
//! every trial count up to [`MAX_TRIALS`].

/// Largest trial count for which the running coefficient cannot overflow.
pub const MAX_TRIALS: usize = 1000;

/// `P(X >= threshold)` for `X ~ Binomial(trials, p)`.
///
/// `threshold == 0` is certain (1.0) and `threshold > trials` is impossible
/// (0.0). `p` is clamped to `[0, 1]`; the result always lies in `[0, 1]`.
pub fn binomial_tail(trials: usize, p: f64, threshold: usize) -> f64 {
    if threshold == 0 {
        return 1.0;
    }
    if threshold > trials {
        return 0.0;
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let q = 1.0 - p;
    let n = trials as f64;

    // C(n, threshold - 1)
    let mut coefficient = 1.0f64;
    for i in 0..threshold - 1 {
        coefficient *= (n - i as f64) / (threshold - 1 - i) as f64;
    }

    let mut tail = 0.0;
    for j in threshold..=trials {
        coefficient *= (n - j as f64 + 1.0) / j as f64;
        tail += coefficient * p.powi(j as i32) * q.powi((trials - j) as i32);
    }

    if tail.is_nan() { 0.0 } else { tail.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{Binomial, DiscreteCDF};

    fn reference(trials: usize, p: f64, threshold: usize) -> f64 {
        let dist = Binomial::new(p, trials as u64).unwrap();
        if threshold == 0 {
            1.0
        } else {
            dist.sf(threshold as u64 - 1)
        }
    }

    #[test]
    fn matches_reference_distribution() {
        let p = 2f64.powf(-0.5);
        for &x in &[1usize, 300, 520, 650, 707, 740, 760, 800, 1000] {
            let ours = binomial_tail(1000, p, x);
            let theirs = reference(1000, p, x);
            assert!((ours - theirs).abs() < 1e-9, "x={x}: {ours} vs {theirs}");
        }
    }

    #[test]
    fn matches_reference_fair_coin() {
        for &x in &[400usize, 480, 500, 520, 560, 600] {
            let ours = binomial_tail(1000, 0.5, x);
            let theirs = reference(1000, 0.5, x);
            assert!((ours - theirs).abs() < 1e-9, "x={x}: {ours} vs {theirs}");
        }
    }

    #[test]
    fn small_cases_exact() {
        // Binomial(4, 0.5): P(X >= 3) = 5/16
        assert!((binomial_tail(4, 0.5, 3) - 5.0 / 16.0).abs() < 1e-15);
        // P(X >= 1) = 1 - q^n
        assert!((binomial_tail(10, 0.1, 1) - (1.0 - 0.9f64.powi(10))).abs() < 1e-12);
        assert!((binomial_tail(10, 0.1, 10) - 1e-10).abs() < 1e-20);
    }

    #[test]
    fn edge_thresholds() {
        assert_eq!(binomial_tail(1000, 0.3, 0), 1.0);
        assert_eq!(binomial_tail(1000, 0.3, 1001), 0.0);
        assert_eq!(binomial_tail(1000, 0.3, 5000), 0.0);
    }

    #[test]
    fn degenerate_probabilities() {
        assert!((binomial_tail(1000, 1.0, 1000) - 1.0).abs() < 1e-12);
        assert_eq!(binomial_tail(1000, 0.0, 1), 0.0);
        assert_eq!(binomial_tail(1000, f64::NAN, 1), 0.0);
    }

    #[test]
    fn monotone_and_bounded() {
        for &h in &[0.1f64, 0.5, 1.0, 3.0, 8.0] {
            let p = 2f64.powf(-h);
            let mut prev = 1.0;
            for x in 0..=MAX_TRIALS + 1 {
                let t = binomial_tail(MAX_TRIALS, p, x);
                assert!((0.0..=1.0).contains(&t), "h={h} x={x}: {t}");
                assert!(t <= prev + 1e-10, "h={h} x={x}: {t} > {prev}");
                prev = t;
            }
        }
    }
}
