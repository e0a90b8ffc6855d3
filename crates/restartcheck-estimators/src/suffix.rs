//! Suffix array and LCP machinery shared by the tuple estimates.
//!
//! Tuple counts for every length come out of one pass over the LCP intervals,
//! so a sample with very long repeats (constant data, short cycles) costs no
//! more than a random one.

/// Suffix array by prefix doubling.
pub(crate) fn suffix_array(data: &[u8]) -> Vec<usize> {
    let n = data.len();
    let mut sa: Vec<usize> = (0..n).collect();
    if n == 0 {
        return sa;
    }
    let mut rank: Vec<usize> = data.iter().map(|&b| b as usize).collect();
    let mut next = vec![0usize; n];
    let mut k = 1;
    loop {
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] + 1 } else { 0 });
        sa.sort_unstable_by_key(|&i| key(i));
        next[sa[0]] = 0;
        for w in 1..n {
            next[sa[w]] = next[sa[w - 1]] + usize::from(key(sa[w - 1]) != key(sa[w]));
        }
        std::mem::swap(&mut rank, &mut next);
        if rank[sa[n - 1]] == n - 1 || k >= n {
            break;
        }
        k *= 2;
    }
    sa
}

/// Kasai LCP: `lcp[i]` is the common prefix length of suffixes `sa[i - 1]`
/// and `sa[i]`; `lcp[0]` is 0.
pub(crate) fn lcp_array(data: &[u8], sa: &[usize]) -> Vec<usize> {
    let n = data.len();
    let mut rank = vec![0usize; n];
    for (i, &s) in sa.iter().enumerate() {
        rank[s] = i;
    }
    let mut lcp = vec![0usize; n];
    let mut h = 0usize;
    for i in 0..n {
        if rank[i] == 0 {
            h = 0;
            continue;
        }
        let j = sa[rank[i] - 1];
        while i + h < n && j + h < n && data[i + h] == data[j + h] {
            h += 1;
        }
        lcp[rank[i]] = h;
        h = h.saturating_sub(1);
    }
    lcp
}

/// Per-length repetition statistics of a sample.
#[derive(Debug, Clone)]
pub(crate) struct RepeatProfile {
    len: usize,
    /// Length of the longest substring occurring at least twice.
    longest_repeat: usize,
    /// `max_count[w]`: occurrences of the most common `w`-tuple.
    max_count: Vec<usize>,
    /// `colliding_pairs[w]`: `Σ C(c, 2)` over the counts `c` of all `w`-tuples.
    colliding_pairs: Vec<u64>,
}

impl RepeatProfile {
    pub(crate) fn new(data: &[u8]) -> Self {
        let n = data.len();
        let sa = suffix_array(data);
        let lcp = lcp_array(data, &sa);
        let longest_repeat = lcp.iter().copied().max().unwrap_or(0);

        let mut best_at = vec![0usize; longest_repeat + 2];
        let mut pair_delta = vec![0i64; longest_repeat + 2];

        // Each lcp-interval of depth `d` whose parent has depth `p` is a
        // maximal block of suffixes sharing every prefix length in (p, d].
        let mut record = |depth: usize, parent: usize, size: usize| {
            best_at[depth] = best_at[depth].max(size);
            let pairs = (size * (size - 1) / 2) as i64;
            pair_delta[parent + 1] += pairs;
            pair_delta[depth + 1] -= pairs;
        };

        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        for i in 1..=n {
            let cur = if i < n { lcp[i] } else { 0 };
            let mut left = i - 1;
            while let Some(&(depth, lb)) = stack.last() {
                if cur >= depth {
                    break;
                }
                stack.pop();
                let parent = stack.last().map_or(0, |&(d, _)| d).max(cur);
                record(depth, parent, i - lb);
                left = lb;
            }
            if stack.last().is_none_or(|&(d, _)| cur > d) {
                stack.push((cur, left));
            }
        }

        let mut max_count = vec![0usize; longest_repeat + 2];
        let mut running = 1usize;
        for w in (1..=longest_repeat + 1).rev() {
            running = running.max(best_at[w]);
            max_count[w] = if w <= n { running } else { 0 };
        }

        let mut colliding_pairs = vec![0u64; longest_repeat + 2];
        let mut acc = 0i64;
        for w in 1..=longest_repeat + 1 {
            acc += pair_delta[w];
            colliding_pairs[w] = acc.max(0) as u64;
        }

        Self {
            len: n,
            longest_repeat,
            max_count,
            colliding_pairs,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn longest_repeat(&self) -> usize {
        self.longest_repeat
    }

    /// Occurrences of the most common tuple of length `w`.
    pub(crate) fn max_count(&self, w: usize) -> usize {
        match w {
            0 => 0,
            w if w > self.len => 0,
            w => self.max_count.get(w).copied().unwrap_or(1),
        }
    }

    /// Number of position pairs holding equal tuples of length `w`.
    pub(crate) fn colliding_pairs(&self, w: usize) -> u64 {
        self.colliding_pairs.get(w).copied().unwrap_or(0)
    }
}
