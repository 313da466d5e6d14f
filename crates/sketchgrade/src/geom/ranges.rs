//! Closed x-intervals and their unions.

use std::cmp::Ordering;

/// Closed interval `[lo, hi]` with `lo <= hi`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub lo: f64,
    pub hi: f64,
}

impl Range {
    /// Build from two bounds in any order.
    #[inline]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.hi - self.lo
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }

    /// Length of the common part with `[lo, hi]`.
    #[inline]
    pub fn overlap(&self, lo: f64, hi: f64) -> f64 {
        (self.hi.min(hi) - self.lo.max(lo)).max(0.0)
    }

    pub fn intersect(&self, lo: f64, hi: f64) -> Option<Range> {
        let a = self.lo.max(lo);
        let b = self.hi.min(hi);
        (a <= b).then_some(Range { lo: a, hi: b })
    }
}

/// Sort by lower bound and merge overlapping or touching intervals.
pub fn collapse_ranges(ranges: &[Range]) -> Vec<Range> {
    let mut sorted: Vec<Range> = ranges
        .iter()
        .copied()
        .filter(|r| !r.lo.is_nan() && !r.hi.is_nan())
        .collect();
    sorted.sort_by(|a, b| a.lo.partial_cmp(&b.lo).unwrap_or(Ordering::Equal));
    let mut out: Vec<Range> = Vec::with_capacity(sorted.len());
    for r in sorted {
        match out.last_mut() {
            Some(last) if r.lo <= last.hi => last.hi = last.hi.max(r.hi),
            _ => out.push(r),
        }
    }
    out
}

/// Total length of `[lo, hi]` covered by the union of `ranges`.
pub fn covered_length(ranges: &[Range], lo: f64, hi: f64) -> f64 {
    collapse_ranges(ranges)
        .iter()
        .map(|r| r.overlap(lo, hi))
        .sum()
}

/// Total length of `[lo, hi]` not covered by `ranges`.
pub fn gap_length(ranges: &[Range], lo: f64, hi: f64) -> f64 {
    ((hi - lo) - covered_length(ranges, lo, hi)).max(0.0)
}
