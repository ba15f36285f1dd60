// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed-interval algebra along a span's primary axis.
//!
//! Every placement operation reduces to a handful of one-dimensional
//! questions: which part of a span is still free, which free point is closest
//! to where the user dropped an item, and whether two items are too close.
//! The helpers here answer those questions for closed intervals `[start, end]`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tolerance used for all boundary and gap comparisons.
///
/// Positions are millimetres; anything below a micron is noise from
/// floating-point arithmetic and must not flip a comparison.
pub const EPSILON: f64 = 1e-6;

/// A closed interval `[start, end]` on a span's primary axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

/// A set of disjoint intervals. Spans rarely fragment into more than a few
/// free pieces, so the first four live inline.
pub type IntervalSet = SmallVec<[Interval; 4]>;

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Interval starting at `position` and extending `size` along the axis.
    pub fn from_extent(position: f64, size: f64) -> Self {
        Self {
            start: position,
            end: position + size,
        }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// `start > end`, or either bound is NaN/infinite.
    pub fn is_malformed(&self) -> bool {
        !self.start.is_finite() || !self.end.is_finite() || self.start > self.end
    }

    /// Clamp `value` into this interval.
    ///
    /// Unlike [`f64::clamp`] this never panics: a malformed interval clamps to
    /// its start.
    pub fn clamp(&self, value: f64) -> f64 {
        if self.start > self.end {
            return self.start;
        }
        value.max(self.start).min(self.end)
    }

    /// Absolute distance from `value` to the nearest point of the interval.
    pub fn distance_to(&self, value: f64) -> f64 {
        (self.clamp(value) - value).abs()
    }
}

/// Subtract every `forbidden` interval from the disjoint `base` set.
///
/// A base piece fully covered by a forbidden interval is removed, a partially
/// covered piece is split into at most two remaining pieces, and pieces that do
/// not overlap are left untouched. The remaining pieces keep the forbidden
/// endpoints, so a point lying exactly on a forbidden boundary stays available.
///
/// Malformed forbidden ranges (`start > end` or non-finite bounds) are treated
/// as empty.
pub fn subtract(base: &[Interval], forbidden: &[Interval]) -> IntervalSet {
    let mut current: IntervalSet = base.iter().copied().collect();

    for f in forbidden {
        if f.is_malformed() {
            tracing::trace!(start = f.start, end = f.end, "skipping malformed forbidden range");
            continue;
        }

        let mut next = IntervalSet::new();
        for piece in current.drain(..) {
            // Disjoint: untouched.
            if f.end < piece.start || f.start > piece.end {
                next.push(piece);
                continue;
            }
            // Fully covered: removed.
            if f.start <= piece.start && f.end >= piece.end {
                continue;
            }
            if f.start > piece.start {
                next.push(Interval::new(piece.start, f.start));
            }
            if f.end < piece.end {
                next.push(Interval::new(f.end, piece.end));
            }
        }
        current = next;
    }

    current
}

/// Clamp `target` into whichever interval lies closest to it.
///
/// Ties resolve to the interval that appears first in `intervals`. Returns
/// `None` when the set is empty.
pub fn nearest_point(intervals: &[Interval], target: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;

    for interval in intervals {
        let candidate = interval.clamp(target);
        let distance = (candidate - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(point, _)| point)
}

/// Whether `[a0, a1]` and `[b0, b1]` are closer than `gap`.
///
/// Intervals separated by exactly `gap` do not conflict.
pub fn conflicts(a0: f64, a1: f64, b0: f64, b1: f64, gap: f64) -> bool {
    let a_before_b = a1 + gap <= b0 + EPSILON;
    let b_before_a = b1 + gap <= a0 + EPSILON;
    !(a_before_b || b_before_a)
}
