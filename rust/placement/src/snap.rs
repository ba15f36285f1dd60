// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest valid position for a single item.
//!
//! The feasible region for the item's leading edge starts as
//! `[edge_gap, length - size - edge_gap]`. Every neighbour removes the zone in
//! which the item, at its current size, would come closer than `min_gap`.
//! Whatever is left is searched for the point closest to where the user wants
//! the item.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::{nearest_point, subtract, Interval};
use crate::item::{enabled_on_span, ItemId, PositionedItem};
use crate::span::SpanMetrics;

/// Result of a snap request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapOutcome {
    pub position: f64,
    /// `false` when no conflict-free position exists and the position is only
    /// clamped into the span; validation may still flag it.
    pub exact: bool,
}

/// Leading-edge positions at which an item of `size` stays inside the span.
pub fn base_interval(span: &SpanMetrics, size: f64) -> Interval {
    Interval::new(span.min_position(), span.max_end() - size)
}

/// Zone in which an item of `size` would crowd `neighbour`.
pub fn forbidden_zone(neighbour: Interval, size: f64, min_gap: f64) -> Interval {
    Interval::new(neighbour.start - min_gap - size, neighbour.end + min_gap)
}

/// Nearest feasible leading-edge position for an item of `size` near
/// `desired`, given the primary intervals of its neighbours.
pub fn snap_position(
    span: &SpanMetrics,
    size: f64,
    neighbours: &[Interval],
    desired: f64,
) -> SnapOutcome {
    let base = base_interval(span, size);
    let forbidden: Vec<Interval> = neighbours
        .iter()
        .map(|n| forbidden_zone(*n, size, span.min_gap))
        .collect();

    let feasible = if base.is_malformed() {
        Default::default()
    } else {
        subtract(&[base], &forbidden)
    };

    match nearest_point(&feasible, desired) {
        Some(position) => SnapOutcome {
            position,
            exact: true,
        },
        None => {
            tracing::debug!(size, desired, "no conflict-free position, clamping into span");
            SnapOutcome {
                position: base.clamp(desired),
                exact: false,
            }
        }
    }
}

/// Snap item `id` towards `desired` against every other enabled item on its
/// span.
pub fn snap_item<I: PositionedItem>(
    span: &SpanMetrics,
    items: &[I],
    id: ItemId,
    desired: f64,
) -> Result<SnapOutcome> {
    let target = items
        .iter()
        .find(|item| item.id() == id)
        .ok_or(Error::ItemNotFound(id))?;

    let neighbours: Vec<Interval> = enabled_on_span(items, target.span())
        .into_iter()
        .filter(|item| item.id() != id)
        .map(|item| item.primary())
        .collect();

    Ok(snap_position(span, target.size(), &neighbours, desired))
}
