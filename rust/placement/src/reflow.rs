// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Proportional repositioning when the building's overall extent changes.
//!
//! Reflow only rescales positions. It does not clamp or resolve overlaps; the
//! validation that follows every change reports anything the rescale broke.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemId};
use crate::span::{SpanAxis, SpanTable};

/// Overall building extent along each axis a span can follow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingExtent {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl BuildingExtent {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    pub fn along(&self, axis: SpanAxis) -> f64 {
        match axis {
            SpanAxis::Width => self.width,
            SpanAxis::Depth => self.depth,
            SpanAxis::Height => self.height,
        }
    }
}

/// Scale ratio per axis between two extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflowRatios {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl ReflowRatios {
    /// Ratios `new / old`. A degenerate old extent counts as `1` so the ratio
    /// stays finite.
    pub fn between(old: &BuildingExtent, new: &BuildingExtent) -> Self {
        Self {
            width: axis_ratio("width", old.width, new.width),
            depth: axis_ratio("depth", old.depth, new.depth),
            height: axis_ratio("height", old.height, new.height),
        }
    }

    pub fn along(&self, axis: SpanAxis) -> f64 {
        match axis {
            SpanAxis::Width => self.width,
            SpanAxis::Depth => self.depth,
            SpanAxis::Height => self.height,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.width == 1.0 && self.depth == 1.0 && self.height == 1.0
    }
}

fn axis_ratio(axis: &str, old: f64, new: f64) -> f64 {
    let old = if old.is_finite() && old > 0.0 {
        old
    } else {
        tracing::warn!(axis, old, "degenerate previous extent, using 1");
        1.0
    };
    if !new.is_finite() || new <= 0.0 {
        tracing::warn!(axis, new, "degenerate new extent, keeping positions");
        return 1.0;
    }
    new / old
}

/// Items rescaled by a reflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflowReport {
    pub scaled: Vec<ItemId>,
}

/// Rescale every enabled item whose span follows an axis that changed.
///
/// `spans` must be the table for the new geometry; it is only consulted for
/// each span's axis.
pub fn reflow(
    items: &mut [Item],
    spans: &SpanTable,
    old: &BuildingExtent,
    new: &BuildingExtent,
) -> ReflowReport {
    let ratios = ReflowRatios::between(old, new);
    reflow_by(items, spans, &ratios)
}

/// Rescale with precomputed ratios.
pub fn reflow_by(items: &mut [Item], spans: &SpanTable, ratios: &ReflowRatios) -> ReflowReport {
    let mut report = ReflowReport::default();
    if ratios.is_identity() {
        return report;
    }

    for item in items.iter_mut().filter(|item| item.enabled) {
        let Some(metrics) = spans.get(&item.span) else {
            continue;
        };
        let ratio = ratios.along(metrics.axis);
        if ratio == 1.0 {
            continue;
        }
        let scaled = (item.position * ratio).round();
        if scaled != item.position {
            item.position = scaled;
            report.scaled.push(item.id);
        }
    }

    report.scaled.sort();
    tracing::debug!(scaled = report.scaled.len(), ?ratios, "reflowed items");
    report
}
