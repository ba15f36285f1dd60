// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic two-pass repair of a span's items.
//!
//! Pass 1 fixes every item against the span boundaries on its own. Pass 2
//! walks the items left to right and pushes each one clear of its left
//! neighbour. An item that no longer fits after the push is disabled in
//! place, never deleted, so the user can repair it by hand.
//!
//! Running the corrector on its own output changes nothing.

use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::interval::{conflicts, EPSILON};
use crate::item::{DisableReason, Item, ItemId};
use crate::span::{SpanId, SpanMetrics, SpanTable};

/// What a correction pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Items whose primary or vertical position changed.
    pub moved: Vec<ItemId>,
    /// Items whose primary size or vertical extent shrank.
    pub resized: Vec<ItemId>,
    /// Items disabled because they could not be kept valid.
    pub disabled: Vec<ItemId>,
}

impl CorrectionReport {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.resized.is_empty() && self.disabled.is_empty()
    }

    fn merge(&mut self, other: CorrectionReport) {
        self.moved.extend(other.moved);
        self.resized.extend(other.resized);
        self.disabled.extend(other.disabled);
    }

    fn finish(mut self) -> Self {
        for ids in [&mut self.moved, &mut self.resized, &mut self.disabled] {
            ids.sort();
            ids.dedup();
        }
        self
    }
}

/// Correct every enabled item on `span_id`. Items on other spans are untouched.
pub fn correct_span(
    span_id: &SpanId,
    span: &SpanMetrics,
    items: &mut [Item],
    config: &PlacementConfig,
) -> CorrectionReport {
    let mut report = CorrectionReport::default();

    let indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.enabled && &item.span == span_id)
        .map(|(i, _)| i)
        .collect();

    for &i in &indices {
        clamp_to_bounds(&mut items[i], span, config, &mut report);
    }

    resolve_overlaps(&indices, span, items, config, &mut report);

    let report = report.finish();
    if !report.is_empty() {
        tracing::debug!(
            span = %span_id,
            moved = report.moved.len(),
            resized = report.resized.len(),
            disabled = report.disabled.len(),
            "corrected span"
        );
    }
    report
}

/// Correct every span in the table.
pub fn correct_all(spans: &SpanTable, items: &mut [Item], config: &PlacementConfig) -> CorrectionReport {
    let mut report = CorrectionReport::default();
    for span_id in spans.ids() {
        if let Some(metrics) = spans.get(&span_id) {
            report.merge(correct_span(&span_id, metrics, items, config));
        }
    }
    report.finish()
}

/// Pass 1: boundary clamp for a single item.
///
/// Position moves forward to the edge gap but never backward; size yields to
/// whatever room remains. Vertically the item is lowered first and only shrunk
/// when lowering would put it below the floor. An item that would be left with
/// no primary room or no headroom is disabled in place instead.
fn clamp_to_bounds(
    item: &mut Item,
    span: &SpanMetrics,
    config: &PlacementConfig,
    report: &mut CorrectionReport,
) {
    let max_size = span.max_item_size();
    if item.size > max_size + EPSILON && max_size + EPSILON < config.min_item_size {
        tracing::debug!(item = %item.id, usable = max_size, "span too short for item");
        disable(item, report, DisableReason::SpanTooShort {
            usable: max_size,
            required: config.min_item_size,
        });
        return;
    }

    let headroom = span.usable_height.map(|height| config.ceiling(height) - config.vertical_floor);
    if let (Some(_), Some(available)) = (item.shape.vertical(), headroom) {
        if available <= EPSILON {
            tracing::debug!(item = %item.id, available, "no headroom for item");
            disable(item, report, DisableReason::NoHeadroom {
                available: available.max(0.0),
            });
            return;
        }
    }

    let position = item.position.max(span.min_position());
    let room = span.max_end() - position;
    if room <= EPSILON {
        tracing::debug!(item = %item.id, position, "item starts past the span end");
        disable(item, report, DisableReason::NoRoom {
            available: room.max(0.0),
            required: config.min_item_size,
        });
        return;
    }

    let original_position = item.position;
    let original_size = item.size;

    item.position = position;
    item.size = item.size.min(max_size).min(room);

    if item.position != original_position {
        report.moved.push(item.id);
    }
    if item.size < original_size {
        report.resized.push(item.id);
    }

    let Some(height) = span.usable_height else {
        return;
    };
    let floor = config.vertical_floor;
    let ceiling = config.ceiling(height);
    let id = item.id;

    if let Some(vertical) = item.shape.vertical_mut() {
        let original = *vertical;

        if vertical.position < floor {
            vertical.position = floor;
        }
        if vertical.top() > ceiling {
            let lowered = ceiling - vertical.extent;
            if lowered >= floor {
                vertical.position = lowered;
            } else {
                vertical.position = floor;
                vertical.extent = ceiling - floor;
            }
        }

        if vertical.position != original.position {
            report.moved.push(id);
        }
        if vertical.extent < original.extent {
            report.resized.push(id);
        }
    }
}

fn disable(item: &mut Item, report: &mut CorrectionReport, reason: DisableReason) {
    item.disable(reason);
    report.disabled.push(item.id);
}

/// Pass 2: left-to-right overlap resolution.
fn resolve_overlaps(
    indices: &[usize],
    span: &SpanMetrics,
    items: &mut [Item],
    config: &PlacementConfig,
    report: &mut CorrectionReport,
) {
    let mut order: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| items[i].enabled)
        .collect();
    order.sort_by(|&a, &b| {
        items[a]
            .position
            .total_cmp(&items[b].position)
            .then_with(|| items[a].id.cmp(&items[b].id))
    });

    let mut previous: Option<(f64, f64)> = None;

    for i in order {
        let item = &mut items[i];

        if let Some((prev_start, prev_end)) = previous {
            // The left neighbour may itself have been pushed past this item's
            // start, so anything starting before its far clearance moves.
            let crowded = item.position < prev_start
                || conflicts(prev_start, prev_end, item.position, item.position + item.size, span.min_gap);
            if crowded {
                let original_position = item.position;
                let target = prev_end + span.min_gap;
                let room = span.max_end() - target;

                if item.size > room && room + EPSILON < config.min_item_size {
                    disable(item, report, DisableReason::NoRoom {
                        available: room.max(0.0),
                        required: config.min_item_size,
                    });
                    continue;
                }

                item.position = target;
                if item.position != original_position {
                    report.moved.push(item.id);
                }
                if item.size > room {
                    item.size = room;
                    report.resized.push(item.id);
                }
            }
        }

        previous = Some((item.position, item.position + item.size));
    }
}
