// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Even distribution of a span's items into labelled slots.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::item::{enabled_on_span, Item, ItemId, PositionedItem};
use crate::span::{SpanId, SpanMetrics};

/// Presentation label of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "label", content = "index", rename_all = "kebab-case")]
pub enum SlotLabel {
    Left,
    Centre,
    Right,
    /// One-based position for spans with four or more items.
    Position(usize),
}

impl SlotLabel {
    /// Label of slot `index` (zero-based) out of `count`.
    pub fn for_slot(index: usize, count: usize) -> Self {
        match (count, index) {
            (1, _) => SlotLabel::Centre,
            (2, 0) => SlotLabel::Left,
            (2, _) => SlotLabel::Right,
            (3, 0) => SlotLabel::Left,
            (3, 1) => SlotLabel::Centre,
            (3, _) => SlotLabel::Right,
            _ => SlotLabel::Position(index + 1),
        }
    }
}

impl std::fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotLabel::Left => f.write_str("Left"),
            SlotLabel::Centre => f.write_str("Centre"),
            SlotLabel::Right => f.write_str("Right"),
            SlotLabel::Position(k) => write!(f, "Position {k}"),
        }
    }
}

/// One evenly spaced slot and the item currently assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub item: ItemId,
    pub position: f64,
    pub label: SlotLabel,
}

/// Slot layout for one span.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotPlan {
    pub slots: Vec<Slot>,
    /// Spacing used between items and at both ends.
    pub gap: f64,
    /// Total length the layout needs: all item sizes plus every gap.
    pub demand: f64,
    /// The layout needs more room than the span has. Slot positions are still
    /// produced; a correction pass is expected to repair the result.
    pub overflow: bool,
}

impl SlotPlan {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_of(&self, id: ItemId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.item == id)
    }
}

/// Compute evenly spaced slots for every enabled item on `span_id`.
///
/// All kinds share the span. Items keep their current left-to-right order.
pub fn compute_slots<I: PositionedItem>(span_id: &SpanId, span: &SpanMetrics, items: &[I]) -> SlotPlan {
    let on_span = enabled_on_span(items, span_id);
    let count = on_span.len();
    if count == 0 {
        return SlotPlan::default();
    }

    let total_size: f64 = on_span.iter().map(|item| item.size()).sum();
    let gap_space = (span.length - total_size).max(0.0);
    let gap_count = (count + 1) as f64;
    let gap = span.min_gap.max((gap_space / gap_count).floor());

    let demand = total_size + gap * gap_count;
    let overflow = demand > span.length;
    if overflow {
        tracing::debug!(span = %span_id, demand, length = span.length, "slot layout overflows span");
    }

    let mut slots = Vec::with_capacity(count);
    let mut offset = 0.0;
    for (index, item) in on_span.iter().enumerate() {
        offset += gap;
        let bounds = Interval::new(span.min_gap, span.length - item.size() - span.min_gap);
        slots.push(Slot {
            index,
            item: item.id(),
            position: bounds.clamp(offset),
            label: SlotLabel::for_slot(index, count),
        });
        offset += item.size();
    }

    SlotPlan {
        slots,
        gap,
        demand,
        overflow,
    }
}

/// Move `id` into slot `slot_index` of `plan`.
///
/// If the slot already belongs to `id` its position is forced to the slot
/// value. If another item holds it, the two items swap their current raw
/// positions; neither is recomputed against the other's size.
pub fn apply_slot(items: &mut [Item], plan: &SlotPlan, id: ItemId, slot_index: usize) -> Result<()> {
    let slot = plan.slots.get(slot_index).ok_or(Error::SlotOutOfRange {
        index: slot_index,
        len: plan.len(),
    })?;
    let target = items
        .iter()
        .position(|item| item.id == id)
        .ok_or(Error::ItemNotFound(id))?;

    if slot.item == id {
        items[target].position = slot.position;
        return Ok(());
    }

    let occupant = items
        .iter()
        .position(|item| item.id == slot.item)
        .ok_or(Error::ItemNotFound(slot.item))?;

    let target_position = items[target].position;
    items[target].position = items[occupant].position;
    items[occupant].position = target_position;
    Ok(())
}

/// Move every item of the plan onto its slot position.
pub fn apply_plan(items: &mut [Item], plan: &SlotPlan) -> Result<()> {
    for slot in &plan.slots {
        let item = items
            .iter_mut()
            .find(|item| item.id == slot.item)
            .ok_or(Error::ItemNotFound(slot.item))?;
        item.position = slot.position;
    }
    Ok(())
}
