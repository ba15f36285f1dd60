// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Advisory validation of item placements.
//!
//! Validation never blocks anything. It produces a disposable snapshot of
//! which items break a boundary or crowd a neighbour, for the editing surface
//! to display next to the offending item. Rendering and bill-of-materials
//! generation keep working on whatever positions currently exist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::interval::{conflicts, EPSILON};
use crate::item::{enabled_on_span, ItemId, PositionedItem};
use crate::span::{SpanId, SpanMetrics, SpanTable};

/// Structured reason an item is flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum Violation {
    /// Primary position is inside the edge clearance at the span start.
    BeforeSpanStart { min: f64, actual: f64 },
    /// Primary end runs into the edge clearance at the span end.
    PastSpanEnd { max: f64, actual: f64 },
    /// Vertical position below the floor.
    BelowFloor { min: f64, actual: f64 },
    /// Vertical top above the usable height minus the frame allowance.
    AboveCeiling { max: f64, actual: f64 },
    /// Closer than the span's minimum gap to another item.
    Overlap {
        other: ItemId,
        required_gap: f64,
        actual_gap: f64,
    },
    /// The item references a span the current geometry does not produce.
    UnknownSpan { span: SpanId },
}

impl Violation {
    /// Boundary (as opposed to overlap) violation.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Violation::BeforeSpanStart { .. }
                | Violation::PastSpanEnd { .. }
                | Violation::BelowFloor { .. }
                | Violation::AboveCeiling { .. }
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::BeforeSpanStart { min, actual } => {
                write!(f, "starts at {actual:.0}, minimum is {min:.0}")
            }
            Violation::PastSpanEnd { max, actual } => {
                write!(f, "ends at {actual:.0}, maximum is {max:.0}")
            }
            Violation::BelowFloor { min, actual } => {
                write!(f, "bottom at {actual:.0}, minimum is {min:.0}")
            }
            Violation::AboveCeiling { max, actual } => {
                write!(f, "top at {actual:.0}, maximum is {max:.0}")
            }
            Violation::Overlap {
                other,
                required_gap,
                actual_gap,
            } => write!(
                f,
                "{actual_gap:.0} from {other}, needs {required_gap:.0}"
            ),
            Violation::UnknownSpan { span } => write!(f, "span {span} does not exist"),
        }
    }
}

/// Snapshot of all flagged items.
///
/// Each item carries one reason: the first found, boundary checks before
/// overlaps and overlaps in `(position, id)` order. An item crowding several
/// neighbours is reported against its leftmost one, and every neighbour is
/// flagged in its own right, so `invalid_ids` is always complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// First violation found per item.
    pub invalid_by_id: BTreeMap<ItemId, Violation>,
    /// Flagged ids in ascending order.
    pub invalid_ids: Vec<ItemId>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.invalid_ids.is_empty()
    }

    pub fn is_invalid(&self, id: ItemId) -> bool {
        self.invalid_by_id.contains_key(&id)
    }

    pub fn reason(&self, id: ItemId) -> Option<&Violation> {
        self.invalid_by_id.get(&id)
    }

    /// Record a violation unless the item already has one.
    fn flag(&mut self, id: ItemId, violation: Violation) {
        self.invalid_by_id.entry(id).or_insert(violation);
    }

    fn merge(&mut self, other: ValidationResult) {
        for (id, violation) in other.invalid_by_id {
            self.flag(id, violation);
        }
    }

    fn finish(mut self) -> Self {
        // BTreeMap keys are already ascending.
        self.invalid_ids = self.invalid_by_id.keys().copied().collect();
        self
    }
}

/// Validate the enabled items of one span.
///
/// `items` may contain items of other spans; they are ignored.
pub fn validate_span<I: PositionedItem>(
    span_id: &SpanId,
    span: &SpanMetrics,
    items: &[I],
    config: &PlacementConfig,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    let on_span = enabled_on_span(items, span_id);

    for item in &on_span {
        if let Some(violation) = boundary_violation(*item, span, config) {
            result.flag(item.id(), violation);
        }
    }

    for (i, a) in on_span.iter().enumerate() {
        for b in &on_span[i + 1..] {
            if conflicts(a.position(), a.end(), b.position(), b.end(), span.min_gap) {
                let actual_gap = gap_between(*a, *b);
                result.flag(
                    a.id(),
                    Violation::Overlap {
                        other: b.id(),
                        required_gap: span.min_gap,
                        actual_gap,
                    },
                );
                result.flag(
                    b.id(),
                    Violation::Overlap {
                        other: a.id(),
                        required_gap: span.min_gap,
                        actual_gap,
                    },
                );
            }
        }
    }

    result.finish()
}

/// Validate every enabled item against the current span table.
pub fn validate_all<I: PositionedItem>(
    spans: &SpanTable,
    items: &[I],
    config: &PlacementConfig,
) -> ValidationResult {
    let mut result = ValidationResult::default();

    for span_id in spans.ids() {
        if let Some(metrics) = spans.get(&span_id) {
            result.merge(validate_span(&span_id, metrics, items, config));
        }
    }

    for item in items.iter().filter(|i| i.is_enabled()) {
        if !spans.contains(item.span()) {
            tracing::warn!(item = %item.id(), span = %item.span(), "item references unknown span");
            result.flag(
                item.id(),
                Violation::UnknownSpan {
                    span: item.span().clone(),
                },
            );
        }
    }

    result.finish()
}

/// Boundary check on the primary axis, then the vertical axis.
pub fn boundary_violation<I: PositionedItem + ?Sized>(
    item: &I,
    span: &SpanMetrics,
    config: &PlacementConfig,
) -> Option<Violation> {
    if item.position() < span.min_position() - EPSILON {
        return Some(Violation::BeforeSpanStart {
            min: span.min_position(),
            actual: item.position(),
        });
    }
    if item.end() > span.max_end() + EPSILON {
        return Some(Violation::PastSpanEnd {
            max: span.max_end(),
            actual: item.end(),
        });
    }

    if let (Some(vertical), Some(height)) = (item.vertical(), span.usable_height) {
        if vertical.position < config.vertical_floor - EPSILON {
            return Some(Violation::BelowFloor {
                min: config.vertical_floor,
                actual: vertical.position,
            });
        }
        let ceiling = config.ceiling(height);
        if vertical.top() > ceiling + EPSILON {
            return Some(Violation::AboveCeiling {
                max: ceiling,
                actual: vertical.top(),
            });
        }
    }

    None
}

/// Signed clearance between two primary intervals (negative when they overlap).
fn gap_between<I: PositionedItem + ?Sized>(a: &I, b: &I) -> f64 {
    if a.position() <= b.position() {
        b.position() - a.end()
    } else {
        a.position() - b.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, VerticalPlacement};
    use crate::span::SpanAxis;

    fn wall(length: f64) -> SpanMetrics {
        SpanMetrics::new(length, 100.0, 50.0, SpanAxis::Width).with_usable_height(2400.0)
    }

    fn front() -> SpanId {
        SpanId::from("front")
    }

    #[test]
    fn valid_layout_has_no_flags() {
        let items = vec![
            Item::door(ItemId(1), "front", 100.0, 900.0),
            Item::door(ItemId(2), "front", 1050.0, 900.0),
        ];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert!(result.is_valid());
    }

    #[test]
    fn flags_item_past_span_end() {
        let items = vec![Item::door(ItemId(1), "front", 2500.0, 900.0)];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert_eq!(
            result.reason(ItemId(1)),
            Some(&Violation::PastSpanEnd {
                max: 2900.0,
                actual: 3400.0
            })
        );
    }

    #[test]
    fn overlap_flags_both_items() {
        let items = vec![
            Item::door(ItemId(1), "front", 100.0, 900.0),
            Item::door(ItemId(2), "front", 1020.0, 900.0),
        ];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert_eq!(result.invalid_ids, vec![ItemId(1), ItemId(2)]);
        match result.reason(ItemId(2)) {
            Some(Violation::Overlap {
                other, actual_gap, ..
            }) => {
                assert_eq!(*other, ItemId(1));
                assert!((actual_gap - 20.0).abs() < 1e-9);
            }
            other => panic!("unexpected reason: {other:?}"),
        }
    }

    #[test]
    fn item_crowding_two_neighbours_keeps_leftmost_reason() {
        let items = vec![
            Item::door(ItemId(3), "front", 1020.0, 900.0),
            Item::door(ItemId(2), "front", 500.0, 500.0),
            Item::door(ItemId(1), "front", 100.0, 420.0),
        ];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert_eq!(result.invalid_ids, vec![ItemId(1), ItemId(2), ItemId(3)]);
        assert!(matches!(
            result.reason(ItemId(2)),
            Some(Violation::Overlap { other: ItemId(1), .. })
        ));
        assert!(matches!(
            result.reason(ItemId(3)),
            Some(Violation::Overlap { other: ItemId(2), .. })
        ));
    }

    #[test]
    fn exact_min_gap_is_valid() {
        let items = vec![
            Item::door(ItemId(1), "front", 100.0, 900.0),
            Item::door(ItemId(2), "front", 1050.0, 900.0),
        ];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert!(!result.is_invalid(ItemId(2)));
    }

    #[test]
    fn disabled_items_are_ignored() {
        let mut ghost = Item::door(ItemId(2), "front", 150.0, 900.0);
        ghost.enabled = false;
        let items = vec![Item::door(ItemId(1), "front", 100.0, 900.0), ghost];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert!(result.is_valid());
    }

    #[test]
    fn window_above_ceiling() {
        let items = vec![Item::window(
            ItemId(1),
            "front",
            200.0,
            600.0,
            VerticalPlacement::new(1500.0, 900.0),
        )];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert_eq!(
            result.reason(ItemId(1)),
            Some(&Violation::AboveCeiling {
                max: 2300.0,
                actual: 2400.0
            })
        );
    }

    #[test]
    fn boundary_reason_takes_precedence_over_overlap() {
        let items = vec![
            Item::door(ItemId(1), "front", 0.0, 900.0),
            Item::door(ItemId(2), "front", 500.0, 900.0),
        ];
        let result = validate_span(&front(), &wall(3000.0), &items, &PlacementConfig::default());
        assert!(result.reason(ItemId(1)).is_some_and(Violation::is_boundary));
        assert!(matches!(
            result.reason(ItemId(2)),
            Some(Violation::Overlap { .. })
        ));
    }

    #[test]
    fn result_independent_of_input_order() {
        let a = Item::door(ItemId(1), "front", 100.0, 900.0);
        let b = Item::door(ItemId(2), "front", 700.0, 900.0);
        let c = Item::door(ItemId(3), "front", 1300.0, 900.0);
        let config = PlacementConfig::default();

        let forward = validate_span(&front(), &wall(4000.0), &[a.clone(), b.clone(), c.clone()], &config);
        let backward = validate_span(&front(), &wall(4000.0), &[c, b, a], &config);
        assert_eq!(forward, backward);
    }

    #[test]
    fn validate_all_flags_unknown_span() {
        let spans: SpanTable = [(front(), wall(3000.0))].into_iter().collect();
        let items = vec![
            Item::door(ItemId(1), "front", 100.0, 900.0),
            Item::door(ItemId(2), "attic", 100.0, 900.0),
        ];
        let result = validate_all(&spans, &items, &PlacementConfig::default());
        assert_eq!(result.invalid_ids, vec![ItemId(2)]);
        assert!(matches!(
            result.reason(ItemId(2)),
            Some(Violation::UnknownSpan { .. })
        ));
    }
}
