// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based invariant tests for the placement engine.
//!
//! Verifies:
//! 1. Correction is idempotent: a second pass changes nothing
//! 2. After correction, enabled items are separated by at least `min_gap`
//! 3. After correction, enabled items sit inside the span's edge clearance
//!    and windows sit below the ceiling
//! 4. Correction never deletes items
//! 5. An exact snap never conflicts with another enabled item
//! 6. Distribution is strictly increasing with `min_gap` spacing when it fits
//! 7. Reflow by `r` then `1/r` returns positions within one unit

use ifc_lite_placement::interval::EPSILON;
use ifc_lite_placement::{
    compute_slots, conflicts, correct_span, enabled_on_span, reflow_by, snap_item, Item, ItemId,
    PlacementConfig, PositionedItem, ReflowRatios, SpanAxis, SpanId, SpanMetrics, SpanTable,
    VerticalPlacement,
};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn front() -> SpanId {
    SpanId::from("front")
}

fn arb_span() -> impl Strategy<Value = SpanMetrics> {
    (2000u32..8000, 0u32..200, 0u32..150, 2000u32..3000).prop_map(
        |(length, edge_gap, min_gap, height)| {
            SpanMetrics::new(length as f64, edge_gap as f64, min_gap as f64, SpanAxis::Width)
                .with_usable_height(height as f64)
        },
    )
}

fn arb_item(index: u32) -> impl Strategy<Value = Item> {
    (
        -500i32..8500,
        100u32..1500,
        any::<bool>(),
        -200i32..2500,
        200u32..1800,
    )
        .prop_map(move |(position, size, is_window, sill, height)| {
            let id = ItemId(index);
            if is_window {
                Item::window(
                    id,
                    "front",
                    position as f64,
                    size as f64,
                    VerticalPlacement::new(sill as f64, height as f64),
                )
            } else {
                Item::door(id, "front", position as f64, size as f64)
            }
        })
}

fn arb_items(max: usize) -> impl Strategy<Value = Vec<Item>> {
    (0..=max).prop_flat_map(|n| (0..n as u32).map(arb_item).collect::<Vec<_>>())
}

fn arb_span_with_items() -> impl Strategy<Value = (SpanMetrics, Vec<Item>)> {
    (arb_span(), arb_items(6))
}

// ── Correction ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn correction_is_idempotent((span, mut items) in arb_span_with_items()) {
        let config = PlacementConfig::default();
        correct_span(&front(), &span, &mut items, &config);
        let once = items.clone();

        let report = correct_span(&front(), &span, &mut items, &config);
        prop_assert!(report.is_empty(), "second pass changed {:?}", report);
        prop_assert_eq!(items, once);
    }

    #[test]
    fn correction_separates_items((span, mut items) in arb_span_with_items()) {
        correct_span(&front(), &span, &mut items, &PlacementConfig::default());

        let on_span = enabled_on_span(&items, &front());
        for (i, a) in on_span.iter().enumerate() {
            for b in &on_span[i + 1..] {
                prop_assert!(
                    !conflicts(a.position(), a.end(), b.position(), b.end(), span.min_gap),
                    "{} [{}, {}] and {} [{}, {}] closer than {}",
                    a.id, a.position(), a.end(), b.id, b.position(), b.end(), span.min_gap
                );
            }
        }
    }

    #[test]
    fn correction_respects_boundaries((span, mut items) in arb_span_with_items()) {
        let config = PlacementConfig::default();
        correct_span(&front(), &span, &mut items, &config);

        for item in items.iter().filter(|i| i.enabled) {
            prop_assert!(item.position >= span.edge_gap - EPSILON);
            prop_assert!(item.end() <= span.length - span.edge_gap + EPSILON);
            prop_assert!(item.size > 0.0);

            if let (Some(vertical), Some(height)) = (item.shape.vertical(), span.usable_height) {
                prop_assert!(vertical.position >= config.vertical_floor - EPSILON);
                prop_assert!(vertical.top() <= config.ceiling(height) + EPSILON);
            }
        }
    }

    #[test]
    fn correction_never_deletes((span, mut items) in arb_span_with_items()) {
        let before: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        correct_span(&front(), &span, &mut items, &PlacementConfig::default());
        let after: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        prop_assert_eq!(before, after);

        for item in items.iter().filter(|i| !i.enabled) {
            prop_assert!(item.disabled_reason.is_some());
        }
    }
}

// ── Snap ──────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn exact_snap_never_conflicts(
        (span, mut items) in arb_span_with_items(),
        desired in -1000i32..9000,
    ) {
        prop_assume!(!items.is_empty());
        correct_span(&front(), &span, &mut items, &PlacementConfig::default());

        let target = items[0].clone();
        let outcome = snap_item(&span, &items, target.id, desired as f64).unwrap();
        prop_assume!(outcome.exact);

        let start = outcome.position;
        let end = start + target.size;
        prop_assert!(start >= span.edge_gap - EPSILON);
        prop_assert!(end <= span.length - span.edge_gap + EPSILON);

        for other in enabled_on_span(&items, &front()) {
            if other.id == target.id {
                continue;
            }
            prop_assert!(
                !conflicts(start, end, other.position(), other.end(), span.min_gap),
                "snapped [{}, {}] conflicts with {} [{}, {}]",
                start, end, other.id, other.position(), other.end()
            );
        }
    }
}

// ── Distribution ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn distribution_is_monotonic_when_it_fits((span, items) in arb_span_with_items()) {
        let plan = compute_slots(&front(), &span, &items);
        prop_assume!(!plan.overflow);

        let sizes: Vec<f64> = plan
            .slots
            .iter()
            .map(|slot| items.iter().find(|i| i.id == slot.item).map(|i| i.size).unwrap())
            .collect();

        for (k, pair) in plan.slots.windows(2).enumerate() {
            prop_assert!(pair[1].position > pair[0].position);
            let gap = pair[1].position - (pair[0].position + sizes[k]);
            prop_assert!(gap >= span.min_gap - EPSILON, "gap {} below {}", gap, span.min_gap);
        }
    }
}

// ── Reflow ────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reflow_round_trip_within_one_unit(
        positions in proptest::collection::vec(0u32..6000, 1..6),
        ratio in 0.5f64..2.0,
    ) {
        let spans: SpanTable = [(front(), SpanMetrics::new(6000.0, 100.0, 50.0, SpanAxis::Width))]
            .into_iter()
            .collect();
        let mut items: Vec<Item> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| Item::door(ItemId(i as u32), "front", *p as f64, 500.0))
            .collect();

        let forward = ReflowRatios { width: ratio, depth: 1.0, height: 1.0 };
        let backward = ReflowRatios { width: 1.0 / ratio, depth: 1.0, height: 1.0 };
        reflow_by(&mut items, &spans, &forward);
        reflow_by(&mut items, &spans, &backward);

        for (item, original) in items.iter().zip(&positions) {
            prop_assert!(
                (item.position - *original as f64).abs() <= 1.0,
                "{} drifted from {} to {}", item.id, original, item.position
            );
        }
    }
}
