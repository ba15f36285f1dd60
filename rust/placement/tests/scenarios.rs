// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end placement scenarios on a single span.

use ifc_lite_placement::{
    correct_span, find_free_position, validate_span, Item, ItemId, PlacementConfig, SpanAxis,
    SpanId, SpanMetrics, VerticalPlacement, Violation,
};

fn front() -> SpanId {
    SpanId::from("front")
}

#[test]
fn add_to_empty_span_is_centred() {
    let span = SpanMetrics::new(3000.0, 100.0, 50.0, SpanAxis::Width);
    let items: Vec<Item> = Vec::new();

    let position = find_free_position(&front(), &span, &items, 900.0).unwrap();
    assert_eq!(position, 1050.0);
}

#[test]
fn add_uses_first_gap_after_existing_item() {
    let span = SpanMetrics::new(3000.0, 100.0, 50.0, SpanAxis::Width);
    let items = vec![Item::door(ItemId(1), "front", 200.0, 800.0)];

    let position = find_free_position(&front(), &span, &items, 500.0).unwrap();
    assert_eq!(position, 1050.0);
}

#[test]
fn door_inside_edge_gap_is_flagged_then_clamped() {
    let span = SpanMetrics::new(4000.0, 50.0, 50.0, SpanAxis::Width);
    let config = PlacementConfig::default();
    let mut items = vec![Item::door(ItemId(1), "front", 0.0, 900.0)];

    let result = validate_span(&front(), &span, &items, &config);
    assert_eq!(
        result.reason(ItemId(1)),
        Some(&Violation::BeforeSpanStart {
            min: 50.0,
            actual: 0.0
        })
    );

    correct_span(&front(), &span, &mut items, &config);
    assert_eq!(items[0].position, 50.0);
    assert!(validate_span(&front(), &span, &items, &config).is_valid());
}

#[test]
fn overlapping_windows_are_flagged_then_separated() {
    let span = SpanMetrics::new(4000.0, 100.0, 50.0, SpanAxis::Width).with_usable_height(2400.0);
    let config = PlacementConfig::default();
    let sill = VerticalPlacement::new(900.0, 1000.0);
    let mut items = vec![
        Item::window(ItemId(2), "front", 700.0, 800.0, sill),
        Item::window(ItemId(1), "front", 100.0, 800.0, sill),
    ];

    let result = validate_span(&front(), &span, &items, &config);
    assert_eq!(result.invalid_ids, vec![ItemId(1), ItemId(2)]);

    correct_span(&front(), &span, &mut items, &config);
    let a = items.iter().find(|i| i.id == ItemId(1)).unwrap();
    let b = items.iter().find(|i| i.id == ItemId(2)).unwrap();
    assert_eq!(a.position, 100.0);
    assert_eq!(b.position, 950.0);
    assert!(validate_span(&front(), &span, &items, &config).is_valid());
}

#[test]
fn advisory_result_serializes_structured_reasons() {
    let span = SpanMetrics::new(4000.0, 50.0, 50.0, SpanAxis::Width);
    let items = vec![Item::door(ItemId(4), "front", 0.0, 900.0)];
    let result = validate_span(&front(), &span, &items, &PlacementConfig::default());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["invalid_ids"][0], 4);
    assert_eq!(json["invalid_by_id"]["4"]["code"], "before-span-start");
}
