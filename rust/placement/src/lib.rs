// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Lite Placement
//!
//! Positions rectangular openings (doors, windows, skylights, divider
//! openings) along the linear spans of a parametric building: wall faces,
//! divider faces and roof slopes.
//!
//! Every operation is a pure function of the current items and the current
//! span metrics. Nothing is cached between calls; the caller re-resolves span
//! metrics from the building parameters before each pass.
//!
//! | module | role |
//! |--------|------|
//! | [`interval`] | closed-interval subtraction, nearest point, gap conflicts |
//! | [`validate`] | advisory boundary and overlap checks |
//! | [`correct`] | two-pass deterministic repair |
//! | [`snap`] | nearest conflict-free position for one item |
//! | [`distribute`] | evenly spaced, labelled slots with swap |
//! | [`locate`] | free-gap search for new items |
//! | [`reflow`] | proportional rescale on building extent changes |
//!
//! ```
//! use ifc_lite_placement::{correct_span, Item, ItemId, PlacementConfig, SpanAxis, SpanId, SpanMetrics};
//!
//! let span = SpanMetrics::new(4000.0, 50.0, 50.0, SpanAxis::Width);
//! let mut items = vec![Item::door(ItemId(1), "front", 0.0, 900.0)];
//!
//! correct_span(&SpanId::from("front"), &span, &mut items, &PlacementConfig::default());
//! assert_eq!(items[0].position, 50.0);
//! ```

pub mod config;
pub mod correct;
pub mod distribute;
pub mod error;
pub mod interval;
pub mod item;
pub mod locate;
pub mod reflow;
pub mod snap;
pub mod span;
pub mod validate;

pub use config::PlacementConfig;
pub use correct::{correct_all, correct_span, CorrectionReport};
pub use distribute::{apply_plan, apply_slot, compute_slots, Slot, SlotLabel, SlotPlan};
pub use error::{Error, Result};
pub use interval::{conflicts, nearest_point, subtract, Interval, IntervalSet};
pub use item::{
    enabled_on_span, DisableReason, Item, ItemId, ItemKind, ItemPatch, ItemShape,
    PositionedItem, VerticalPlacement,
};
pub use locate::{find_free_position, find_on_any_span};
pub use reflow::{reflow, reflow_by, BuildingExtent, ReflowRatios, ReflowReport};
pub use snap::{snap_item, snap_position, SnapOutcome};
pub use span::{SpanAxis, SpanId, SpanMetrics, SpanTable};
pub use validate::{validate_all, validate_span, ValidationResult, Violation};
