// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Span model: building parameters in, span metrics out.
//!
//! The session calls [`SpanModel::resolve`] before every operation and never
//! keeps the result across a parameter change.

use ifc_lite_placement::{ItemKind, SpanAxis, SpanId, SpanMetrics, SpanTable};
use serde::{Deserialize, Serialize};

use crate::building::{BuildingParameters, RidgeAxis};

/// Steepest pitch accepted before the slope run stops being meaningful.
const MAX_PITCH_DEGREES: f64 = 80.0;

/// Produces the current spans of a building.
pub trait SpanModel {
    fn resolve(&self, params: &BuildingParameters) -> SpanTable;
}

impl<F> SpanModel for F
where
    F: Fn(&BuildingParameters) -> SpanTable,
{
    fn resolve(&self, params: &BuildingParameters) -> SpanTable {
        self(params)
    }
}

/// What a span is part of, derived from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanRole {
    Wall,
    Roof,
    Divider,
}

impl SpanRole {
    pub fn of(id: &SpanId) -> Self {
        let id = id.as_str();
        if id.starts_with("roof") {
            SpanRole::Roof
        } else if id.starts_with("divider") {
            SpanRole::Divider
        } else {
            SpanRole::Wall
        }
    }

    /// Whether items of `kind` belong on spans of this role.
    pub fn accepts(&self, kind: ItemKind) -> bool {
        matches!(
            (self, kind),
            (SpanRole::Wall, ItemKind::Door)
                | (SpanRole::Wall, ItemKind::Window)
                | (SpanRole::Roof, ItemKind::Skylight)
                | (SpanRole::Divider, ItemKind::DividerOpening)
        )
    }
}

/// Reference span model for a rectangular building with a duo-pitch roof and
/// cross dividers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardSpanModel {
    /// Clearance at wall and divider ends (corner posts, framing).
    pub edge_gap: f64,
    /// Clearance between adjacent openings.
    pub min_gap: f64,
    /// Clearance at the gable ends of a roof slope.
    pub roof_edge_gap: f64,
}

impl Default for StandardSpanModel {
    fn default() -> Self {
        Self {
            edge_gap: 100.0,
            min_gap: 50.0,
            roof_edge_gap: 150.0,
        }
    }
}

impl StandardSpanModel {
    fn wall(&self, length: f64, axis: SpanAxis, height: f64) -> SpanMetrics {
        SpanMetrics::new(length, self.edge_gap, self.min_gap, axis).with_usable_height(height)
    }
}

impl SpanModel for StandardSpanModel {
    fn resolve(&self, params: &BuildingParameters) -> SpanTable {
        let mut table = SpanTable::new();
        let height = params.wall_height;

        table.insert("front".into(), self.wall(params.width, SpanAxis::Width, height));
        table.insert("back".into(), self.wall(params.width, SpanAxis::Width, height));
        table.insert("left".into(), self.wall(params.depth, SpanAxis::Depth, height));
        table.insert("right".into(), self.wall(params.depth, SpanAxis::Depth, height));

        let pitch = if params.roof.pitch_degrees.is_finite() {
            params.roof.pitch_degrees.clamp(0.0, MAX_PITCH_DEGREES)
        } else {
            0.0
        };
        if pitch != params.roof.pitch_degrees {
            tracing::warn!(pitch = params.roof.pitch_degrees, used = pitch, "roof pitch out of range");
        }

        let (ridge_length, across, axis, faces) = match params.roof.ridge {
            RidgeAxis::Width => (params.width, params.depth, SpanAxis::Width, ["roof-front", "roof-back"]),
            RidgeAxis::Depth => (params.depth, params.width, SpanAxis::Depth, ["roof-left", "roof-right"]),
        };

        if pitch == 0.0 {
            let roof = SpanMetrics::new(ridge_length, self.roof_edge_gap, self.min_gap, axis)
                .with_usable_height(across);
            table.insert("roof".into(), roof);
        } else {
            let run = (across / 2.0) / pitch.to_radians().cos();
            for face in faces {
                let slope = SpanMetrics::new(ridge_length, self.roof_edge_gap, self.min_gap, axis)
                    .with_usable_height(run);
                table.insert(face.into(), slope);
            }
        }

        for (n, divider) in params.dividers.iter().enumerate() {
            if !(divider.offset > 0.0 && divider.offset < params.depth) {
                tracing::warn!(divider = n, offset = divider.offset, "divider outside building, skipping");
                continue;
            }
            table.insert(
                SpanId::new(format!("divider-{n}")),
                self.wall(params.width, SpanAxis::Width, height),
            );
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::RoofSpec;
    use approx::assert_relative_eq;

    #[test]
    fn walls_follow_building_extent() {
        let params = BuildingParameters::new(4000.0, 3000.0, 2200.0);
        let spans = StandardSpanModel::default().resolve(&params);

        let front = spans.get(&"front".into()).unwrap();
        assert_eq!(front.length, 4000.0);
        assert_eq!(front.axis, SpanAxis::Width);
        assert_eq!(front.usable_height, Some(2200.0));

        let left = spans.get(&"left".into()).unwrap();
        assert_eq!(left.length, 3000.0);
        assert_eq!(left.axis, SpanAxis::Depth);
    }

    #[test]
    fn pitched_roof_uses_slope_run() {
        let params = BuildingParameters::new(4000.0, 3000.0, 2200.0).with_roof(RoofSpec {
            pitch_degrees: 60.0,
            ridge: RidgeAxis::Width,
        });
        let spans = StandardSpanModel::default().resolve(&params);

        let slope = spans.get(&"roof-front".into()).unwrap();
        assert_eq!(slope.length, 4000.0);
        assert_relative_eq!(slope.usable_height.unwrap(), 3000.0, epsilon = 1e-6);
        assert!(spans.contains(&"roof-back".into()));
        assert!(!spans.contains(&"roof".into()));
    }

    #[test]
    fn ridge_along_depth_uses_side_slopes() {
        let params = BuildingParameters::new(4000.0, 3000.0, 2200.0).with_roof(RoofSpec {
            pitch_degrees: 30.0,
            ridge: RidgeAxis::Depth,
        });
        let spans = StandardSpanModel::default().resolve(&params);
        let slope = spans.get(&"roof-left".into()).unwrap();
        assert_eq!(slope.length, 3000.0);
        assert_eq!(slope.axis, SpanAxis::Depth);
    }

    #[test]
    fn flat_roof_is_a_single_span() {
        let params = BuildingParameters::new(4000.0, 3000.0, 2200.0).with_roof(RoofSpec {
            pitch_degrees: 0.0,
            ridge: RidgeAxis::Width,
        });
        let spans = StandardSpanModel::default().resolve(&params);
        assert_eq!(spans.get(&"roof".into()).and_then(|s| s.usable_height), Some(3000.0));
    }

    #[test]
    fn dividers_inside_building_only() {
        let params = BuildingParameters::new(4000.0, 3000.0, 2200.0)
            .with_divider(1500.0)
            .with_divider(3500.0);
        let spans = StandardSpanModel::default().resolve(&params);
        assert!(spans.contains(&"divider-0".into()));
        assert!(!spans.contains(&"divider-1".into()));
    }

    #[test]
    fn zero_width_degrades_to_unit_length() {
        let params = BuildingParameters::new(0.0, 3000.0, 2200.0);
        let spans = StandardSpanModel::default().resolve(&params);
        assert_eq!(spans.get(&"front".into()).map(|s| s.length), Some(1.0));
    }

    #[test]
    fn roles_from_ids() {
        assert_eq!(SpanRole::of(&"roof-back".into()), SpanRole::Roof);
        assert_eq!(SpanRole::of(&"divider-2".into()), SpanRole::Divider);
        assert_eq!(SpanRole::of(&"left".into()), SpanRole::Wall);
        assert!(SpanRole::Roof.accepts(ItemKind::Skylight));
        assert!(!SpanRole::Wall.accepts(ItemKind::Skylight));
    }

    #[test]
    fn closures_are_span_models() {
        let model = |params: &BuildingParameters| {
            let mut table = SpanTable::new();
            table.insert("only".into(), SpanMetrics::new(params.width, 0.0, 0.0, SpanAxis::Width));
            table
        };
        let spans = model.resolve(&BuildingParameters::default());
        assert_eq!(spans.len(), 1);
    }
}
