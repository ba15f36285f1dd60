// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parametric building description consumed by the span model.

use ifc_lite_placement::BuildingExtent;
use serde::{Deserialize, Serialize};

/// Direction the roof ridge runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RidgeAxis {
    /// Ridge parallel to the front wall; slopes face front and back.
    Width,
    /// Ridge parallel to the side walls; slopes face left and right.
    Depth,
}

/// Duo-pitch roof. A pitch of zero gives a single flat roof span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSpec {
    pub pitch_degrees: f64,
    pub ridge: RidgeAxis,
}

impl Default for RoofSpec {
    fn default() -> Self {
        Self {
            pitch_degrees: 25.0,
            ridge: RidgeAxis::Width,
        }
    }
}

/// Internal partition running across the building width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divider {
    /// Distance from the front wall.
    pub offset: f64,
}

/// Overall building parameters, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingParameters {
    pub width: f64,
    pub depth: f64,
    pub wall_height: f64,
    #[serde(default)]
    pub roof: RoofSpec,
    #[serde(default)]
    pub dividers: Vec<Divider>,
}

impl BuildingParameters {
    pub fn new(width: f64, depth: f64, wall_height: f64) -> Self {
        Self {
            width,
            depth,
            wall_height,
            roof: RoofSpec::default(),
            dividers: Vec::new(),
        }
    }

    pub fn with_roof(mut self, roof: RoofSpec) -> Self {
        self.roof = roof;
        self
    }

    pub fn with_divider(mut self, offset: f64) -> Self {
        self.dividers.push(Divider { offset });
        self
    }

    pub fn extent(&self) -> BuildingExtent {
        BuildingExtent::new(self.width, self.depth, self.wall_height)
    }
}

impl Default for BuildingParameters {
    fn default() -> Self {
        Self::new(3000.0, 2400.0, 2200.0)
    }
}
