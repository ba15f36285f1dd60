// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine-wide placement parameters.

use serde::{Deserialize, Serialize};

/// Constants shared by validation and correction. All values in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Clearance kept free below the top of a span's usable height
    /// (frame head, lintel or ridge board).
    pub frame_allowance: f64,
    /// Smallest primary-axis size an item may be shrunk to before the
    /// corrector disables it instead.
    pub min_item_size: f64,
    /// Lowest legal vertical position for windows and skylights.
    pub vertical_floor: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            frame_allowance: 100.0,
            min_item_size: 200.0,
            vertical_floor: 0.0,
        }
    }
}

impl PlacementConfig {
    /// Highest legal top edge for a vertical placement on a span of the given
    /// usable height.
    pub fn ceiling(&self, usable_height: f64) -> f64 {
        usable_height - self.frame_allowance
    }
}
