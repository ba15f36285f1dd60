// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration, loaded from JSON and environment variables.

use std::path::Path;

use ifc_lite_placement::{PlacementConfig, SpanId, VerticalPlacement};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::span_model::StandardSpanModel;

/// Everything a session needs besides the building parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Engine constants.
    pub placement: PlacementConfig,
    /// Clearances used by the reference span model.
    pub span_model: StandardSpanModel,
    /// Order in which spans are tried when an item is added without a span.
    /// Spans not listed are tried afterwards in lexical order.
    pub span_priority: Vec<SpanId>,
    /// Sill height and opening height of a new window.
    pub window_defaults: VerticalPlacement,
    /// Offset up the slope and length of a new skylight.
    pub skylight_defaults: VerticalPlacement,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            span_model: StandardSpanModel::default(),
            span_priority: ["front", "back", "left", "right", "roof-front", "roof-back"]
                .into_iter()
                .map(SpanId::from)
                .collect(),
            window_defaults: VerticalPlacement::new(900.0, 1000.0),
            skylight_defaults: VerticalPlacement::new(300.0, 800.0),
        }
    }
}

impl SessionConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load from `PLACEMENT_CONFIG` (a JSON file path) if set, then apply the
    /// `PLACEMENT_EDGE_GAP`, `PLACEMENT_MIN_GAP` and `PLACEMENT_MIN_ITEM_SIZE`
    /// overrides. Unparsable overrides are ignored.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("PLACEMENT_CONFIG") {
            Ok(path) => Self::from_path(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Some(edge_gap) = env_f64("PLACEMENT_EDGE_GAP") {
            config.span_model.edge_gap = edge_gap;
        }
        if let Some(min_gap) = env_f64("PLACEMENT_MIN_GAP") {
            config.span_model.min_gap = min_gap;
        }
        if let Some(min_item_size) = env_f64("PLACEMENT_MIN_ITEM_SIZE") {
            config.placement.min_item_size = min_item_size;
        }

        Ok(config)
    }
}

fn env_f64(name: &str) -> Option<f64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::warn!(name, value = %raw, "ignoring unparsable override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{ "span_model": { "edge_gap": 75.0 }, "placement": { "min_item_size": 300.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.span_model.edge_gap, 75.0);
        assert_eq!(config.span_model.min_gap, 50.0);
        assert_eq!(config.placement.min_item_size, 300.0);
        assert_eq!(config.placement.frame_allowance, 100.0);
        assert_eq!(config.span_priority[0], SpanId::from("front"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SessionConfig::from_json_str("{ not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SessionConfig::from_path(Path::new("/nonexistent/placement.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
