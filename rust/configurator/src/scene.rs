// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene files: building parameters plus placed items, as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use ifc_lite_placement::{CorrectionReport, Item, SlotPlan, SpanId, SpanMetrics, ValidationResult};
use serde::{Deserialize, Serialize};

use crate::building::BuildingParameters;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::span_model::SpanModel;

/// Serialized editing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub parameters: BuildingParameters,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Overrides the configuration the caller would otherwise use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SessionConfig>,
}

impl Scene {
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

    /// Open a session on this scene, using the scene's own configuration when
    /// it has one.
    pub fn into_session(self, fallback: SessionConfig) -> Session {
        let config = self.config.unwrap_or(fallback);
        Session::new(self.parameters, config).with_items(self.items)
    }
}

/// Output of a scene check.
#[derive(Debug, Clone, Serialize)]
pub struct SceneReport {
    pub parameters: BuildingParameters,
    pub spans: BTreeMap<SpanId, SpanMetrics>,
    pub items: Vec<Item>,
    pub advisory: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<CorrectionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<SlotPlan>,
}

impl SceneReport {
    pub fn from_session<M: SpanModel>(session: &Session<M>) -> Self {
        let spans = session.spans();
        Self {
            parameters: session.parameters().clone(),
            spans: spans
                .iter()
                .map(|(id, metrics)| (id.clone(), metrics.clone()))
                .collect(),
            items: session.items().to_vec(),
            advisory: session.advisory().clone(),
            correction: None,
            distribution: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_lite_placement::ItemId;

    const SCENE: &str = r#"{
        "parameters": { "width": 4000.0, "depth": 3000.0, "wall_height": 2200.0 },
        "items": [
            { "id": 5, "span": "front", "position": 0.0, "size": 900.0, "kind": "door" },
            { "id": 2, "span": "left", "position": 400.0, "size": 600.0, "kind": "window",
              "vertical": { "position": 900.0, "extent": 1000.0 } }
        ]
    }"#;

    #[test]
    fn loads_scene_and_validates() {
        let scene = Scene::from_json_str(SCENE).unwrap();
        assert_eq!(scene.items.len(), 2);
        assert!(scene.items.iter().all(|item| item.enabled));

        let session = scene.into_session(SessionConfig::default());
        assert_eq!(session.advisory().invalid_ids, vec![ItemId(5)]);
    }

    #[test]
    fn report_lists_spans_in_order() {
        let session = Scene::from_json_str(SCENE)
            .unwrap()
            .into_session(SessionConfig::default());
        let report = SceneReport::from_session(&session);
        let ids: Vec<&str> = report.spans.keys().map(SpanId::as_str).collect();
        assert_eq!(&ids[..4], &["back", "front", "left", "right"]);
        assert_eq!(report.items.len(), 2);
    }
}
