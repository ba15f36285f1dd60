// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spans: the linear extents items are placed along.
//!
//! A span is a wall face, a divider face or a roof slope. Its metrics are
//! derived from the building parameters on every pass and handed to the
//! engine by value; nothing here remembers a previous length.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Stable key of a span (`"front"`, `"roof-back"`, `"divider-0"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanId(pub String);

impl SpanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpanId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Building extent a span's length follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanAxis {
    Width,
    Depth,
    Height,
}

/// Metrics of one span, as produced by the span model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanMetrics {
    /// Length along the primary axis.
    pub length: f64,
    /// Clearance between an item and either end of the span.
    pub edge_gap: f64,
    /// Clearance between two adjacent items.
    pub min_gap: f64,
    /// Height available for the vertical axis (wall height, or slope run on a
    /// roof). `None` when the span has no vertical degree of freedom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usable_height: Option<f64>,
    pub axis: SpanAxis,
}

impl SpanMetrics {
    pub fn new(length: f64, edge_gap: f64, min_gap: f64, axis: SpanAxis) -> Self {
        Self {
            length,
            edge_gap,
            min_gap,
            usable_height: None,
            axis,
        }
    }

    pub fn with_usable_height(mut self, height: f64) -> Self {
        self.usable_height = Some(height);
        self
    }

    /// Smallest legal start position.
    pub fn min_position(&self) -> f64 {
        self.edge_gap
    }

    /// Largest legal end position.
    pub fn max_end(&self) -> f64 {
        self.length - self.edge_gap
    }

    /// Widest item the span can hold at all.
    pub fn max_item_size(&self) -> f64 {
        (self.length - 2.0 * self.edge_gap).max(0.0)
    }

    /// Replace malformed values with safe defaults.
    ///
    /// A missing, zero, negative or non-finite length becomes `1`, negative
    /// gaps become `0`, and a non-positive usable height is dropped. Every
    /// substitution is logged at warn level.
    pub fn sanitized(&self, id: &SpanId) -> SpanMetrics {
        let mut out = self.clone();

        if !out.length.is_finite() || out.length <= 0.0 {
            tracing::warn!(span = %id, length = out.length, "degenerate span length, using 1");
            out.length = 1.0;
        }
        if !out.edge_gap.is_finite() || out.edge_gap < 0.0 {
            tracing::warn!(span = %id, edge_gap = out.edge_gap, "invalid edge gap, using 0");
            out.edge_gap = 0.0;
        }
        if !out.min_gap.is_finite() || out.min_gap < 0.0 {
            tracing::warn!(span = %id, min_gap = out.min_gap, "invalid min gap, using 0");
            out.min_gap = 0.0;
        }
        if let Some(height) = out.usable_height {
            if !height.is_finite() || height <= 0.0 {
                tracing::warn!(span = %id, height, "invalid usable height, dropping vertical axis");
                out.usable_height = None;
            }
        }

        out
    }
}

/// All spans of the current building geometry, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanTable {
    spans: FxHashMap<SpanId, SpanMetrics>,
}

impl SpanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a span, sanitizing its metrics on the way in.
    pub fn insert(&mut self, id: SpanId, metrics: SpanMetrics) {
        let metrics = metrics.sanitized(&id);
        self.spans.insert(id, metrics);
    }

    pub fn get(&self, id: &SpanId) -> Option<&SpanMetrics> {
        self.spans.get(id)
    }

    pub fn contains(&self, id: &SpanId) -> bool {
        self.spans.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Span ids in lexical order, so iteration is deterministic.
    pub fn ids(&self) -> Vec<SpanId> {
        let mut ids: Vec<SpanId> = self.spans.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpanId, &SpanMetrics)> {
        self.spans.iter()
    }
}

impl FromIterator<(SpanId, SpanMetrics)> for SpanTable {
    fn from_iter<T: IntoIterator<Item = (SpanId, SpanMetrics)>>(iter: T) -> Self {
        let mut table = SpanTable::new();
        for (id, metrics) in iter {
            table.insert(id, metrics);
        }
        table
    }
}
