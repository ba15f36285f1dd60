// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placed items: doors, windows, skylights and divider openings.
//!
//! All kinds share a primary-axis placement (`position`, `size`) on one span.
//! Windows and skylights additionally carry a vertical placement, which is
//! only reachable through [`ItemShape`] after matching on the kind.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::span::SpanId;

/// Stable identifier of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant for item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Door,
    Window,
    Skylight,
    DividerOpening,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Door => "door",
            ItemKind::Window => "window",
            ItemKind::Skylight => "skylight",
            ItemKind::DividerOpening => "divider-opening",
        }
    }

    /// Whether items of this kind have a vertical degree of freedom.
    pub fn has_vertical(&self) -> bool {
        matches!(self, ItemKind::Window | ItemKind::Skylight)
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement along a span's vertical axis (sill height and opening height on
/// a wall, offset and length along the slope on a roof).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalPlacement {
    pub position: f64,
    pub extent: f64,
}

impl VerticalPlacement {
    pub fn new(position: f64, extent: f64) -> Self {
        Self { position, extent }
    }

    pub fn top(&self) -> f64 {
        self.position + self.extent
    }
}

/// Kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ItemShape {
    Door,
    Window { vertical: VerticalPlacement },
    Skylight { vertical: VerticalPlacement },
    DividerOpening,
}

impl ItemShape {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemShape::Door => ItemKind::Door,
            ItemShape::Window { .. } => ItemKind::Window,
            ItemShape::Skylight { .. } => ItemKind::Skylight,
            ItemShape::DividerOpening => ItemKind::DividerOpening,
        }
    }

    pub fn vertical(&self) -> Option<&VerticalPlacement> {
        match self {
            ItemShape::Window { vertical } | ItemShape::Skylight { vertical } => Some(vertical),
            ItemShape::Door | ItemShape::DividerOpening => None,
        }
    }

    pub fn vertical_mut(&mut self) -> Option<&mut VerticalPlacement> {
        match self {
            ItemShape::Window { vertical } | ItemShape::Skylight { vertical } => Some(vertical),
            ItemShape::Door | ItemShape::DividerOpening => None,
        }
    }
}

/// Why the corrector disabled an item instead of keeping it valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum DisableReason {
    /// The room left before the span end is below the minimum item size, either
    /// after pushing the item clear of its left neighbour or because it starts
    /// past the span end.
    NoRoom { available: f64, required: f64 },
    /// The span itself cannot hold an item of the minimum size.
    SpanTooShort { usable: f64, required: f64 },
    /// The span leaves no height between the floor and the ceiling.
    NoHeadroom { available: f64 },
}

impl std::fmt::Display for DisableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisableReason::NoRoom { available, required } => write!(
                f,
                "only {available:.0} mm left after resolving overlaps, need {required:.0} mm"
            ),
            DisableReason::SpanTooShort { usable, required } => {
                write!(f, "span offers {usable:.0} mm, need {required:.0} mm")
            }
            DisableReason::NoHeadroom { available } => {
                write!(f, "only {available:.0} mm between floor and ceiling")
            }
        }
    }
}

/// Read access shared by every placed item.
pub trait PositionedItem {
    fn id(&self) -> ItemId;
    fn span(&self) -> &SpanId;
    fn kind(&self) -> ItemKind;
    fn position(&self) -> f64;
    fn size(&self) -> f64;
    fn is_enabled(&self) -> bool;
    fn vertical(&self) -> Option<&VerticalPlacement>;

    fn end(&self) -> f64 {
        self.position() + self.size()
    }

    fn primary(&self) -> Interval {
        Interval::from_extent(self.position(), self.size())
    }
}

/// A door, window, skylight or divider opening placed on a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub span: SpanId,
    /// Offset of the item's leading edge along the span.
    pub position: f64,
    /// Extent along the span.
    pub size: f64,
    #[serde(flatten)]
    pub shape: ItemShape,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<DisableReason>,
}

fn enabled_default() -> bool {
    true
}

impl Item {
    pub fn new(id: ItemId, span: SpanId, shape: ItemShape, position: f64, size: f64) -> Self {
        Self {
            id,
            span,
            position,
            size,
            shape,
            enabled: true,
            disabled_reason: None,
        }
    }

    pub fn door(id: ItemId, span: impl Into<SpanId>, position: f64, size: f64) -> Self {
        Self::new(id, span.into(), ItemShape::Door, position, size)
    }

    pub fn window(
        id: ItemId,
        span: impl Into<SpanId>,
        position: f64,
        size: f64,
        vertical: VerticalPlacement,
    ) -> Self {
        Self::new(id, span.into(), ItemShape::Window { vertical }, position, size)
    }

    pub fn skylight(
        id: ItemId,
        span: impl Into<SpanId>,
        position: f64,
        size: f64,
        vertical: VerticalPlacement,
    ) -> Self {
        Self::new(id, span.into(), ItemShape::Skylight { vertical }, position, size)
    }

    pub fn divider_opening(id: ItemId, span: impl Into<SpanId>, position: f64, size: f64) -> Self {
        Self::new(id, span.into(), ItemShape::DividerOpening, position, size)
    }

    /// Disable in place, keeping the configuration for manual repair.
    pub fn disable(&mut self, reason: DisableReason) {
        self.enabled = false;
        self.disabled_reason = Some(reason);
    }

    /// Apply a partial edit. Fields left `None` are untouched.
    ///
    /// Vertical fields on a door or divider opening are rejected rather than
    /// silently dropped. Re-enabling an item clears its disable reason.
    pub fn apply_patch(&mut self, patch: &ItemPatch) -> Result<()> {
        for (name, value) in [
            ("position", patch.position),
            ("size", patch.size),
            ("vertical_position", patch.vertical_position),
            ("vertical_extent", patch.vertical_extent),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(Error::InvalidPatch {
                        id: self.id,
                        reason: format!("{name} must be finite, got {v}"),
                    });
                }
            }
        }
        if let Some(size) = patch.size {
            if size <= 0.0 {
                return Err(Error::InvalidPatch {
                    id: self.id,
                    reason: format!("size must be positive, got {size}"),
                });
            }
        }

        let touches_vertical = patch.vertical_position.is_some() || patch.vertical_extent.is_some();
        if touches_vertical && !self.kind().has_vertical() {
            return Err(Error::InvalidPatch {
                id: self.id,
                reason: format!("{} has no vertical placement", self.kind()),
            });
        }

        if let Some(span) = &patch.span {
            self.span = span.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(vertical) = self.shape.vertical_mut() {
            if let Some(position) = patch.vertical_position {
                vertical.position = position;
            }
            if let Some(extent) = patch.vertical_extent {
                vertical.extent = extent;
            }
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
            if enabled {
                self.disabled_reason = None;
            }
        }

        Ok(())
    }
}

impl PositionedItem for Item {
    fn id(&self) -> ItemId {
        self.id
    }

    fn span(&self) -> &SpanId {
        &self.span
    }

    fn kind(&self) -> ItemKind {
        self.shape.kind()
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn size(&self) -> f64 {
        self.size
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn vertical(&self) -> Option<&VerticalPlacement> {
        self.shape.vertical()
    }
}

/// Partial edit of an item, as sent by the editing surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub span: Option<SpanId>,
    pub position: Option<f64>,
    pub size: Option<f64>,
    pub vertical_position: Option<f64>,
    pub vertical_extent: Option<f64>,
    pub enabled: Option<bool>,
}

impl ItemPatch {
    pub fn position(position: f64) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn size(size: f64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }
}

/// Enabled items on `span`, ordered by `(position, id)`.
///
/// Every cross-item pass walks items in this order so results never depend on
/// the order items were stored in.
pub fn enabled_on_span<'a, I: PositionedItem>(items: &'a [I], span: &SpanId) -> Vec<&'a I> {
    let mut on_span: Vec<&I> = items
        .iter()
        .filter(|item| item.is_enabled() && item.span() == span)
        .collect();
    on_span.sort_by(|a, b| {
        a.position()
            .total_cmp(&b.position())
            .then_with(|| a.id().cmp(&b.id()))
    });
    on_span
}
