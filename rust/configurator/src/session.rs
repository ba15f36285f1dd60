// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editing session and change pipeline.
//!
//! A [`Session`] owns the building parameters and the placed items. Every
//! public mutation ends in exactly one commit, which runs, in order:
//!
//! 1. proportional reflow, if the building extent changed;
//! 2. validation against freshly resolved spans;
//! 3. presentation sync, as queued [`SessionEvent`]s.
//!
//! Writes made inside a commit (the reflow, the advisory snapshot) go straight
//! to the session state and are never seen as a new change.

use ifc_lite_placement::{
    apply_plan, apply_slot, compute_slots, correct_all, find_free_position, find_on_any_span,
    reflow, snap_item, validate_all, BuildingExtent, CorrectionReport, DisableReason, Item,
    ItemId, ItemKind, ItemPatch, ItemShape, SlotPlan, SnapOutcome, SpanId, SpanMetrics,
    SpanTable, ValidationResult,
};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::building::BuildingParameters;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::ids::IdAllocator;
use crate::span_model::{SpanModel, SpanRole, StandardSpanModel};

/// Where the session is in its change pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Reflowing,
    Validating,
}

/// What a commit is reacting to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Change {
    /// Items were added, edited or removed.
    Items,
    /// Building parameters changed; carries the extent before the change.
    Geometry { previous: BuildingExtent },
}

/// Notifications for the presentation layer, drained by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// The item list was committed and should be re-rendered.
    ItemsChanged,
    /// The advisory snapshot differs from the previous one.
    AdvisoryChanged { invalid_ids: Vec<ItemId> },
    /// Positions were rescaled after a building extent change.
    Reflowed { scaled: Vec<ItemId> },
    /// A snap request finished.
    Snapped {
        id: ItemId,
        position: f64,
        exact: bool,
    },
    /// The corrector disabled an item it could not keep valid.
    ItemDisabled { id: ItemId, reason: DisableReason },
}

/// Editing session over one building.
#[derive(Debug)]
pub struct Session<M: SpanModel = StandardSpanModel> {
    params: BuildingParameters,
    model: M,
    config: SessionConfig,
    items: Vec<Item>,
    ids: IdAllocator,
    advisory: ValidationResult,
    phase: Phase,
    events: Vec<SessionEvent>,
}

impl Session<StandardSpanModel> {
    /// Session using the reference span model configured in `config`.
    pub fn new(params: BuildingParameters, config: SessionConfig) -> Self {
        let model = config.span_model.clone();
        Session::with_model(params, model, config)
    }
}

impl<M: SpanModel> Session<M> {
    pub fn with_model(params: BuildingParameters, model: M, config: SessionConfig) -> Self {
        let mut session = Self {
            params,
            model,
            config,
            items: Vec::new(),
            ids: IdAllocator::new(),
            advisory: ValidationResult::default(),
            phase: Phase::Idle,
            events: Vec::new(),
        };
        session.commit(Change::Items);
        session
    }

    /// Restore a session from previously persisted items.
    ///
    /// New ids continue after the highest restored id.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.ids = IdAllocator::after(items.iter().map(|item| &item.id));
        self.items = items;
        self.commit(Change::Items);
        self
    }

    // ── Read surface ─────────────────────────────────────────────────

    pub fn parameters(&self) -> &BuildingParameters {
        &self.params
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Corrected, committed items. This is what rendering and the bill of
    /// materials consume.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items_on<'a>(&'a self, span: &'a SpanId) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| &item.span == span)
    }

    /// Advisory violations from the last commit.
    pub fn advisory(&self) -> &ValidationResult {
        &self.advisory
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Spans for the current parameters, resolved fresh.
    pub fn spans(&self) -> SpanTable {
        self.model.resolve(&self.params)
    }

    pub fn span(&self, id: &SpanId) -> Result<SpanMetrics> {
        self.spans()
            .get(id)
            .cloned()
            .ok_or_else(|| ifc_lite_placement::Error::UnknownSpan(id.clone()).into())
    }

    /// Distribution slots and labels for a span, without applying them.
    pub fn slots(&self, span_id: &SpanId) -> Result<SlotPlan> {
        let span = self.span(span_id)?;
        Ok(compute_slots(span_id, &span, &self.items))
    }

    /// Take every queued presentation event.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Mutation surface ─────────────────────────────────────────────

    /// Replace the building parameters.
    pub fn set_parameters(&mut self, params: BuildingParameters) {
        let previous = self.params.extent();
        self.params = params;
        self.commit(Change::Geometry { previous });
    }

    /// Add an item of `kind` and `size` in the first free gap of `span_id`.
    pub fn add_item(&mut self, span_id: &SpanId, size: f64, kind: ItemKind) -> Result<ItemId> {
        let span = self.span(span_id)?;
        let position = find_free_position(span_id, &span, &self.items, size)?;
        self.insert(span_id.clone(), kind, position, size)
    }

    /// Add an item on the first span, in priority order, that accepts `kind`
    /// and has room.
    pub fn add_item_anywhere(&mut self, size: f64, kind: ItemKind) -> Result<ItemId> {
        let spans = self.spans();
        let candidates = self.fallback_order(&spans, kind);
        let (span_id, position) = {
            let (span_id, position) =
                find_on_any_span(&candidates, |id| spans.get(id).cloned(), &self.items, size)?;
            (span_id.clone(), position)
        };
        self.insert(span_id, kind, position, size)
    }

    /// Apply a partial edit to one item.
    pub fn patch_item(&mut self, id: ItemId, patch: &ItemPatch) -> Result<()> {
        if let Some(span_id) = &patch.span {
            if !self.spans().contains(span_id) {
                return Err(ifc_lite_placement::Error::UnknownSpan(span_id.clone()).into());
            }
        }
        self.item_mut(id)?.apply_patch(patch)?;
        self.commit(Change::Items);
        Ok(())
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ifc_lite_placement::Error::ItemNotFound(id))?;
        let removed = self.items.remove(index);
        self.commit(Change::Items);
        Ok(removed)
    }

    /// Move an item to the nearest conflict-free position to `desired`.
    pub fn snap_item(&mut self, id: ItemId, desired: f64) -> Result<SnapOutcome> {
        let span_id = self.item_ref(id)?.span.clone();
        let span = self.span(&span_id)?;
        let outcome = snap_item(&span, &self.items, id, desired)?;

        self.item_mut(id)?.position = outcome.position;
        self.events.push(SessionEvent::Snapped {
            id,
            position: outcome.position,
            exact: outcome.exact,
        });
        self.commit(Change::Items);
        Ok(outcome)
    }

    /// Run the corrector on every span.
    pub fn auto_correct(&mut self) -> CorrectionReport {
        let spans = self.spans();
        let report = correct_all(&spans, &mut self.items, &self.config.placement);

        for id in &report.disabled {
            if let Some(reason) = self.item(*id).and_then(|item| item.disabled_reason.clone()) {
                self.events.push(SessionEvent::ItemDisabled { id: *id, reason });
            }
        }
        self.commit(Change::Items);
        report
    }

    /// Move every enabled item on `span_id` to its evenly spaced slot.
    pub fn distribute(&mut self, span_id: &SpanId) -> Result<SlotPlan> {
        let plan = self.slots(span_id)?;
        apply_plan(&mut self.items, &plan)?;
        self.commit(Change::Items);
        Ok(plan)
    }

    /// Put item `id` into slot `slot_index` of its span, swapping with the
    /// current occupant.
    pub fn apply_slot(&mut self, id: ItemId, slot_index: usize) -> Result<()> {
        let span_id = self.item_ref(id)?.span.clone();
        let plan = self.slots(&span_id)?;
        apply_slot(&mut self.items, &plan, id, slot_index)?;
        self.commit(Change::Items);
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn insert(&mut self, span: SpanId, kind: ItemKind, position: f64, size: f64) -> Result<ItemId> {
        let id = self.ids.allocate()?;
        let shape = match kind {
            ItemKind::Door => ItemShape::Door,
            ItemKind::Window => ItemShape::Window {
                vertical: self.config.window_defaults,
            },
            ItemKind::Skylight => ItemShape::Skylight {
                vertical: self.config.skylight_defaults,
            },
            ItemKind::DividerOpening => ItemShape::DividerOpening,
        };
        tracing::debug!(item = %id, span = %span, %kind, position, size, "adding item");
        self.items.push(Item::new(id, span, shape, position, size));
        self.commit(Change::Items);
        Ok(id)
    }

    fn item_ref(&self, id: ItemId) -> Result<&Item> {
        self.item(id)
            .ok_or_else(|| ifc_lite_placement::Error::ItemNotFound(id).into())
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ifc_lite_placement::Error::ItemNotFound(id).into())
    }

    /// Configured priority first, then every other span in lexical order;
    /// only spans whose role accepts `kind`.
    fn fallback_order(&self, spans: &SpanTable, kind: ItemKind) -> Vec<SpanId> {
        let mut seen: FxHashSet<SpanId> = FxHashSet::default();
        let mut order: Vec<SpanId> = Vec::new();
        let listed = self.config.span_priority.iter().cloned();
        for id in listed.chain(spans.ids()) {
            if spans.contains(&id) && SpanRole::of(&id).accepts(kind) && seen.insert(id.clone()) {
                order.push(id);
            }
        }
        order
    }

    /// Run the change pipeline once.
    fn commit(&mut self, change: Change) {
        if self.phase != Phase::Idle {
            tracing::trace!(phase = ?self.phase, "commit requested mid-pipeline, ignoring");
            return;
        }

        let spans = self.spans();

        if let Change::Geometry { previous } = change {
            let current = self.params.extent();
            if previous != current {
                self.phase = Phase::Reflowing;
                let report = reflow(&mut self.items, &spans, &previous, &current);
                if !report.scaled.is_empty() {
                    self.events.push(SessionEvent::Reflowed {
                        scaled: report.scaled,
                    });
                }
            }
        }

        self.phase = Phase::Validating;
        let result = validate_all(&spans, &self.items, &self.config.placement);
        if result != self.advisory {
            tracing::debug!(invalid = result.invalid_ids.len(), "advisory changed");
            self.events.push(SessionEvent::AdvisoryChanged {
                invalid_ids: result.invalid_ids.clone(),
            });
            self.advisory = result;
        }

        self.events.push(SessionEvent::ItemsChanged);
        self.phase = Phase::Idle;
    }
}
