// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for placement operations.
//!
//! Only action-blocking failures live here. Boundary and overlap problems are
//! advisory and reported through [`crate::validate::Violation`] instead.

use crate::item::ItemId;
use crate::span::SpanId;

/// Result type alias for placement operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that reject a placement action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A referenced item does not exist.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// A referenced span is not produced by the current building geometry.
    #[error("span not found: {0}")]
    UnknownSpan(SpanId),

    /// No gap on the span can hold an item of the requested size.
    #[error("no space for an item of size {size} on span {span}")]
    NoSpace { span: SpanId, size: f64 },

    /// Every span in the fallback order was tried and none had room.
    #[error("no space for an item of size {size} on any of {tried} spans")]
    NoSpaceOnAnySpan { size: f64, tried: usize },

    /// A distribution slot index past the end of the slot plan.
    #[error("slot {index} out of range (plan has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    /// A patch carried a value the item cannot take.
    #[error("invalid patch for item {id}: {reason}")]
    InvalidPatch { id: ItemId, reason: String },
}
