// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Item id allocation.

use ifc_lite_placement::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hands out item ids that are never reused within a session.
///
/// The counter is wider than an id so observing `u32::MAX` cannot wrap; once
/// every id is taken, allocation fails instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that continues after every id in `existing`.
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a ItemId>) -> Self {
        let mut allocator = Self::new();
        for id in existing {
            allocator.observe(*id);
        }
        allocator
    }

    pub fn allocate(&mut self) -> Result<ItemId> {
        let id = self.peek().ok_or(Error::IdsExhausted)?;
        self.next += 1;
        Ok(id)
    }

    /// Make sure `id` is never handed out.
    pub fn observe(&mut self, id: ItemId) {
        self.next = self.next.max(u64::from(id.0) + 1);
    }

    /// Next id to be handed out, or `None` when the id space is used up.
    pub fn peek(&self) -> Option<ItemId> {
        u32::try_from(self.next).ok().map(ItemId)
    }
}
