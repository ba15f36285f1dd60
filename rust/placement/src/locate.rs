// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-gap search for newly added items.

use crate::error::{Error, Result};
use crate::item::{enabled_on_span, PositionedItem};
use crate::span::{SpanId, SpanMetrics};

/// Find a leading-edge position for a new item of `size` on `span_id`.
///
/// Candidate gaps are tried left to right: before the first item, between
/// consecutive items, after the last item. The first gap that fits wins. An
/// empty span places the item in the centre.
pub fn find_free_position<I: PositionedItem>(
    span_id: &SpanId,
    span: &SpanMetrics,
    items: &[I],
    size: f64,
) -> Result<f64> {
    let no_space = || Error::NoSpace {
        span: span_id.clone(),
        size,
    };

    if !size.is_finite() || size <= 0.0 || size > span.max_item_size() {
        return Err(no_space());
    }

    let on_span = enabled_on_span(items, span_id);

    let Some(first) = on_span.first() else {
        return Ok((span.length - size) / 2.0);
    };

    if first.position() >= span.edge_gap + size + span.min_gap {
        return Ok(span.edge_gap);
    }

    // Furthest end seen so far; a wide item may cover later, shorter ones.
    let mut reach = first.end();
    for next in &on_span[1..] {
        let start = reach + span.min_gap;
        let end = next.position() - span.min_gap;
        if end - start >= size {
            return Ok(start);
        }
        reach = reach.max(next.end());
    }

    let after = reach + span.min_gap;
    if span.length - after >= span.edge_gap + size {
        return Ok(after);
    }

    Err(no_space())
}

/// Try `candidates` in order and return the first span with room.
///
/// Spans missing from `resolve` are skipped.
pub fn find_on_any_span<'a, I, F>(
    candidates: &'a [SpanId],
    resolve: F,
    items: &[I],
    size: f64,
) -> Result<(&'a SpanId, f64)>
where
    I: PositionedItem,
    F: Fn(&SpanId) -> Option<SpanMetrics>,
{
    for span_id in candidates {
        let Some(metrics) = resolve(span_id) else {
            tracing::trace!(span = %span_id, "fallback span not present, skipping");
            continue;
        };
        match find_free_position(span_id, &metrics, items, size) {
            Ok(position) => return Ok((span_id, position)),
            Err(_) => tracing::trace!(span = %span_id, size, "no space, trying next span"),
        }
    }

    Err(Error::NoSpaceOnAnySpan {
        size,
        tried: candidates.len(),
    })
}
