//! The reorder controller: one discrete drag/drop event in, a new element
//! list out.
//!
//! All policy lives here as pure functions over an element slice — the
//! gesture layer only reports what was dragged where. Guards abort drags
//! that would reproduce the current arrangement, spans reflow through the
//! grid engine, and the final splice is a standard remove-then-insert.

use gf_core::grid::{SpanAssignment, compute_rows, rebalance_spans};
use gf_core::id::ElementId;
use gf_core::model::{Breakpoint, Element, FieldValue};
use gf_core::update::{FieldUpdate, UpdateScope};

/// What the gesture started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// Reorder an element already in the list.
    Move,
    /// Place a palette template; it is appended before the reorder runs.
    Add,
}

/// Where the drop landed relative to the target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Left,
    Right,
    Top,
    Bottom,
}

/// One completed drag gesture, as reported by the (external) sensor layer.
#[derive(Debug, Clone)]
pub struct DragEvent {
    pub action: DragAction,
    /// The dragged element (`Move`) or the palette template (`Add`).
    pub source: Element,
    /// Linear index of the source; `None` means the appended tail.
    pub source_index: Option<usize>,
    /// The drop target, if the gesture ended over one.
    pub target: Option<ElementId>,
    pub target_index: usize,
    pub position: DropPosition,
}

/// Inclusive `(start, len)` ranges of each grid row.
fn row_ranges(elements: &[Element], breakpoint: Breakpoint) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for row in compute_rows(elements, breakpoint) {
        ranges.push((start, row.len()));
        start += row.len();
    }
    ranges
}

fn range_containing(ranges: &[(usize, usize)], index: usize) -> Option<(usize, usize)> {
    ranges
        .iter()
        .copied()
        .find(|(start, len)| (*start..start + len).contains(&index))
}

/// Resolve a move of `source_index` onto `target_index`/`position` into a
/// new element list, or `None` when the drag is a defined no-op.
///
/// Span writes follow the element model's write contract at the active
/// breakpoint (base at `compact`, that tier's override otherwise).
pub fn apply_move(
    elements: &[Element],
    breakpoint: Breakpoint,
    source_index: usize,
    target_index: usize,
    position: DropPosition,
) -> Option<Vec<Element>> {
    if source_index >= elements.len() || target_index >= elements.len() {
        log::debug!("drag indices out of range ({source_index}, {target_index}); ignored");
        return None;
    }

    // Guards: these drags would land in an identical arrangement, so they
    // abort silently instead of churning spans.
    let noop = match position {
        DropPosition::Left | DropPosition::Right => source_index == target_index,
        DropPosition::Bottom => source_index.checked_sub(target_index) == Some(1),
        DropPosition::Top => target_index.checked_sub(source_index) == Some(1),
    };
    if noop {
        log::trace!("no-op drag guard hit at index {source_index} ({position:?})");
        return None;
    }

    let ranges = row_ranges(elements, breakpoint);
    let target_row = range_containing(&ranges, target_index)?;
    let source_row = range_containing(&ranges, source_index)?;
    let same_row = target_row == source_row;

    let target_row_first = target_row.0;
    let target_row_last = target_row.0 + target_row.1 - 1;

    // Span reflow. A left/right drop inside one row only reorders.
    let mut span_updates: Vec<SpanAssignment> = Vec::new();
    let vertical = matches!(position, DropPosition::Top | DropPosition::Bottom);
    if vertical || !same_row {
        if vertical {
            // The source becomes a row of its own.
            span_updates.extend(rebalance_spans(&[&elements[source_index]]));
        } else {
            let mut joined: Vec<&Element> = elements
                [target_row.0..target_row.0 + target_row.1]
                .iter()
                .collect();
            joined.push(&elements[source_index]);
            span_updates.extend(rebalance_spans(&joined));
        }

        // Whatever row the source leaves gets its remainder rebalanced.
        let remainder: Vec<&Element> = elements[source_row.0..source_row.0 + source_row.1]
            .iter()
            .filter(|el| el.id != elements[source_index].id)
            .collect();
        span_updates.extend(rebalance_spans(&remainder));
    }

    // Insertion index, applied after the removal below shifts the tail.
    let new_index = match position {
        DropPosition::Left => target_index,
        DropPosition::Right => {
            if source_index > target_index {
                target_index
            } else {
                target_index + 1
            }
        }
        DropPosition::Top => {
            if source_index < target_index {
                target_row_first.saturating_sub(1)
            } else {
                target_row_first
            }
        }
        DropPosition::Bottom => {
            if source_index < target_index {
                target_row_last
            } else {
                target_row_last + 1
            }
        }
    };

    let scope = UpdateScope::for_edit(breakpoint, false);
    let mut next: Vec<Element> = elements.to_vec();
    for assignment in &span_updates {
        if let Some(slot) = next.iter_mut().find(|el| el.id == assignment.id) {
            *slot = slot.with_update(&FieldUpdate::new(
                "properties.style.columnSpan",
                FieldValue::text(assignment.span.to_string()),
                scope,
            ));
        }
    }

    let moved = next.remove(source_index);
    let insert_at = new_index.min(next.len());
    log::debug!(
        "moving `{}` from {source_index} to {insert_at} ({position:?})",
        moved.id
    );
    next.insert(insert_at, moved);
    Some(next)
}

/// Remove `id`, first rebalancing the spans of its former row's remaining
/// members. Returns `None` when the id is not in the list.
pub fn remove_with_reflow(
    elements: &[Element],
    breakpoint: Breakpoint,
    id: ElementId,
) -> Option<Vec<Element>> {
    let index = elements.iter().position(|el| el.id == id)?;

    let ranges = row_ranges(elements, breakpoint);
    let row = range_containing(&ranges, index)?;
    let remainder: Vec<&Element> = elements[row.0..row.0 + row.1]
        .iter()
        .filter(|el| el.id != id)
        .collect();
    let span_updates = rebalance_spans(&remainder);

    let scope = UpdateScope::for_edit(breakpoint, false);
    let mut next: Vec<Element> = elements.to_vec();
    for assignment in &span_updates {
        if let Some(slot) = next.iter_mut().find(|el| el.id == assignment.id) {
            *slot = slot.with_update(&FieldUpdate::new(
                "properties.style.columnSpan",
                FieldValue::text(assignment.span.to_string()),
                scope,
            ));
        }
    }
    next.remove(index);
    log::debug!("removed `{id}` and rebalanced {} row siblings", span_updates.len());
    Some(next)
}
