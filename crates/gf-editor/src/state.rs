//! The builder session: the element list and every mutation against it.
//!
//! The list is the single piece of shared mutable state. Every mutation is
//! copy-on-write (it builds a new list and new elements rather than editing
//! in place) and completes before the next read, which is also what makes
//! snapshot undo trivial. Resolution always takes the active
//! breakpoint as an explicit parameter; nothing here is ambient.

use crate::history::History;
use crate::reorder::{self, DragAction, DragEvent};
use gf_core::codegen::{self, GeneratedDocument};
use gf_core::document::{self, DocumentError};
use gf_core::grid::{Rows, compute_rows};
use gf_core::id::ElementId;
use gf_core::model::{Breakpoint, Element, ElementKind, FieldValue};
use gf_core::palette;
use gf_core::update::{FieldUpdate, UpdateScope};
use std::collections::HashMap;

const DEFAULT_TITLE: &str = "generatedForm";
const HISTORY_DEPTH: usize = 100;

/// One editing session over one composition.
pub struct BuilderState {
    elements: Vec<Element>,
    breakpoint: Breakpoint,
    selected: Option<ElementId>,
    title: String,
    /// Per-kind running counters backing fresh-id assignment.
    counters: HashMap<ElementKind, u64>,
    history: History,
}

impl BuilderState {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            breakpoint: Breakpoint::Compact,
            selected: None,
            title: DEFAULT_TITLE.to_owned(),
            counters: HashMap::new(),
            history: History::new(HISTORY_DEPTH),
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The current row partition at the active breakpoint.
    pub fn rows(&self) -> Rows<'_> {
        compute_rows(&self.elements, self.breakpoint)
    }

    // ─── Session settings ────────────────────────────────────────────

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    // ─── Mutations ───────────────────────────────────────────────────

    /// Place a clone of `template` at the tail with a fresh id; the `id`
    /// attribute mirrors the element id.
    pub fn add_element(&mut self, template: &Element) -> ElementId {
        let id = self.fresh_id(template.kind);
        let mut element = template.clone();
        element.id = id;
        element
            .attributes
            .insert("id".into(), id.as_str().to_owned());

        self.history.record(&self.elements);
        log::debug!("adding `{id}` ({})", element.kind);
        self.elements.push(element);
        self.selected = Some(id);
        id
    }

    /// Place a palette template by kind.
    pub fn add_from_palette(&mut self, kind: ElementKind) -> Option<ElementId> {
        palette::template(kind).map(|template| self.add_element(&template))
    }

    /// A globally-unique id from the kind's running counter. The counter
    /// only moves forward; loaded documents may already hold ids from
    /// earlier sessions, so candidates are checked against the list.
    fn fresh_id(&mut self, kind: ElementKind) -> ElementId {
        let counter = self.counters.entry(kind).or_insert(0);
        loop {
            let candidate = format!("{}-{}", kind.as_str(), counter);
            *counter += 1;
            if !self.elements.iter().any(|el| el.id.as_str() == candidate) {
                return ElementId::intern(&candidate);
            }
        }
    }

    /// Remove an element, rebalancing its former row's spans first.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(next) = reorder::remove_with_reflow(&self.elements, self.breakpoint, id) else {
            return false;
        };
        self.history.record(&self.elements);
        self.elements = next;
        if self.selected == Some(id) {
            self.selected = None;
        }
        true
    }

    /// Edit one field of one element through the breakpoint write
    /// contract: `compact` edits the base bag; other tiers edit their
    /// override bag unless `apply_to_all_breakpoints` collapses the edit
    /// into the base.
    pub fn update_field(
        &mut self,
        id: ElementId,
        path: &str,
        value: FieldValue,
        apply_to_all_breakpoints: bool,
    ) -> bool {
        let Some(index) = self.elements.iter().position(|el| el.id == id) else {
            return false;
        };
        let scope = UpdateScope::for_edit(self.breakpoint, apply_to_all_breakpoints);
        let update = FieldUpdate::new(path, value, scope);
        let updated = self.elements[index].with_update(&update);
        if updated == self.elements[index] {
            return false;
        }

        self.history.record(&self.elements);
        let mut next = self.elements.clone();
        next[index] = updated;
        self.elements = next;
        true
    }

    /// Plain splice move (no span changes); used by list-level reordering
    /// outside drag gestures.
    pub fn move_element(&mut self, old_index: usize, new_index: usize) -> bool {
        if old_index >= self.elements.len() {
            return false;
        }
        self.history.record(&self.elements);
        let mut next = self.elements.clone();
        let moved = next.remove(old_index);
        let moved_id = moved.id;
        let insert_at = new_index.min(next.len());
        next.insert(insert_at, moved);
        self.elements = next;
        self.selected = Some(moved_id);
        true
    }

    /// Consume one drag/drop event from the gesture layer. The whole
    /// gesture (a possible palette add, span reflow, and the splice) is
    /// one undo step. Returns whether anything changed.
    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        if event.target.is_none() {
            log::debug!("drag ended without a drop target; ignored");
            return false;
        }

        self.history.begin_batch(&self.elements);

        let source_index = match event.action {
            DragAction::Add => {
                self.add_element(&event.source);
                self.elements.len() - 1
            }
            DragAction::Move => event
                .source_index
                .unwrap_or_else(|| self.elements.len().saturating_sub(1)),
        };

        let moved = match reorder::apply_move(
            &self.elements,
            self.breakpoint,
            source_index,
            event.target_index,
            event.position,
        ) {
            Some(next) => {
                self.history.record(&self.elements);
                let moved_id = self.elements[source_index].id;
                self.elements = next;
                self.selected = Some(moved_id);
                true
            }
            // A guard fired. For `add` the element stays where it was
            // appended; only the reflow is skipped.
            None => false,
        };

        self.history.end_batch(&self.elements);
        moved || event.action == DragAction::Add
    }

    // ─── Undo / redo ─────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.elements.clone()) {
            Some(snapshot) => {
                self.elements = snapshot;
                self.selected = None;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.elements.clone()) {
            Some(snapshot) => {
                self.elements = snapshot;
                self.selected = None;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Documents & export ──────────────────────────────────────────

    /// Replace the composition from a serialized document. On error the
    /// current list is left untouched.
    pub fn load(&mut self, input: &str) -> Result<(), DocumentError> {
        let elements = document::load_document(input)?;
        self.history.record(&self.elements);
        self.elements = elements;
        self.selected = None;
        Ok(())
    }

    pub fn save(&self) -> String {
        document::save_document(&self.elements)
    }

    /// The exported source document.
    pub fn export_document(&self) -> GeneratedDocument {
        codegen::generate_document(&self.elements, &self.title)
    }

    pub fn export_file_name(&self) -> String {
        codegen::export_file_name(&self.title)
    }

    /// Installation command for the UI components the export imports.
    pub fn install_instructions(&self) -> Option<String> {
        codegen::install_instructions(&self.export_document().dependencies)
    }

    /// JSON preview of the live element list.
    pub fn json_preview(&self) -> serde_json::Value {
        codegen::json_preview(&self.elements)
    }
}

impl Default for BuilderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_ids_count_per_kind() {
        let mut state = BuilderState::new();
        let a = state.add_from_palette(ElementKind::SingleLineInput).unwrap();
        let b = state.add_from_palette(ElementKind::SingleLineInput).unwrap();
        let c = state.add_from_palette(ElementKind::Select).unwrap();
        assert_eq!(a.as_str(), "single-line-input-0");
        assert_eq!(b.as_str(), "single-line-input-1");
        assert_eq!(c.as_str(), "select-0");
    }

    #[test]
    fn added_element_mirrors_id_attribute() {
        let mut state = BuilderState::new();
        let id = state.add_from_palette(ElementKind::EmailInput).unwrap();
        let element = state.element(id).unwrap();
        assert_eq!(element.attr("id"), Some(id.as_str()));
    }

    #[test]
    fn fresh_ids_skip_loaded_collisions() {
        let mut state = BuilderState::new();
        state
            .load(r#"[{ "id": "switch-0", "type": "switch", "category": "layout-participant" }]"#)
            .unwrap();
        let id = state.add_from_palette(ElementKind::Switch).unwrap();
        assert_eq!(id.as_str(), "switch-1");
    }

    #[test]
    fn update_field_targets_active_breakpoint() {
        let mut state = BuilderState::new();
        let id = state.add_from_palette(ElementKind::SingleLineInput).unwrap();

        state.set_breakpoint(Breakpoint::Medium);
        assert!(state.update_field(
            id,
            "properties.style.columnSpan",
            FieldValue::text("6"),
            false
        ));

        let element = state.element(id).unwrap();
        assert_eq!(element.properties.style.column_span, "12");
        assert_eq!(element.resolved_span(Breakpoint::Medium), 6);
        assert_eq!(element.resolved_span(Breakpoint::Wide), 6); // medium fallback
        assert_eq!(element.resolved_span(Breakpoint::Compact), 12);
    }

    #[test]
    fn removing_selected_element_clears_selection() {
        let mut state = BuilderState::new();
        let id = state.add_from_palette(ElementKind::Checkbox).unwrap();
        assert_eq!(state.selected(), Some(id));
        assert!(state.remove(id));
        assert_eq!(state.selected(), None);
        assert!(state.elements().is_empty());
    }

    #[test]
    fn failed_load_leaves_state_untouched() {
        let mut state = BuilderState::new();
        state.add_from_palette(ElementKind::Select).unwrap();
        let before = state.elements().to_vec();

        assert!(state.load("{\"not\": \"an array\"}").is_err());
        assert_eq!(state.elements(), before.as_slice());
    }
}
