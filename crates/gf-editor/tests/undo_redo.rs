//! Integration tests: snapshot undo/redo through the builder state
//! (gf-editor), including drag-gesture batching.

use gf_core::model::{Breakpoint, ElementKind, FieldValue};
use gf_editor::{BuilderState, DragAction, DragEvent, DropPosition};
use pretty_assertions::assert_eq;

fn order(state: &BuilderState) -> Vec<&str> {
    state.elements().iter().map(|el| el.id.as_str()).collect()
}

#[test]
fn undo_walks_back_through_adds() {
    let mut state = BuilderState::new();
    state.add_from_palette(ElementKind::SingleLineInput).unwrap();
    state.add_from_palette(ElementKind::Select).unwrap();
    assert_eq!(order(&state), vec!["single-line-input-0", "select-0"]);

    assert!(state.undo());
    assert_eq!(order(&state), vec!["single-line-input-0"]);
    assert!(state.undo());
    assert!(state.elements().is_empty());
    assert!(!state.can_undo());

    assert!(state.redo());
    assert!(state.redo());
    assert_eq!(order(&state), vec!["single-line-input-0", "select-0"]);
    assert!(!state.can_redo());
}

#[test]
fn field_edit_is_one_undo_step() {
    let mut state = BuilderState::new();
    let id = state.add_from_palette(ElementKind::NumericInput).unwrap();
    assert!(state.update_field(id, "label", FieldValue::text("Amount"), false));
    assert_eq!(state.element(id).unwrap().label, "Amount");

    assert!(state.undo());
    assert_eq!(state.element(id).unwrap().label, "Number");
}

#[test]
fn new_mutation_clears_redo() {
    let mut state = BuilderState::new();
    state.add_from_palette(ElementKind::Switch).unwrap();
    assert!(state.undo());
    assert!(state.can_redo());

    state.add_from_palette(ElementKind::Checkbox).unwrap();
    assert!(!state.can_redo());
}

#[test]
fn drag_gesture_undoes_as_a_single_step() {
    let mut state = BuilderState::new();
    for _ in 0..2 {
        state.add_from_palette(ElementKind::SingleLineInput).unwrap();
    }
    let before = state.elements().to_vec();

    // Drag the second input beside the first: span reflow plus splice.
    let event = DragEvent {
        action: DragAction::Move,
        source: state.elements()[1].clone(),
        source_index: Some(1),
        target: Some(state.elements()[0].id),
        target_index: 0,
        position: DropPosition::Right,
    };
    assert!(state.handle_drag(event));
    assert_eq!(
        state.elements()[0].resolved_span(Breakpoint::Compact),
        6
    );

    assert!(state.undo());
    assert_eq!(state.elements(), before.as_slice());

    assert!(state.redo());
    assert_eq!(
        state.elements()[0].resolved_span(Breakpoint::Compact),
        6
    );
}

#[test]
fn guarded_add_drag_keeps_placement_and_undoes_in_one_step() {
    let mut state = BuilderState::new();
    state.add_from_palette(ElementKind::MultilineInput).unwrap();
    let before = state.elements().to_vec();

    // Dropping the template right below the last element trips the
    // adjacent-bottom guard: the placement persists, only the reflow is
    // skipped.
    let event = DragEvent {
        action: DragAction::Add,
        source: gf_core::palette::template(ElementKind::Button).unwrap(),
        source_index: None,
        target: Some(state.elements()[0].id),
        target_index: 0,
        position: DropPosition::Bottom,
    };
    assert!(state.handle_drag(event));
    assert_eq!(order(&state), vec!["multiline-input-0", "button-0"]);

    // One undo removes the placement.
    assert!(state.undo());
    assert_eq!(state.elements(), before.as_slice());
}
