//! Integration tests: document load/save round-trips (gf-core).
//!
//! Documents are the one external surface of the model; load → save must
//! be lossless for every field, overrides included.

use gf_core::model::{Breakpoint, Category, ElementKind, FieldValue, ScalarValue};
use gf_core::palette;
use gf_core::{ElementId, load_document, save_document};
use pretty_assertions::assert_eq;

/// A placed element the way the editor would create it: template clone,
/// counter-derived id, mirrored id attribute.
fn place(kind: ElementKind, counter: u64) -> gf_core::Element {
    let mut element = palette::template(kind).expect("palette covers every kind");
    let id = format!("{}-{counter}", kind.as_str());
    element.id = ElementId::intern(&id);
    element.attributes.insert("id".into(), id);
    element
}

#[test]
fn canonical_documents_roundtrip_byte_for_byte() {
    let mut name = place(ElementKind::SingleLineInput, 0);
    name.label = "Full name".into();
    name.validations.required = Some("yes".into());
    name.value = Some(ScalarValue::Text("Ada Lovelace".into()));

    let mut age = place(ElementKind::NumericInput, 0);
    age.validations.min = Some(ScalarValue::Number(18.0));
    age.overrides
        .entry(Breakpoint::Medium)
        .or_default()
        .properties
        .style
        .column_span = Some("6".into());

    let select = place(ElementKind::Select, 0);
    let submit = place(ElementKind::SubmitButton, 0);

    let elements = vec![name, age, select, submit];
    let saved = save_document(&elements);

    let loaded = load_document(&saved).expect("canonical save must load");
    assert_eq!(loaded, elements);
    assert_eq!(save_document(&loaded), saved);
}

#[test]
fn wide_only_override_survives_and_resolves_asymmetrically() {
    let mut element = place(ElementKind::MultilineInput, 0);
    element
        .overrides
        .entry(Breakpoint::Wide)
        .or_default()
        .properties
        .style
        .column_span = Some("4".into());

    let saved = save_document(std::slice::from_ref(&element));
    let loaded = load_document(&saved).expect("wide-only override loads");
    assert_eq!(loaded[0], element);

    // Wide resolves to the override, medium to the base.
    assert_eq!(
        loaded[0].resolve_path("properties.style.columnSpan", Breakpoint::Wide),
        Some(FieldValue::text("4"))
    );
    assert_eq!(
        loaded[0].resolve_path("properties.style.columnSpan", Breakpoint::Medium),
        Some(FieldValue::text("12"))
    );
    assert_eq!(
        loaded[0].resolve_path("properties.style.columnSpan", Breakpoint::Compact),
        Some(FieldValue::text("12"))
    );
}

#[test]
fn every_palette_kind_roundtrips() {
    let elements: Vec<_> = ElementKind::ALL
        .iter()
        .map(|&kind| place(kind, 7))
        .collect();
    let saved = save_document(&elements);
    let loaded = load_document(&saved).expect("all kinds load");
    assert_eq!(loaded, elements);
    assert!(
        loaded
            .iter()
            .any(|el| el.category == Category::Content),
        "the text block is a content element"
    );
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(load_document("42").is_err());
    assert!(load_document(r#"[{"type": "select"}]"#).is_err());
    assert!(load_document("[").is_err());
}
