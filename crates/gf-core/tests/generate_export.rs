//! Integration tests: the export pipeline over a realistic composition
//! (gf-core) — schema, code, manifest, and install instructions together.

use gf_core::model::{Breakpoint, ElementKind, ScalarValue};
use gf_core::schema::{default_values, object_schema};
use gf_core::{ElementId, compute_rows, generate_document, install_instructions, palette};
use pretty_assertions::assert_eq;

fn place(kind: ElementKind, counter: u64) -> gf_core::Element {
    let mut element = palette::template(kind).expect("palette covers every kind");
    let id = format!("{}-{counter}", kind.as_str());
    element.id = ElementId::intern(&id);
    element.attributes.insert("id".into(), id);
    element
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small contact form: intro text, two half-width inputs, a quantity
/// field whose bounds force it required, a date, and a submit button.
fn contact_form() -> Vec<gf_core::Element> {
    let mut intro = place(ElementKind::TextBlock, 0);
    intro.content = Some(r#"<p class="intro">Get in touch<br></p>"#.into());

    let mut name = place(ElementKind::SingleLineInput, 0);
    name.label = "Name".into();
    name.properties.style.column_span = "6".into();
    name.validations.required = Some("yes".into());
    name.validations.min_length = Some(ScalarValue::Number(2.0));
    name.value = Some(ScalarValue::Text("Ada".into()));

    let mut email = place(ElementKind::EmailInput, 0);
    email.label = "Email".into();
    email.properties.style.column_span = "6".into();

    let mut quantity = place(ElementKind::NumericInput, 0);
    quantity.label = "Quantity".into();
    quantity.validations.required = Some("no".into());
    quantity.validations.min = Some(ScalarValue::Number(1.0));
    quantity.validations.max = Some(ScalarValue::Number(10.0));
    quantity.validations.min_length = Some(ScalarValue::Number(1.0));
    quantity.validations.max_length = Some(ScalarValue::Number(2.0));
    quantity.value = Some(ScalarValue::Text("3".into()));

    let mut when = place(ElementKind::DatePicker, 0);
    when.label = "Preferred date".into();
    when.validations.required = Some("yes".into());

    let submit = place(ElementKind::SubmitButton, 0);

    vec![intro, name, email, quantity, when, submit]
}

#[test]
fn composition_partitions_into_expected_rows() {
    let elements = contact_form();
    let rows: Vec<usize> = compute_rows(&elements, Breakpoint::Compact)
        .map(<[gf_core::Element]>::len)
        .collect();
    // Text block, then the two half-width inputs share a row, then one
    // full-width row each.
    assert_eq!(rows, vec![1, 2, 1, 1, 1]);
}

#[test]
fn schema_skips_content_and_forces_bounded_fields() {
    let elements = contact_form();
    let schema = object_schema(&elements);
    let keys: Vec<&str> = schema.fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "single-line-input-0",
            "email-input-0",
            "numeric-input-0",
            "date-picker-0",
            "submit-button-0",
        ]
    );

    let source = schema.to_source();
    // `required: "no"` plus all four non-zero bounds still forces the
    // coercing required chain.
    assert!(source.contains(
        "\"numeric-input-0\": z.coerce.number({ invalid_type_error: \"This field must be a number\" })\
         .min(1, { message: \"This field is required\" })\
         .min(1, { message: \"Must be at least 1\" })\
         .max(10, { message: \"Must be at most 10\" })"
    ));
    assert!(source.contains("\"email-input-0\": z.string().optional()"));
}

#[test]
fn defaults_follow_schema_keys_and_coerce_numbers() {
    let elements = contact_form();
    let defaults = default_values(&elements);
    assert_eq!(defaults[0].1, Some(ScalarValue::Text("Ada".into())));
    assert_eq!(defaults[2].1, Some(ScalarValue::Number(3.0)));
    assert_eq!(defaults[4].1, None); // the submit button has no value
}

#[test]
fn generated_document_is_deterministic_and_self_contained() {
    init_logging();
    let elements = contact_form();
    let first = generate_document(&elements, "contact form");
    let second = generate_document(&elements, "contact form");
    assert_eq!(first.code, second.code);
    assert_eq!(first.dependencies, second.dependencies);

    let code = &first.code;
    assert!(code.starts_with("\"use client\";"));
    assert!(code.contains("export default function Contactform()"));

    // One import line per module, each exactly once, Input deduplicated
    // across the two input elements.
    assert_eq!(
        code.matches("import { Input } from \"@/components/ui/input\";")
            .count(),
        1
    );
    assert!(code.contains(
        "import { Form, FormControl, FormDescription, FormField, FormItem, FormLabel, FormMessage } from \"@/components/ui/form\";"
    ));
    assert!(code.contains("import { format } from \"date-fns\";"));

    // Layout participants bind through FormField; the text block embeds
    // directly with its rewritten markup.
    assert_eq!(code.matches("<FormField").count(), 5);
    assert!(code.contains("className=\"intro\""));
    assert!(code.contains("<br />"));
}

#[test]
fn install_instructions_cover_ui_modules_in_manifest_order() {
    let elements = contact_form();
    let document = generate_document(&elements, "contact form");
    assert_eq!(
        install_instructions(&document.dependencies),
        Some("npx shadcn@latest add form input button calendar popover".to_owned())
    );
}

#[test]
fn evaluable_and_textual_schema_agree_on_a_sample() {
    let elements = contact_form();
    let schema = object_schema(&elements);

    let ok = serde_json::json!({
        "single-line-input-0": "Ada",
        "email-input-0": null,
        "numeric-input-0": "5",
        "date-picker-0": "2026-08-07",
        "submit-button-0": null,
    });
    // The submit button synthesizes an optional string; null passes.
    assert!(schema.check(&ok).is_empty());

    let bad = serde_json::json!({
        "single-line-input-0": "A",
        "numeric-input-0": "25",
    });
    let issues = schema.check(&bad);
    let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
    assert!(messages.contains(&"Must be at least 2 characters"));
    assert!(messages.contains(&"Must be at most 10"));
    assert!(messages.contains(&"This field is required.")); // missing date
}
