//! Serialized documents: a JSON array of element records.
//!
//! Loading is all-or-nothing — a malformed document is rejected with a
//! descriptive error and the caller's in-memory state stays untouched.
//! Saving emits the canonical form (absent optionals omitted), so
//! load → save round-trips canonically-saved documents byte-for-byte.

use crate::model::{Breakpoint, Element};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Why a serialized document was rejected.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be an array of elements")]
    NotAnArray,

    #[error("element {index} is malformed: {message}")]
    BadElement { index: usize, message: String },

    #[error(
        "element {index} (`{id}`) has an override for the base breakpoint; \
         the base bag is the compact tier"
    )]
    CompactOverride { index: usize, id: String },

    #[error("duplicate element id `{id}` (elements {first} and {second})")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("element {index} (`{id}`) repeats option value `{value}`")]
    DuplicateOptionValue {
        index: usize,
        id: String,
        value: String,
    },
}

/// Parse and validate a serialized document.
pub fn load_document(input: &str) -> Result<Vec<Element>, DocumentError> {
    let root: Value = serde_json::from_str(input)?;
    let Value::Array(records) = root else {
        return Err(DocumentError::NotAnArray);
    };

    let mut elements = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let element: Element = serde_json::from_value(record)
            .map_err(|e| DocumentError::BadElement {
                index,
                message: e.to_string(),
            })?;

        if element.overrides.contains_key(&Breakpoint::Compact) {
            return Err(DocumentError::CompactOverride {
                index,
                id: element.id.as_str().to_owned(),
            });
        }

        let mut seen_values = HashMap::new();
        for option in &element.options {
            if seen_values.insert(option.value.as_str(), ()).is_some() {
                return Err(DocumentError::DuplicateOptionValue {
                    index,
                    id: element.id.as_str().to_owned(),
                    value: option.value.clone(),
                });
            }
        }

        elements.push(element);
    }

    let mut seen_ids: HashMap<&str, usize> = HashMap::new();
    for (index, element) in elements.iter().enumerate() {
        if let Some(&first) = seen_ids.get(element.id.as_str()) {
            return Err(DocumentError::DuplicateId {
                id: element.id.as_str().to_owned(),
                first,
                second: index,
            });
        }
        seen_ids.insert(element.id.as_str(), index);
    }

    log::debug!("loaded document with {} elements", elements.len());
    Ok(elements)
}

/// Serialize the composition in canonical form.
pub fn save_document(elements: &[Element]) -> String {
    // Serializing plain data to JSON cannot fail; keep the signature
    // infallible like the rest of the export surface.
    serde_json::to_string_pretty(elements).unwrap_or_else(|_| "[]".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Breakpoint, FieldValue};
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"[
  {
    "id": "single-line-input-0",
    "type": "single-line-input",
    "category": "layout-participant",
    "attributes": { "id": "single-line-input-0", "type": "text" },
    "label": "Name",
    "overrides": {
      "wide": { "properties": { "style": { "columnSpan": "6" } } }
    }
  },
  {
    "id": "submit-button-0",
    "type": "submit-button",
    "category": "layout-participant",
    "attributes": { "id": "submit-button-0", "type": "submit" },
    "content": "Submit"
  }
]"#;

    #[test]
    fn load_reconstructs_overrides() {
        let elements = load_document(DOC).unwrap();
        assert_eq!(elements.len(), 2);
        let first = &elements[0];
        assert_eq!(
            first.resolve_path("properties.style.columnSpan", Breakpoint::Wide),
            Some(FieldValue::text("6"))
        );
        // Medium has no override of its own: base applies.
        assert_eq!(
            first.resolve_path("properties.style.columnSpan", Breakpoint::Medium),
            Some(FieldValue::text("12"))
        );
    }

    #[test]
    fn save_load_save_is_stable() {
        let elements = load_document(DOC).unwrap();
        let saved = save_document(&elements);
        let reloaded = load_document(&saved).unwrap();
        assert_eq!(reloaded, elements);
        assert_eq!(save_document(&reloaded), saved);
    }

    #[test]
    fn non_array_root_is_rejected() {
        let err = load_document(r#"{"components": []}"#).unwrap_err();
        assert!(matches!(err, DocumentError::NotAnArray));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            load_document("[{"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn missing_required_fields_are_rejected_with_index() {
        let err = load_document(r#"[{"id": "x"}]"#).unwrap_err();
        match err {
            DocumentError::BadElement { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn compact_override_is_rejected() {
        let doc = r#"[
  {
    "id": "a",
    "type": "select",
    "category": "layout-participant",
    "overrides": { "compact": {} }
  }
]"#;
        assert!(matches!(
            load_document(doc),
            Err(DocumentError::CompactOverride { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let doc = r#"[
  { "id": "a", "type": "select", "category": "layout-participant" },
  { "id": "a", "type": "switch", "category": "layout-participant" }
]"#;
        match load_document(doc).unwrap_err() {
            DocumentError::DuplicateId { first, second, .. } => {
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_option_values_are_rejected() {
        let doc = r#"[
  {
    "id": "a",
    "type": "select",
    "category": "layout-participant",
    "options": [
      { "label": "One", "value": "x" },
      { "label": "Two", "value": "x" }
    ]
  }
]"#;
        assert!(matches!(
            load_document(doc),
            Err(DocumentError::DuplicateOptionValue { .. })
        ));
    }
}
