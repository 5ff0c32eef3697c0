//! Tagged field updates.
//!
//! Property-panel edits and reorder span writes never deep-merge: they are
//! expressed as a [`FieldUpdate`] (an ordered field path, a value, and an
//! explicit scope) applied functionally to produce a new [`Element`]. This
//! keeps breakpoints from aliasing into each other.

use crate::model::{Breakpoint, Element, FieldPath, FieldValue, ScalarValue};

/// Where an edit lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScope {
    /// The base bag; affects every breakpoint.
    Base,
    /// One breakpoint's override bag. Never `compact`.
    Override(Breakpoint),
}

impl UpdateScope {
    /// The scope an edit takes while `active` is the current breakpoint.
    ///
    /// Editing at `compact` always writes base. At `medium`/`wide` the
    /// edit goes to that breakpoint's override bag unless the caller asked
    /// for the edit to apply to every breakpoint.
    pub fn for_edit(active: Breakpoint, apply_to_all_breakpoints: bool) -> Self {
        if active == Breakpoint::Compact || apply_to_all_breakpoints {
            UpdateScope::Base
        } else {
            UpdateScope::Override(active)
        }
    }
}

/// One functional edit of one element field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: FieldPath,
    pub value: FieldValue,
    pub scope: UpdateScope,
}

impl FieldUpdate {
    pub fn new(path: impl Into<FieldPath>, value: FieldValue, scope: UpdateScope) -> Self {
        Self {
            path: path.into(),
            value,
            scope,
        }
    }
}

impl Element {
    /// Apply `update`, producing a new element. Unknown paths leave the
    /// element unchanged (and log), matching resolution's `None` contract.
    #[must_use]
    pub fn with_update(&self, update: &FieldUpdate) -> Element {
        let mut next = self.clone();
        let segments = update.path.segments();
        let written = match update.scope {
            UpdateScope::Base => write_base(&mut next, &segments, &update.value),
            UpdateScope::Override(bp) => {
                debug_assert_ne!(bp, Breakpoint::Compact);
                write_override(&mut next, bp, &segments, &update.value)
            }
        };
        if !written {
            log::warn!(
                "ignoring update to unknown field `{}` on `{}`",
                update.path,
                self.id
            );
            return self.clone();
        }
        next
    }
}

fn write_base(el: &mut Element, segments: &[&str], value: &FieldValue) -> bool {
    match segments {
        ["properties", "style", key] => el.properties.style.set(key, value.to_string()),
        ["properties", "variant"] => {
            el.properties.variant = value.to_string();
            true
        }
        ["attributes", key] => {
            el.attributes.insert((*key).to_owned(), value.to_string());
            true
        }
        ["label"] => {
            el.label = value.to_string();
            true
        }
        ["labelDescription"] => {
            el.label_description = Some(value.to_string());
            true
        }
        ["hint"] => {
            el.hint = Some(value.to_string());
            true
        }
        ["content"] => {
            el.content = Some(value.to_string());
            true
        }
        ["description"] => {
            el.description = Some(value.to_string());
            true
        }
        ["value"] => {
            el.value = Some(match value {
                FieldValue::Number(n) => ScalarValue::Number(*n),
                FieldValue::Text(s) => ScalarValue::Text(s.clone()),
            });
            true
        }
        _ => false,
    }
}

fn write_override(
    el: &mut Element,
    breakpoint: Breakpoint,
    segments: &[&str],
    value: &FieldValue,
) -> bool {
    // Validate the path before materializing an override entry, so a
    // rejected write cannot leave an empty bag behind.
    let valid = match segments {
        ["properties", "style", key] => el.properties.style.get(key).is_some(),
        ["properties", "variant"]
        | ["attributes", _]
        | ["label"]
        | ["labelDescription"]
        | ["content"] => true,
        _ => false,
    };
    if !valid {
        return false;
    }

    let bag = el.overrides.entry(breakpoint).or_default();
    match segments {
        ["properties", "style", key] => bag.properties.style.set(key, value.to_string()),
        ["properties", "variant"] => {
            bag.properties.variant = Some(value.to_string());
            true
        }
        ["attributes", key] => {
            bag.attributes.insert((*key).to_owned(), value.to_string());
            true
        }
        ["label"] => {
            bag.label = Some(value.to_string());
            true
        }
        ["labelDescription"] => {
            bag.label_description = Some(value.to_string());
            true
        }
        ["content"] => {
            bag.content = Some(value.to_string());
            true
        }
        _ => false,
    }
}
