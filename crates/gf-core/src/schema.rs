//! Validation-schema synthesis.
//!
//! Every layout-participant element contributes one field schema, derived
//! from its validation rules. The schema is built once as a [`SchemaExpr`]
//! expression tree and used two ways: evaluated directly against JSON
//! values (live form checking), and printed as zod source for the exported
//! document. One tree serving both keeps the forms equivalent
//! expression-for-expression.

use crate::codegen::format_num;
use crate::model::{Category, Element, ElementKind, ScalarValue, ValidationRules};
use serde_json::Value;
use std::fmt::Write;

// ─── Expression tree ─────────────────────────────────────────────────────

/// A field-schema expression. Constraint nodes wrap their inner schema the
/// same way a zod builder chain does, so printing is a straight traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaExpr {
    /// `z.coerce.number()`, optionally with an invalid-type message.
    CoerceNumber { invalid_type_message: Option<String> },
    /// `z.date()`, optionally with a required message.
    Date { required_message: Option<String> },
    /// `z.string()`.
    Str,
    /// `.min(bound, { message })` — numeric floor or minimum length.
    Min {
        inner: Box<SchemaExpr>,
        bound: f64,
        message: String,
    },
    /// `.max(bound, { message })`.
    Max {
        inner: Box<SchemaExpr>,
        bound: f64,
        message: String,
    },
    /// `.optional()`.
    Optional(Box<SchemaExpr>),
}

/// A value that passed the base check of a schema chain.
#[derive(Debug, Clone, PartialEq)]
enum Checked {
    Absent,
    Number(f64),
    Text(String),
    Date,
}

impl SchemaExpr {
    /// Print as a zod source expression.
    pub fn to_source(&self) -> String {
        match self {
            SchemaExpr::CoerceNumber {
                invalid_type_message: None,
            } => "z.coerce.number()".to_owned(),
            SchemaExpr::CoerceNumber {
                invalid_type_message: Some(msg),
            } => format!("z.coerce.number({{ invalid_type_error: {} }})", js_string(msg)),
            SchemaExpr::Date {
                required_message: None,
            } => "z.date()".to_owned(),
            SchemaExpr::Date {
                required_message: Some(msg),
            } => format!("z.date({{ required_error: {} }})", js_string(msg)),
            SchemaExpr::Str => "z.string()".to_owned(),
            SchemaExpr::Min {
                inner,
                bound,
                message,
            } => format!(
                "{}.min({}, {{ message: {} }})",
                inner.to_source(),
                format_num(*bound),
                js_string(message)
            ),
            SchemaExpr::Max {
                inner,
                bound,
                message,
            } => format!(
                "{}.max({}, {{ message: {} }})",
                inner.to_source(),
                format_num(*bound),
                js_string(message)
            ),
            SchemaExpr::Optional(inner) => format!("{}.optional()", inner.to_source()),
        }
    }

    /// Evaluate against a JSON value, returning every violated message.
    pub fn check(&self, value: &Value) -> Vec<String> {
        if let SchemaExpr::Optional(inner) = self {
            return if value.is_null() {
                Vec::new()
            } else {
                inner.check(value)
            };
        }
        match self.base_eval(value) {
            Err(issues) => issues,
            Ok(checked) => {
                let mut issues = Vec::new();
                self.collect_constraints(&checked, &mut issues);
                issues
            }
        }
    }

    /// Evaluate the innermost base schema (type coercion / presence).
    fn base_eval(&self, value: &Value) -> Result<Checked, Vec<String>> {
        match self {
            SchemaExpr::Min { inner, .. } | SchemaExpr::Max { inner, .. } => {
                inner.base_eval(value)
            }
            SchemaExpr::Optional(inner) => {
                if value.is_null() {
                    Ok(Checked::Absent)
                } else {
                    inner.base_eval(value)
                }
            }
            SchemaExpr::CoerceNumber {
                invalid_type_message,
            } => coerce_number(value).map(Checked::Number).ok_or_else(|| {
                vec![
                    invalid_type_message
                        .clone()
                        .unwrap_or_else(|| "This field must be a number".to_owned()),
                ]
            }),
            SchemaExpr::Date { required_message } => match value {
                Value::String(s) if !s.is_empty() => Ok(Checked::Date),
                _ => Err(vec![
                    required_message
                        .clone()
                        .unwrap_or_else(|| "This field is required.".to_owned()),
                ]),
            },
            SchemaExpr::Str => match value {
                Value::String(s) => Ok(Checked::Text(s.clone())),
                // Missing values check as the empty string so the `.min(1)`
                // floor reports the required message, like the zod chain.
                Value::Null => Ok(Checked::Text(String::new())),
                _ => Err(vec!["This field must be text".to_owned()]),
            },
        }
    }

    /// Apply constraint nodes innermost-first, accumulating messages.
    fn collect_constraints(&self, checked: &Checked, out: &mut Vec<String>) {
        match self {
            SchemaExpr::Min {
                inner,
                bound,
                message,
            } => {
                inner.collect_constraints(checked, out);
                if !meets_min(checked, *bound) {
                    out.push(message.clone());
                }
            }
            SchemaExpr::Max {
                inner,
                bound,
                message,
            } => {
                inner.collect_constraints(checked, out);
                if !meets_max(checked, *bound) {
                    out.push(message.clone());
                }
            }
            _ => {}
        }
    }
}

/// JS-style numeric coercion: numbers pass, numeric strings parse.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn meets_min(checked: &Checked, bound: f64) -> bool {
    match checked {
        Checked::Number(n) => *n >= bound,
        Checked::Text(s) => s.chars().count() as f64 >= bound,
        Checked::Date | Checked::Absent => true,
    }
}

fn meets_max(checked: &Checked, bound: f64) -> bool {
    match checked {
        Checked::Number(n) => *n <= bound,
        Checked::Text(s) => s.chars().count() as f64 <= bound,
        Checked::Date | Checked::Absent => true,
    }
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

// ─── Required forcing ────────────────────────────────────────────────────

/// Whether the rules force a required field.
///
/// `required == "yes"` is required. `required == "no"` still forces
/// required when all four of min, max, minLength, maxLength are present
/// and non-zero/non-empty — bounds on every axis imply mandatory input.
/// This override is intentional and preserved exactly.
pub fn force_required(rules: &ValidationRules) -> bool {
    if rules.required.as_deref() == Some("no") {
        return [
            &rules.min,
            &rules.max,
            &rules.min_length,
            &rules.max_length,
        ]
        .iter()
        .all(|bound| matches!(bound, Some(v) if !v.is_zero_or_empty()));
    }
    rules.required.as_deref() == Some("yes")
}

// ─── Per-element schemas ─────────────────────────────────────────────────

/// A usable bound: present, non-empty, and numeric.
fn bound_of(value: &Option<ScalarValue>) -> Option<(f64, String)> {
    let v = value.as_ref()?;
    if let ScalarValue::Text(s) = v
        && s.is_empty()
    {
        return None;
    }
    v.as_f64().map(|n| (n, v.to_string()))
}

fn number_schema(rules: &ValidationRules, required: bool) -> SchemaExpr {
    if !required {
        return SchemaExpr::Optional(Box::new(SchemaExpr::CoerceNumber {
            invalid_type_message: None,
        }));
    }
    let mut expr = SchemaExpr::Min {
        inner: Box::new(SchemaExpr::CoerceNumber {
            invalid_type_message: Some("This field must be a number".to_owned()),
        }),
        bound: 1.0,
        message: "This field is required".to_owned(),
    };
    if let Some((bound, shown)) = bound_of(&rules.min) {
        expr = SchemaExpr::Min {
            inner: Box::new(expr),
            bound,
            message: format!("Must be at least {shown}"),
        };
    }
    if let Some((bound, shown)) = bound_of(&rules.max) {
        expr = SchemaExpr::Max {
            inner: Box::new(expr),
            bound,
            message: format!("Must be at most {shown}"),
        };
    }
    expr
}

fn string_schema(rules: &ValidationRules, required: bool) -> SchemaExpr {
    if !required {
        return SchemaExpr::Optional(Box::new(SchemaExpr::Str));
    }
    let mut expr = SchemaExpr::Min {
        inner: Box::new(SchemaExpr::Str),
        bound: 1.0,
        message: "This field is required".to_owned(),
    };
    if let Some((bound, shown)) = bound_of(&rules.min_length) {
        expr = SchemaExpr::Min {
            inner: Box::new(expr),
            bound,
            message: format!("Must be at least {shown} characters"),
        };
    }
    if let Some((bound, shown)) = bound_of(&rules.max_length) {
        expr = SchemaExpr::Max {
            inner: Box::new(expr),
            bound,
            message: format!("Must be at most {shown} characters"),
        };
    }
    expr
}

fn date_schema(required: bool) -> SchemaExpr {
    if !required {
        return SchemaExpr::Optional(Box::new(SchemaExpr::Date {
            required_message: None,
        }));
    }
    SchemaExpr::Date {
        required_message: Some("This field is required.".to_owned()),
    }
}

/// The field schema for one element.
pub fn field_schema(element: &Element) -> SchemaExpr {
    let rules = &element.validations;
    let required = force_required(rules);
    match element.kind {
        ElementKind::NumericInput => number_schema(rules, required),
        ElementKind::DatePicker => date_schema(required),
        _ => string_schema(rules, required),
    }
}

// ─── Aggregate schema & defaults ─────────────────────────────────────────

/// The object schema over every layout-participant element, keyed by the
/// resolved `attributes.id`, in element-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub fields: Vec<(String, SchemaExpr)>,
}

/// One violated constraint found by [`ObjectSchema::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl ObjectSchema {
    /// Print as a zod object-schema source expression.
    pub fn to_source(&self) -> String {
        let mut out = String::from("z.object({");
        for (index, (key, expr)) in self.fields.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            let _ = write!(out, "\n    {}: {}", js_string(key), expr.to_source());
        }
        if !self.fields.is_empty() {
            out.push('\n');
            out.push_str("  ");
        }
        out.push_str("})");
        out
    }

    /// Evaluate a JSON object, returning every field's violations.
    pub fn check(&self, value: &Value) -> Vec<FieldIssue> {
        let Some(map) = value.as_object() else {
            return vec![FieldIssue {
                field: String::new(),
                message: "Expected an object of field values".to_owned(),
            }];
        };
        let mut issues = Vec::new();
        for (key, expr) in &self.fields {
            let field_value = map.get(key).unwrap_or(&Value::Null);
            for message in expr.check(field_value) {
                issues.push(FieldIssue {
                    field: key.clone(),
                    message,
                });
            }
        }
        issues
    }
}

/// Build the aggregate schema for the composition.
pub fn object_schema(elements: &[Element]) -> ObjectSchema {
    let fields = elements
        .iter()
        .filter(|el| el.category == Category::LayoutParticipant)
        .map(|el| (el.field_id(), field_schema(el)))
        .collect();
    ObjectSchema { fields }
}

/// Initial form values, keyed like [`object_schema`]. Numeric kinds are
/// coerced to numbers; a value that does not parse exports as absent.
pub fn default_values(elements: &[Element]) -> Vec<(String, Option<ScalarValue>)> {
    elements
        .iter()
        .filter(|el| el.category == Category::LayoutParticipant)
        .map(|el| {
            let value = match (el.kind, &el.value) {
                (_, None) => None,
                (ElementKind::NumericInput, Some(v)) => v.as_f64().map(ScalarValue::Number),
                (_, Some(v)) => Some(v.clone()),
            };
            (el.field_id(), value)
        })
        .collect()
}

/// The default-value map as source text (one `"key": value` entry per
/// line; absent values print as `undefined`).
pub fn default_values_source(elements: &[Element]) -> String {
    default_values(elements)
        .iter()
        .map(|(key, value)| {
            let printed = match value {
                None => "undefined".to_owned(),
                Some(ScalarValue::Number(n)) => format_num(*n),
                Some(ScalarValue::Text(s)) => js_string(s),
            };
            format!("{}: {}", js_string(key), printed)
        })
        .collect::<Vec<_>>()
        .join(",\n      ")
}

// ─── Tests ───────────────────────────────────────────────────────────────
