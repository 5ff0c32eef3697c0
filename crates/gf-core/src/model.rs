//! Core data model for a GridForm composition.
//!
//! A composition is a flat, ordered list of [`Element`] values laid out on a
//! 12-column grid. Every element carries a fully-defaulted base property bag
//! plus optional per-breakpoint override bags; the effective value of any
//! field is resolved through the cascade in [`Element::resolve`]. Rows are
//! never stored — they are derived from column spans by the grid engine.

use crate::id::ElementId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

// ─── Breakpoints ─────────────────────────────────────────────────────────

/// Responsive tier at which element properties may be overridden.
///
/// Ordered `compact < medium < wide`. `compact` is the unconditional floor:
/// it is the element's own base bag and never has an override entry. The
/// only cascading that happens is a fallback chain when resolving for
/// `wide` (wide → medium → base); `medium` falls back straight to base.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Compact,
    Medium,
    Wide,
}

impl Breakpoint {
    /// Utility-class prefix for this tier (base tier is unprefixed).
    pub fn class_prefix(self) -> &'static str {
        match self {
            Breakpoint::Compact => "",
            Breakpoint::Medium => "@3xl:",
            Breakpoint::Wide => "@5xl:",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Breakpoint::Compact => "compact",
            Breakpoint::Medium => "medium",
            Breakpoint::Wide => "wide",
        };
        f.write_str(s)
    }
}

// ─── Element kinds ───────────────────────────────────────────────────────

/// The closed set of placeable element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    TextBlock,
    SingleLineInput,
    MultilineInput,
    NumericInput,
    EmailInput,
    PasswordInput,
    FileInput,
    PhoneInput,
    UrlInput,
    Select,
    Checkbox,
    CheckboxGroup,
    RadioGroup,
    DatePicker,
    Switch,
    Button,
    SubmitButton,
    ResetButton,
}

impl ElementKind {
    pub const ALL: [ElementKind; 18] = [
        ElementKind::TextBlock,
        ElementKind::SingleLineInput,
        ElementKind::MultilineInput,
        ElementKind::NumericInput,
        ElementKind::EmailInput,
        ElementKind::PasswordInput,
        ElementKind::FileInput,
        ElementKind::PhoneInput,
        ElementKind::UrlInput,
        ElementKind::Select,
        ElementKind::Checkbox,
        ElementKind::CheckboxGroup,
        ElementKind::RadioGroup,
        ElementKind::DatePicker,
        ElementKind::Switch,
        ElementKind::Button,
        ElementKind::SubmitButton,
        ElementKind::ResetButton,
    ];

    /// The serialized tag, also used as the prefix for generated element ids.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::TextBlock => "text-block",
            ElementKind::SingleLineInput => "single-line-input",
            ElementKind::MultilineInput => "multiline-input",
            ElementKind::NumericInput => "numeric-input",
            ElementKind::EmailInput => "email-input",
            ElementKind::PasswordInput => "password-input",
            ElementKind::FileInput => "file-input",
            ElementKind::PhoneInput => "phone-input",
            ElementKind::UrlInput => "url-input",
            ElementKind::Select => "select",
            ElementKind::Checkbox => "checkbox",
            ElementKind::CheckboxGroup => "checkbox-group",
            ElementKind::RadioGroup => "radio-group",
            ElementKind::DatePicker => "date-picker",
            ElementKind::Switch => "switch",
            ElementKind::Button => "button",
            ElementKind::SubmitButton => "submit-button",
            ElementKind::ResetButton => "reset-button",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an element binds to a schema field or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Renders inside the form and contributes a validation-schema field.
    LayoutParticipant,
    /// Renders standalone (free text blocks).
    Content,
}

// ─── Property bags ───────────────────────────────────────────────────────

/// Grid and label styling for one breakpoint. Values are the literal
/// strings the property panel writes (`"12"`, `"auto"`, `"yes"`, `"top"`);
/// consumers that need numbers parse with a safe default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleBag {
    #[serde(default = "defaults::as_card")]
    pub as_card: String,
    #[serde(default = "defaults::show_label")]
    pub show_label: String,
    #[serde(default = "defaults::visible")]
    pub visible: String,
    #[serde(default = "defaults::label_position")]
    pub label_position: String,
    #[serde(default = "defaults::label_align")]
    pub label_align: String,
    #[serde(default = "defaults::text_align")]
    pub text_align: String,
    #[serde(default = "defaults::column_span")]
    pub column_span: String,
    #[serde(default = "defaults::column_start")]
    pub column_start: String,
}

mod defaults {
    pub fn as_card() -> String {
        "no".into()
    }
    pub fn show_label() -> String {
        "yes".into()
    }
    pub fn visible() -> String {
        "yes".into()
    }
    pub fn label_position() -> String {
        "top".into()
    }
    pub fn label_align() -> String {
        "start".into()
    }
    pub fn text_align() -> String {
        "left".into()
    }
    pub fn column_span() -> String {
        "12".into()
    }
    pub fn column_start() -> String {
        "auto".into()
    }
    pub fn variant() -> String {
        "default".into()
    }
}

impl Default for StyleBag {
    fn default() -> Self {
        Self {
            as_card: defaults::as_card(),
            show_label: defaults::show_label(),
            visible: defaults::visible(),
            label_position: defaults::label_position(),
            label_align: defaults::label_align(),
            text_align: defaults::text_align(),
            column_span: defaults::column_span(),
            column_start: defaults::column_start(),
        }
    }
}

impl StyleBag {
    /// Look up a style field by its serialized (camelCase) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let v = match key {
            "asCard" => &self.as_card,
            "showLabel" => &self.show_label,
            "visible" => &self.visible,
            "labelPosition" => &self.label_position,
            "labelAlign" => &self.label_align,
            "textAlign" => &self.text_align,
            "columnSpan" => &self.column_span,
            "columnStart" => &self.column_start,
            _ => return None,
        };
        Some(v.as_str())
    }

    /// Set a style field by its serialized key. Returns false for an
    /// unknown key.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "asCard" => &mut self.as_card,
            "showLabel" => &mut self.show_label,
            "visible" => &mut self.visible,
            "labelPosition" => &mut self.label_position,
            "labelAlign" => &mut self.label_align,
            "textAlign" => &mut self.text_align,
            "columnSpan" => &mut self.column_span,
            "columnStart" => &mut self.column_start,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// The base property bag: style plus the visual variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBag {
    #[serde(default)]
    pub style: StyleBag,
    #[serde(default = "defaults::variant")]
    pub variant: String,
}

impl Default for PropertyBag {
    fn default() -> Self {
        Self {
            style: StyleBag::default(),
            variant: defaults::variant(),
        }
    }
}

/// Free-form element attributes (`id`, `name`, `class`, `type`,
/// `placeholder`, …). Insertion order is preserved so serialized
/// documents round-trip byte-stable.
pub type AttributeBag = IndexMap<String, String>;

// ─── Overrides ───────────────────────────────────────────────────────────

/// Partial style bag layered over the base at one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_start: Option<String>,
}

impl StyleOverride {
    pub fn is_empty(&self) -> bool {
        self == &StyleOverride::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let v = match key {
            "asCard" => &self.as_card,
            "showLabel" => &self.show_label,
            "visible" => &self.visible,
            "labelPosition" => &self.label_position,
            "labelAlign" => &self.label_align,
            "textAlign" => &self.text_align,
            "columnSpan" => &self.column_span,
            "columnStart" => &self.column_start,
            _ => return None,
        };
        v.as_deref()
    }

    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "asCard" => &mut self.as_card,
            "showLabel" => &mut self.show_label,
            "visible" => &mut self.visible,
            "labelPosition" => &mut self.label_position,
            "labelAlign" => &mut self.label_align,
            "textAlign" => &mut self.text_align,
            "columnSpan" => &mut self.column_span,
            "columnStart" => &mut self.column_start,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Partial property bag for one breakpoint override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOverride {
    #[serde(default, skip_serializing_if = "StyleOverride::is_empty")]
    pub style: StyleOverride,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl PropertyOverride {
    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.variant.is_none()
    }
}

/// A partial copy of the base-bag shape attached to one breakpoint.
/// Only style, attribute, and label-text fields participate; an empty
/// bag is permitted and has no resolution effect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideBag {
    #[serde(default, skip_serializing_if = "PropertyOverride::is_empty")]
    pub properties: PropertyOverride,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl OverrideBag {
    /// Field lookup mirroring [`Element::resolve`]'s path space.
    fn lookup(&self, segments: &[&str]) -> Option<FieldValue> {
        match segments {
            ["properties", "style", key] => {
                self.properties.style.get(key).map(FieldValue::text)
            }
            ["properties", "variant"] => {
                self.properties.variant.as_deref().map(FieldValue::text)
            }
            ["attributes", key] => self.attributes.get(*key).map(|v| FieldValue::text(v)),
            ["label"] => self.label.as_deref().map(FieldValue::text),
            ["labelDescription"] => self.label_description.as_deref().map(FieldValue::text),
            ["content"] => self.content.as_deref().map(FieldValue::text),
            _ => None,
        }
    }
}

// ─── Options & validations ───────────────────────────────────────────────

/// One entry of a choice element (select, radio group, checkbox group).
/// `value`s are unique within an element; list order is render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

/// A scalar initial value or validation bound: free text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// Numeric view: numbers pass through, text parses or yields None.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// True for the values that disqualify the required-forcing rule:
    /// zero and the empty string.
    pub fn is_zero_or_empty(&self) -> bool {
        match self {
            ScalarValue::Number(n) => *n == 0.0,
            ScalarValue::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Number(n) => f.write_str(&crate::codegen::format_num(*n)),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

/// Validation rules attached to an element. `required` keeps the panel's
/// literal `"yes"`/`"no"`; the bounds keep whatever scalar the panel wrote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<ScalarValue>,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        self == &ValidationRules::default()
    }
}

// ─── Field paths & values ────────────────────────────────────────────────

/// A dotted field path (`properties.style.columnSpan`, `attributes.id`)
/// as an ordered segment sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(SmallVec<[String; 3]>);

impl FieldPath {
    pub fn parse(dotted: &str) -> Self {
        FieldPath(dotted.split('.').map(str::to_owned).collect())
    }

    pub fn segments(&self) -> SmallVec<[&str; 3]> {
        self.0.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        FieldPath::parse(dotted)
    }
}

/// The value a field resolves to. Style and attribute fields are text;
/// `value` may be numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<ScalarValue> for FieldValue {
    fn from(v: ScalarValue) -> Self {
        match v {
            ScalarValue::Number(n) => FieldValue::Number(n),
            ScalarValue::Text(s) => FieldValue::Text(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => f.write_str(&crate::codegen::format_num(*n)),
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// One placed unit of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Stable unique id within the element list.
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    pub category: Category,

    #[serde(default)]
    pub properties: PropertyBag,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: AttributeBag,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,

    /// Secondary label line (group/consent descriptions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_description: Option<String>,

    /// Palette info line shown next to the label in the component list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ScalarValue>,

    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub options: SmallVec<[ChoiceOption; 2]>,

    #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
    pub validations: ValidationRules,

    /// Per-breakpoint partial bags. Never contains a `compact` entry.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<Breakpoint, OverrideBag>,
}

impl Element {
    /// A bare element of the given kind with fully-defaulted bags.
    pub fn new(id: ElementId, kind: ElementKind, category: Category) -> Self {
        Self {
            id,
            kind,
            category,
            properties: PropertyBag::default(),
            attributes: IndexMap::new(),
            label: String::new(),
            label_description: None,
            hint: None,
            content: None,
            description: None,
            value: None,
            options: SmallVec::new(),
            validations: ValidationRules::default(),
            overrides: BTreeMap::new(),
        }
    }

    // ─── Resolution ──────────────────────────────────────────────────

    /// Resolve the effective value of `path` at `breakpoint`.
    ///
    /// The cascade is asymmetric and must stay that way: resolving for
    /// `wide` falls back to the `medium` override field-by-field before
    /// the base bag; resolving for `medium` falls back straight to base;
    /// `compact` *is* the base. Unknown paths resolve to `None`.
    pub fn resolve(&self, path: &FieldPath, breakpoint: Breakpoint) -> Option<FieldValue> {
        let segments = path.segments();
        self.resolve_segments(&segments, breakpoint)
    }

    /// [`Element::resolve`] over a dotted path literal.
    pub fn resolve_path(&self, dotted: &str, breakpoint: Breakpoint) -> Option<FieldValue> {
        let segments: SmallVec<[&str; 3]> = dotted.split('.').collect();
        self.resolve_segments(&segments, breakpoint)
    }

    fn resolve_segments(&self, segments: &[&str], breakpoint: Breakpoint) -> Option<FieldValue> {
        match breakpoint {
            Breakpoint::Wide => {
                if let Some(bag) = self.overrides.get(&Breakpoint::Wide)
                    && let Some(v) = bag.lookup(segments)
                {
                    return Some(v);
                }
                // Wide falls back to medium when no wide-specific value exists.
                if let Some(bag) = self.overrides.get(&Breakpoint::Medium)
                    && let Some(v) = bag.lookup(segments)
                {
                    return Some(v);
                }
            }
            Breakpoint::Medium => {
                if let Some(bag) = self.overrides.get(&Breakpoint::Medium)
                    && let Some(v) = bag.lookup(segments)
                {
                    return Some(v);
                }
            }
            Breakpoint::Compact => {}
        }
        self.base_lookup(segments)
    }

    fn base_lookup(&self, segments: &[&str]) -> Option<FieldValue> {
        match segments {
            ["properties", "style", key] => {
                self.properties.style.get(key).map(FieldValue::text)
            }
            ["properties", "variant"] => Some(FieldValue::text(&self.properties.variant)),
            ["attributes", key] => self.attributes.get(*key).map(|v| FieldValue::text(v)),
            ["label"] => Some(FieldValue::text(&self.label)),
            ["labelDescription"] => self.label_description.as_deref().map(FieldValue::text),
            ["hint"] => self.hint.as_deref().map(FieldValue::text),
            ["content"] => self.content.as_deref().map(FieldValue::text),
            ["description"] => self.description.as_deref().map(FieldValue::text),
            ["value"] => self.value.clone().map(FieldValue::from),
            _ => None,
        }
    }

    /// The column span effective at `breakpoint`, defaulting to 12 when
    /// the resolved value is missing or non-numeric, clamped to [1, 12].
    pub fn resolved_span(&self, breakpoint: Breakpoint) -> u8 {
        let span = self
            .resolve_segments(&["properties", "style", "columnSpan"], breakpoint)
            .and_then(|v| v.as_f64())
            .unwrap_or(12.0);
        (span as i64).clamp(1, 12) as u8
    }

    // ─── Direct accessors (no cascade) ───────────────────────────────

    /// Base attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The schema/binding key: resolved `attributes.id`, falling back to
    /// the element id (creation mirrors the element id into the
    /// attribute, so the fallback only covers hand-built values).
    pub fn field_id(&self) -> String {
        match self.resolve_segments(&["attributes", "id"], Breakpoint::Compact) {
            Some(FieldValue::Text(s)) if !s.is_empty() => s,
            _ => self.id.as_str().to_owned(),
        }
    }

    /// A style override field at one breakpoint, without any fallback.
    /// Used by the class synthesizer, which emits each tier separately.
    pub fn override_style(&self, breakpoint: Breakpoint, key: &str) -> Option<&str> {
        self.overrides
            .get(&breakpoint)
            .and_then(|bag| bag.properties.style.get(key))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
