//! Code generation: dependency manifest, text escaping, responsive class
//! synthesis, and full-document assembly.
//!
//! Generation is a pure walk over the element list. The manifest is rebuilt
//! from its baseline on every run, so the same list always produces
//! byte-identical output.

use crate::model::{Breakpoint, Category, Element};
use crate::schema;
use crate::views;
use indexmap::{IndexMap, IndexSet};
use serde_json::json;
use std::fmt::Write;

// ─── Numbers ─────────────────────────────────────────────────────────────

/// Emit a number as shortest source form (`4`, not `4.0`).
pub fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ─── HTML escaping ───────────────────────────────────────────────────────

/// Characters the selective escape helper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeChar {
    Lt,
    Gt,
    DoubleQuote,
    SingleQuote,
    Amp,
}

/// Escape `&`, `<`, `>`, `"`, `'` for embedding in markup. `&` goes first
/// so entities are not double-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Escape only the whitelisted characters.
pub fn escape_html_some(text: &str, whitelist: &[EscapeChar]) -> String {
    let mut out = text.to_owned();
    if whitelist.contains(&EscapeChar::Lt) {
        out = out.replace('<', "&lt;");
    }
    if whitelist.contains(&EscapeChar::Gt) {
        out = out.replace('>', "&gt;");
    }
    if whitelist.contains(&EscapeChar::DoubleQuote) {
        out = out.replace('"', "&quot;");
    }
    if whitelist.contains(&EscapeChar::SingleQuote) {
        out = out.replace('\'', "&#039;");
    }
    if whitelist.contains(&EscapeChar::Amp) {
        out = out.replace('&', "&amp;");
    }
    out
}

// ─── Rich-text transforms (text-block export) ────────────────────────────

/// Normalize every `<br>` / `<br/>` / `<br   />` to `<br />`.
pub fn normalize_br_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("<br") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 3..];
        let bytes = tail.as_bytes();
        let mut i = 0;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'/' {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'>' {
            out.push_str("<br />");
            rest = &tail[i + 1..];
        } else {
            out.push_str("<br");
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Rewrite HTML `class="…"` attributes to JSX `className="…"`.
pub fn class_to_class_name(text: &str) -> String {
    // `className="` never contains the needle, so a plain replace is safe.
    text.replace("class=\"", "className=\"")
}

/// Rewrite inline `style="a: b; c: d"` strings into JSX style-object
/// literals with camelCased property names.
pub fn inline_style_to_object(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("style=\"") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 7..];
        match tail.find('"') {
            Some(end) => {
                let _ = write!(out, "style={{{}}}", style_object_json(&tail[..end]));
                rest = &tail[end + 1..];
            }
            None => {
                // Unterminated attribute: leave the remainder untouched.
                out.push_str(&rest[pos..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn style_object_json(css: &str) -> String {
    let mut object: IndexMap<String, String> = IndexMap::new();
    for pair in css.split(';') {
        if let Some((property, value)) = pair.split_once(':') {
            let property = property.trim();
            let value = value.trim();
            if !property.is_empty() && !value.is_empty() {
                object.insert(camel_case_css(property), value.to_owned());
            }
        }
    }
    serde_json::to_string(&object).unwrap_or_else(|_| "{}".to_owned())
}

/// `text-align` → `textAlign`.
fn camel_case_css(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;
    for c in property.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ─── Responsive class synthesis ──────────────────────────────────────────

/// The style fields that map to utility classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKey {
    AsCard,
    ShowLabel,
    Visible,
    LabelPosition,
    LabelAlign,
    TextAlign,
    ColumnSpan,
    ColumnStart,
}

impl StyleKey {
    fn field(self) -> &'static str {
        match self {
            StyleKey::AsCard => "asCard",
            StyleKey::ShowLabel => "showLabel",
            StyleKey::Visible => "visible",
            StyleKey::LabelPosition => "labelPosition",
            StyleKey::LabelAlign => "labelAlign",
            StyleKey::TextAlign => "textAlign",
            StyleKey::ColumnSpan => "columnSpan",
            StyleKey::ColumnStart => "columnStart",
        }
    }
}

/// Unprefixed class tokens for one style value, or `None` for values
/// outside the known map (the caller falls back to the raw value).
fn mapped_classes(key: StyleKey, value: &str) -> Option<String> {
    let fixed = match (key, value) {
        (StyleKey::AsCard, "yes") => "rounded-md border p-4",
        (StyleKey::AsCard, "no") => "border-0 p-0",
        (StyleKey::ShowLabel, "yes") => "flex",
        (StyleKey::ShowLabel, "no") => "hidden",
        (StyleKey::Visible, "yes") => "block",
        (StyleKey::Visible, "no") => "hidden",
        (StyleKey::LabelPosition, "top") => "flex-col gap-2 space-y-0",
        (StyleKey::LabelPosition, "left") => "flex-row gap-2 space-y-0",
        (StyleKey::LabelPosition, "right") => "flex-row gap-2 space-y-0 flex-row-reverse",
        (StyleKey::LabelAlign, "start") => "items-start",
        (StyleKey::LabelAlign, "center") => "items-center",
        (StyleKey::LabelAlign, "end") => "items-end",
        (StyleKey::TextAlign, "left") => "text-left",
        (StyleKey::TextAlign, "center") => "text-center",
        (StyleKey::TextAlign, "right") => "text-right",
        (StyleKey::ColumnSpan, "auto") => "col-auto",
        (StyleKey::ColumnStart, "auto") => "col-start-auto",
        (StyleKey::ColumnSpan | StyleKey::ColumnStart, _) => {
            let n: u8 = value.parse().ok().filter(|n| (1..=12).contains(n))?;
            let stem = if key == StyleKey::ColumnSpan {
                "col-span"
            } else {
                "col-start"
            };
            return Some(format!("{stem}-{n}"));
        }
        _ => return None,
    };
    Some(fixed.to_owned())
}

fn prefix_tokens(classes: &str, prefix: &str) -> String {
    classes
        .split_whitespace()
        .map(|token| format!("{prefix}{token}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Utility classes for one style field across every breakpoint: the base
/// value unprefixed, then the wide override, then the medium override —
/// each tier read directly from its own bag (no cascade; the CSS cascade
/// layers the tiers at render time).
pub fn breakpoint_classes(element: &Element, key: StyleKey) -> String {
    let mut classes: Vec<String> = Vec::new();

    if let Some(value) = element.properties.style.get(key.field()) {
        match mapped_classes(key, value) {
            Some(c) => classes.push(c),
            None => classes.push(value.to_owned()),
        }
    }

    for bp in [Breakpoint::Wide, Breakpoint::Medium] {
        if let Some(value) = element.override_style(bp, key.field()) {
            match mapped_classes(key, value) {
                Some(c) => classes.push(prefix_tokens(&c, bp.class_prefix())),
                None => classes.push(format!("{}{}", bp.class_prefix(), value)),
            }
        }
    }

    classes.join(" ")
}

/// Join non-empty class fragments with single spaces.
pub fn cn(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Dependency manifest ─────────────────────────────────────────────────

/// Mapping from module specifier to the named symbols imported from it.
/// Insertion-ordered on both axes, deduplicating on merge, so import
/// emission is deterministic for a fixed element sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyManifest {
    modules: IndexMap<String, IndexSet<String>>,
}

impl DependencyManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// The manifest every generated document starts from: the form
    /// wrapper family plus the schema-builder symbols.
    pub fn baseline() -> Self {
        let mut manifest = Self::new();
        manifest.extend_module(
            "@/components/ui/form",
            &[
                "Form",
                "FormControl",
                "FormDescription",
                "FormField",
                "FormItem",
                "FormLabel",
                "FormMessage",
            ],
        );
        manifest.extend_module("@hookform/resolvers/zod", &["zodResolver"]);
        manifest.extend_module("zod", &["z"]);
        manifest.extend_module("react-hook-form", &["useForm"]);
        manifest
    }

    pub fn add(&mut self, module: &str, symbol: &str) {
        self.modules
            .entry(module.to_owned())
            .or_default()
            .insert(symbol.to_owned());
    }

    pub fn extend_module(&mut self, module: &str, symbols: &[&str]) {
        for symbol in symbols {
            self.add(module, symbol);
        }
    }

    /// Merge another manifest in; already-declared symbols are not
    /// re-added, so repeated element kinds stay deduplicated.
    pub fn merge(&mut self, other: &DependencyManifest) {
        for (module, symbols) in &other.modules {
            for symbol in symbols {
                self.add(module, symbol);
            }
        }
    }

    /// One `import { … } from "module";` line per module, in insertion
    /// order.
    pub fn import_lines(&self) -> String {
        self.modules
            .iter()
            .map(|(module, symbols)| {
                let names = symbols.iter().cloned().collect::<Vec<_>>().join(", ");
                format!("import {{ {names} }} from \"{module}\";")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Short names of the UI-component-library modules in the manifest.
    pub fn ui_component_names(&self) -> Vec<String> {
        self.modules
            .keys()
            .filter(|module| module.starts_with("@/components/ui/"))
            .filter_map(|module| module.rsplit('/').next())
            .map(str::to_owned)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// One element's generated source plus the imports it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeFragment {
    pub code: String,
    pub dependencies: DependencyManifest,
}

// ─── Document assembly ───────────────────────────────────────────────────

/// The assembled export: source text and the merged manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub code: String,
    pub dependencies: DependencyManifest,
}

/// The exported component name: title with whitespace stripped and the
/// first letter upper-cased.
pub fn component_name(title: &str) -> String {
    let compact: String = title.split_whitespace().collect();
    let mut chars = compact.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The download file name for the export.
pub fn export_file_name(title: &str) -> String {
    let compact: String = title.split_whitespace().collect();
    format!("{compact}.tsx")
}

/// Wrap a layout participant's markup in its form-field binding.
fn field_binding(element: &Element, inner: &str) -> String {
    let item_classes = cn(&[
        &breakpoint_classes(element, StyleKey::ColumnSpan),
        &breakpoint_classes(element, StyleKey::ColumnStart),
        &breakpoint_classes(element, StyleKey::Visible),
        "flex flex-col self-end",
        &breakpoint_classes(element, StyleKey::LabelPosition),
        &breakpoint_classes(element, StyleKey::LabelAlign),
    ]);
    let label_classes = cn(&[&breakpoint_classes(element, StyleKey::ShowLabel), "shrink-0"]);

    let group_description = match (&element.kind, &element.label_description) {
        (crate::model::ElementKind::CheckboxGroup, Some(text)) if !text.is_empty() => format!(
            "\n                <FormDescription className=\"-mt-2 mb-2.5\">\n                  {}\n                </FormDescription>",
            escape_html(text)
        ),
        _ => String::new(),
    };
    let description = match &element.description {
        Some(text) if !text.is_empty() => format!(
            "\n                  <FormDescription>\n                    {}\n                  </FormDescription>",
            escape_html(text)
        ),
        _ => String::new(),
    };

    format!(
        r#"          <FormField
            control={{form.control}}
            name="{name}"
            render={{({{ field }}) => (
              <FormItem className="{item_classes}">
                <FormLabel className="{label_classes}">{label}</FormLabel>{group_description}
                <div className="w-full">
                  <FormControl>
                    {inner}
                  </FormControl>{description}
                  <FormMessage />
                </div>
              </FormItem>
            )}}
          />"#,
        name = element.field_id(),
        label = escape_html(&element.label),
    )
}

/// Assemble the full export document for `elements`.
///
/// Walks the list in order; layout participants are wrapped in their
/// field binding, content elements embed directly; every fragment's
/// dependencies merge into the baseline manifest.
pub fn generate_document(elements: &[Element], title: &str) -> GeneratedDocument {
    let mut manifest = DependencyManifest::baseline();
    let mut body_parts: Vec<String> = Vec::with_capacity(elements.len());

    for element in elements {
        let Some(fragment) = views::emit(element) else {
            log::debug!("no emitter for element kind `{}`; skipped", element.kind);
            continue;
        };
        manifest.merge(&fragment.dependencies);
        let markup = match element.category {
            Category::LayoutParticipant => field_binding(element, fragment.code.trim()),
            Category::Content => format!("          {}", fragment.code.trim()),
        };
        body_parts.push(markup);
    }

    let name = component_name(title);
    let schema_source = schema::object_schema(elements).to_source();
    let defaults_source = schema::default_values_source(elements);
    let imports = manifest.import_lines();
    let body = body_parts.join("\n");

    log::debug!(
        "generated document `{name}`: {} elements, {} import lines",
        elements.len(),
        imports.lines().count()
    );

    let code = format!(
        r#""use client";
{imports}

export default function {name}() {{
  const formSchema = {schema_source};

  const form = useForm<z.infer<typeof formSchema>>({{
    resolver: zodResolver(formSchema),
    defaultValues: {{
      {defaults_source}
    }},
  }});

  function onSubmit(values: z.infer<typeof formSchema>) {{
    console.log(values);
  }}

  function onReset() {{
    form.reset();
    form.clearErrors();
  }}

  return (
    <Form {{...form}}>
      <form onSubmit={{form.handleSubmit(onSubmit)}} onReset={{onReset}} className="space-y-8 @container">
        <div className="grid grid-cols-12 gap-4">
{body}
        </div>
      </form>
    </Form>
  );
}}
"#
    );

    GeneratedDocument {
        code,
        dependencies: manifest,
    }
}

/// Installation command covering the UI-library components the document
/// imports, or `None` when it needs none.
pub fn install_instructions(manifest: &DependencyManifest) -> Option<String> {
    let names = manifest.ui_component_names();
    if names.is_empty() {
        return None;
    }
    Some(format!("npx shadcn@latest add {}", names.join(" ")))
}

/// JSON preview of the live element list.
pub fn json_preview(elements: &[Element]) -> serde_json::Value {
    json!({
        "components": elements,
        "validation": {},
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────
