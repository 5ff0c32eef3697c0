//! Per-kind element capabilities.
//!
//! Each element kind registers one [`ElementView`]: its code emitter and
//! its property-panel section schema. Lookups go through a single static
//! registry; a kind with no registered view yields "no capability" rather
//! than panicking. Several kinds share a view (every text-like input
//! renders the same control; the three button kinds differ only in data).

use crate::codegen::{
    CodeFragment, DependencyManifest, StyleKey, breakpoint_classes, class_to_class_name, cn,
    escape_html, inline_style_to_object, normalize_br_tags,
};
use crate::model::{Element, ElementKind};
use std::collections::HashMap;
use std::sync::LazyLock;

// ─── Panel schema ────────────────────────────────────────────────────────

/// Which property-panel groups apply to a kind. `None` hides the group;
/// `Some(&[])` shows it with every field; a non-empty slice whitelists
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSections {
    pub grid: bool,
    pub html: Option<&'static [&'static str]>,
    pub label: Option<&'static [&'static str]>,
    pub input: Option<&'static [&'static str]>,
    pub options: bool,
    pub button: bool,
    pub validation: bool,
}

const LABEL_FULL: &[&str] = &["label", "labelPosition", "labelAlign", "showLabel"];

// ─── Capability trait & registry ─────────────────────────────────────────

/// The per-kind capability surface consumed by the generator and the
/// property panel.
pub trait ElementView: Send + Sync {
    /// Source fragment plus the modules/symbols it needs.
    fn emit_code(&self, element: &Element) -> CodeFragment;

    /// Property-panel layout for this kind.
    fn panel(&self) -> PanelSections;
}

static REGISTRY: LazyLock<HashMap<ElementKind, &'static dyn ElementView>> = LazyLock::new(|| {
    let mut map: HashMap<ElementKind, &'static dyn ElementView> = HashMap::new();
    for kind in [
        ElementKind::SingleLineInput,
        ElementKind::NumericInput,
        ElementKind::EmailInput,
        ElementKind::PasswordInput,
        ElementKind::FileInput,
        ElementKind::PhoneInput,
        ElementKind::UrlInput,
    ] {
        map.insert(kind, &InputView);
    }
    map.insert(ElementKind::MultilineInput, &MultilineView);
    map.insert(ElementKind::Select, &SelectView);
    map.insert(ElementKind::Checkbox, &CheckboxView);
    map.insert(ElementKind::CheckboxGroup, &CheckboxGroupView);
    map.insert(ElementKind::RadioGroup, &RadioGroupView);
    map.insert(ElementKind::Switch, &SwitchView);
    map.insert(ElementKind::DatePicker, &DatePickerView);
    for kind in [
        ElementKind::Button,
        ElementKind::SubmitButton,
        ElementKind::ResetButton,
    ] {
        map.insert(kind, &ButtonView);
    }
    map.insert(ElementKind::TextBlock, &TextBlockView);
    map
});

/// Look up the capability for a kind.
pub fn view_for(kind: ElementKind) -> Option<&'static dyn ElementView> {
    REGISTRY.get(&kind).copied()
}

/// Emit an element through its registered view, if any.
pub fn emit(element: &Element) -> Option<CodeFragment> {
    view_for(element.kind).map(|view| view.emit_code(element))
}

// ─── Render boundary ─────────────────────────────────────────────────────

/// Form-level context a renderer receives: the live values and the
/// validation issues computed for them.
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    pub values: serde_json::Value,
    pub issues: Vec<crate::schema::FieldIssue>,
}

/// The binding of one layout participant to its schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    /// The schema key (`attributes.id`).
    pub name: String,
}

/// The hook for the (external) visual layer: one renderer per kind,
/// registered once at startup, producing whatever node type `R` the host
/// works with. A kind with no registered renderer resolves to `None`
/// rather than panicking, same as [`view_for`].
pub struct RenderRegistry<R> {
    renderers: HashMap<ElementKind, Box<dyn Fn(&Element, &FormContext, &FieldBinding) -> R + Send + Sync>>,
}

impl<R> RenderRegistry<R> {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register the renderer for one kind, replacing any previous one.
    pub fn register<F>(&mut self, kind: ElementKind, renderer: F)
    where
        F: Fn(&Element, &FormContext, &FieldBinding) -> R + Send + Sync + 'static,
    {
        self.renderers.insert(kind, Box::new(renderer));
    }

    /// Render an element, or `None` when its kind has no renderer.
    pub fn render(&self, element: &Element, context: &FormContext) -> Option<R> {
        let renderer = self.renderers.get(&element.kind)?;
        let binding = FieldBinding {
            name: element.field_id(),
        };
        Some(renderer(element, context, &binding))
    }
}

impl<R> Default for RenderRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn attr_escaped(element: &Element, key: &str) -> String {
    escape_html(element.attr(key).unwrap_or_default())
}

// ─── Text-like inputs ────────────────────────────────────────────────────

struct InputView;

impl ElementView for InputView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/input", "Input");
        let code = format!(
            r#"<Input
      key="{key}"
      placeholder="{placeholder}"
      type="{input_type}"
      id="{id}"
      className="{class}"
      {{...field}}
    />"#,
            key = element.id,
            placeholder = attr_escaped(element, "placeholder"),
            input_type = attr_escaped(element, "type"),
            id = escape_html(&element.field_id()),
            class = attr_escaped(element, "class"),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(LABEL_FULL),
            input: Some(&[]),
            validation: true,
            ..Default::default()
        }
    }
}

struct MultilineView;

impl ElementView for MultilineView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/textarea", "Textarea");
        let code = format!(
            r#"<Textarea
      key="{key}"
      id="{id}"
      placeholder="{placeholder}"
      className="{class}"
      {{...field}}
    />"#,
            key = element.id,
            id = escape_html(&element.field_id()),
            placeholder = attr_escaped(element, "placeholder"),
            class = attr_escaped(element, "class"),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        InputView.panel()
    }
}

// ─── Choice elements ─────────────────────────────────────────────────────

struct SelectView;

impl ElementView for SelectView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.extend_module(
            "@/components/ui/select",
            &[
                "Select",
                "SelectTrigger",
                "SelectContent",
                "SelectItem",
                "SelectValue",
            ],
        );
        let items = element
            .options
            .iter()
            .map(|option| {
                format!(
                    r#"        <SelectItem key="{value}" value="{value}">
          {label}
        </SelectItem>"#,
                    value = escape_html(&option.value),
                    label = escape_html(&option.label),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let code = format!(
            r#"<Select
      key="{key}"
      id="{id}"
      className="{class}"
      {{...field}}
    >
      <SelectTrigger>
        <SelectValue placeholder="{placeholder}" />
      </SelectTrigger>
      <SelectContent>
{items}
      </SelectContent>
    </Select>"#,
            key = element.id,
            id = escape_html(&element.field_id()),
            class = attr_escaped(element, "class"),
            placeholder = attr_escaped(element, "placeholder"),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(LABEL_FULL),
            input: Some(&["placeholder", "description", "value"]),
            options: true,
            validation: true,
            ..Default::default()
        }
    }
}

struct CheckboxView;

impl ElementView for CheckboxView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/checkbox", "Checkbox");
        dependencies.add("@/components/ui/form", "FormLabel");
        let card_classes = breakpoint_classes(element, StyleKey::AsCard);
        let code = format!(
            r#"<div
      key="{key}"
      className="{class}"
    >
      <Checkbox id="{id}" {{...field}} />
      <div className="grid gap-1.5 leading-none">
        <FormLabel htmlFor="{id}">
          {label}
        </FormLabel>
        <p className="text-sm text-muted-foreground">
          {label_description}
        </p>
      </div>
    </div>"#,
            key = element.id,
            class = escape_html(&cn(&[&card_classes, "flex items-start space-x-2"])),
            id = escape_html(&element.field_id()),
            label = escape_html(&element.label),
            label_description =
                escape_html(element.label_description.as_deref().unwrap_or_default()),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(&["label", "labelDescription"]),
            input: Some(&["description", "asCard"]),
            validation: true,
            ..Default::default()
        }
    }
}

struct CheckboxGroupView;

impl ElementView for CheckboxGroupView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/checkbox", "Checkbox");
        dependencies.add("@/components/ui/form", "FormLabel");
        let id = escape_html(&element.field_id());
        let name = attr_escaped(element, "name");
        let rows = element
            .options
            .iter()
            .map(|option| {
                format!(
                    r#"      <div key="{value}" className="flex items-center space-x-2">
        <Checkbox
          id="{id}-{value}"
          name="{name}"
          checked={{{checked}}}
        />
        <FormLabel htmlFor="{id}-{value}">
          {label}
        </FormLabel>
      </div>"#,
                    value = escape_html(&option.value),
                    label = escape_html(&option.label),
                    checked = option.checked.unwrap_or(false),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let code = format!(
            r#"<div
      key="{key}"
      className="flex flex-col space-y-2"
    >
{rows}
    </div>"#,
            key = element.id,
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(&["label"]),
            input: Some(&["description", "asCard"]),
            options: true,
            validation: true,
            ..Default::default()
        }
    }
}

struct RadioGroupView;

impl ElementView for RadioGroupView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.extend_module("@/components/ui/radio-group", &["RadioGroup", "RadioGroupItem"]);
        dependencies.add("@/components/ui/form", "FormLabel");
        let id = escape_html(&element.field_id());
        let rows = element
            .options
            .iter()
            .map(|option| {
                format!(
                    r#"      <div key="{value}" className="flex items-center space-x-2">
        <RadioGroupItem value="{value}" id="{id}-{value}" />
        <FormLabel htmlFor="{id}-{value}">
          {label}
        </FormLabel>
      </div>"#,
                    value = escape_html(&option.value),
                    label = escape_html(&option.label),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let code = format!(
            r#"<RadioGroup
      key="{key}"
      id="{id}"
      className="{class}"
      {{...field}}
    >
{rows}
    </RadioGroup>"#,
            key = element.id,
            class = attr_escaped(element, "class"),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(LABEL_FULL),
            input: Some(&["placeholder", "description", "value"]),
            options: true,
            validation: true,
            ..Default::default()
        }
    }
}

struct SwitchView;

impl ElementView for SwitchView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/switch", "Switch");
        dependencies.add("@/components/ui/form", "FormLabel");
        let card_classes = breakpoint_classes(element, StyleKey::AsCard);
        let code = format!(
            r#"<div
      key="{key}"
      className="{class}"
    >
      <div className="grid gap-1.5 leading-none">
        <FormLabel htmlFor="{id}">
          {label}
        </FormLabel>
        <p className="text-sm text-muted-foreground">
          {label_description}
        </p>
      </div>
      <Switch id="{id}" {{...field}} />
    </div>"#,
            key = element.id,
            class = escape_html(&cn(&[
                &card_classes,
                "flex justify-between items-center space-x-2 w-full"
            ])),
            id = escape_html(&element.field_id()),
            label = escape_html(&element.label),
            label_description =
                escape_html(element.label_description.as_deref().unwrap_or_default()),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(&["label", "labelDescription", "labelPosition"]),
            input: Some(&["description", "asCard"]),
            validation: true,
            ..Default::default()
        }
    }
}

// ─── Date picker ─────────────────────────────────────────────────────────

struct DatePickerView;

impl ElementView for DatePickerView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/button", "Button");
        dependencies.add("@/components/ui/calendar", "Calendar");
        dependencies.extend_module(
            "@/components/ui/popover",
            &["Popover", "PopoverContent", "PopoverTrigger"],
        );
        dependencies.add("date-fns", "format");
        dependencies.add("lucide-react", "CalendarIcon");
        let code = format!(
            r#"<Popover>
      <PopoverTrigger asChild>
        <Button
          variant={{"outline"}}
          className="{class}"
          id="{id}"
          name="{name}"
        >
          <CalendarIcon className="mr-2 h-4 w-4" />
          {{field.value ? format(field.value, "PPP") : <span className="text-muted-foreground">{placeholder}</span>}}
        </Button>
      </PopoverTrigger>
      <PopoverContent className="w-auto p-0">
        <Calendar
          mode="single"
          initialFocus
          onSelect={{field.onChange}}
        />
      </PopoverContent>
    </Popover>"#,
            class = escape_html(&cn(&[
                "justify-start text-left font-normal w-full",
                element.attr("class").unwrap_or_default(),
            ])),
            id = escape_html(&element.field_id()),
            name = attr_escaped(element, "name"),
            placeholder = attr_escaped(element, "placeholder"),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            label: Some(LABEL_FULL),
            input: Some(&["placeholder", "description"]),
            validation: true,
            ..Default::default()
        }
    }
}

// ─── Buttons ─────────────────────────────────────────────────────────────

struct ButtonView;

impl ElementView for ButtonView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        let mut dependencies = DependencyManifest::new();
        dependencies.add("@/components/ui/button", "Button");
        let code = format!(
            r#"<Button
      key="{key}"
      id="{id}"
      name="{name}"
      className="{class}"
      type="{button_type}"
      variant="{variant}"
    >
      {content}
    </Button>"#,
            key = element.id,
            id = escape_html(&element.field_id()),
            name = attr_escaped(element, "name"),
            class = escape_html(&cn(&["w-full", element.attr("class").unwrap_or_default()])),
            button_type = attr_escaped(element, "type"),
            variant = escape_html(&element.properties.variant),
            content = escape_html(element.content.as_deref().unwrap_or_default()),
        );
        CodeFragment { code, dependencies }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&[]),
            button: true,
            ..Default::default()
        }
    }
}

// ─── Free text block ─────────────────────────────────────────────────────

struct TextBlockView;

impl ElementView for TextBlockView {
    fn emit_code(&self, element: &Element) -> CodeFragment {
        // Rich-text content stays as markup; only JSX-incompatible pieces
        // are rewritten.
        let content = element.content.as_deref().unwrap_or_default();
        let content = inline_style_to_object(content);
        let content = normalize_br_tags(&content);
        let content = class_to_class_name(&content);

        let classes = cn(&[
            element.attr("class").unwrap_or_default(),
            &breakpoint_classes(element, StyleKey::ColumnSpan),
            &breakpoint_classes(element, StyleKey::ColumnStart),
        ]);
        let code = format!(
            r#"<div
      key="{key}"
      id="{id}"
      className="{classes}">
      {content}
    </div>"#,
            key = element.id,
            id = element.field_id(),
        );
        CodeFragment {
            code,
            dependencies: DependencyManifest::new(),
        }
    }

    fn panel(&self) -> PanelSections {
        PanelSections {
            grid: true,
            html: Some(&["id", "class"]),
            ..Default::default()
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ElementId;
    use crate::model::{Category, ChoiceOption};
    use pretty_assertions::assert_eq;

    fn element(kind: ElementKind, id: &str) -> Element {
        let mut el = Element::new(ElementId::intern(id), kind, Category::LayoutParticipant);
        el.attributes.insert("id".into(), id.into());
        el
    }

    #[test]
    fn every_kind_has_a_view() {
        for kind in ElementKind::ALL {
            assert!(view_for(kind).is_some(), "missing view for {kind}");
        }
    }

    #[test]
    fn input_fragment_interpolates_escaped_attributes() {
        let mut el = element(ElementKind::SingleLineInput, "name-0");
        el.attributes.insert("type".into(), "text".into());
        el.attributes
            .insert("placeholder".into(), "say \"hi\"".into());
        let fragment = emit(&el).unwrap();
        assert!(fragment.code.contains("placeholder=\"say &quot;hi&quot;\""));
        assert!(fragment.code.contains("type=\"text\""));
        assert_eq!(
            fragment.dependencies.import_lines(),
            "import { Input } from \"@/components/ui/input\";"
        );
    }

    #[test]
    fn select_emits_one_item_per_option_in_order() {
        let mut el = element(ElementKind::Select, "select-0");
        el.options.push(ChoiceOption {
            label: "First".into(),
            value: "first".into(),
            checked: None,
        });
        el.options.push(ChoiceOption {
            label: "Second".into(),
            value: "second".into(),
            checked: None,
        });
        let fragment = emit(&el).unwrap();
        let first = fragment.code.find("value=\"first\"").unwrap();
        let second = fragment.code.find("value=\"second\"").unwrap();
        assert!(first < second);
    }

    #[test]
    fn checkbox_group_marks_checked_options() {
        let mut el = element(ElementKind::CheckboxGroup, "group-0");
        el.options.push(ChoiceOption {
            label: "On".into(),
            value: "on".into(),
            checked: Some(true),
        });
        el.options.push(ChoiceOption {
            label: "Off".into(),
            value: "off".into(),
            checked: None,
        });
        let fragment = emit(&el).unwrap();
        assert!(fragment.code.contains("id=\"group-0-on\""));
        assert!(fragment.code.contains("checked={true}"));
        assert!(fragment.code.contains("checked={false}"));
    }

    #[test]
    fn button_uses_variant_and_type() {
        let mut el = element(ElementKind::ResetButton, "reset-button-0");
        el.content = Some("Reset".into());
        el.properties.variant = "outline".into();
        el.attributes.insert("type".into(), "reset".into());
        let fragment = emit(&el).unwrap();
        assert!(fragment.code.contains("type=\"reset\""));
        assert!(fragment.code.contains("variant=\"outline\""));
        assert!(fragment.code.contains("Reset"));
    }

    #[test]
    fn date_picker_pulls_calendar_stack() {
        let el = element(ElementKind::DatePicker, "date-picker-0");
        let fragment = emit(&el).unwrap();
        let imports = fragment.dependencies.import_lines();
        assert!(imports.contains("@/components/ui/calendar"));
        assert!(imports.contains("import { format } from \"date-fns\";"));
        assert!(imports.contains("import { CalendarIcon } from \"lucide-react\";"));
    }

    #[test]
    fn text_block_rewrites_rich_text_for_jsx() {
        let mut el = element(ElementKind::TextBlock, "text-block-0");
        el.category = Category::Content;
        el.content =
            Some(r#"<p class="big" style="text-align: center">hello<br></p>"#.into());
        let fragment = emit(&el).unwrap();
        assert!(fragment.code.contains(r#"className="big""#));
        assert!(fragment.code.contains(r#"style={{"textAlign":"center"}}"#));
        assert!(fragment.code.contains("<br />"));
        assert!(fragment.dependencies.is_empty());
    }

    #[test]
    fn render_registry_resolves_registered_kinds_only() {
        let mut registry: RenderRegistry<String> = RenderRegistry::new();
        registry.register(ElementKind::SingleLineInput, |el, _ctx, binding| {
            format!("<input name={}>", binding.name)
        });

        let el = element(ElementKind::SingleLineInput, "name-0");
        let ctx = FormContext::default();
        assert_eq!(
            registry.render(&el, &ctx),
            Some("<input name=name-0>".to_owned())
        );

        let other = element(ElementKind::Switch, "switch-0");
        assert_eq!(registry.render(&other, &ctx), None);
    }

    #[test]
    fn panel_sections_expose_whitelists() {
        let view = view_for(ElementKind::Checkbox).unwrap();
        let panel = view.panel();
        assert_eq!(panel.label, Some(&["label", "labelDescription"][..]));
        assert!(!panel.options);

        let buttons = view_for(ElementKind::SubmitButton).unwrap().panel();
        assert!(buttons.button);
        assert_eq!(buttons.label, None);
    }
}
