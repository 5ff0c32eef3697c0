//! The palette: template elements the builder offers for placement.
//!
//! Every template carries the defaults a freshly-dropped element starts
//! from. Template ids double as the prefix of generated element ids
//! (`email-input` → `email-input-0`).

use crate::id::ElementId;
use crate::model::{Category, ChoiceOption, Element, ElementKind};
use smallvec::smallvec;

fn template_base(kind: ElementKind, category: Category, label: &str, hint: &str) -> Element {
    let mut el = Element::new(ElementId::intern(kind.as_str()), kind, category);
    el.label = label.to_owned();
    el.hint = Some(hint.to_owned());
    el
}

fn with_input_type(mut el: Element, input_type: &str) -> Element {
    el.attributes.insert("type".into(), input_type.into());
    el
}

fn seed_options() -> smallvec::SmallVec<[ChoiceOption; 2]> {
    smallvec![
        ChoiceOption {
            label: "Option 1".into(),
            value: "option1".into(),
            checked: None,
        },
        ChoiceOption {
            label: "Option 2".into(),
            value: "option2".into(),
            checked: None,
        },
    ]
}

/// The full template catalog, in palette display order: the content block
/// first, then the form controls.
pub fn templates() -> Vec<Element> {
    let mut list = Vec::with_capacity(ElementKind::ALL.len());

    let mut text = template_base(
        ElementKind::TextBlock,
        Category::Content,
        "Text block",
        "Rich text content",
    );
    text.content = Some("Text".into());
    list.push(text);

    list.push(with_input_type(
        template_base(
            ElementKind::SingleLineInput,
            Category::LayoutParticipant,
            "Text",
            "Single line text input",
        ),
        "text",
    ));

    list.push(template_base(
        ElementKind::MultilineInput,
        Category::LayoutParticipant,
        "Text Area",
        "Multi-line text input",
    ));

    list.push(with_input_type(
        template_base(
            ElementKind::NumericInput,
            Category::LayoutParticipant,
            "Number",
            "Input field for numeric values",
        ),
        "number",
    ));

    list.push(with_input_type(
        template_base(
            ElementKind::EmailInput,
            Category::LayoutParticipant,
            "Email",
            "Input field for email addresses",
        ),
        "email",
    ));

    list.push(with_input_type(
        template_base(
            ElementKind::PasswordInput,
            Category::LayoutParticipant,
            "Password",
            "Input field for passwords",
        ),
        "password",
    ));

    list.push(with_input_type(
        template_base(
            ElementKind::FileInput,
            Category::LayoutParticipant,
            "File upload",
            "Input field for file uploads",
        ),
        "file",
    ));

    list.push(with_input_type(
        template_base(
            ElementKind::PhoneInput,
            Category::LayoutParticipant,
            "Telephone",
            "Input field for telephone numbers",
        ),
        "tel",
    ));

    list.push(with_input_type(
        template_base(
            ElementKind::UrlInput,
            Category::LayoutParticipant,
            "URL",
            "Input field for URLs",
        ),
        "url",
    ));

    let mut select = template_base(
        ElementKind::Select,
        Category::LayoutParticipant,
        "Select",
        "Dropdown select",
    );
    select.options = seed_options();
    list.push(select);

    let mut checkbox = template_base(
        ElementKind::Checkbox,
        Category::LayoutParticipant,
        "Checkbox",
        "Checkbox input",
    );
    checkbox.label_description = Some("Checkbox Description".into());
    checkbox.properties.style.show_label = "no".into();
    list.push(checkbox);

    let mut checkbox_group = template_base(
        ElementKind::CheckboxGroup,
        Category::LayoutParticipant,
        "Checkbox Group",
        "Group of checkboxes",
    );
    checkbox_group.options = seed_options();
    if let Some(first) = checkbox_group.options.first_mut() {
        first.checked = Some(true);
    }
    list.push(checkbox_group);

    let mut radio = template_base(
        ElementKind::RadioGroup,
        Category::LayoutParticipant,
        "Radio Group",
        "Group of radio buttons",
    );
    radio.options = seed_options();
    list.push(radio);

    let mut date = template_base(
        ElementKind::DatePicker,
        Category::LayoutParticipant,
        "Date Picker",
        "Date picker input",
    );
    date.attributes.insert("placeholder".into(), "Pick a date".into());
    list.push(date);

    let mut switch = template_base(
        ElementKind::Switch,
        Category::LayoutParticipant,
        "Switch",
        "Toggle switch",
    );
    switch.label_description = Some("Switch Description".into());
    switch.properties.style.show_label = "no".into();
    list.push(switch);

    let mut button = template_base(
        ElementKind::Button,
        Category::LayoutParticipant,
        "Button",
        "Button",
    );
    button.content = Some("Button".into());
    button.properties.style.show_label = "no".into();
    button.properties.variant = "outline".into();
    button.attributes.insert("type".into(), "button".into());
    list.push(button);

    let mut submit = template_base(
        ElementKind::SubmitButton,
        Category::LayoutParticipant,
        "Submit",
        "Button to submit form",
    );
    submit.content = Some("Submit".into());
    submit.properties.style.show_label = "no".into();
    submit.attributes.insert("type".into(), "submit".into());
    list.push(submit);

    let mut reset = template_base(
        ElementKind::ResetButton,
        Category::LayoutParticipant,
        "Reset",
        "Button to reset form input values",
    );
    reset.content = Some("Reset".into());
    reset.properties.style.show_label = "no".into();
    reset.properties.variant = "outline".into();
    reset.attributes.insert("type".into(), "reset".into());
    list.push(reset);

    list
}

/// The template for one kind.
pub fn template(kind: ElementKind) -> Option<Element> {
    templates().into_iter().find(|el| el.kind == kind)
}
