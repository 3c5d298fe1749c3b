//! Leaf controls.
//!
//! Widgets render a single HTML control for a name, a current value, and a
//! set of extra attributes. They know nothing about labels, errors, or
//! binding modes; the field renderer wraps them.

use std::collections::BTreeMap;
use std::fmt;

use crate::descriptor::{IconPosition, SelectOption};
use crate::kinds::{ControlKind, FieldKind};

/// Extra HTML attributes, kept sorted for deterministic output.
///
/// An empty value renders as a bare boolean attribute (` required`).
pub type Attrs = BTreeMap<String, String>;

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Formats an attribute map into a string like ` key="value" flag`.
pub fn render_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(k, v)| {
            if v.is_empty() {
                format!(" {k}")
            } else {
                format!(r#" {k}="{}""#, escape_html(v))
            }
        })
        .collect()
}

/// A control that renders itself as HTML.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the control family this widget belongs to.
    fn control(&self) -> ControlKind;

    /// Renders the control. The name is escaped before it lands in an
    /// attribute.
    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String;
}

/// A single-line `<input>` of the given kind.
#[derive(Debug, Clone)]
pub struct Input {
    /// The native input type.
    pub kind: FieldKind,
}

impl Widget for Input {
    fn control(&self) -> ControlKind {
        ControlKind::Input
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let name = escape_html(name);
        // Browsers never accept a prefilled value on file inputs.
        let value_attr = if self.kind == FieldKind::File {
            String::new()
        } else {
            format!(r#" value="{}""#, escape_html(value))
        };
        format!(
            r#"<input type="{}" id="{name}" name="{name}"{value_attr}{} />"#,
            escape_html(self.kind.as_str()),
            render_attrs(attrs)
        )
    }
}

/// An `<input type="checkbox">`.
#[derive(Debug, Clone)]
pub struct Checkbox;

impl Widget for Checkbox {
    fn control(&self) -> ControlKind {
        ControlKind::Checkbox
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let name = escape_html(name);
        let checked = if value == "true" { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" id="{name}" name="{name}"{checked}{} />"#,
            render_attrs(attrs)
        )
    }
}

/// A `<select>` whose first option is an empty placeholder.
#[derive(Debug, Clone)]
pub struct Select {
    /// Text of the leading empty option.
    pub placeholder: String,
    /// The available options, in display order.
    pub options: Vec<SelectOption>,
}

impl Widget for Select {
    fn control(&self) -> ControlKind {
        ControlKind::Select
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let name = escape_html(name);
        let mut options = format!(
            r#"<option value="">{}</option>"#,
            escape_html(&self.placeholder)
        );
        for option in &self.options {
            let selected = if option.value == value { " selected" } else { "" };
            options.push_str(&format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(&option.value),
                escape_html(&option.label)
            ));
        }
        format!(
            r#"<select id="{name}" name="{name}"{}>{options}</select>"#,
            render_attrs(attrs)
        )
    }
}

/// A multi-line `<textarea>`.
#[derive(Debug, Clone)]
pub struct Textarea {
    /// Visible row count.
    pub rows: u32,
}

impl Widget for Textarea {
    fn control(&self) -> ControlKind {
        ControlKind::Textarea
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let name = escape_html(name);
        format!(
            r#"<textarea id="{name}" name="{name}" rows="{}"{}>{}</textarea>"#,
            self.rows,
            render_attrs(attrs),
            escape_html(value)
        )
    }
}

/// A group of `<input type="radio">` elements, one per option.
#[derive(Debug, Clone)]
pub struct RadioGroup {
    /// The available options, in display order.
    pub options: Vec<SelectOption>,
}

impl Widget for RadioGroup {
    fn control(&self) -> ControlKind {
        ControlKind::Radio
    }

    fn render(&self, name: &str, value: &str, attrs: &Attrs) -> String {
        let name = escape_html(name);
        let mut html = format!(r#"<div id="{name}" role="radiogroup">"#);
        for (i, option) in self.options.iter().enumerate() {
            let checked = if option.value == value { " checked" } else { "" };
            let option_id = format!("{name}_{i}");
            html.push_str(&format!(
                r#"<div><input type="radio" id="{option_id}" name="{name}" value="{}"{checked}{} />"#,
                escape_html(&option.value),
                render_attrs(attrs)
            ));
            html.push_str(&format!(
                r#" <label for="{option_id}">{}</label></div>"#,
                escape_html(&option.label)
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// Renders the clickable icon that sits inside a text-like control.
///
/// The button is skipped by keyboard focus order and carries the field name
/// so a click can be routed back to the field's icon callback. Icon markup
/// is inserted as-is.
pub fn render_icon_button(name: &str, markup: &str, position: IconPosition) -> String {
    let side = match position {
        IconPosition::Left => "left",
        IconPosition::Right => "right",
    };
    let name = escape_html(name);
    format!(
        r#"<button type="button" class="icon icon-{side}" tabindex="-1" data-icon-for="{name}">{markup}</button>"#
    )
}

/// Creates the widget for a field kind.
pub fn create_widget(
    kind: &FieldKind,
    label: &str,
    options: &[SelectOption],
    rows: u32,
) -> Box<dyn Widget> {
    match kind.control() {
        ControlKind::Checkbox => Box::new(Checkbox),
        ControlKind::Select => Box::new(Select {
            placeholder: format!("Select {label}"),
            options: options.to_vec(),
        }),
        ControlKind::Textarea => Box::new(Textarea { rows }),
        ControlKind::Radio => Box::new(RadioGroup {
            options: options.to_vec(),
        }),
        ControlKind::Input => Box::new(Input { kind: kind.clone() }),
    }
}
