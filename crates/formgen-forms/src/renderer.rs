//! Field rendering.
//!
//! [`render_field`] maps one descriptor, its binding, and its current error
//! to the HTML for a complete field: label with required marker, the control
//! (plus icon button for text-like inputs), and the inline error.

use formgen_core::Settings;

use crate::binding::FieldBinding;
use crate::descriptor::{FieldDescriptor, IconPosition};
use crate::kinds::ControlKind;
use crate::widgets::{create_widget, escape_html, render_icon_button, Attrs};

/// Rendering knobs that are not part of a field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Default row count for textarea fields.
    pub textarea_rows: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { textarea_rows: 4 }
    }
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            textarea_rows: settings.textarea_rows,
        }
    }
}

const REQUIRED_MARKER: &str = r#" <span class="required">*</span>"#;

fn label_html(field: &FieldDescriptor) -> String {
    let marker = if field.required { REQUIRED_MARKER } else { "" };
    format!(
        r#"<label for="{}">{}{marker}</label>"#,
        escape_html(&field.name),
        escape_html(&field.label)
    )
}

fn control_attrs(field: &FieldDescriptor, control: ControlKind, has_error: bool) -> Attrs {
    let mut attrs = Attrs::new();
    if matches!(control, ControlKind::Input | ControlKind::Textarea) {
        if let Some(placeholder) = &field.placeholder {
            attrs.insert("placeholder".into(), placeholder.clone());
        }
    }
    if let Some(hint) = &field.autocomplete {
        attrs.insert("autocomplete".into(), hint.clone());
    }
    if field.required && control != ControlKind::Checkbox {
        attrs.insert("required".into(), String::new());
    }
    if let Some(step) = &field.step {
        attrs.insert("step".into(), step.clone());
    }
    if let Some(accept) = &field.accept {
        attrs.insert("accept".into(), accept.clone());
    }
    if field.multiple {
        attrs.insert("multiple".into(), String::new());
    }
    if has_error {
        attrs.insert("aria-invalid".into(), "true".into());
        attrs.insert("aria-describedby".into(), format!("{}-error", field.name));
    }
    attrs
}

/// Renders one field.
///
/// The rendered markup is keyed by the field name, so it stays stable across
/// re-renders. Nothing is rendered for the error when `error` is `None`.
pub fn render_field(
    field: &FieldDescriptor,
    binding: &dyn FieldBinding,
    error: Option<&str>,
    options: &RenderOptions,
) -> String {
    let control = field.kind.control();
    let value = binding
        .register_native()
        .map_or_else(|| binding.get(), |registration| registration.value)
        .to_string();
    let attrs = control_attrs(field, control, error.is_some());
    let rows = field.rows.unwrap_or(options.textarea_rows);
    let widget = create_widget(&field.kind, &field.label, &field.options, rows);
    let control_html = widget.render(&field.name, &value, &attrs);

    let mut html = format!(
        r#"<div class="field" data-key="{}" data-binding="{}">"#,
        escape_html(&field.name),
        binding.mode()
    );

    match control {
        ControlKind::Checkbox => {
            html.push_str(r#"<div class="checkbox">"#);
            html.push_str(&control_html);
            html.push_str(&label_html(field));
            html.push_str("</div>");
        }
        ControlKind::Input => {
            html.push_str(&label_html(field));
            match &field.icon {
                Some(markup) => {
                    let icon = render_icon_button(&field.name, markup, field.icon_position);
                    let (side, before, after) = match field.icon_position {
                        IconPosition::Left => ("left", icon.as_str(), ""),
                        IconPosition::Right => ("right", "", icon.as_str()),
                    };
                    html.push_str(&format!(
                        r#"<div class="control has-icon-{side}">{before}{control_html}{after}</div>"#
                    ));
                }
                None => html.push_str(&control_html),
            }
        }
        ControlKind::Select | ControlKind::Textarea | ControlKind::Radio => {
            html.push_str(&label_html(field));
            html.push_str(&control_html);
        }
    }

    if let Some(message) = error {
        html.push_str(&format!(
            r#"<p id="{}-error" class="error" role="alert">{}</p>"#,
            escape_html(&field.name),
            escape_html(message)
        ));
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{resolve_binding, BindingStore};
    use crate::kinds::FieldKind;
    use formgen_core::{BindingMode, FormData, Value};

    fn render(field: &FieldDescriptor, values: FormData, error: Option<&str>) -> String {
        let mut store = BindingStore::new(BindingMode::Controlled, values);
        let binding = resolve_binding(field, &mut store);
        render_field(field, binding.as_ref(), error, &RenderOptions::default())
    }

    #[test]
    fn test_text_field() {
        let field = FieldDescriptor::new("fullname", FieldKind::Text)
            .label("Full Name")
            .placeholder("Enter your full name")
            .autocomplete("name")
            .required(true);
        let html = render(&field, FormData::new(), None);
        assert!(html.starts_with(r#"<div class="field" data-key="fullname" data-binding="controlled">"#));
        assert!(html.contains(r#"<label for="fullname">Full Name <span class="required">*</span></label>"#));
        assert!(html.contains(r#"autocomplete="name""#));
        assert!(html.contains(r#"placeholder="Enter your full name""#));
        assert!(html.contains(" required"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_error_renders_under_control() {
        let field = FieldDescriptor::new("email", FieldKind::Email).label("Email");
        let html = render(&field, FormData::new(), Some("Please enter a valid email address"));
        let control = html.find("<input").unwrap();
        let error = html.find(r#"<p id="email-error""#).unwrap();
        assert!(control < error);
        assert!(html.contains(r#"aria-invalid="true""#));
        assert!(html.contains("Please enter a valid email address</p>"));
    }

    #[test]
    fn test_name_is_escaped_in_attributes() {
        let name = r#"x" onfocus="alert(1)"#;
        let kinds = [
            FieldDescriptor::new(name, FieldKind::Text).icon("eye", IconPosition::Right),
            FieldDescriptor::new(name, FieldKind::Checkbox),
            FieldDescriptor::new(name, FieldKind::Textarea),
            FieldDescriptor::new(name, FieldKind::Select).option("a", "A"),
            FieldDescriptor::new(name, FieldKind::Radio).option("a", "A"),
        ];
        for field in &kinds {
            let html = render(field, FormData::new(), Some("Invalid"));
            assert!(!html.contains(r#"onfocus="alert(1)""#), "{html}");
            assert!(html.contains(r#"data-key="x&quot; onfocus=&quot;alert(1)""#));
            assert!(html.contains(r#"id="x&quot; onfocus=&quot;alert(1)-error""#));
        }
    }

    #[test]
    fn test_checkbox_label_follows_control() {
        let field = FieldDescriptor::new("rememberMe", FieldKind::Checkbox)
            .label("Remember me")
            .required(true);
        let mut values = FormData::new();
        values.insert("rememberMe".into(), Value::Bool(true));
        let html = render(&field, values, None);
        let control = html.find(r#"type="checkbox""#).unwrap();
        let label = html.find("<label").unwrap();
        assert!(control < label);
        assert!(html.contains(" checked"));
        assert!(html.contains(REQUIRED_MARKER));
    }

    #[test]
    fn test_select_placeholder() {
        let field = FieldDescriptor::new("country", FieldKind::Select)
            .label("Country")
            .option("us", "United States");
        let html = render(&field, FormData::new(), None);
        assert!(html.contains(r#"<option value="">Select Country</option>"#));
    }

    #[test]
    fn test_textarea_rows() {
        let field = FieldDescriptor::new("bio", FieldKind::Textarea).label("Bio");
        assert!(render(&field, FormData::new(), None).contains(r#"rows="4""#));
        let field = field.rows(8);
        assert!(render(&field, FormData::new(), None).contains(r#"rows="8""#));
    }

    #[test]
    fn test_icon_positions() {
        let right = FieldDescriptor::new("password", FieldKind::Password).icon("eye", IconPosition::Right);
        let html = render(&right, FormData::new(), None);
        assert!(html.contains("has-icon-right"));
        assert!(html.find("<input").unwrap() < html.find("<button").unwrap());

        let left = FieldDescriptor::new("search", FieldKind::Search).icon("🔍", IconPosition::Left);
        let html = render(&left, FormData::new(), None);
        assert!(html.contains("has-icon-left"));
        assert!(html.find("<button").unwrap() < html.find("<input").unwrap());
    }

    #[test]
    fn test_modes_render_same_control() {
        let field = FieldDescriptor::new("city", FieldKind::Text).label("City");
        let mut values = FormData::new();
        values.insert("city".into(), Value::from("Oslo"));

        let mut controlled = BindingStore::new(BindingMode::Controlled, values.clone());
        let mut uncontrolled = BindingStore::new(BindingMode::Uncontrolled, values);
        let a = {
            let b = resolve_binding(&field, &mut controlled);
            render_field(&field, b.as_ref(), None, &RenderOptions::default())
        };
        let b = {
            let b = resolve_binding(&field, &mut uncontrolled);
            render_field(&field, b.as_ref(), None, &RenderOptions::default())
        };
        assert_eq!(
            a.replace("controlled", "MODE"),
            b.replace("uncontrolled", "MODE")
        );
        assert!(a.contains(r#"value="Oslo""#));
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            textarea_rows: 6,
            ..Settings::default()
        };
        assert_eq!(RenderOptions::from(&settings).textarea_rows, 6);
    }
}
