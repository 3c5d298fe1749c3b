//! Button resolution and rendering.
//!
//! Every button starts from a concrete [`ResolvedButton`] default (submit,
//! reset, or custom) and a caller's [`ButtonConfig`] override is merged over
//! it field by field. [`resolve_buttons`] produces the full [`ButtonSet`] for
//! a form, including layout widths and the submitting override.

use serde::{Deserialize, Serialize};

use crate::config::{ButtonPosition, CustomButton};
use crate::descriptor::IconPosition;
use crate::widgets::escape_html;

/// Visual variant of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Filled, primary action.
    #[default]
    Primary,
    /// Filled, secondary action.
    Secondary,
    /// Outlined.
    Outline,
    /// Text only.
    Ghost,
}

impl ButtonVariant {
    /// Returns the lowercase name used in class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Outline => "outline",
            Self::Ghost => "ghost",
        }
    }
}

/// Size of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSize {
    /// Small.
    Sm,
    /// Medium.
    #[default]
    Md,
    /// Large.
    Lg,
}

impl ButtonSize {
    /// Returns the lowercase name used in class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

/// Icon markup shown inside a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonIcon {
    /// Markup inserted as-is.
    pub markup: String,
    /// Side of the text the icon sits on.
    #[serde(default)]
    pub position: IconPosition,
}

/// Partial button configuration; every `Some` field overrides the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Button text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Visual variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<ButtonVariant>,
    /// Size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ButtonSize>,
    /// Extra class names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Whether the button is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Whether the button shows a loading indicator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<bool>,
    /// Whether the button takes the full row width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_width: Option<bool>,
    /// Icon; replaces the default icon entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<ButtonIcon>,
}

impl ButtonConfig {
    /// Creates an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the variant.
    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Sets the size.
    pub fn size(mut self, size: ButtonSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets extra class names.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Sets the loading flag.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    /// Sets the full-width flag.
    pub fn full_width(mut self, full_width: bool) -> Self {
        self.full_width = Some(full_width);
        self
    }

    /// Sets the icon.
    pub fn icon(mut self, markup: impl Into<String>, position: IconPosition) -> Self {
        self.icon = Some(ButtonIcon {
            markup: markup.into(),
            position,
        });
        self
    }
}

/// A button with every attribute decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedButton {
    /// Button text.
    pub text: String,
    /// Visual variant.
    pub variant: ButtonVariant,
    /// Size.
    pub size: ButtonSize,
    /// Extra class names, possibly empty.
    pub class_name: String,
    /// Whether the button is disabled.
    pub disabled: bool,
    /// Whether the button shows a loading indicator.
    pub loading: bool,
    /// Whether the button takes the full row width.
    pub full_width: bool,
    /// Optional icon.
    pub icon: Option<ButtonIcon>,
}

impl ResolvedButton {
    fn plain(text: &str, variant: ButtonVariant, full_width: bool) -> Self {
        Self {
            text: text.to_string(),
            variant,
            size: ButtonSize::Md,
            class_name: String::new(),
            disabled: false,
            loading: false,
            full_width,
            icon: None,
        }
    }

    /// The submit button default: "Submit", primary, full width.
    pub fn submit_default() -> Self {
        Self::plain("Submit", ButtonVariant::Primary, true)
    }

    /// The reset button default: "Reset", outline.
    pub fn reset_default() -> Self {
        Self::plain("Reset", ButtonVariant::Outline, false)
    }

    /// The default for a custom button, labelled with its id.
    pub fn custom_default(id: &str) -> Self {
        Self::plain(id, ButtonVariant::Primary, false)
    }

    /// Merges an override over this button, field by field.
    #[must_use]
    pub fn merge(mut self, over: &ButtonConfig) -> Self {
        if let Some(text) = &over.text {
            self.text.clone_from(text);
        }
        if let Some(variant) = over.variant {
            self.variant = variant;
        }
        if let Some(size) = over.size {
            self.size = size;
        }
        if let Some(class_name) = &over.class_name {
            self.class_name.clone_from(class_name);
        }
        if let Some(disabled) = over.disabled {
            self.disabled = disabled;
        }
        if let Some(loading) = over.loading {
            self.loading = loading;
        }
        if let Some(full_width) = over.full_width {
            self.full_width = full_width;
        }
        if over.icon.is_some() {
            self.icon.clone_from(&over.icon);
        }
        self
    }
}

/// What a button does when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Validates and submits the form.
    Submit,
    /// Restores default values.
    Reset,
    /// Invokes the custom button with this id.
    Custom(String),
}

impl ButtonAction {
    /// Returns the value of the rendered `data-action` attribute.
    pub fn data_action(&self) -> String {
        match self {
            Self::Submit => "submit".to_string(),
            Self::Reset => "reset".to_string(),
            Self::Custom(id) => format!("custom:{id}"),
        }
    }
}

/// How much horizontal space a button's wrapper takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonWidth {
    /// The whole row.
    Full,
    /// An equal share of the row.
    Flex,
    /// Its natural width.
    Auto,
}

impl ButtonWidth {
    const fn class(self) -> &'static str {
        match self {
            Self::Full => "w-full",
            Self::Flex => "flex-1",
            Self::Auto => "",
        }
    }
}

/// A resolved button with its action and layout width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedButton {
    /// What the button does.
    pub action: ButtonAction,
    /// The resolved attributes.
    pub button: ResolvedButton,
    /// The wrapper width.
    pub width: ButtonWidth,
}

impl PlacedButton {
    /// Renders the button inside its width wrapper.
    pub fn render(&self) -> String {
        let b = &self.button;
        let mut class = format!("btn btn-{} btn-{}", b.variant.as_str(), b.size.as_str());
        if b.full_width {
            class.push_str(" btn-block");
        }
        if !b.class_name.is_empty() {
            class.push(' ');
            class.push_str(&b.class_name);
        }
        let kind = if self.action == ButtonAction::Submit {
            "submit"
        } else {
            "button"
        };
        let disabled = if b.disabled { " disabled" } else { "" };
        let busy = if b.loading { r#" aria-busy="true""# } else { "" };
        let spinner = if b.loading {
            r#"<span class="spinner" aria-hidden="true"></span>"#
        } else {
            ""
        };
        let (left, right) = match &b.icon {
            Some(icon) if icon.position == IconPosition::Left => (icon.markup.as_str(), ""),
            Some(icon) => ("", icon.markup.as_str()),
            None => ("", ""),
        };
        format!(
            r#"<div class="{}"><button type="{kind}" class="{}" data-action="{}"{disabled}{busy}>{spinner}{left}{}{right}</button></div>"#,
            self.width.class(),
            escape_html(&class),
            escape_html(&self.action.data_action()),
            escape_html(&b.text)
        )
    }
}

/// Everything the inputs of [`resolve_buttons`] need from a form.
#[derive(Debug, Clone, Copy)]
pub struct ButtonInputs<'a> {
    /// Submit override.
    pub submit: Option<&'a ButtonConfig>,
    /// Reset override.
    pub reset: Option<&'a ButtonConfig>,
    /// Whether the reset button is shown.
    pub show_reset: bool,
    /// Custom buttons in declaration order.
    pub custom: &'a [CustomButton],
}

/// The buttons of one form, in layout groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSet {
    /// The submit button.
    pub submit: PlacedButton,
    /// The reset button, if shown.
    pub reset: Option<PlacedButton>,
    /// Custom buttons rendered before the main row.
    pub before: Vec<PlacedButton>,
    /// Custom buttons rendered after the main row.
    pub after: Vec<PlacedButton>,
}

impl ButtonSet {
    /// Renders the full button area: `before`, then reset and submit side
    /// by side, then `after`.
    pub fn render(&self) -> String {
        let mut html = String::from(r#"<div class="actions">"#);
        for button in &self.before {
            html.push_str(&button.render());
        }
        let row = if self.reset.is_some() {
            "main-actions flex-row"
        } else {
            "main-actions"
        };
        html.push_str(&format!(r#"<div class="{row}">"#));
        if let Some(reset) = &self.reset {
            html.push_str(&reset.render());
        }
        html.push_str(&self.submit.render());
        html.push_str("</div>");
        for button in &self.after {
            html.push_str(&button.render());
        }
        html.push_str("</div>");
        html
    }

}

/// Resolves every button of a form.
///
/// While `submitting` is `true` the submit button is forced disabled and
/// loading regardless of its configuration.
pub fn resolve_buttons(inputs: ButtonInputs<'_>, submitting: bool) -> ButtonSet {
    let mut submit = ResolvedButton::submit_default();
    if let Some(over) = inputs.submit {
        submit = submit.merge(over);
    }
    if submitting {
        submit.disabled = true;
        submit.loading = true;
    }
    let submit_width = if submit.full_width && !inputs.show_reset {
        ButtonWidth::Full
    } else {
        ButtonWidth::Flex
    };

    let reset = inputs.show_reset.then(|| {
        let mut button = ResolvedButton::reset_default();
        if let Some(over) = inputs.reset {
            button = button.merge(over);
        }
        let width = if button.full_width {
            ButtonWidth::Flex
        } else {
            ButtonWidth::Auto
        };
        PlacedButton {
            action: ButtonAction::Reset,
            button,
            width,
        }
    });

    let mut before = Vec::new();
    let mut after = Vec::new();
    for custom in inputs.custom {
        let button = ResolvedButton::custom_default(&custom.id).merge(&custom.config);
        let width = if button.full_width {
            ButtonWidth::Full
        } else {
            ButtonWidth::Auto
        };
        let placed = PlacedButton {
            action: ButtonAction::Custom(custom.id.clone()),
            button,
            width,
        };
        match custom.position {
            ButtonPosition::Before => before.push(placed),
            ButtonPosition::After => after.push(placed),
        }
    }

    ButtonSet {
        submit: PlacedButton {
            action: ButtonAction::Submit,
            button: submit,
            width: submit_width,
        },
        reset,
        before,
        after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(
        submit: Option<&'a ButtonConfig>,
        reset: Option<&'a ButtonConfig>,
        show_reset: bool,
        custom: &'a [CustomButton],
    ) -> ButtonInputs<'a> {
        ButtonInputs {
            submit,
            reset,
            show_reset,
            custom,
        }
    }

    #[test]
    fn test_defaults() {
        let set = resolve_buttons(inputs(None, None, false, &[]), false);
        assert_eq!(set.submit.button, ResolvedButton::submit_default());
        assert_eq!(set.submit.button.text, "Submit");
        assert_eq!(set.submit.width, ButtonWidth::Full);
        assert!(set.reset.is_none());
        assert!(set.before.is_empty() && set.after.is_empty());
    }

    #[test]
    fn test_override_merges_field_by_field() {
        let over = ButtonConfig::new().text("Create User");
        let set = resolve_buttons(inputs(Some(&over), None, false, &[]), false);
        assert_eq!(set.submit.button.text, "Create User");
        assert_eq!(set.submit.button.variant, ButtonVariant::Primary);
        assert!(set.submit.button.full_width);
    }

    #[test]
    fn test_icon_replaced_wholesale() {
        let base = ResolvedButton {
            icon: Some(ButtonIcon {
                markup: "old".into(),
                position: IconPosition::Left,
            }),
            ..ResolvedButton::submit_default()
        };
        let merged = base.merge(&ButtonConfig::new().icon("new", IconPosition::Right));
        assert_eq!(
            merged.icon,
            Some(ButtonIcon {
                markup: "new".into(),
                position: IconPosition::Right
            })
        );
    }

    #[test]
    fn test_submitting_forces_disabled_loading() {
        let over = ButtonConfig::new().disabled(false).loading(false);
        let set = resolve_buttons(inputs(Some(&over), None, false, &[]), true);
        assert!(set.submit.button.disabled);
        assert!(set.submit.button.loading);
        let html = set.submit.render();
        assert!(html.contains(" disabled"));
        assert!(html.contains(r#"aria-busy="true""#));
    }

    #[test]
    fn test_reset_layout() {
        let set = resolve_buttons(inputs(None, None, true, &[]), false);
        let reset = set.reset.as_ref().unwrap();
        assert_eq!(reset.button.text, "Reset");
        assert_eq!(reset.button.variant, ButtonVariant::Outline);
        assert_eq!(reset.width, ButtonWidth::Auto);
        assert_eq!(set.submit.width, ButtonWidth::Flex);

        let wide = ButtonConfig::new().full_width(true);
        let set = resolve_buttons(inputs(None, Some(&wide), true, &[]), false);
        assert_eq!(set.reset.unwrap().width, ButtonWidth::Flex);
    }

    #[test]
    fn test_submit_without_full_width_is_flexible() {
        let over = ButtonConfig::new().full_width(false);
        let set = resolve_buttons(inputs(Some(&over), None, false, &[]), false);
        assert_eq!(set.submit.width, ButtonWidth::Flex);
    }

    #[test]
    fn test_custom_buttons_partitioned() {
        let custom = vec![
            CustomButton::new("draft", ButtonConfig::new().text("Save as Draft"))
                .position(ButtonPosition::Before),
            CustomButton::new("preview", ButtonConfig::new()),
            CustomButton::new("help", ButtonConfig::new()).position(ButtonPosition::Before),
        ];
        let set = resolve_buttons(inputs(None, None, false, &custom), false);
        let before: Vec<_> = set.before.iter().map(|b| b.button.text.as_str()).collect();
        assert_eq!(before, ["Save as Draft", "help"]);
        assert_eq!(set.after.len(), 1);
        assert_eq!(set.after[0].action, ButtonAction::Custom("preview".into()));
    }

    #[test]
    fn test_render_order() {
        let custom = vec![
            CustomButton::new("draft", ButtonConfig::new().text("Save as Draft"))
                .position(ButtonPosition::Before),
            CustomButton::new("help", ButtonConfig::new().text("Help")),
        ];
        let set = resolve_buttons(inputs(None, None, true, &custom), false);
        let html = set.render();
        let draft = html.find("Save as Draft").unwrap();
        let reset = html.find(r#"data-action="reset""#).unwrap();
        let submit = html.find(r#"data-action="submit""#).unwrap();
        let help = html.find("Help").unwrap();
        assert!(draft < reset && reset < submit && submit < help);
        assert!(html.contains(r#"type="submit""#));
        assert!(html.contains(r#"data-action="custom:draft""#));
    }

    #[test]
    fn test_button_config_deserialize() {
        let json = r#"{"text": "Clear", "variant": "ghost", "size": "sm", "full_width": true}"#;
        let config: ButtonConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.variant, Some(ButtonVariant::Ghost));
        assert_eq!(config.size, Some(ButtonSize::Sm));
        assert_eq!(config.full_width, Some(true));
        assert!(config.icon.is_none());
    }
}
