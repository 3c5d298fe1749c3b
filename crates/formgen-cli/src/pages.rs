//! The user-creation flow.
//!
//! [`CreateUserPage`] wraps a [`FormGenerator`] configured with the user
//! form, wired to a submit handler that stores the record in a
//! [`RecordStore`]. [`render_detail`] and [`detail_lines`] show the stored
//! record with the password masked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use formgen_core::{FormData, FormError, FormResult, Settings, Value};
use formgen_forms::buttons::{ButtonConfig, ButtonVariant};
use formgen_forms::config::{FormConfiguration, SubmitHandler};
use formgen_forms::descriptor::{FieldDescriptor, IconAction, IconPosition};
use formgen_forms::generator::{FormGenerator, SubmitOutcome};
use formgen_forms::kinds::FieldKind;
use formgen_forms::persistence::{clear_record, load_record, save_record, RecordStore};
use formgen_forms::widgets::escape_html;

/// Icon shown inside the password field.
pub const EYE_ICON: &str = r#"<img src="eye-slash.svg" alt="ShowPassword" class="h-5 w-5" />"#;

/// Mask character used for stored passwords.
pub const MASK_CHAR: char = '•';

/// Saves each submitted record under a fixed key.
pub struct PersistUser {
    store: Arc<dyn RecordStore>,
    key: String,
}

impl PersistUser {
    /// Creates a handler writing to `store` under `key`.
    pub fn new(store: Arc<dyn RecordStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl SubmitHandler for PersistUser {
    async fn submit(&self, data: FormData) -> Result<(), FormError> {
        save_record(self.store.as_ref(), &self.key, &data)
            .map_err(|e| FormError::Submission(format!("Failed to create user: {e}")))?;
        tracing::info!(key = %self.key, "user created");
        Ok(())
    }
}

/// Returns the fields of the user form.
pub fn user_fields() -> FormResult<Vec<FieldDescriptor>> {
    let alphanumeric =
        Regex::new("^[a-zA-Z0-9]+$").map_err(|e| FormError::Configuration(e.to_string()))?;
    Ok(vec![
        FieldDescriptor::new("fullname", FieldKind::Text)
            .label("Full Name")
            .placeholder("Enter your full name")
            .autocomplete("name")
            .required(true)
            .min(2)
            .max(50),
        FieldDescriptor::new("email", FieldKind::Email)
            .label("Email")
            .placeholder("Enter your email address")
            .autocomplete("email")
            .required(true),
        FieldDescriptor::new("password", FieldKind::Password)
            .label("Password")
            .placeholder("Enter alphanumeric password")
            .autocomplete("new-password")
            .icon(EYE_ICON, IconPosition::Right)
            .required(true)
            .pattern(alphanumeric)
            .message("Password must contain only letters and numbers")
            .min(6),
        FieldDescriptor::new("rememberMe", FieldKind::Checkbox).label("Remember Me"),
    ])
}

/// The user-creation form bound to a record store.
pub struct CreateUserPage {
    form: FormGenerator,
    show_password: Arc<AtomicBool>,
}

impl CreateUserPage {
    /// Builds the page using the mode, rendering options, and record key from
    /// `settings`.
    pub fn new(settings: &Settings, store: Arc<dyn RecordStore>) -> FormResult<Self> {
        let show_password = Arc::new(AtomicBool::new(false));
        let toggle = Arc::clone(&show_password);
        let mut fields = user_fields()?;
        if let Some(password) = fields.iter_mut().find(|f| f.name == "password") {
            password.on_icon_click = Some(IconAction::new(move || {
                toggle.fetch_xor(true, Ordering::SeqCst);
            }));
        }
        let config = FormConfiguration::new(fields)
            .on_submit(PersistUser::new(store, settings.record_key.clone()))
            .submit_button(
                ButtonConfig::new()
                    .text("Create User")
                    .variant(ButtonVariant::Primary),
            )
            .reset_after_submit(true);
        let form = FormGenerator::with_settings(config, settings, FormData::new())
            .with_id("create-user");
        Ok(Self {
            form,
            show_password,
        })
    }

    /// Returns the underlying form.
    pub const fn form(&self) -> &FormGenerator {
        &self.form
    }

    /// Returns the underlying form mutably.
    pub fn form_mut(&mut self) -> &mut FormGenerator {
        &mut self.form
    }

    /// Returns `true` if the password is shown in clear text.
    pub fn password_visible(&self) -> bool {
        self.show_password.load(Ordering::SeqCst)
    }

    /// Clicks the password icon, switching the field between hidden and
    /// visible text.
    pub fn toggle_password(&mut self) -> FormResult<()> {
        self.form.click_icon("password")?;
        let kind = if self.password_visible() {
            FieldKind::Text
        } else {
            FieldKind::Password
        };
        self.form.set_field_kind("password", kind)
    }

    /// Applies `name=value` style input to the form.
    pub fn fill<'a>(
        &mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> FormResult<()> {
        for (name, value) in pairs {
            self.form.input(name, value)?;
        }
        Ok(())
    }

    /// Submits the form.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.form.submit().await
    }

    /// Renders the page.
    pub fn render(&mut self) -> String {
        format!(
            r#"<section class="create-user"><h1>Create User</h1>{}</section>"#,
            self.form.render()
        )
    }
}

/// Masks a password with one [`MASK_CHAR`] per character.
pub fn mask_password(password: &str) -> String {
    std::iter::repeat(MASK_CHAR)
        .take(password.chars().count())
        .collect()
}

fn text(record: &FormData, key: &str) -> String {
    record.get(key).map(ToString::to_string).unwrap_or_default()
}

/// Returns the `(label, value)` rows shown for a stored user.
pub fn detail_lines(record: &FormData) -> Vec<(&'static str, String)> {
    let remember = record.get("rememberMe").is_some_and(Value::as_checkbox);
    vec![
        ("Full Name", text(record, "fullname")),
        ("Email Address", text(record, "email")),
        ("Password", mask_password(&text(record, "password"))),
        ("Remember Me", if remember { "Yes" } else { "No" }.to_string()),
    ]
}

/// Renders the detail page for a stored user, or the empty state.
pub fn render_detail(record: Option<&FormData>) -> String {
    let Some(record) = record else {
        return concat!(
            r#"<section class="user-detail empty">"#,
            "<h2>No User Data Found</h2>",
            "<p>It looks like you haven't created a user yet or the data has been cleared.</p>",
            r#"<a class="btn btn-primary btn-block" data-action="create">Create User</a>"#,
            "</section>"
        )
        .to_string();
    };

    let mut html = String::from(concat!(
        r#"<section class="user-detail">"#,
        "<h1>User Details</h1>",
        "<p>Successfully created user account</p>",
        "<h2>User Information</h2><dl>"
    ));
    for (label, value) in detail_lines(record) {
        html.push_str(&format!(
            "<div><dt>{label}</dt><dd>{}</dd></div>",
            escape_html(&value)
        ));
    }
    html.push_str(concat!(
        "</dl>",
        r#"<a class="btn btn-secondary" data-action="back">Back to Form</a>"#,
        r#"<a class="btn btn-primary" data-action="create-another">Create Another User</a>"#,
        "</section>"
    ));
    html
}

/// Renders the detail page as plain text for terminals.
pub fn detail_text(record: Option<&FormData>) -> String {
    let Some(record) = record else {
        return "No User Data Found\n\
                It looks like you haven't created a user yet or the data has been cleared."
            .to_string();
    };
    let rows = detail_lines(record);
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut text = String::from("User Details\nSuccessfully created user account\n\nUser Information\n");
    for (label, value) in rows {
        text.push_str(&format!("  {label:<width$}  {value}\n"));
    }
    text
}

/// Loads the stored user. Malformed data reads as no user.
pub fn load_user(store: &dyn RecordStore, key: &str) -> FormResult<Option<FormData>> {
    load_record(store, key)
}

/// Removes the stored user so another can be created.
pub fn create_another(store: &dyn RecordStore, key: &str) -> FormResult<()> {
    clear_record(store, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_forms::persistence::MemoryStore;

    fn page(store: &Arc<MemoryStore>) -> CreateUserPage {
        let store: Arc<dyn RecordStore> = Arc::clone(store) as Arc<dyn RecordStore>;
        CreateUserPage::new(&Settings::default(), store).unwrap()
    }

    #[test]
    fn test_mask_password() {
        assert_eq!(mask_password("abc123"), "••••••");
        assert_eq!(mask_password(""), "");
    }

    #[test]
    fn test_toggle_password_visibility() {
        let store = Arc::new(MemoryStore::new());
        let mut page = page(&store);
        page.fill([("password", "abc123")]).unwrap();
        assert!(!page.password_visible());

        page.toggle_password().unwrap();
        assert!(page.password_visible());
        assert_eq!(page.form().field_kind("password"), Some(&FieldKind::Text));
        assert!(page.render().contains(r#"type="text" id="password""#));

        page.toggle_password().unwrap();
        assert!(!page.password_visible());
        assert_eq!(page.form().field_kind("password"), Some(&FieldKind::Password));
        assert_eq!(page.form().values()["password"], Value::from("abc123"));
    }

    #[tokio::test]
    async fn test_create_user_persists_and_resets() {
        let store = Arc::new(MemoryStore::new());
        let mut page = page(&store);
        page.fill([
            ("fullname", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("password", "abc123"),
            ("rememberMe", "on"),
        ])
        .unwrap();
        assert_eq!(page.submit().await, SubmitOutcome::Success { reset: true });
        assert_eq!(page.form().values()["fullname"], Value::from(""));

        let record = load_user(store.as_ref(), "userData").unwrap().unwrap();
        assert_eq!(record["rememberMe"], Value::Bool(true));
        let rows = detail_lines(&record);
        assert_eq!(rows[0], ("Full Name", "Ada Lovelace".to_string()));
        assert_eq!(rows[2], ("Password", "••••••".to_string()));
        assert_eq!(rows[3], ("Remember Me", "Yes".to_string()));

        create_another(store.as_ref(), "userData").unwrap();
        assert!(load_user(store.as_ref(), "userData").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_user_not_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut page = page(&store);
        page.fill([("fullname", "Ada"), ("email", "nope"), ("password", "abc 123")])
            .unwrap();
        let SubmitOutcome::Invalid(errors) = page.submit().await else {
            panic!("expected invalid outcome");
        };
        assert_eq!(errors["email"], "Please enter a valid email address");
        assert_eq!(errors["password"], "Password must contain only letters and numbers");
        assert!(store.get("userData").unwrap().is_none());
    }

    #[test]
    fn test_render_detail() {
        assert!(render_detail(None).contains("No User Data Found"));

        let mut record = FormData::new();
        record.insert("fullname".into(), Value::from("Ada <Countess>"));
        record.insert("password".into(), Value::from("secret"));
        let html = render_detail(Some(&record));
        assert!(html.contains("<dd>Ada &lt;Countess&gt;</dd>"));
        assert!(html.contains("<dd>••••••</dd>"));
        assert!(html.contains("<dd>No</dd>"));
        assert!(html.contains("Create Another User"));
    }

    #[test]
    fn test_detail_text() {
        assert!(detail_text(None).starts_with("No User Data Found\n"));

        let mut record = FormData::new();
        record.insert("email".into(), Value::from("ada@example.com"));
        record.insert("rememberMe".into(), Value::Bool(true));
        let text = detail_text(Some(&record));
        assert!(text.contains("  Email Address  ada@example.com\n"));
        assert!(text.contains("  Remember Me    Yes\n"));
    }

    #[test]
    fn test_malformed_record_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("userData", "{broken").unwrap();
        assert!(load_user(&store, "userData").unwrap().is_none());
    }
}
