//! Validation schema synthesis.
//!
//! [`synthesize`] turns a list of [`FieldDescriptor`]s into a
//! [`ValidationSchema`]: one [`FieldRule`] per field, built in a fixed order.
//!
//! 1. Base rule from the field kind (boolean, numeric, date, email, text).
//!    Checkbox fields stop here.
//! 2. `min` / `max` bounds, compared as numbers, dates, or string lengths.
//! 3. The pattern rule, reporting the field's message or `"Invalid format"`.
//! 4. The required rule.
//!
//! Numeric and date values are coerced first; a value that cannot be coerced
//! fails with the kind's coercion message and no other rule runs. Otherwise
//! every attached rule is checked and, when several fail, the rule attached
//! last is the one reported (see [`ValidationError::field_messages`]).

use once_cell::sync::Lazy;
use regex::Regex;

use formgen_core::value::format_number;
use formgen_core::{FormData, ValidationError, Value};

use crate::descriptor::{Bound, FieldDescriptor};
use crate::kinds::BaseRule;

/// The address format applied to email fields.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid regex")
});

/// Message reported for a malformed email address.
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Message reported for a pattern mismatch when the field sets none.
pub const PATTERN_FALLBACK_MESSAGE: &str = "Invalid format";

/// Parses a date in `YYYY-MM-DD` form, also accepting a trailing time.
pub fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    let s = s.trim();
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}

/// A single check attached to a field.
#[derive(Debug, Clone)]
pub enum Check {
    /// The value must be a well-formed email address.
    Email,
    /// Numeric lower bound (inclusive).
    MinNumber(f64),
    /// Numeric upper bound (inclusive).
    MaxNumber(f64),
    /// Date lower bound (inclusive).
    MinDate(chrono::NaiveDate),
    /// Date upper bound (inclusive).
    MaxDate(chrono::NaiveDate),
    /// Minimum string length in characters.
    MinLength(usize),
    /// Maximum string length in characters.
    MaxLength(usize),
    /// The value must match the regular expression.
    Pattern(Regex),
    /// A value must be present.
    Required,
}

/// A check together with the message and code it reports.
#[derive(Debug, Clone)]
pub struct AttachedCheck {
    /// What is checked.
    pub check: Check,
    /// The message reported on failure.
    pub message: String,
    /// Short code naming the check (e.g. "min", "pattern").
    pub code: &'static str,
    /// The bound or pattern the check compares against, reported under
    /// `code` in the error's params.
    pub param: Option<String>,
}

impl AttachedCheck {
    fn new(check: Check, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            check,
            message: message.into(),
            code,
            param: None,
        }
    }

    /// Builds the error reported when this check fails.
    pub fn error(&self) -> ValidationError {
        let error = ValidationError::new(self.message.clone(), self.code);
        match &self.param {
            Some(param) => error.with_param(self.code, param.clone()),
            None => error,
        }
    }

    /// Returns `true` if the coerced value passes this check.
    ///
    /// Only [`Check::Required`] looks at absent values; every other check
    /// passes on [`Value::Null`].
    pub fn passes(&self, value: &Value) -> bool {
        if matches!(self.check, Check::Required) {
            return !value.is_blank();
        }
        if value.is_absent() {
            return true;
        }
        match (&self.check, value) {
            (Check::Email, Value::String(s)) => EMAIL_REGEX.is_match(s),
            (Check::Pattern(re), Value::String(s)) => re.is_match(s),
            (Check::MinLength(min), Value::String(s)) => s.chars().count() >= *min,
            (Check::MaxLength(max), Value::String(s)) => s.chars().count() <= *max,
            (Check::MinNumber(min), Value::Number(n)) => n >= min,
            (Check::MaxNumber(max), Value::Number(n)) => n <= max,
            (Check::MinDate(min), Value::Date(d)) => d >= min,
            (Check::MaxDate(max), Value::Date(d)) => d <= max,
            _ => true,
        }
    }
}

/// The synthesized rule for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// The field name this rule validates.
    pub name: String,
    /// The field label used in messages.
    pub label: String,
    /// The base rule derived from the field kind.
    pub base: BaseRule,
    /// Checks in attachment order.
    pub checks: Vec<AttachedCheck>,
}

impl FieldRule {
    /// Builds the rule for a single descriptor.
    pub fn from_descriptor(field: &FieldDescriptor) -> Self {
        let base = field.kind.base_rule();
        let mut rule = Self {
            name: field.name.clone(),
            label: field.label.clone(),
            base,
            checks: Vec::new(),
        };

        if base == BaseRule::Boolean {
            return rule;
        }
        if base == BaseRule::Email {
            rule.attach(Check::Email, EMAIL_MESSAGE, "email");
        }

        let constraint = &field.constraint;
        if let Some(min) = &constraint.min {
            rule.attach_bound(min, BoundSide::Min);
        }
        if let Some(max) = &constraint.max {
            rule.attach_bound(max, BoundSide::Max);
        }

        if let Some(pattern) = &constraint.pattern {
            let message = constraint
                .message
                .clone()
                .unwrap_or_else(|| PATTERN_FALLBACK_MESSAGE.to_string());
            rule.checks.push(AttachedCheck {
                param: Some(pattern.as_str().to_string()),
                ..AttachedCheck::new(Check::Pattern(pattern.clone()), message, "pattern")
            });
        }

        if field.required {
            let message = format!("{} is required", rule.label);
            rule.attach(Check::Required, message, "required");
        }

        rule
    }

    fn attach(&mut self, check: Check, message: impl Into<String>, code: &'static str) {
        self.checks.push(AttachedCheck::new(check, message, code));
    }

    fn attach_bound(&mut self, bound: &Bound, side: BoundSide) {
        let label = &self.label;
        let attached = match (self.base, side) {
            (BaseRule::Numeric, BoundSide::Min) => bound.as_number().map(|n| {
                (Check::MinNumber(n), format!("{label} must be at least {bound}"))
            }),
            (BaseRule::Numeric, BoundSide::Max) => bound.as_number().map(|n| {
                (Check::MaxNumber(n), format!("{label} must be at most {bound}"))
            }),
            (BaseRule::Date, BoundSide::Min) => bound
                .as_date()
                .map(|d| (Check::MinDate(d), format!("{label} must be after {bound}"))),
            (BaseRule::Date, BoundSide::Max) => bound
                .as_date()
                .map(|d| (Check::MaxDate(d), format!("{label} must be before {bound}"))),
            (_, BoundSide::Min) => bound.as_length().map(|n| {
                (
                    Check::MinLength(n),
                    format!("{label} must be at least {bound} characters"),
                )
            }),
            (_, BoundSide::Max) => bound.as_length().map(|n| {
                (
                    Check::MaxLength(n),
                    format!("{label} must be at most {bound} characters"),
                )
            }),
        };

        match attached {
            Some((check, message)) => self.checks.push(AttachedCheck {
                param: Some(bound.to_string()),
                ..AttachedCheck::new(check, message, side.code())
            }),
            None => tracing::warn!(
                field = %self.name,
                bound = %bound,
                "ignoring {} bound that does not apply to this field kind",
                side.code()
            ),
        }
    }

    /// Returns `true` if this rule carries a required check.
    pub fn is_required(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c.check, Check::Required))
    }

    /// Coerces a raw value into the type this rule validates.
    ///
    /// Blank numeric and date input counts as absent.
    pub fn coerce(&self, value: &Value) -> Result<Value, ValidationError> {
        match self.base {
            BaseRule::Boolean => Ok(Value::Bool(value.as_checkbox())),
            BaseRule::Numeric => match value {
                Value::Null => Ok(Value::Null),
                Value::Number(n) if n.is_finite() => Ok(Value::Number(*n)),
                Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Value::Number)
                    .ok_or_else(|| self.type_error("must be a number")),
                _ => Err(self.type_error("must be a number")),
            },
            BaseRule::Date => match value {
                Value::Null => Ok(Value::Null),
                Value::Date(d) => Ok(Value::Date(*d)),
                Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
                Value::String(s) => parse_date(s)
                    .map(Value::Date)
                    .ok_or_else(|| self.type_error("must be a valid date")),
                _ => Err(self.type_error("must be a valid date")),
            },
            BaseRule::Email | BaseRule::Text => Ok(match value {
                Value::Null => Value::Null,
                Value::String(s) => Value::String(s.clone()),
                Value::Number(n) => Value::String(format_number(*n)),
                other => Value::String(other.to_string()),
            }),
        }
    }

    fn type_error(&self, suffix: &str) -> ValidationError {
        ValidationError::new(format!("{} {suffix}", self.label), "type")
    }

    /// Validates a single value, returning the coerced value or every failure
    /// in attachment order.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<ValidationError>> {
        let coerced = self.coerce(value).map_err(|e| vec![e])?;
        let failures: Vec<ValidationError> = self
            .checks
            .iter()
            .filter(|c| !c.passes(&coerced))
            .map(AttachedCheck::error)
            .collect();
        if failures.is_empty() {
            Ok(coerced)
        } else {
            Err(failures)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BoundSide {
    Min,
    Max,
}

impl BoundSide {
    const fn code(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// A composite validation schema: one rule per field name.
///
/// Keys that are not part of the schema are neither rejected nor stripped.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    rules: Vec<FieldRule>,
}

impl ValidationSchema {
    /// Returns the rule registered for `name`.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Returns the registered field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates a single value against the rule for `name`.
    ///
    /// Names outside the schema pass unchanged.
    pub fn validate_field(&self, name: &str, value: &Value) -> Result<Value, Vec<ValidationError>> {
        self.field(name)
            .map_or_else(|| Ok(value.clone()), |rule| rule.validate(value))
    }

    /// Validates a whole record.
    ///
    /// Returns the coerced record on success. On failure the error carries
    /// every failing field's errors; nothing short-circuits across fields.
    pub fn validate(&self, data: &FormData) -> Result<FormData, ValidationError> {
        let mut cleaned = data.clone();
        let mut field_errors = std::collections::HashMap::new();

        for rule in &self.rules {
            let raw = data.get(&rule.name).cloned().unwrap_or_default();
            match rule.validate(&raw) {
                Ok(value) => {
                    cleaned.insert(rule.name.clone(), value);
                }
                Err(errors) => {
                    field_errors.insert(rule.name.clone(), errors);
                }
            }
        }

        if field_errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(ValidationError::with_field_errors(field_errors))
        }
    }
}

/// Synthesizes a validation schema from field descriptors.
///
/// Pure and deterministic: calling it twice with the same fields yields
/// schemas that accept and reject exactly the same records. A later
/// descriptor with a duplicate name replaces the earlier one.
pub fn synthesize(fields: &[FieldDescriptor]) -> ValidationSchema {
    let mut rules: Vec<FieldRule> = Vec::with_capacity(fields.len());
    for field in fields {
        let rule = FieldRule::from_descriptor(field);
        if let Some(existing) = rules.iter_mut().find(|r| r.name == rule.name) {
            *existing = rule;
        } else {
            rules.push(rule);
        }
    }
    ValidationSchema { rules }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::FieldKind;

    fn text(name: &str, label: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, FieldKind::Text).label(label)
    }

    fn messages(schema: &ValidationSchema, data: &FormData) -> std::collections::HashMap<String, String> {
        schema
            .validate(data)
            .map(|_| std::collections::HashMap::new())
            .unwrap_or_else(|e| e.field_messages())
    }

    fn record(pairs: &[(&str, Value)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_checkbox_ignores_constraints() {
        let field = FieldDescriptor::new("agree", FieldKind::Checkbox)
            .label("Agree")
            .required(true)
            .min(1);
        let rule = FieldRule::from_descriptor(&field);
        assert_eq!(rule.base, BaseRule::Boolean);
        assert!(rule.checks.is_empty());
        assert_eq!(rule.validate(&Value::Null), Ok(Value::Bool(false)));
        assert_eq!(rule.validate(&Value::from("on")), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_required_message() {
        let schema = synthesize(&[text("fullname", "Full Name").required(true).min(2)]);
        let msgs = messages(&schema, &record(&[("fullname", Value::from(""))]));
        assert_eq!(msgs["fullname"], "Full Name is required");
        let msgs = messages(&schema, &FormData::new());
        assert_eq!(msgs["fullname"], "Full Name is required");
    }

    #[test]
    fn test_optional_unconstrained_accepts_blank() {
        let schema = synthesize(&[text("nickname", "Nickname")]);
        assert!(schema.validate(&FormData::new()).is_ok());
        assert!(schema
            .validate(&record(&[("nickname", Value::from(""))]))
            .is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let schema = synthesize(&[text("fullname", "Full Name").min(2).max(50)]);
        for (len, ok) in [(1, false), (2, true), (50, true), (51, false)] {
            let data = record(&[("fullname", Value::from("a".repeat(len)))]);
            assert_eq!(schema.validate(&data).is_ok(), ok, "length {len}");
        }
        let msgs = messages(&schema, &record(&[("fullname", Value::from("a"))]));
        assert_eq!(msgs["fullname"], "Full Name must be at least 2 characters");
        let msgs = messages(&schema, &record(&[("fullname", Value::from("a".repeat(51)))]));
        assert_eq!(msgs["fullname"], "Full Name must be at most 50 characters");
    }

    #[test]
    fn test_length_counts_characters() {
        let schema = synthesize(&[text("city", "City").max(5)]);
        assert!(schema
            .validate(&record(&[("city", Value::from("İzmir"))]))
            .is_ok());
    }

    #[test]
    fn test_numeric_coercion_message_only() {
        let field = FieldDescriptor::new("age", FieldKind::Number)
            .label("Age")
            .required(true)
            .min(18)
            .pattern(Regex::new("^[0-9]+$").unwrap());
        let schema = synthesize(&[field]);
        let err = schema
            .validate(&record(&[("age", Value::from("twelve"))]))
            .unwrap_err();
        let errors = &err.field_errors["age"];
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Age must be a number");
        assert_eq!(errors[0].code, "type");
    }

    #[test]
    fn test_numeric_bounds() {
        let field = FieldDescriptor::new("qty", FieldKind::Range)
            .label("Quantity")
            .min(1)
            .max(10);
        let schema = synthesize(&[field]);
        let cleaned = schema
            .validate(&record(&[("qty", Value::from(" 4 "))]))
            .unwrap();
        assert_eq!(cleaned["qty"], Value::Number(4.0));
        let msgs = messages(&schema, &record(&[("qty", Value::Number(0.0))]));
        assert_eq!(msgs["qty"], "Quantity must be at least 1");
        let msgs = messages(&schema, &record(&[("qty", Value::from("11"))]));
        assert_eq!(msgs["qty"], "Quantity must be at most 10");
    }

    #[test]
    fn test_numeric_blank_is_absent() {
        let optional = synthesize(&[FieldDescriptor::new("age", FieldKind::Number).label("Age")]);
        let cleaned = optional
            .validate(&record(&[("age", Value::from(""))]))
            .unwrap();
        assert_eq!(cleaned["age"], Value::Null);

        let required = synthesize(&[FieldDescriptor::new("age", FieldKind::Number)
            .label("Age")
            .required(true)]);
        let msgs = messages(&required, &record(&[("age", Value::from(""))]));
        assert_eq!(msgs["age"], "Age is required");
    }

    #[test]
    fn test_date_rules() {
        let field = FieldDescriptor::new("start", FieldKind::Date)
            .label("Start")
            .min("2024-01-01")
            .max("2024-12-31");
        let schema = synthesize(&[field]);
        let cleaned = schema
            .validate(&record(&[("start", Value::from("2024-06-15"))]))
            .unwrap();
        assert_eq!(
            cleaned["start"],
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        );
        let msgs = messages(&schema, &record(&[("start", Value::from("2023-12-31"))]));
        assert_eq!(msgs["start"], "Start must be after 2024-01-01");
        let msgs = messages(&schema, &record(&[("start", Value::from("2025-01-01"))]));
        assert_eq!(msgs["start"], "Start must be before 2024-12-31");
        let msgs = messages(&schema, &record(&[("start", Value::from("someday"))]));
        assert_eq!(msgs["start"], "Start must be a valid date");
    }

    #[test]
    fn test_unusable_bound_is_ignored() {
        let field = FieldDescriptor::new("start", FieldKind::Date).label("Start").min(5);
        let rule = FieldRule::from_descriptor(&field);
        assert!(rule.checks.is_empty());
    }

    #[test]
    fn test_email_rule() {
        let schema = synthesize(&[FieldDescriptor::new("email", FieldKind::Email)
            .label("Email")
            .required(true)]);
        let msgs = messages(&schema, &record(&[("email", Value::from("not-an-email"))]));
        assert_eq!(msgs["email"], EMAIL_MESSAGE);
        assert!(schema
            .validate(&record(&[("email", Value::from("ADA@Example.COM"))]))
            .is_ok());
        let msgs = messages(&schema, &record(&[("email", Value::from(""))]));
        assert_eq!(msgs["email"], "Email is required");
    }

    #[test]
    fn test_pattern_messages() {
        let custom = text("code", "Code")
            .pattern(Regex::new("^[a-zA-Z0-9]+$").unwrap())
            .message("Letters and digits only");
        let fallback = text("tag", "Tag").pattern(Regex::new("^[a-z]+$").unwrap());
        let schema = synthesize(&[custom, fallback]);
        let msgs = messages(
            &schema,
            &record(&[("code", Value::from("a-b")), ("tag", Value::from("A"))]),
        );
        assert_eq!(msgs["code"], "Letters and digits only");
        assert_eq!(msgs["tag"], PATTERN_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_errors_carry_bound_and_pattern_params() {
        let field = text("password", "Password")
            .required(true)
            .min(6)
            .pattern(Regex::new("^[a-zA-Z0-9]+$").unwrap());
        let schema = synthesize(&[field]);
        let err = schema
            .validate(&record(&[("password", Value::from("a b"))]))
            .unwrap_err();
        let errors = &err.field_errors["password"];
        assert_eq!(errors[0].code, "min");
        assert_eq!(errors[0].params["min"], "6");
        assert_eq!(errors[1].code, "pattern");
        assert_eq!(errors[1].params["pattern"], "^[a-zA-Z0-9]+$");

        let err = schema.validate(&FormData::new()).unwrap_err();
        assert!(err.field_errors["password"][0].params.is_empty());
    }

    #[test]
    fn test_pattern_wins_over_bound() {
        let field = text("password", "Password")
            .min(6)
            .pattern(Regex::new("^[a-zA-Z0-9]+$").unwrap())
            .message("Password must contain only letters and numbers");
        let schema = synthesize(&[field]);
        let err = schema
            .validate(&record(&[("password", Value::from("a b"))]))
            .unwrap_err();
        let codes: Vec<&str> = err.field_errors["password"]
            .iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(codes, ["min", "pattern"]);
        assert_eq!(
            err.field_messages()["password"],
            "Password must contain only letters and numbers"
        );
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let schema = synthesize(&[text("name", "Name")]);
        let data = record(&[("name", Value::from("Ada")), ("extra", Value::Number(1.0))]);
        let cleaned = schema.validate(&data).unwrap();
        assert_eq!(cleaned["extra"], Value::Number(1.0));
        assert_eq!(
            schema.validate_field("extra", &Value::from("x")),
            Ok(Value::from("x"))
        );
    }

    #[test]
    fn test_text_coerces_scalars() {
        let rule = FieldRule::from_descriptor(&text("zip", "Zip"));
        assert_eq!(rule.validate(&Value::Number(12345.0)), Ok(Value::from("12345")));
        assert_eq!(rule.validate(&Value::Bool(true)), Ok(Value::from("true")));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let schema = synthesize(&[
            text("name", "First").required(true),
            text("name", "Second").required(true),
        ]);
        assert_eq!(schema.len(), 1);
        let msgs = messages(&schema, &FormData::new());
        assert_eq!(msgs["name"], "Second is required");
    }

    #[test]
    fn test_synthesize_is_idempotent() {
        let fields = vec![
            text("fullname", "Full Name").required(true).min(2).max(50),
            FieldDescriptor::new("email", FieldKind::Email).label("Email").required(true),
            FieldDescriptor::new("age", FieldKind::Number).label("Age").min(0),
        ];
        let a = synthesize(&fields);
        let b = synthesize(&fields);
        let inputs = [
            record(&[("fullname", Value::from("Ada")), ("email", Value::from("a@b.io"))]),
            record(&[("fullname", Value::from("A")), ("age", Value::from("x"))]),
            FormData::new(),
        ];
        for input in &inputs {
            assert_eq!(a.validate(input), b.validate(input));
        }
        assert_eq!(a.names().collect::<Vec<_>>(), ["fullname", "email", "age"]);
    }

    #[test]
    fn test_parse_date_formats() {
        let d = chrono::NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), d);
        assert_eq!(parse_date("2024-03-09T10:30"), d);
        assert_eq!(parse_date("2024-03-09 10:30:00"), d);
        assert_eq!(parse_date("09/03/2024"), None);
    }

    #[test]
    fn test_is_required() {
        assert!(FieldRule::from_descriptor(&text("a", "A").required(true)).is_required());
        assert!(!FieldRule::from_descriptor(&text("a", "A")).is_required());
    }
}
