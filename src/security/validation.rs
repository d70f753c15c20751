use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    Required(String),
    #[error("Field '{field}' is too short: {actual} < {min} chars")]
    TooShort { field: String, min: usize, actual: usize },
    #[error("Field '{field}' is too long: {actual} > {max} chars")]
    TooLong { field: String, max: usize, actual: usize },
    #[error("Field '{field}' must be between {min} and {max}")]
    InvalidRange { field: String, min: String, max: String },
    #[error("Field '{field}' has invalid value: {message}")]
    InvalidValue { field: String, message: String },
    #[error("Field '{field}' is not a valid email address: {value}")]
    InvalidEmail { field: String, value: String },
    #[error("Field '{field}' is not a valid phone number: {value}")]
    InvalidPhone { field: String, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::Required(field)
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidRange { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidPhone { field, .. } => field,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self {
            Self::Required(field)
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidRange { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidPhone { field, .. } => field,
        }
    }

    /// Re-roots the field path under `prefix` (`"members[0]"` + `"email"`
    /// becomes `"members[0].email"`, `"[2]"` + `"email"` becomes `"[2].email"`).
    pub fn nest(&mut self, prefix: &str) {
        let field = self.field_mut();
        *field = if field.is_empty() {
            prefix.to_string()
        } else if field.starts_with('[') || prefix.is_empty() {
            format!("{prefix}{field}")
        } else {
            format!("{prefix}.{field}")
        };
    }
}

/// One entry of the wire-level error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: String,
    pub msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} validation error(s): {}",
            self.errors.len(),
            self.to_error_messages().join("; ")
        )
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn missing(field: &str) -> Self {
        Self::from(ValidationError::Required(field.to_string()))
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn nested(mut self, prefix: &str) -> Self {
        for error in &mut self.errors {
            error.nest(prefix);
        }
        self
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    pub fn to_error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn to_field_errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .map(|e| FieldError {
                loc: e.field().to_string(),
                msg: e.to_string(),
            })
            .collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).expect("Invalid email regex")
});

// Optional '+', then 2-15 ASCII digits, the first one non-zero.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("Invalid phone regex")
});

pub fn validate_string_required(value: &str, field_name: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field_name.to_string()))
    } else {
        Ok(())
    }
}

/// Bounds are counted in characters, not bytes.
pub fn validate_length(
    value: &str,
    field_name: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let len = value.chars().count();

    if let Some(min_len) = min {
        if len < min_len {
            return Err(ValidationError::TooShort {
                field: field_name.to_string(),
                min: min_len,
                actual: len,
            });
        }
    }

    if let Some(max_len) = max {
        if len > max_len {
            return Err(ValidationError::TooLong {
                field: field_name.to_string(),
                max: max_len,
                actual: len,
            });
        }
    }

    Ok(())
}

pub fn validate_email(email: &str, field_name: &str) -> Result<(), ValidationError> {
    if email.len() <= 254 && EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            field: field_name.to_string(),
            value: email.to_string(),
        })
    }
}

pub fn validate_phone(phone: &str, field_name: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone {
            field: field_name.to_string(),
            value: phone.to_string(),
        })
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    field_name: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ValidationError> {
    let min_str = min.as_ref().map(|m| m.to_string()).unwrap_or_else(|| "-∞".to_string());
    let max_str = max.as_ref().map(|m| m.to_string()).unwrap_or_else(|| "∞".to_string());

    let below = min.as_ref().is_some_and(|min_val| value < *min_val);
    let above = max.as_ref().is_some_and(|max_val| value > *max_val);

    if below || above {
        return Err(ValidationError::InvalidRange {
            field: field_name.to_string(),
            min: min_str,
            max: max_str,
        });
    }

    Ok(())
}

/// Accumulates every failing check so a caller sees all bad fields at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    /// Presence check for a field that arrived as `Option` from a payload.
    pub fn required<T>(&mut self, value: Option<T>, field_name: &str) -> Option<T> {
        if value.is_none() {
            self.errors
                .add_error(ValidationError::Required(field_name.to_string()));
        }
        value
    }

    /// Presence plus non-blank check; blank strings count as missing.
    pub fn required_string(&mut self, value: Option<String>, field_name: &str) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.errors
                    .add_error(ValidationError::Required(field_name.to_string()));
                None
            }
        }
    }

    pub fn string_required(&mut self, value: &str, field_name: &str) -> &mut Self {
        if let Err(e) = validate_string_required(value, field_name) {
            self.errors.add_error(e);
        }
        self
    }

    pub fn length(
        &mut self,
        value: &str,
        field_name: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> &mut Self {
        if let Err(e) = validate_length(value, field_name, min, max) {
            self.errors.add_error(e);
        }
        self
    }

    pub fn optional_length(
        &mut self,
        value: Option<&str>,
        field_name: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.length(value, field_name, min, max);
        }
        self
    }

    pub fn email(&mut self, value: &str, field_name: &str) -> &mut Self {
        if let Err(e) = validate_email(value, field_name) {
            self.errors.add_error(e);
        }
        self
    }

    pub fn phone(&mut self, value: &str, field_name: &str) -> &mut Self {
        if let Err(e) = validate_phone(value, field_name) {
            self.errors.add_error(e);
        }
        self
    }

    pub fn range<T: PartialOrd + std::fmt::Display>(
        &mut self,
        value: T,
        field_name: &str,
        min: Option<T>,
        max: Option<T>,
    ) -> &mut Self {
        if let Err(e) = validate_range(value, field_name, min, max) {
            self.errors.add_error(e);
        }
        self
    }

    /// Records the error, if any, and hands back the parsed value.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.add_error(e);
                None
            }
        }
    }

    /// Same as [`Validator::check`] for a nested record, re-rooting its
    /// field paths under `prefix`.
    pub fn nested<T>(&mut self, prefix: &str, result: Result<T, ValidationErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.merge(e.nested(prefix));
                None
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
