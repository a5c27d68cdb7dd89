//! Field-level input checks shared by the user and resource services.

use std::collections::HashMap;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_EMAIL_LENGTH: usize = 255;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const EMAIL_TAKEN: &str = "user with this email already exists.";

/// Collects per-field messages; empty means the input is valid
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First failure per field wins
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

/// Emails are compared case-insensitively by storing them lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose shape check: one `@`, non-empty local part, dotted domain, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Required, non-blank, well-formed. Returns the normalized email.
pub fn check_email(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match value {
        None => {
            errors.add("email", REQUIRED);
            None
        }
        Some(raw) if raw.trim().is_empty() => {
            errors.add("email", BLANK);
            None
        }
        Some(raw) => {
            let email = normalize_email(raw);
            if is_valid_email(&email) {
                Some(email)
            } else {
                errors.add("email", INVALID_EMAIL);
                None
            }
        }
    }
}

/// Passwords are taken verbatim, whitespace included
pub fn check_password<'a>(value: Option<&'a str>, min_length: usize, errors: &mut FieldErrors) -> Option<&'a str> {
    match value {
        None => {
            errors.add("password", REQUIRED);
            None
        }
        Some("") => {
            errors.add("password", BLANK);
            None
        }
        Some(password) if password.chars().count() < min_length => {
            errors.add(
                "password",
                format!("Ensure this field has at least {} characters.", min_length),
            );
            None
        }
        Some(password) => Some(password),
    }
}

/// Required, trimmed, 1..=255 characters. Returns the trimmed name.
pub fn check_name(field: &str, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let Some(raw) = value else {
        errors.add(field, REQUIRED);
        return None;
    };
    let name = raw.trim();
    if name.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", MAX_NAME_LENGTH),
        );
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whole_address() {
        assert_eq!(normalize_email("  Mohammad@GMAIL.COM "), "mohammad@gmail.com");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("test@gmail.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("test"));
        assert!(!is_valid_email("@gmail.com"));
        assert!(!is_valid_email("test@gmail"));
        assert!(!is_valid_email("test@@gmail.com"));
        assert!(!is_valid_email("te st@gmail.com"));
        assert!(!is_valid_email("test@gmail..com"));
    }

    #[test]
    fn password_rules() {
        let mut errors = FieldErrors::new();
        assert!(check_password(Some("pw"), 5, &mut errors).is_none());
        assert!(errors.into_inner()["password"].contains("at least 5"));

        let mut errors = FieldErrors::new();
        assert_eq!(check_password(Some("  pass  "), 5, &mut errors), Some("  pass  "));
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        check_password(Some(""), 5, &mut errors);
        assert_eq!(errors.into_inner()["password"], BLANK);
    }

    #[test]
    fn name_rules() {
        let mut errors = FieldErrors::new();
        assert_eq!(check_name("name", Some("  Vegan "), &mut errors).as_deref(), Some("Vegan"));
        assert!(check_name("name", Some("   "), &mut errors).is_none());
        assert_eq!(errors.into_inner()["name"], BLANK);

        let mut errors = FieldErrors::new();
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(check_name("name", Some(&long), &mut errors).is_none());
        assert!(check_name("other", None, &mut errors).is_none());
        let errors = errors.into_inner();
        assert!(errors["name"].contains("no more than"));
        assert_eq!(errors["other"], REQUIRED);
    }
}
