//! Explicit form validation for the auth flows.
//!
//! Validators return a structured list of field errors instead of relying on
//! declarative annotations, so each rule is composable and testable on its
//! own. Anything rejected here never reaches the network.

use common::types::Role;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Login form fields as the user typed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

/// Registration form fields; extends login with identity and consent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCredentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub role: Role,
    pub accept_terms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Three-level strength signal shown next to the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Accepts `user@example.com`-shaped addresses: a non-empty local part, an
/// `@`, and a domain containing a dot.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else { return false };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else { return false };
    !host.is_empty() && !tld.is_empty() && !domain.contains(' ') && !local.contains(' ')
}

/// Classify by length and character-class variety.
pub fn classify_password(password: &str) -> PasswordStrength {
    if password.len() < MIN_PASSWORD_LEN {
        return PasswordStrength::Weak;
    }
    let mut classes = 0;
    for pred in [
        char::is_lowercase as fn(char) -> bool,
        char::is_uppercase,
        |c: char| c.is_ascii_digit(),
        |c: char| !c.is_alphanumeric(),
    ] {
        if password.chars().any(pred) {
            classes += 1;
        }
    }
    if password.len() >= 12 && classes >= 3 {
        PasswordStrength::Strong
    } else if classes >= 2 {
        PasswordStrength::Medium
    } else {
        PasswordStrength::Weak
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "enter a valid email address"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.len() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

pub fn validate_login(creds: &LoginCredentials) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(&creds.email, &mut errors);
    check_password(&creds.password, &mut errors);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn validate_register(creds: &RegisterCredentials) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(&creds.email, &mut errors);
    check_password(&creds.password, &mut errors);
    if creds.confirm_password != creds.password {
        errors.push(FieldError::new("confirm_password", "passwords do not match"));
    }
    if creds.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    if !creds.role.is_self_registerable() {
        errors.push(FieldError::new("role", "choose landlord or tenant"));
    }
    if !creds.accept_terms {
        errors.push(FieldError::new("accept_terms", "you must accept the terms"));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(role: Role) -> RegisterCredentials {
        RegisterCredentials {
            email: "a@b.com".into(),
            password: "Password123!".into(),
            confirm_password: "Password123!".into(),
            name: "John Doe".into(),
            role,
            accept_terms: true,
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
    }

    #[test]
    fn strength_levels() {
        assert_eq!(classify_password("short"), PasswordStrength::Weak);
        assert_eq!(classify_password("alllowercase"), PasswordStrength::Weak);
        assert_eq!(classify_password("Mixed1up"), PasswordStrength::Medium);
        assert_eq!(classify_password("Password123!"), PasswordStrength::Strong);
    }

    #[test]
    fn login_rejects_bad_email_and_short_password_together() {
        let errs = validate_login(&LoginCredentials {
            email: "bad".into(),
            password: "x".into(),
            remember: false,
        })
        .unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn login_rejects_short_password_alone() {
        let errs = validate_login(&LoginCredentials {
            email: "user@example.com".into(),
            password: "short".into(),
            remember: false,
        })
        .unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "password");
    }

    #[test]
    fn register_happy_path() {
        assert!(validate_register(&register(Role::Tenant)).is_ok());
        assert!(validate_register(&register(Role::Landlord)).is_ok());
    }

    #[test]
    fn register_rejects_mismatch_terms_and_admin() {
        let mut creds = register(Role::Admin);
        creds.confirm_password = "Different1!".into();
        creds.accept_terms = false;
        let errs = validate_register(&creds).unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"confirm_password"));
        assert!(fields.contains(&"accept_terms"));
        assert!(fields.contains(&"role"));
    }
}
