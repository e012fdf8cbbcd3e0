use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    /// Stored and compared verbatim.
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub promotional_emails: bool,
    pub created_at: String,
    pub last_login: String,
}

impl UserRecord {
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }
}

/// Registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub promotional_emails: bool,
}

impl NewUser {
    /// Signup form checks; empty when the form may be submitted.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = validate_login(&self.email, &self.password);
        if self.first_name.is_empty() {
            errors.push(FieldError::new("firstName", "First name is required"));
        }
        if self.last_name.is_empty() {
            errors.push(FieldError::new("lastName", "Last name is required"));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Login form checks; empty when the form may be submitted.
pub fn validate_login(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !looks_like_email(email) {
        errors.push(FieldError::new("email", "Email is invalid"));
    }

    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    errors
}

fn looks_like_email(email: &str) -> bool {
    Regex::new(r"\S+@\S+\.\S+").is_ok_and(|re| re.is_match(email))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: usize,
    pub promotional_opt_ins: usize,
    /// Percentage with one decimal place; zero with no users.
    pub opt_in_rate: Decimal,
}
