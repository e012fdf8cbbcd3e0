use thiserror::Error;

/// Failures a user can act on; the message is meant for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum AuthError {
    #[error("An account with this email already exists")]
    DuplicateEmail { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid demo number {number}. Use 1, 2, or 3")]
    InvalidDemoNumber { number: usize },
}
