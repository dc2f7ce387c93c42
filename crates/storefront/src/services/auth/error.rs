//! Authentication error types.

use thiserror::Error;

use beaulytics_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is wrong. Deliberately unspecific.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account exists for the email.
    #[error("user not found")]
    UserNotFound,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The password doesn't meet the policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The email failed structural validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A reset token was unknown, expired, or already used.
    #[error("invalid or expired reset token")]
    InvalidResetToken,

    /// Password hashing or verification failed.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Underlying repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
