//! Domain service for authentication and the administrator profile.
//!
//! Handles credential checks for login and display-name changes.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the matching user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the username is unknown or
    /// the password does not match.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Looks up the user a session points at. `None` when the record is gone.
    async fn current_user(&self, id: i32) -> Result<Option<User>, AuthError>;

    /// The administrator whose list is shown, if one has been created.
    async fn owner(&self) -> Result<Option<User>, AuthError>;

    /// Changes the display name of a user and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] if the id is unknown.
    async fn rename(&self, id: i32, name: &str) -> Result<User, AuthError>;
}
