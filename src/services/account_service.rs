//! Domain service for accounts and token authentication.
//!
//! Handles registration, superuser provisioning, profile updates and the
//! exchange of credentials for an API token.

use thiserror::Error;

use crate::domain::OwnerId;
use crate::models::{Account, AccountExtra, ProfilePatch};

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates a regular account.
    ///
    /// The domain part of `email` is lowercased before it is stored and the
    /// password is hashed; the plaintext is never kept.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] if the email is missing or empty,
    /// or if an account with the same normalized email already exists.
    async fn create_user(
        &self,
        email: Option<&str>,
        password: &str,
        extra: AccountExtra,
    ) -> Result<Account, AccountError>;

    /// Creates an account with `is_staff` and `is_superuser` set.
    async fn create_superuser(&self, email: &str, password: &str)
    -> Result<Account, AccountError>;

    /// Checks `candidate` against the account's password off the async runtime.
    async fn check_password(&self, account: &Account, candidate: &str) -> bool;

    async fn get_account(&self, id: i32) -> Result<Account, AccountError>;

    /// Applies a partial profile update to the owner's own account.
    async fn update_profile(
        &self,
        owner: OwnerId,
        patch: ProfilePatch,
    ) -> Result<Account, AccountError>;

    /// Exchanges credentials for the account's token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] when a field is empty and
    /// [`AccountError::InvalidCredentials`] for an unknown email, an inactive
    /// account or a wrong password alike.
    async fn obtain_token(&self, email: &str, password: &str) -> Result<String, AccountError>;

    /// Resolves a presented token to an active account.
    async fn authenticate_token(&self, key: &str) -> Result<Option<Account>, AccountError>;
}
