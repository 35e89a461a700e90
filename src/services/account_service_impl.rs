//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::repositories::account::hash_password;
use crate::db::{AccountChanges, NewAccountRow, Store, UniqueViolation};
use crate::domain::{OwnerId, normalize_email};
use crate::models::{Account, AccountExtra, ProfilePatch};
use crate::services::account_service::{AccountError, AccountService};

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn hash(&self, password: &str) -> Result<String, AccountError> {
        let password = password.to_string();
        let security = self.security.clone();

        tokio::task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| AccountError::Internal(format!("Hashing task failed: {e}")))?
            .map_err(AccountError::from)
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), AccountError> {
        if self.store.get_account_by_email(email).await?.is_some() {
            return Err(email_taken());
        }
        Ok(())
    }
}

fn email_taken() -> AccountError {
    AccountError::Validation("user with this email already exists".to_string())
}

/// A concurrent writer can claim the email between the lookup and the write;
/// the UNIQUE index then reports the clash.
fn account_write_error(err: anyhow::Error) -> AccountError {
    if err.is::<UniqueViolation>() {
        email_taken()
    } else {
        AccountError::from(err)
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn create_user(
        &self,
        email: Option<&str>,
        password: &str,
        extra: AccountExtra,
    ) -> Result<Account, AccountError> {
        let email = match email.map(str::trim) {
            Some(e) if !e.is_empty() => normalize_email(e),
            _ => {
                return Err(AccountError::Validation(
                    "Users must have an email address".to_string(),
                ));
            }
        };

        self.ensure_email_free(&email).await?;

        let password_hash = self.hash(password).await?;
        let account = self
            .store
            .create_account(NewAccountRow {
                email,
                name: extra.name.unwrap_or_default(),
                password_hash,
                is_staff: extra.is_staff,
                is_superuser: extra.is_superuser,
            })
            .await
            .map_err(account_write_error)?;

        info!(user_id = account.id, superuser = account.is_superuser, "Account created");
        Ok(account)
    }

    async fn create_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        self.create_user(
            Some(email),
            password,
            AccountExtra {
                name: None,
                is_staff: true,
                is_superuser: true,
            },
        )
        .await
    }

    async fn check_password(&self, account: &Account, candidate: &str) -> bool {
        let account = account.clone();
        let candidate = candidate.to_string();

        tokio::task::spawn_blocking(move || account.check_password(&candidate))
            .await
            .unwrap_or(false)
    }

    async fn get_account(&self, id: i32) -> Result<Account, AccountError> {
        self.store
            .get_account(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    async fn update_profile(
        &self,
        owner: OwnerId,
        patch: ProfilePatch,
    ) -> Result<Account, AccountError> {
        let current = self.get_account(owner.value()).await?;

        let email = match patch.email.as_deref().map(str::trim) {
            Some("") => {
                return Err(AccountError::Validation("Email cannot be empty".to_string()));
            }
            Some(e) => {
                let email = normalize_email(e);
                if email != current.email {
                    self.ensure_email_free(&email).await?;
                }
                Some(email)
            }
            None => None,
        };

        let password_hash = match patch.password.as_deref() {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };

        let account = self
            .store
            .update_account(
                current.id,
                AccountChanges {
                    email,
                    name: patch.name,
                    password_hash,
                },
            )
            .await
            .map_err(account_write_error)?;

        info!(user_id = account.id, "Profile updated");
        Ok(account)
    }

    async fn obtain_token(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "Must include \"email\" and \"password\".".to_string(),
            ));
        }

        let Some(account) = self
            .store
            .get_account_by_email(&normalize_email(email))
            .await?
        else {
            return Err(AccountError::InvalidCredentials);
        };

        if !account.is_active || !self.check_password(&account, password).await {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(self.store.get_or_create_token(account.id).await?)
    }

    async fn authenticate_token(&self, key: &str) -> Result<Option<Account>, AccountError> {
        let account = self.store.get_account_by_token(key).await?;
        Ok(account.filter(|a| a.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_validation() {
        let err = account_write_error(anyhow::Error::new(UniqueViolation));
        assert!(matches!(
            err,
            AccountError::Validation(msg) if msg == "user with this email already exists"
        ));

        let err = account_write_error(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, AccountError::Internal(_)));
    }
}
