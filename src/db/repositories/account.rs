use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::unique_violation;
use crate::config::SecurityConfig;
use crate::entities::users;
use crate::models::Account;

/// Row values for a new account. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewAccountRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Column changes for an existing account; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get account by (already normalized) email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query account by email")?;

        Ok(user.map(Account::from))
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by ID")?;

        Ok(user.map(Account::from))
    }

    /// Fails with [`super::UniqueViolation`] when the email is taken.
    pub async fn create(&self, row: NewAccountRow) -> Result<Account> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = users::ActiveModel {
            email: Set(row.email),
            name: Set(row.name),
            password_hash: Set(row.password_hash),
            is_active: Set(true),
            is_staff: Set(row.is_staff),
            is_superuser: Set(row.is_superuser),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(|e| unique_violation(e, "Failed to insert account"))?;

        Ok(Account::from(model))
    }

    pub async fn update(&self, id: i32, changes: AccountChanges) -> Result<Account> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account for update")?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .map_err(|e| unique_violation(e, "Failed to update account"))?;
        Ok(Account::from(model))
    }
}

/// Hash a password using Argon2id with the configured params.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify `candidate` against a PHC-format hash. The params are read from the
/// hash itself, so hashes made with older settings keep verifying.
#[must_use]
pub fn verify_password(password_hash: &str, candidate: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed_hash)
        .is_ok()
}
