use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{auth_tokens, users};
use crate::models::Account;

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the account's token, creating one on first use.
    pub async fn get_or_create(&self, user_id: i32) -> Result<String> {
        let existing = auth_tokens::Entity::find()
            .filter(auth_tokens::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query auth token")?;

        if let Some(token) = existing {
            return Ok(token.key);
        }

        let token = auth_tokens::ActiveModel {
            key: Set(generate_token_key()),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert auth token")?;

        Ok(token.key)
    }

    /// Resolve a presented token key to its account
    pub async fn find_account(&self, key: &str) -> Result<Option<Account>> {
        let found = auth_tokens::Entity::find_by_id(key.to_string())
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query account by token")?;

        Ok(found.and_then(|(_, user)| user).map(Account::from))
    }
}

/// Generate a random token key (40 character hex string)
#[must_use]
pub fn generate_token_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 20] = rng.random();

    bytes.iter().fold(String::with_capacity(40), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
