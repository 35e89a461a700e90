use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::OwnerId;
use crate::entities::{ingredients, tags};
use crate::models::{Account, Recipe, RecipeDraft, RecipeFilter, RecipePatch};

pub mod migrator;
pub mod repositories;

pub use repositories::UniqueViolation;
pub use repositories::account::{AccountChanges, NewAccountRow};
pub use repositories::label::{LabelRepository, LabelTable};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !is_memory_url(db_url) {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let opt = connect_options(db_url, max_connections, min_connections);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    // ========== Account Repository Methods ==========

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_email(email).await
    }

    pub async fn get_account(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get_by_id(id).await
    }

    pub async fn create_account(&self, row: NewAccountRow) -> Result<Account> {
        self.account_repo().create(row).await
    }

    pub async fn update_account(&self, id: i32, changes: AccountChanges) -> Result<Account> {
        self.account_repo().update(id, changes).await
    }

    // ========== Token Repository Methods ==========

    pub async fn get_or_create_token(&self, user_id: i32) -> Result<String> {
        self.token_repo().get_or_create(user_id).await
    }

    pub async fn get_account_by_token(&self, key: &str) -> Result<Option<Account>> {
        self.token_repo().find_account(key).await
    }

    // ========== Label Repositories ==========

    #[must_use]
    pub fn tags(&self) -> LabelRepository<tags::Entity> {
        LabelRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn ingredients(&self) -> LabelRepository<ingredients::Entity> {
        LabelRepository::new(self.conn.clone())
    }

    // ========== Recipe Repository Methods ==========

    pub async fn list_recipes(&self, owner: OwnerId, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        self.recipe_repo().list(owner, filter).await
    }

    pub async fn get_recipe(&self, owner: OwnerId, id: i32) -> Result<Option<Recipe>> {
        self.recipe_repo().get(owner, id).await
    }

    pub async fn create_recipe(&self, owner: OwnerId, draft: &RecipeDraft) -> Result<Recipe> {
        self.recipe_repo().create(owner, draft).await
    }

    pub async fn update_recipe(
        &self,
        owner: OwnerId,
        id: i32,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>> {
        self.recipe_repo().update(owner, id, patch).await
    }

    pub async fn set_recipe_image(
        &self,
        owner: OwnerId,
        id: i32,
        path: &str,
    ) -> Result<Option<(Recipe, Option<String>)>> {
        self.recipe_repo().set_image(owner, id, path).await
    }

    /// Returns the deleted recipe's image path (if any) wrapped in `Some`, or
    /// `None` when nothing was deleted.
    pub async fn delete_recipe(&self, owner: OwnerId, id: i32) -> Result<Option<Option<String>>> {
        let deleted = self.recipe_repo().delete(owner, id).await?;
        Ok(deleted.map(|row| row.image))
    }
}

fn connect_options(db_url: &str, max_connections: u32, min_connections: u32) -> ConnectOptions {
    let mut opt = ConnectOptions::new(db_url.to_string());
    opt.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // A `sqlite::memory:` database lives exactly as long as its one
    // connection, so that connection is never recycled.
    if is_memory_url(db_url) {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600));
    }

    opt
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pool_keeps_its_only_connection() {
        let opt = connect_options("sqlite::memory:", 5, 1);
        assert_eq!(opt.get_max_connections(), Some(1));
        assert_eq!(opt.get_min_connections(), Some(1));
        assert_eq!(opt.get_idle_timeout(), None);
        assert_eq!(opt.get_max_lifetime(), None);
    }

    #[test]
    fn test_file_pool_recycles_connections() {
        let opt = connect_options("sqlite:data/recipes.db?mode=rwc", 5, 1);
        assert_eq!(opt.get_max_connections(), Some(5));
        assert_eq!(opt.get_idle_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(opt.get_max_lifetime(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_is_memory_url() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:test?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:recipes.db"));
    }
}
