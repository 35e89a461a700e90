//! Domain service for the per-owner tag and ingredient catalogs.

use thiserror::Error;

use crate::domain::{LabelKind, OwnerId};
use crate::models::{Ingredient, Tag};

/// Errors specific to tag and ingredient operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} with this name already exists")]
    Duplicate(LabelKind),

    #[error("{0} not found")]
    NotFound(LabelKind),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for tags and ingredients.
///
/// Every call is scoped to `owner`; rows of other accounts behave as if they
/// did not exist.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists the owner's tags by name, descending. With `assigned_only`, only
    /// tags linked to at least one recipe are returned.
    async fn list_tags(&self, owner: OwnerId, assigned_only: bool)
    -> Result<Vec<Tag>, CatalogError>;

    async fn create_tag(&self, owner: OwnerId, name: &str) -> Result<Tag, CatalogError>;

    async fn rename_tag(&self, owner: OwnerId, id: i32, name: &str) -> Result<Tag, CatalogError>;

    async fn delete_tag(&self, owner: OwnerId, id: i32) -> Result<(), CatalogError>;

    async fn list_ingredients(
        &self,
        owner: OwnerId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, CatalogError>;

    async fn create_ingredient(
        &self,
        owner: OwnerId,
        name: &str,
    ) -> Result<Ingredient, CatalogError>;

    async fn rename_ingredient(
        &self,
        owner: OwnerId,
        id: i32,
        name: &str,
    ) -> Result<Ingredient, CatalogError>;

    async fn delete_ingredient(&self, owner: OwnerId, id: i32) -> Result<(), CatalogError>;
}
