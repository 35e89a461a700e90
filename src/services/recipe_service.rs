//! Domain service for recipes.

use thiserror::Error;

use crate::domain::OwnerId;
use crate::models::{Recipe, RecipeDetail, RecipeDraft, RecipeFilter, RecipePatch};

/// Errors specific to recipe operations.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Recipe not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RecipeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for recipes. All operations are scoped to `owner`.
#[async_trait::async_trait]
pub trait RecipeService: Send + Sync {
    /// Lists the owner's recipes, newest first.
    async fn list(&self, owner: OwnerId, filter: &RecipeFilter)
    -> Result<Vec<Recipe>, RecipeError>;

    /// Gets one recipe with its tags and ingredients expanded.
    async fn get(&self, owner: OwnerId, id: i32) -> Result<RecipeDetail, RecipeError>;

    /// Creates a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Validation`] for an empty title, a negative
    /// time or price, a price with more than two decimal places, or a tag or
    /// ingredient id that does not exist.
    async fn create(&self, owner: OwnerId, draft: RecipeDraft)
    -> Result<RecipeDetail, RecipeError>;

    /// Replaces every field of a recipe, links included.
    async fn replace(
        &self,
        owner: OwnerId,
        id: i32,
        draft: RecipeDraft,
    ) -> Result<RecipeDetail, RecipeError>;

    /// Updates only the fields present in `patch`.
    async fn patch(
        &self,
        owner: OwnerId,
        id: i32,
        patch: RecipePatch,
    ) -> Result<RecipeDetail, RecipeError>;

    /// Deletes a recipe together with its stored image.
    async fn delete(&self, owner: OwnerId, id: i32) -> Result<(), RecipeError>;

    /// Stores an uploaded image and points the recipe at it. Any previous
    /// image file is removed.
    async fn upload_image(
        &self,
        owner: OwnerId,
        id: i32,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Recipe, RecipeError>;
}
