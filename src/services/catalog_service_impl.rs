//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, IntoActiveModel};
use tracing::info;

use crate::db::{LabelRepository, LabelTable, Store, UniqueViolation};
use crate::domain::{LabelKind, OwnerId};
use crate::models::{Ingredient, Tag};
use crate::services::catalog_service::{CatalogError, CatalogService};

const MAX_NAME_LENGTH: usize = 255;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn clean_name(kind: LabelKind, name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::Validation(format!("{kind} name cannot be empty")));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::Validation(format!(
            "{kind} name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// The name lookup before a write is only a fast path; a concurrent writer
/// can still win, in which case the UNIQUE index reports the clash.
fn write_error(kind: LabelKind, err: anyhow::Error) -> CatalogError {
    if err.is::<UniqueViolation>() {
        CatalogError::Duplicate(kind)
    } else {
        CatalogError::from(err)
    }
}

async fn create_label<E>(
    repo: &LabelRepository<E>,
    owner: OwnerId,
    name: &str,
) -> Result<E::Label, CatalogError>
where
    E: LabelTable,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    let name = clean_name(E::KIND, name)?;

    if repo.find_by_name(owner, &name).await?.is_some() {
        return Err(CatalogError::Duplicate(E::KIND));
    }

    repo.create(owner, &name)
        .await
        .map_err(|e| write_error(E::KIND, e))
}

async fn rename_label<E>(
    repo: &LabelRepository<E>,
    owner: OwnerId,
    id: i32,
    name: &str,
) -> Result<E::Label, CatalogError>
where
    E: LabelTable,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    let name = clean_name(E::KIND, name)?;

    if let Some(existing) = repo.find_by_name(owner, &name).await?
        && E::label_id(&existing) != id
    {
        return Err(CatalogError::Duplicate(E::KIND));
    }

    repo.rename(owner, id, &name)
        .await
        .map_err(|e| write_error(E::KIND, e))?
        .ok_or(CatalogError::NotFound(E::KIND))
}

async fn delete_label<E>(
    repo: &LabelRepository<E>,
    owner: OwnerId,
    id: i32,
) -> Result<(), CatalogError>
where
    E: LabelTable,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    if !repo.delete(owner, id).await? {
        return Err(CatalogError::NotFound(E::KIND));
    }
    info!(user_id = %owner, kind = %E::KIND, id, "Label deleted");
    Ok(())
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_tags(
        &self,
        owner: OwnerId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, CatalogError> {
        Ok(self.store.tags().list(owner, assigned_only).await?)
    }

    async fn create_tag(&self, owner: OwnerId, name: &str) -> Result<Tag, CatalogError> {
        let tag = create_label(&self.store.tags(), owner, name).await?;
        info!(user_id = %owner, tag_id = tag.id, "Tag created");
        Ok(tag)
    }

    async fn rename_tag(&self, owner: OwnerId, id: i32, name: &str) -> Result<Tag, CatalogError> {
        rename_label(&self.store.tags(), owner, id, name).await
    }

    async fn delete_tag(&self, owner: OwnerId, id: i32) -> Result<(), CatalogError> {
        delete_label(&self.store.tags(), owner, id).await
    }

    async fn list_ingredients(
        &self,
        owner: OwnerId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, CatalogError> {
        Ok(self.store.ingredients().list(owner, assigned_only).await?)
    }

    async fn create_ingredient(
        &self,
        owner: OwnerId,
        name: &str,
    ) -> Result<Ingredient, CatalogError> {
        let ingredient = create_label(&self.store.ingredients(), owner, name).await?;
        info!(user_id = %owner, ingredient_id = ingredient.id, "Ingredient created");
        Ok(ingredient)
    }

    async fn rename_ingredient(
        &self,
        owner: OwnerId,
        id: i32,
        name: &str,
    ) -> Result<Ingredient, CatalogError> {
        rename_label(&self.store.ingredients(), owner, id, name).await
    }

    async fn delete_ingredient(&self, owner: OwnerId, id: i32) -> Result<(), CatalogError> {
        delete_label(&self.store.ingredients(), owner, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_trims() {
        assert_eq!(clean_name(LabelKind::Tag, "  Vegan ").unwrap(), "Vegan");
    }

    #[test]
    fn test_clean_name_rejects_empty() {
        assert!(matches!(
            clean_name(LabelKind::Ingredient, ""),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            clean_name(LabelKind::Tag, "   "),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_unique_violation_is_a_duplicate() {
        let err = write_error(LabelKind::Tag, anyhow::Error::new(UniqueViolation));
        assert!(matches!(err, CatalogError::Duplicate(LabelKind::Tag)));

        let err = write_error(LabelKind::Ingredient, anyhow::anyhow!("disk full"));
        assert!(matches!(err, CatalogError::Internal(_)));
    }

    #[test]
    fn test_clean_name_rejects_too_long() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(clean_name(LabelKind::Tag, &name).is_err());
    }
}
