//! Tags and ingredients share one shape: an owner, a name unique per owner,
//! and a join table linking them to recipes. [`LabelRepository`] serves both.

use std::marker::PhantomData;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Query},
};

use super::unique_violation;
use crate::domain::{LabelKind, OwnerId};
use crate::entities::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};
use crate::models::{Ingredient, Tag};

/// A per-owner label table and the join table that links it to recipes.
pub trait LabelTable: EntityTrait {
    type Label: From<Self::Model> + Send;
    type Link: EntityTrait;

    const KIND: LabelKind;

    fn id_column() -> Self::Column;
    fn owner_column() -> Self::Column;
    fn name_column() -> Self::Column;

    /// Column of the join table holding this label's id.
    fn link_label_column() -> <Self::Link as EntityTrait>::Column;
    fn link_recipe_column() -> <Self::Link as EntityTrait>::Column;

    fn new_row(owner: OwnerId, name: &str) -> Self::ActiveModel;
    fn set_name(row: &mut Self::ActiveModel, name: &str);

    fn label_id(label: &Self::Label) -> i32;
}

impl LabelTable for tags::Entity {
    type Label = Tag;
    type Link = recipe_tags::Entity;

    const KIND: LabelKind = LabelKind::Tag;

    fn id_column() -> tags::Column {
        tags::Column::Id
    }

    fn owner_column() -> tags::Column {
        tags::Column::UserId
    }

    fn name_column() -> tags::Column {
        tags::Column::Name
    }

    fn link_label_column() -> recipe_tags::Column {
        recipe_tags::Column::TagId
    }

    fn link_recipe_column() -> recipe_tags::Column {
        recipe_tags::Column::RecipeId
    }

    fn new_row(owner: OwnerId, name: &str) -> tags::ActiveModel {
        tags::ActiveModel {
            user_id: Set(owner.value()),
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    fn set_name(row: &mut tags::ActiveModel, name: &str) {
        row.name = Set(name.to_string());
    }

    fn label_id(label: &Tag) -> i32 {
        label.id
    }
}

impl LabelTable for ingredients::Entity {
    type Label = Ingredient;
    type Link = recipe_ingredients::Entity;

    const KIND: LabelKind = LabelKind::Ingredient;

    fn id_column() -> ingredients::Column {
        ingredients::Column::Id
    }

    fn owner_column() -> ingredients::Column {
        ingredients::Column::UserId
    }

    fn name_column() -> ingredients::Column {
        ingredients::Column::Name
    }

    fn link_label_column() -> recipe_ingredients::Column {
        recipe_ingredients::Column::IngredientId
    }

    fn link_recipe_column() -> recipe_ingredients::Column {
        recipe_ingredients::Column::RecipeId
    }

    fn new_row(owner: OwnerId, name: &str) -> ingredients::ActiveModel {
        ingredients::ActiveModel {
            user_id: Set(owner.value()),
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    fn set_name(row: &mut ingredients::ActiveModel, name: &str) {
        row.name = Set(name.to_string());
    }

    fn label_id(label: &Ingredient) -> i32 {
        label.id
    }
}

pub struct LabelRepository<E> {
    conn: DatabaseConnection,
    table: PhantomData<E>,
}

impl<E> LabelRepository<E> {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            table: PhantomData,
        }
    }
}

impl<E> LabelRepository<E>
where
    E: LabelTable,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    /// Owner's labels, name descending. With `assigned_only` only labels
    /// linked to at least one of the owner's own recipes are returned.
    pub async fn list(&self, owner: OwnerId, assigned_only: bool) -> Result<Vec<E::Label>> {
        let mut query = E::find().filter(E::owner_column().eq(owner.value()));

        if assigned_only {
            let link = E::Link::default();
            query = query.filter(
                E::id_column().in_subquery(
                    Query::select()
                        .column((link, E::link_label_column()))
                        .from(link)
                        .inner_join(
                            recipes::Entity,
                            Expr::col((recipes::Entity, recipes::Column::Id))
                                .equals((link, E::link_recipe_column())),
                        )
                        .and_where(
                            Expr::col((recipes::Entity, recipes::Column::UserId))
                                .eq(owner.value()),
                        )
                        .to_owned(),
                ),
            );
        }

        let rows = query
            .order_by_desc(E::name_column())
            .order_by_desc(E::id_column())
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list {}s", E::KIND))?;

        Ok(rows.into_iter().map(E::Label::from).collect())
    }

    pub async fn find_by_name(&self, owner: OwnerId, name: &str) -> Result<Option<E::Label>> {
        let row = E::find()
            .filter(E::owner_column().eq(owner.value()))
            .filter(E::name_column().eq(name))
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query {} by name", E::KIND))?;

        Ok(row.map(E::Label::from))
    }

    /// Fails with [`super::UniqueViolation`] when the owner already has a
    /// label of that name.
    pub async fn create(&self, owner: OwnerId, name: &str) -> Result<E::Label> {
        let row = E::new_row(owner, name)
            .insert(&self.conn)
            .await
            .map_err(|e| unique_violation(e, "Failed to insert label"))?;

        Ok(E::Label::from(row))
    }

    /// `None` when the label is not the owner's. A name clash fails with
    /// [`super::UniqueViolation`].
    pub async fn rename(&self, owner: OwnerId, id: i32, name: &str) -> Result<Option<E::Label>> {
        let Some(row) = E::find()
            .filter(E::id_column().eq(id))
            .filter(E::owner_column().eq(owner.value()))
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query {} for rename", E::KIND))?
        else {
            return Ok(None);
        };

        let mut active: E::ActiveModel = row.into_active_model();
        E::set_name(&mut active, name);
        let row = active
            .update(&self.conn)
            .await
            .map_err(|e| unique_violation(e, "Failed to rename label"))?;

        Ok(Some(E::Label::from(row)))
    }

    /// Returns false when the label does not exist for this owner.
    pub async fn delete(&self, owner: OwnerId, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let owned = E::find()
            .filter(E::id_column().eq(id))
            .filter(E::owner_column().eq(owner.value()))
            .one(&txn)
            .await
            .with_context(|| format!("Failed to query {} for delete", E::KIND))?;
        if owned.is_none() {
            return Ok(false);
        }

        E::Link::delete_many()
            .filter(E::link_label_column().eq(id))
            .exec(&txn)
            .await?;
        E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&txn)
            .await
            .with_context(|| format!("Failed to delete {}", E::KIND))?;

        txn.commit().await?;
        Ok(true)
    }

    /// Which of `ids` exist at all, regardless of owner.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = E::find()
            .select_only()
            .column(E::id_column())
            .filter(E::id_column().is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to check {} ids", E::KIND))?;

        Ok(found)
    }

    pub async fn get_many(&self, ids: &[i32]) -> Result<Vec<E::Label>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = E::find()
            .filter(E::id_column().is_in(ids.iter().copied()))
            .order_by_asc(E::id_column())
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to load {}s", E::KIND))?;

        Ok(rows.into_iter().map(E::Label::from).collect())
    }
}
