use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::Query,
};

use crate::domain::OwnerId;
use crate::entities::{prelude::*, recipe_ingredients, recipe_tags, recipes};
use crate::models::{Recipe, RecipeDraft, RecipeFilter, RecipePatch};

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Owner's recipes, newest first, narrowed by `filter`.
    pub async fn list(&self, owner: OwnerId, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let mut query = Recipes::find().filter(recipes::Column::UserId.eq(owner.value()));

        if !filter.tag_ids.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_tags::Column::RecipeId)
                        .from(RecipeTags)
                        .and_where(recipe_tags::Column::TagId.is_in(filter.tag_ids.clone()))
                        .to_owned(),
                ),
            );
        }

        if !filter.ingredient_ids.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_ingredients::Column::RecipeId)
                        .from(RecipeIngredients)
                        .and_where(
                            recipe_ingredients::Column::IngredientId
                                .is_in(filter.ingredient_ids.clone()),
                        )
                        .to_owned(),
                ),
            );
        }

        let rows = query
            .order_by_desc(recipes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list recipes")?;

        with_links(&self.conn, rows).await
    }

    pub async fn get(&self, owner: OwnerId, id: i32) -> Result<Option<Recipe>> {
        let row = Recipes::find_by_id(id)
            .filter(recipes::Column::UserId.eq(owner.value()))
            .one(&self.conn)
            .await
            .context("Failed to query recipe")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(with_links(&self.conn, vec![row]).await?.pop())
    }

    pub async fn create(&self, owner: OwnerId, draft: &RecipeDraft) -> Result<Recipe> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let row = recipes::ActiveModel {
            user_id: Set(owner.value()),
            title: Set(draft.title.clone()),
            time_minutes: Set(draft.time_minutes),
            price: Set(draft.price),
            link: Set(draft.link.clone()),
            image: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert recipe")?;

        replace_tag_links(&txn, row.id, &draft.tag_ids).await?;
        replace_ingredient_links(&txn, row.id, &draft.ingredient_ids).await?;

        txn.commit().await?;

        Ok(Recipe::from_model(
            row,
            sorted_unique(&draft.tag_ids),
            sorted_unique(&draft.ingredient_ids),
        ))
    }

    /// Applies `patch` to the owner's recipe; `None` when it is not theirs.
    pub async fn update(
        &self,
        owner: OwnerId,
        id: i32,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>> {
        let txn = self.conn.begin().await?;

        let Some(row) = Recipes::find_by_id(id)
            .filter(recipes::Column::UserId.eq(owner.value()))
            .one(&txn)
            .await
            .context("Failed to query recipe for update")?
        else {
            return Ok(None);
        };

        let mut active: recipes::ActiveModel = row.into();
        if let Some(title) = &patch.title {
            active.title = Set(title.clone());
        }
        if let Some(time_minutes) = patch.time_minutes {
            active.time_minutes = Set(time_minutes);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(link) = &patch.link {
            active.link = Set(link.clone());
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let row = active.update(&txn).await?;

        if let Some(tag_ids) = &patch.tag_ids {
            replace_tag_links(&txn, row.id, tag_ids).await?;
        }
        if let Some(ingredient_ids) = &patch.ingredient_ids {
            replace_ingredient_links(&txn, row.id, ingredient_ids).await?;
        }

        let recipe = with_links(&txn, vec![row]).await?.pop();
        txn.commit().await?;

        Ok(recipe)
    }

    /// Stores a new image path and returns the previous one, or `None` when
    /// the recipe is not the owner's.
    pub async fn set_image(
        &self,
        owner: OwnerId,
        id: i32,
        path: &str,
    ) -> Result<Option<(Recipe, Option<String>)>> {
        let Some(row) = Recipes::find_by_id(id)
            .filter(recipes::Column::UserId.eq(owner.value()))
            .one(&self.conn)
            .await
            .context("Failed to query recipe for image upload")?
        else {
            return Ok(None);
        };

        let previous = row.image.clone();
        let mut active: recipes::ActiveModel = row.into();
        active.image = Set(Some(path.to_string()));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let row = active.update(&self.conn).await?;

        let recipe = with_links(&self.conn, vec![row]).await?.pop();
        Ok(recipe.map(|r| (r, previous)))
    }

    /// Deletes the owner's recipe and its links, returning the deleted row.
    pub async fn delete(&self, owner: OwnerId, id: i32) -> Result<Option<recipes::Model>> {
        let txn = self.conn.begin().await?;

        let Some(row) = Recipes::find_by_id(id)
            .filter(recipes::Column::UserId.eq(owner.value()))
            .one(&txn)
            .await
            .context("Failed to query recipe for delete")?
        else {
            return Ok(None);
        };

        RecipeTags::delete_many()
            .filter(recipe_tags::Column::RecipeId.eq(row.id))
            .exec(&txn)
            .await?;
        RecipeIngredients::delete_many()
            .filter(recipe_ingredients::Column::RecipeId.eq(row.id))
            .exec(&txn)
            .await?;
        Recipes::delete_by_id(row.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(row))
    }
}

async fn with_links<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<recipes::Model>,
) -> Result<Vec<Recipe>> {
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

    let mut tag_links: HashMap<i32, Vec<i32>> = HashMap::new();
    let mut ingredient_links: HashMap<i32, Vec<i32>> = HashMap::new();

    if !ids.is_empty() {
        let tags = RecipeTags::find()
            .filter(recipe_tags::Column::RecipeId.is_in(ids.clone()))
            .order_by_asc(recipe_tags::Column::TagId)
            .all(conn)
            .await
            .context("Failed to load recipe tags")?;
        for link in tags {
            tag_links.entry(link.recipe_id).or_default().push(link.tag_id);
        }

        let ingredients = RecipeIngredients::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(ids))
            .order_by_asc(recipe_ingredients::Column::IngredientId)
            .all(conn)
            .await
            .context("Failed to load recipe ingredients")?;
        for link in ingredients {
            ingredient_links
                .entry(link.recipe_id)
                .or_default()
                .push(link.ingredient_id);
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let tag_ids = tag_links.remove(&row.id).unwrap_or_default();
            let ingredient_ids = ingredient_links.remove(&row.id).unwrap_or_default();
            Recipe::from_model(row, tag_ids, ingredient_ids)
        })
        .collect())
}

async fn replace_tag_links<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    tag_ids: &[i32],
) -> Result<()> {
    RecipeTags::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;

    let links: Vec<recipe_tags::ActiveModel> = sorted_unique(tag_ids)
        .into_iter()
        .map(|tag_id| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag_id),
        })
        .collect();

    if !links.is_empty() {
        RecipeTags::insert_many(links).exec(conn).await?;
    }

    Ok(())
}

async fn replace_ingredient_links<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    ingredient_ids: &[i32],
) -> Result<()> {
    RecipeIngredients::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;

    let links: Vec<recipe_ingredients::ActiveModel> = sorted_unique(ingredient_ids)
        .into_iter()
        .map(|ingredient_id| recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(ingredient_id),
        })
        .collect();

    if !links.is_empty() {
        RecipeIngredients::insert_many(links).exec(conn).await?;
    }

    Ok(())
}

fn sorted_unique(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
