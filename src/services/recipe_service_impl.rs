//! `SeaORM` implementation of the `RecipeService` trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::db::Store;
use crate::domain::OwnerId;
use crate::models::recipe::{IMAGE_EXTENSIONS, is_image_filename, new_recipe_image_path};
use crate::models::{Recipe, RecipeDetail, RecipeDraft, RecipeFilter, RecipePatch};
use crate::services::image::ImageService;
use crate::services::recipe_service::{RecipeError, RecipeService};

const MAX_TITLE_LENGTH: usize = 255;
const MAX_LINK_LENGTH: usize = 255;

/// Largest value a `DECIMAL(10, 2)` column holds.
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

pub struct SeaOrmRecipeService {
    store: Store,
    images: ImageService,
}

impl SeaOrmRecipeService {
    #[must_use]
    pub const fn new(store: Store, images: ImageService) -> Self {
        Self { store, images }
    }

    async fn detail(&self, recipe: Recipe) -> Result<RecipeDetail, RecipeError> {
        let tags = self.store.tags().get_many(&recipe.tag_ids).await?;
        let ingredients = self.store.ingredients().get_many(&recipe.ingredient_ids).await?;
        Ok(RecipeDetail {
            recipe,
            tags,
            ingredients,
        })
    }

    async fn check_links(
        &self,
        tag_ids: Option<&[i32]>,
        ingredient_ids: Option<&[i32]>,
    ) -> Result<(), RecipeError> {
        if let Some(ids) = tag_ids {
            let found = self.store.tags().existing_ids(ids).await?;
            ensure_all_exist("tags", ids, &found)?;
        }
        if let Some(ids) = ingredient_ids {
            let found = self.store.ingredients().existing_ids(ids).await?;
            ensure_all_exist("ingredients", ids, &found)?;
        }
        Ok(())
    }
}

fn ensure_all_exist(field: &str, requested: &[i32], found: &[i32]) -> Result<(), RecipeError> {
    match requested.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(RecipeError::Validation(format!(
            "{field}: invalid pk \"{missing}\" - object does not exist"
        ))),
        None => Ok(()),
    }
}

fn clean_title(title: &str) -> Result<String, RecipeError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RecipeError::Validation("Title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(RecipeError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_time(time_minutes: i32) -> Result<i32, RecipeError> {
    if time_minutes < 0 {
        return Err(RecipeError::Validation(
            "time_minutes cannot be negative".to_string(),
        ));
    }
    Ok(time_minutes)
}

/// Validates a price and brings it to exactly two decimal places.
fn clean_price(price: Decimal) -> Result<Decimal, RecipeError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(RecipeError::Validation("Price cannot be negative".to_string()));
    }
    if price.normalize().scale() > 2 {
        return Err(RecipeError::Validation(
            "Price must have at most 2 decimal places".to_string(),
        ));
    }
    if price > MAX_PRICE {
        return Err(RecipeError::Validation(format!("Price must be at most {MAX_PRICE}")));
    }
    let mut price = price.abs();
    price.rescale(2);
    Ok(price)
}

fn clean_link(link: &str) -> Result<String, RecipeError> {
    let link = link.trim();
    if link.chars().count() > MAX_LINK_LENGTH {
        return Err(RecipeError::Validation(format!(
            "Link must be at most {MAX_LINK_LENGTH} characters"
        )));
    }
    Ok(link.to_string())
}

fn clean_draft(draft: RecipeDraft) -> Result<RecipeDraft, RecipeError> {
    Ok(RecipeDraft {
        title: clean_title(&draft.title)?,
        time_minutes: check_time(draft.time_minutes)?,
        price: clean_price(draft.price)?,
        link: clean_link(&draft.link)?,
        tag_ids: draft.tag_ids,
        ingredient_ids: draft.ingredient_ids,
    })
}

fn clean_patch(patch: RecipePatch) -> Result<RecipePatch, RecipeError> {
    Ok(RecipePatch {
        title: patch.title.as_deref().map(clean_title).transpose()?,
        time_minutes: patch.time_minutes.map(check_time).transpose()?,
        price: patch.price.map(clean_price).transpose()?,
        link: patch.link.as_deref().map(clean_link).transpose()?,
        tag_ids: patch.tag_ids,
        ingredient_ids: patch.ingredient_ids,
    })
}

impl From<RecipeDraft> for RecipePatch {
    fn from(draft: RecipeDraft) -> Self {
        Self {
            title: Some(draft.title),
            time_minutes: Some(draft.time_minutes),
            price: Some(draft.price),
            link: Some(draft.link),
            tag_ids: Some(draft.tag_ids),
            ingredient_ids: Some(draft.ingredient_ids),
        }
    }
}

#[async_trait]
impl RecipeService for SeaOrmRecipeService {
    async fn list(
        &self,
        owner: OwnerId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeError> {
        Ok(self.store.list_recipes(owner, filter).await?)
    }

    async fn get(&self, owner: OwnerId, id: i32) -> Result<RecipeDetail, RecipeError> {
        let recipe = self
            .store
            .get_recipe(owner, id)
            .await?
            .ok_or(RecipeError::NotFound)?;
        self.detail(recipe).await
    }

    async fn create(
        &self,
        owner: OwnerId,
        draft: RecipeDraft,
    ) -> Result<RecipeDetail, RecipeError> {
        let draft = clean_draft(draft)?;
        self.check_links(Some(&draft.tag_ids), Some(&draft.ingredient_ids))
            .await?;

        let recipe = self.store.create_recipe(owner, &draft).await?;
        info!(user_id = %owner, recipe_id = recipe.id, "Recipe created");
        self.detail(recipe).await
    }

    async fn replace(
        &self,
        owner: OwnerId,
        id: i32,
        draft: RecipeDraft,
    ) -> Result<RecipeDetail, RecipeError> {
        let draft = clean_draft(draft)?;
        self.patch(owner, id, RecipePatch::from(draft)).await
    }

    async fn patch(
        &self,
        owner: OwnerId,
        id: i32,
        patch: RecipePatch,
    ) -> Result<RecipeDetail, RecipeError> {
        let patch = clean_patch(patch)?;
        self.check_links(patch.tag_ids.as_deref(), patch.ingredient_ids.as_deref())
            .await?;

        let recipe = self
            .store
            .update_recipe(owner, id, &patch)
            .await?
            .ok_or(RecipeError::NotFound)?;

        info!(user_id = %owner, recipe_id = recipe.id, "Recipe updated");
        self.detail(recipe).await
    }

    async fn delete(&self, owner: OwnerId, id: i32) -> Result<(), RecipeError> {
        let image = self
            .store
            .delete_recipe(owner, id)
            .await?
            .ok_or(RecipeError::NotFound)?;

        if let Some(path) = image {
            self.images.remove(&path).await;
        }

        info!(user_id = %owner, recipe_id = id, "Recipe deleted");
        Ok(())
    }

    async fn upload_image(
        &self,
        owner: OwnerId,
        id: i32,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Recipe, RecipeError> {
        if bytes.is_empty() {
            return Err(RecipeError::Validation(
                "The submitted file is empty".to_string(),
            ));
        }
        if !is_image_filename(filename) {
            return Err(RecipeError::Validation(format!(
                "Upload a valid image. Allowed extensions are: {}",
                IMAGE_EXTENSIONS.join(", ")
            )));
        }

        if self.store.get_recipe(owner, id).await?.is_none() {
            return Err(RecipeError::NotFound);
        }

        let path = new_recipe_image_path(filename);
        self.images.save(&path, bytes).await?;

        let Some((recipe, previous)) = self.store.set_recipe_image(owner, id, &path).await? else {
            self.images.remove(&path).await;
            return Err(RecipeError::NotFound);
        };

        if let Some(previous) = previous
            && previous != path
        {
            self.images.remove(&previous).await;
        }

        info!(user_id = %owner, recipe_id = id, image = %path, "Recipe image uploaded");
        Ok(recipe)
    }
}
