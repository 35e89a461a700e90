use rust_decimal::Decimal;
use std::fmt;
use std::path::Path;

use super::{Ingredient, Tag};
use crate::domain::OwnerId;
use crate::entities::recipes;

/// Directory (relative to the media root) that recipe images are stored in.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// File extensions accepted for recipe images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: i32,
    pub owner: OwnerId,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}

impl Recipe {
    /// Builds a recipe from its row plus the ids of its linked tags and
    /// ingredients.
    #[must_use]
    pub fn from_model(model: recipes::Model, tag_ids: Vec<i32>, ingredient_ids: Vec<i32>) -> Self {
        Self {
            id: model.id,
            owner: OwnerId::new(model.user_id),
            title: model.title,
            time_minutes: model.time_minutes,
            price: model.price,
            link: model.link,
            image: model.image,
            tag_ids,
            ingredient_ids,
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A recipe with its tags and ingredients expanded.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

/// Every field a recipe needs on creation or full replacement.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}

/// Partial recipe update; `None` leaves the field untouched and a `Some`
/// link list replaces the existing links.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredient_ids: Option<Vec<i32>>,
}

/// List filter: a recipe matches when it is linked to any of the given tags
/// and any of the given ingredients. Empty lists do not filter.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}

/// Builds the storage path of a recipe image from an upload id and the
/// client's original file name. Only the extension of the original name is
/// kept.
///
/// ```rust
/// use recipe_api::models::recipe::recipe_image_file_path;
///
/// assert_eq!(
///     recipe_image_file_path("test-uuid", "myimage.jpg"),
///     "uploads/recipe/test-uuid.jpg"
/// );
/// ```
#[must_use]
pub fn recipe_image_file_path(upload_id: &str, filename: &str) -> String {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{RECIPE_IMAGE_DIR}/{upload_id}.{ext}"),
        _ => format!("{RECIPE_IMAGE_DIR}/{upload_id}"),
    }
}

/// Whether `filename` may be stored as a recipe image. Names without an
/// extension are accepted and stored without one.
#[must_use]
pub fn is_image_filename(filename: &str) -> bool {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        _ => true,
    }
}

/// Same as [`recipe_image_file_path`] with a fresh v4 UUID as upload id.
#[must_use]
pub fn new_recipe_image_path(filename: &str) -> String {
    recipe_image_file_path(&uuid::Uuid::new_v4().to_string(), filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> recipes::Model {
        recipes::Model {
            id: 1,
            user_id: 2,
            title: "Steak and mushroom sauce".to_string(),
            time_minutes: 5,
            price: Decimal::new(500, 2),
            link: String::new(),
            image: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_recipe_str() {
        let recipe = Recipe::from_model(sample_model(), vec![], vec![]);
        assert_eq!(recipe.to_string(), "Steak and mushroom sauce");
        assert_eq!(recipe.owner, OwnerId::new(2));
    }

    #[test]
    fn test_recipe_image_file_path() {
        assert_eq!(
            recipe_image_file_path("test-uuid", "myimage.jpg"),
            "uploads/recipe/test-uuid.jpg"
        );
        assert_eq!(
            recipe_image_file_path("abc", "holiday.photo.PNG"),
            "uploads/recipe/abc.PNG"
        );
    }

    #[test]
    fn test_recipe_image_file_path_without_extension() {
        assert_eq!(recipe_image_file_path("abc", "noext"), "uploads/recipe/abc");
    }

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("myimage.jpg"));
        assert!(is_image_filename("holiday.photo.PNG"));
        assert!(is_image_filename("noext"));
        assert!(!is_image_filename("page.html"));
        assert!(!is_image_filename("script.svg"));
        assert!(!is_image_filename("image.jpg.exe"));
    }

    #[test]
    fn test_new_recipe_image_path_is_unique() {
        let first = new_recipe_image_path("a.jpg");
        let second = new_recipe_image_path("a.jpg");
        assert_ne!(first, second);
        assert!(first.starts_with("uploads/recipe/"));
        assert!(first.ends_with(".jpg"));
    }
}
