use axum::{
    Json,
    extract::{FromRequest, Request},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::ApiError;
use crate::models::{Account, Ingredient, Recipe, RecipeDetail, Tag};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `Json` whose rejections (bad syntax, wrong types, wrong content type) turn
/// into a 400 with the usual error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::validation(rejection.body_text())),
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub email: String,
    pub name: String,
}

impl From<Account> for UserDto {
    fn from(account: Account) -> Self {
        Self {
            email: account.email,
            name: account.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// ============================================================================
// Tags & ingredients
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LabelRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelListQuery {
    pub assigned_only: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDto {
    pub id: i32,
    pub name: String,
}

impl From<Tag> for LabelDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

impl From<Ingredient> for LabelDto {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// Body of recipe create, replace and patch requests. Which fields are
/// required depends on the method.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

/// Prices always carry two decimals on the wire, e.g. `"5.00"`.
fn price_string(price: Decimal) -> String {
    let mut price = price;
    price.rescale(2);
    price.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeDto {
    pub id: i32,
    pub title: String,
    pub ingredients: Vec<i32>,
    pub tags: Vec<i32>,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub image: Option<String>,
}

impl From<Recipe> for RecipeDto {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            ingredients: recipe.ingredient_ids,
            tags: recipe.tag_ids,
            time_minutes: recipe.time_minutes,
            price: price_string(recipe.price),
            link: recipe.link,
            image: recipe.image.map(|path| format!("/media/{path}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeDetailDto {
    pub id: i32,
    pub title: String,
    pub ingredients: Vec<LabelDto>,
    pub tags: Vec<LabelDto>,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub image: Option<String>,
}

impl From<RecipeDetail> for RecipeDetailDto {
    fn from(detail: RecipeDetail) -> Self {
        let RecipeDetail {
            recipe,
            tags,
            ingredients,
        } = detail;

        Self {
            id: recipe.id,
            title: recipe.title,
            ingredients: ingredients.into_iter().map(LabelDto::from).collect(),
            tags: tags.into_iter().map(LabelDto::from).collect(),
            time_minutes: recipe.time_minutes,
            price: price_string(recipe.price),
            link: recipe.link,
            image: recipe.image.map(|path| format!("/media/{path}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeImageDto {
    pub id: i32,
    pub image: Option<String>,
}

impl From<Recipe> for RecipeImageDto {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            image: recipe.image.map(|path| format!("/media/{path}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_string_has_two_decimals() {
        assert_eq!(price_string(Decimal::new(5, 0)), "5.00");
        assert_eq!(price_string(Decimal::new(55, 1)), "5.50");
        assert_eq!(price_string(Decimal::new(1234, 2)), "12.34");
    }

    #[test]
    fn test_recipe_request_accepts_string_and_number_prices() {
        let from_number: RecipeRequest =
            serde_json::from_str(r#"{"title":"Soup","price":5.5}"#).unwrap();
        assert_eq!(from_number.price, Some(Decimal::new(55, 1)));

        let from_string: RecipeRequest = serde_json::from_str(r#"{"price":"5.00"}"#).unwrap();
        assert_eq!(from_string.price, Some(Decimal::new(500, 2)));
        assert!(from_string.title.is_none());
    }
}
