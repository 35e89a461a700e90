pub mod account;
pub mod catalog;
pub mod recipe;

pub use account::{Account, AccountExtra, ProfilePatch};
pub use catalog::{Ingredient, Tag};
pub use recipe::{Recipe, RecipeDetail, RecipeDraft, RecipeFilter, RecipePatch};
