use serde::Serialize;
use std::fmt;

use crate::domain::OwnerId;
use crate::entities::{ingredients, tags};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i32,
    #[serde(skip)]
    pub owner: OwnerId,
    pub name: String,
}

impl From<tags::Model> for Tag {
    fn from(model: tags::Model) -> Self {
        Self {
            id: model.id,
            owner: OwnerId::new(model.user_id),
            name: model.name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: i32,
    #[serde(skip)]
    pub owner: OwnerId,
    pub name: String,
}

impl From<ingredients::Model> for Ingredient {
    fn from(model: ingredients::Model) -> Self {
        Self {
            id: model.id,
            owner: OwnerId::new(model.user_id),
            name: model.name,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_str() {
        let tag = Tag {
            id: 1,
            owner: OwnerId::new(1),
            name: "Vegan".to_string(),
        };
        assert_eq!(tag.to_string(), "Vegan");
    }

    #[test]
    fn test_ingredient_str() {
        let ingredient = Ingredient {
            id: 1,
            owner: OwnerId::new(1),
            name: "Cucumber".to_string(),
        };
        assert_eq!(ingredient.to_string(), "Cucumber");
    }
}
