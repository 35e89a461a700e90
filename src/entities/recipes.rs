use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub title: String,

    pub time_minutes: i32,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,

    /// Empty string when no link was given.
    pub link: String,

    /// Path relative to the media root, e.g. `uploads/recipe/<uuid>.jpg`
    pub image: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::recipe_tags::Entity")]
    TagLinks,
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    IngredientLinks,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::recipe_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagLinks.def()
    }
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngredientLinks.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::recipe_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recipe_tags::Relation::Recipe.def().rev())
    }
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        super::recipe_ingredients::Relation::Ingredient.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recipe_ingredients::Relation::Recipe.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
