use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::UserId).integer().not_null())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_user_id")
                            .from(Tags::Table, Tags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tags_user_name")
                    .table(Tags::Table)
                    .col(Tags::UserId)
                    .col(Tags::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ingredients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ingredients::UserId).integer().not_null())
                    .col(ColumnDef::new(Ingredients::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredients_user_id")
                            .from(Ingredients::Table, Ingredients::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ingredients_user_name")
                    .table(Ingredients::Table)
                    .col(Ingredients::UserId)
                    .col(Ingredients::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipes::UserId).integer().not_null())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::TimeMinutes).integer().not_null())
                    .col(ColumnDef::new(Recipes::Price).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Recipes::Link)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Recipes::Image).string().null())
                    .col(ColumnDef::new(Recipes::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Recipes::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user_id")
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_user_id")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeTags::RecipeId).integer().not_null())
                    .col(ColumnDef::new(RecipeTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_recipe_tags")
                            .col(RecipeTags::RecipeId)
                            .col(RecipeTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_tags_recipe_id")
                            .from(RecipeTags::Table, RecipeTags::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_tags_tag_id")
                            .from(RecipeTags::Table, RecipeTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeIngredients::RecipeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredients::IngredientId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_recipe_ingredients")
                            .col(RecipeIngredients::RecipeId)
                            .col(RecipeIngredients::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ingredients_recipe_id")
                            .from(RecipeIngredients::Table, RecipeIngredients::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ingredients_ingredient_id")
                            .from(RecipeIngredients::Table, RecipeIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    TimeMinutes,
    Price,
    Link,
    Image,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RecipeTags {
    Table,
    RecipeId,
    TagId,
}

#[derive(DeriveIden)]
enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
}
