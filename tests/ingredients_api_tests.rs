mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use recipe_api::models::RecipeDraft;
use rust_decimal::Decimal;
use serde_json::json;

const INGREDIENTS_URL: &str = "/api/recipe/ingredients";

fn ingredient_url(id: i32) -> String {
    format!("{INGREDIENTS_URL}/{id}")
}

#[tokio::test]
async fn test_login_required() {
    let app = spawn_app().await;

    let (status, _) = app.send(Method::GET, INGREDIENTS_URL, None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_retrieve_ingredients() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let catalog = &app.state.shared.catalog_service;
    catalog.create_ingredient(user.owner(), "Kale").await.unwrap();
    catalog.create_ingredient(user.owner(), "Salt").await.unwrap();

    let (status, body) = app.get(INGREDIENTS_URL, &token).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Salt", "Kale"]);
}

#[tokio::test]
async fn test_ingredients_limited_to_user() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    let catalog = &app.state.shared.catalog_service;
    catalog.create_ingredient(other.owner(), "Salt").await.unwrap();
    let ingredient = catalog.create_ingredient(user.owner(), "Vinegar").await.unwrap();

    let (status, body) = app.get(INGREDIENTS_URL, &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": ingredient.id, "name": "Vinegar"}]));
}

#[tokio::test]
async fn test_create_ingredient_successful() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let (status, body) = app
        .post(INGREDIENTS_URL, Some(&token), json!({"name": "Cabbage"}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Cabbage");

    let ingredients = app.state.store().ingredients().list(user.owner(), false).await.unwrap();
    assert!(ingredients.iter().any(|i| i.name == "Cabbage"));
}

#[tokio::test]
async fn test_create_ingredient_invalid() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let (status, _) = app.post(INGREDIENTS_URL, Some(&token), json!({"name": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post(INGREDIENTS_URL, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ingredients = app.state.store().ingredients().list(user.owner(), false).await.unwrap();
    assert!(ingredients.is_empty());
}

#[tokio::test]
async fn test_create_duplicate_ingredient_rejected_per_owner_only() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    app.state
        .shared
        .catalog_service
        .create_ingredient(other.owner(), "Turmeric")
        .await
        .unwrap();

    let (status, _) = app.post(INGREDIENTS_URL, Some(&token), json!({"name": "Turmeric"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post(INGREDIENTS_URL, Some(&token), json!({"name": "Turmeric"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_ingredient() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let ingredient = app
        .state
        .shared
        .catalog_service
        .create_ingredient(user.owner(), "Cucumber")
        .await
        .unwrap();

    let (status, body) = app
        .send(
            Method::PATCH,
            &ingredient_url(ingredient.id),
            Some(&token),
            Some(json!({"name": "Lettuce"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": ingredient.id, "name": "Lettuce"}));

    let (status, _) = app
        .send(Method::DELETE, &ingredient_url(ingredient.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let ingredients = app.state.store().ingredients().list(user.owner(), false).await.unwrap();
    assert!(ingredients.is_empty());
}

#[tokio::test]
async fn test_other_users_ingredient_is_not_found() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    let ingredient = app
        .state
        .shared
        .catalog_service
        .create_ingredient(other.owner(), "Saffron")
        .await
        .unwrap();

    let (status, _) = app
        .send(
            Method::PATCH,
            &ingredient_url(ingredient.id),
            Some(&token),
            Some(json!({"name": "Stolen saffron"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::DELETE, &ingredient_url(ingredient.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_retrieve_ingredients_assigned_to_recipes() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let catalog = &app.state.shared.catalog_service;
    let eggs = catalog.create_ingredient(user.owner(), "Eggs").await.unwrap();
    catalog.create_ingredient(user.owner(), "Cheese").await.unwrap();

    let draft = |title: &str| RecipeDraft {
        title: title.to_string(),
        time_minutes: 5,
        price: Decimal::new(1000, 2),
        link: String::new(),
        tag_ids: vec![],
        ingredient_ids: vec![eggs.id],
    };
    let recipes = &app.state.shared.recipe_service;
    recipes.create(user.owner(), draft("Eggs benedict")).await.unwrap();
    recipes.create(user.owner(), draft("Coriander eggs on toast")).await.unwrap();

    let (status, body) = app
        .get(&format!("{INGREDIENTS_URL}?assigned_only=1"), &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": eggs.id, "name": "Eggs"}]));
}

#[tokio::test]
async fn test_assigned_only_ignores_other_users_recipes() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    let ingredient = app
        .state
        .shared
        .catalog_service
        .create_ingredient(user.owner(), "Kale")
        .await
        .unwrap();

    app.state
        .shared
        .recipe_service
        .create(
            other.owner(),
            RecipeDraft {
                title: "Borrowed ingredient".to_string(),
                time_minutes: 5,
                price: Decimal::new(500, 2),
                link: String::new(),
                tag_ids: vec![],
                ingredient_ids: vec![ingredient.id],
            },
        )
        .await
        .unwrap();

    let (status, body) = app
        .get(&format!("{INGREDIENTS_URL}?assigned_only=1"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_concurrent_duplicate_ingredients_rejected() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let ((first, _), (second, _)) = tokio::join!(
        app.post(INGREDIENTS_URL, Some(&token), json!({"name": "Salt"})),
        app.post(INGREDIENTS_URL, Some(&token), json!({"name": "Salt"})),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);

    let ingredients = app
        .state
        .store()
        .ingredients()
        .list(user.owner(), false)
        .await
        .unwrap();
    assert_eq!(ingredients.len(), 1);
}
