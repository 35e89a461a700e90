mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use recipe_api::models::RecipeDraft;
use rust_decimal::Decimal;
use serde_json::json;

const TAGS_URL: &str = "/api/recipe/tags";

fn tag_url(id: i32) -> String {
    format!("{TAGS_URL}/{id}")
}

#[tokio::test]
async fn test_login_required() {
    let app = spawn_app().await;

    let (status, _) = app.send(Method::GET, TAGS_URL, None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_retrieve_tags() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let catalog = &app.state.shared.catalog_service;
    catalog.create_tag(user.owner(), "Vegan").await.unwrap();
    catalog.create_tag(user.owner(), "Dessert").await.unwrap();

    let (status, body) = app.get(TAGS_URL, &token).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Vegan", "Dessert"]);
}

#[tokio::test]
async fn test_tags_limited_to_user() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    let catalog = &app.state.shared.catalog_service;
    catalog.create_tag(other.owner(), "Fruity").await.unwrap();
    let tag = catalog.create_tag(user.owner(), "Comfort food").await.unwrap();

    let (status, body) = app.get(TAGS_URL, &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": tag.id, "name": "Comfort food"}]));
}

#[tokio::test]
async fn test_create_tag_successful() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let (status, body) = app
        .post(TAGS_URL, Some(&token), json!({"name": "Test tag"}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Test tag");

    let tags = app.state.store().tags().list(user.owner(), false).await.unwrap();
    assert!(tags.iter().any(|t| t.name == "Test tag"));
}

#[tokio::test]
async fn test_create_tag_invalid() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let (status, _) = app.post(TAGS_URL, Some(&token), json!({"name": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post(TAGS_URL, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let tags = app.state.store().tags().list(user.owner(), false).await.unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn test_create_duplicate_tag_rejected_per_owner_only() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    app.state
        .shared
        .catalog_service
        .create_tag(other.owner(), "Vegan")
        .await
        .unwrap();

    let (status, _) = app.post(TAGS_URL, Some(&token), json!({"name": "Vegan"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post(TAGS_URL, Some(&token), json!({"name": "Vegan"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_tag() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let tag = app
        .state
        .shared
        .catalog_service
        .create_tag(user.owner(), "After dinner")
        .await
        .unwrap();

    let (status, body) = app
        .send(
            Method::PATCH,
            &tag_url(tag.id),
            Some(&token),
            Some(json!({"name": "Dessert"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": tag.id, "name": "Dessert"}));

    let (status, _) = app
        .send(Method::DELETE, &tag_url(tag.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let tags = app.state.store().tags().list(user.owner(), false).await.unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn test_other_users_tag_is_not_found() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    let tag = app
        .state
        .shared
        .catalog_service
        .create_tag(other.owner(), "Private")
        .await
        .unwrap();

    let (status, _) = app
        .send(
            Method::PATCH,
            &tag_url(tag.id),
            Some(&token),
            Some(json!({"name": "Mine now"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::DELETE, &tag_url(tag.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_retrieve_tags_assigned_to_recipes() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let catalog = &app.state.shared.catalog_service;
    let breakfast = catalog.create_tag(user.owner(), "Breakfast").await.unwrap();
    catalog.create_tag(user.owner(), "Lunch").await.unwrap();

    let draft = |title: &str| RecipeDraft {
        title: title.to_string(),
        time_minutes: 5,
        price: Decimal::new(1000, 2),
        link: String::new(),
        tag_ids: vec![breakfast.id],
        ingredient_ids: vec![],
    };
    let recipes = &app.state.shared.recipe_service;
    recipes.create(user.owner(), draft("Eggs on toast")).await.unwrap();
    recipes.create(user.owner(), draft("Porridge")).await.unwrap();

    let (status, body) = app
        .get(&format!("{TAGS_URL}?assigned_only=1"), &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": breakfast.id, "name": "Breakfast"}]));
}

#[tokio::test]
async fn test_assigned_only_ignores_other_users_recipes() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let other = app.create_user("other@ntg.ai", "passntgai").await;
    let tag = app
        .state
        .shared
        .catalog_service
        .create_tag(user.owner(), "Vegan")
        .await
        .unwrap();

    app.state
        .shared
        .recipe_service
        .create(
            other.owner(),
            RecipeDraft {
                title: "Borrowed tag".to_string(),
                time_minutes: 5,
                price: Decimal::new(500, 2),
                link: String::new(),
                tag_ids: vec![tag.id],
                ingredient_ids: vec![],
            },
        )
        .await
        .unwrap();

    let (status, body) = app
        .get(&format!("{TAGS_URL}?assigned_only=1"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.get(TAGS_URL, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": tag.id, "name": "Vegan"}]));
}

#[tokio::test]
async fn test_concurrent_duplicate_tags_rejected() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let ((first, _), (second, _)) = tokio::join!(
        app.post(TAGS_URL, Some(&token), json!({"name": "Dup"})),
        app.post(TAGS_URL, Some(&token), json!({"name": "Dup"})),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);

    let tags = app.state.store().tags().list(user.owner(), false).await.unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn test_rename_to_existing_name_rejected() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;
    let catalog = &app.state.shared.catalog_service;
    catalog.create_tag(user.owner(), "Dinner").await.unwrap();
    let lunch = catalog.create_tag(user.owner(), "Lunch").await.unwrap();

    let (status, _) = app
        .send(
            Method::PATCH,
            &tag_url(lunch.id),
            Some(&token),
            Some(json!({"name": "Dinner"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::PUT,
            &tag_url(lunch.id),
            Some(&token),
            Some(json!({"name": "Lunch"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": lunch.id, "name": "Lunch"}));
}
