mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use serde_json::json;

const CREATE_USER_URL: &str = "/api/user/create";
const TOKEN_URL: &str = "/api/user/token";
const ME_URL: &str = "/api/user/me";

#[tokio::test]
async fn test_create_valid_user_success() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            CREATE_USER_URL,
            None,
            json!({"email": "test@ntg.ai", "password": "passntgai", "name": "Test name"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"email": "test@ntg.ai", "name": "Test name"}));
    assert!(body.get("password").is_none());

    let user = app
        .state
        .store()
        .get_account_by_email("test@ntg.ai")
        .await
        .unwrap()
        .unwrap();
    assert!(user.check_password("passntgai"));
}

#[tokio::test]
async fn test_user_exists() {
    let app = spawn_app().await;
    app.create_user("test@ntg.ai", "passntgai").await;

    let (status, body) = app
        .post(
            CREATE_USER_URL,
            None,
            json!({"email": "test@ntg.ai", "password": "passntgai"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_password_too_short() {
    let app = spawn_app().await;

    let (status, _) = app
        .post(
            CREATE_USER_URL,
            None,
            json!({"email": "test@ntg.ai", "password": "pw", "name": "Test"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let exists = app
        .state
        .store()
        .get_account_by_email("test@ntg.ai")
        .await
        .unwrap();
    assert!(exists.is_none());
}

#[tokio::test]
async fn test_create_user_missing_email() {
    let app = spawn_app().await;

    let (status, _) = app
        .post(CREATE_USER_URL, None, json!({"password": "passntgai"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_malformed_json() {
    let app = spawn_app().await;

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .method(Method::POST)
            .uri(CREATE_USER_URL)
            .header("Content-Type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_token_for_user() {
    let app = spawn_app().await;
    app.create_user("test@ntg.ai", "passntgai").await;

    let (status, body) = app
        .post(
            TOKEN_URL,
            None,
            json!({"email": "test@ntg.ai", "password": "passntgai"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_create_token_invalid_credentials() {
    let app = spawn_app().await;
    app.create_user("test@ntg.ai", "passntgai").await;

    let (status, body) = app
        .post(
            TOKEN_URL,
            None,
            json!({"email": "test@ntg.ai", "password": "wrong_pass"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_create_token_no_user() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            TOKEN_URL,
            None,
            json!({"email": "test@ntg.ai", "password": "testpass"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_create_token_missing_field() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(TOKEN_URL, None, json!({"email": "test@ntg.ai", "password": ""}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_retrieve_user_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = app.send(Method::GET, ME_URL, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(Method::GET, ME_URL, Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_retrieve_profile_success() {
    let app = spawn_app().await;
    let user = app
        .create_named_user("test@ntg.ai", "testntgai", "test user")
        .await;
    let token = app.token_for(&user).await;

    let (status, body) = app.get(ME_URL, &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "test user", "email": "test@ntg.ai"}));
}

#[tokio::test]
async fn test_bearer_scheme_accepted() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri(ME_URL)
            .header("Authorization", format!("Bearer {token}"))
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_post_me_not_allowed() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;

    let (status, _) = app.post(ME_URL, Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_update_user_profile() {
    let app = spawn_app().await;
    let user = app
        .create_named_user("test@ntg.ai", "testntgai", "test user")
        .await;
    let token = app.token_for(&user).await;

    let (status, body) = app
        .send(
            Method::PATCH,
            ME_URL,
            Some(&token),
            Some(json!({"name": "new name", "password": "newpassword123"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "new name");

    let refreshed = app.state.store().get_account(user.id).await.unwrap().unwrap();
    assert_eq!(refreshed.name, "new name");
    assert!(refreshed.check_password("newpassword123"));
    assert!(!refreshed.check_password("testntgai"));

    // The token survives a profile update.
    let (status, _) = app.get(ME_URL, &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile_rejects_short_password() {
    let app = spawn_app().await;
    let (user, token) = app.authenticated_user().await;

    let (status, _) = app
        .send(
            Method::PUT,
            ME_URL,
            Some(&token),
            Some(json!({"password": "pw"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let unchanged = app.state.store().get_account(user.id).await.unwrap().unwrap();
    assert!(unchanged.check_password("passntgai"));
}

#[tokio::test]
async fn test_update_profile_email_is_normalized() {
    let app = spawn_app().await;
    let (_, token) = app.authenticated_user().await;

    let (status, body) = app
        .send(
            Method::PATCH,
            ME_URL,
            Some(&token),
            Some(json!({"email": "New@NTG.AI"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "New@ntg.ai");
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let app = spawn_app().await;

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_concurrent_create_same_email() {
    let app = spawn_app().await;
    let payload = json!({"email": "race@ntg.ai", "password": "passntgai"});

    let ((first, _), (second, second_body)) = tokio::join!(
        app.post(CREATE_USER_URL, None, payload.clone()),
        app.post(CREATE_USER_URL, None, payload.clone()),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    if second == StatusCode::BAD_REQUEST {
        assert_eq!(
            second_body,
            json!({"error": "user with this email already exists"})
        );
    }
}

#[tokio::test]
async fn test_concurrent_profile_updates_to_same_email() {
    let app = spawn_app().await;
    let first_user = app.create_user("first@ntg.ai", "passntgai").await;
    let second_user = app.create_user("second@ntg.ai", "passntgai").await;
    let first_token = app.token_for(&first_user).await;
    let second_token = app.token_for(&second_user).await;
    let payload = json!({"email": "taken@ntg.ai"});

    let ((first, _), (second, _)) = tokio::join!(
        app.send(Method::PATCH, ME_URL, Some(&first_token), Some(payload.clone())),
        app.send(Method::PATCH, ME_URL, Some(&second_token), Some(payload.clone())),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
}
