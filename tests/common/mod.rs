#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use recipe_api::api::AppState;
use recipe_api::config::Config;
use recipe_api::models::{Account, AccountExtra};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub media_root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.media_root = std::env::temp_dir()
        .join(format!("recipe-api-test-media-{}", uuid::Uuid::new_v4()))
        .display()
        .to_string();
    config.observability.metrics_enabled = false;
    // Keep hashing fast; production defaults are much heavier.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

pub async fn spawn_app() -> TestApp {
    let config = test_config();
    let media_root = PathBuf::from(&config.general.media_root);

    let state = recipe_api::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let router = recipe_api::api::router(state.clone());

    TestApp {
        state,
        router,
        media_root,
    }
}

impl TestApp {
    pub async fn create_user(&self, email: &str, password: &str) -> Account {
        self.state
            .shared
            .account_service
            .create_user(Some(email), password, AccountExtra::default())
            .await
            .expect("Failed to create user")
    }

    pub async fn create_named_user(&self, email: &str, password: &str, name: &str) -> Account {
        self.state
            .shared
            .account_service
            .create_user(
                Some(email),
                password,
                AccountExtra {
                    name: Some(name.to_string()),
                    ..AccountExtra::default()
                },
            )
            .await
            .expect("Failed to create user")
    }

    pub async fn token_for(&self, account: &Account) -> String {
        self.state
            .store()
            .get_or_create_token(account.id)
            .await
            .expect("Failed to create token")
    }

    /// Creates `test@ntg.ai` and returns it with its token.
    pub async fn authenticated_user(&self) -> (Account, String) {
        let account = self.create_user("test@ntg.ai", "passntgai").await;
        let token = self.token_for(&account).await;
        (account, token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Token {token}"));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        read_json(response).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
