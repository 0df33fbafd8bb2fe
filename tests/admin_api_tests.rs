use std::sync::Arc;

use accountd::api::AppState;
use accountd::config::Config;
use accountd::services::{AccountService, NewAccount};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;
    config
}

/// Spawns the app and seeds one superuser, mirroring what the
/// `create-admin` CLI command does in production.
async fn spawn_app_with_admin() -> (Router, Arc<AppState>, String) {
    let state = accountd::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");

    state
        .account_service
        .create_account(
            NewAccount::new("admin@admin.pl", "adminPassword")
                .with_name("Admin")
                .superuser(),
        )
        .await
        .expect("Failed to seed admin account");

    let app = accountd::api::router(state.clone());
    let token = obtain_token(&app, "admin@admin.pl", "adminPassword").await;
    (app, state, token)
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Token {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn obtain_token(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/token",
            &json!({"email": email, "password": password}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_regular_user(app: &Router, email: &str, name: &str) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/create",
            &json!({"email": email, "password": "userPassword", "name": name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_admin_list_shows_name_and_email() {
    let (app, _state, token) = spawn_app_with_admin().await;
    create_regular_user(&app, "user@test.pl", "Regular User").await;

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/accounts", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let accounts = body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);

    let user = accounts
        .iter()
        .find(|a| a["email"] == "user@test.pl")
        .expect("created user missing from listing");
    assert_eq!(user["name"], "Regular User");
    assert_eq!(user["is_staff"], false);
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn test_admin_account_detail() {
    let (app, _state, token) = spawn_app_with_admin().await;
    create_regular_user(&app, "user@test.pl", "Regular User").await;

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/accounts", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["email"] == "user@test.pl")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/api/admin/accounts/{id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "user@test.pl");
    assert_eq!(body["data"]["name"], "Regular User");

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/accounts/99999", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_create_account() {
    let (app, _state, token) = spawn_app_with_admin().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/accounts")
                .header("Authorization", format!("Token {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({
                        "email": "staff@test.pl",
                        "password": "staffPassword",
                        "name": "Staff Member",
                        "is_staff": true
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "staff@test.pl");
    assert_eq!(body["data"]["is_staff"], true);
    assert_eq!(body["data"]["is_superuser"], false);

    // The new staff account can use the admin surface itself.
    let staff_token = obtain_token(&app, "staff@test.pl", "staffPassword").await;
    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/accounts", &staff_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_requires_staff() {
    let (app, _state, _token) = spawn_app_with_admin().await;
    create_regular_user(&app, "user@test.pl", "Regular User").await;
    let user_token = obtain_token(&app, "user@test.pl", "userPassword").await;

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/accounts", &user_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/accounts/1", &user_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_requires_authentication() {
    let (app, _state, _token) = spawn_app_with_admin().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
