//! End-to-end tests for registration and login.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use taboor_integration_tests::TestContext;

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::spawn().await;

    let (status, body) = ctx
        .post(
            "/register",
            &json!({
                "name": "Sara",
                "email": "sara@example.com",
                "phone": "0501234567",
                "password": "correct horse battery",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Account created successfully");
    let user_id = body["user_id"].as_i64().unwrap();

    let (status, body) = ctx
        .post(
            "/login",
            &json!({
                "email": "sara@example.com",
                "password": "correct horse battery",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id);
    assert_eq!(body["user"]["name"], "Sara");
    assert_eq!(body["user"]["email"], "sara@example.com");
    assert_eq!(body["user"]["phone"], "0501234567");
    // The password hash is never serialized
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let ctx = TestContext::spawn().await;

    let (status, body) = ctx
        .post("/register", &json!({ "email": "sara@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name, email and password are required");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let ctx = TestContext::spawn().await;

    ctx.seed_user("Sara", "sara@example.com").await;

    let (status, body) = ctx
        .post(
            "/register",
            &json!({
                "name": "Imposter",
                "email": "sara@example.com",
                "password": "another password",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "An account with this email already exists");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = TestContext::spawn().await;

    ctx.seed_user("Sara", "sara@example.com").await;

    let (status, body) = ctx
        .post(
            "/login",
            &json!({ "email": "sara@example.com", "password": "wrong password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    // Unknown email is indistinguishable from a wrong password
    let (status, body) = ctx
        .post(
            "/login",
            &json!({ "email": "nobody@example.com", "password": "wrong password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_list_users() {
    let ctx = TestContext::spawn().await;

    ctx.seed_user("Sara", "sara@example.com").await;
    ctx.seed_user("Omar", "omar@example.com").await;

    let (status, body) = ctx.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Sara");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx
        .client
        .get(format!("{}/health/ready", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = ctx.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Taboor server is running");
}
