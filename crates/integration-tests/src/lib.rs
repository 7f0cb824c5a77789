//! Integration test harness for Taboor.
//!
//! [`TestContext`] boots the real server router over a fresh in-memory
//! `SQLite` database on an ephemeral port, then drives it with `reqwest`
//! like any other HTTP client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p taboor-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;

use taboor_server::config::TaboorConfig;
use taboor_server::state::AppState;
use taboor_server::{app, db};

/// A running Taboor server plus a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Boot the app on an ephemeral port over a fresh in-memory database.
    pub async fn spawn() -> Self {
        let pool = db::create_memory_pool().await.unwrap();
        db::MIGRATOR.run(&pool).await.unwrap();

        let config = TaboorConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, pool);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    /// POST a JSON body, returning (status, parsed body).
    pub async fn post(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    /// PATCH a JSON body, returning (status, parsed body).
    pub async fn patch(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let resp = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    /// GET a path, returning (status, parsed body).
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    // =========================================================================
    // Seeding helpers
    // =========================================================================

    /// Register a user and return its ID.
    pub async fn seed_user(&self, name: &str, email: &str) -> i64 {
        let (status, body) = self
            .post(
                "/register",
                &serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "correct horse battery",
                }),
            )
            .await;
        assert_eq!(status, reqwest::StatusCode::CREATED, "register: {body}");
        body["user_id"].as_i64().unwrap()
    }

    /// Register a business and return its ID.
    pub async fn seed_business(&self, name: &str) -> i64 {
        let (status, body) = self
            .post("/business/register", &serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, reqwest::StatusCode::CREATED, "business: {body}");
        body["business"]["id"].as_i64().unwrap()
    }

    /// Create a queue for a business and return its ID.
    pub async fn seed_queue(&self, business_id: i64) -> i64 {
        let (status, body) = self
            .post("/queues", &serde_json::json!({ "business_id": business_id }))
            .await;
        assert_eq!(status, reqwest::StatusCode::CREATED, "queue: {body}");
        body["queue"]["id"].as_i64().unwrap()
    }
}
