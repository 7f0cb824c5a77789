//! HTTP route handlers for the Taboor server.
//!
//! # Route Structure
//!
//! ```text
//! GET   /                          - Service banner
//! GET   /health                    - Liveness check
//! GET   /health/ready              - Readiness check (DB ping)
//!
//! # Auth
//! POST  /register                  - Create a user account
//! POST  /login                     - Verify credentials
//! GET   /users                     - List users
//!
//! # Businesses
//! POST  /business/register         - Register a business
//! GET   /businesses                - List active businesses
//! GET   /businesses/{id}/services  - List a business's services
//! GET   /businesses/{id}/queues    - List a business's queues
//!
//! # Services
//! POST  /services                  - Add a service to a business
//!
//! # Queues
//! POST  /queues                    - Create a queue
//! PATCH /queues/{id}/status        - Change queue status
//! PATCH /queues/{id}/tickets/{ticket}/status - Mark a ticket done/skipped
//! POST  /queues/{id}/join          - Join: allocate a ticket
//! GET   /queues/{id}/position      - Current position (?user_id=)
//! POST  /queues/{id}/leave         - Mark latest waiting ticket left
//! POST  /queues/{id}/next          - Call the earliest waiting member
//! GET   /queues/{id}/overview      - Counts and wait estimate
//! ```

pub mod auth;
pub mod businesses;
pub mod queues;
pub mod services;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(auth::list_users))
}

/// Create the business routes router.
pub fn business_routes() -> Router<AppState> {
    Router::new()
        .route("/business/register", post(businesses::register))
        .route("/businesses", get(businesses::list))
        .route(
            "/businesses/{id}/services",
            get(services::list_for_business),
        )
        .route("/businesses/{id}/queues", get(queues::list_for_business))
        .route("/services", post(services::create))
}

/// Create the queue routes router.
pub fn queue_routes() -> Router<AppState> {
    Router::new()
        .route("/queues", post(queues::create))
        .route("/queues/{id}/status", patch(queues::update_status))
        .route(
            "/queues/{id}/tickets/{ticket}/status",
            patch(queues::update_ticket_status),
        )
        .route("/queues/{id}/join", post(queues::join))
        .route("/queues/{id}/position", get(queues::position))
        .route("/queues/{id}/leave", post(queues::leave))
        .route("/queues/{id}/next", post(queues::next))
        .route("/queues/{id}/overview", get(queues::overview))
}

/// Create all routes for the Taboor API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .merge(auth_routes())
        .merge(business_routes())
        .merge(queue_routes())
}

/// Build the full application with health endpoints and HTTP middleware.
///
/// This is everything except the Sentry layers, which only make sense in
/// the real binary; integration tests mount this router directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        // The browser frontend is served elsewhere
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service banner.
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Taboor server is running" }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
