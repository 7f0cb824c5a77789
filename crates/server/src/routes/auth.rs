//! Authentication route handlers.
//!
//! Registration and login delegate credential handling to the auth
//! service; password hashes never leave the database layer.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handle `POST /register`.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) = (&body.name, &body.email, &body.password)
    else {
        return Err(AppError::BadRequest(
            "name, email and password are required".to_owned(),
        ));
    };

    let user = AuthService::new(state.pool())
        .register(name, email, body.phone.as_deref(), password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created successfully",
            "user_id": user.id,
        })),
    ))
}

/// Handle `POST /login`.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password)) = (&body.email, &body.password) else {
        return Err(AppError::BadRequest(
            "email and password are required".to_owned(),
        ));
    };

    let user = AuthService::new(state.pool()).login(email, password).await?;

    Ok(Json(json!({
        "message": "Logged in successfully",
        "user": user,
    })))
}

/// Handle `GET /users`.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = crate::db::UserRepository::new(state.pool()).list().await?;

    Ok(Json(json!({ "users": users })))
}
