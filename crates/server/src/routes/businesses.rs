//! Business route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use taboor_core::UserId;

use crate::db::businesses::{BusinessRepository, NewBusiness};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Business registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterBusinessRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub owner_user_id: Option<UserId>,
}

/// Handle `POST /business/register`.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBusinessRequest>,
) -> Result<impl IntoResponse> {
    let Some(name) = body.name else {
        return Err(AppError::BadRequest("Business name is required".to_owned()));
    };

    let business = BusinessRepository::new(state.pool())
        .create(&NewBusiness {
            name,
            category: body.category,
            address: body.address,
            latitude: body.latitude,
            longitude: body.longitude,
            phone: body.phone,
            owner_user_id: body.owner_user_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Business created",
            "business": business,
        })),
    ))
}

/// Handle `GET /businesses`.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let businesses = BusinessRepository::new(state.pool()).list_active().await?;

    Ok(Json(json!({ "businesses": businesses })))
}
