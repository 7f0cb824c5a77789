//! Service route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use taboor_core::BusinessId;

use crate::db::businesses::BusinessRepository;
use crate::db::services::{DEFAULT_DURATION_MINUTES, NewService, ServiceRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Service creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub business_id: Option<BusinessId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub price: Option<f64>,
}

/// Handle `POST /services`.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse> {
    let (Some(business_id), Some(name)) = (body.business_id, body.name) else {
        return Err(AppError::BadRequest(
            "business_id and name are required".to_owned(),
        ));
    };

    BusinessRepository::new(state.pool())
        .get_by_id(business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".to_owned()))?;

    let service = ServiceRepository::new(state.pool())
        .create(&NewService {
            business_id,
            name,
            description: body.description,
            duration_minutes: body.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            price: body.price.unwrap_or(0.0),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Service created",
            "service": service,
        })),
    ))
}

/// Handle `GET /businesses/{id}/services`.
pub async fn list_for_business(
    State(state): State<AppState>,
    Path(business_id): Path<BusinessId>,
) -> Result<impl IntoResponse> {
    BusinessRepository::new(state.pool())
        .get_by_id(business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".to_owned()))?;

    let services = ServiceRepository::new(state.pool())
        .list_for_business(business_id)
        .await?;

    Ok(Json(json!({ "services": services })))
}
