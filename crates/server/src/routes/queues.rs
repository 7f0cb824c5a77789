//! Queue route handlers: lifecycle, joining, positions and the dashboard
//! actions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use taboor_core::{BusinessId, MemberStatus, QueueId, QueueStatus, ServiceId, TicketNumber, UserId};

use crate::error::{AppError, Result};
use crate::services::queue::QueueService;
use crate::state::AppState;

/// Queue creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateQueueRequest {
    pub business_id: Option<BusinessId>,
    pub service_id: Option<ServiceId>,
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Join request body.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub user_id: Option<UserId>,
    pub note: Option<String>,
}

/// Leave request body.
#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub user_id: Option<UserId>,
}

/// Query parameters for the position endpoint.
#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub user_id: Option<UserId>,
}

/// Handle `POST /queues`.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateQueueRequest>,
) -> Result<impl IntoResponse> {
    let Some(business_id) = body.business_id else {
        return Err(AppError::BadRequest("business_id is required".to_owned()));
    };

    let queue = QueueService::new(state.pool())
        .create_queue(business_id, body.service_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Queue created",
            "queue": queue,
        })),
    ))
}

/// Handle `GET /businesses/{id}/queues`.
pub async fn list_for_business(
    State(state): State<AppState>,
    Path(business_id): Path<BusinessId>,
) -> Result<impl IntoResponse> {
    let queues = QueueService::new(state.pool())
        .list_queues(business_id)
        .await?;

    Ok(Json(json!({ "queues": queues })))
}

/// Handle `PATCH /queues/{id}/status`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(queue_id): Path<QueueId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let status = body
        .status
        .as_deref()
        .and_then(|s| s.parse::<QueueStatus>().ok())
        .ok_or_else(|| {
            AppError::BadRequest("Invalid status. Use open|paused|closed".to_owned())
        })?;

    let queue = QueueService::new(state.pool())
        .update_status(queue_id, status)
        .await?;

    Ok(Json(json!({
        "message": "Queue status updated",
        "queue": queue,
    })))
}

/// Ticket status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: Option<String>,
}

/// Handle `PATCH /queues/{id}/tickets/{ticket}/status`.
///
/// Dashboard action for marking a called customer done, or skipping one.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path((queue_id, ticket_number)): Path<(QueueId, TicketNumber)>,
    Json(body): Json<UpdateTicketStatusRequest>,
) -> Result<impl IntoResponse> {
    let status = body
        .status
        .as_deref()
        .and_then(|s| s.parse::<MemberStatus>().ok())
        .ok_or_else(|| {
            AppError::BadRequest("Invalid status. Use called|skipped|done|left".to_owned())
        })?;

    let member = QueueService::new(state.pool())
        .update_member_status(queue_id, ticket_number, status)
        .await?;

    Ok(Json(json!({
        "message": "Ticket status updated",
        "member": member,
    })))
}

/// Handle `POST /queues/{id}/join`.
pub async fn join(
    State(state): State<AppState>,
    Path(queue_id): Path<QueueId>,
    Json(body): Json<JoinRequest>,
) -> Result<impl IntoResponse> {
    let Some(user_id) = body.user_id else {
        return Err(AppError::BadRequest("user_id is required".to_owned()));
    };

    let joined = QueueService::new(state.pool())
        .join(queue_id, user_id, body.note.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Joined queue successfully",
            "ticket_number": joined.member.ticket_number,
            "position": joined.position,
        })),
    ))
}

/// Handle `GET /queues/{id}/position?user_id=`.
pub async fn position(
    State(state): State<AppState>,
    Path(queue_id): Path<QueueId>,
    Query(query): Query<PositionQuery>,
) -> Result<impl IntoResponse> {
    let Some(user_id) = query.user_id else {
        return Err(AppError::BadRequest("user_id is required".to_owned()));
    };

    let standing = QueueService::new(state.pool())
        .position(queue_id, user_id)
        .await?;

    Ok(Json(json!({
        "ticket_number": standing.member.ticket_number,
        "status": standing.member.status,
        "position": standing.position,
    })))
}

/// Handle `POST /queues/{id}/leave`.
pub async fn leave(
    State(state): State<AppState>,
    Path(queue_id): Path<QueueId>,
    Json(body): Json<LeaveRequest>,
) -> Result<impl IntoResponse> {
    let Some(user_id) = body.user_id else {
        return Err(AppError::BadRequest("user_id is required".to_owned()));
    };

    QueueService::new(state.pool()).leave(queue_id, user_id).await?;

    Ok(Json(json!({ "message": "Left the queue successfully" })))
}

/// Handle `POST /queues/{id}/next`.
///
/// Calling next with nobody waiting is a no-op success, not an error.
pub async fn next(
    State(state): State<AppState>,
    Path(queue_id): Path<QueueId>,
) -> Result<impl IntoResponse> {
    let called = QueueService::new(state.pool()).call_next(queue_id).await?;

    let body = match called {
        Some(member) => json!({
            "message": "Next customer called",
            "ticket_number": member.ticket_number,
            "user_id": member.user_id,
        }),
        None => json!({ "message": "No one is waiting" }),
    };

    Ok(Json(body))
}

/// Handle `GET /queues/{id}/overview`.
pub async fn overview(
    State(state): State<AppState>,
    Path(queue_id): Path<QueueId>,
) -> Result<impl IntoResponse> {
    let overview = QueueService::new(state.pool()).overview(queue_id).await?;

    Ok(Json(json!({
        "queue": overview.queue,
        "stats": overview.stats,
        "estimated_wait_minutes": overview.estimated_wait_minutes,
    })))
}
