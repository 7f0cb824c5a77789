//! Queue domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taboor_core::{
    BusinessId, MemberId, MemberStatus, QueueId, QueueStatus, ServiceId, TicketNumber, UserId,
};

/// A waitlist belonging to one business, optionally scoped to one service.
#[derive(Debug, Clone, Serialize)]
pub struct Queue {
    /// Unique queue ID.
    pub id: QueueId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Optional service this queue is for.
    pub service_id: Option<ServiceId>,
    /// Lifecycle status.
    pub status: QueueStatus,
    /// When the queue was created.
    pub created_at: DateTime<Utc>,
    /// Last status change or creation time.
    pub updated_at: DateTime<Utc>,
}

/// A queue with its service name joined in, for business dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct QueueSummary {
    #[serde(flatten)]
    pub queue: Queue,
    /// Name of the scoped service, when one is set.
    pub service_name: Option<String>,
}

/// One user's participation record in one queue.
///
/// Append-only: a member row is never deleted, only its status changes.
#[derive(Debug, Clone, Serialize)]
pub struct QueueMember {
    /// Unique member ID.
    pub id: MemberId,
    /// The queue joined.
    pub queue_id: QueueId,
    /// The user who joined.
    pub user_id: UserId,
    /// Per-queue sequential ticket number (join order).
    pub ticket_number: TicketNumber,
    /// Lifecycle status of this ticket.
    pub status: MemberStatus,
    /// Optional note left at join time.
    pub note: Option<String>,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
    /// Last status change or join time.
    pub updated_at: DateTime<Utc>,
}

/// Per-status member counts for one queue.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct QueueStats {
    pub waiting: i64,
    pub called: i64,
    pub done: i64,
    pub skipped: i64,
    pub left: i64,
}

/// Dashboard summary for one queue.
#[derive(Debug, Clone, Serialize)]
pub struct QueueOverview {
    #[serde(flatten)]
    pub queue: Queue,
    /// Owning business name.
    pub business_name: String,
    /// Scoped service name, when one is set.
    pub service_name: Option<String>,
}
