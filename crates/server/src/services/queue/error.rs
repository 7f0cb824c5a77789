//! Queue service error types.

use thiserror::Error;

use taboor_core::{MemberStatus, QueueStatus};

use crate::db::RepositoryError;

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue does not exist.
    #[error("Queue not found")]
    QueueNotFound,

    /// Business does not exist.
    #[error("Business not found")]
    BusinessNotFound,

    /// Service does not exist.
    #[error("Service not found")]
    ServiceNotFound,

    /// User does not exist.
    #[error("User not found")]
    UserNotFound,

    /// Joining requires the queue to be open.
    #[error("Queue is not open")]
    QueueNotOpen,

    /// The requested queue status change is not a legal transition.
    #[error("Cannot change queue status from {from} to {to}")]
    InvalidTransition { from: QueueStatus, to: QueueStatus },

    /// No member holds this ticket number in this queue.
    #[error("Ticket not found")]
    TicketNotFound,

    /// The requested member status change is not a legal transition.
    #[error("Cannot change ticket status from {from} to {to}")]
    InvalidMemberTransition { from: MemberStatus, to: MemberStatus },

    /// Ticket allocation kept conflicting after retries.
    #[error("Could not allocate a ticket, please retry")]
    TicketConflict,

    /// The user holds no waiting ticket in this queue.
    #[error("No active ticket for this user in this queue")]
    NoActiveTicket,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
