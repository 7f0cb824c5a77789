//! Queue service.
//!
//! The state-machine layer over the queue repositories: queue lifecycle,
//! joining with atomic ticket allocation, position lookup, leaving,
//! calling the next member and the dashboard overview.

mod error;

pub use error::QueueError;

use sqlx::SqlitePool;

use taboor_core::{BusinessId, MemberStatus, QueueId, QueueStatus, ServiceId, TicketNumber, UserId};

use crate::db::businesses::BusinessRepository;
use crate::db::queue_members::QueueMemberRepository;
use crate::db::queues::QueueRepository;
use crate::db::services::ServiceRepository;
use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::models::{Queue, QueueMember, QueueOverview, QueueStats, QueueSummary};

/// Attempts at the join transaction before surfacing a conflict.
const MAX_JOIN_ATTEMPTS: u32 = 3;

/// Estimated minutes per waiting member when the queue has no service.
const DEFAULT_WAIT_MINUTES: i64 = 10;

/// The result of joining a queue.
#[derive(Debug, Clone)]
pub struct JoinedQueue {
    pub member: QueueMember,
    /// 1-based position among currently-waiting members.
    pub position: i64,
}

/// A member's current standing in a queue.
#[derive(Debug, Clone)]
pub struct MemberPosition {
    pub member: QueueMember,
    pub position: i64,
}

/// Dashboard summary of one queue.
#[derive(Debug, Clone)]
pub struct Overview {
    pub queue: QueueOverview,
    pub stats: QueueStats,
    pub estimated_wait_minutes: i64,
}

/// Queue service.
pub struct QueueService<'a> {
    pool: &'a SqlitePool,
    queues: QueueRepository<'a>,
    members: QueueMemberRepository<'a>,
}

impl<'a> QueueService<'a> {
    /// Create a new queue service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            queues: QueueRepository::new(pool),
            members: QueueMemberRepository::new(pool),
        }
    }

    /// Create a queue for a business, optionally scoped to one service.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::BusinessNotFound` / `QueueError::ServiceNotFound`
    /// for dangling references.
    pub async fn create_queue(
        &self,
        business_id: BusinessId,
        service_id: Option<ServiceId>,
    ) -> Result<Queue, QueueError> {
        BusinessRepository::new(self.pool)
            .get_by_id(business_id)
            .await?
            .ok_or(QueueError::BusinessNotFound)?;

        if let Some(service_id) = service_id {
            ServiceRepository::new(self.pool)
                .get_by_id(service_id)
                .await?
                .ok_or(QueueError::ServiceNotFound)?;
        }

        Ok(self.queues.create(business_id, service_id).await?)
    }

    /// List queues of one business, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::BusinessNotFound` for an unknown business.
    pub async fn list_queues(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<QueueSummary>, QueueError> {
        BusinessRepository::new(self.pool)
            .get_by_id(business_id)
            .await?
            .ok_or(QueueError::BusinessNotFound)?;

        Ok(self.queues.list_for_business(business_id).await?)
    }

    /// Change a queue's status, enforcing the state machine:
    /// `open ⇄ paused`, both may close, `closed` is terminal.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` for an unknown queue and
    /// `QueueError::InvalidTransition` for an illegal move.
    pub async fn update_status(
        &self,
        queue_id: QueueId,
        next: QueueStatus,
    ) -> Result<Queue, QueueError> {
        let queue = self
            .queues
            .get_by_id(queue_id)
            .await?
            .ok_or(QueueError::QueueNotFound)?;

        if !queue.status.can_transition_to(next) {
            return Err(QueueError::InvalidTransition {
                from: queue.status,
                to: next,
            });
        }

        if queue.status == next {
            return Ok(queue);
        }

        match self.queues.update_status(queue_id, queue.status, next).await {
            Ok(queue) => Ok(queue),
            // The status moved under us between check and update; whatever
            // it is now, this request's transition no longer applies.
            Err(RepositoryError::InvalidState(_)) => Err(QueueError::InvalidTransition {
                from: queue.status,
                to: next,
            }),
            Err(RepositoryError::NotFound) => Err(QueueError::QueueNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Join a queue: allocate a ticket and return it with the position.
    ///
    /// The underlying allocation is atomic; on a ticket-number conflict
    /// the whole transaction is retried up to [`MAX_JOIN_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` / `QueueError::UserNotFound`
    /// for dangling references, `QueueError::QueueNotOpen` when the queue
    /// is paused or closed, and `QueueError::TicketConflict` when retries
    /// are exhausted.
    pub async fn join(
        &self,
        queue_id: QueueId,
        user_id: UserId,
        note: Option<&str>,
    ) -> Result<JoinedQueue, QueueError> {
        UserRepository::new(self.pool)
            .get_by_id(user_id)
            .await?
            .ok_or(QueueError::UserNotFound)?;

        for _ in 0..MAX_JOIN_ATTEMPTS {
            match self.members.join(queue_id, user_id, note).await {
                Ok((member, position)) => return Ok(JoinedQueue { member, position }),
                Err(RepositoryError::Conflict(_)) => {
                    tracing::debug!(%queue_id, %user_id, "ticket conflict, retrying join");
                }
                Err(RepositoryError::NotFound) => return Err(QueueError::QueueNotFound),
                Err(RepositoryError::InvalidState(_)) => return Err(QueueError::QueueNotOpen),
                Err(e) => return Err(e.into()),
            }
        }

        Err(QueueError::TicketConflict)
    }

    /// Look up a user's current position in a queue.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::NoActiveTicket` when the user holds no waiting
    /// ticket in this queue.
    pub async fn position(
        &self,
        queue_id: QueueId,
        user_id: UserId,
    ) -> Result<MemberPosition, QueueError> {
        let member = self
            .members
            .find_waiting(queue_id, user_id)
            .await?
            .ok_or(QueueError::NoActiveTicket)?;

        let position = self.members.position_of(&member).await?;

        Ok(MemberPosition { member, position })
    }

    /// Mark a user's latest waiting ticket as left.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::NoActiveTicket` when the user holds no waiting
    /// ticket in this queue.
    pub async fn leave(&self, queue_id: QueueId, user_id: UserId) -> Result<QueueMember, QueueError> {
        self.members
            .leave_latest(queue_id, user_id)
            .await?
            .ok_or(QueueError::NoActiveTicket)
    }

    /// Change one ticket's member status (dashboard action for marking a
    /// called customer done, or skipping one), enforcing the member state
    /// machine: `waiting → {called, skipped, left}`, `called → {done,
    /// skipped}`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` / `QueueError::TicketNotFound`
    /// for dangling references and `QueueError::InvalidMemberTransition`
    /// for an illegal move.
    pub async fn update_member_status(
        &self,
        queue_id: QueueId,
        ticket_number: TicketNumber,
        next: MemberStatus,
    ) -> Result<QueueMember, QueueError> {
        self.queues
            .get_by_id(queue_id)
            .await?
            .ok_or(QueueError::QueueNotFound)?;

        let member = self
            .members
            .find_by_ticket(queue_id, ticket_number)
            .await?
            .ok_or(QueueError::TicketNotFound)?;

        if !member.status.can_transition_to(next) {
            return Err(QueueError::InvalidMemberTransition {
                from: member.status,
                to: next,
            });
        }

        match self.members.transition(member.id, member.status, next).await {
            Ok(member) => Ok(member),
            Err(RepositoryError::InvalidState(_)) => Err(QueueError::InvalidMemberTransition {
                from: member.status,
                to: next,
            }),
            Err(RepositoryError::NotFound) => Err(QueueError::TicketNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Call the earliest waiting member.
    ///
    /// Returns `None` when nobody is waiting; that is a no-op, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` for an unknown queue.
    pub async fn call_next(&self, queue_id: QueueId) -> Result<Option<QueueMember>, QueueError> {
        self.queues
            .get_by_id(queue_id)
            .await?
            .ok_or(QueueError::QueueNotFound)?;

        Ok(self.members.call_next(queue_id).await?)
    }

    /// Dashboard overview: queue metadata, per-status counts and the wait
    /// estimate (waiting count × service duration, 10 minutes per member
    /// when the queue has no service).
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` for an unknown queue.
    pub async fn overview(&self, queue_id: QueueId) -> Result<Overview, QueueError> {
        let queue = self
            .queues
            .get_overview(queue_id)
            .await?
            .ok_or(QueueError::QueueNotFound)?;

        let stats = self.members.stats(queue_id).await?;

        let minutes_per_member = match queue.queue.service_id {
            Some(service_id) => ServiceRepository::new(self.pool)
                .get_by_id(service_id)
                .await?
                .map_or(DEFAULT_WAIT_MINUTES, |s| s.duration_minutes),
            None => DEFAULT_WAIT_MINUTES,
        };

        Ok(Overview {
            estimated_wait_minutes: stats.waiting * minutes_per_member,
            queue,
            stats,
        })
    }
}
