//! Queue member repository: ticket allocation, position counting and
//! status transitions.
//!
//! Ticket numbers are unique and strictly increasing per queue, assigned
//! at join time as `max(existing) + 1` (1 for an empty queue). The
//! allocation is a single `INSERT ... SELECT` that folds in the queue
//! status check, so two concurrent joins cannot observe the same maximum
//! and the status check cannot race the insert. A unique-constraint
//! violation on `(queue_id, ticket_number)` surfaces as a retryable
//! [`RepositoryError::Conflict`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taboor_core::{MemberId, MemberStatus, QueueId, QueueStatus, TicketNumber, UserId};

use super::RepositoryError;
use crate::models::{QueueMember, QueueStats};

/// Repository for queue member database operations.
pub struct QueueMemberRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i64,
    queue_id: i64,
    user_id: i64,
    ticket_number: i64,
    status: MemberStatus,
    note: Option<String>,
    joined_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self) -> QueueMember {
        QueueMember {
            id: MemberId::new(self.id),
            queue_id: QueueId::new(self.queue_id),
            user_id: UserId::new(self.user_id),
            ticket_number: TicketNumber::new(self.ticket_number),
            status: self.status,
            note: self.note,
            joined_at: self.joined_at,
            updated_at: self.updated_at,
        }
    }
}

const MEMBER_COLUMNS: &str =
    "id, queue_id, user_id, ticket_number, status, note, joined_at, updated_at";

impl<'a> QueueMemberRepository<'a> {
    /// Create a new queue member repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Join a queue: allocate the next ticket number and insert the member
    /// row, atomically.
    ///
    /// The queue-status check, the max-ticket read and the insert are one
    /// SQL statement: it inserts nothing unless the queue exists and is
    /// open, and a concurrent join cannot observe the same maximum. The
    /// statement opens the enclosing transaction, so it takes the write
    /// lock up front instead of upgrading a read lock mid-transaction.
    ///
    /// Returns the new member and its 1-based position among waiting
    /// members, computed in the same transaction.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` - the queue does not exist.
    /// - `RepositoryError::InvalidState` - the queue is not open.
    /// - `RepositoryError::Conflict` - the allocated ticket number was
    ///   taken by an interleaved writer; callers may retry.
    pub async fn join(
        &self,
        queue_id: QueueId,
        user_id: UserId,
        note: Option<&str>,
    ) -> Result<(QueueMember, i64), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r"
            INSERT INTO queue_members
                (queue_id, user_id, ticket_number, status, note, joined_at, updated_at)
            SELECT id,
                   ?,
                   COALESCE(
                       (SELECT MAX(ticket_number) FROM queue_members
                        WHERE queue_id = queues.id),
                       0
                   ) + 1,
                   'waiting', ?, ?, ?
            FROM queues
            WHERE id = ? AND status = 'open'
            RETURNING {MEMBER_COLUMNS}
            ",
        ))
        .bind(user_id)
        .bind(note)
        .bind(now)
        .bind(now)
        .bind(queue_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("ticket number already allocated".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let Some(row) = row else {
            // Nothing inserted: the queue is missing or not open.
            let status: Option<QueueStatus> =
                sqlx::query_scalar("SELECT status FROM queues WHERE id = ?")
                    .bind(queue_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return match status {
                None => Err(RepositoryError::NotFound),
                Some(_) => Err(RepositoryError::InvalidState(
                    "queue is not open".to_owned(),
                )),
            };
        };

        let ahead: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM queue_members
            WHERE queue_id = ? AND status = 'waiting' AND ticket_number < ?
            ",
        )
        .bind(queue_id)
        .bind(row.ticket_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((row.into_member(), ahead + 1))
    }

    /// Find a user's current waiting ticket in a queue (the one with the
    /// highest ticket number, if the user somehow holds several).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_waiting(
        &self,
        queue_id: QueueId,
        user_id: UserId,
    ) -> Result<Option<QueueMember>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r"
            SELECT {MEMBER_COLUMNS} FROM queue_members
            WHERE queue_id = ? AND user_id = ? AND status = 'waiting'
            ORDER BY ticket_number DESC
            LIMIT 1
            ",
        ))
        .bind(queue_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MemberRow::into_member))
    }

    /// Find a member by its ticket number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_ticket(
        &self,
        queue_id: QueueId,
        ticket_number: TicketNumber,
    ) -> Result<Option<QueueMember>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r"
            SELECT {MEMBER_COLUMNS} FROM queue_members
            WHERE queue_id = ? AND ticket_number = ?
            ",
        ))
        .bind(queue_id)
        .bind(ticket_number)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MemberRow::into_member))
    }

    /// 1-based position of a waiting member among currently-waiting
    /// members of its queue.
    ///
    /// Only meaningful for members whose status is `waiting`; callers
    /// check status first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn position_of(&self, member: &QueueMember) -> Result<i64, RepositoryError> {
        let ahead: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM queue_members
            WHERE queue_id = ? AND status = 'waiting' AND ticket_number < ?
            ",
        )
        .bind(member.queue_id)
        .bind(member.ticket_number)
        .fetch_one(self.pool)
        .await?;

        Ok(ahead + 1)
    }

    /// Call the earliest-inserted waiting member: atomically transition
    /// the lowest waiting ticket to `called` and return it.
    ///
    /// Returns `None` when nobody is waiting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn call_next(
        &self,
        queue_id: QueueId,
    ) -> Result<Option<QueueMember>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r"
            UPDATE queue_members
            SET status = 'called', updated_at = ?
            WHERE id = (
                SELECT id FROM queue_members
                WHERE queue_id = ? AND status = 'waiting'
                ORDER BY ticket_number ASC
                LIMIT 1
            )
            RETURNING {MEMBER_COLUMNS}
            ",
        ))
        .bind(Utc::now())
        .bind(queue_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MemberRow::into_member))
    }

    /// Mark a user's latest waiting ticket as `left`.
    ///
    /// Returns `None` when the user holds no waiting ticket in this queue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn leave_latest(
        &self,
        queue_id: QueueId,
        user_id: UserId,
    ) -> Result<Option<QueueMember>, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r"
            UPDATE queue_members
            SET status = 'left', updated_at = ?
            WHERE id = (
                SELECT id FROM queue_members
                WHERE queue_id = ? AND user_id = ? AND status = 'waiting'
                ORDER BY ticket_number DESC
                LIMIT 1
            )
            RETURNING {MEMBER_COLUMNS}
            ",
        ))
        .bind(Utc::now())
        .bind(queue_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MemberRow::into_member))
    }

    /// Transition one member's status, guarded on the expected current
    /// status so a concurrent transition is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the member does not exist,
    /// `RepositoryError::InvalidState` if it was no longer in `from`.
    pub async fn transition(
        &self,
        id: MemberId,
        from: MemberStatus,
        to: MemberStatus,
    ) -> Result<QueueMember, RepositoryError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r"
            UPDATE queue_members
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            RETURNING {MEMBER_COLUMNS}
            ",
        ))
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(from)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(r.into_member()),
            None => {
                let current: Option<MemberStatus> =
                    sqlx::query_scalar("SELECT status FROM queue_members WHERE id = ?")
                        .bind(id)
                        .fetch_optional(self.pool)
                        .await?;

                match current {
                    None => Err(RepositoryError::NotFound),
                    Some(status) => Err(RepositoryError::InvalidState(format!(
                        "member {id} is {status}, not {from}"
                    ))),
                }
            }
        }
    }

    /// Per-status member counts for one queue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self, queue_id: QueueId) -> Result<QueueStats, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct StatsRow {
            waiting: i64,
            called: i64,
            done: i64,
            skipped: i64,
            left_count: i64,
        }

        let row = sqlx::query_as::<_, StatsRow>(
            r"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'waiting' THEN 1 ELSE 0 END), 0) AS waiting,
                COALESCE(SUM(CASE WHEN status = 'called'  THEN 1 ELSE 0 END), 0) AS called,
                COALESCE(SUM(CASE WHEN status = 'done'    THEN 1 ELSE 0 END), 0) AS done,
                COALESCE(SUM(CASE WHEN status = 'skipped' THEN 1 ELSE 0 END), 0) AS skipped,
                COALESCE(SUM(CASE WHEN status = 'left'    THEN 1 ELSE 0 END), 0) AS left_count
            FROM queue_members
            WHERE queue_id = ?
            ",
        )
        .bind(queue_id)
        .fetch_one(self.pool)
        .await?;

        Ok(QueueStats {
            waiting: row.waiting,
            called: row.called,
            done: row.done,
            skipped: row.skipped,
            left: row.left_count,
        })
    }
}
