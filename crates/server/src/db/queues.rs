//! Queue repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taboor_core::{BusinessId, QueueId, QueueStatus, ServiceId};

use super::RepositoryError;
use crate::models::{Queue, QueueOverview, QueueSummary};

/// Repository for queue database operations.
pub struct QueueRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct QueueRow {
    id: i64,
    business_id: i64,
    service_id: Option<i64>,
    status: QueueStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QueueRow {
    fn into_queue(self) -> Queue {
        Queue {
            id: QueueId::new(self.id),
            business_id: BusinessId::new(self.business_id),
            service_id: self.service_id.map(ServiceId::new),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const QUEUE_COLUMNS: &str = "id, business_id, service_id, status, created_at, updated_at";

impl<'a> QueueRepository<'a> {
    /// Create a new queue repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a queue for a business, optionally scoped to one service.
    ///
    /// New queues start in [`QueueStatus::Open`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        business_id: BusinessId,
        service_id: Option<ServiceId>,
    ) -> Result<Queue, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, QueueRow>(&format!(
            r"
            INSERT INTO queues (business_id, service_id, status, created_at, updated_at)
            VALUES (?, ?, 'open', ?, ?)
            RETURNING {QUEUE_COLUMNS}
            ",
        ))
        .bind(business_id)
        .bind(service_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_queue())
    }

    /// Get a queue by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: QueueId) -> Result<Option<Queue>, RepositoryError> {
        let row = sqlx::query_as::<_, QueueRow>(&format!(
            "SELECT {QUEUE_COLUMNS} FROM queues WHERE id = ?",
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(QueueRow::into_queue))
    }

    /// List queues of one business with service names joined in,
    /// most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<QueueSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            #[sqlx(flatten)]
            queue: QueueRow,
            service_name: Option<String>,
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT q.id, q.business_id, q.service_id, q.status, q.created_at, q.updated_at,
                   s.name AS service_name
            FROM queues q
            LEFT JOIN services s ON s.id = q.service_id
            WHERE q.business_id = ?
            ORDER BY q.updated_at DESC, q.id DESC
            ",
        )
        .bind(business_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| QueueSummary {
                queue: r.queue.into_queue(),
                service_name: r.service_name,
            })
            .collect())
    }

    /// Update a queue's status, guarded on the expected current status.
    ///
    /// The caller validates the transition against the state machine first;
    /// the guard only protects against a concurrent writer changing the
    /// status between that check and this update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidState` if the queue was not in
    /// `expected` status anymore, `RepositoryError::NotFound` if it does
    /// not exist.
    pub async fn update_status(
        &self,
        id: QueueId,
        expected: QueueStatus,
        next: QueueStatus,
    ) -> Result<Queue, RepositoryError> {
        let row = sqlx::query_as::<_, QueueRow>(&format!(
            r"
            UPDATE queues
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            RETURNING {QUEUE_COLUMNS}
            ",
        ))
        .bind(next)
        .bind(Utc::now())
        .bind(id)
        .bind(expected)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(r.into_queue()),
            None => {
                let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM queues WHERE id = ?")
                    .bind(id)
                    .fetch_optional(self.pool)
                    .await?;

                if exists.is_none() {
                    Err(RepositoryError::NotFound)
                } else {
                    Err(RepositoryError::InvalidState(format!(
                        "queue {id} is no longer {expected}"
                    )))
                }
            }
        }
    }

    /// Get a queue with its business and service names joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_overview(&self, id: QueueId) -> Result<Option<QueueOverview>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct OverviewRow {
            #[sqlx(flatten)]
            queue: QueueRow,
            business_name: String,
            service_name: Option<String>,
        }

        let row = sqlx::query_as::<_, OverviewRow>(
            r"
            SELECT q.id, q.business_id, q.service_id, q.status, q.created_at, q.updated_at,
                   b.name AS business_name,
                   s.name AS service_name
            FROM queues q
            JOIN businesses b ON b.id = q.business_id
            LEFT JOIN services s ON s.id = q.service_id
            WHERE q.id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| QueueOverview {
            queue: r.queue.into_queue(),
            business_name: r.business_name,
            service_name: r.service_name,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::businesses::{BusinessRepository, NewBusiness};
    use crate::db::services::{NewService, ServiceRepository};
    use crate::db::test_pool;

    async fn seed_business(pool: &SqlitePool, name: &str) -> BusinessId {
        BusinessRepository::new(pool)
            .create(&NewBusiness {
                name: name.to_owned(),
                ..NewBusiness::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_defaults_open() {
        let pool = test_pool().await;
        let business_id = seed_business(&pool, "Biz").await;
        let repo = QueueRepository::new(&pool);

        let queue = repo.create(business_id, None).await.unwrap();
        assert_eq!(queue.status, QueueStatus::Open);
        assert!(queue.service_id.is_none());

        let fetched = repo.get_by_id(queue.id).await.unwrap().unwrap();
        assert_eq!(fetched.business_id, business_id);
    }

    #[tokio::test]
    async fn test_guarded_status_update() {
        let pool = test_pool().await;
        let business_id = seed_business(&pool, "Biz").await;
        let repo = QueueRepository::new(&pool);

        let queue = repo.create(business_id, None).await.unwrap();

        let paused = repo
            .update_status(queue.id, QueueStatus::Open, QueueStatus::Paused)
            .await
            .unwrap();
        assert_eq!(paused.status, QueueStatus::Paused);

        // Stale expected status is rejected
        let err = repo
            .update_status(queue.id, QueueStatus::Open, QueueStatus::Closed)
            .await;
        assert!(matches!(err, Err(RepositoryError::InvalidState(_))));

        // Unknown queue
        let err = repo
            .update_status(QueueId::new(999), QueueStatus::Open, QueueStatus::Paused)
            .await;
        assert!(matches!(err, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_includes_service_name() {
        let pool = test_pool().await;
        let business_id = seed_business(&pool, "Biz").await;
        let service = ServiceRepository::new(&pool)
            .create(&NewService {
                business_id,
                name: "Beard Trim".to_owned(),
                description: None,
                duration_minutes: 10,
                price: 25.0,
            })
            .await
            .unwrap();
        let repo = QueueRepository::new(&pool);

        repo.create(business_id, Some(service.id)).await.unwrap();
        repo.create(business_id, None).await.unwrap();

        let queues = repo.list_for_business(business_id).await.unwrap();
        assert_eq!(queues.len(), 2);
        let named: Vec<_> = queues.iter().filter_map(|q| q.service_name.clone()).collect();
        assert_eq!(named, vec!["Beard Trim".to_owned()]);
    }

    #[tokio::test]
    async fn test_overview_joins_names() {
        let pool = test_pool().await;
        let business_id = seed_business(&pool, "TestBiz").await;
        let repo = QueueRepository::new(&pool);

        let queue = repo.create(business_id, None).await.unwrap();
        let overview = repo.get_overview(queue.id).await.unwrap().unwrap();
        assert_eq!(overview.business_name, "TestBiz");
        assert!(overview.service_name.is_none());

        assert!(repo.get_overview(QueueId::new(42)).await.unwrap().is_none());
    }
}
