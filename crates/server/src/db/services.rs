//! Service repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taboor_core::{BusinessId, ServiceId};

use super::RepositoryError;
use crate::models::Service;

/// Default average minutes per customer when a service doesn't specify one.
pub const DEFAULT_DURATION_MINUTES: i64 = 15;

/// Fields for creating a new service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub business_id: BusinessId,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price: f64,
}

/// Repository for service database operations.
pub struct ServiceRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    business_id: i64,
    name: String,
    description: Option<String>,
    duration_minutes: i64,
    price: f64,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        Service {
            id: ServiceId::new(self.id),
            business_id: BusinessId::new(self.business_id),
            name: self.name,
            description: self.description,
            duration_minutes: self.duration_minutes,
            price: self.price,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

const SERVICE_COLUMNS: &str =
    "id, business_id, name, description, duration_minutes, price, is_active, created_at";

impl<'a> ServiceRepository<'a> {
    /// Create a new service repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a service to a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewService) -> Result<Service, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r"
            INSERT INTO services
                (business_id, name, description, duration_minutes, price, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {SERVICE_COLUMNS}
            ",
        ))
        .bind(new.business_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.duration_minutes)
        .bind(new.price)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_service())
    }

    /// Get a service by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?",
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ServiceRow::into_service))
    }

    /// List active services for one business, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            r"
            SELECT {SERVICE_COLUMNS} FROM services
            WHERE business_id = ? AND is_active = 1
            ORDER BY id DESC
            ",
        ))
        .bind(business_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::businesses::{BusinessRepository, NewBusiness};
    use crate::db::test_pool;

    async fn seed_business(pool: &SqlitePool) -> BusinessId {
        BusinessRepository::new(pool)
            .create(&NewBusiness {
                name: "Test Biz".to_owned(),
                ..NewBusiness::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;
        let business_id = seed_business(&pool).await;
        let repo = ServiceRepository::new(&pool);

        let service = repo
            .create(&NewService {
                business_id,
                name: "Haircut".to_owned(),
                description: Some("Classic cut".to_owned()),
                duration_minutes: 20,
                price: 50.0,
            })
            .await
            .unwrap();

        assert_eq!(service.duration_minutes, 20);
        assert!(service.is_active);

        let listed = repo.list_for_business(business_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Haircut");
    }

    #[tokio::test]
    async fn test_list_scoped_to_business() {
        let pool = test_pool().await;
        let first = seed_business(&pool).await;
        let second = seed_business(&pool).await;
        let repo = ServiceRepository::new(&pool);

        repo.create(&NewService {
            business_id: first,
            name: "Only Here".to_owned(),
            description: None,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            price: 0.0,
        })
        .await
        .unwrap();

        assert_eq!(repo.list_for_business(first).await.unwrap().len(), 1);
        assert!(repo.list_for_business(second).await.unwrap().is_empty());
    }
}
