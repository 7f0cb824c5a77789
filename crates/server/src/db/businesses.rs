//! Business repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taboor_core::{BusinessId, UserId};

use super::RepositoryError;
use crate::models::Business;

/// Fields for registering a new business.
#[derive(Debug, Clone, Default)]
pub struct NewBusiness {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub owner_user_id: Option<UserId>,
}

/// Repository for business database operations.
pub struct BusinessRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: i64,
    name: String,
    category: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    phone: Option<String>,
    owner_user_id: Option<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl BusinessRow {
    fn into_business(self) -> Business {
        Business {
            id: BusinessId::new(self.id),
            name: self.name,
            category: self.category,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            phone: self.phone,
            owner_user_id: self.owner_user_id.map(UserId::new),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

const BUSINESS_COLUMNS: &str = "id, name, category, address, latitude, longitude, phone, \
                                owner_user_id, is_active, created_at";

impl<'a> BusinessRepository<'a> {
    /// Create a new business repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewBusiness) -> Result<Business, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(&format!(
            r"
            INSERT INTO businesses
                (name, category, address, latitude, longitude, phone, owner_user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {BUSINESS_COLUMNS}
            ",
        ))
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.address)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.phone)
        .bind(new.owner_user_id)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_business())
    }

    /// Get a business by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = ?",
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(BusinessRow::into_business))
    }

    /// List active businesses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Business>, RepositoryError> {
        let rows = sqlx::query_as::<_, BusinessRow>(&format!(
            r"
            SELECT {BUSINESS_COLUMNS} FROM businesses
            WHERE is_active = 1
            ORDER BY created_at DESC, id DESC
            ",
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(BusinessRow::into_business).collect())
    }
}
