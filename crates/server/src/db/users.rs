//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use taboor_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

/// `SQLite` row representation of a user, without the password hash.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email,
            phone: self.phone,
            created_at: self.created_at,
        })
    }
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        phone: Option<&str>,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, phone, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, phone, created_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if no user has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserHashRow {
            id: i64,
            name: String,
            email: String,
            phone: Option<String>,
            password_hash: String,
            created_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, UserHashRow>(
            r"
            SELECT id, name, email, phone, password_hash, created_at
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = UserRow {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            created_at: r.created_at,
        }
        .into_user()?;

        Ok(Some((user, r.password_hash)))
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let email = Email::parse("sara@example.com").unwrap();
        let user = repo
            .create("Sara", &email, Some("0501234567"), "argon2-hash")
            .await
            .unwrap();

        assert_eq!(user.name, "Sara");
        assert_eq!(user.email, email);
        assert_eq!(user.phone.as_deref(), Some("0501234567"));

        let by_id = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, email);

        let by_email = repo.get_by_email(&email).await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let email = Email::parse("dup@example.com").unwrap();
        repo.create("First", &email, None, "hash").await.unwrap();

        let err = repo.create("Second", &email, None, "hash").await;
        assert!(matches!(err, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let email = Email::parse("h@example.com").unwrap();
        repo.create("H", &email, None, "the-hash").await.unwrap();

        let (user, hash) = repo.get_with_password_hash(&email).await.unwrap().unwrap();
        assert_eq!(user.email, email);
        assert_eq!(hash, "the-hash");

        let missing = Email::parse("nobody@example.com").unwrap();
        assert!(
            repo.get_with_password_hash(&missing)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_users() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        for i in 1..=3 {
            let email = Email::parse(&format!("u{i}@example.com")).unwrap();
            repo.create(&format!("User {i}"), &email, None, "hash")
                .await
                .unwrap();
        }

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].name, "User 1");
    }
}
