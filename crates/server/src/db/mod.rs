//! Database operations for the Taboor `SQLite` store.
//!
//! # Tables
//!
//! - `users` - Local accounts (argon2 password hashes)
//! - `businesses` - Service providers (soft-deactivated, never deleted)
//! - `services` - Services offered by a business
//! - `queues` - Waitlists per business, optionally scoped to one service
//! - `queue_members` - Append-only participation history with per-queue
//!   ticket numbers
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p taboor-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub mod businesses;
pub mod queue_members;
pub mod queues;
pub mod services;
pub mod users;

pub use businesses::BusinessRepository;
pub use queue_members::QueueMemberRepository;
pub use queues::QueueRepository;
pub use services::ServiceRepository;
pub use users::UserRepository;

/// Embedded migrations from `crates/server/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row does not exist.
    #[error("not found")]
    NotFound,

    /// Unique-constraint conflict. Retryable for ticket allocation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A guarded update found the row in an unexpected state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Stored data failed validation on the way out.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// WAL journal mode, busy timeout and foreign-key enforcement are applied
/// to every connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create an in-memory pool for tests and ephemeral runs.
///
/// Capped at a single connection: every new `sqlite::memory:` connection
/// opens a separate empty database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    // idle/lifetime reclamation would drop the only connection and with it
    // the whole database
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    #[allow(clippy::unwrap_used)]
    let pool = create_memory_pool().await.unwrap();
    #[allow(clippy::unwrap_used)]
    MIGRATOR.run(&pool).await.unwrap();
    pool
}
