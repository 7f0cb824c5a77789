//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! taboor-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TABOOR_DATABASE_URL` - `SQLite` connection string (fallback: `DATABASE_URL`)

use taboor_server::db;

use super::CommandError;

/// Run database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
