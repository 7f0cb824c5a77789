//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taboor_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password hash deliberately does not live on this type; it is only
/// ever read by the auth service and never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address (unique).
    pub email: Email,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
