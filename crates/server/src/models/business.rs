//! Business domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taboor_core::{BusinessId, UserId};

/// A service provider listed on the platform.
///
/// Businesses are never hard-deleted; `is_active` flips on deactivation.
#[derive(Debug, Clone, Serialize)]
pub struct Business {
    /// Unique business ID.
    pub id: BusinessId,
    /// Provider name.
    pub name: String,
    /// Free-form category (e.g. "Barber", "Car Wash").
    pub category: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Geolocation latitude.
    pub latitude: Option<f64>,
    /// Geolocation longitude.
    pub longitude: Option<f64>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Optional owning user account.
    pub owner_user_id: Option<UserId>,
    /// Whether the business is listed.
    pub is_active: bool,
    /// When the business registered.
    pub created_at: DateTime<Utc>,
}
