//! Service domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taboor_core::{BusinessId, ServiceId};

/// A service offered by a business.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    /// Unique service ID.
    pub id: ServiceId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Service name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Average minutes per customer; feeds the queue wait estimate.
    pub duration_minutes: i64,
    /// Price in the business's currency.
    pub price: f64,
    /// Whether the service is offered.
    pub is_active: bool,
    /// When the service was created.
    pub created_at: DateTime<Utc>,
}
