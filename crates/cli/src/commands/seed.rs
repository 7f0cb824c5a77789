//! Seed database with demo data.
//!
//! Creates a demo business with one service and one open queue, so a
//! fresh install has something to point the frontend at.

use tracing::info;

use taboor_server::db::businesses::{BusinessRepository, NewBusiness};
use taboor_server::db::queues::QueueRepository;
use taboor_server::db::services::{NewService, ServiceRepository};
use taboor_server::db::{self, RepositoryError};

use super::CommandError;

impl From<RepositoryError> for CommandError {
    fn from(e: RepositoryError) -> Self {
        Self::Seed(e.to_string())
    }
}

/// Seed the database with a demo business, service and queue.
///
/// # Errors
///
/// Returns an error if the database URL is missing or inserts fail.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let business = BusinessRepository::new(&pool)
        .create(&NewBusiness {
            name: "Demo Barbershop".to_owned(),
            category: Some("Barber".to_owned()),
            address: Some("1 Demo Street".to_owned()),
            latitude: Some(24.7136),
            longitude: Some(46.6753),
            phone: Some("0500000000".to_owned()),
            owner_user_id: None,
        })
        .await?;
    info!(business_id = %business.id, "Created demo business");

    let service = ServiceRepository::new(&pool)
        .create(&NewService {
            business_id: business.id,
            name: "Haircut".to_owned(),
            description: Some("Classic haircut".to_owned()),
            duration_minutes: 20,
            price: 50.0,
        })
        .await?;
    info!(service_id = %service.id, "Created demo service");

    let queue = QueueRepository::new(&pool)
        .create(business.id, Some(service.id))
        .await?;
    info!(queue_id = %queue.id, status = %queue.status, "Created demo queue");

    info!("Seeding complete!");
    Ok(())
}
