pub mod bills;
pub mod clients;
pub mod rates;
pub mod shipments;
pub mod vendors;
pub mod zones;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub clients: Arc<services::clients::ClientService>,
    pub vendors: Arc<services::vendors::VendorService>,
    pub zones: Arc<services::zones::ZoneService>,
    pub rates: Arc<services::rates::RateService>,
    pub shipments: Arc<services::shipments::ShipmentService>,
    pub billing: Arc<services::billing::BillingService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            clients: Arc::new(services::clients::ClientService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            vendors: Arc::new(services::vendors::VendorService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            zones: Arc::new(services::zones::ZoneService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            rates: Arc::new(services::rates::RateService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            shipments: Arc::new(services::shipments::ShipmentService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            billing: Arc::new(services::billing::BillingService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
