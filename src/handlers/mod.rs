pub mod analytics;
pub mod auctions;
pub mod campaigns;
pub mod common;
pub mod compliance;
pub mod items;
pub mod pickups;
pub mod vendors;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<crate::services::items::ItemService>,
    pub auctions: Arc<crate::services::auctions::AuctionService>,
    pub pickups: Arc<crate::services::pickups::PickupService>,
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub analytics: Arc<crate::services::analytics::AnalyticsService>,
    pub compliance: Arc<crate::services::compliance::ComplianceService>,
    pub campaigns: Arc<crate::services::campaigns::CampaignService>,
}

impl AppServices {
    /// Build the AppServices container shared by all HTTP handlers.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let items = Arc::new(crate::services::items::ItemService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let auctions = Arc::new(crate::services::auctions::AuctionService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let pickups = Arc::new(crate::services::pickups::PickupService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let analytics = Arc::new(crate::services::analytics::AnalyticsService::new(
            db_pool.clone(),
        ));
        let compliance = Arc::new(crate::services::compliance::ComplianceService::new(
            db_pool.clone(),
        ));
        let campaigns = Arc::new(crate::services::campaigns::CampaignService::new(
            db_pool,
            Some(event_sender),
        ));

        Self {
            items,
            auctions,
            pickups,
            vendors,
            analytics,
            compliance,
            campaigns,
        }
    }
}
