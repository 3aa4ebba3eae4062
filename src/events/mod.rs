use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::item::ItemStatus;

/// Sender half of the domain event pipeline. Cheap to clone; handed to every
/// service so mutations can announce themselves without coupling to the
/// consumer.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Item events
    ItemCreated(Uuid),
    ItemUpdated(Uuid),
    ItemDeleted(Uuid),
    ItemStatusChanged {
        item_id: Uuid,
        old_status: ItemStatus,
        new_status: ItemStatus,
    },
    ItemDisposed {
        item_id: Uuid,
        disposed_by: String,
    },

    // Auction events
    ItemListedForAuction(Uuid),
    BidPlaced {
        item_id: Uuid,
        vendor_id: Uuid,
        amount: Decimal,
    },
    AuctionClosed(Uuid),
    AuctionsSwept {
        closed: u64,
    },

    // Pickup events
    PickupScheduled {
        pickup_id: Uuid,
        vendor_id: Uuid,
        item_count: usize,
    },

    // Vendor events
    VendorCreated(Uuid),
    VendorUpdated(Uuid),
    VendorDeleted(Uuid),
    VendorCertificationChanged {
        vendor_id: Uuid,
        certified: bool,
    },

    // Campaign events
    CampaignJoined {
        campaign_id: String,
        user_email: String,
    },
    CampaignLeft {
        campaign_id: String,
        user_email: String,
    },
}

/// Background consumer for the event channel. The current pipeline is
/// log-only; the channel boundary exists so a real fan-out (notifications,
/// webhooks) can be added without touching the services.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = rx.recv().await {
        match &event {
            Event::ItemStatusChanged {
                item_id,
                old_status,
                new_status,
            } => {
                info!(item_id = %item_id, from = %old_status, to = %new_status, "item status changed");
            }
            Event::BidPlaced {
                item_id,
                vendor_id,
                amount,
            } => {
                info!(item_id = %item_id, vendor_id = %vendor_id, amount = %amount, "bid placed");
            }
            Event::AuctionsSwept { closed } => {
                if *closed > 0 {
                    info!(closed = closed, "auction sweep closed expired auctions");
                }
            }
            other => {
                info!(event = ?other, "domain event");
            }
        }
    }
    warn!("Event processor channel closed; exiting");
}
