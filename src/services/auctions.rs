use crate::{
    db::DbPool,
    entities::{
        bid::{self, ActiveModel as BidActiveModel, Entity as BidEntity, Model as BidModel},
        item::{self, ActiveModel as ItemActiveModel, Entity as ItemEntity},
        vendor::Entity as VendorEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::item::BiddingStatus,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PlaceBidRequest {
    pub vendor_id: Uuid,
    pub bid_amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceBidResponse {
    pub item_id: Uuid,
    pub current_highest_bid: Decimal,
    pub winning_bidder_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub vendor_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<BidModel> for BidResponse {
    fn from(model: BidModel) -> Self {
        BidResponse {
            id: model.id,
            item_id: model.item_id,
            vendor_id: model.vendor_id,
            amount: model.amount,
            created_at: model.created_at,
        }
    }
}

/// Service for the per-item auction state machine: draft -> open -> closed.
///
/// Bid placement is the one operation in the system that needs per-item
/// serialization; the highest-bid write is a guarded update that only lands
/// when the stored bid is still below the offered amount.
#[derive(Clone)]
pub struct AuctionService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl AuctionService {
    /// Creates a new auction service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send auction event");
            }
        }
    }

    /// Places a bid on an open auction.
    ///
    /// The read-validate-write sequence runs inside a single transaction and
    /// the write itself is conditional on `current_highest_bid < amount`, so
    /// two concurrent bids can never both land on a stale read: the loser of
    /// the race sees zero affected rows and is rejected.
    #[instrument(skip(self, request), fields(item_id = %item_id, vendor_id = %request.vendor_id, amount = %request.bid_amount))]
    pub async fn place_bid(
        &self,
        item_id: Uuid,
        request: PlaceBidRequest,
    ) -> Result<PlaceBidResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to start transaction for bid placement");
            ServiceError::DatabaseError(e)
        })?;

        let item = ItemEntity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        VendorEntity::find_by_id(request.vendor_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Vendor not found".to_string()))?;

        if item.bidding_status != Some(BiddingStatus::Open) {
            return Err(ServiceError::InvalidOperation(
                "Auction is not open".to_string(),
            ));
        }
        if let Some(end_date) = item.bidding_end_date {
            if now >= end_date {
                return Err(ServiceError::InvalidOperation(
                    "Auction has ended".to_string(),
                ));
            }
        }

        let current_highest = item.current_highest_bid.unwrap_or(Decimal::ZERO);
        if request.bid_amount <= current_highest {
            return Err(ServiceError::ValidationError(
                "Bid must be higher than current highest bid".to_string(),
            ));
        }

        // Guarded write: lands only while the stored bid is still lower.
        let update = ItemEntity::update_many()
            .col_expr(
                item::Column::CurrentHighestBid,
                Expr::value(request.bid_amount),
            )
            .col_expr(
                item::Column::WinningBidderId,
                Expr::value(request.vendor_id),
            )
            .col_expr(item::Column::UpdatedAt, Expr::value(now))
            .col_expr(
                item::Column::Version,
                Expr::col(item::Column::Version).add(1),
            )
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::BiddingStatus.eq(BiddingStatus::Open))
            .filter(item::Column::CurrentHighestBid.lt(request.bid_amount))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to write highest bid");
                ServiceError::DatabaseError(e)
            })?;

        if update.rows_affected == 0 {
            // A concurrent bid moved the highest past ours between the read
            // and the write; the caller must re-fetch and bid again.
            return Err(ServiceError::Conflict(
                "Bid must exceed the current highest bid".to_string(),
            ));
        }

        let bid_active_model = BidActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(item_id),
            vendor_id: Set(request.vendor_id),
            amount: Set(request.bid_amount),
            created_at: Set(now),
        };
        bid_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to record bid");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to commit bid placement transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, amount = %request.bid_amount, "Bid accepted");
        self.emit(Event::BidPlaced {
            item_id,
            vendor_id: request.vendor_id,
            amount: request.bid_amount,
        })
        .await;

        Ok(PlaceBidResponse {
            item_id,
            current_highest_bid: request.bid_amount,
            winning_bidder_id: request.vendor_id,
        })
    }

    /// Closes an open auction. The winner is whoever holds the highest bid
    /// at close time; closing never schedules a pickup.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn close_auction(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to start transaction for auction close");
            ServiceError::DatabaseError(e)
        })?;

        let item = ItemEntity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        if item.bidding_status != Some(BiddingStatus::Open) {
            return Err(ServiceError::Conflict(
                "Auction already closed or not open".to_string(),
            ));
        }

        let next_version = item.version + 1;
        let mut active: ItemActiveModel = item.into();
        active.bidding_status = Set(Some(BiddingStatus::Closed));
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        active.update(&txn).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to close auction");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to commit auction close transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, "Auction closed");
        self.emit(Event::AuctionClosed(item_id)).await;

        Ok(())
    }

    /// Closes every open auction whose end date has passed and returns the
    /// number of items actually transitioned. Idempotent: a second sweep
    /// over the same state closes nothing.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let result = ItemEntity::update_many()
            .col_expr(
                item::Column::BiddingStatus,
                Expr::value(BiddingStatus::Closed),
            )
            .col_expr(item::Column::UpdatedAt, Expr::value(now))
            .filter(item::Column::BiddingStatus.eq(BiddingStatus::Open))
            .filter(item::Column::BiddingEndDate.lte(now))
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Auction sweep failed");
                ServiceError::DatabaseError(e)
            })?;

        let closed = result.rows_affected;
        info!(closed = closed, "Auction sweep completed");
        self.emit(Event::AuctionsSwept { closed }).await;

        Ok(closed)
    }

    /// Lists the accepted bid history for an item, newest first.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn list_bids(&self, item_id: Uuid) -> Result<Vec<BidResponse>, ServiceError> {
        let db = &*self.db_pool;

        ItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        let bids = BidEntity::find()
            .filter(bid::Column::ItemId.eq(item_id))
            .order_by_desc(bid::Column::CreatedAt)
            // Accepted amounts are strictly increasing, so this breaks
            // same-timestamp ties without changing the ordering contract
            .order_by_desc(bid::Column::Amount)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to list bids");
                ServiceError::DatabaseError(e)
            })?;

        Ok(bids.into_iter().map(Into::into).collect())
    }
}

/// Spawns the periodic sweep loop. Disabled entirely when the interval is
/// not configured; the HTTP trigger remains available either way.
pub fn start_sweep_worker(
    service: AuctionService,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting auction sweep worker");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = service.sweep_expired().await {
                error!(error = %e, "Periodic auction sweep failed");
            }
        }
    })
}
