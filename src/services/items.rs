use crate::{
    db::DbPool,
    entities::item::{self, ActiveModel as ItemActiveModel, Entity as ItemEntity, Model as ItemModel},
    errors::ServiceError,
    events::{Event, EventSender},
    models::item::{
        AuctionState, AuditEntry, AuditTrail, BiddingStatus, Category, Classification, Condition,
        Department, DisposalEntry, DisposalHistory, ItemStatus,
    },
    services::{classification::classify, ownership::ensure_owner},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the item service
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub department: Department,
    pub category: Category,
    #[serde(default)]
    #[validate(range(min = 0, message = "Age in months must be non-negative"))]
    pub age_months: i32,
    pub condition: Condition,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "created_by is required"))]
    pub created_by: String,
    /// Present when the item is listed for auction at creation time.
    pub auction: Option<ListForAuctionRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListForAuctionRequest {
    pub starting_bid: Decimal,
    pub bidding_end_date: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub department: Option<Department>,
    pub category: Option<Category>,
    #[validate(range(min = 0, message = "Age in months must be non-negative"))]
    pub age_months: Option<i32>,
    pub condition: Option<Condition>,
    pub notes: Option<String>,
    /// Explicit classification override; when absent the stored
    /// classification is kept.
    pub classification: Option<Classification>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "user_email is required"))]
    pub user_email: String,
    pub status: ItemStatus,
    /// Free-form stage label for the audit trail; defaults to the status name.
    pub stage: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DisposeRequest {
    #[validate(length(min = 1, message = "user_email is required"))]
    pub user_email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub tag_id: String,
    pub name: String,
    pub department: Department,
    pub category: Category,
    pub age_months: i32,
    pub condition: Condition,
    pub notes: Option<String>,
    pub classification: Classification,
    pub status: ItemStatus,
    pub created_by: String,
    pub pickup_id: Option<Uuid>,
    pub audit_trail: Vec<AuditEntry>,
    pub disposal_history: Vec<DisposalEntry>,
    pub disposed_at: Option<DateTime<Utc>>,
    pub disposed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction: Option<AuctionState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

impl From<ItemModel> for ItemResponse {
    fn from(model: ItemModel) -> Self {
        let auction = model.bidding_status.map(|bidding_status| AuctionState {
            bidding_status,
            starting_bid: model.starting_bid.unwrap_or(Decimal::ZERO),
            current_highest_bid: model.current_highest_bid.unwrap_or(Decimal::ZERO),
            bidding_end_date: model.bidding_end_date,
            winning_bidder_id: model.winning_bidder_id,
        });

        ItemResponse {
            id: model.id,
            tag_id: model.tag_id,
            name: model.name,
            department: model.department,
            category: model.category,
            age_months: model.age_months,
            condition: model.condition,
            notes: model.notes,
            classification: Classification {
                kind: model.classification_type,
                notes: model.classification_notes,
            },
            status: model.status,
            created_by: model.created_by,
            pickup_id: model.pickup_id,
            audit_trail: model.audit_trail.0,
            disposal_history: model.disposal_history.0,
            disposed_at: model.disposed_at,
            disposed_by: model.disposed_by,
            auction,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        }
    }
}

/// Service for managing e-waste items and their lifecycle
#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ItemService {
    /// Creates a new item service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send item event");
            }
        }
    }

    /// Creates a new item, deriving its classification; optionally lists it
    /// for auction when the request carries auction fields.
    #[instrument(skip(self, request), fields(name = %request.name, created_by = %request.created_by))]
    pub async fn create_item(&self, request: CreateItemRequest) -> Result<ItemResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let now = Utc::now();
        if let Some(auction) = &request.auction {
            if auction.starting_bid < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Starting bid must not be negative".to_string(),
                ));
            }
            if auction.bidding_end_date <= now {
                return Err(ServiceError::ValidationError(
                    "Bidding end date must be in the future".to_string(),
                ));
            }
        }

        let item_id = Uuid::new_v4();
        let tag_id = format!("ew-{}", &item_id.simple().to_string()[..8]);
        let classification = classify(
            &request.name,
            request.notes.as_deref(),
            request.category,
            request.condition,
            request.age_months,
        );

        let (bidding_status, starting_bid, current_highest_bid, bidding_end_date) =
            match &request.auction {
                Some(auction) => (
                    Set(Some(BiddingStatus::Open)),
                    Set(Some(auction.starting_bid)),
                    Set(Some(auction.starting_bid)),
                    Set(Some(auction.bidding_end_date)),
                ),
                None => (Set(None), Set(None), Set(None), Set(None)),
            };

        let listed_for_auction = request.auction.is_some();

        let item_active_model = ItemActiveModel {
            id: Set(item_id),
            tag_id: Set(tag_id),
            name: Set(request.name),
            department: Set(request.department),
            category: Set(request.category),
            age_months: Set(request.age_months),
            condition: Set(request.condition),
            notes: Set(request.notes),
            classification_type: Set(classification.kind),
            classification_notes: Set(classification.notes),
            status: Set(ItemStatus::Reported),
            created_by: Set(request.created_by),
            pickup_id: Set(None),
            audit_trail: Set(AuditTrail::default()),
            disposal_history: Set(DisposalHistory::default()),
            disposed_at: Set(None),
            disposed_by: Set(None),
            bidding_status,
            starting_bid,
            current_highest_bid,
            bidding_end_date,
            winning_bidder_id: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            version: Set(1),
        };

        let db = &*self.db_pool;
        let item_model = item_active_model.insert(db).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to create item in database");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, "Item created successfully");

        self.emit(Event::ItemCreated(item_id)).await;
        if listed_for_auction {
            self.emit(Event::ItemListedForAuction(item_id)).await;
        }

        Ok(item_model.into())
    }

    /// Retrieves an item by ID
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<Option<ItemResponse>, ServiceError> {
        let db = &*self.db_pool;

        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to fetch item from database");
                ServiceError::DatabaseError(e)
            })?;

        Ok(item.map(Into::into))
    }

    /// Lists items, newest first, optionally filtered by owner.
    #[instrument(skip(self))]
    pub async fn list_items(&self, owner: Option<&str>) -> Result<Vec<ItemResponse>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = ItemEntity::find().order_by_desc(item::Column::CreatedAt);
        if let Some(owner) = owner {
            query = query.filter(item::Column::CreatedBy.eq(owner));
        }

        let items = query.all(db).await.map_err(|e| {
            error!(error = %e, "Failed to list items");
            ServiceError::DatabaseError(e)
        })?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Lists items with an open auction, soonest-ending first.
    #[instrument(skip(self))]
    pub async fn list_biddable(&self) -> Result<Vec<ItemResponse>, ServiceError> {
        let db = &*self.db_pool;

        let items = ItemEntity::find()
            .filter(item::Column::BiddingStatus.eq(BiddingStatus::Open))
            .order_by_asc(item::Column::BiddingEndDate)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list biddable items");
                ServiceError::DatabaseError(e)
            })?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Applies a partial update to an item owned by `actor`.
    ///
    /// The stored classification is kept unless the request carries an
    /// explicit override; lifecycle status is never writable through this
    /// path.
    #[instrument(skip(self, request), fields(item_id = %item_id, actor = %actor))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        actor: &str,
        request: UpdateItemRequest,
    ) -> Result<ItemResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Item name must not be empty".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        ensure_owner("Item", &item.created_by, actor)?;

        let next_version = item.version + 1;
        let mut active: ItemActiveModel = item.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(department) = request.department {
            active.department = Set(department);
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(age_months) = request.age_months {
            active.age_months = Set(age_months);
        }
        if let Some(condition) = request.condition {
            active.condition = Set(condition);
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(classification) = request.classification {
            active.classification_type = Set(classification.kind);
            active.classification_notes = Set(classification.notes);
        }
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to update item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, "Item updated successfully");
        self.emit(Event::ItemUpdated(item_id)).await;

        Ok(updated.into())
    }

    /// Deletes an item owned by `actor`.
    #[instrument(skip(self), fields(item_id = %item_id, actor = %actor))]
    pub async fn delete_item(&self, item_id: Uuid, actor: &str) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        ensure_owner("Item", &item.created_by, actor)?;

        ItemEntity::delete_by_id(item_id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to delete item");
                ServiceError::DatabaseError(e)
            })?;

        info!(item_id = %item_id, "Item deleted successfully");
        self.emit(Event::ItemDeleted(item_id)).await;

        Ok(())
    }

    /// Advances an item's lifecycle status through the transition table,
    /// appending the audit entry in the same transaction as the status write.
    #[instrument(skip(self, request), fields(item_id = %item_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        item_id: Uuid,
        request: UpdateStatusRequest,
    ) -> Result<ItemResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        if request.status == ItemStatus::Decomposed {
            return Err(ServiceError::InvalidOperation(
                "Use the dispose operation to decompose an item".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let item = ItemEntity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        ensure_owner("Item", &item.created_by, &request.user_email)?;

        let old_status = item.status;
        let new_status = request.status;
        if !old_status.can_transition_to(new_status) {
            warn!(item_id = %item_id, from = %old_status, to = %new_status, "Illegal status transition rejected");
            return Err(ServiceError::ValidationError(format!(
                "Cannot transition from status '{}' to '{}'",
                old_status, new_status
            )));
        }

        let stage = request
            .stage
            .unwrap_or_else(|| new_status.to_string());
        let now = Utc::now();

        let mut audit_trail = item.audit_trail.clone();
        audit_trail.0.push(AuditEntry {
            date: now,
            user: request.user_email.clone(),
            stage,
            status: new_status,
        });

        let next_version = item.version + 1;
        let mut active: ItemActiveModel = item.into();
        active.status = Set(new_status);
        active.audit_trail = Set(audit_trail);
        active.updated_at = Set(Some(now));
        active.version = Set(next_version);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to update item status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to commit status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, old_status = %old_status, new_status = %new_status, "Item status updated");
        self.emit(Event::ItemStatusChanged {
            item_id,
            old_status,
            new_status,
        })
        .await;

        Ok(updated.into())
    }

    /// Terminally disposes an item (status Decomposed), writing the disposal
    /// record in the same transaction. Disposing an already-decomposed item
    /// is rejected and leaves the disposal history untouched.
    #[instrument(skip(self, request), fields(item_id = %item_id))]
    pub async fn dispose(
        &self,
        item_id: Uuid,
        request: DisposeRequest,
    ) -> Result<ItemResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to start transaction for disposal");
            ServiceError::DatabaseError(e)
        })?;

        let item = ItemEntity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        ensure_owner("Item", &item.created_by, &request.user_email)?;

        if item.status == ItemStatus::Decomposed {
            return Err(ServiceError::Conflict(
                "Item has already been decomposed".to_string(),
            ));
        }
        if !item.status.can_transition_to(ItemStatus::Decomposed) {
            return Err(ServiceError::ValidationError(format!(
                "Cannot dispose an item in terminal status '{}'",
                item.status
            )));
        }

        let now = Utc::now();
        let mut disposal_history = item.disposal_history.clone();
        disposal_history.0.push(DisposalEntry {
            date: now,
            user: request.user_email.clone(),
            action: "Decomposed".to_string(),
        });

        let old_status = item.status;
        let next_version = item.version + 1;
        let mut active: ItemActiveModel = item.into();
        active.status = Set(ItemStatus::Decomposed);
        active.disposal_history = Set(disposal_history);
        active.disposed_at = Set(Some(now));
        active.disposed_by = Set(Some(request.user_email.clone()));
        active.updated_at = Set(Some(now));
        active.version = Set(next_version);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to dispose item");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to commit disposal transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, old_status = %old_status, "Item disposed");
        self.emit(Event::ItemDisposed {
            item_id,
            disposed_by: request.user_email,
        })
        .await;

        Ok(updated.into())
    }
}
