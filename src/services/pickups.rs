use crate::{
    db::DbPool,
    entities::{
        item::{self, ActiveModel as ItemActiveModel, Entity as ItemEntity},
        pickup::{self, ActiveModel as PickupActiveModel, Entity as PickupEntity, ItemIdList, Model as PickupModel},
        vendor::{self, Entity as VendorEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::item::{AuditEntry, ItemStatus},
    services::{items::ItemResponse, vendors::VendorResponse},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePickupRequest {
    pub vendor_id: Uuid,
    #[validate(length(min = 1, message = "itemIds must not be empty"))]
    pub item_ids: Vec<Uuid>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "created_by is required"))]
    pub created_by: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PickupResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub vendor_id: Uuid,
    pub item_ids: Vec<Uuid>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<PickupModel> for PickupResponse {
    fn from(model: PickupModel) -> Self {
        PickupResponse {
            id: model.id,
            date: model.date,
            vendor_id: model.vendor_id,
            item_ids: model.item_ids.0,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

/// Minimal item projection embedded in vendor-facing pickup listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct PickupItemSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VendorPickupResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub vendor_id: Uuid,
    pub items: Vec<PickupItemSummary>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything the scheduling screen needs for one owner: the vendor list,
/// the items still eligible for a pickup, and past pickups.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchedulingOverview {
    pub vendors: Vec<VendorResponse>,
    pub schedulable_items: Vec<ItemResponse>,
    pub pickups: Vec<PickupResponse>,
}

/// Service that groups items into vendor pickups. Creating a pickup is the
/// trigger that moves every referenced item from Reported to Scheduled.
#[derive(Clone)]
pub struct PickupService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PickupService {
    /// Creates a new pickup service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send pickup event");
            }
        }
    }

    /// Creates a pickup and transitions every referenced item to Scheduled.
    ///
    /// Runs as one transaction: either the pickup row exists and every item
    /// carries the new status, pickup linkage and audit entry, or nothing
    /// changed. Items that are missing, foreign, or not in Reported status
    /// fail the whole request.
    #[instrument(skip(self, request), fields(vendor_id = %request.vendor_id, item_count = request.item_ids.len()))]
    pub async fn create_pickup(
        &self,
        request: CreatePickupRequest,
    ) -> Result<PickupResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let pickup_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for pickup creation");
            ServiceError::DatabaseError(e)
        })?;

        VendorEntity::find_by_id(request.vendor_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Vendor not found".to_string()))?;

        let items = ItemEntity::find()
            .filter(item::Column::Id.is_in(request.item_ids.clone()))
            .all(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut by_id: HashMap<Uuid, item::Model> =
            items.into_iter().map(|m| (m.id, m)).collect();

        for item_id in &request.item_ids {
            // Missing items and items owned by someone else read the same,
            // so a pickup cannot be used to probe foreign inventory.
            let found = by_id
                .get(item_id)
                .filter(|m| m.created_by == request.created_by)
                .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;
            if found.status != ItemStatus::Reported {
                return Err(ServiceError::ValidationError(format!(
                    "Item {} is not schedulable (status '{}')",
                    item_id, found.status
                )));
            }
        }

        let pickup_active_model = PickupActiveModel {
            id: Set(pickup_id),
            date: Set(request.date),
            vendor_id: Set(request.vendor_id),
            item_ids: Set(ItemIdList(request.item_ids.clone())),
            notes: Set(request.notes.clone()),
            created_by: Set(request.created_by.clone()),
            created_at: Set(now),
        };
        let pickup_model = pickup_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, pickup_id = %pickup_id, "Failed to create pickup");
            ServiceError::DatabaseError(e)
        })?;

        for item_id in &request.item_ids {
            // A duplicated id collapses to one transition
            let Some(model) = by_id.remove(item_id) else {
                continue;
            };
            let mut audit_trail = model.audit_trail.clone();
            audit_trail.0.push(AuditEntry {
                date: now,
                user: request.created_by.clone(),
                stage: "Pickup scheduled".to_string(),
                status: ItemStatus::Scheduled,
            });

            let next_version = model.version + 1;
            let mut active: ItemActiveModel = model.into();
            active.status = Set(ItemStatus::Scheduled);
            active.pickup_id = Set(Some(pickup_id));
            active.audit_trail = Set(audit_trail);
            active.updated_at = Set(Some(now));
            active.version = Set(next_version);

            active.update(&txn).await.map_err(|e| {
                error!(error = %e, item_id = %item_id, "Failed to schedule item");
                ServiceError::DatabaseError(e)
            })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, pickup_id = %pickup_id, "Failed to commit pickup creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(pickup_id = %pickup_id, item_count = request.item_ids.len(), "Pickup scheduled");
        self.emit(Event::PickupScheduled {
            pickup_id,
            vendor_id: request.vendor_id,
            item_count: request.item_ids.len(),
        })
        .await;

        Ok(pickup_model.into())
    }

    /// Lists a vendor's pickups, soonest first, with item names resolved.
    #[instrument(skip(self), fields(vendor_id = %vendor_id))]
    pub async fn list_for_vendor(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<VendorPickupResponse>, ServiceError> {
        let db = &*self.db_pool;

        let pickups = PickupEntity::find()
            .filter(pickup::Column::VendorId.eq(vendor_id))
            .order_by_asc(pickup::Column::Date)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, vendor_id = %vendor_id, "Failed to list vendor pickups");
                ServiceError::DatabaseError(e)
            })?;

        let all_item_ids: Vec<Uuid> = pickups
            .iter()
            .flat_map(|p| p.item_ids.0.iter().copied())
            .collect();

        let names: HashMap<Uuid, String> = if all_item_ids.is_empty() {
            HashMap::new()
        } else {
            ItemEntity::find()
                .filter(item::Column::Id.is_in(all_item_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .into_iter()
                .map(|m| (m.id, m.name))
                .collect()
        };

        Ok(pickups
            .into_iter()
            .map(|p| {
                let items = p
                    .item_ids
                    .0
                    .iter()
                    .filter_map(|id| {
                        names.get(id).map(|name| PickupItemSummary {
                            id: *id,
                            name: name.clone(),
                        })
                    })
                    .collect();
                VendorPickupResponse {
                    id: p.id,
                    date: p.date,
                    vendor_id: p.vendor_id,
                    items,
                    notes: p.notes,
                    created_at: p.created_at,
                }
            })
            .collect())
    }

    /// Gathers the scheduling screen data for one owner: vendors sorted by
    /// name, the owner's Reported items newest first, and the owner's
    /// pickups latest first.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn scheduling_overview(
        &self,
        owner: &str,
    ) -> Result<SchedulingOverview, ServiceError> {
        let db = &*self.db_pool;

        let vendors = VendorEntity::find()
            .order_by_asc(vendor::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let schedulable_items = ItemEntity::find()
            .filter(item::Column::CreatedBy.eq(owner))
            .filter(item::Column::Status.eq(ItemStatus::Reported))
            .order_by_desc(item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let pickups = PickupEntity::find()
            .filter(pickup::Column::CreatedBy.eq(owner))
            .order_by_desc(pickup::Column::Date)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(SchedulingOverview {
            vendors: vendors.into_iter().map(Into::into).collect(),
            schedulable_items: schedulable_items.into_iter().map(Into::into).collect(),
            pickups: pickups.into_iter().map(Into::into).collect(),
        })
    }
}
