use crate::{
    db::DbPool,
    entities::{
        item::{self, Entity as ItemEntity, Model as ItemModel},
        pickup::{self, Entity as PickupEntity, Model as PickupModel},
        vendor::{self, Entity as VendorEntity, Model as VendorModel},
    },
    errors::ServiceError,
    models::item::ClassificationType,
    services::{items::ItemResponse, pickups::PickupResponse, vendors::VendorResponse},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total_items: u64,
    /// Items that have been assigned to a pickup.
    pub items_with_pickup: u64,
    /// Pickups handled by a certified vendor.
    pub certified_vendor_pickups: u64,
    pub hazardous_count: u64,
    pub by_classification: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub by_department: BTreeMap<String, u64>,
}

/// Full compliance report for one owner: computed summary plus the raw
/// records an auditor would want to inspect.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub summary: ComplianceSummary,
    pub items: Vec<ItemResponse>,
    pub pickups: Vec<PickupResponse>,
    pub vendors: Vec<VendorResponse>,
}

/// Pure reducer producing the compliance summary.
pub fn summarize(
    items: &[ItemModel],
    pickups: &[PickupModel],
    vendors: &[VendorModel],
) -> ComplianceSummary {
    let certified: HashMap<Uuid, bool> = vendors.iter().map(|v| (v.id, v.certified)).collect();

    let mut by_classification: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_category: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_department: BTreeMap<String, u64> = BTreeMap::new();
    let mut items_with_pickup = 0;
    let mut hazardous_count = 0;

    for item in items {
        *by_classification
            .entry(item.classification_type.to_string())
            .or_insert(0) += 1;
        *by_category.entry(item.category.to_string()).or_insert(0) += 1;
        *by_department
            .entry(item.department.to_string())
            .or_insert(0) += 1;
        if item.pickup_id.is_some() {
            items_with_pickup += 1;
        }
        if item.classification_type == ClassificationType::Hazardous {
            hazardous_count += 1;
        }
    }

    let certified_vendor_pickups = pickups
        .iter()
        .filter(|p| certified.get(&p.vendor_id).copied().unwrap_or(false))
        .count() as u64;

    ComplianceSummary {
        total_items: items.len() as u64,
        items_with_pickup,
        certified_vendor_pickups,
        hazardous_count,
        by_classification,
        by_category,
        by_department,
    }
}

/// Service assembling the compliance report for an owner.
#[derive(Clone)]
pub struct ComplianceService {
    db_pool: Arc<DbPool>,
}

impl ComplianceService {
    /// Creates a new compliance service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn report_for_owner(&self, owner: &str) -> Result<ComplianceReport, ServiceError> {
        let db = &*self.db_pool;

        let items = ItemEntity::find()
            .filter(item::Column::CreatedBy.eq(owner))
            .order_by_desc(item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch items for compliance report");
                ServiceError::DatabaseError(e)
            })?;

        let pickups = PickupEntity::find()
            .filter(pickup::Column::CreatedBy.eq(owner))
            .order_by_desc(pickup::Column::Date)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        // Vendors are portal-global, not owner-scoped
        let vendors = VendorEntity::find()
            .order_by_asc(vendor::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let summary = summarize(&items, &pickups, &vendors);

        Ok(ComplianceReport {
            summary,
            items: items.into_iter().map(Into::into).collect(),
            pickups: pickups.into_iter().map(Into::into).collect(),
            vendors: vendors.into_iter().map(Into::into).collect(),
        })
    }
}
