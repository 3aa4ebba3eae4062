use crate::{
    db::DbPool,
    entities::item::{self, Entity as ItemEntity, Model as ItemModel},
    errors::ServiceError,
    models::item::{Category, ClassificationType, ItemStatus},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, instrument};

/// Assumed unit weight per category, in kilograms.
fn weight_kg(category: Category) -> f64 {
    match category {
        Category::Computer => 7.0,
        Category::Projector => 3.0,
        Category::LabEquipment => 10.0,
        Category::MobileDevice => 0.2,
        Category::Battery => 0.05,
        Category::Accessory => 0.1,
        Category::Other => 1.0,
    }
}

/// Assumed emission factor, kg CO2 avoided per kg of material diverted.
const EMISSION_FACTOR_PER_KG: f64 = 1.8;

/// Share of an item's full impact credited at each lifecycle stage.
fn progress_multiplier(status: ItemStatus) -> f64 {
    match status {
        ItemStatus::Reported => 0.0,
        ItemStatus::Scheduled => 0.15,
        ItemStatus::Collected => 0.35,
        ItemStatus::Sorted => 0.55,
        ItemStatus::Processed => 0.75,
        ItemStatus::Recycled => 1.0,
        ItemStatus::Disposed | ItemStatus::Decomposed => 0.0,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Item counts grouped by creation month ("YYYY-MM").
    pub by_month: BTreeMap<String, u64>,
    /// Item counts grouped by category.
    pub by_category: BTreeMap<String, u64>,
    /// Item counts grouped by classification, with all three classes present.
    pub classification_count: BTreeMap<String, u64>,
    pub recycled_count: u64,
    /// CO2 impact credited so far, scaled by lifecycle progress.
    pub impact_kg_co2: f64,
    /// CO2 impact if every counted item completed recycling.
    pub potential_kg_co2: f64,
    pub total_items: u64,
}

/// Pure reducer over a set of items. Hazardous items and items that ended in
/// a disposal state contribute to the counts but never to the impact figures.
pub fn aggregate(items: &[ItemModel]) -> AnalyticsReport {
    let mut by_month: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_category: BTreeMap<String, u64> = BTreeMap::new();
    let mut classification_count: BTreeMap<String, u64> = BTreeMap::new();
    for class in [
        ClassificationType::Recyclable,
        ClassificationType::Reusable,
        ClassificationType::Hazardous,
    ] {
        classification_count.insert(class.to_string(), 0);
    }

    let mut impact_kg_co2 = 0.0;
    let mut potential_kg_co2 = 0.0;
    let mut recycled_count = 0;

    for item in items {
        let month_key = item.created_at.format("%Y-%m").to_string();
        *by_month.entry(month_key).or_insert(0) += 1;
        *by_category.entry(item.category.to_string()).or_insert(0) += 1;
        *classification_count
            .entry(item.classification_type.to_string())
            .or_insert(0) += 1;

        let disposed = matches!(item.status, ItemStatus::Disposed | ItemStatus::Decomposed);
        if item.classification_type != ClassificationType::Hazardous && !disposed {
            let full_impact = weight_kg(item.category) * EMISSION_FACTOR_PER_KG;
            potential_kg_co2 += full_impact;
            impact_kg_co2 += full_impact * progress_multiplier(item.status);
            if item.status == ItemStatus::Recycled {
                recycled_count += 1;
            }
        }
    }

    AnalyticsReport {
        by_month,
        by_category,
        classification_count,
        recycled_count,
        impact_kg_co2,
        potential_kg_co2,
        total_items: items.len() as u64,
    }
}

/// Service wrapper fetching one owner's items and reducing them.
#[derive(Clone)]
pub struct AnalyticsService {
    db_pool: Arc<DbPool>,
}

impl AnalyticsService {
    /// Creates a new analytics service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn analytics_for_owner(&self, owner: &str) -> Result<AnalyticsReport, ServiceError> {
        let db = &*self.db_pool;

        let items = ItemEntity::find()
            .filter(item::Column::CreatedBy.eq(owner))
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch items for analytics");
                ServiceError::DatabaseError(e)
            })?;

        Ok(aggregate(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::{
        AuditTrail, Condition, Department, DisposalHistory,
    };
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn item(
        category: Category,
        classification: ClassificationType,
        status: ItemStatus,
        created_month: u32,
    ) -> ItemModel {
        let created_at = Utc
            .with_ymd_and_hms(2025, created_month, 5, 12, 0, 0)
            .unwrap();
        ItemModel {
            id: Uuid::new_v4(),
            tag_id: "ew-test".to_string(),
            name: "item".to_string(),
            department: Department::Engineering,
            category,
            age_months: 12,
            condition: Condition::Fair,
            notes: None,
            classification_type: classification,
            classification_notes: String::new(),
            status,
            created_by: "amy@campus.edu".to_string(),
            pickup_id: None,
            audit_trail: AuditTrail::default(),
            disposal_history: DisposalHistory::default(),
            disposed_at: None,
            disposed_by: None,
            bidding_status: None,
            starting_bid: None,
            current_highest_bid: None,
            bidding_end_date: None,
            winning_bidder_id: None,
            created_at,
            updated_at: None,
            version: 1,
        }
    }

    #[test]
    fn category_and_classification_counts_sum_to_total() {
        let items = vec![
            item(Category::Computer, ClassificationType::Reusable, ItemStatus::Reported, 1),
            item(Category::Computer, ClassificationType::Recyclable, ItemStatus::Collected, 1),
            item(Category::Battery, ClassificationType::Hazardous, ItemStatus::Reported, 2),
            item(Category::Other, ClassificationType::Recyclable, ItemStatus::Recycled, 3),
        ];
        let report = aggregate(&items);

        assert_eq!(report.total_items, 4);
        assert_eq!(report.by_category.values().sum::<u64>(), report.total_items);
        assert_eq!(
            report.classification_count.values().sum::<u64>(),
            report.total_items
        );
        assert_eq!(report.by_month.values().sum::<u64>(), report.total_items);
    }

    #[test]
    fn classification_counts_default_to_zero() {
        let report = aggregate(&[]);
        assert_eq!(report.classification_count.get("Recyclable"), Some(&0));
        assert_eq!(report.classification_count.get("Reusable"), Some(&0));
        assert_eq!(report.classification_count.get("Hazardous"), Some(&0));
        assert_eq!(report.total_items, 0);
    }

    #[test]
    fn hazardous_and_disposed_items_carry_no_impact() {
        let items = vec![
            item(Category::Battery, ClassificationType::Hazardous, ItemStatus::Recycled, 1),
            item(Category::Computer, ClassificationType::Recyclable, ItemStatus::Disposed, 1),
            item(Category::Computer, ClassificationType::Recyclable, ItemStatus::Decomposed, 1),
        ];
        let report = aggregate(&items);

        assert_eq!(report.impact_kg_co2, 0.0);
        assert_eq!(report.potential_kg_co2, 0.0);
        assert_eq!(report.recycled_count, 0);
    }

    #[test]
    fn impact_scales_with_lifecycle_progress() {
        let full = 7.0 * EMISSION_FACTOR_PER_KG;

        let reported = aggregate(&[item(
            Category::Computer,
            ClassificationType::Recyclable,
            ItemStatus::Reported,
            1,
        )]);
        assert_eq!(reported.impact_kg_co2, 0.0);
        assert!((reported.potential_kg_co2 - full).abs() < 1e-9);

        let sorted = aggregate(&[item(
            Category::Computer,
            ClassificationType::Recyclable,
            ItemStatus::Sorted,
            1,
        )]);
        assert!((sorted.impact_kg_co2 - full * 0.55).abs() < 1e-9);

        let recycled = aggregate(&[item(
            Category::Computer,
            ClassificationType::Recyclable,
            ItemStatus::Recycled,
            1,
        )]);
        assert!((recycled.impact_kg_co2 - full).abs() < 1e-9);
        assert_eq!(recycled.recycled_count, 1);
    }

    #[test]
    fn months_group_by_creation_date() {
        let items = vec![
            item(Category::Other, ClassificationType::Recyclable, ItemStatus::Reported, 1),
            item(Category::Other, ClassificationType::Recyclable, ItemStatus::Reported, 1),
            item(Category::Other, ClassificationType::Recyclable, ItemStatus::Reported, 11),
        ];
        let report = aggregate(&items);
        assert_eq!(report.by_month.get("2025-01"), Some(&2));
        assert_eq!(report.by_month.get("2025-11"), Some(&1));
    }
}
