use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::item::{
    AuditTrail, BiddingStatus, Category, ClassificationType, Condition, Department,
    DisposalHistory, ItemStatus,
};

/// The `items` table. One row per reported e-waste item; auction columns are
/// populated only when the item was listed for bidding, and the audit trail
/// and disposal history are ordered JSON arrays.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-scannable tag assigned at intake.
    pub tag_id: String,

    pub name: String,
    pub department: Department,
    pub category: Category,
    pub age_months: i32,
    pub condition: Condition,
    pub notes: Option<String>,

    pub classification_type: ClassificationType,
    pub classification_notes: String,

    pub status: ItemStatus,
    pub created_by: String,
    pub pickup_id: Option<Uuid>,

    #[sea_orm(column_type = "Json")]
    pub audit_trail: AuditTrail,
    #[sea_orm(column_type = "Json")]
    pub disposal_history: DisposalHistory,
    pub disposed_at: Option<DateTime<Utc>>,
    pub disposed_by: Option<String>,

    pub bidding_status: Option<BiddingStatus>,
    pub starting_bid: Option<Decimal>,
    pub current_highest_bid: Option<Decimal>,
    pub bidding_end_date: Option<DateTime<Utc>>,
    pub winning_bidder_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bid::Entity")]
    Bids,
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
