use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Campus department an item was reported from.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Department {
    #[sea_orm(string_value = "Engineering")]
    Engineering,
    #[sea_orm(string_value = "Sciences")]
    Sciences,
    #[sea_orm(string_value = "Humanities")]
    Humanities,
    #[sea_orm(string_value = "Administration")]
    Administration,
    #[sea_orm(string_value = "Hostel")]
    Hostel,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// Equipment category. Drives classification and the impact weight table.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Category {
    #[sea_orm(string_value = "Computer")]
    Computer,
    #[sea_orm(string_value = "Projector")]
    Projector,
    #[sea_orm(string_value = "LabEquipment")]
    LabEquipment,
    #[sea_orm(string_value = "MobileDevice")]
    MobileDevice,
    #[sea_orm(string_value = "Battery")]
    Battery,
    #[sea_orm(string_value = "Accessory")]
    Accessory,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// Physical condition at intake.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Condition {
    #[sea_orm(string_value = "Good")]
    Good,
    #[sea_orm(string_value = "Fair")]
    Fair,
    #[sea_orm(string_value = "Poor")]
    Poor,
    #[sea_orm(string_value = "Dead")]
    Dead,
}

/// Waste classification derived at intake (may be overridden on update).
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ClassificationType {
    #[sea_orm(string_value = "Recyclable")]
    Recyclable,
    #[sea_orm(string_value = "Reusable")]
    Reusable,
    #[sea_orm(string_value = "Hazardous")]
    Hazardous,
}

/// Classification with explanatory notes, embedded in item responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: ClassificationType,
    #[serde(default)]
    pub notes: String,
}

/// Lifecycle status of an e-waste item.
///
/// Transitions are validated centrally via [`ItemStatus::can_transition_to`];
/// handlers never write a status the table does not allow.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ItemStatus {
    #[sea_orm(string_value = "Reported")]
    Reported,
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
    #[sea_orm(string_value = "Collected")]
    Collected,
    #[sea_orm(string_value = "Sorted")]
    Sorted,
    #[sea_orm(string_value = "Processed")]
    Processed,
    #[sea_orm(string_value = "Recycled")]
    Recycled,
    #[sea_orm(string_value = "Disposed")]
    Disposed,
    #[sea_orm(string_value = "Decomposed")]
    Decomposed,
}

impl ItemStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Recycled | Self::Disposed | Self::Decomposed)
    }

    /// Allowed-transition table for the item lifecycle.
    ///
    /// The processing chain advances one stage at a time; early disposal
    /// (Decomposed) is reachable from every non-terminal state.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        match (self, next) {
            (Reported, Scheduled) => true,
            (Scheduled, Collected) => true,
            (Collected, Sorted) => true,
            (Sorted, Processed) => true,
            (Processed, Recycled) => true,
            (Processed, Disposed) => true,
            (from, Decomposed) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Auction state of an item listed for bidding.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BiddingStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Auction sub-structure of an item response. Present only when the item
/// was listed for bidding at creation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub bidding_status: BiddingStatus,
    pub starting_bid: Decimal,
    pub current_highest_bid: Decimal,
    pub bidding_end_date: Option<DateTime<Utc>>,
    pub winning_bidder_id: Option<Uuid>,
}

/// One audit-trail record, appended in the same transaction as the status
/// write it documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub date: DateTime<Utc>,
    pub user: String,
    pub stage: String,
    pub status: ItemStatus,
}

/// Ordered, append-only audit trail stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AuditTrail(pub Vec<AuditEntry>);

/// One disposal record. Written exactly once, when an item is decomposed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalEntry {
    pub date: DateTime<Utc>,
    pub user: String,
    pub action: String,
}

/// Ordered, append-only disposal history stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DisposalHistory(pub Vec<DisposalEntry>);
