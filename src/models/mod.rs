pub mod item;

pub use item::{
    AuctionState, AuditEntry, AuditTrail, BiddingStatus, Category, Classification,
    ClassificationType, Condition, Department, DisposalEntry, DisposalHistory, ItemStatus,
};
