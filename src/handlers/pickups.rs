use super::common::{created_response, map_service_error, success_response, ValidatedJson};
use crate::{errors::ApiError, handlers::AppState, services::pickups::CreatePickupRequest};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct VendorPickupQuery {
    pub vendor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SchedulingQuery {
    pub owner: Option<String>,
}

// Handler functions

/// Schedule a pickup: creates the record and moves every referenced item to
/// Scheduled in one transaction
async fn create_pickup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePickupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pickup = state
        .services
        .pickups
        .create_pickup(payload)
        .await
        .map_err(map_service_error)?;

    info!("Pickup scheduled: {}", pickup.id);

    Ok(created_response(pickup))
}

/// List a vendor's pickups, soonest first, with item names resolved
async fn list_pickups(
    State(state): State<AppState>,
    Query(query): Query<VendorPickupQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor_id = query.vendor_id.ok_or_else(|| {
        ApiError::BadRequest("The 'vendor_id' query parameter is required".to_string())
    })?;

    let pickups = state
        .services
        .pickups
        .list_for_vendor(vendor_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(pickups))
}

/// Scheduling screen data for one owner: vendors, schedulable items, pickups
async fn scheduling_overview(
    State(state): State<AppState>,
    Query(query): Query<SchedulingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = query.owner.ok_or_else(|| {
        ApiError::BadRequest("The 'owner' query parameter is required".to_string())
    })?;

    let overview = state
        .services
        .pickups
        .scheduling_overview(&owner)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(overview))
}

/// Creates the router for pickup endpoints
pub fn pickup_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_pickup))
        .route("/", get(list_pickups))
}

/// Creates the router for the scheduling overview endpoint
pub fn scheduling_routes() -> Router<AppState> {
    Router::new().route("/", get(scheduling_overview))
}
