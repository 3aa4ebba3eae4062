use super::common::{map_service_error, success_response, ValidatedJson};
use crate::{errors::ApiError, handlers::AppState, services::auctions::PlaceBidRequest};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

// Handler functions

/// Place a bid on an open auction
async fn place_bid(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PlaceBidRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .services
        .auctions
        .place_bid(item_id, payload)
        .await
        .map_err(map_service_error)?;

    info!(
        "Bid accepted on item {}: new highest {}",
        item_id, result.current_highest_bid
    );

    Ok(success_response(result))
}

/// Accepted bid history for an item, newest first
async fn list_bids(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bids = state
        .services
        .auctions
        .list_bids(item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(bids))
}

/// Close an open auction; the current highest bidder wins
async fn close_auction(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .auctions
        .close_auction(item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "success": true,
        "message": "Auction closed."
    })))
}

/// Sweep-close every expired open auction. Guarded by the configured bearer
/// token so only the scheduler can trigger it.
async fn sweep_auctions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let expected = state
        .config
        .sweep_token
        .as_deref()
        .ok_or(ApiError::Unauthorized)?;

    let provided = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let authorized = provided.map_or(false, |value| value == format!("Bearer {}", expected));
    if !authorized {
        warn!("Auction sweep trigger rejected: bad or missing token");
        return Err(ApiError::Unauthorized);
    }

    let closed = state
        .services
        .auctions
        .sweep_expired()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "success": true,
        "closed_count": closed
    })))
}

/// Item-scoped auction endpoints, merged into the /items router
pub fn item_auction_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/bids", post(place_bid))
        .route("/:id/bids", get(list_bids))
        .route("/:id/close-auction", post(close_auction))
}

/// Auction-wide endpoints
pub fn auction_routes() -> Router<AppState> {
    Router::new().route("/sweep", post(sweep_auctions))
}
