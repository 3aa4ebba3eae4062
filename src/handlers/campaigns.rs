use super::common::{created_response, map_service_error, success_response, ValidatedJson};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::campaigns::CampaignParticipationRequest,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CampaignStatusQuery {
    pub owner: Option<String>,
    pub campaign_id: Option<String>,
}

// Handler functions

/// Whether the user has joined the given campaign
async fn campaign_status(
    State(state): State<AppState>,
    Query(query): Query<CampaignStatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = query.owner.ok_or_else(|| {
        ApiError::BadRequest("The 'owner' query parameter is required".to_string())
    })?;
    let campaign_id = query.campaign_id.ok_or_else(|| {
        ApiError::BadRequest("The 'campaign_id' query parameter is required".to_string())
    })?;

    let status = state
        .services
        .campaigns
        .is_joined(&campaign_id, &owner)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(status))
}

/// Join a campaign; a duplicate join is a conflict
async fn join_campaign(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CampaignParticipationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign_id = payload.campaign_id.clone();
    state
        .services
        .campaigns
        .join(payload)
        .await
        .map_err(map_service_error)?;

    info!("Campaign joined: {}", campaign_id);

    Ok(created_response(json!({
        "message": "Successfully joined campaign."
    })))
}

/// Leave a campaign
async fn leave_campaign(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CampaignParticipationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .campaigns
        .leave(payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "message": "Successfully left campaign."
    })))
}

/// Creates the router for campaign endpoints
pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(campaign_status))
        .route("/", post(join_campaign))
        .route("/", delete(leave_campaign))
}
