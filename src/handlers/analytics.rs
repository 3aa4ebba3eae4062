use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub owner: Option<String>,
}

/// Aggregated analytics for one owner's items
async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = query.owner.ok_or_else(|| {
        ApiError::BadRequest("The 'owner' query parameter is required".to_string())
    })?;

    let report = state
        .services
        .analytics
        .analytics_for_owner(&owner)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Creates the router for analytics endpoints
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/", get(get_analytics))
}
