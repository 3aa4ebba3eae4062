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
pub struct ComplianceQuery {
    pub owner: Option<String>,
}

/// Compliance report for one owner: computed summary plus raw records
async fn get_compliance_report(
    State(state): State<AppState>,
    Query(query): Query<ComplianceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = query.owner.ok_or_else(|| {
        ApiError::BadRequest("The 'owner' query parameter is required".to_string())
    })?;

    let report = state
        .services
        .compliance
        .report_for_owner(&owner)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Creates the router for compliance endpoints
pub fn compliance_routes() -> Router<AppState> {
    Router::new().route("/", get(get_compliance_report))
}
