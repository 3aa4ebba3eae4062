use super::common::{
    created_response, map_service_error, no_content_response, success_response, ValidatedJson,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::vendors::{CreateVendorRequest, UpdateVendorRequest},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CertificationRequest {
    pub certified: bool,
}

// Handler functions

/// Register a new vendor
async fn create_vendor(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .create_vendor(payload)
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor.id);

    Ok(created_response(vendor))
}

/// List all vendors, name-sorted
async fn list_vendors(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let vendors = state
        .services
        .vendors
        .list_vendors()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vendors))
}

/// Get a vendor by ID
async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(vendor_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Vendor not found".to_string()))?;

    Ok(success_response(vendor))
}

/// Update a vendor's contact details
async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .update_vendor(vendor_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Vendor updated: {}", vendor_id);

    Ok(success_response(vendor))
}

/// Delete a vendor
async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .vendors
        .delete_vendor(vendor_id)
        .await
        .map_err(map_service_error)?;

    info!("Vendor deleted: {}", vendor_id);

    Ok(no_content_response())
}

/// Toggle a vendor's certification (admin action)
async fn set_certification(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CertificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .set_certified(vendor_id, payload.certified)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vendor))
}

/// Creates the router for vendor endpoints
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vendor))
        .route("/", get(list_vendors))
        .route("/:id", get(get_vendor))
        .route("/:id", put(update_vendor))
        .route("/:id", delete(delete_vendor))
        .route("/:id/certification", put(set_certification))
}
