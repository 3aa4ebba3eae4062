use super::common::{
    created_response, map_service_error, no_content_response, success_response, ValidatedJson,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::items::{
        CreateItemRequest, DisposeRequest, UpdateItemRequest, UpdateStatusRequest,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner: String,
}

/// Body for owner-gated partial updates: the acting identity plus the fields
/// to change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemBody {
    #[validate(length(min = 1, message = "user_email is required"))]
    pub user_email: String,
    #[serde(flatten)]
    #[validate]
    pub update: UpdateItemRequest,
}

// Handler functions

/// Report a new e-waste item, optionally listing it for auction
async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .create_item(payload)
        .await
        .map_err(map_service_error)?;

    info!("Item created: {}", item.id);

    Ok(created_response(item))
}

/// List items, newest first, optionally filtered by owner
async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_items(query.owner.as_deref())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

/// List items with an open auction, soonest-ending first
async fn list_biddable(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_biddable()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

/// Get a single item by ID
async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .get_item(item_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(success_response(item))
}

/// Owner-gated partial update
async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateItemBody>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .update_item(item_id, &payload.user_email, payload.update)
        .await
        .map_err(map_service_error)?;

    info!("Item updated: {}", item_id);

    Ok(success_response(item))
}

/// Owner-gated delete
async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .items
        .delete_item(item_id, &query.owner)
        .await
        .map_err(map_service_error)?;

    info!("Item deleted: {}", item_id);

    Ok(no_content_response())
}

/// Advance an item's lifecycle status through the transition table
async fn update_status(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .update_status(item_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(item))
}

/// Terminally dispose (decompose) an item
async fn dispose_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<DisposeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .dispose(item_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(item))
}

/// Creates the router for item endpoints
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item))
        .route("/", get(list_items))
        .route("/biddable", get(list_biddable))
        .route("/:id", get(get_item))
        .route("/:id", patch(update_item))
        .route("/:id", delete(delete_item))
        .route("/:id/status", post(update_status))
        .route("/:id/dispose", post(dispose_item))
}
