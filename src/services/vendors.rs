use crate::{
    db::DbPool,
    entities::vendor::{self, ActiveModel as VendorActiveModel, Entity as VendorEntity, Model as VendorModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, message = "Vendor name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Vendor contact is required"))]
    pub contact: String,
    #[serde(default)]
    pub certified: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VendorResponse {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub certified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VendorModel> for VendorResponse {
    fn from(model: VendorModel) -> Self {
        VendorResponse {
            id: model.id,
            name: model.name,
            contact: model.contact,
            certified: model.certified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Service for the portal-global vendor registry.
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VendorService {
    /// Creates a new vendor service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send vendor event");
            }
        }
    }

    /// Registers a new vendor.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_vendor(
        &self,
        request: CreateVendorRequest,
    ) -> Result<VendorResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let vendor_id = Uuid::new_v4();

        let vendor_active_model = VendorActiveModel {
            id: Set(vendor_id),
            name: Set(request.name),
            contact: Set(request.contact),
            certified: Set(request.certified),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let vendor_model = vendor_active_model.insert(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to create vendor");
            ServiceError::DatabaseError(e)
        })?;

        info!(vendor_id = %vendor_id, "Vendor created");
        self.emit(Event::VendorCreated(vendor_id)).await;

        Ok(vendor_model.into())
    }

    /// Retrieves a vendor by ID
    #[instrument(skip(self), fields(vendor_id = %vendor_id))]
    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<VendorResponse>, ServiceError> {
        let db = &*self.db_pool;

        let vendor = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(vendor.map(Into::into))
    }

    /// Lists all vendors, name-sorted.
    #[instrument(skip(self))]
    pub async fn list_vendors(&self) -> Result<Vec<VendorResponse>, ServiceError> {
        let db = &*self.db_pool;

        let vendors = VendorEntity::find()
            .order_by_asc(vendor::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list vendors");
                ServiceError::DatabaseError(e)
            })?;

        Ok(vendors.into_iter().map(Into::into).collect())
    }

    /// Applies a partial update to a vendor.
    #[instrument(skip(self, request), fields(vendor_id = %vendor_id))]
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        request: UpdateVendorRequest,
    ) -> Result<VendorResponse, ServiceError> {
        let db = &*self.db_pool;

        let vendor = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Vendor not found".to_string()))?;

        let mut active: VendorActiveModel = vendor.into();
        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Vendor name must not be empty".to_string(),
                ));
            }
            active.name = Set(name);
        }
        if let Some(contact) = request.contact {
            active.contact = Set(contact);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to update vendor");
            ServiceError::DatabaseError(e)
        })?;

        info!(vendor_id = %vendor_id, "Vendor updated");
        self.emit(Event::VendorUpdated(vendor_id)).await;

        Ok(updated.into())
    }

    /// Deletes a vendor.
    #[instrument(skip(self), fields(vendor_id = %vendor_id))]
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = VendorEntity::delete_by_id(vendor_id)
            .exec(db)
            .await
            .map_err(|e| {
                error!(error = %e, vendor_id = %vendor_id, "Failed to delete vendor");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Vendor not found".to_string()));
        }

        info!(vendor_id = %vendor_id, "Vendor deleted");
        self.emit(Event::VendorDeleted(vendor_id)).await;

        Ok(())
    }

    /// Toggles a vendor's certification flag. Admin action only; the route
    /// carrying this operation is expected to sit behind the portal's admin
    /// surface.
    #[instrument(skip(self), fields(vendor_id = %vendor_id, certified = certified))]
    pub async fn set_certified(
        &self,
        vendor_id: Uuid,
        certified: bool,
    ) -> Result<VendorResponse, ServiceError> {
        let db = &*self.db_pool;

        let vendor = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Vendor not found".to_string()))?;

        let mut active: VendorActiveModel = vendor.into();
        active.certified = Set(certified);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to change vendor certification");
            ServiceError::DatabaseError(e)
        })?;

        info!(vendor_id = %vendor_id, certified = certified, "Vendor certification changed");
        self.emit(Event::VendorCertificationChanged {
            vendor_id,
            certified,
        })
        .await;

        Ok(updated.into())
    }
}
