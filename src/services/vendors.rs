use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::shipment,
    entities::vendor::{self, ActiveModel as VendorActiveModel, Entity as VendorEntity},
    entities::vendor_pincode::{
        self, ActiveModel as VendorPincodeActiveModel, Entity as VendorPincodeEntity, OdaStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, message = "Vendor name is required"))]
    pub name: String,
    pub contact_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, message = "Vendor name cannot be empty"))]
    pub name: Option<String>,
    pub contact_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddPincodeRequest {
    #[validate(length(min = 1, message = "Pincode is required"))]
    pub pincode: String,
    pub oda: OdaStatus,
}

/// Service for the vendor master and vendor serviceability
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VendorService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(vendor_name = %request.name))]
    pub async fn create_vendor(
        &self,
        request: CreateVendorRequest,
    ) -> Result<vendor::Model, ServiceError> {
        request.validate()?;

        let vendor_id = Uuid::new_v4();
        let model = VendorActiveModel {
            id: Set(vendor_id),
            name: Set(request.name),
            contact_number: Set(request.contact_number),
            email: Set(request.email),
            address: Set(request.address),
            pincode: Set(request.pincode),
            gst_number: Set(request.gst_number),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to create vendor");
            ServiceError::DatabaseError(e)
        })?;

        info!(vendor_id = %vendor_id, "Vendor created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::VendorCreated(vendor_id)).await {
                warn!(error = %e, vendor_id = %vendor_id, "Failed to send vendor created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<vendor::Model>, ServiceError> {
        VendorEntity::find_by_id(vendor_id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, vendor_id = %vendor_id, "Failed to fetch vendor");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<vendor::Model>, u64), ServiceError> {
        let paginator = VendorEntity::find()
            .order_by_asc(vendor::Column::Name)
            .paginate(&*self.db_pool, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let vendors = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((vendors, total))
    }

    #[instrument(skip(self, request))]
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        request: UpdateVendorRequest,
    ) -> Result<vendor::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let existing = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {}", vendor_id)))?;

        let mut active: VendorActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(contact_number) = request.contact_number {
            active.contact_number = Set(Some(contact_number));
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(pincode) = request.pincode {
            active.pincode = Set(Some(pincode));
        }
        if let Some(gst_number) = request.gst_number {
            active.gst_number = Set(Some(gst_number));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to update vendor");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::VendorUpdated(vendor_id)).await {
                warn!(error = %e, vendor_id = %vendor_id, "Failed to send vendor updated event");
            }
        }

        Ok(updated)
    }

    /// Deletes a vendor along with its serviceable pincodes. Rejected while
    /// shipments still reference the vendor.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {}", vendor_id)))?;

        let shipment_count = shipment::Entity::find()
            .filter(shipment::Column::VendorId.eq(vendor_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if shipment_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Vendor {} has {} shipments and cannot be deleted",
                vendor_id, shipment_count
            )));
        }

        VendorPincodeEntity::delete_many()
            .filter(vendor_pincode::Column::VendorId.eq(vendor_id))
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        existing.delete(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to delete vendor");
            ServiceError::DatabaseError(e)
        })?;

        info!(vendor_id = %vendor_id, "Vendor deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::VendorDeleted(vendor_id)).await {
                warn!(error = %e, vendor_id = %vendor_id, "Failed to send vendor deleted event");
            }
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_pincodes(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<vendor_pincode::Model>, ServiceError> {
        let db = &*self.db_pool;

        VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {}", vendor_id)))?;

        VendorPincodeEntity::find()
            .filter(vendor_pincode::Column::VendorId.eq(vendor_id))
            .order_by_asc(vendor_pincode::Column::Pincode)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, request), fields(pincode = %request.pincode))]
    pub async fn add_pincode(
        &self,
        vendor_id: Uuid,
        request: AddPincodeRequest,
    ) -> Result<vendor_pincode::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {}", vendor_id)))?;

        let existing = self.lookup_pincode(vendor_id, &request.pincode).await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Pincode {} already registered for vendor {}",
                request.pincode, vendor_id
            )));
        }

        let model = VendorPincodeActiveModel {
            id: Set(Uuid::new_v4()),
            vendor_id: Set(vendor_id),
            pincode: Set(request.pincode.clone()),
            oda: Set(request.oda),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to add vendor pincode");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(event_sender) = &self.event_sender {
            let event = Event::VendorPincodeAdded {
                vendor_id,
                pincode: request.pincode,
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, vendor_id = %vendor_id, "Failed to send pincode added event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn remove_pincode(&self, vendor_id: Uuid, pincode: &str) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = self
            .lookup_pincode(vendor_id, pincode)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Pincode {} for vendor {}", pincode, vendor_id))
            })?;

        existing.delete(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to remove vendor pincode");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(event_sender) = &self.event_sender {
            let event = Event::VendorPincodeRemoved {
                vendor_id,
                pincode: pincode.to_string(),
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, vendor_id = %vendor_id, "Failed to send pincode removed event");
            }
        }

        Ok(())
    }

    /// Serviceability probe: does this vendor deliver to this pincode, and
    /// is the destination ODA.
    #[instrument(skip(self))]
    pub async fn lookup_pincode(
        &self,
        vendor_id: Uuid,
        pincode: &str,
    ) -> Result<Option<vendor_pincode::Model>, ServiceError> {
        VendorPincodeEntity::find()
            .filter(vendor_pincode::Column::VendorId.eq(vendor_id))
            .filter(vendor_pincode::Column::Pincode.eq(pincode))
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
