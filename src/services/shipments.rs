use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::client::Entity as ClientEntity,
    entities::client_rate::{self, Entity as ClientRateEntity},
    entities::shipment::{self, ActiveModel as ShipmentActiveModel, Entity as ShipmentEntity},
    entities::shipment_box::{
        self, ActiveModel as ShipmentBoxActiveModel, Entity as ShipmentBoxEntity,
    },
    entities::vendor::Entity as VendorEntity,
    entities::vendor_pincode::{self, Entity as VendorPincodeEntity, OdaStatus},
    entities::zone::Entity as ZoneEntity,
    errors::ServiceError,
    events::{Event, EventSender},
    rating::boxes::{aggregate_boxes, BoxInput, ShipmentWeights},
    rating::volumetric::DEFAULT_CFT_FACTOR,
    rating::TransportMode,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ShipmentInput {
    pub client_id: Uuid,
    pub vendor_id: Uuid,
    pub zone_id: Option<Uuid>,
    #[validate(length(min = 1, message = "WFL number is required"))]
    pub wfl_number: String,
    pub vendor_awb_number: Option<String>,
    pub mode: TransportMode,
    pub invoice_number: Option<String>,
    pub invoice_value: Decimal,
    pub consignor_from_location: Option<String>,
    pub consignee: Option<String>,
    pub destination: Option<String>,
    #[validate(length(min = 1, message = "Destination pincode is required"))]
    pub pin_code: String,
    #[validate(range(min = 0.0))]
    pub actual_weight: f64,
    #[validate(range(min = 0.0))]
    pub actual_volumetric_weight: f64,
    pub shipment_date: NaiveDate,
    pub created_by: Option<Uuid>,
    #[validate]
    pub boxes: Vec<BoxInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentWithBoxes {
    pub shipment: shipment::Model,
    pub boxes: Vec<shipment_box::Model>,
}

/// Filters for the shipment listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ShipmentFilter {
    pub client_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Outcome of cross-master validation for a shipment write: the ODA flag
/// stamped from the vendor's pincode list and the CFT factor from the
/// client's rate master.
struct ValidatedShipment {
    oda: OdaStatus,
    cft_factor: f64,
}

/// Service for shipment entry
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ShipmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Checks the referenced masters and resolves the derived inputs. The
    /// (vendor, pincode) pair must exist in the vendor's serviceability
    /// list; the shipment's ODA flag comes from that row, never from the
    /// caller.
    async fn validate_shipment(&self, input: &ShipmentInput) -> Result<ValidatedShipment, ServiceError> {
        if input.boxes.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one box line is required".to_string(),
            ));
        }

        let db = &*self.db_pool;

        ClientEntity::find_by_id(input.client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::InvalidClient(input.client_id))?;

        VendorEntity::find_by_id(input.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {}", input.vendor_id)))?;

        if let Some(zone_id) = input.zone_id {
            ZoneEntity::find_by_id(zone_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| ServiceError::NotFound(format!("Zone {}", zone_id)))?;
        }

        let pincode_row = VendorPincodeEntity::find()
            .filter(vendor_pincode::Column::VendorId.eq(input.vendor_id))
            .filter(vendor_pincode::Column::Pincode.eq(input.pin_code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::InvalidPincodeForVendor {
                vendor_id: input.vendor_id,
                pincode: input.pin_code.clone(),
            })?;

        let cft_factor = ClientRateEntity::find()
            .filter(client_rate::Column::ClientId.eq(input.client_id))
            .filter(client_rate::Column::Mode.eq(input.mode))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .map(|r| r.cft)
            .unwrap_or(DEFAULT_CFT_FACTOR);

        Ok(ValidatedShipment {
            oda: pincode_row.oda,
            cft_factor,
        })
    }

    #[instrument(skip(self, input), fields(wfl_number = %input.wfl_number, client_id = %input.client_id))]
    pub async fn create_shipment(
        &self,
        input: ShipmentInput,
    ) -> Result<ShipmentWithBoxes, ServiceError> {
        input.validate()?;

        let validated = self.validate_shipment(&input).await?;
        let weights = aggregate_boxes(&input.boxes, input.mode, validated.cft_factor);

        let shipment_id = Uuid::new_v4();
        let now = Utc::now();

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for shipment creation");
            ServiceError::DatabaseError(e)
        })?;

        let model = ShipmentActiveModel {
            id: Set(shipment_id),
            client_id: Set(input.client_id),
            vendor_id: Set(input.vendor_id),
            zone_id: Set(input.zone_id),
            wfl_number: Set(input.wfl_number),
            vendor_awb_number: Set(input.vendor_awb_number),
            mode: Set(input.mode),
            invoice_number: Set(input.invoice_number),
            invoice_value: Set(input.invoice_value),
            consignor_from_location: Set(input.consignor_from_location),
            consignee: Set(input.consignee),
            destination: Set(input.destination),
            pin_code: Set(input.pin_code),
            oda: Set(validated.oda),
            total_box: Set(input.boxes.len() as i32),
            actual_weight: Set(input.actual_weight),
            actual_volumetric_weight: Set(input.actual_volumetric_weight),
            wfl_weight: Set(weights.total_actual_weight),
            wfl_volumetric_weight: Set(weights.total_volumetric_weight),
            shipment_date: Set(input.shipment_date),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to create shipment");
            ServiceError::DatabaseError(e)
        })?;

        let boxes = insert_boxes(&txn, shipment_id, &weights, now).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to commit shipment creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(shipment_id = %shipment_id, "Shipment created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ShipmentCreated(shipment_id)).await {
                warn!(error = %e, shipment_id = %shipment_id, "Failed to send shipment created event");
            }
        }

        Ok(ShipmentWithBoxes {
            shipment: model,
            boxes,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_shipment(
        &self,
        shipment_id: Uuid,
    ) -> Result<Option<ShipmentWithBoxes>, ServiceError> {
        let db = &*self.db_pool;

        let shipment = match ShipmentEntity::find_by_id(shipment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        let boxes = ShipmentBoxEntity::find()
            .filter(shipment_box::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(shipment_box::Column::LineIndex)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(Some(ShipmentWithBoxes { shipment, boxes }))
    }

    #[instrument(skip(self))]
    pub async fn list_shipments(
        &self,
        filter: ShipmentFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<shipment::Model>, u64), ServiceError> {
        let mut query = ShipmentEntity::find();
        if let Some(client_id) = filter.client_id {
            query = query.filter(shipment::Column::ClientId.eq(client_id));
        }
        if let Some(from_date) = filter.from_date {
            query = query.filter(shipment::Column::ShipmentDate.gte(from_date));
        }
        if let Some(to_date) = filter.to_date {
            query = query.filter(shipment::Column::ShipmentDate.lte(to_date));
        }

        let paginator = query
            .order_by_desc(shipment::Column::ShipmentDate)
            .order_by_asc(shipment::Column::WflNumber)
            .paginate(&*self.db_pool, limit);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count shipments");
            ServiceError::DatabaseError(e)
        })?;
        let shipments = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| {
                error!(error = %e, page = page, "Failed to fetch shipments page");
                ServiceError::DatabaseError(e)
            })?;

        Ok((shipments, total))
    }

    /// Full-row update. The box set is replaced wholesale and every derived
    /// weight recomputed from the new lines, all in one transaction.
    #[instrument(skip(self, input), fields(shipment_id = %shipment_id))]
    pub async fn update_shipment(
        &self,
        shipment_id: Uuid,
        input: ShipmentInput,
    ) -> Result<ShipmentWithBoxes, ServiceError> {
        input.validate()?;

        let db = &*self.db_pool;

        let existing = ShipmentEntity::find_by_id(shipment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {}", shipment_id)))?;

        let validated = self.validate_shipment(&input).await?;
        let weights = aggregate_boxes(&input.boxes, input.mode, validated.cft_factor);
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to start transaction for shipment update");
            ServiceError::DatabaseError(e)
        })?;

        let mut active: ShipmentActiveModel = existing.into();
        active.client_id = Set(input.client_id);
        active.vendor_id = Set(input.vendor_id);
        active.zone_id = Set(input.zone_id);
        active.wfl_number = Set(input.wfl_number);
        active.vendor_awb_number = Set(input.vendor_awb_number);
        active.mode = Set(input.mode);
        active.invoice_number = Set(input.invoice_number);
        active.invoice_value = Set(input.invoice_value);
        active.consignor_from_location = Set(input.consignor_from_location);
        active.consignee = Set(input.consignee);
        active.destination = Set(input.destination);
        active.pin_code = Set(input.pin_code);
        active.oda = Set(validated.oda);
        active.total_box = Set(input.boxes.len() as i32);
        active.actual_weight = Set(input.actual_weight);
        active.actual_volumetric_weight = Set(input.actual_volumetric_weight);
        active.wfl_weight = Set(weights.total_actual_weight);
        active.wfl_volumetric_weight = Set(weights.total_volumetric_weight);
        active.shipment_date = Set(input.shipment_date);
        active.updated_at = Set(Some(now));

        let model = active.update(&txn).await.map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to update shipment");
            ServiceError::DatabaseError(e)
        })?;

        ShipmentBoxEntity::delete_many()
            .filter(shipment_box::Column::ShipmentId.eq(shipment_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, shipment_id = %shipment_id, "Failed to clear shipment boxes");
                ServiceError::DatabaseError(e)
            })?;

        let boxes = insert_boxes(&txn, shipment_id, &weights, now).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to commit shipment update");
            ServiceError::DatabaseError(e)
        })?;

        info!(shipment_id = %shipment_id, "Shipment updated successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ShipmentUpdated(shipment_id)).await {
                warn!(error = %e, shipment_id = %shipment_id, "Failed to send shipment updated event");
            }
        }

        Ok(ShipmentWithBoxes {
            shipment: model,
            boxes,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_shipment(&self, shipment_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        ShipmentEntity::find_by_id(shipment_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {}", shipment_id)))?;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to start transaction for shipment deletion");
            ServiceError::DatabaseError(e)
        })?;

        ShipmentBoxEntity::delete_many()
            .filter(shipment_box::Column::ShipmentId.eq(shipment_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, shipment_id = %shipment_id, "Failed to delete shipment boxes");
                ServiceError::DatabaseError(e)
            })?;

        ShipmentEntity::delete_by_id(shipment_id)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, shipment_id = %shipment_id, "Failed to delete shipment");
                ServiceError::DatabaseError(e)
            })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to commit shipment deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(shipment_id = %shipment_id, "Shipment deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ShipmentDeleted(shipment_id)).await {
                warn!(error = %e, shipment_id = %shipment_id, "Failed to send shipment deleted event");
            }
        }

        Ok(())
    }
}

async fn insert_boxes(
    txn: &sea_orm::DatabaseTransaction,
    shipment_id: Uuid,
    weights: &ShipmentWeights,
    now: chrono::DateTime<Utc>,
) -> Result<Vec<shipment_box::Model>, ServiceError> {
    let mut inserted = Vec::with_capacity(weights.boxes.len());
    for (index, line) in weights.boxes.iter().enumerate() {
        let model = ShipmentBoxActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(shipment_id),
            line_index: Set(index as i32),
            number_of_pieces: Set(line.number_of_pieces),
            length_cm: Set(line.length_cm),
            breadth_cm: Set(line.breadth_cm),
            height_cm: Set(line.height_cm),
            actual_weight_per_piece: Set(line.actual_weight_per_piece),
            volumetric_weight_per_piece: Set(line.volumetric_weight_per_piece),
            total_volumetric_weight: Set(line.total_volumetric_weight),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            error!(error = %e, shipment_id = %shipment_id, "Failed to insert shipment box");
            ServiceError::DatabaseError(e)
        })?;
        inserted.push(model);
    }
    Ok(inserted)
}
