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
    entities::client::{self, ActiveModel as ClientActiveModel, Entity as ClientEntity},
    entities::{bill, shipment},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, message = "Client code is required"))]
    pub client_code: String,
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,
    pub contact_number: Option<String>,
    #[validate(email)]
    pub email_id: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub gst_number: Option<String>,
    /// Legacy multiplier kept for API compatibility; rate masters carry
    /// the CFT used in computation.
    pub cft_multiplier: Option<f64>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, message = "Client name cannot be empty"))]
    pub client_name: Option<String>,
    pub contact_number: Option<String>,
    #[validate(email)]
    pub email_id: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub gst_number: Option<String>,
    pub cft_multiplier: Option<f64>,
}

/// Service for the client master
#[derive(Clone)]
pub struct ClientService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ClientService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(client_code = %request.client_code))]
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<client::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let existing = ClientEntity::find()
            .filter(client::Column::ClientCode.eq(request.client_code.clone()))
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check client code uniqueness");
                ServiceError::DatabaseError(e)
            })?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Client code '{}' already exists",
                request.client_code
            )));
        }

        let client_id = Uuid::new_v4();
        let now = Utc::now();
        let model = ClientActiveModel {
            id: Set(client_id),
            client_code: Set(request.client_code),
            client_name: Set(request.client_name),
            contact_number: Set(request.contact_number),
            email_id: Set(request.email_id),
            address: Set(request.address),
            pin_code: Set(request.pin_code),
            gst_number: Set(request.gst_number),
            cft_multiplier: Set(request.cft_multiplier.unwrap_or(1.0)),
            created_by: Set(request.created_by),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, client_id = %client_id, "Failed to create client");
            ServiceError::DatabaseError(e)
        })?;

        info!(client_id = %client_id, "Client created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ClientCreated(client_id)).await {
                warn!(error = %e, client_id = %client_id, "Failed to send client created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<client::Model>, ServiceError> {
        ClientEntity::find_by_id(client_id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, client_id = %client_id, "Failed to fetch client");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<client::Model>, u64), ServiceError> {
        let paginator = ClientEntity::find()
            .order_by_asc(client::Column::ClientCode)
            .paginate(&*self.db_pool, limit);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count clients");
            ServiceError::DatabaseError(e)
        })?;
        let clients = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(error = %e, page = page, "Failed to fetch clients page");
            ServiceError::DatabaseError(e)
        })?;

        Ok((clients, total))
    }

    #[instrument(skip(self, request))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<client::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let existing = ClientEntity::find_by_id(client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {}", client_id)))?;

        let mut active: ClientActiveModel = existing.into();
        if let Some(client_name) = request.client_name {
            active.client_name = Set(client_name);
        }
        if let Some(contact_number) = request.contact_number {
            active.contact_number = Set(Some(contact_number));
        }
        if let Some(email_id) = request.email_id {
            active.email_id = Set(Some(email_id));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(pin_code) = request.pin_code {
            active.pin_code = Set(Some(pin_code));
        }
        if let Some(gst_number) = request.gst_number {
            active.gst_number = Set(Some(gst_number));
        }
        if let Some(cft_multiplier) = request.cft_multiplier {
            active.cft_multiplier = Set(cft_multiplier);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, client_id = %client_id, "Failed to update client");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ClientUpdated(client_id)).await {
                warn!(error = %e, client_id = %client_id, "Failed to send client updated event");
            }
        }

        Ok(updated)
    }

    /// Deletes a client. Rejected while shipments or bills still reference
    /// it so billing history never dangles.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = ClientEntity::find_by_id(client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {}", client_id)))?;

        let shipment_count = shipment::Entity::find()
            .filter(shipment::Column::ClientId.eq(client_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if shipment_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} has {} shipments and cannot be deleted",
                client_id, shipment_count
            )));
        }

        let bill_count = bill::Entity::find()
            .filter(bill::Column::ClientId.eq(client_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if bill_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} has {} bills and cannot be deleted",
                client_id, bill_count
            )));
        }

        existing.delete(db).await.map_err(|e| {
            error!(error = %e, client_id = %client_id, "Failed to delete client");
            ServiceError::DatabaseError(e)
        })?;

        info!(client_id = %client_id, "Client deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ClientDeleted(client_id)).await {
                warn!(error = %e, client_id = %client_id, "Failed to send client deleted event");
            }
        }

        Ok(())
    }
}
