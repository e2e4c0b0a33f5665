use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::zone::{self, ActiveModel as ZoneActiveModel, Entity as ZoneEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateZoneRequest {
    #[validate(length(min = 1, message = "Zone name is required"))]
    pub name: String,
}

/// Service for the rating zone master
#[derive(Clone)]
pub struct ZoneService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ZoneService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(zone_name = %request.name))]
    pub async fn create_zone(&self, request: CreateZoneRequest) -> Result<zone::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let existing = ZoneEntity::find()
            .filter(zone::Column::Name.eq(request.name.clone()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Zone '{}' already exists",
                request.name
            )));
        }

        let zone_id = Uuid::new_v4();
        let model = ZoneActiveModel {
            id: Set(zone_id),
            name: Set(request.name),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, zone_id = %zone_id, "Failed to create zone");
            ServiceError::DatabaseError(e)
        })?;

        info!(zone_id = %zone_id, "Zone created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ZoneCreated(zone_id)).await {
                warn!(error = %e, zone_id = %zone_id, "Failed to send zone created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_zone(&self, zone_id: Uuid) -> Result<Option<zone::Model>, ServiceError> {
        ZoneEntity::find_by_id(zone_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_zones(&self) -> Result<Vec<zone::Model>, ServiceError> {
        ZoneEntity::find()
            .order_by_asc(zone::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
