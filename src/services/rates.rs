use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::client::Entity as ClientEntity,
    entities::client_rate::{self, ActiveModel as ClientRateActiveModel, Entity as ClientRateEntity},
    entities::client_zone_rate::{
        self, ActiveModel as ClientZoneRateActiveModel, Entity as ClientZoneRateEntity,
    },
    entities::zone::Entity as ZoneEntity,
    errors::ServiceError,
    events::{Event, EventSender},
    rating::charges::RateQuote,
    rating::TransportMode,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneRateInput {
    pub zone_id: Uuid,
    pub rate_per_kg: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRateMasterRequest {
    pub client_id: Uuid,
    pub mode: TransportMode,
    /// CFT factor used in the volumetric formula for this client/mode.
    pub cft: Option<f64>,
    pub minimum_weight: f64,
    pub minimum_freight: Decimal,
    pub docket_charges: Decimal,
    pub fuel_pct: Decimal,
    pub fov_pct: Decimal,
    pub oda_charge: Decimal,
    pub other_charges: Decimal,
    #[validate(length(min = 1, message = "At least one zone rate is required"))]
    pub zone_rates: Vec<ZoneRateInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRateMasterRequest {
    pub cft: Option<f64>,
    pub minimum_weight: Option<f64>,
    pub minimum_freight: Option<Decimal>,
    pub docket_charges: Option<Decimal>,
    pub fuel_pct: Option<Decimal>,
    pub fov_pct: Option<Decimal>,
    pub oda_charge: Option<Decimal>,
    pub other_charges: Option<Decimal>,
    /// When present, replaces the zone rate set wholesale.
    pub zone_rates: Option<Vec<ZoneRateInput>>,
}

/// A rate master with its per-zone rates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateMaster {
    pub rate: client_rate::Model,
    pub zone_rates: Vec<client_zone_rate::Model>,
}

/// Service for rate masters and rate resolution
#[derive(Clone)]
pub struct RateService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl RateService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a rate master (fixed charges plus zone rates) in one
    /// transaction. One rate master per (client, mode).
    #[instrument(skip(self, request), fields(client_id = %request.client_id, mode = %request.mode))]
    pub async fn create_rate_master(
        &self,
        request: CreateRateMasterRequest,
    ) -> Result<RateMaster, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        ClientEntity::find_by_id(request.client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::InvalidClient(request.client_id))?;

        let existing = ClientRateEntity::find()
            .filter(client_rate::Column::ClientId.eq(request.client_id))
            .filter(client_rate::Column::Mode.eq(request.mode))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Client {} already has a {} rate master",
                request.client_id, request.mode
            )));
        }

        for zone_rate in &request.zone_rates {
            ZoneEntity::find_by_id(zone_rate.zone_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!("Zone {} does not exist", zone_rate.zone_id))
                })?;
        }

        let rate_id = Uuid::new_v4();
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for rate master creation");
            ServiceError::DatabaseError(e)
        })?;

        let rate = ClientRateActiveModel {
            id: Set(rate_id),
            client_id: Set(request.client_id),
            mode: Set(request.mode),
            cft: Set(request.cft.unwrap_or(1.0)),
            minimum_weight: Set(request.minimum_weight),
            minimum_freight: Set(request.minimum_freight),
            docket_charges: Set(request.docket_charges),
            fuel_pct: Set(request.fuel_pct),
            fov_pct: Set(request.fov_pct),
            oda_charge: Set(request.oda_charge),
            other_charges: Set(request.other_charges),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, rate_id = %rate_id, "Failed to create rate master");
            ServiceError::DatabaseError(e)
        })?;

        let mut zone_rates = Vec::with_capacity(request.zone_rates.len());
        for zone_rate in &request.zone_rates {
            let inserted = ClientZoneRateActiveModel {
                id: Set(Uuid::new_v4()),
                client_rate_id: Set(rate_id),
                zone_id: Set(zone_rate.zone_id),
                rate_per_kg: Set(zone_rate.rate_per_kg),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, rate_id = %rate_id, zone_id = %zone_rate.zone_id, "Failed to create zone rate");
                ServiceError::DatabaseError(e)
            })?;
            zone_rates.push(inserted);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, rate_id = %rate_id, "Failed to commit rate master creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(rate_id = %rate_id, client_id = %request.client_id, "Rate master created");

        if let Some(event_sender) = &self.event_sender {
            let event = Event::RateMasterCreated {
                rate_id,
                client_id: request.client_id,
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, rate_id = %rate_id, "Failed to send rate master created event");
            }
        }

        Ok(RateMaster { rate, zone_rates })
    }

    #[instrument(skip(self))]
    pub async fn rates_for_client(&self, client_id: Uuid) -> Result<Vec<RateMaster>, ServiceError> {
        let db = &*self.db_pool;

        ClientEntity::find_by_id(client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::InvalidClient(client_id))?;

        let rates = ClientRateEntity::find()
            .filter(client_rate::Column::ClientId.eq(client_id))
            .order_by_asc(client_rate::Column::Mode)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut result = Vec::with_capacity(rates.len());
        for rate in rates {
            let zone_rates = ClientZoneRateEntity::find()
                .filter(client_zone_rate::Column::ClientRateId.eq(rate.id))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            result.push(RateMaster { rate, zone_rates });
        }

        Ok(result)
    }

    /// Updates the fixed charges of a rate master and, when a zone rate set
    /// is supplied, replaces the per-zone rates wholesale in the same
    /// transaction.
    #[instrument(skip(self, request))]
    pub async fn update_rate_master(
        &self,
        rate_id: Uuid,
        request: UpdateRateMasterRequest,
    ) -> Result<RateMaster, ServiceError> {
        let db = &*self.db_pool;

        let existing = ClientRateEntity::find_by_id(rate_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Rate master {}", rate_id)))?;
        let client_id = existing.client_id;

        if let Some(zone_rates) = &request.zone_rates {
            if zone_rates.is_empty() {
                return Err(ServiceError::ValidationError(
                    "Zone rate set cannot be empty".to_string(),
                ));
            }
            for zone_rate in zone_rates {
                ZoneEntity::find_by_id(zone_rate.zone_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::ValidationError(format!(
                            "Zone {} does not exist",
                            zone_rate.zone_id
                        ))
                    })?;
            }
        }

        let now = Utc::now();
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, rate_id = %rate_id, "Failed to start transaction for rate master update");
            ServiceError::DatabaseError(e)
        })?;

        let mut active: ClientRateActiveModel = existing.into();
        if let Some(cft) = request.cft {
            active.cft = Set(cft);
        }
        if let Some(minimum_weight) = request.minimum_weight {
            active.minimum_weight = Set(minimum_weight);
        }
        if let Some(minimum_freight) = request.minimum_freight {
            active.minimum_freight = Set(minimum_freight);
        }
        if let Some(docket_charges) = request.docket_charges {
            active.docket_charges = Set(docket_charges);
        }
        if let Some(fuel_pct) = request.fuel_pct {
            active.fuel_pct = Set(fuel_pct);
        }
        if let Some(fov_pct) = request.fov_pct {
            active.fov_pct = Set(fov_pct);
        }
        if let Some(oda_charge) = request.oda_charge {
            active.oda_charge = Set(oda_charge);
        }
        if let Some(other_charges) = request.other_charges {
            active.other_charges = Set(other_charges);
        }
        active.updated_at = Set(Some(now));

        let rate = active.update(&txn).await.map_err(|e| {
            error!(error = %e, rate_id = %rate_id, "Failed to update rate master");
            ServiceError::DatabaseError(e)
        })?;

        if let Some(zone_rates) = request.zone_rates {
            ClientZoneRateEntity::delete_many()
                .filter(client_zone_rate::Column::ClientRateId.eq(rate_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, rate_id = %rate_id, "Failed to clear zone rates");
                    ServiceError::DatabaseError(e)
                })?;

            for zone_rate in zone_rates {
                ClientZoneRateActiveModel {
                    id: Set(Uuid::new_v4()),
                    client_rate_id: Set(rate_id),
                    zone_id: Set(zone_rate.zone_id),
                    rate_per_kg: Set(zone_rate.rate_per_kg),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, rate_id = %rate_id, "Failed to insert zone rate");
                    ServiceError::DatabaseError(e)
                })?;
            }
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, rate_id = %rate_id, "Failed to commit rate master update");
            ServiceError::DatabaseError(e)
        })?;

        let zone_rates = ClientZoneRateEntity::find()
            .filter(client_zone_rate::Column::ClientRateId.eq(rate_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(event_sender) = &self.event_sender {
            let event = Event::RateMasterUpdated { rate_id, client_id };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, rate_id = %rate_id, "Failed to send rate master updated event");
            }
        }

        Ok(RateMaster { rate, zone_rates })
    }

    /// CFT factor for the volumetric formula, falling back to 1.0 when the
    /// client has no rate master for the mode.
    #[instrument(skip(self))]
    pub async fn cft_factor(
        &self,
        client_id: Uuid,
        mode: TransportMode,
    ) -> Result<f64, ServiceError> {
        let rate = ClientRateEntity::find()
            .filter(client_rate::Column::ClientId.eq(client_id))
            .filter(client_rate::Column::Mode.eq(mode))
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(rate
            .map(|r| r.cft)
            .unwrap_or(crate::rating::volumetric::DEFAULT_CFT_FACTOR))
    }

    /// Resolves the full pricing quote for (client, mode, zone).
    #[instrument(skip(self))]
    pub async fn resolve_rate(
        &self,
        client_id: Uuid,
        mode: TransportMode,
        zone_id: Uuid,
    ) -> Result<RateQuote, ServiceError> {
        let db = &*self.db_pool;

        let rate = ClientRateEntity::find()
            .filter(client_rate::Column::ClientId.eq(client_id))
            .filter(client_rate::Column::Mode.eq(mode))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NoRateMasterForClientMode { client_id, mode })?;

        let zone_rate = ClientZoneRateEntity::find()
            .filter(client_zone_rate::Column::ClientRateId.eq(rate.id))
            .filter(client_zone_rate::Column::ZoneId.eq(zone_id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NoZoneRate {
                rate_id: rate.id,
                zone_id,
            })?;

        Ok(RateQuote {
            rate_per_kg: zone_rate.rate_per_kg,
            cft: rate.cft,
            minimum_weight: rate.minimum_weight,
            minimum_freight: rate.minimum_freight,
            docket_charges: rate.docket_charges,
            fuel_pct: rate.fuel_pct,
            fov_pct: rate.fov_pct,
            oda_charge: rate.oda_charge,
            other_charges: rate.other_charges,
        })
    }
}
