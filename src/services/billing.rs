use std::collections::HashMap;
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
    entities::bill::{self, ActiveModel as BillActiveModel, Entity as BillEntity},
    entities::client::Entity as ClientEntity,
    entities::shipment::{self, Entity as ShipmentEntity},
    errors::ServiceError,
    events::{Event, EventSender},
    rating::charges::shipment_charge,
    rating::TransportMode,
    services::rates::RateService,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateBillRequest {
    pub client_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Service for bill generation over closed shipment periods
#[derive(Clone)]
pub struct BillingService {
    db_pool: Arc<DbPool>,
    rates: RateService,
    event_sender: Option<Arc<EventSender>>,
}

impl BillingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        let rates = RateService::new(db_pool.clone(), None);
        Self {
            db_pool,
            rates,
            event_sender,
        }
    }

    /// Prices every shipment of the client in the closed date range and
    /// records one bill row. Strict: a single shipment whose rate cannot
    /// be resolved fails the whole bill, nothing is written.
    #[instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn generate_bill(
        &self,
        request: GenerateBillRequest,
    ) -> Result<bill::Model, ServiceError> {
        request.validate()?;

        if request.period_start > request.period_end {
            return Err(ServiceError::ValidationError(format!(
                "Billing period start {} is after end {}",
                request.period_start, request.period_end
            )));
        }

        let db = &*self.db_pool;

        ClientEntity::find_by_id(request.client_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::InvalidClient(request.client_id))?;

        let existing = BillEntity::find()
            .filter(bill::Column::ClientId.eq(request.client_id))
            .filter(bill::Column::PeriodStart.eq(request.period_start))
            .filter(bill::Column::PeriodEnd.eq(request.period_end))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Bill for client {} covering {} to {} already exists",
                request.client_id, request.period_start, request.period_end
            )));
        }

        let shipments = ShipmentEntity::find()
            .filter(shipment::Column::ClientId.eq(request.client_id))
            .filter(shipment::Column::ShipmentDate.between(request.period_start, request.period_end))
            .order_by_asc(shipment::Column::ShipmentDate)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if shipments.is_empty() {
            return Err(ServiceError::NoShipmentsInPeriod {
                client_id: request.client_id,
                period_start: request.period_start,
                period_end: request.period_end,
            });
        }

        // Shipments in a period cluster on a handful of (mode, zone) pairs,
        // so quotes are resolved once per pair.
        let mut quotes: HashMap<(TransportMode, Uuid), crate::rating::charges::RateQuote> =
            HashMap::new();
        let mut total_amount = Decimal::ZERO;

        for s in &shipments {
            let zone_id = s.zone_id.ok_or_else(|| {
                ServiceError::InvalidOperation(format!(
                    "Shipment {} has no zone assigned and cannot be billed",
                    s.wfl_number
                ))
            })?;

            let quote = match quotes.get(&(s.mode, zone_id)) {
                Some(q) => q.clone(),
                None => {
                    let q = self
                        .rates
                        .resolve_rate(request.client_id, s.mode, zone_id)
                        .await?;
                    quotes.insert((s.mode, zone_id), q.clone());
                    q
                }
            };

            let amount = shipment_charge(
                &quote,
                s.wfl_weight,
                s.wfl_volumetric_weight,
                s.invoice_value,
                s.oda.is_oda(),
            );
            total_amount += amount;
        }

        let bill_id = Uuid::new_v4();
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for bill generation");
            ServiceError::DatabaseError(e)
        })?;

        let model = BillActiveModel {
            id: Set(bill_id),
            client_id: Set(request.client_id),
            period_start: Set(request.period_start),
            period_end: Set(request.period_end),
            total_amount: Set(total_amount.round_dp(2)),
            shipment_count: Set(shipments.len() as i32),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, bill_id = %bill_id, "Failed to create bill");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, bill_id = %bill_id, "Failed to commit bill generation");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            bill_id = %bill_id,
            client_id = %request.client_id,
            shipment_count = shipments.len(),
            total_amount = %model.total_amount,
            "Bill generated"
        );

        if let Some(event_sender) = &self.event_sender {
            let event = Event::BillGenerated {
                bill_id,
                client_id: request.client_id,
                period_start: request.period_start,
                period_end: request.period_end,
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, bill_id = %bill_id, "Failed to send bill generated event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_bill(&self, bill_id: Uuid) -> Result<Option<bill::Model>, ServiceError> {
        BillEntity::find_by_id(bill_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_bills(
        &self,
        client_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<bill::Model>, u64), ServiceError> {
        let mut query = BillEntity::find();
        if let Some(client_id) = client_id {
            query = query.filter(bill::Column::ClientId.eq(client_id));
        }

        let paginator = query
            .order_by_desc(bill::Column::PeriodStart)
            .paginate(&*self.db_pool, limit);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count bills");
            ServiceError::DatabaseError(e)
        })?;
        let bills = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| {
                error!(error = %e, page = page, "Failed to fetch bills page");
                ServiceError::DatabaseError(e)
            })?;

        Ok((bills, total))
    }
}
