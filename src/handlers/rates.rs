use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    rating::charges::RateQuote,
    rating::TransportMode,
    services::rates::{CreateRateMasterRequest, RateMaster, UpdateRateMasterRequest},
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RateQuoteQuery {
    pub client_id: Uuid,
    /// Transport mode (air, surface, express; "sfc" accepted for surface)
    #[param(example = "surface")]
    pub mode: String,
    pub zone_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneRateResponse {
    pub zone_id: Uuid,
    pub rate_per_kg: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateMasterResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub mode: TransportMode,
    pub cft: f64,
    pub minimum_weight: f64,
    pub minimum_freight: Decimal,
    pub docket_charges: Decimal,
    pub fuel_pct: Decimal,
    pub fov_pct: Decimal,
    pub oda_charge: Decimal,
    pub other_charges: Decimal,
    pub zone_rates: Vec<ZoneRateResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RateMaster> for RateMasterResponse {
    fn from(master: RateMaster) -> Self {
        Self {
            id: master.rate.id,
            client_id: master.rate.client_id,
            mode: master.rate.mode,
            cft: master.rate.cft,
            minimum_weight: master.rate.minimum_weight,
            minimum_freight: master.rate.minimum_freight,
            docket_charges: master.rate.docket_charges,
            fuel_pct: master.rate.fuel_pct,
            fov_pct: master.rate.fov_pct,
            oda_charge: master.rate.oda_charge,
            other_charges: master.rate.other_charges,
            zone_rates: master
                .zone_rates
                .into_iter()
                .map(|zr| ZoneRateResponse {
                    zone_id: zr.zone_id,
                    rate_per_kg: zr.rate_per_kg,
                })
                .collect(),
            created_at: master.rate.created_at,
            updated_at: master.rate.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/rates",
    request_body = CreateRateMasterRequest,
    responses(
        (status = 201, description = "Rate master created", body = ApiResponse<RateMasterResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Rate master already exists for client and mode", body = crate::errors::ErrorResponse)
    ),
    tag = "rates"
)]
pub async fn create_rate_master(
    State(state): State<AppState>,
    Json(payload): Json<CreateRateMasterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.rates.create_rate_master(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RateMasterResponse::from(created))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/rates/by-client/:client_id",
    params(
        ("client_id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Rate masters listed", body = ApiResponse<Vec<RateMasterResponse>>),
        (status = 400, description = "Unknown client", body = crate::errors::ErrorResponse)
    ),
    tag = "rates"
)]
pub async fn rates_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> ApiResult<Vec<RateMasterResponse>> {
    let rates = state.services.rates.rates_for_client(client_id).await?;
    let items: Vec<RateMasterResponse> = rates.into_iter().map(RateMasterResponse::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    put,
    path = "/api/v1/rates/:id",
    params(
        ("id" = Uuid, Path, description = "Rate master ID")
    ),
    request_body = UpdateRateMasterRequest,
    responses(
        (status = 200, description = "Rate master updated", body = ApiResponse<RateMasterResponse>),
        (status = 404, description = "Rate master not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rates"
)]
pub async fn update_rate_master(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRateMasterRequest>,
) -> ApiResult<RateMasterResponse> {
    let updated = state.services.rates.update_rate_master(id, payload).await?;
    Ok(Json(ApiResponse::success(RateMasterResponse::from(updated))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rates/quote",
    params(RateQuoteQuery),
    responses(
        (status = 200, description = "Resolved rate quote", body = ApiResponse<RateQuote>),
        (status = 422, description = "No rate configured for the client, mode, or zone", body = crate::errors::ErrorResponse)
    ),
    tag = "rates"
)]
pub async fn get_rate_quote(
    State(state): State<AppState>,
    Query(query): Query<RateQuoteQuery>,
) -> ApiResult<RateQuote> {
    let mode = parse_transport_mode(&query.mode)?;
    let quote = state
        .services
        .rates
        .resolve_rate(query.client_id, mode, query.zone_id)
        .await?;
    Ok(Json(ApiResponse::success(quote)))
}

pub(crate) fn parse_transport_mode(value: &str) -> Result<TransportMode, ServiceError> {
    value
        .parse::<TransportMode>()
        .map_err(ServiceError::ValidationError)
}
