use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entities::shipment,
    entities::shipment_box,
    entities::vendor_pincode::OdaStatus,
    errors::ServiceError,
    rating::TransportMode,
    services::shipments::{ShipmentFilter, ShipmentInput, ShipmentWithBoxes},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShipmentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub client_id: Option<Uuid>,
    /// Earliest shipment date to include (YYYY-MM-DD)
    pub from_date: Option<NaiveDate>,
    /// Latest shipment date to include (YYYY-MM-DD)
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentBoxResponse {
    pub id: Uuid,
    pub line_index: i32,
    pub number_of_pieces: i32,
    pub length_cm: f64,
    pub breadth_cm: f64,
    pub height_cm: f64,
    pub actual_weight_per_piece: f64,
    pub volumetric_weight_per_piece: f64,
    pub total_volumetric_weight: f64,
}

impl From<shipment_box::Model> for ShipmentBoxResponse {
    fn from(model: shipment_box::Model) -> Self {
        Self {
            id: model.id,
            line_index: model.line_index,
            number_of_pieces: model.number_of_pieces,
            length_cm: model.length_cm,
            breadth_cm: model.breadth_cm,
            height_cm: model.height_cm,
            actual_weight_per_piece: model.actual_weight_per_piece,
            volumetric_weight_per_piece: model.volumetric_weight_per_piece,
            total_volumetric_weight: model.total_volumetric_weight,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentSummary {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vendor_id: Uuid,
    pub zone_id: Option<Uuid>,
    #[schema(example = "WFL-2026-00042")]
    pub wfl_number: String,
    pub vendor_awb_number: Option<String>,
    pub mode: TransportMode,
    pub invoice_number: Option<String>,
    pub invoice_value: Decimal,
    pub consignor_from_location: Option<String>,
    pub consignee: Option<String>,
    pub destination: Option<String>,
    pub pin_code: String,
    pub oda: OdaStatus,
    pub total_box: i32,
    pub actual_weight: f64,
    pub actual_volumetric_weight: f64,
    pub wfl_weight: f64,
    pub wfl_volumetric_weight: f64,
    pub shipment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<shipment::Model> for ShipmentSummary {
    fn from(model: shipment::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            vendor_id: model.vendor_id,
            zone_id: model.zone_id,
            wfl_number: model.wfl_number,
            vendor_awb_number: model.vendor_awb_number,
            mode: model.mode,
            invoice_number: model.invoice_number,
            invoice_value: model.invoice_value,
            consignor_from_location: model.consignor_from_location,
            consignee: model.consignee,
            destination: model.destination,
            pin_code: model.pin_code,
            oda: model.oda,
            total_box: model.total_box,
            actual_weight: model.actual_weight,
            actual_volumetric_weight: model.actual_volumetric_weight,
            wfl_weight: model.wfl_weight,
            wfl_volumetric_weight: model.wfl_volumetric_weight,
            shipment_date: model.shipment_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentResponse {
    #[serde(flatten)]
    pub shipment: ShipmentSummary,
    pub boxes: Vec<ShipmentBoxResponse>,
}

impl From<ShipmentWithBoxes> for ShipmentResponse {
    fn from(value: ShipmentWithBoxes) -> Self {
        Self {
            shipment: ShipmentSummary::from(value.shipment),
            boxes: value
                .boxes
                .into_iter()
                .map(ShipmentBoxResponse::from)
                .collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    params(ShipmentListQuery),
    responses(
        (status = 200, description = "Shipments listed", body = ApiResponse<PaginatedResponse<ShipmentSummary>>)
    ),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<ShipmentListQuery>,
) -> ApiResult<PaginatedResponse<ShipmentSummary>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let filter = ShipmentFilter {
        client_id: query.client_id,
        from_date: query.from_date,
        to_date: query.to_date,
    };

    let (records, total) = state
        .services
        .shipments
        .list_shipments(filter, page, limit)
        .await?;
    let items: Vec<ShipmentSummary> = records.into_iter().map(ShipmentSummary::from).collect();
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/:id",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment fetched", body = ApiResponse<ShipmentResponse>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentResponse> {
    match state.services.shipments.get_shipment(id).await? {
        Some(record) => Ok(Json(ApiResponse::success(ShipmentResponse::from(record)))),
        None => Err(ServiceError::NotFound(format!("Shipment {}", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = ShipmentInput,
    responses(
        (status = 201, description = "Shipment created", body = ApiResponse<ShipmentResponse>),
        (status = 400, description = "Invalid request or unserviceable pincode", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(payload): Json<ShipmentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.shipments.create_shipment(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ShipmentResponse::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/shipments/:id",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    request_body = ShipmentInput,
    responses(
        (status = 200, description = "Shipment updated", body = ApiResponse<ShipmentResponse>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ShipmentInput>,
) -> ApiResult<ShipmentResponse> {
    let updated = state.services.shipments.update_shipment(id, payload).await?;
    Ok(Json(ApiResponse::success(ShipmentResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shipments/:id",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    responses(
        (status = 204, description = "Shipment deleted"),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.shipments.delete_shipment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
