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
    entities::bill, errors::ServiceError, services::billing::GenerateBillRequest, ApiResponse,
    ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[schema(example = "12485.50")]
    pub total_amount: Decimal,
    pub shipment_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<bill::Model> for BillResponse {
    fn from(model: bill::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            period_start: model.period_start,
            period_end: model.period_end,
            total_amount: model.total_amount,
            shipment_count: model.shipment_count,
            created_at: model.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/bills/generate",
    request_body = GenerateBillRequest,
    responses(
        (status = 201, description = "Bill generated", body = ApiResponse<BillResponse>),
        (status = 409, description = "Bill already exists for this client and period", body = crate::errors::ErrorResponse),
        (status = 422, description = "No shipments in period or unresolvable rate", body = crate::errors::ErrorResponse)
    ),
    tag = "bills"
)]
pub async fn generate_bill(
    State(state): State<AppState>,
    Json(payload): Json<GenerateBillRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.billing.generate_bill(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BillResponse::from(created))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bills",
    params(BillListQuery),
    responses(
        (status = 200, description = "Bills listed", body = ApiResponse<PaginatedResponse<BillResponse>>)
    ),
    tag = "bills"
)]
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<BillListQuery>,
) -> ApiResult<PaginatedResponse<BillResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state
        .services
        .billing
        .list_bills(query.client_id, page, limit)
        .await?;
    let items: Vec<BillResponse> = records.into_iter().map(BillResponse::from).collect();
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
    path = "/api/v1/bills/:id",
    params(
        ("id" = Uuid, Path, description = "Bill ID")
    ),
    responses(
        (status = 200, description = "Bill fetched", body = ApiResponse<BillResponse>),
        (status = 404, description = "Bill not found", body = crate::errors::ErrorResponse)
    ),
    tag = "bills"
)]
pub async fn get_bill(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<BillResponse> {
    match state.services.billing.get_bill(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(BillResponse::from(model)))),
        None => Err(ServiceError::NotFound(format!("Bill {}", id))),
    }
}
