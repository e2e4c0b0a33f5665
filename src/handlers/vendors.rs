use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entities::vendor,
    entities::vendor_pincode::{self, OdaStatus},
    errors::ServiceError,
    services::vendors::{AddPincodeRequest, CreateVendorRequest, UpdateVendorRequest},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VendorListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceabilityQuery {
    /// Destination pincode to probe
    #[param(example = "110001")]
    pub pincode: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<vendor::Model> for VendorResponse {
    fn from(model: vendor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_number: model.contact_number,
            email: model.email,
            address: model.address,
            pincode: model.pincode,
            gst_number: model.gst_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorPincodeResponse {
    pub id: Uuid,
    pub vendor_id: Uuid,
    #[schema(example = "110001")]
    pub pincode: String,
    pub oda: OdaStatus,
    pub created_at: DateTime<Utc>,
}

impl From<vendor_pincode::Model> for VendorPincodeResponse {
    fn from(model: vendor_pincode::Model) -> Self {
        Self {
            id: model.id,
            vendor_id: model.vendor_id,
            pincode: model.pincode,
            oda: model.oda,
            created_at: model.created_at,
        }
    }
}

/// Answer to a serviceability probe for one (vendor, pincode) pair.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceabilityResponse {
    pub vendor_id: Uuid,
    pub pincode: String,
    pub serviceable: bool,
    /// ODA flag when serviceable, absent otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oda: Option<OdaStatus>,
}

#[utoipa::path(
    get,
    path = "/api/v1/vendors",
    params(VendorListQuery),
    responses(
        (status = 200, description = "Vendors listed", body = ApiResponse<PaginatedResponse<VendorResponse>>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<VendorListQuery>,
) -> ApiResult<PaginatedResponse<VendorResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state.services.vendors.list_vendors(page, limit).await?;
    let items: Vec<VendorResponse> = records.into_iter().map(VendorResponse::from).collect();
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
    path = "/api/v1/vendors/:id",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Vendor fetched", body = ApiResponse<VendorResponse>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<VendorResponse> {
    match state.services.vendors.get_vendor(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(VendorResponse::from(model)))),
        None => Err(ServiceError::NotFound(format!("Vendor {}", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = ApiResponse<VendorResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.vendors.create_vendor(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VendorResponse::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/vendors/:id",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    request_body = UpdateVendorRequest,
    responses(
        (status = 200, description = "Vendor updated", body = ApiResponse<VendorResponse>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> ApiResult<VendorResponse> {
    let updated = state.services.vendors.update_vendor(id, payload).await?;
    Ok(Json(ApiResponse::success(VendorResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vendors/:id",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Vendor still referenced by shipments", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.vendors.delete_vendor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/vendors/:id/pincodes",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Serviceable pincodes listed", body = ApiResponse<Vec<VendorPincodeResponse>>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn list_pincodes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<VendorPincodeResponse>> {
    let pincodes = state.services.vendors.list_pincodes(id).await?;
    let items: Vec<VendorPincodeResponse> = pincodes
        .into_iter()
        .map(VendorPincodeResponse::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/vendors/:id/pincodes",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    request_body = AddPincodeRequest,
    responses(
        (status = 201, description = "Pincode added", body = ApiResponse<VendorPincodeResponse>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Pincode already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn add_pincode(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddPincodeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.vendors.add_pincode(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VendorPincodeResponse::from(created))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vendors/:id/pincodes/:pincode",
    params(
        ("id" = Uuid, Path, description = "Vendor ID"),
        ("pincode" = String, Path, description = "Pincode to remove")
    ),
    responses(
        (status = 204, description = "Pincode removed"),
        (status = 404, description = "Vendor or pincode not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn remove_pincode(
    State(state): State<AppState>,
    Path((id, pincode)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.vendors.remove_pincode(id, &pincode).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/vendors/:id/serviceability",
    params(
        ("id" = Uuid, Path, description = "Vendor ID"),
        ServiceabilityQuery
    ),
    responses(
        (status = 200, description = "Serviceability result", body = ApiResponse<ServiceabilityResponse>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn check_serviceability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ServiceabilityQuery>,
) -> ApiResult<ServiceabilityResponse> {
    state
        .services
        .vendors
        .get_vendor(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Vendor {}", id)))?;

    let row = state.services.vendors.lookup_pincode(id, &query.pincode).await?;
    let response = ServiceabilityResponse {
        vendor_id: id,
        pincode: query.pincode,
        serviceable: row.is_some(),
        oda: row.map(|r| r.oda),
    };
    Ok(Json(ApiResponse::success(response)))
}
