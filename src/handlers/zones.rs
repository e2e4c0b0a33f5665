use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::zone, errors::ServiceError, services::zones::CreateZoneRequest, ApiResponse,
    ApiResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneResponse {
    pub id: Uuid,
    #[schema(example = "North")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<zone::Model> for ZoneResponse {
    fn from(model: zone::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/zones",
    responses(
        (status = 200, description = "Zones listed", body = ApiResponse<Vec<ZoneResponse>>)
    ),
    tag = "zones"
)]
pub async fn list_zones(State(state): State<AppState>) -> ApiResult<Vec<ZoneResponse>> {
    let zones = state.services.zones.list_zones().await?;
    let items: Vec<ZoneResponse> = zones.into_iter().map(ZoneResponse::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/zones/:id",
    params(
        ("id" = Uuid, Path, description = "Zone ID")
    ),
    responses(
        (status = 200, description = "Zone fetched", body = ApiResponse<ZoneResponse>),
        (status = 404, description = "Zone not found", body = crate::errors::ErrorResponse)
    ),
    tag = "zones"
)]
pub async fn get_zone(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<ZoneResponse> {
    match state.services.zones.get_zone(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(ZoneResponse::from(model)))),
        None => Err(ServiceError::NotFound(format!("Zone {}", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/zones",
    request_body = CreateZoneRequest,
    responses(
        (status = 201, description = "Zone created", body = ApiResponse<ZoneResponse>),
        (status = 409, description = "Zone name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "zones"
)]
pub async fn create_zone(
    State(state): State<AppState>,
    Json(payload): Json<CreateZoneRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.zones.create_zone(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ZoneResponse::from(created))),
    ))
}
