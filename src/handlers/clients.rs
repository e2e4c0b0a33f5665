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
    entities::client,
    errors::ServiceError,
    services::clients::{CreateClientRequest, UpdateClientRequest},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    /// Client UUID
    pub id: Uuid,
    /// Short unique code used on dockets and bills
    #[schema(example = "ACME")]
    pub client_code: String,
    pub client_name: String,
    pub contact_number: Option<String>,
    pub email_id: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub gst_number: Option<String>,
    pub cft_multiplier: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<client::Model> for ClientResponse {
    fn from(model: client::Model) -> Self {
        Self {
            id: model.id,
            client_code: model.client_code,
            client_name: model.client_name,
            contact_number: model.contact_number,
            email_id: model.email_id,
            address: model.address,
            pin_code: model.pin_code,
            gst_number: model.gst_number,
            cft_multiplier: model.cft_multiplier,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    params(ClientListQuery),
    responses(
        (status = 200, description = "Clients listed", body = ApiResponse<PaginatedResponse<ClientResponse>>)
    ),
    tag = "clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> ApiResult<PaginatedResponse<ClientResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state.services.clients.list_clients(page, limit).await?;
    let items: Vec<ClientResponse> = records.into_iter().map(ClientResponse::from).collect();
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
    path = "/api/v1/clients/:id",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client fetched", body = ApiResponse<ClientResponse>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ClientResponse> {
    match state.services.clients.get_client(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(ClientResponse::from(model)))),
        None => Err(ServiceError::NotFound(format!("Client {}", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ApiResponse<ClientResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Client code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.clients.create_client(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ClientResponse::from(created))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/clients/:id",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<ClientResponse>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> ApiResult<ClientResponse> {
    let updated = state.services.clients.update_client(id, payload).await?;
    Ok(Json(ApiResponse::success(ClientResponse::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/:id",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Client still referenced by shipments or bills", body = crate::errors::ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.clients.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
