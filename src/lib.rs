//! FreightDesk API Library
//!
//! Core functionality for the FreightDesk back-office API: client and
//! vendor masters, zone rate cards, shipment entry, and bill generation.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod observability;
pub mod openapi;
pub mod rating;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::db::DbPool;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DbPool>,
        config: config::AppConfig,
        event_sender: Option<Arc<events::EventSender>>,
    ) -> Self {
        let services = handlers::AppServices::new(db.clone(), event_sender);
        Self {
            db,
            config,
            services,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::observability::current_request_id()
                .map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    let clients = Router::new()
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients", post(handlers::clients::create_client))
        .route("/clients/:id", get(handlers::clients::get_client))
        .route("/clients/:id", put(handlers::clients::update_client))
        .route("/clients/:id", delete(handlers::clients::delete_client));

    let vendors = Router::new()
        .route("/vendors", get(handlers::vendors::list_vendors))
        .route("/vendors", post(handlers::vendors::create_vendor))
        .route("/vendors/:id", get(handlers::vendors::get_vendor))
        .route("/vendors/:id", put(handlers::vendors::update_vendor))
        .route("/vendors/:id", delete(handlers::vendors::delete_vendor))
        .route(
            "/vendors/:id/pincodes",
            get(handlers::vendors::list_pincodes),
        )
        .route("/vendors/:id/pincodes", post(handlers::vendors::add_pincode))
        .route(
            "/vendors/:id/pincodes/:pincode",
            delete(handlers::vendors::remove_pincode),
        )
        .route(
            "/vendors/:id/serviceability",
            get(handlers::vendors::check_serviceability),
        );

    let zones = Router::new()
        .route("/zones", get(handlers::zones::list_zones))
        .route("/zones", post(handlers::zones::create_zone))
        .route("/zones/:id", get(handlers::zones::get_zone));

    let rates = Router::new()
        .route("/rates", post(handlers::rates::create_rate_master))
        .route("/rates/quote", get(handlers::rates::get_rate_quote))
        .route(
            "/rates/by-client/:client_id",
            get(handlers::rates::rates_for_client),
        )
        .route("/rates/:id", put(handlers::rates::update_rate_master));

    let shipments = Router::new()
        .route("/shipments", get(handlers::shipments::list_shipments))
        .route("/shipments", post(handlers::shipments::create_shipment))
        .route("/shipments/:id", get(handlers::shipments::get_shipment))
        .route("/shipments/:id", put(handlers::shipments::update_shipment))
        .route(
            "/shipments/:id",
            delete(handlers::shipments::delete_shipment),
        );

    let bills = Router::new()
        .route("/bills/generate", post(handlers::bills::generate_bill))
        .route("/bills", get(handlers::bills::list_bills))
        .route("/bills/:id", get(handlers::bills::get_bill));

    Router::new()
        .merge(clients)
        .merge(vendors)
        .merge(zones)
        .merge(rates)
        .merge(shipments)
        .merge(bills)
        .route("/status", get(api_status))
}

pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_routes())
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "freightdesk-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use chrono::DateTime;

    use super::*;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response = crate::observability::scope_request_id(
            crate::observability::RequestId::new("meta-123"),
            async { ApiResponse::success("ok") },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response = crate::observability::scope_request_id(
            crate::observability::RequestId::new("meta-err"),
            async { ApiResponse::<()>::error("oops".into()) },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
        assert!(!response.success);
    }
}
