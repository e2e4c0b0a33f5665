use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use freightdesk_api::{
    app_routes,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{client, vendor, vendor_pincode::OdaStatus, zone},
    events::{self, EventSender},
    rating::TransportMode,
    services::clients::CreateClientRequest,
    services::rates::{CreateRateMasterRequest, RateMaster, ZoneRateInput},
    services::vendors::{AddPincodeRequest, CreateVendorRequest},
    services::zones::CreateZoneRequest,
    AppState,
};

/// Test harness backed by an in-memory SQLite database with the embedded
/// migrations applied. The pool is pinned to a single connection so the
/// in-memory database survives across queries.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );

        let db_cfg = DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_task = tokio::spawn(events::process_events(event_rx));
        let event_sender = Arc::new(EventSender::new(event_tx));

        let state = AppState::new(Arc::new(pool), cfg, Some(event_sender));
        let router = app_routes()
            .layer(axum::middleware::from_fn(
                freightdesk_api::observability::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub async fn request(&self, method: Method, path: &str, payload: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        let request = match payload {
            Some(value) => builder.body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail at the transport level")
    }

    pub async fn seed_client(&self, code: &str) -> client::Model {
        self.state
            .services
            .clients
            .create_client(CreateClientRequest {
                client_code: code.to_string(),
                client_name: format!("{} Industries", code),
                contact_number: None,
                email_id: None,
                address: None,
                pin_code: None,
                gst_number: None,
                cft_multiplier: None,
                created_by: None,
            })
            .await
            .expect("seed client")
    }

    pub async fn seed_vendor_with_pincode(&self, pincode: &str, oda: OdaStatus) -> vendor::Model {
        let vendor = self
            .state
            .services
            .vendors
            .create_vendor(CreateVendorRequest {
                name: format!("Carrier {}", pincode),
                contact_number: None,
                email: None,
                address: None,
                pincode: None,
                gst_number: None,
            })
            .await
            .expect("seed vendor");

        self.state
            .services
            .vendors
            .add_pincode(
                vendor.id,
                AddPincodeRequest {
                    pincode: pincode.to_string(),
                    oda,
                },
            )
            .await
            .expect("seed vendor pincode");

        vendor
    }

    pub async fn seed_zone(&self, name: &str) -> zone::Model {
        self.state
            .services
            .zones
            .create_zone(CreateZoneRequest {
                name: name.to_string(),
            })
            .await
            .expect("seed zone")
    }

    /// One rate master covering a single zone with sensible defaults for
    /// pricing tests: 10/kg, 20 kg minimum, 300 minimum freight, 10% fuel,
    /// 2% FOV, 50 docket, 25 other, 750 ODA.
    pub async fn seed_rate_master(
        &self,
        client_id: Uuid,
        mode: TransportMode,
        zone_id: Uuid,
        rate_per_kg: Decimal,
    ) -> RateMaster {
        self.state
            .services
            .rates
            .create_rate_master(CreateRateMasterRequest {
                client_id,
                mode,
                cft: Some(1.0),
                minimum_weight: 20.0,
                minimum_freight: dec!(300),
                docket_charges: dec!(50),
                fuel_pct: dec!(10),
                fov_pct: dec!(2),
                oda_charge: dec!(750),
                other_charges: dec!(25),
                zone_rates: vec![ZoneRateInput {
                    zone_id,
                    rate_per_kg,
                }],
            })
            .await
            .expect("seed rate master")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
