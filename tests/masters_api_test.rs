//! HTTP surface for the master-data endpoints: clients, vendors and their
//! serviceable pincodes, zones, and rate quotes.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

use freightdesk_api::{entities::vendor_pincode::OdaStatus, rating::TransportMode};

#[tokio::test]
async fn client_crud_over_http() {
    let app = TestApp::new().await;

    let create = app
        .request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "client_code": "ACME",
                "client_name": "Acme Industries",
                "email_id": "ops@acme.example"
            })),
        )
        .await;
    assert_eq!(create.status(), StatusCode::CREATED);
    let body = response_json(create).await;
    assert_eq!(body["success"], true);
    let client_id = body["data"]["id"].as_str().expect("client id").to_string();
    assert!(body["meta"]["request_id"].is_string());

    // Duplicate code is a conflict.
    let duplicate = app
        .request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "client_code": "ACME",
                "client_name": "Another Acme"
            })),
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let fetched = app
        .request(Method::GET, &format!("/api/v1/clients/{}", client_id), None)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched_body = response_json(fetched).await;
    assert_eq!(fetched_body["data"]["client_code"], "ACME");

    let update = app
        .request(
            Method::PUT,
            &format!("/api/v1/clients/{}", client_id),
            Some(json!({ "client_name": "Acme Industries Ltd" })),
        )
        .await;
    assert_eq!(update.status(), StatusCode::OK);
    let updated_body = response_json(update).await;
    assert_eq!(updated_body["data"]["client_name"], "Acme Industries Ltd");

    let listed = app
        .request(Method::GET, "/api/v1/clients?page=1&limit=10", None)
        .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed_body = response_json(listed).await;
    assert_eq!(listed_body["data"]["total"], 1);

    let delete = app
        .request(
            Method::DELETE,
            &format!("/api/v1/clients/{}", client_id),
            None,
        )
        .await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let gone = app
        .request(Method::GET, &format!("/api/v1/clients/{}", client_id), None)
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_client_payload_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "client_code": "",
                "client_name": "Nameless"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap_or("").contains("Validation"));
}

#[tokio::test]
async fn vendor_pincodes_and_serviceability_probe() {
    let app = TestApp::new().await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    let add = app
        .request(
            Method::POST,
            &format!("/api/v1/vendors/{}/pincodes", vendor.id),
            Some(json!({ "pincode": "790001", "oda": "oda" })),
        )
        .await;
    assert_eq!(add.status(), StatusCode::CREATED);

    let duplicate = app
        .request(
            Method::POST,
            &format!("/api/v1/vendors/{}/pincodes", vendor.id),
            Some(json!({ "pincode": "790001", "oda": "normal" })),
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let listed = app
        .request(
            Method::GET,
            &format!("/api/v1/vendors/{}/pincodes", vendor.id),
            None,
        )
        .await;
    let listed_body = response_json(listed).await;
    assert_eq!(listed_body["data"].as_array().map(|a| a.len()), Some(2));

    let probe = app
        .request(
            Method::GET,
            &format!("/api/v1/vendors/{}/serviceability?pincode=790001", vendor.id),
            None,
        )
        .await;
    assert_eq!(probe.status(), StatusCode::OK);
    let probe_body = response_json(probe).await;
    assert_eq!(probe_body["data"]["serviceable"], true);
    assert_eq!(probe_body["data"]["oda"], "oda");

    let miss = app
        .request(
            Method::GET,
            &format!("/api/v1/vendors/{}/serviceability?pincode=560001", vendor.id),
            None,
        )
        .await;
    let miss_body = response_json(miss).await;
    assert_eq!(miss_body["data"]["serviceable"], false);
    assert!(miss_body["data"].get("oda").is_none());

    let remove = app
        .request(
            Method::DELETE,
            &format!("/api/v1/vendors/{}/pincodes/790001", vendor.id),
            None,
        )
        .await;
    assert_eq!(remove.status(), StatusCode::NO_CONTENT);

    let remove_again = app
        .request(
            Method::DELETE,
            &format!("/api/v1/vendors/{}/pincodes/790001", vendor.id),
            None,
        )
        .await;
    assert_eq!(remove_again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zone_names_are_unique() {
    let app = TestApp::new().await;

    let first = app
        .request(Method::POST, "/api/v1/zones", Some(json!({ "name": "North" })))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .request(Method::POST, "/api/v1/zones", Some(json!({ "name": "North" })))
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let listed = app.request(Method::GET, "/api/v1/zones", None).await;
    let body = response_json(listed).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn rate_quote_endpoint_resolves_and_rejects() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let zone = app.seed_zone("West").await;
    app.seed_rate_master(client.id, TransportMode::Surface, zone.id, dec!(12.5))
        .await;

    // "sfc" is the legacy surface alias.
    let quote = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/rates/quote?client_id={}&mode=sfc&zone_id={}",
                client.id, zone.id
            ),
            None,
        )
        .await;
    assert_eq!(quote.status(), StatusCode::OK);
    let quote_body = response_json(quote).await;
    assert_eq!(quote_body["data"]["rate_per_kg"], "12.5");
    assert_eq!(quote_body["data"]["minimum_weight"], 20.0);

    // No air rate master for this client.
    let missing_mode = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/rates/quote?client_id={}&mode=air&zone_id={}",
                client.id, zone.id
            ),
            None,
        )
        .await;
    assert_eq!(missing_mode.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bad_mode = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/rates/quote?client_id={}&mode=teleport&zone_id={}",
                client.id, zone.id
            ),
            None,
        )
        .await;
    assert_eq!(bad_mode.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn client_with_shipments_cannot_be_deleted() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    let create = app
        .request(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "client_id": client.id,
                "vendor_id": vendor.id,
                "zone_id": null,
                "wfl_number": "WFL-HTTP-1",
                "mode": "surface",
                "invoice_value": "2500",
                "pin_code": "400001",
                "actual_weight": 5.0,
                "actual_volumetric_weight": 0.0,
                "shipment_date": "2026-03-15",
                "boxes": [{
                    "number_of_pieces": 1,
                    "length_cm": 10.0,
                    "breadth_cm": 10.0,
                    "height_cm": 10.0,
                    "actual_weight_per_piece": 5.0
                }]
            })),
        )
        .await;
    assert_eq!(create.status(), StatusCode::CREATED);

    let delete = app
        .request(
            Method::DELETE,
            &format!("/api/v1/clients/{}", client.id),
            None,
        )
        .await;
    assert_eq!(delete.status(), StatusCode::CONFLICT);
}
