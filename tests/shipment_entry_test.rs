//! Shipment entry flow: master validation, ODA stamping, and server-side
//! recomputation of box weights.

mod common;

use chrono::NaiveDate;
use common::TestApp;
use rust_decimal_macros::dec;
use uuid::Uuid;

use freightdesk_api::{
    entities::vendor_pincode::OdaStatus,
    errors::ServiceError,
    rating::boxes::BoxInput,
    rating::TransportMode,
    services::shipments::ShipmentInput,
};

fn box_line(pieces: i32, l: f64, b: f64, h: f64, weight: f64) -> BoxInput {
    BoxInput {
        number_of_pieces: pieces,
        length_cm: l,
        breadth_cm: b,
        height_cm: h,
        actual_weight_per_piece: weight,
    }
}

fn shipment_input(
    client_id: Uuid,
    vendor_id: Uuid,
    zone_id: Option<Uuid>,
    mode: TransportMode,
    pin_code: &str,
    boxes: Vec<BoxInput>,
) -> ShipmentInput {
    ShipmentInput {
        client_id,
        vendor_id,
        zone_id,
        wfl_number: format!("WFL-{}", Uuid::new_v4().simple()),
        vendor_awb_number: Some("AWB-001".to_string()),
        mode,
        invoice_number: Some("INV-1001".to_string()),
        invoice_value: dec!(10000),
        consignor_from_location: Some("Delhi".to_string()),
        consignee: Some("Acme Stores".to_string()),
        destination: Some("Mumbai".to_string()),
        pin_code: pin_code.to_string(),
        actual_weight: 12.0,
        actual_volumetric_weight: 0.0,
        shipment_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        created_by: None,
        boxes,
    }
}

#[tokio::test]
async fn create_shipment_computes_weights_and_stamps_oda() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app.seed_vendor_with_pincode("400001", OdaStatus::Oda).await;
    let zone = app.seed_zone("West").await;

    // Air: one 50x40x20 piece is 8 kg volumetric; two pieces are 16 kg.
    let input = shipment_input(
        client.id,
        vendor.id,
        Some(zone.id),
        TransportMode::Air,
        "400001",
        vec![box_line(2, 50.0, 40.0, 20.0, 5.0)],
    );

    let created = app
        .state
        .services
        .shipments
        .create_shipment(input)
        .await
        .expect("shipment should be created");

    assert_eq!(created.shipment.oda, OdaStatus::Oda);
    assert_eq!(created.shipment.total_box, 1);
    assert!((created.shipment.wfl_weight - 10.0).abs() < 1e-9);
    assert!((created.shipment.wfl_volumetric_weight - 16.0).abs() < 1e-9);
    assert_eq!(created.boxes.len(), 1);
    assert!((created.boxes[0].volumetric_weight_per_piece - 8.0).abs() < 1e-9);
    assert!((created.boxes[0].total_volumetric_weight - 16.0).abs() < 1e-9);
}

#[tokio::test]
async fn create_shipment_rejects_unserviceable_pincode() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    let input = shipment_input(
        client.id,
        vendor.id,
        None,
        TransportMode::Surface,
        "110001",
        vec![box_line(1, 10.0, 10.0, 10.0, 5.0)],
    );

    let err = app
        .state
        .services
        .shipments
        .create_shipment(input)
        .await
        .expect_err("unserviceable pincode must be rejected");
    assert!(matches!(
        err,
        ServiceError::InvalidPincodeForVendor { pincode, .. } if pincode == "110001"
    ));
}

#[tokio::test]
async fn express_shipments_carry_no_volumetric_weight() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    let input = shipment_input(
        client.id,
        vendor.id,
        None,
        TransportMode::Express,
        "400001",
        vec![box_line(3, 100.0, 100.0, 100.0, 2.0)],
    );

    let created = app
        .state
        .services
        .shipments
        .create_shipment(input)
        .await
        .expect("express shipment should be created");

    assert_eq!(created.shipment.wfl_volumetric_weight, 0.0);
    assert!((created.shipment.wfl_weight - 6.0).abs() < 1e-9);
}

#[tokio::test]
async fn surface_volumetric_uses_rate_master_cft() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;
    let zone = app.seed_zone("West").await;

    // Rate master carries CFT 1.0; raise it to 6.0 so the factor is visible.
    let master = app
        .seed_rate_master(client.id, TransportMode::Surface, zone.id, dec!(10))
        .await;
    app.state
        .services
        .rates
        .update_rate_master(
            master.rate.id,
            freightdesk_api::services::rates::UpdateRateMasterRequest {
                cft: Some(6.0),
                ..Default::default()
            },
        )
        .await
        .expect("update cft");

    // 30x30x30 surface at CFT 6: 27000 * 6 / 27000 = 6 kg per piece.
    let input = shipment_input(
        client.id,
        vendor.id,
        Some(zone.id),
        TransportMode::Surface,
        "400001",
        vec![box_line(1, 30.0, 30.0, 30.0, 1.0)],
    );

    let created = app
        .state
        .services
        .shipments
        .create_shipment(input)
        .await
        .expect("surface shipment should be created");

    assert!((created.shipment.wfl_volumetric_weight - 6.0).abs() < 1e-9);
}

#[tokio::test]
async fn update_shipment_replaces_boxes_and_recomputes() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    let created = app
        .state
        .services
        .shipments
        .create_shipment(shipment_input(
            client.id,
            vendor.id,
            None,
            TransportMode::Air,
            "400001",
            vec![box_line(2, 50.0, 40.0, 20.0, 5.0)],
        ))
        .await
        .expect("create");

    let mut updated_input = shipment_input(
        client.id,
        vendor.id,
        None,
        TransportMode::Air,
        "400001",
        vec![
            box_line(1, 50.0, 40.0, 20.0, 3.0),
            box_line(1, 25.0, 40.0, 20.0, 3.0),
        ],
    );
    updated_input.wfl_number = created.shipment.wfl_number.clone();

    let updated = app
        .state
        .services
        .shipments
        .update_shipment(created.shipment.id, updated_input)
        .await
        .expect("update");

    assert_eq!(updated.shipment.total_box, 2);
    assert_eq!(updated.boxes.len(), 2);
    // 8 kg + 4 kg volumetric from the new box set.
    assert!((updated.shipment.wfl_volumetric_weight - 12.0).abs() < 1e-9);
    assert!((updated.shipment.wfl_weight - 6.0).abs() < 1e-9);
    assert!(updated.shipment.updated_at.is_some());

    // The original box rows are gone.
    let fetched = app
        .state
        .services
        .shipments
        .get_shipment(created.shipment.id)
        .await
        .expect("fetch")
        .expect("shipment exists");
    assert_eq!(fetched.boxes.len(), 2);
}

#[tokio::test]
async fn box_lines_read_back_in_entry_order() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    // Distinct lengths so the order is observable; every row shares one
    // created_at, so the timestamp alone cannot order them.
    let lengths = [70.0, 10.0, 40.0];
    let boxes = lengths
        .iter()
        .map(|l| box_line(1, *l, 20.0, 20.0, 5.0))
        .collect();

    let created = app
        .state
        .services
        .shipments
        .create_shipment(shipment_input(
            client.id,
            vendor.id,
            None,
            TransportMode::Surface,
            "400001",
            boxes,
        ))
        .await
        .expect("create");

    let fetched = app
        .state
        .services
        .shipments
        .get_shipment(created.shipment.id)
        .await
        .expect("fetch")
        .expect("shipment exists");

    let read_back: Vec<f64> = fetched.boxes.iter().map(|b| b.length_cm).collect();
    assert_eq!(read_back, lengths);
    let indices: Vec<i32> = fetched.boxes.iter().map(|b| b.line_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[tokio::test]
async fn delete_shipment_removes_boxes() {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    let created = app
        .state
        .services
        .shipments
        .create_shipment(shipment_input(
            client.id,
            vendor.id,
            None,
            TransportMode::Surface,
            "400001",
            vec![box_line(1, 10.0, 10.0, 10.0, 5.0)],
        ))
        .await
        .expect("create");

    app.state
        .services
        .shipments
        .delete_shipment(created.shipment.id)
        .await
        .expect("delete");

    let fetched = app
        .state
        .services
        .shipments
        .get_shipment(created.shipment.id)
        .await
        .expect("fetch");
    assert!(fetched.is_none());

    let err = app
        .state
        .services
        .shipments
        .delete_shipment(created.shipment.id)
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_shipments_filters_by_client_and_date() {
    let app = TestApp::new().await;
    let client_a = app.seed_client("ACME").await;
    let client_b = app.seed_client("BETA").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;

    for (client_id, day) in [(client_a.id, 10), (client_a.id, 20), (client_b.id, 10)] {
        let mut input = shipment_input(
            client_id,
            vendor.id,
            None,
            TransportMode::Surface,
            "400001",
            vec![box_line(1, 10.0, 10.0, 10.0, 5.0)],
        );
        input.shipment_date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        app.state
            .services
            .shipments
            .create_shipment(input)
            .await
            .expect("create");
    }

    let (records, total) = app
        .state
        .services
        .shipments
        .list_shipments(
            freightdesk_api::services::shipments::ShipmentFilter {
                client_id: Some(client_a.id),
                from_date: NaiveDate::from_ymd_opt(2026, 3, 15),
                to_date: NaiveDate::from_ymd_opt(2026, 3, 31),
            },
            1,
            20,
        )
        .await
        .expect("list");

    assert_eq!(total, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].client_id, client_a.id);
    assert_eq!(
        records[0].shipment_date,
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    );
}
