//! Bill generation: pricing formula, period handling, and strict failure
//! when a shipment's rate cannot be resolved.

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
    services::billing::GenerateBillRequest,
    services::shipments::ShipmentInput,
};

struct BillingFixture {
    app: TestApp,
    client_id: Uuid,
    vendor_id: Uuid,
    zone_id: Uuid,
}

async fn fixture() -> BillingFixture {
    let app = TestApp::new().await;
    let client = app.seed_client("ACME").await;
    let vendor = app
        .seed_vendor_with_pincode("400001", OdaStatus::Normal)
        .await;
    let zone = app.seed_zone("West").await;
    app.seed_rate_master(client.id, TransportMode::Surface, zone.id, dec!(10))
        .await;
    BillingFixture {
        app,
        client_id: client.id,
        vendor_id: vendor.id,
        zone_id: zone.id,
    }
}

impl BillingFixture {
    /// One surface shipment with 4 pieces of 10 kg each (40 kg actual,
    /// negligible volumetric) on the given day of March 2026.
    async fn seed_shipment(&self, day: u32) {
        self.seed_shipment_to(self.vendor_id, "400001", day).await;
    }

    async fn seed_shipment_to(&self, vendor_id: Uuid, pin_code: &str, day: u32) {
        let input = ShipmentInput {
            client_id: self.client_id,
            vendor_id,
            zone_id: Some(self.zone_id),
            wfl_number: format!("WFL-{}", Uuid::new_v4().simple()),
            vendor_awb_number: None,
            mode: TransportMode::Surface,
            invoice_number: None,
            invoice_value: dec!(10000),
            consignor_from_location: None,
            consignee: None,
            destination: None,
            pin_code: pin_code.to_string(),
            actual_weight: 40.0,
            actual_volumetric_weight: 0.0,
            shipment_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            created_by: None,
            boxes: vec![BoxInput {
                number_of_pieces: 4,
                length_cm: 10.0,
                breadth_cm: 10.0,
                height_cm: 10.0,
                actual_weight_per_piece: 10.0,
            }],
        };
        self.app
            .state
            .services
            .shipments
            .create_shipment(input)
            .await
            .expect("seed shipment");
    }

    fn march_request(&self) -> GenerateBillRequest {
        GenerateBillRequest {
            client_id: self.client_id,
            period_start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        }
    }
}

#[tokio::test]
async fn rate_resolution_is_read_only_and_repeatable() {
    let fx = fixture().await;

    let first = fx
        .app
        .state
        .services
        .rates
        .resolve_rate(fx.client_id, TransportMode::Surface, fx.zone_id)
        .await
        .expect("quote resolves");
    let second = fx
        .app
        .state
        .services
        .rates
        .resolve_rate(fx.client_id, TransportMode::Surface, fx.zone_id)
        .await
        .expect("quote resolves again");

    assert_eq!(first, second);
    assert_eq!(first.rate_per_kg, dec!(10));
}

#[tokio::test]
async fn generates_bill_with_full_pricing_formula() {
    let fx = fixture().await;
    fx.seed_shipment(10).await;
    fx.seed_shipment(20).await;

    let bill = fx
        .app
        .state
        .services
        .billing
        .generate_bill(fx.march_request())
        .await
        .expect("bill should generate");

    // Per shipment: 40 kg * 10 = 400 base, 40 fuel, 200 FOV on 10000
    // invoice, 50 docket, 25 other = 715.
    assert_eq!(bill.shipment_count, 2);
    assert_eq!(bill.total_amount, dec!(1430));
    assert_eq!(bill.client_id, fx.client_id);
}

#[tokio::test]
async fn minimum_weight_and_freight_floor_light_shipments() {
    let fx = fixture().await;

    // 1 piece of 2 kg, tiny box: chargeable weight floors to 20 kg, base
    // freight 200 floors to the 300 minimum.
    let input = ShipmentInput {
        client_id: fx.client_id,
        vendor_id: fx.vendor_id,
        zone_id: Some(fx.zone_id),
        wfl_number: "WFL-LIGHT".to_string(),
        vendor_awb_number: None,
        mode: TransportMode::Surface,
        invoice_number: None,
        invoice_value: dec!(0),
        consignor_from_location: None,
        consignee: None,
        destination: None,
        pin_code: "400001".to_string(),
        actual_weight: 2.0,
        actual_volumetric_weight: 0.0,
        shipment_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        created_by: None,
        boxes: vec![BoxInput {
            number_of_pieces: 1,
            length_cm: 10.0,
            breadth_cm: 10.0,
            height_cm: 10.0,
            actual_weight_per_piece: 2.0,
        }],
    };
    fx.app
        .state
        .services
        .shipments
        .create_shipment(input)
        .await
        .expect("seed shipment");

    let bill = fx
        .app
        .state
        .services
        .billing
        .generate_bill(fx.march_request())
        .await
        .expect("bill should generate");

    // 300 base + 30 fuel + 0 FOV + 50 docket + 25 other.
    assert_eq!(bill.total_amount, dec!(405));
}

#[tokio::test]
async fn oda_destination_adds_oda_charge() {
    let fx = fixture().await;
    let oda_vendor = fx
        .app
        .seed_vendor_with_pincode("790001", OdaStatus::Oda)
        .await;
    fx.seed_shipment_to(oda_vendor.id, "790001", 12).await;

    let bill = fx
        .app
        .state
        .services
        .billing
        .generate_bill(fx.march_request())
        .await
        .expect("bill should generate");

    // 715 as in the normal case, plus the 750 ODA charge.
    assert_eq!(bill.total_amount, dec!(1465));
}

#[tokio::test]
async fn empty_period_is_rejected() {
    let fx = fixture().await;
    fx.seed_shipment(10).await;

    let err = fx
        .app
        .state
        .services
        .billing
        .generate_bill(GenerateBillRequest {
            client_id: fx.client_id,
            period_start: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
        })
        .await
        .expect_err("no shipments in April");
    assert!(matches!(err, ServiceError::NoShipmentsInPeriod { .. }));
}

#[tokio::test]
async fn duplicate_period_is_a_conflict() {
    let fx = fixture().await;
    fx.seed_shipment(10).await;

    fx.app
        .state
        .services
        .billing
        .generate_bill(fx.march_request())
        .await
        .expect("first bill");

    let err = fx
        .app
        .state
        .services
        .billing
        .generate_bill(fx.march_request())
        .await
        .expect_err("second bill for same period");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn unresolvable_zone_rate_fails_the_whole_bill() {
    let fx = fixture().await;
    fx.seed_shipment(10).await;

    // A shipment routed through a zone the rate master does not cover
    // poisons the entire run.
    let uncovered_zone = fx.app.seed_zone("North East").await;
    let input = ShipmentInput {
        client_id: fx.client_id,
        vendor_id: fx.vendor_id,
        zone_id: Some(uncovered_zone.id),
        wfl_number: "WFL-UNCOVERED".to_string(),
        vendor_awb_number: None,
        mode: TransportMode::Surface,
        invoice_number: None,
        invoice_value: dec!(500),
        consignor_from_location: None,
        consignee: None,
        destination: None,
        pin_code: "400001".to_string(),
        actual_weight: 30.0,
        actual_volumetric_weight: 0.0,
        shipment_date: NaiveDate::from_ymd_opt(2026, 3, 18).unwrap(),
        created_by: None,
        boxes: vec![BoxInput {
            number_of_pieces: 1,
            length_cm: 10.0,
            breadth_cm: 10.0,
            height_cm: 10.0,
            actual_weight_per_piece: 30.0,
        }],
    };
    fx.app
        .state
        .services
        .shipments
        .create_shipment(input)
        .await
        .expect("seed shipment");

    let err = fx
        .app
        .state
        .services
        .billing
        .generate_bill(fx.march_request())
        .await
        .expect_err("uncovered zone must fail the bill");
    assert!(matches!(err, ServiceError::NoZoneRate { .. }));

    // Nothing was written.
    let (bills, total) = fx
        .app
        .state
        .services
        .billing
        .list_bills(Some(fx.client_id), 1, 20)
        .await
        .expect("list bills");
    assert_eq!(total, 0);
    assert!(bills.is_empty());
}

#[tokio::test]
async fn inverted_period_is_rejected() {
    let fx = fixture().await;

    let err = fx
        .app
        .state
        .services
        .billing
        .generate_bill(GenerateBillRequest {
            client_id: fx.client_id,
            period_start: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        })
        .await
        .expect_err("start after end");
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
