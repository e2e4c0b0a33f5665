use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vendor_pincode::OdaStatus;
use crate::rating::TransportMode;

/// One docket. `wfl_weight` and `wfl_volumetric_weight` are derived from
/// the box set and recomputed server-side on every write; `actual_weight`
/// and `actual_volumetric_weight` are the vendor-declared figures.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub vendor_id: Uuid,
    pub zone_id: Option<Uuid>,
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
    pub shipment_date: Date,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(
        belongs_to = "super::zone::Entity",
        from = "Column::ZoneId",
        to = "super::zone::Column::Id"
    )]
    Zone,
    #[sea_orm(has_many = "super::shipment_box::Entity")]
    Boxes,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::zone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Zone.def()
    }
}

impl Related<super::shipment_box::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
