use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rating::TransportMode;

/// Fixed charges for one (client, mode) pair. Per-zone per-kg rates hang
/// off this row in `client_zone_rates`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub mode: TransportMode,
    /// CFT factor applied in the volumetric formula for this client/mode.
    pub cft: f64,
    pub minimum_weight: f64,
    pub minimum_freight: Decimal,
    pub docket_charges: Decimal,
    pub fuel_pct: Decimal,
    pub fov_pct: Decimal,
    pub oda_charge: Decimal,
    pub other_charges: Decimal,
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
    #[sea_orm(has_many = "super::client_zone_rate::Entity")]
    ZoneRates,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::client_zone_rate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ZoneRates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
