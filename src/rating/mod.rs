pub mod boxes;
pub mod charges;
pub mod volumetric;

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Transport mode of a shipment. Stored as a short string column; the
/// legacy data uses "sfc" for surface, which we accept on input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[sea_orm(string_value = "air")]
    Air,
    #[sea_orm(string_value = "surface")]
    Surface,
    #[sea_orm(string_value = "express")]
    Express,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Air => write!(f, "air"),
            TransportMode::Surface => write!(f, "surface"),
            TransportMode::Express => write!(f, "express"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "air" => Ok(TransportMode::Air),
            "surface" | "sfc" => Ok(TransportMode::Surface),
            "express" => Ok(TransportMode::Express),
            other => Err(format!("unknown transport mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_sfc_alias() {
        assert_eq!("sfc".parse::<TransportMode>(), Ok(TransportMode::Surface));
        assert_eq!("SURFACE".parse::<TransportMode>(), Ok(TransportMode::Surface));
        assert_eq!("air".parse::<TransportMode>(), Ok(TransportMode::Air));
        assert!("truck".parse::<TransportMode>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        for mode in [TransportMode::Air, TransportMode::Surface, TransportMode::Express] {
            assert_eq!(mode.to_string().parse::<TransportMode>(), Ok(mode));
        }
    }
}
