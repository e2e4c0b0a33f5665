use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Everything needed to price one shipment: the per-zone rate plus the
/// fixed charges from the (client, mode) rate master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateQuote {
    pub rate_per_kg: Decimal,
    pub cft: f64,
    pub minimum_weight: f64,
    pub minimum_freight: Decimal,
    pub docket_charges: Decimal,
    pub fuel_pct: Decimal,
    pub fov_pct: Decimal,
    pub oda_charge: Decimal,
    pub other_charges: Decimal,
}

/// Weight the shipment is billed on: the greater of actual weight,
/// volumetric weight, and the rate master's minimum weight.
pub fn chargeable_weight(actual_kg: f64, volumetric_kg: f64, minimum_kg: f64) -> f64 {
    actual_kg.max(volumetric_kg).max(minimum_kg)
}

/// Full freight amount for one shipment, rounded to 2 decimal places.
///
/// Base freight is the chargeable weight times the zone rate, floored at
/// the minimum freight. Fuel is a percentage of base freight, FOV a
/// percentage of the declared invoice value. Docket and other charges
/// always apply; the ODA charge only when the destination is ODA.
pub fn shipment_charge(
    quote: &RateQuote,
    actual_kg: f64,
    volumetric_kg: f64,
    invoice_value: Decimal,
    is_oda: bool,
) -> Decimal {
    let weight = chargeable_weight(actual_kg, volumetric_kg, quote.minimum_weight);
    // Weights round to grams before pricing so float noise never reaches money.
    let weight = Decimal::from_f64_retain(weight).unwrap_or_default().round_dp(3);

    let base_freight = (weight * quote.rate_per_kg).max(quote.minimum_freight);
    let fuel = base_freight * quote.fuel_pct / Decimal::ONE_HUNDRED;
    let fov = invoice_value * quote.fov_pct / Decimal::ONE_HUNDRED;
    let oda = if is_oda { quote.oda_charge } else { Decimal::ZERO };

    (base_freight + fuel + fov + quote.docket_charges + quote.other_charges + oda).round_dp(2)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn quote() -> RateQuote {
        RateQuote {
            rate_per_kg: dec!(10),
            cft: 1.0,
            minimum_weight: 20.0,
            minimum_freight: dec!(300),
            docket_charges: dec!(50),
            fuel_pct: dec!(10),
            fov_pct: dec!(2),
            oda_charge: dec!(750),
            other_charges: dec!(25),
        }
    }

    #[test]
    fn volumetric_weight_wins_when_larger() {
        assert_eq!(chargeable_weight(12.0, 40.0, 20.0), 40.0);
    }

    #[test]
    fn minimum_weight_floors_light_shipments() {
        assert_eq!(chargeable_weight(5.0, 8.0, 20.0), 20.0);
    }

    #[test]
    fn charges_full_formula() {
        // weight 40 kg * 10 = 400 base; fuel 40; fov 2% of 10000 = 200.
        let total = shipment_charge(&quote(), 12.0, 40.0, dec!(10000), false);
        assert_eq!(total, dec!(400) + dec!(40) + dec!(200) + dec!(50) + dec!(25));
    }

    #[test]
    fn minimum_freight_floors_base() {
        // weight 20 kg * 10 = 200 < 300 minimum; fuel on the floored base.
        let total = shipment_charge(&quote(), 5.0, 8.0, dec!(0), false);
        assert_eq!(total, dec!(300) + dec!(30) + dec!(50) + dec!(25));
    }

    #[test]
    fn oda_charge_only_for_oda_destinations() {
        let normal = shipment_charge(&quote(), 12.0, 40.0, dec!(0), false);
        let oda = shipment_charge(&quote(), 12.0, 40.0, dec!(0), true);
        assert_eq!(oda - normal, dec!(750));
    }

    #[test]
    fn rounds_to_paise() {
        let q = RateQuote {
            rate_per_kg: dec!(7.77),
            minimum_weight: 0.0,
            minimum_freight: dec!(0),
            fuel_pct: dec!(0),
            fov_pct: dec!(0),
            docket_charges: dec!(0),
            other_charges: dec!(0),
            oda_charge: dec!(0),
            cft: 1.0,
        };
        let total = shipment_charge(&q, 7.407407407407407, 0.0, dec!(0), false);
        // 7.407 kg * 7.77 = 57.552... -> 57.55
        assert_eq!(total, dec!(57.55));
    }
}
