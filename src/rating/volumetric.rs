use super::TransportMode;

/// Divisor for surface shipments: cm^3 -> kg.
pub const SURFACE_DIVISOR: f64 = 27_000.0;
/// Divisor for air shipments: cm^3 -> kg.
pub const AIR_DIVISOR: f64 = 5_000.0;
/// CFT factor applied when the client has no rate master for the mode.
pub const DEFAULT_CFT_FACTOR: f64 = 1.0;

/// Dimensional (volumetric) weight of a single piece, in kg.
///
/// Surface and air use their industry divisors; any other mode yields
/// zero so the actual weight alone drives the chargeable weight.
pub fn volumetric_weight_per_piece(
    length_cm: f64,
    breadth_cm: f64,
    height_cm: f64,
    mode: TransportMode,
    cft_factor: f64,
) -> f64 {
    let scaled_volume = length_cm * breadth_cm * height_cm * cft_factor;
    match mode {
        TransportMode::Surface => scaled_volume / SURFACE_DIVISOR,
        TransportMode::Air => scaled_volume / AIR_DIVISOR,
        TransportMode::Express => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::surface(TransportMode::Surface, 200_000.0 / 27_000.0)]
    #[case::air(TransportMode::Air, 40.0)]
    #[case::express(TransportMode::Express, 0.0)]
    fn mode_selects_the_divisor(#[case] mode: TransportMode, #[case] expected: f64) {
        let w = volumetric_weight_per_piece(100.0, 50.0, 40.0, mode, 1.0);
        assert!((w - expected).abs() < 1e-9);
    }

    #[test]
    fn cft_factor_scales_linearly() {
        let base = volumetric_weight_per_piece(30.0, 30.0, 30.0, TransportMode::Air, 1.0);
        let scaled = volumetric_weight_per_piece(30.0, 30.0, 30.0, TransportMode::Air, 1.5);
        assert!((scaled - base * 1.5).abs() < 1e-9);
    }

    #[test]
    fn zero_dimension_yields_zero() {
        let w = volumetric_weight_per_piece(0.0, 50.0, 40.0, TransportMode::Surface, 1.0);
        assert_eq!(w, 0.0);
    }
}
