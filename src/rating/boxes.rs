use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::volumetric::volumetric_weight_per_piece;
use super::TransportMode;

/// Operator-entered dimensions and weight for one box line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BoxInput {
    #[validate(range(min = 1))]
    pub number_of_pieces: i32,
    #[validate(range(min = 0.0))]
    pub length_cm: f64,
    #[validate(range(min = 0.0))]
    pub breadth_cm: f64,
    #[validate(range(min = 0.0))]
    pub height_cm: f64,
    #[validate(range(min = 0.0))]
    pub actual_weight_per_piece: f64,
}

/// A box line with its derived volumetric weights filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoxWeights {
    pub number_of_pieces: i32,
    pub length_cm: f64,
    pub breadth_cm: f64,
    pub height_cm: f64,
    pub actual_weight_per_piece: f64,
    pub volumetric_weight_per_piece: f64,
    pub total_volumetric_weight: f64,
}

/// Derived weights for a whole shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentWeights {
    pub boxes: Vec<BoxWeights>,
    pub total_actual_weight: f64,
    pub total_volumetric_weight: f64,
}

/// Computes per-box and shipment-level weights from the raw box lines.
/// Box order is preserved. An empty box list yields zero totals.
pub fn aggregate_boxes(boxes: &[BoxInput], mode: TransportMode, cft_factor: f64) -> ShipmentWeights {
    let mut total_actual_weight = 0.0;
    let mut total_volumetric_weight = 0.0;
    let mut derived = Vec::with_capacity(boxes.len());

    for line in boxes {
        let per_piece = volumetric_weight_per_piece(
            line.length_cm,
            line.breadth_cm,
            line.height_cm,
            mode,
            cft_factor,
        );
        let line_volumetric = per_piece * f64::from(line.number_of_pieces);
        total_actual_weight += line.actual_weight_per_piece * f64::from(line.number_of_pieces);
        total_volumetric_weight += line_volumetric;
        derived.push(BoxWeights {
            number_of_pieces: line.number_of_pieces,
            length_cm: line.length_cm,
            breadth_cm: line.breadth_cm,
            height_cm: line.height_cm,
            actual_weight_per_piece: line.actual_weight_per_piece,
            volumetric_weight_per_piece: per_piece,
            total_volumetric_weight: line_volumetric,
        });
    }

    ShipmentWeights {
        boxes: derived,
        total_actual_weight,
        total_volumetric_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pieces: i32, l: f64, b: f64, h: f64, weight: f64) -> BoxInput {
        BoxInput {
            number_of_pieces: pieces,
            length_cm: l,
            breadth_cm: b,
            height_cm: h,
            actual_weight_per_piece: weight,
        }
    }

    #[test]
    fn sums_actual_weight_across_pieces() {
        let weights = aggregate_boxes(
            &[line(2, 10.0, 10.0, 10.0, 5.0), line(3, 10.0, 10.0, 10.0, 1.0)],
            TransportMode::Surface,
            1.0,
        );
        assert!((weights.total_actual_weight - 13.0).abs() < 1e-9);
    }

    #[test]
    fn sums_volumetric_weight_across_boxes() {
        // One 50x40x20 piece air = 8 kg; two pieces = 16 kg.
        let weights = aggregate_boxes(
            &[line(2, 50.0, 40.0, 20.0, 1.0), line(1, 50.0, 40.0, 20.0, 1.0)],
            TransportMode::Air,
            1.0,
        );
        assert!((weights.total_volumetric_weight - 24.0).abs() < 1e-9);
        assert!((weights.boxes[0].total_volumetric_weight - 16.0).abs() < 1e-9);
        assert!((weights.boxes[1].volumetric_weight_per_piece - 8.0).abs() < 1e-9);
    }

    #[test]
    fn empty_box_list_yields_zero_totals() {
        let weights = aggregate_boxes(&[], TransportMode::Air, 1.0);
        assert_eq!(weights.total_actual_weight, 0.0);
        assert_eq!(weights.total_volumetric_weight, 0.0);
        assert!(weights.boxes.is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let weights = aggregate_boxes(
            &[line(1, 10.0, 1.0, 1.0, 9.0), line(1, 20.0, 1.0, 1.0, 4.0)],
            TransportMode::Surface,
            1.0,
        );
        assert_eq!(weights.boxes[0].length_cm, 10.0);
        assert_eq!(weights.boxes[1].length_cm, 20.0);
    }

    #[test]
    fn rejects_zero_pieces() {
        use validator::Validate;
        assert!(line(0, 10.0, 10.0, 10.0, 1.0).validate().is_err());
        assert!(line(1, 10.0, 10.0, 10.0, 1.0).validate().is_ok());
    }
}
