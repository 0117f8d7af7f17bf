//! Property-based tests for the motor efficiency map lookups.

use approx::assert_relative_eq;
use ev_telemetry_render::efficiency::{efficiency_at, efficiency_vector, shipped_table, FILL_VALUE};
use ndarray::Array1;
use proptest::prelude::*;

const MAX_SPEED_RPM: f64 = 5000.0;
const MAX_TORQUE_NM: f64 = 250.0;

fn same_value(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Inside the envelope an interpolated value never leaves the range of
    /// its four surrounding grid nodes.
    #[test]
    fn prop_inside_envelope_bounded_by_corners(
        speed in 0.0..=MAX_SPEED_RPM,
        torque in 0.0..=MAX_TORQUE_NM,
    ) {
        let table = shipped_table();
        let value = table.efficiency_at(speed, torque);

        let s = ((speed / 250.0).floor() as usize).min(19);
        let t = ((torque / 10.0).floor() as usize).min(24);
        let grid = table.efficiency();
        let corners = [
            grid[[t, s]],
            grid[[t, s + 1]],
            grid[[t + 1, s]],
            grid[[t + 1, s + 1]],
        ];
        let lo = corners.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!(table.contains(speed, torque));
        prop_assert!(value >= lo - 1e-9 && value <= hi + 1e-9,
            "({speed}, {torque}) -> {value} outside [{lo}, {hi}]");
        prop_assert!((0.0..=100.0).contains(&value));
    }

    /// Anything beyond either axis returns exactly the fill value.
    #[test]
    fn prop_outside_envelope_is_fill(
        speed in MAX_SPEED_RPM + 1e-6..1.0e6,
        torque in -1.0e4..-1e-6f64,
        in_range_speed in 0.0..=MAX_SPEED_RPM,
        in_range_torque in 0.0..=MAX_TORQUE_NM,
    ) {
        prop_assert_eq!(efficiency_at(speed, in_range_torque), FILL_VALUE);
        prop_assert_eq!(efficiency_at(in_range_speed, torque), FILL_VALUE);
        prop_assert_eq!(efficiency_at(-speed, in_range_torque), FILL_VALUE);
        prop_assert_eq!(efficiency_at(in_range_speed, MAX_TORQUE_NM - torque), FILL_VALUE);
    }

    /// The vectorised lookup agrees element for element with scalar lookups.
    #[test]
    fn prop_vector_matches_scalar(
        points in prop::collection::vec((-500.0..6000.0f64, -20.0..280.0f64), 0..64),
    ) {
        let speeds: Array1<f64> = points.iter().map(|p| p.0).collect();
        let torques: Array1<f64> = points.iter().map(|p| p.1).collect();
        let values = efficiency_vector(speeds.view(), torques.view())
            .map_err(|e| TestCaseError::fail(format!("lookup failed: {e}")))?;

        prop_assert_eq!(values.len(), points.len());
        for (value, &(speed, torque)) in values.iter().zip(&points) {
            prop_assert!(same_value(*value, efficiency_at(speed, torque)));
        }
    }
}

#[test]
fn test_reference_operating_points() {
    assert_eq!(efficiency_at(2500.0, 100.0), 96.0);
    assert_eq!(efficiency_at(2500.0, 0.0), 0.0);
    assert_eq!(efficiency_at(6000.0, 100.0), 0.0);
    assert_relative_eq!(efficiency_at(2625.0, 100.0), 96.0, epsilon = 1e-9);
}

#[test]
fn test_vector_lookup_of_drive_cycle() {
    let speeds = Array1::from(vec![2500.0, 2500.0, 6000.0, 2625.0]);
    let torques = Array1::from(vec![100.0, 0.0, 100.0, 100.0]);
    let values = efficiency_vector(speeds.view(), torques.view()).unwrap();
    assert_eq!(values.len(), 4);
    assert_eq!(values[0], 96.0);
    assert_eq!(values[1], 0.0);
    assert_eq!(values[2], 0.0);
    assert_relative_eq!(values[3], 96.0, epsilon = 1e-9);
}

#[test]
fn test_vector_lookup_rejects_unpaired_series() {
    let speeds = Array1::from(vec![1000.0, 2000.0, 3000.0]);
    let torques = Array1::from(vec![50.0, 60.0]);
    assert!(efficiency_vector(speeds.view(), torques.view()).is_err());
}
