// src/efficiency/table.rs

use ndarray::{Array1, Array2, ArrayView1, Zip};

use crate::efficiency::map_data::{
    EFFICIENCY_PERCENT, SPEED_POINTS_RPM, SPEED_POINT_COUNT, TORQUE_POINTS_NM, TORQUE_POINT_COUNT,
};
use crate::error::{EfficiencyError, GridAxis};

/// Value returned for any query outside the characterized envelope.
pub const FILL_VALUE: f64 = 0.0;

/// Efficiency map over a (torque, speed) grid with bilinear lookups.
///
/// The table is immutable once built, so a single instance can be shared by
/// any number of threads.
///
/// Out-of-envelope queries return [`FILL_VALUE`], which is indistinguishable
/// from a stored zero (the whole 0 Nm row is zero, for instance). Callers that
/// need to tell the two apart should check [`EfficiencyTable::contains`] first.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyTable {
    torque_points: Vec<f64>,
    speed_points: Vec<f64>,
    efficiency: Array2<f64>,
}

/// Lower grid index of the interval holding a coordinate, plus the fractional
/// position inside it.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lower: usize,
    frac: f64,
}

impl EfficiencyTable {
    /// Builds a table from its axes and an efficiency matrix shaped
    /// `(torque_points.len(), speed_points.len())`. Every cell must be finite
    /// and non-negative.
    pub fn new(
        torque_points: Vec<f64>,
        speed_points: Vec<f64>,
        efficiency: Array2<f64>,
    ) -> Result<Self, EfficiencyError> {
        let expected = (torque_points.len(), speed_points.len());
        let found = efficiency.dim();
        if found != expected {
            return Err(EfficiencyError::ShapeMismatch { expected, found });
        }

        validate_axis(GridAxis::Torque, &torque_points)?;
        validate_axis(GridAxis::Speed, &speed_points)?;

        if let Some(((row, column), _)) = efficiency
            .indexed_iter()
            .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            return Err(EfficiencyError::InvalidValue { row, column });
        }

        Ok(Self {
            torque_points,
            speed_points,
            efficiency,
        })
    }

    /// The compiled-in motor map.
    pub fn shipped() -> Self {
        let efficiency = Array2::from_shape_fn((TORQUE_POINT_COUNT, SPEED_POINT_COUNT), |(t, s)| {
            EFFICIENCY_PERCENT[t][s]
        });
        Self {
            torque_points: TORQUE_POINTS_NM.to_vec(),
            speed_points: SPEED_POINTS_RPM.to_vec(),
            efficiency,
        }
    }

    pub fn torque_points(&self) -> &[f64] {
        &self.torque_points
    }

    pub fn speed_points(&self) -> &[f64] {
        &self.speed_points
    }

    pub fn efficiency(&self) -> &Array2<f64> {
        &self.efficiency
    }

    /// True when both coordinates lie inside the grid envelope (bounds inclusive).
    pub fn contains(&self, speed: f64, torque: f64) -> bool {
        within(&self.speed_points, speed) && within(&self.torque_points, torque)
    }

    /// Bilinearly interpolated efficiency at one operating point.
    ///
    /// Returns exactly [`FILL_VALUE`] when either coordinate lies outside its
    /// axis range; grid nodes return the stored value unchanged. A NaN
    /// coordinate yields NaN.
    pub fn efficiency_at(&self, speed: f64, torque: f64) -> f64 {
        let (Some(t), Some(s)) = (
            bracket(&self.torque_points, torque),
            bracket(&self.speed_points, speed),
        ) else {
            return FILL_VALUE;
        };

        let v00 = self.efficiency[[t.lower, s.lower]];
        let v01 = self.efficiency[[t.lower, s.lower + 1]];
        let v10 = self.efficiency[[t.lower + 1, s.lower]];
        let v11 = self.efficiency[[t.lower + 1, s.lower + 1]];

        let near = lerp(v00, v01, s.frac);
        let far = lerp(v10, v11, s.frac);
        lerp(near, far, t.frac)
    }

    /// Element-wise [`efficiency_at`](Self::efficiency_at) over paired series.
    pub fn efficiency_vector(
        &self,
        speeds: ArrayView1<f64>,
        torques: ArrayView1<f64>,
    ) -> Result<Array1<f64>, EfficiencyError> {
        if speeds.len() != torques.len() {
            return Err(EfficiencyError::LengthMismatch {
                speeds: speeds.len(),
                torques: torques.len(),
            });
        }

        Ok(Zip::from(&speeds)
            .and(&torques)
            .map_collect(|&speed, &torque| self.efficiency_at(speed, torque)))
    }
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn validate_axis(axis: GridAxis, points: &[f64]) -> Result<(), EfficiencyError> {
    if points.len() < 2 {
        return Err(EfficiencyError::AxisTooShort {
            axis,
            len: points.len(),
        });
    }
    // Written as a negated `>` so NaN also fails.
    if let Some(pos) = points.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(EfficiencyError::NonMonotonicAxis {
            axis,
            index: pos + 1,
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(EfficiencyError::NonMonotonicAxis { axis, index });
    }
    Ok(())
}

fn within(axis: &[f64], x: f64) -> bool {
    match (axis.first(), axis.last()) {
        (Some(&first), Some(&last)) => x >= first && x <= last,
        _ => false,
    }
}

fn bracket(axis: &[f64], x: f64) -> Option<Bracket> {
    let (&first, &last) = (axis.first()?, axis.last()?);
    if x < first || x > last {
        return None;
    }

    let upper = axis.partition_point(|&a| a < x);
    let lower = upper.saturating_sub(1).min(axis.len() - 2);
    let frac = (x - axis[lower]) / (axis[lower + 1] - axis[lower]);
    Some(Bracket { lower, frac })
}

// Weighted form keeps node values exact at frac 0 and 1.
#[inline]
fn lerp(a: f64, b: f64, frac: f64) -> f64 {
    a * (1.0 - frac) + b * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn small_table() -> EfficiencyTable {
        EfficiencyTable::new(
            vec![0.0, 10.0, 20.0],
            vec![0.0, 100.0],
            array![[0.0, 10.0], [20.0, 30.0], [40.0, 80.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_shipped_data_passes_validation() {
        let shipped = EfficiencyTable::shipped();
        let rebuilt = EfficiencyTable::new(
            shipped.torque_points().to_vec(),
            shipped.speed_points().to_vec(),
            shipped.efficiency().clone(),
        )
        .unwrap();
        assert_eq!(rebuilt, shipped);
        assert_eq!(shipped.efficiency().dim(), (26, 21));
    }

    #[test]
    fn test_known_operating_points() {
        let table = EfficiencyTable::shipped();
        assert_eq!(table.efficiency_at(2500.0, 100.0), 96.0);
        assert_eq!(table.efficiency_at(2500.0, 0.0), 0.0);
        assert_eq!(table.efficiency_at(6000.0, 100.0), 0.0);
        assert_eq!(table.efficiency_at(2625.0, 100.0), 96.0);
    }

    #[test]
    fn test_every_node_is_exact() {
        let table = EfficiencyTable::shipped();
        for (t, &torque) in table.torque_points().iter().enumerate() {
            for (s, &speed) in table.speed_points().iter().enumerate() {
                assert_eq!(
                    table.efficiency_at(speed, torque),
                    table.efficiency()[[t, s]],
                    "node ({torque} Nm, {speed} rpm)"
                );
            }
        }
    }

    #[test]
    fn test_interpolates_between_nodes() {
        let table = EfficiencyTable::shipped();
        // 30 Nm row is 86 and 40 Nm row is 90 around 1000-1250 rpm.
        assert_eq!(table.efficiency_at(1125.0, 35.0), 88.0);
        // 60 Nm: 90/90, 70 Nm: 94/95 between 1250 and 1500 rpm.
        assert_eq!(table.efficiency_at(1375.0, 65.0), 92.25);
        assert_abs_diff_eq!(table.efficiency_at(500.0, 15.0), 43.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_operating_points() {
        let table = EfficiencyTable::shipped();
        assert_abs_diff_eq!(table.efficiency_at(1600.0, 105.0), 96.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.efficiency_at(2600.0, 145.0), 95.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.efficiency_at(4100.0, 82.0), 95.2, epsilon = 1e-9);
        assert_abs_diff_eq!(table.efficiency_at(3000.0, 185.0), 94.5, epsilon = 1e-9);
        assert_abs_diff_eq!(table.efficiency_at(900.0, 245.0), 54.0, epsilon = 1e-9);
    }

    #[test]
    fn test_upper_bounds_are_inside() {
        let table = EfficiencyTable::shipped();
        assert_eq!(table.efficiency_at(5000.0, 40.0), 86.0);
        assert_eq!(table.efficiency_at(4000.0, 250.0), 90.0);
        assert!(table.contains(5000.0, 250.0));
        assert!(table.contains(0.0, 0.0));
    }

    #[test]
    fn test_out_of_envelope_fills_zero() {
        let table = EfficiencyTable::shipped();
        assert_eq!(table.efficiency_at(2500.0, -1.0), 0.0);
        assert_eq!(table.efficiency_at(2500.0, 250.0001), 0.0);
        assert_eq!(table.efficiency_at(-0.5, 100.0), 0.0);
        assert_eq!(table.efficiency_at(f64::INFINITY, 100.0), 0.0);
        assert_eq!(table.efficiency_at(2500.0, f64::NEG_INFINITY), 0.0);
        assert!(!table.contains(2500.0, -1.0));
    }

    #[test]
    fn test_nan_propagates() {
        let table = EfficiencyTable::shipped();
        assert!(table.efficiency_at(f64::NAN, 100.0).is_nan());
        assert!(!table.contains(f64::NAN, 100.0));
    }

    #[test]
    fn test_vector_matches_scalar() {
        let table = small_table();
        let speeds = array![0.0, 50.0, 100.0, 25.0, 150.0];
        let torques = array![0.0, 5.0, 20.0, 15.0, 10.0];
        let out = table.efficiency_vector(speeds.view(), torques.view()).unwrap();
        assert_eq!(out.len(), 5);
        for i in 0..speeds.len() {
            assert_eq!(out[i], table.efficiency_at(speeds[i], torques[i]));
        }
        assert_eq!(out[1], 15.0);
        assert_eq!(out[4], 0.0);
    }

    #[test]
    fn test_vector_empty_input() {
        let table = EfficiencyTable::shipped();
        let empty: Array1<f64> = Array1::zeros(0);
        let out = table.efficiency_vector(empty.view(), empty.view()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_vector_length_mismatch() {
        let table = EfficiencyTable::shipped();
        let speeds = array![1000.0, 2000.0, 3000.0];
        let torques = array![50.0, 60.0];
        let err = table
            .efficiency_vector(speeds.view(), torques.view())
            .unwrap_err();
        assert_eq!(
            err,
            EfficiencyError::LengthMismatch {
                speeds: 3,
                torques: 2
            }
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let err = EfficiencyTable::new(
            TORQUE_POINTS_NM.to_vec(),
            SPEED_POINTS_RPM.to_vec(),
            Array2::zeros((25, 21)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EfficiencyError::ShapeMismatch {
                expected: (26, 21),
                found: (25, 21)
            }
        );
    }

    #[test]
    fn test_non_monotonic_axis() {
        let err = EfficiencyTable::new(
            vec![0.0, 10.0, 5.0, 20.0],
            vec![0.0, 1.0],
            Array2::zeros((4, 2)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EfficiencyError::NonMonotonicAxis {
                axis: GridAxis::Torque,
                index: 2
            }
        );

        let err = EfficiencyTable::new(
            vec![0.0, 1.0],
            vec![0.0, 0.0, 1.0],
            Array2::zeros((2, 3)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EfficiencyError::NonMonotonicAxis {
                axis: GridAxis::Speed,
                index: 1
            }
        ));
    }

    #[test]
    fn test_non_finite_axis_rejected() {
        let err = EfficiencyTable::new(
            vec![0.0, f64::NAN],
            vec![0.0, 1.0],
            Array2::zeros((2, 2)),
        )
        .unwrap_err();
        assert!(matches!(err, EfficiencyError::NonMonotonicAxis { .. }));

        let err = EfficiencyTable::new(
            vec![0.0, f64::INFINITY],
            vec![0.0, 1.0],
            Array2::zeros((2, 2)),
        )
        .unwrap_err();
        assert!(matches!(err, EfficiencyError::NonMonotonicAxis { index: 1, .. }));
    }

    #[test]
    fn test_invalid_cells_rejected() {
        let err = EfficiencyTable::new(
            vec![0.0, 10.0],
            vec![0.0, 100.0],
            array![[f64::NAN, 10.0], [-5.0, 30.0]],
        )
        .unwrap_err();
        assert_eq!(err, EfficiencyError::InvalidValue { row: 0, column: 0 });

        let err = EfficiencyTable::new(
            vec![0.0, 10.0],
            vec![0.0, 100.0],
            array![[0.0, 10.0], [-5.0, 30.0]],
        )
        .unwrap_err();
        assert_eq!(err, EfficiencyError::InvalidValue { row: 1, column: 0 });

        let err = EfficiencyTable::new(
            vec![0.0, 10.0],
            vec![0.0, 100.0],
            array![[0.0, f64::INFINITY], [5.0, 30.0]],
        )
        .unwrap_err();
        assert_eq!(err, EfficiencyError::InvalidValue { row: 0, column: 1 });
    }

    #[test]
    fn test_table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EfficiencyTable>();

        let table = std::sync::Arc::new(EfficiencyTable::shipped());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let table = std::sync::Arc::clone(&table);
                std::thread::spawn(move || table.efficiency_at(2500.0, 100.0))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 96.0);
        }
    }

    #[test]
    fn test_axis_too_short() {
        let err = EfficiencyTable::new(vec![0.0], vec![0.0, 1.0], Array2::zeros((1, 2))).unwrap_err();
        assert_eq!(
            err,
            EfficiencyError::AxisTooShort {
                axis: GridAxis::Torque,
                len: 1
            }
        );
    }
}

// src/efficiency/table.rs
