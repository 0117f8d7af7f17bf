// src/efficiency/mod.rs

pub mod map_data;
pub mod table;

use std::sync::OnceLock;

use ndarray::{Array1, ArrayView1};

use crate::error::EfficiencyError;

pub use table::{EfficiencyTable, FILL_VALUE};

static SHIPPED_TABLE: OnceLock<EfficiencyTable> = OnceLock::new();

/// Process-wide instance of the compiled-in motor map, built on first use.
pub fn shipped_table() -> &'static EfficiencyTable {
    SHIPPED_TABLE.get_or_init(EfficiencyTable::shipped)
}

/// Efficiency (%) of the shipped map at one speed (rpm) / torque (Nm) point.
pub fn efficiency_at(speed_rpm: f64, torque_nm: f64) -> f64 {
    shipped_table().efficiency_at(speed_rpm, torque_nm)
}

/// Efficiency (%) of the shipped map for paired speed/torque series.
pub fn efficiency_vector(
    speeds_rpm: ArrayView1<f64>,
    torques_nm: ArrayView1<f64>,
) -> Result<Array1<f64>, EfficiencyError> {
    shipped_table().efficiency_vector(speeds_rpm, torques_nm)
}

// src/efficiency/mod.rs
