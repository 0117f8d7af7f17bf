// src/data_analysis/derived_channels.rs

//! Channels derived from the motor efficiency map: efficiency along the
//! logged operating points, the mechanical power estimate built on it, and
//! the torque/power limit curves used for power-limit analysis.

use ndarray::{Array1, ArrayView1, Zip};
use tracing::{info, warn};

use crate::config::DerivedChannelConfig;
use crate::constants::{
    CHANNEL_EFFICIENCY, CHANNEL_KW_OVERSHOOT, CHANNEL_MECH_EST_POWER, CHANNEL_POWER_WITH_LIMIT,
    CHANNEL_TORQUE_LIMIT, POWER_KW_PER_NM_RPM,
};
use crate::data_input::log_data::TelemetryLog;
use crate::efficiency::EfficiencyTable;
use crate::error::TelemetryError;

// NaN-propagating max/min, unlike f64::max/min which drop NaN operands.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Map efficiency (%) along the log, raised to at least `floor_percent`.
pub fn floored_efficiency(
    table: &EfficiencyTable,
    speed_rpm: ArrayView1<f64>,
    torque_nm: ArrayView1<f64>,
    floor_percent: f64,
) -> Result<Array1<f64>, TelemetryError> {
    Ok(table
        .efficiency_vector(speed_rpm, torque_nm)?
        .mapv_into(|e| nan_max(e, floor_percent)))
}

/// Electrical power needed for the measured mechanical power, plus a margin.
pub fn estimated_input_power(
    mech_power_kw: ArrayView1<f64>,
    efficiency_percent: ArrayView1<f64>,
    safety_margin_kw: f64,
) -> Array1<f64> {
    Zip::from(&mech_power_kw)
        .and(&efficiency_percent)
        .map_collect(|&power, &eff| 100.0 * power / eff + safety_margin_kw)
}

/// Torque allowed by a power limit at each speed, capped at `torque_cap_nm`.
/// Standstill divides by zero and lands on the cap.
pub fn torque_limit(speed_rpm: ArrayView1<f64>, power_limit_kw: f64, torque_cap_nm: f64) -> Array1<f64> {
    speed_rpm.mapv(|rpm| nan_min(POWER_KW_PER_NM_RPM * power_limit_kw / rpm, torque_cap_nm))
}

pub fn power_at_limit(speed_rpm: ArrayView1<f64>, torque_limit_nm: ArrayView1<f64>) -> Array1<f64> {
    Zip::from(&speed_rpm)
        .and(&torque_limit_nm)
        .map_collect(|&rpm, &torque| rpm * torque / POWER_KW_PER_NM_RPM)
}

/// Negative where measured electrical power exceeds the estimate, zero otherwise.
pub fn power_overshoot(estimated_kw: ArrayView1<f64>, electrical_kw: ArrayView1<f64>) -> Array1<f64> {
    Zip::from(&estimated_kw)
        .and(&electrical_kw)
        .map_collect(|&estimate, &measured| nan_min(estimate - measured, 0.0))
}

fn required<'a>(log: &'a TelemetryLog, name: &str, target: &str) -> Option<&'a Array1<f64>> {
    let channel = log.channel(name);
    if channel.is_none() {
        warn!("  Column '{name}' not found, skipping '{target}'");
    }
    channel
}

/// Adds the efficiency, estimated power, torque limit, power-at-limit and
/// overshoot channels. A channel whose inputs are missing is skipped, as are
/// the channels built on it.
///
/// Returns the names of the channels that were created.
pub fn apply_derived_channels(
    log: &mut TelemetryLog,
    table: &EfficiencyTable,
    config: &DerivedChannelConfig,
) -> Result<Vec<String>, TelemetryError> {
    if !config.enabled {
        return Ok(Vec::new());
    }

    info!("Creating efficiency-based channels...");
    let mut created = Vec::new();

    let efficiency = match (
        required(log, &config.speed_channel, CHANNEL_EFFICIENCY),
        required(log, &config.torque_channel, CHANNEL_EFFICIENCY),
    ) {
        (Some(speed), Some(torque)) => Some(floored_efficiency(
            table,
            speed.view(),
            torque.view(),
            config.efficiency_floor_percent,
        )?),
        _ => None,
    };
    if let Some(efficiency) = efficiency {
        log.insert_channel(CHANNEL_EFFICIENCY, efficiency)?;
        created.push(CHANNEL_EFFICIENCY.to_string());
    }

    let estimate = match (
        required(log, &config.mech_power_channel, CHANNEL_MECH_EST_POWER),
        log.channel(CHANNEL_EFFICIENCY),
    ) {
        (Some(mech), Some(efficiency)) => Some(estimated_input_power(
            mech.view(),
            efficiency.view(),
            config.safety_margin_kw,
        )),
        _ => None,
    };
    if let Some(estimate) = estimate {
        log.insert_channel(CHANNEL_MECH_EST_POWER, estimate)?;
        created.push(CHANNEL_MECH_EST_POWER.to_string());
    }

    let limits = required(log, &config.speed_channel, CHANNEL_TORQUE_LIMIT).map(|speed| {
        let limit = torque_limit(speed.view(), config.power_limit_kw, config.torque_cap_nm);
        let power = power_at_limit(speed.view(), limit.view());
        (limit, power)
    });
    if let Some((limit, power)) = limits {
        log.insert_channel(CHANNEL_TORQUE_LIMIT, limit)?;
        log.insert_channel(CHANNEL_POWER_WITH_LIMIT, power)?;
        created.push(CHANNEL_TORQUE_LIMIT.to_string());
        created.push(CHANNEL_POWER_WITH_LIMIT.to_string());
    }

    let overshoot = match (
        log.channel(CHANNEL_MECH_EST_POWER),
        required(log, &config.electrical_power_channel, CHANNEL_KW_OVERSHOOT),
    ) {
        (Some(estimate), Some(electrical)) => {
            Some(power_overshoot(estimate.view(), electrical.view()))
        }
        _ => None,
    };
    if let Some(overshoot) = overshoot {
        log.insert_channel(CHANNEL_KW_OVERSHOOT, overshoot)?;
        created.push(CHANNEL_KW_OVERSHOOT.to_string());
    }

    for name in &created {
        info!("  Successfully created channel: '{name}'");
    }
    Ok(created)
}


// src/data_analysis/derived_channels.rs
