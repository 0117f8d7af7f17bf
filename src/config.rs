// src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_EFFICIENCY_FLOOR_PERCENT, DEFAULT_POWER_LIMIT_KW, DEFAULT_SAFETY_MARGIN_KW,
    DEFAULT_TORQUE_CAP_NM,
};
use crate::error::TelemetryError;

/// A derived channel defined by an arithmetic expression over other channels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MathChannel {
    pub name: String,
    pub expression: String,
}

/// A channel to smooth with a centered rolling mean. The result is stored as
/// `<channel>_filtered`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterChannel {
    pub channel: String,
    pub window: usize,
}

/// Inputs and constants of the efficiency-based channels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DerivedChannelConfig {
    pub enabled: bool,
    pub speed_channel: String,
    pub torque_channel: String,
    pub mech_power_channel: String,
    pub electrical_power_channel: String,
    pub power_limit_kw: f64,
    pub safety_margin_kw: f64,
    pub efficiency_floor_percent: f64,
    pub torque_cap_nm: f64,
}

impl Default for DerivedChannelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_channel: "RPM".to_string(),
            torque_channel: "Inverter Torque Request".to_string(),
            mech_power_channel: "mech_power_kW".to_string(),
            electrical_power_channel: "electrical_power_kW_filtered".to_string(),
            power_limit_kw: DEFAULT_POWER_LIMIT_KW,
            safety_margin_kw: DEFAULT_SAFETY_MARGIN_KW,
            efficiency_floor_percent: DEFAULT_EFFICIENCY_FLOOR_PERCENT,
            torque_cap_nm: DEFAULT_TORQUE_CAP_NM,
        }
    }
}

/// Ready-made channel selections for common investigations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PlotPreset {
    /// Throttle input against electrical power.
    DriverAnalysis,
    /// Estimated power, torque limit and overshoot against the power limit.
    PowerLimit,
    /// Inverter requests and DC input around an inverter fault.
    BrokenInverter,
    /// DC, phase currents and line voltages.
    CurrentAnalysis,
    /// Motor and resolver angles.
    Resolver,
    /// Inverter temperature against speed and DC current.
    Temperature,
}

impl PlotPreset {
    pub fn y_variables(self) -> Vec<String> {
        let names: &[&str] = match self {
            PlotPreset::DriverAnalysis => &["Throttle Position (%)", "electrical_power_kW"],
            PlotPreset::PowerLimit => &[
                "mech_est_power_kW",
                "electrical_power_kW_filtered",
                "Torque Limit Nm",
                "Power with Limit kW",
                "Torque Command",
                "Actual Torque",
                "kW Overshoot",
                "efficiency",
            ],
            PlotPreset::BrokenInverter => &[
                "electrical_power_kW_filtered",
                "RPM",
                "Torque Command / 1e16",
                "Inverter Torque Request",
                "Throttle Position (%)",
                "Voltage Input into DC",
            ],
            PlotPreset::CurrentAnalysis => &[
                "RPM / 10",
                "Current Input into DC",
                "Torque Command / 1e16",
                "Inverter Torque Request",
                "Phase A Current",
                "Phase B Current",
                "Phase C Current",
                "AB Voltage",
                "BC Voltage",
            ],
            PlotPreset::Resolver => &["RPM / 10", "Motor Angle", "Resolver Angle"],
            PlotPreset::Temperature => &["Inverter Temp", "RPM / 10", "Current Input into DC"],
        };
        names.iter().map(|name| name.to_string()).collect()
    }
}

/// Everything the pipeline needs besides the input file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Channel used as the time axis.
    pub x_variable: String,
    /// Channels to plot; when empty the preset decides.
    pub y_variables: Vec<String>,
    pub preset: Option<PlotPreset>,
    pub x_start: Option<f64>,
    pub x_end: Option<f64>,
    pub math_channels: Vec<MathChannel>,
    pub filter_channels: Vec<FilterChannel>,
    /// Efficiency-based channels.
    pub derived: DerivedChannelConfig,
    pub output_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let math = |name: &str, expression: &str| MathChannel {
            name: name.to_string(),
            expression: expression.to_string(),
        };
        let filter = |channel: &str, window: usize| FilterChannel {
            channel: channel.to_string(),
            window,
        };

        Self {
            x_variable: "Time".to_string(),
            y_variables: Vec::new(),
            preset: None,
            x_start: None,
            x_end: None,
            math_channels: vec![
                math("mech_power_kW", "`Actual Torque` * RPM / 9550"),
                math("Brake Pressure 1", "(`BSE 1 Voltage` - .512) * 3737.5"),
                math("Throttle Position (%)", "(`APPS Telemetry`) * 100"),
                math(
                    "electrical_power_kW",
                    "(`Voltage Input into DC` * `Current Input into DC`) / 1000",
                ),
                math("Torque Command / 1e16", "`Torque Command` / 1e16"),
                math("RPM / 10", "RPM / 100"),
            ],
            filter_channels: vec![filter("Brake Pressure 1", 20), filter("electrical_power_kW", 50)],
            derived: DerivedChannelConfig::default(),
            output_dir: None,
        }
    }
}

impl AnalysisConfig {
    /// Reads a TOML config. Keys that are left out keep their default values.
    pub fn from_file(path: &Path) -> Result<Self, TelemetryError> {
        let text = fs::read_to_string(path).map_err(|source| TelemetryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| TelemetryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.x_variable.trim().is_empty() {
            return Err(TelemetryError::InvalidConfig(
                "x_variable must name a column".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.x_start, self.x_end) {
            if start > end {
                return Err(TelemetryError::InvalidConfig(format!(
                    "x_start ({start}) is greater than x_end ({end})"
                )));
            }
        }
        if let Some(filter) = self.filter_channels.iter().find(|f| f.window == 0) {
            return Err(TelemetryError::InvalidConfig(format!(
                "filter window for '{}' must be at least 1",
                filter.channel
            )));
        }
        if self.derived.enabled {
            let derived = &self.derived;
            let constants = [
                ("power_limit_kw", derived.power_limit_kw),
                ("safety_margin_kw", derived.safety_margin_kw),
                ("efficiency_floor_percent", derived.efficiency_floor_percent),
                ("torque_cap_nm", derived.torque_cap_nm),
            ];
            if let Some((name, value)) = constants.iter().find(|(_, v)| !v.is_finite()) {
                return Err(TelemetryError::InvalidConfig(format!(
                    "derived.{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Channels to plot: explicit `y_variables`, else the preset, else the
    /// temperature preset.
    pub fn resolved_y_variables(&self) -> Vec<String> {
        if !self.y_variables.is_empty() {
            return self.y_variables.clone();
        }
        self.preset.unwrap_or(PlotPreset::Temperature).y_variables()
    }
}


// src/config.rs
