// src/constants.rs

use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 22;
pub const FONT_SIZE_AXIS_LABEL: i32 = 16;
pub const FONT_SIZE_LEGEND: i32 = 16;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

pub const COLOR_GRID_LINE: RGBColor = RGBColor(200, 200, 200);

// kW = Nm * rpm / 9550
pub const POWER_KW_PER_NM_RPM: f64 = 9550.0;

// Efficiency-based derived channels
pub const DEFAULT_POWER_LIMIT_KW: f64 = 50.0;
pub const DEFAULT_SAFETY_MARGIN_KW: f64 = 5.0;
pub const DEFAULT_EFFICIENCY_FLOOR_PERCENT: f64 = 50.0;
pub const DEFAULT_TORQUE_CAP_NM: f64 = 220.0;

// Derived channel names
pub const CHANNEL_EFFICIENCY: &str = "efficiency";
pub const CHANNEL_MECH_EST_POWER: &str = "mech_est_power_kW";
pub const CHANNEL_TORQUE_LIMIT: &str = "Torque Limit Nm";
pub const CHANNEL_POWER_WITH_LIMIT: &str = "Power with Limit kW";
pub const CHANNEL_KW_OVERSHOOT: &str = "kW Overshoot";

pub const FILTERED_CHANNEL_SUFFIX: &str = "_filtered";

// src/constants.rs
