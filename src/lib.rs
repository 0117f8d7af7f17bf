// src/lib.rs - Library interface for internal module access

pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod efficiency;
pub mod error;
pub mod pipeline;
pub mod plot_framework;
pub mod plot_functions;

pub use efficiency::{efficiency_at, efficiency_vector, shipped_table, EfficiencyTable};
pub use error::{EfficiencyError, TelemetryError};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
