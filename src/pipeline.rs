// src/pipeline.rs

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::data_analysis::derived_channels::apply_derived_channels;
use crate::data_analysis::math_channels::apply_math_channels;
use crate::data_analysis::rolling_filter::apply_filter_channels;
use crate::data_analysis::x_range::filter_x_range;
use crate::data_input::log_data::TelemetryLog;
use crate::data_input::log_parser::parse_log_file;
use crate::efficiency::EfficiencyTable;
use crate::error::TelemetryError;
use crate::plot_functions::plot_channels::{check_columns, plot_channels};

/// What a run did to the log, and where the chart went.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub original_rows: usize,
    pub plotted_rows: usize,
    pub created_channels: Vec<String>,
    pub y_variables: Vec<String>,
    pub sample_rate_hz: Option<f64>,
    pub output_path: PathBuf,
}

/// Log after channel creation and x-range filtering, ready to plot.
#[derive(Debug, Clone)]
pub struct PreparedLog {
    pub log: TelemetryLog,
    pub original_rows: usize,
    pub created_channels: Vec<String>,
    pub y_variables: Vec<String>,
}

/// Adds math, filtered and derived channels, checks the requested columns
/// and applies the x-axis window.
pub fn prepare_log(
    mut log: TelemetryLog,
    config: &AnalysisConfig,
    table: &EfficiencyTable,
) -> Result<PreparedLog, TelemetryError> {
    let mut created_channels = apply_math_channels(&mut log, &config.math_channels);
    created_channels.extend(apply_filter_channels(&mut log, &config.filter_channels));
    created_channels.extend(apply_derived_channels(&mut log, table, &config.derived)?);

    let y_variables = config.resolved_y_variables();
    check_columns(&log, &config.x_variable, &y_variables)?;

    let report = filter_x_range(&mut log, &config.x_variable, config.x_start, config.x_end);

    Ok(PreparedLog {
        log,
        original_rows: report.original_rows,
        created_channels,
        y_variables,
    })
}

/// Root name for output files: the input file stem.
pub fn root_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "telemetry".to_string())
}

/// Loads `input`, prepares it with `config` and the shipped efficiency map,
/// and writes the channel chart into `output_dir`.
pub fn run_analysis(
    config: &AnalysisConfig,
    input: &Path,
    output_dir: &Path,
) -> Result<AnalysisSummary, TelemetryError> {
    info!("Reading {}", input.display());
    let log = parse_log_file(input)?;
    info!(
        "Loaded {} rows, {} columns",
        log.row_count(),
        log.channel_count()
    );

    let sample_rate_hz = log.estimate_sample_rate(&config.x_variable);
    match sample_rate_hz {
        Some(rate) => info!("Estimated sample rate: {rate:.2} Hz"),
        None => warn!(
            "Could not determine sample rate from '{}' (need two distinct values)",
            config.x_variable
        ),
    }

    let prepared = prepare_log(log, config, crate::efficiency::shipped_table())?;

    std::fs::create_dir_all(output_dir).map_err(|source| TelemetryError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let root = root_name(input);
    let output_path = plot_channels(
        &prepared.log,
        &config.x_variable,
        &prepared.y_variables,
        &root,
        output_dir,
    )?;

    Ok(AnalysisSummary {
        original_rows: prepared.original_rows,
        plotted_rows: prepared.log.row_count(),
        created_channels: prepared.created_channels,
        y_variables: prepared.y_variables,
        sample_rate_hz,
        output_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_name_uses_file_stem() {
        assert_eq!(root_name(Path::new("/logs/endurance_run.csv")), "endurance_run");
        assert_eq!(root_name(Path::new("/")), "telemetry");
    }
}

// src/pipeline.rs
