// src/plot_functions/plot_channels.rs

use std::path::{Path, PathBuf};

use crate::constants::LINE_WIDTH_PLOT;
use crate::data_input::log_data::TelemetryLog;
use crate::error::TelemetryError;
use crate::plot_framework::{
    calculate_range, draw_time_series_plot, palette_color, PlotConfig, PlotSeries,
};

/// Columns among `x_variable` and `y_variables` that the log lacks.
pub fn missing_columns(
    log: &TelemetryLog,
    x_variable: &str,
    y_variables: &[String],
) -> Vec<String> {
    std::iter::once(x_variable)
        .chain(y_variables.iter().map(String::as_str))
        .filter(|name| !log.has_channel(name))
        .map(str::to_string)
        .collect()
}

/// Fails with `MissingColumns` when any requested column is absent.
pub fn check_columns(
    log: &TelemetryLog,
    x_variable: &str,
    y_variables: &[String],
) -> Result<(), TelemetryError> {
    let missing = missing_columns(log, x_variable, y_variables);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TelemetryError::MissingColumns {
            missing,
            available: log.channel_names(),
        })
    }
}

/// Chart title: the y channels joined by ", " followed by "vs. <x>".
pub fn chart_title(x_variable: &str, y_variables: &[String]) -> String {
    format!("{} vs. {}", y_variables.join(", "), x_variable)
}

/// Builds the chart description, or `None` when no sample is finite.
pub fn build_plot_config(
    log: &TelemetryLog,
    x_variable: &str,
    y_variables: &[String],
) -> Result<Option<PlotConfig>, TelemetryError> {
    check_columns(log, x_variable, y_variables)?;
    let x = log.channel(x_variable).ok_or_else(|| TelemetryError::MissingColumns {
        missing: vec![x_variable.to_string()],
        available: log.channel_names(),
    })?;

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    let mut series = Vec::with_capacity(y_variables.len());

    for (index, name) in y_variables.iter().enumerate() {
        let Some(y) = log.channel(name) else {
            continue;
        };
        let data: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        for &(xv, yv) in &data {
            if xv.is_finite() && yv.is_finite() {
                x_min = x_min.min(xv);
                x_max = x_max.max(xv);
                y_min = y_min.min(yv);
                y_max = y_max.max(yv);
            }
        }
        series.push(PlotSeries {
            data,
            label: name.clone(),
            color: palette_color(index),
            stroke_width: LINE_WIDTH_PLOT,
        });
    }

    if !x_min.is_finite() || !y_min.is_finite() {
        return Ok(None);
    }

    let x_range = if x_max > x_min {
        x_min..x_max
    } else {
        let (lo, hi) = calculate_range(x_min, x_max);
        lo..hi
    };
    let (y_lo, y_hi) = calculate_range(y_min, y_max);

    Ok(Some(PlotConfig {
        title: chart_title(x_variable, y_variables),
        x_range,
        y_range: y_lo..y_hi,
        series,
        x_label: x_variable.to_string(),
        y_label: y_variables.join(", "),
    }))
}

/// Plots the chosen channels against `x_variable` into
/// `<output_dir>/<root_name>_Channels.png` and returns the file path.
pub fn plot_channels(
    log: &TelemetryLog,
    x_variable: &str,
    y_variables: &[String],
    root_name: &str,
    output_dir: &Path,
) -> Result<PathBuf, TelemetryError> {
    let output_file = output_dir.join(format!("{root_name}_Channels.png"));
    let plot_config = build_plot_config(log, x_variable, y_variables)?;
    draw_time_series_plot(&output_file, root_name, "Channels", plot_config)?;
    Ok(output_file)
}


// src/plot_functions/plot_channels.rs
