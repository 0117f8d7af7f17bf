// src/data_analysis/x_range.rs

use tracing::{info, warn};

use crate::data_input::log_data::TelemetryLog;

/// Row counts before and after an x-axis window was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFilterReport {
    pub original_rows: usize,
    pub filtered_rows: usize,
}

/// Keeps rows whose `x_variable` lies in `[x_start, x_end]`; either bound may
/// be open. Rows with a NaN x value are dropped whenever a bound is set.
///
/// A missing x channel leaves the log untouched.
pub fn filter_x_range(
    log: &mut TelemetryLog,
    x_variable: &str,
    x_start: Option<f64>,
    x_end: Option<f64>,
) -> RangeFilterReport {
    let original_rows = log.row_count();
    if x_start.is_none() && x_end.is_none() {
        return RangeFilterReport {
            original_rows,
            filtered_rows: original_rows,
        };
    }

    let Some(x) = log.channel(x_variable) else {
        return RangeFilterReport {
            original_rows,
            filtered_rows: original_rows,
        };
    };

    let keep: Vec<bool> = x
        .iter()
        .map(|&v| x_start.map_or(true, |s| v >= s) && x_end.map_or(true, |e| v <= e))
        .collect();
    log.retain_rows(&keep);

    let filtered_rows = log.row_count();
    if filtered_rows != original_rows {
        info!(
            "Filtered data on '{}' between {:?} and {:?}.",
            x_variable, x_start, x_end
        );
        info!("Original rows: {original_rows}, Filtered rows: {filtered_rows}");
    }
    if log.is_empty() {
        warn!("No data left after filtering. Plot will be empty.");
    }

    RangeFilterReport {
        original_rows,
        filtered_rows,
    }
}


// src/data_analysis/x_range.rs
