// src/data_analysis/rolling_filter.rs

use ndarray::{Array1, ArrayView1};
use tracing::{info, warn};

use crate::config::FilterChannel;
use crate::constants::FILTERED_CHANNEL_SUFFIX;
use crate::data_input::log_data::TelemetryLog;

/// Centered rolling mean that tolerates NaN and short edges.
///
/// For sample `i` the window spans `[i + 1 + offset - window, i + offset]`
/// with `offset = (window - 1) / 2`, clipped to the data, so even windows
/// lean one sample to the left. The mean covers the non-NaN members; a window
/// with none yields NaN. Centering keeps the smoothed trace in phase with the
/// raw one.
pub fn centered_rolling_mean(values: ArrayView1<f64>, window: usize) -> Array1<f64> {
    let n = values.len();
    if window == 0 {
        return Array1::from_elem(n, f64::NAN);
    }
    let offset = (window - 1) / 2;

    Array1::from_shape_fn(n, |i| {
        let end = (i + 1 + offset).min(n);
        let start = (i + 1 + offset).saturating_sub(window);

        let (sum, count) = values
            .slice(ndarray::s![start..end])
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));

        if count > 0 {
            sum / count as f64
        } else {
            f64::NAN
        }
    })
}

/// Name of the smoothed copy of a channel.
pub fn filtered_channel_name(channel: &str) -> String {
    format!("{channel}{FILTERED_CHANNEL_SUFFIX}")
}

/// Adds a `<channel>_filtered` copy for each configured channel that exists.
///
/// Returns the names of the channels that were created.
pub fn apply_filter_channels(log: &mut TelemetryLog, filters: &[FilterChannel]) -> Vec<String> {
    if filters.is_empty() {
        return Vec::new();
    }

    info!("Creating filtered channels...");
    let mut created = Vec::new();
    for filter in filters {
        let Some(source) = log.channel(&filter.channel) else {
            warn!(
                "  Column '{}' not found for filtering. Skipping.",
                filter.channel
            );
            continue;
        };

        let smoothed = centered_rolling_mean(source.view(), filter.window);
        let new_name = filtered_channel_name(&filter.channel);
        match log.insert_channel(new_name.as_str(), smoothed) {
            Ok(()) => {
                info!(
                    "  Successfully created channel: '{}' with window {}",
                    new_name, filter.window
                );
                created.push(new_name);
            }
            Err(e) => warn!("  Could not store channel '{}': {}", new_name, e),
        }
    }
    created
}


// src/data_analysis/rolling_filter.rs
