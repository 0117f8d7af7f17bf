// src/data_input/log_parser.rs

use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndarray::Array1;
use tracing::{debug, info, warn};

use crate::data_input::log_data::TelemetryLog;
use crate::error::TelemetryError;

/// Parses a CSV telemetry log with a header row into a [`TelemetryLog`].
///
/// Every column becomes a channel. Cells that are empty or not numeric are
/// stored as NaN; short rows are padded with NaN and unreadable records are
/// skipped.
pub fn parse_log_file(input_file_path: &Path) -> Result<TelemetryLog, TelemetryError> {
    let file = File::open(input_file_path).map_err(|source| TelemetryError::Io {
        path: input_file_path.to_path_buf(),
        source,
    })?;

    info!("Reading '{}'", input_file_path.display());
    let log = parse_log_reader(BufReader::new(file))?;
    if log.channel_count() == 0 {
        return Err(TelemetryError::EmptyLog(input_file_path.to_path_buf()));
    }
    Ok(log)
}

/// Same as [`parse_log_file`], from any reader. Returns an empty log when the
/// input has no header row.
pub fn parse_log_reader<R: Read>(reader: R) -> Result<TelemetryLog, TelemetryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_record = reader.headers()?.clone();

    // Column index in the CSV for each channel, first occurrence wins.
    let mut channel_names: Vec<String> = Vec::new();
    let mut csv_indices: Vec<usize> = Vec::new();
    for (csv_idx, header) in header_record.iter().enumerate() {
        if header.is_empty() && header_record.len() == 1 {
            continue;
        }
        if channel_names.iter().any(|name| name == header) {
            warn!("Duplicate column '{header}' at position {csv_idx}, keeping the first one");
            continue;
        }
        channel_names.push(header.to_string());
        csv_indices.push(csv_idx);
    }
    debug!("Headers found in CSV: {:?}", channel_names);

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); channel_names.len()];
    let mut unparsed_counts = vec![0usize; channel_names.len()];

    for (row_index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping row {} due to CSV read error: {}", row_index + 1, e);
                continue;
            }
        };

        for (column, (&csv_idx, unparsed)) in columns
            .iter_mut()
            .zip(csv_indices.iter().zip(unparsed_counts.iter_mut()))
        {
            let value = match record.get(csv_idx) {
                Some("") | None => f64::NAN,
                Some(text) => text.parse::<f64>().unwrap_or_else(|_| {
                    *unparsed += 1;
                    f64::NAN
                }),
            };
            column.push(value);
        }
    }

    for (name, &count) in channel_names.iter().zip(&unparsed_counts) {
        if count > 0 {
            warn!("Column '{name}': {count} non-numeric values stored as NaN");
        }
    }

    let row_count = columns.first().map_or(0, Vec::len);
    let mut log = TelemetryLog::new(row_count);
    for (name, values) in channel_names.into_iter().zip(columns) {
        log.insert_channel(name, Array1::from(values))?;
    }

    info!(
        "Finished reading {} data rows across {} columns.",
        log.row_count(),
        log.channel_count()
    );
    Ok(log)
}


// src/data_input/log_parser.rs
