// src/data_input/log_data.rs

use std::collections::HashMap;

use ndarray::{Array1, ArrayView1};

use crate::error::TelemetryError;

/// Column-oriented telemetry log.
///
/// Every channel holds exactly `row_count` samples. Channel order is the CSV
/// column order followed by derived channels in creation order.
#[derive(Debug, Clone, Default)]
pub struct TelemetryLog {
    channels: Vec<(String, Array1<f64>)>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl TelemetryLog {
    /// An empty log whose channels will hold `row_count` samples.
    pub fn new(row_count: usize) -> Self {
        Self {
            channels: Vec::new(),
            index: HashMap::new(),
            row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, name: &str) -> Option<&Array1<f64>> {
        self.index.get(name).map(|&i| &self.channels[i].1)
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Adds a channel, or replaces the samples of an existing one in place.
    pub fn insert_channel(
        &mut self,
        name: impl Into<String>,
        values: Array1<f64>,
    ) -> Result<(), TelemetryError> {
        let name = name.into();
        if values.len() != self.row_count {
            return Err(TelemetryError::ChannelLength {
                name,
                expected: self.row_count,
                found: values.len(),
            });
        }

        match self.index.get(&name) {
            Some(&i) => self.channels[i].1 = values,
            None => {
                self.index.insert(name.clone(), self.channels.len());
                self.channels.push((name, values));
            }
        }
        Ok(())
    }

    /// Keeps only the rows whose mask entry is `true`. Missing mask entries drop the row.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let kept = (0..self.row_count)
            .filter(|&i| keep.get(i).copied().unwrap_or(false))
            .count();

        for (_, values) in &mut self.channels {
            *values = values
                .iter()
                .zip(keep)
                .filter(|(_, &k)| k)
                .map(|(&v, _)| v)
                .collect();
        }
        self.row_count = kept;
    }

    /// Average sample rate (Hz) of a time channel, using only positive deltas
    /// between consecutive finite timestamps.
    pub fn estimate_sample_rate(&self, time_channel: &str) -> Option<f64> {
        self.channel(time_channel)
            .and_then(|time| estimate_sample_rate(time.view()))
    }
}

/// Average sample rate (Hz) over positive steps of a timestamp series.
pub fn estimate_sample_rate(time_sec: ArrayView1<f64>) -> Option<f64> {
    let mut total_delta = 0.0;
    let mut count = 0usize;
    let mut prev_time: Option<f64> = None;

    for &current_time in time_sec.iter().filter(|t| t.is_finite()) {
        if let Some(pt) = prev_time {
            let delta = current_time - pt;
            if delta > 1e-9 {
                total_delta += delta;
                count += 1;
            }
        }
        prev_time = Some(current_time);
    }

    if count > 0 {
        Some(1.0 / (total_delta / count as f64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample_log() -> TelemetryLog {
        let mut log = TelemetryLog::new(4);
        log.insert_channel("Time", array![0.0, 0.1, 0.2, 0.3]).unwrap();
        log.insert_channel("RPM", array![0.0, 1000.0, 2000.0, 3000.0])
            .unwrap();
        log
    }

    #[test]
    fn test_insert_and_lookup() {
        let log = sample_log();
        assert_eq!(log.row_count(), 4);
        assert_eq!(log.channel_names(), vec!["Time", "RPM"]);
        assert!(log.has_channel("RPM"));
        assert!(!log.has_channel("rpm"));
        assert_eq!(log.channel("RPM").unwrap()[2], 2000.0);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut log = sample_log();
        log.insert_channel("Time", array![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(log.channel_count(), 2);
        assert_eq!(log.channel_names()[0], "Time");
        assert_eq!(log.channel("Time").unwrap()[0], 1.0);
    }

    #[test]
    fn test_insert_wrong_length() {
        let mut log = sample_log();
        let err = log.insert_channel("Bad", array![1.0]).unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::ChannelLength {
                expected: 4,
                found: 1,
                ..
            }
        ));
        assert!(!log.has_channel("Bad"));
    }

    #[test]
    fn test_retain_rows() {
        let mut log = sample_log();
        log.retain_rows(&[false, true, true, false]);
        assert_eq!(log.row_count(), 2);
        assert_eq!(log.channel("RPM").unwrap(), &array![1000.0, 2000.0]);
        assert_eq!(log.channel("Time").unwrap(), &array![0.1, 0.2]);
    }

    #[test]
    fn test_sample_rate() {
        let log = sample_log();
        assert_relative_eq!(log.estimate_sample_rate("Time").unwrap(), 10.0, epsilon = 1e-9);
        assert!(log.estimate_sample_rate("Missing").is_none());
        assert!(estimate_sample_rate(array![1.0, 1.0, f64::NAN].view()).is_none());
    }
}

// src/data_input/log_data.rs
