// src/data_analysis/mod.rs

pub mod derived_channels;
pub mod math_channels;
pub mod rolling_filter;
pub mod x_range;

// src/data_analysis/mod.rs
