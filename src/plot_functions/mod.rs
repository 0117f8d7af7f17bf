// src/plot_functions/mod.rs

pub mod plot_channels;

// src/plot_functions/mod.rs
