// src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ev_telemetry_render::config::{AnalysisConfig, PlotPreset};
use ev_telemetry_render::pipeline::run_analysis;
use ev_telemetry_render::{crate_version, shipped_table};

#[derive(Parser)]
#[command(name = "ev_telemetry_render")]
#[command(about = "Plot EV motor/inverter telemetry logs and query the motor efficiency map")]
#[command(version)]
struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot channels of a CSV log against time
    Plot {
        /// Input CSV log
        input: PathBuf,

        /// TOML analysis config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the PNG (defaults to the config value, then the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Named channel selection
        #[arg(short, long, value_enum)]
        preset: Option<PlotPreset>,

        /// Channel to plot; repeat for several
        #[arg(short = 'y', long = "y")]
        y_variables: Vec<String>,

        /// Keep rows with x at or after this value
        #[arg(long, allow_negative_numbers = true)]
        x_start: Option<f64>,

        /// Keep rows with x at or before this value
        #[arg(long, allow_negative_numbers = true)]
        x_end: Option<f64>,
    },

    /// Look up the motor efficiency at one operating point
    Efficiency {
        /// Shaft speed (rpm)
        #[arg(long, allow_negative_numbers = true)]
        speed: f64,

        /// Shaft torque (Nm)
        #[arg(long, allow_negative_numbers = true)]
        torque: f64,
    },
}

struct PlotArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    preset: Option<PlotPreset>,
    y_variables: Vec<String>,
    x_start: Option<f64>,
    x_end: Option<f64>,
}

fn build_config(args: &PlotArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if !args.y_variables.is_empty() {
        config.y_variables = args.y_variables.clone();
    } else if let Some(preset) = args.preset {
        config.y_variables.clear();
        config.preset = Some(preset);
    }
    if args.x_start.is_some() {
        config.x_start = args.x_start;
    }
    if args.x_end.is_some() {
        config.x_end = args.x_end;
    }
    config.validate()?;
    Ok(config)
}

fn run_plot(args: PlotArgs) -> Result<()> {
    let config = build_config(&args)?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Processing {}...", args.input.display());
    let summary = run_analysis(&config, &args.input, &output_dir)
        .with_context(|| format!("analysing {}", args.input.display()))?;

    if summary.plotted_rows != summary.original_rows {
        println!(
            "Rows plotted: {} of {}",
            summary.plotted_rows, summary.original_rows
        );
    }
    if let Some(rate) = summary.sample_rate_hz {
        println!("Estimated Sample Rate: {rate:.2} Hz");
    }
    println!("Channels: {}", summary.y_variables.join(", "));
    Ok(())
}

fn run_efficiency(speed: f64, torque: f64) {
    let table = shipped_table();
    let efficiency = table.efficiency_at(speed, torque);
    if table.contains(speed, torque) {
        println!("Efficiency at {speed} rpm, {torque} Nm: {efficiency:.2} %");
    } else {
        println!(
            "Efficiency at {speed} rpm, {torque} Nm: {efficiency:.2} % (outside the map envelope)"
        );
    }
}

fn log_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("ev_telemetry_render={level}")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    tracing::debug!("ev_telemetry_render {}", crate_version());

    match cli.command {
        Commands::Plot {
            input,
            config,
            output_dir,
            preset,
            y_variables,
            x_start,
            x_end,
        } => run_plot(PlotArgs {
            input,
            config,
            output_dir,
            preset,
            y_variables,
            x_start,
            x_end,
        }),
        Commands::Efficiency { speed, torque } => {
            run_efficiency(speed, torque);
            Ok(())
        }
    }
}


// src/main.rs
