//! routemap: build-step CLI for the route map
//!
//! Converts OS grid references to WGS84, enriches JSON records with
//! positions, and summarises and simplifies GPS tracks.

use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

use commands::{distance, enrich, grid, simplify, track};
use config::Config;

/// Route map build tools
#[derive(Parser)]
#[command(name = "routemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Path to a routemap.toml (searched for in standard locations otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert OS grid references to WGS84 latitude/longitude
    Grid {
        /// Grid references, e.g. "SE 119 157"
        #[arg(required = true)]
        references: Vec<String>,
    },

    /// Add lat/lon to JSON records that carry a grid reference
    Enrich {
        /// Input JSON document
        input: PathBuf,

        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record field holding the grid reference
        #[arg(long)]
        field: Option<String>,
    },

    /// Summarise tracks: distance, elevation gain, simplified coordinates
    ///
    /// With several inputs, writes the map's track collection instead.
    Track {
        /// JSON arrays of points ({latitude, longitude, elevation?, timestamp?})
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Simplification tolerance in degrees
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Decimal places kept in coordinates
        #[arg(short, long)]
        decimals: Option<usize>,

        /// Write the track collection here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simplify a JSON array of [lat, lon] pairs
    Simplify {
        /// Input JSON file
        input: PathBuf,

        /// Simplification tolerance (same units as the coordinates)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Great-circle distance between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let mut telemetry = config.telemetry();
    if cli.verbose {
        telemetry = telemetry.with_level("debug");
    }
    routemap_telemetry::init_with_config(&telemetry)?;

    match cli.command {
        Commands::Grid { references } => grid::run(&references, cli.format),

        Commands::Enrich { input, output, field } => {
            let mut settings = config.grid.clone();
            if let Some(field) = field {
                settings.reference_field = field;
            }
            enrich::run(&input, output.as_deref(), &settings, cli.format)
        }

        Commands::Track { inputs, tolerance, decimals, output } => {
            let mut settings = config.track.clone();
            settings.tolerance = tolerance.unwrap_or(settings.tolerance);
            settings.decimals = decimals.unwrap_or(settings.decimals);
            track::run(&inputs, output.as_deref(), &settings, cli.format)
        }

        Commands::Simplify { input, tolerance } => {
            simplify::run(&input, tolerance.unwrap_or(config.track.tolerance))
        }

        Commands::Distance { lat1, lon1, lat2, lon2 } => {
            distance::run((lat1, lon1), (lat2, lon2), cli.format)
        }
    }
}
