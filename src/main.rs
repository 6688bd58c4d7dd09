//! CLI Entry Point for sensor_logger
//!
//! Provides command-line interface for:
//! - Logging readings from the serial sensor into per-day JSON files
//! - Exporting a day file as CSV
//!
//! # Usage
//!
//! Log from the configured serial port:
//! ```bash
//! sensor_logger run --port /dev/ttyACM0 --baud 9600
//! ```
//!
//! Log from standard input (e.g. a replayed capture):
//! ```bash
//! sensor_logger run --stdin < capture.jsonl
//! ```
//!
//! Export a day:
//! ```bash
//! sensor_logger export readings-2026-10-16.json --output readings-2026-10-16.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sensor_logger::config::{LoggerConfig, DEFAULT_CONFIG_PATH};
use sensor_logger::data::{export, DailyStore};
use sensor_logger::instrument::SerialSensorBuilder;
use sensor_logger::logging;
use sensor_logger::measurement::SensorReading;
use sensor_logger::session::{run_session, StreamEnd, SystemClock};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "sensor_logger")]
#[command(about = "Logs serial air-quality readings into per-day JSON files", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the sensor until its stream ends
    Run {
        /// Serial device path
        #[arg(long)]
        port: Option<String>,

        /// Serial line speed
        #[arg(long)]
        baud: Option<u32>,

        /// Directory for the day files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Read records from standard input instead of the serial port
        #[arg(long)]
        stdin: bool,
    },

    /// Convert a day file to CSV
    Export {
        /// Day file to read
        input: PathBuf,

        /// CSV destination (standard output when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LoggerConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from '{}'", cli.config.display()))?;

    if let Commands::Run {
        port,
        baud,
        output_dir,
        ..
    } = &cli.command
    {
        if let Some(port) = port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = baud {
            config.serial.baud_rate = *baud;
        }
        if let Some(dir) = output_dir {
            config.storage.output_dir = dir.clone();
        }
    }

    config.validate()?;
    logging::init_from_config(&config)?;

    match cli.command {
        Commands::Run { stdin, .. } => run(&config, stdin),
        Commands::Export { input, output } => export_day(&input, output.as_deref()),
    }
}

fn run(config: &LoggerConfig, from_stdin: bool) -> Result<()> {
    let store = DailyStore::new(&config.storage.output_dir);
    info!(output_dir = %store.dir().display(), "Sensor logger starting");

    let summary = if from_stdin {
        run_session(io::stdin().lock(), &store, &SystemClock)
    } else {
        let port = SerialSensorBuilder::from_config(&config.serial)
            .open()
            .map_err(|e| {
                error!(error = %e, "Cannot open sensor input");
                e
            })
            .context("Couldn't open serial")?;
        run_session(BufReader::new(port), &store, &SystemClock)
    };

    match &summary.ended {
        StreamEnd::Eof => info!(appended = summary.appended, "Sensor stream ended"),
        StreamEnd::Error(reason) => {
            info!(appended = summary.appended, %reason, "Sensor stream stopped")
        }
    }
    Ok(())
}

fn export_day(input: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let readings: Vec<SensorReading> = serde_json::from_slice(&bytes)
        .with_context(|| format!("'{}' is not a readings file", input.display()))?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            export::write_csv(file, &readings)?;
            info!(rows = readings.len(), path = %path.display(), "Export written");
        }
        None => export::write_csv(io::stdout().lock(), &readings)?,
    }
    Ok(())
}
