//! Restwell CLI - Command-line interface for the Restwell engine
//!
//! Commands:
//! - estimate: Compute a recommended bedtime
//! - log add: Record a sleep quality entry
//! - log list: Show the persisted weekly summary
//! - doctor: Diagnose data directory and model configuration

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::{Local, NaiveTime};
use thiserror::Error;

use restwell::backends::FileBackend;
use restwell::error::{EstimationError, ModelError, SaveError};
use restwell::estimator::{
    BedtimeEstimator, COFFEE_CUPS_MAX, COFFEE_CUPS_MIN, SLEEP_HOURS_MAX, SLEEP_HOURS_MIN,
    SLEEP_HOURS_STEP,
};
use restwell::model::LinearSleepModel;
use restwell::store::SleepLogStore;
use restwell::types::{QUALITY_MAX, QUALITY_MIN, WeeklySummary};
use restwell::{PRODUCER_NAME, RESTWELL_VERSION, WEEKLY_SUMMARY_KEY};

/// Restwell - On-device bedtime recommendation and sleep quality log engine
#[derive(Parser)]
#[command(name = "restwell")]
#[command(version = RESTWELL_VERSION)]
#[command(about = "Estimate bedtimes and log sleep quality", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a recommended bedtime
    Estimate {
        /// Desired wake time as HH:MM (defaults to 07:00)
        #[arg(short, long, default_value = "07:00")]
        wake: String,

        /// Desired sleep duration in hours (4-12, quarter-hour steps)
        #[arg(long, default_value = "8.0")]
        hours: f64,

        /// Daily coffee intake in cups (1-20)
        #[arg(long, default_value = "1")]
        coffee: u32,

        /// Load model coefficients from a JSON file instead of the shipped model
        #[arg(long)]
        model: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sleep quality log operations
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Diagnose data directory and model configuration
    Doctor {
        /// Data directory holding the persisted log
        #[arg(long, default_value = "restwell-data")]
        data_dir: PathBuf,

        /// Model coefficients file to check
        #[arg(long)]
        model: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Record a sleep quality entry
    Add {
        /// Subjective rating, 1-5
        #[arg(short, long)]
        quality: u8,

        /// Free-text comments
        #[arg(short, long, default_value = "")]
        comments: String,

        /// Data directory holding the persisted log
        #[arg(long, default_value = "restwell-data")]
        data_dir: PathBuf,

        /// Artificial delay before the write, in milliseconds (demo hook)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Show the persisted weekly summary
    List {
        /// Data directory holding the persisted log
        #[arg(long, default_value = "restwell-data")]
        data_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
enum RestwellCliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Estimation(#[from] EstimationError),

    #[error("{0}")]
    Save(#[from] SaveError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Doctor found configuration errors")]
    DoctorFailed,
}

#[derive(Serialize)]
struct CliErrorLine {
    error: String,
}

impl From<RestwellCliError> for CliErrorLine {
    fn from(e: RestwellCliError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliErrorLine::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RestwellCliError> {
    match cli.command {
        Commands::Estimate {
            wake,
            hours,
            coffee,
            model,
            json,
        } => cmd_estimate(&wake, hours, coffee, model.as_deref(), json),

        Commands::Log { command } => match command {
            LogCommands::Add {
                quality,
                comments,
                data_dir,
                delay_ms,
            } => cmd_log_add(quality, &comments, &data_dir, delay_ms),

            LogCommands::List { data_dir, json } => cmd_log_list(&data_dir, json),
        },

        Commands::Doctor {
            data_dir,
            model,
            json,
        } => cmd_doctor(&data_dir, model.as_deref(), json),
    }
}

/// Clamp to the form range and quantize to the quarter-hour step.
///
/// Range enforcement is the presentation layer's job; the estimator treats
/// out-of-range durations as undefined.
fn clamp_hours(hours: f64) -> f64 {
    let clamped = hours.clamp(SLEEP_HOURS_MIN, SLEEP_HOURS_MAX);
    (clamped / SLEEP_HOURS_STEP).round() * SLEEP_HOURS_STEP
}

fn cmd_estimate(
    wake: &str,
    hours: f64,
    coffee: u32,
    model_path: Option<&Path>,
    json: bool,
) -> Result<(), RestwellCliError> {
    let wake_time = NaiveTime::parse_from_str(wake, "%H:%M")
        .map_err(|e| RestwellCliError::InvalidInput(format!("wake time '{}': {}", wake, e)))?;
    let wake_today = Local::now().date_naive().and_time(wake_time);

    if !hours.is_finite() {
        return Err(RestwellCliError::InvalidInput(format!(
            "sleep duration '{}'",
            hours
        )));
    }
    let hours = clamp_hours(hours);
    let coffee = coffee.clamp(COFFEE_CUPS_MIN, COFFEE_CUPS_MAX);

    let model = match model_path {
        Some(path) => LinearSleepModel::from_json(&fs::read_to_string(path)?)?,
        None => LinearSleepModel::default(),
    };

    let estimator = BedtimeEstimator::new(model);
    let rec = estimator.estimate(wake_today, hours, coffee)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
    } else {
        println!("Your recommended bedtime is: {}", rec.short_time());
    }

    Ok(())
}

fn cmd_log_add(
    quality: u8,
    comments: &str,
    data_dir: &Path,
    delay_ms: Option<u64>,
) -> Result<(), RestwellCliError> {
    if !(QUALITY_MIN..=QUALITY_MAX).contains(&quality) {
        return Err(RestwellCliError::InvalidInput(format!(
            "quality must be between {} and {}, got {}",
            QUALITY_MIN, QUALITY_MAX, quality
        )));
    }

    let mut store = SleepLogStore::new(FileBackend::new(data_dir));
    if let Some(ms) = delay_ms {
        store = store.with_save_delay(Duration::from_millis(ms));
    }

    let entry = store.append(quality, comments)?;
    println!(
        "Saved entry {} (quality {})",
        entry.id, entry.quality
    );

    Ok(())
}

fn cmd_log_list(data_dir: &Path, json: bool) -> Result<(), RestwellCliError> {
    let store = SleepLogStore::new(FileBackend::new(data_dir));
    let summary: WeeklySummary = store.load_all();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.is_empty() {
        println!("No sleep quality entries recorded yet.");
        return Ok(());
    }

    for entry in &summary {
        println!("Date: {}", entry.date.format("%b %e, %Y"));
        println!("Sleep Quality: {}", entry.quality);
        if !entry.comments.is_empty() {
            println!("Comments: {}", entry.comments);
        }
        println!();
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

fn cmd_doctor(
    data_dir: &Path,
    model_path: Option<&Path>,
    json: bool,
) -> Result<(), RestwellCliError> {
    let mut checks = Vec::new();

    // Check the persisted summary blob
    let summary_path = data_dir.join(format!("{}.json", WEEKLY_SUMMARY_KEY));
    if summary_path.exists() {
        match fs::read(&summary_path) {
            Ok(blob) => match serde_json::from_slice::<WeeklySummary>(&blob) {
                Ok(summary) => {
                    checks.push(DoctorCheck {
                        name: "sleep_log".to_string(),
                        status: CheckStatus::Ok,
                        message: format!("Summary valid ({} entries)", summary.len()),
                    });
                }
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "sleep_log".to_string(),
                        status: CheckStatus::Warning,
                        message: format!("Summary undecodable, will read as empty: {}", e),
                    });
                }
            },
            Err(e) => {
                checks.push(DoctorCheck {
                    name: "sleep_log".to_string(),
                    status: CheckStatus::Warning,
                    message: format!("Cannot read summary file: {}", e),
                });
            }
        }
    } else {
        checks.push(DoctorCheck {
            name: "sleep_log".to_string(),
            status: CheckStatus::Ok,
            message: "No summary recorded yet (reads as empty)".to_string(),
        });
    }

    // Check model coefficients
    match model_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => match LinearSleepModel::from_json(&contents) {
                Ok(_) => {
                    checks.push(DoctorCheck {
                        name: "model".to_string(),
                        status: CheckStatus::Ok,
                        message: "Model coefficients valid".to_string(),
                    });
                }
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "model".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid model coefficients: {}", e),
                    });
                }
            },
            Err(e) => {
                checks.push(DoctorCheck {
                    name: "model".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read model file: {}", e),
                });
            }
        },
        None => {
            checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Ok,
                message: "Using shipped model coefficients".to_string(),
            });
        }
    }

    // Check stdin mode
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: RESTWELL_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Restwell Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(RestwellCliError::DoctorFailed)
    } else {
        Ok(())
    }
}
