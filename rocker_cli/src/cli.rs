//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "rocker", version, about = "Slide rocker CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/rocker.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a drag script and report the ticks it produced
    Run {
        /// Path to the drag script (start/move/wait/end lines)
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        /// Override rocker.interval_count from the config
        #[arg(long, value_name = "N")]
        interval_count: Option<u32>,
        /// Override rocker.base_rate_ms from the config
        #[arg(long, value_name = "MS")]
        base_rate_ms: Option<u64>,
        /// Print each dispatched tick before the summary
        #[arg(long, action = ArgAction::SetTrue)]
        show_ticks: bool,
    },
    /// Parse and validate the config, then exit
    CheckConfig,
}
