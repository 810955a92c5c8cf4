//! Slide rocker CLI: replay drag scripts against the core engine and report ticks.

mod cli;
mod error_fmt;
mod run;
mod script;

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Layer as _, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};

fn main() -> ExitCode {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if *JSON_MODE.get().unwrap_or(&false) {
                eprintln!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            let code = error_fmt::exit_code_for_error(&err);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn dispatch(cli: &Cli) -> eyre::Result<()> {
    let raw = fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let cfg = rocker_config::load_toml(&raw)
        .wrap_err_with(|| format!("parse config {}", cli.config.display()))?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging);
    cfg.validate().wrap_err("invalid configuration")?;

    match &cli.cmd {
        Commands::CheckConfig => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "ok": true, "config": cli.config.display().to_string() })
                );
            } else {
                println!("config ok: {}", cli.config.display());
            }
            Ok(())
        }
        Commands::Run {
            script,
            interval_count,
            base_rate_ms,
            show_ticks,
        } => {
            let text = fs::read_to_string(script)
                .wrap_err_with(|| format!("read script {}", script.display()))?;
            let steps = script::parse(&text)?;
            let extent = run::resolve_extent(&cfg.extent)?;
            let config = run::interval_config(&cfg, *interval_count, *base_rate_ms);

            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }

            let summary = run::replay(extent, config, &steps, &shutdown)?;
            if cli.json {
                println!("{}", run::format_summary_json(&summary));
            } else {
                run::print_summary(&summary, *show_ticks);
            }
            Ok(())
        }
    }
}

/// Install the global subscriber: a console layer on stderr always, plus a
/// JSON-lines file layer when `logging.file` is set. `RUST_LOG` overrides the
/// configured level when present. Stdout stays reserved for command output.
fn init_tracing(json: bool, console_level: &str, logging: &rocker_config::Logging) {
    let level = logging.level.as_deref().unwrap_or(console_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = logging.file.as_deref().map(|path| {
        let p = std::path::Path::new(path);
        let (dir, name) = match (p.parent(), p.file_name()) {
            (Some(dir), Some(name)) if !dir.as_os_str().is_empty() => (dir, name),
            _ => (std::path::Path::new("."), p.as_os_str()),
        };
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        // Keep the flush guard alive for the life of the process.
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt::layer().json().with_writer(writer)
    });

    let console_layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}
