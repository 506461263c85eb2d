// Clippy configuration: enable pedantic but allow overly strict lints
#![allow(clippy::missing_errors_doc)] // Internal functions don't need # Errors docs
#![allow(clippy::missing_panics_doc)] // Internal functions don't need # Panics docs
#![allow(clippy::must_use_candidate)] // Not all getters need #[must_use]
#![allow(clippy::module_name_repetitions)] // e.g., CallStats in stats module is fine
#![allow(clippy::doc_markdown)] // Don't require backticks around MicroSIP, INI, etc.
#![allow(clippy::too_many_lines)] // Renderers are naturally long
#![allow(clippy::cast_possible_truncation)] // Cent amounts fit in u64
#![allow(clippy::cast_sign_loss)] // Amounts are made absolute before casting
#![allow(clippy::cast_precision_loss)] // Money is displayed with two decimals
#![allow(clippy::if_not_else)] // Negative conditions can be clearer for early returns
#![allow(clippy::single_match_else)] // match with else is fine for Result handling
#![allow(clippy::manual_let_else)] // if-let is clearer for multi-line error handling
#![allow(clippy::option_if_let_else)] // if-let is more readable for Option handling
#![allow(clippy::needless_pass_by_value)] // PathBuf by value is fine for config loading

//! callercard - who is calling, and what happened last time
//!
//! Reads the `[Calls]` history MicroSIP keeps in its INI, matches a phone
//! number against it regardless of formatting or country prefix, and prints
//! a caller card: customer details from the directory, call counts per
//! direction for today / the last 7 days / all time, and an outcome
//! histogram. Unknown numbers get (offline) web results with the number
//! highlighted and are appended to a CSV log.
//!
//! Usage:
//!   callercard lookup 2104848484           # Caller card
//!   callercard stats "210 484 8484"        # History counts only
//!   callercard highlight 2104848484 "..."  # Mark the number in text

mod calllog;
mod cli;
mod config;
mod directory;
mod errors;
mod highlight;
mod notify;
mod phone;
mod report;
mod search;
mod stats;
mod unknown_log;

use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use color_eyre::Result;
use config::AppConfig;
use directory::{ConfigDirectory, CustomerDirectory};
use errors::CallerCardError;
use report::CallerCard;
use search::{OfflineSearch, SearchProvider};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unknown_log::UnknownCallLog;

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || std::env::temp_dir().join("callercard").join("logs"),
        |dirs| dirs.cache_dir().join("callercard").join("logs"),
    )
}

/// Daily-rotated file log, plus stderr when `verbose`
fn init_logging(log_level: &str, verbose: bool) -> Result<WorkerGuard> {
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "callercard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let log_filter = format!("callercard={}", log_level);
    let stderr_layer = verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .with(stderr_layer)
        .init();

    tracing::debug!("Log directory: {:?}", log_dir);
    Ok(guard)
}

/// Canonical digits of `phone`, rejecting input without any
fn require_digits(phone: &str) -> Result<String> {
    let canonical = phone::normalize(phone);
    if canonical.is_empty() {
        return Err(CallerCardError::EmptyPhone(phone.to_string()).into());
    }
    Ok(canonical)
}

/// Build and print the caller card for `phone`
fn handle_lookup(
    config: &AppConfig,
    calls_path: &Path,
    phone: &str,
    format: OutputFormat,
    notify: bool,
    no_csv: bool,
) -> Result<()> {
    let canonical = require_digits(phone)?;
    tracing::info!("Looking up {}", canonical);

    let calls = calllog::parse_call_log(calls_path);
    let stats = stats::aggregate(&canonical, &calls);

    let directory = ConfigDirectory::new(config.customers.clone());
    let customer = directory.lookup_customer_by_phone(&canonical);

    let web_results = if customer.is_none() {
        let results = OfflineSearch.search(&canonical);
        if !no_csv {
            let log = UnknownCallLog::new(&config.unknown_csv_path);
            if let Err(e) = log.append(&canonical, &results) {
                tracing::warn!("Could not log unknown caller to {:?}: {}", log.path(), e);
            }
        }
        results
    } else {
        Vec::new()
    };

    if stats.is_empty() && web_results.is_empty() && customer.is_none() {
        tracing::info!("No local stats, no web results and no customer match");
    }

    let card = CallerCard {
        phone: phone.to_string(),
        customer,
        stats,
        web_results,
    };
    tracing::debug!("Card for {}: known={}", canonical, card.is_known());

    match format {
        OutputFormat::Text => print!("{}", card.render_text()),
        OutputFormat::Html => println!("{}", card.render_html(&config.highlight_color)),
        OutputFormat::Json => println!("{}", card.render_json()?),
    }

    if notify {
        notify::send(&card.title(), &card.summary(), config.notify_timeout_ms);
    }
    Ok(())
}

/// Print direction counts and statuses only.
///
/// A number without digits is not an error here; it just has no history.
fn handle_stats(calls_path: &Path, phone: &str, json: bool) -> Result<()> {
    let canonical = phone::normalize(phone);
    let stats = if canonical.is_empty() {
        stats::CallStats::default()
    } else {
        stats::aggregate(&canonical, &calllog::parse_call_log(calls_path))
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.is_empty() {
        println!("No calls found for {}", phone);
        return Ok(());
    }
    println!("{:<10} {:>6} {:>6} {:>6}", "DIRECTION", "TODAY", "WEEK", "TOTAL");
    println!("{}", "-".repeat(31));
    for (direction, s) in stats.ordered_directions() {
        println!(
            "{:<10} {:>6} {:>6} {:>6}",
            direction.label(),
            s.today,
            s.week,
            s.total
        );
    }
    println!();
    for (label, count) in stats.statuses_by_count() {
        println!("{:<20} {:>6}", label, count);
    }
    Ok(())
}

/// Print `text` (or the file's content) with `phone` highlighted
fn handle_highlight(
    config: &AppConfig,
    phone: &str,
    text: Option<String>,
    file: Option<PathBuf>,
    color: Option<String>,
) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            let bytes = std::fs::read(&path)?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        (None, None) => {
            return Err(color_eyre::eyre::eyre!(
                "Nothing to highlight: pass TEXT or --file"
            ))
        }
    };

    let color = color.unwrap_or_else(|| config.highlight_color.clone());
    println!(
        "{}",
        highlight::highlight(&text, phone, highlight::emphasis(&color))
    );
    Ok(())
}

/// Write the example config to `path` unless something is already there
fn write_example_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(color_eyre::eyre::eyre!(
            "{} already exists, not overwriting",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::example())?;
    tracing::info!("Wrote example configuration to {:?}", path);
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Commands that need neither config nor logging
    match cli.command {
        Commands::Completions { shell } => {
            cli::print_completions(shell);
            return Ok(());
        }
        Commands::ConfigExample { write: false } => {
            print!("{}", AppConfig::example());
            return Ok(());
        }
        _ => {}
    }

    color_eyre::install()?;
    let _guard = init_logging(&cli.log_level, cli.verbose)?;
    tracing::info!("Starting callercard v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load_from_path(&config_path);
    let calls_path = cli.calls.clone().unwrap_or_else(|| config.calls_path.clone());
    tracing::debug!("Call log path: {:?}", calls_path);

    match cli.command {
        Commands::Lookup {
            phone,
            format,
            notify,
            no_csv,
        } => handle_lookup(&config, &calls_path, &phone, format, notify, no_csv),
        Commands::Stats { phone, json } => handle_stats(&calls_path, &phone, json),
        Commands::Highlight {
            phone,
            text,
            file,
            color,
        } => handle_highlight(&config, &phone, text, file, color),
        Commands::ConfigExample { .. } => write_example_config(&config_path),
        Commands::Completions { .. } => Ok(()),
    }
}
