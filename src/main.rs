use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use pr_attention::config::Config;
use pr_attention::github::GhClient;
use pr_attention::notify::DesktopNotifier;
use pr_attention::poller::{PollOptions, PollOutcome, Poller};
use pr_attention::queue::{self, PrReference, TITLE_WIDTH};
use pr_attention::storage::{SqliteStore, StateStore};

mod cli;

use cli::{Cli, Commands};

fn setup_logging(level: LevelFilter) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pr-attention")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("pr-attention.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // The logger accepts everything; the effective level is the global max level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .target(env_logger::Target::Pipe(target))
        .init();
    apply_log_level(level);

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Level from `--verbose` or the config file. Unknown names fall back to info.
fn log_level(verbose: bool, configured: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    match configured.map(str::parse::<LevelFilter>) {
        None => LevelFilter::Info,
        Some(Ok(level)) => level,
        Some(Err(_)) => {
            warn!("Unknown log level {:?}, using info", configured.unwrap_or_default());
            LevelFilter::Info
        }
    }
}

/// Apply `level` unless RUST_LOG is set, which always wins.
fn apply_log_level(level: LevelFilter) {
    if std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
        log::set_max_level(level);
    }
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Running command: {:?}", cli.command);

    if cli.is_verbose() && !cli.quiet {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run { include_drafts } => handle_run_command(*include_drafts, cli.quiet, config),
        Commands::Status => handle_status_command(config),
        Commands::Ack { reference } => handle_ack_command(reference, cli.quiet, config),
        Commands::Clear { force } => handle_clear_command(*force, config),
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))
}

fn handle_run_command(include_drafts: bool, quiet: bool, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let search = GhClient::new(config.gh_host.clone());
    let notifier = DesktopNotifier::new();
    let poller = Poller::new(config, &store, &search, &notifier);

    let outcome = poller.poll(PollOptions { include_drafts }).context("Polling failed")?;

    if quiet {
        return Ok(());
    }
    match outcome {
        PollOutcome::Skipped { remaining } => {
            eprintln!(
                "{} in backoff, retry in {}",
                "Skipped:".yellow(),
                format_remaining(remaining)
            );
        }
        PollOutcome::Completed(summary) => {
            println!(
                "Found {} PRs ({} notifications sent)",
                summary.total_prs, summary.notifications_sent
            );
        }
    }
    Ok(())
}

fn handle_status_command(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let now = Utc::now();

    println!("{}", "=== Last Run ===".bold());
    match store.last_run().context("Failed to read last run")? {
        None => println!("No runs recorded yet."),
        Some(run) => {
            println!(
                "Time:          {} ({} ago)",
                run.run_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                queue::format_age(run.run_at, now)
            );
            println!("PRs found:     {}", run.prs_found);
            println!("Notifications: {}", run.notifications_sent);
            if let Some(ms) = run.duration_ms {
                println!("Duration:      {}ms", ms);
            }
            if let Some(error) = run.error_message.as_deref() {
                println!("Error:         {}", error.red());
            }
        }
    }
    println!();

    let active = store.active_prs().context("Failed to read attention queue")?;
    println!("{}", "=== Attention Queue ===".bold());
    if active.is_empty() {
        println!("No PRs in attention queue.");
        return Ok(());
    }

    let rows: Vec<[String; 5]> = active
        .iter()
        .map(|pr| {
            [
                pr.repo.clone(),
                pr.number.to_string(),
                queue::truncate_title(&pr.title, TITLE_WIDTH),
                pr.current_status.to_string(),
                queue::format_age(pr.first_seen, now),
            ]
        })
        .collect();
    print_table(["REPO", "#", "TITLE", "STATUS", "SINCE"], &rows);
    Ok(())
}

fn handle_ack_command(reference: &str, quiet: bool, config: &Config) -> Result<()> {
    let reference: PrReference = reference.parse()?;
    let store = open_store(config)?;
    let pr = queue::acknowledge(&store, &reference)?;

    if !quiet {
        println!("{} {} - {}", "Silenced:".green(), pr.short_ref(), pr.title);
        println!("No more notifications until PR is updated.");
    }
    Ok(())
}

fn handle_clear_command(force: bool, config: &Config) -> Result<()> {
    let db_path = &config.db_path;
    if !db_path.exists() {
        println!("Database does not exist. Nothing to clear.");
        return Ok(());
    }

    if !force {
        println!("This will delete all state in: {}", db_path.display());
        print!("Are you sure? [y/N] ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut response = String::new();
        io::stdin()
            .lock()
            .read_line(&mut response)
            .context("Failed to read response")?;
        let response = response.trim().to_lowercase();
        if response != "y" && response != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let store = open_store(config)?;
    queue::reset(&store).context("Failed to reset state")?;
    println!("{} {}", "Cleared:".green(), db_path.display());
    Ok(())
}

fn print_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    println!("{}", header_line.join("  ").trim_end().bold());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging before config load so its messages reach the file
    setup_logging(log_level(cli.is_verbose(), None)).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref(), &cli.orgs).context("Failed to load configuration")?;
    apply_log_level(log_level(cli.is_verbose(), config.log_level.as_deref()));

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config)?;

    Ok(())
}
