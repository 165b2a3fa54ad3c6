//! # eepvault CLI - EEPROM backup housekeeping
//!
//! Command-line front end over the eepvault library, meant to be invoked as
//! named build targets by a build/task orchestrator.
//!
//! ## Usage
//! ```bash
//! # Prepare a backup directory and the device-read command
//! eepvault backup
//!
//! # Same, machine-readable for the orchestrator
//! eepvault backup --json
//!
//! # Bundle all backups into one timestamped zip, then delete the originals
//! eepvault archive
//!
//! # Drop empty backup directories
//! eepvault clean
//! ```
//!
//! Configuration arrives via flags or the environment: `PROJECT_DIR`,
//! `UPLOAD_PROTOCOL`, `UPLOAD_PORT`, `UPLOAD_SPEED`, `UPLOADER`,
//! `UPLOADERFLAGS`.

use clap::{Parser, Subcommand};
use colored::*;
use eepvault::config::{BackupConfig, UploadProtocol};
use eepvault::{archive, clean, prepare, targets, Result};
use std::path::PathBuf;

/// eepvault CLI - timestamped EEPROM dumps, zip archiving, pruning
#[derive(Parser)]
#[command(name = "eepvault")]
#[command(version)]
#[command(about = "Build-time housekeeping for EEPROM backups")]
#[command(long_about = None)]
struct Cli {
    /// Project root the backup layout hangs off (defaults to current dir)
    #[arg(short, long, global = true, env = "PROJECT_DIR")]
    project_root: Option<PathBuf>,

    /// Upload protocol identifier (e.g. urclock, arduino)
    #[arg(long, global = true, env = "UPLOAD_PROTOCOL")]
    protocol: Option<String>,

    /// Upload port; autodetected for urclock when omitted
    #[arg(long, global = true, env = "UPLOAD_PORT")]
    port: Option<String>,

    /// Upload baud rate
    #[arg(long, global = true, env = "UPLOAD_SPEED")]
    speed: Option<u32>,

    /// Uploader binary
    #[arg(long, global = true, env = "UPLOADER")]
    uploader: Option<String>,

    /// Extra uploader flags, whitespace separated
    #[arg(long, global = true, env = "UPLOADERFLAGS", allow_hyphen_values = true)]
    uploader_flags: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare a timestamped backup directory and the EEPROM read command
    Backup {
        /// Emit the prepared paths and command as JSON
        #[arg(long)]
        json: bool,
    },

    /// Archive all backups into a single zip and delete the originals
    Archive,

    /// Delete empty backup directories
    Clean,

    /// List the registered build targets
    Targets,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    // Run command
    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if e.data_is_safe() {
            eprintln!("The archive was written before the failure; no backup data was lost.");
        }
        std::process::exit(1);
    }
}

/// Main command runner
fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli);

    match cli.command {
        Commands::Backup { json } => cmd_backup(&config, json),
        Commands::Archive => cmd_archive(&config),
        Commands::Clean => cmd_clean(&config),
        Commands::Targets => cmd_targets(),
    }
}

/// Assemble the configuration from flags and environment
fn build_config(cli: &Cli) -> BackupConfig {
    let project_root = cli
        .project_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut builder = BackupConfig::builder();
    if let Some(protocol) = &cli.protocol {
        builder = builder.protocol(UploadProtocol::from(protocol.as_str()));
    }
    if let Some(port) = &cli.port {
        builder = builder.port(port.clone());
    }
    if let Some(speed) = cli.speed {
        builder = builder.speed(speed);
    }
    if let Some(uploader) = &cli.uploader {
        builder = builder.uploader(uploader.clone());
    }
    if let Some(flags) = &cli.uploader_flags {
        builder = builder.uploader_flags(flags.split_whitespace().map(String::from).collect());
    }

    builder.build(project_root)
}

/// Prepare a backup invocation
///
/// Creates the timestamped directory and prints the device-read command the
/// orchestrator must execute; `--json` emits the full record for machine
/// consumption instead.
fn cmd_backup(config: &BackupConfig, json: bool) -> Result<()> {
    let prepared = prepare::prepare_backup(config, chrono::Local::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prepared)?);
        return Ok(());
    }

    println!(
        "{} The upload and EEPROM read flags may conflict!",
        "Warning:".yellow().bold()
    );
    println!("{} Prepared EEPROM backup", "✓".green().bold());
    println!(
        "  Directory: {}",
        config.display_relative(&prepared.backup_dir).cyan()
    );
    println!(
        "  Binary: {}",
        config.display_relative(&prepared.bin_path).cyan()
    );
    println!("  Read command: {}", prepared.read_command.yellow());

    Ok(())
}

/// Archive all backups
fn cmd_archive(config: &BackupConfig) -> Result<()> {
    println!("{}", "Archiving all EEPROM backups...".blue().bold());

    let outcome = archive::archive_backups(config, chrono::Local::now())?;

    println!(
        "{} Archived {} file(s) to {}",
        "✓".green().bold(),
        outcome.files_archived.to_string().cyan(),
        config.display_relative(&outcome.archive_path).cyan()
    );
    println!("  Original backup files and directories deleted.");

    Ok(())
}

/// Prune empty backup directories
fn cmd_clean(config: &BackupConfig) -> Result<()> {
    println!("{}", "Deleting empty backup directories...".blue().bold());

    let removed = clean::prune_empty_dirs(config);

    println!(
        "{} Removed {} empty backup director{}",
        "✓".green().bold(),
        removed.to_string().cyan(),
        if removed == 1 { "y" } else { "ies" }
    );

    Ok(())
}

/// List registered targets
fn cmd_targets() -> Result<()> {
    println!("{}", "Registered targets:".bold());
    for target in targets::registry() {
        println!(
            "  {:10} {} {}",
            target.name.yellow(),
            format!("[{}]", target.group).dimmed(),
            target.title
        );
        println!("             {}", target.description.dimmed());
    }
    Ok(())
}
