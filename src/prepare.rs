//! Backup preparation
//!
//! The Backup Preparer computes a timestamped backup directory, creates it,
//! and builds the device-read command the external uploader must run to dump
//! the EEPROM into that directory. It performs no device I/O itself: the
//! returned [`PreparedBackup`] is handed to the invoking build orchestrator,
//! which executes the command.
//!
//! ## Example
//!
//! ```rust,no_run
//! use eepvault::config::BackupConfig;
//! use eepvault::prepare::prepare_backup;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackupConfig::new("/home/user/uirb-project");
//! let prepared = prepare_backup(&config, chrono::Local::now())?;
//! println!("run: {}", prepared.read_command);
//! # Ok(())
//! # }
//! ```

use crate::config::{BackupConfig, UploaderConfig, BIN_DUMP_FILENAME, DEFAULT_UPLOAD_SPEED};
use crate::error::{EepvaultError, Result};
use crate::utils;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of preparing a backup invocation
///
/// Carries the variables the external command executor consumes: where the
/// dump directory lives, where the binary dump must be written, and the full
/// read command to run. Serializable so orchestrators can take it as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedBackup {
    /// Timestamped directory created for this backup
    pub backup_dir: PathBuf,
    /// Path the binary EEPROM dump must be written to
    pub bin_path: PathBuf,
    /// Complete device-read command for the external uploader
    pub read_command: String,
}

/// Prepare the environment for reading EEPROM data
///
/// Creates `backups_root/<timestamp>` (idempotent if invoked twice within
/// the same second), computes the binary dump path inside it, and selects
/// the read command variant based on the configured upload protocol:
///
/// - `urclock`: the upload port is resolved (configured port, else
///   autodetection) and the command carries explicit `-P <port> -b <baud>`
///   flags;
/// - any other protocol: the simpler variant without port/baud flags.
///
/// # Errors
///
/// - [`EepvaultError::Io`] if the backup directory cannot be created
/// - [`EepvaultError::NoUploadPort`] if the protocol is urclock and no
///   upload port is configured or detectable
pub fn prepare_backup(config: &BackupConfig, now: DateTime<Local>) -> Result<PreparedBackup> {
    let timestamp = utils::format_timestamp(now);
    let backup_dir = config.backups_root.join(&timestamp);
    fs::create_dir_all(&backup_dir)?;

    let bin_path = backup_dir.join(BIN_DUMP_FILENAME);
    info!("Binary path: {}", config.display_relative(&bin_path));

    warn!("The upload and EEPROM read flags may conflict!");

    let read_command = build_read_command(&config.uploader, &bin_path)?;
    debug!("Read command: {}", read_command);

    Ok(PreparedBackup {
        backup_dir,
        bin_path,
        read_command,
    })
}

/// Build the device-read command string from the uploader configuration
fn build_read_command(uploader: &UploaderConfig, bin_path: &Path) -> Result<String> {
    let mut parts = vec![uploader.uploader.clone()];
    parts.extend(uploader.uploader_flags.iter().cloned());

    if uploader.is_urclock() {
        let port = match &uploader.port {
            Some(port) => port.clone(),
            None => autodetect_upload_port().ok_or(EepvaultError::NoUploadPort)?,
        };
        let speed = uploader.speed.unwrap_or(DEFAULT_UPLOAD_SPEED);
        parts.push("-P".to_string());
        parts.push(port);
        parts.push("-b".to_string());
        parts.push(speed.to_string());
    }

    parts.push("-U".to_string());
    parts.push(format!("eeprom:r:\"{}\":r", bin_path.display()));

    Ok(parts.join(" "))
}

/// Autodetect an upload port by scanning the serial-device namespace
///
/// Returns the first matching device in name order, or `None` when no
/// candidate exists. On non-Unix platforms detection is not attempted and
/// the port must be configured explicitly.
pub fn autodetect_upload_port() -> Option<String> {
    #[cfg(unix)]
    {
        detect_port_in(Path::new("/dev"))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Serial device name prefixes considered upload-port candidates
#[cfg(unix)]
const PORT_PREFIXES: &[&str] = &["ttyUSB", "ttyACM", "cu.usbserial", "cu.usbmodem"];

#[cfg(unix)]
fn detect_port_in(dev_dir: &Path) -> Option<String> {
    let entries = fs::read_dir(dev_dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            PORT_PREFIXES.iter().any(|p| name.starts_with(p))
        })
        .map(|e| e.path())
        .collect();

    candidates.sort();
    let port = candidates.into_iter().next()?;
    debug!("Autodetected upload port: {:?}", port);
    Some(port.display().to_string())
}
