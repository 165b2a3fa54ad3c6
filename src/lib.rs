//! # eepvault - EEPROM backup housekeeping
//!
//! Build-time utility for managing EEPROM memory dumps in an embedded device
//! project. It prepares a device-read invocation that writes a binary dump
//! under a timestamped directory, archives all accumulated dumps into a
//! single zip file, and prunes empty backup directories left behind.
//!
//! ## Overview
//!
//! Three independent, stateless operations compose the crate, each exposed
//! as a named build target:
//!
//! - **Backup Preparer** ([`prepare`]): creates `backups/<timestamp>/`,
//!   computes the `eeprom.bin` output path inside it, and builds the
//!   device-read command for the external uploader (avrdude or compatible).
//!   The `urclock` protocol gets explicit `-P`/`-b` flags, with upload-port
//!   autodetection when no port is configured.
//! - **Archiver** ([`archive`]): bundles every file under the backups root
//!   into `backup_archives/<timestamp>.zip` (deflate compression, entry
//!   names relative to the backups root), then deletes the originals.
//!   Deletion never starts before the archive is safely written.
//! - **Cleaner** ([`clean`]): removes empty directories under the backups
//!   root, deepest-first, best-effort; it never fails its caller.
//!
//! The crate never talks to the device itself and never interprets EEPROM
//! contents; reading the chip is delegated to the external uploader tool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eepvault::config::BackupConfig;
//! use eepvault::{archive, clean, prepare};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackupConfig::new("/home/user/uirb-project");
//!
//! // Prepare a backup: directory created, read command templated
//! let prepared = prepare::prepare_backup(&config, chrono::Local::now())?;
//! println!("run: {}", prepared.read_command);
//!
//! // Later: bundle everything into one archive and clear the backups root
//! let outcome = archive::archive_backups(&config, chrono::Local::now())?;
//! println!("archived {} files", outcome.files_archived);
//!
//! // Housekeeping: drop directories left empty
//! clean::prune_empty_dirs(&config);
//! # Ok(())
//! # }
//! ```
//!
//! ## Orchestrator Integration
//!
//! Build orchestrators dispatch through the [`targets`] registry instead of
//! calling operations directly:
//!
//! ```rust,no_run
//! use eepvault::{config::BackupConfig, targets};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackupConfig::new(".");
//! for target in targets::registry() {
//!     println!("{:10} {}", target.name, target.description);
//! }
//! targets::run("clean", &config)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Filesystem Layout
//!
//! ```text
//! <project_root>/uirb/data/eeprom/backups/<timestamp>/eeprom.bin
//! <project_root>/uirb/data/eeprom/backup_archives/<timestamp>.zip
//! ```
//!
//! Timestamps use the `%Y%m%d_%H%M%S` format in local time.
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, EepvaultError>`. The taxonomy
//! is deliberate and asymmetric:
//!
//! - directory-creation and archive-write failures are fatal and propagate;
//! - a deletion failure after a successful archive is fatal but reported via
//!   [`error::EepvaultError::CleanupAfterArchive`], which names the archive
//!   that already holds the data;
//! - empty-directory pruning swallows every error — it is best-effort
//!   cleanup and never raises.
//!
//! ## Module Organization
//!
//! - [`config`]: path layout and uploader settings
//! - [`prepare`]: backup preparation and read-command templating
//! - [`archive`]: zip archiving of accumulated backups
//! - [`clean`]: empty-directory pruning
//! - [`targets`]: named-target registry for build orchestrators
//! - [`error`]: error types and handling

// Public API modules
pub mod archive;
pub mod clean;
pub mod config;
pub mod error;
pub mod prepare;
pub mod targets;

// Internal modules (not part of public API)
mod utils;

// Re-export main types for convenience
pub use archive::{archive_backups, ArchiveOutcome};
pub use clean::prune_empty_dirs;
pub use config::{BackupConfig, BackupConfigBuilder, UploadProtocol, UploaderConfig};
pub use error::{EepvaultError, Result};
pub use prepare::{prepare_backup, PreparedBackup};
pub use targets::Target;
