//! Path and uploader configuration
//!
//! All three operations are parameterized by a [`BackupConfig`]: two fixed
//! directory roots derived from the project root, plus the settings needed to
//! template the external device-read command. The configuration is built once
//! per invocation and never changes for the process lifetime.
//!
//! ## Directory layout
//!
//! ```text
//! <project_root>/uirb/data/eeprom/backups/<timestamp>/eeprom.bin
//! <project_root>/uirb/data/eeprom/backup_archives/<timestamp>.zip
//! ```
//!
//! ## Example
//!
//! ```rust
//! use eepvault::config::{BackupConfig, UploadProtocol};
//! use std::path::PathBuf;
//!
//! let config = BackupConfig::builder()
//!     .protocol(UploadProtocol::Urclock)
//!     .port("/dev/ttyUSB0")
//!     .speed(57_600)
//!     .build(PathBuf::from("/home/user/uirb-project"));
//!
//! assert!(config.backups_root.ends_with("uirb/data/eeprom/backups"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Timestamp format for naming backup directories and archive files
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name of the raw binary dump inside a backup directory
pub const BIN_DUMP_FILENAME: &str = "eeprom.bin";

/// Default uploader binary when none is configured
pub const DEFAULT_UPLOADER: &str = "avrdude";

/// Default baud rate used when the urclock protocol needs an explicit one
pub const DEFAULT_UPLOAD_SPEED: u32 = 115_200;

/// Path of the EEPROM data area relative to the project root
const EEPROM_DATA_SUBDIR: &[&str] = &["uirb", "data", "eeprom"];

/// Device-programming protocol in use
///
/// Only `urclock` changes behavior: the generated read command then carries
/// explicit `-P`/`-b` flags and the upload port must be resolvable. Every
/// other protocol value is carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadProtocol {
    /// The urclock bootloader protocol; requires explicit port and baud rate
    Urclock,
    /// Any other protocol identifier, passed through untouched
    Other(String),
}

impl FromStr for UploadProtocol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(UploadProtocol::from(s))
    }
}

impl From<&str> for UploadProtocol {
    fn from(s: &str) -> Self {
        match s {
            "urclock" => UploadProtocol::Urclock,
            other => UploadProtocol::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UploadProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadProtocol::Urclock => write!(f, "urclock"),
            UploadProtocol::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Settings for the external device-programming tool
///
/// These map one-to-one onto the placeholders of the read command template:
/// uploader path, uploader flags, upload port, and upload speed. Exact flag
/// names are owned by the external tool, not by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Uploader binary (path or name resolvable via PATH)
    pub uploader: String,
    /// Extra flags passed to the uploader verbatim, before any port/baud flags
    pub uploader_flags: Vec<String>,
    /// Upload protocol; `None` when the environment does not specify one
    pub protocol: Option<UploadProtocol>,
    /// Pre-set upload port; autodetected when absent and the protocol needs one
    pub port: Option<String>,
    /// Upload baud rate; defaults to [`DEFAULT_UPLOAD_SPEED`] when needed
    pub speed: Option<u32>,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            uploader: DEFAULT_UPLOADER.to_string(),
            uploader_flags: Vec::new(),
            protocol: None,
            port: None,
            speed: None,
        }
    }
}

impl UploaderConfig {
    /// Whether the configured protocol is urclock
    pub fn is_urclock(&self) -> bool {
        matches!(self.protocol, Some(UploadProtocol::Urclock))
    }
}

/// Fixed path configuration for one process lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Project root the data layout hangs off
    pub project_root: PathBuf,
    /// Directory holding timestamped backup directories
    pub backups_root: PathBuf,
    /// Directory holding timestamped zip archives
    pub archives_root: PathBuf,
    /// External uploader settings
    pub uploader: UploaderConfig,
}

impl BackupConfig {
    /// Create a configuration with the standard layout under `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        BackupConfigBuilder::default().build(project_root)
    }

    /// Create a builder for custom configuration
    pub fn builder() -> BackupConfigBuilder {
        BackupConfigBuilder::default()
    }

    /// Display a path relative to the project root where possible
    ///
    /// Falls back to the full path when `path` lies outside the project root,
    /// matching how log lines elsewhere reference files.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Builder for [`BackupConfig`]
///
/// The directory roots default to the standard layout under the project root
/// and can be overridden individually (tests point them at temporary
/// directories).
#[derive(Debug, Clone, Default)]
pub struct BackupConfigBuilder {
    backups_root: Option<PathBuf>,
    archives_root: Option<PathBuf>,
    uploader: UploaderConfig,
}

impl BackupConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the backups root directory
    pub fn backups_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.backups_root = Some(path.into());
        self
    }

    /// Override the archives root directory
    pub fn archives_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.archives_root = Some(path.into());
        self
    }

    /// Set the uploader binary
    pub fn uploader(mut self, uploader: impl Into<String>) -> Self {
        self.uploader.uploader = uploader.into();
        self
    }

    /// Set extra uploader flags
    pub fn uploader_flags(mut self, flags: Vec<String>) -> Self {
        self.uploader.uploader_flags = flags;
        self
    }

    /// Set the upload protocol
    pub fn protocol(mut self, protocol: UploadProtocol) -> Self {
        self.uploader.protocol = Some(protocol);
        self
    }

    /// Set the upload port, skipping autodetection
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.uploader.port = Some(port.into());
        self
    }

    /// Set the upload baud rate
    pub fn speed(mut self, speed: u32) -> Self {
        self.uploader.speed = Some(speed);
        self
    }

    /// Build the configuration rooted at `project_root`
    pub fn build(self, project_root: impl Into<PathBuf>) -> BackupConfig {
        let project_root = project_root.into();
        let data_root = EEPROM_DATA_SUBDIR
            .iter()
            .copied()
            .fold(project_root.clone(), |p, part| p.join(part));

        BackupConfig {
            backups_root: self
                .backups_root
                .unwrap_or_else(|| data_root.join("backups")),
            archives_root: self
                .archives_root
                .unwrap_or_else(|| data_root.join("backup_archives")),
            project_root,
            uploader: self.uploader,
        }
    }
}
