//! Error types for the eepvault library
//!
//! This module defines all error types that can occur during eepvault
//! operations. The taxonomy mirrors the workflow: directory-creation and
//! archive-write failures are fatal and propagate, deletion failures after a
//! successful archive are reported as a distinct variant (the archive itself
//! is already safe on disk), and empty-directory pruning never surfaces
//! errors at all — the [`crate::clean`] module logs and swallows them.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the eepvault library
pub type Result<T> = std::result::Result<T, EepvaultError>;

/// Main error type for all eepvault operations
#[derive(Debug, Error)]
pub enum EepvaultError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors from the zip container while writing an archive
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Walk directory error from walkdir crate
    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Archive could not be written; nothing was deleted
    #[error("Failed to archive backups to {archive:?}: {reason}")]
    ArchiveFailed {
        /// Path the archive was being written to
        archive: PathBuf,
        /// Underlying failure description
        reason: String,
    },

    /// Backups could not be deleted after a successful archive.
    ///
    /// The archive named here has already been written and closed, so no
    /// data is lost even though the operation as a whole fails.
    #[error("Failed to delete archived backups: {reason} (archive already written to {archive:?})")]
    CleanupAfterArchive {
        /// The archive that was successfully written before the failure
        archive: PathBuf,
        /// Underlying failure description
        reason: String,
    },

    /// No upload port configured and autodetection found none
    #[error("No upload port: set UPLOAD_PORT or connect a serial device")]
    NoUploadPort,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EepvaultError {
    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        EepvaultError::Internal(msg.into())
    }

    /// Create an invalid-configuration error with a custom message
    pub fn config(msg: impl Into<String>) -> Self {
        EepvaultError::InvalidConfiguration(msg.into())
    }

    /// Check whether data already written remains valid despite this error
    ///
    /// True only for post-archive cleanup failures, where the archive exists
    /// and is complete even though the operation reports failure.
    pub fn data_is_safe(&self) -> bool {
        matches!(self, EepvaultError::CleanupAfterArchive { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EepvaultError::NoUploadPort;
        assert!(err.to_string().contains("UPLOAD_PORT"));
    }

    #[test]
    fn test_data_is_safe() {
        let err = EepvaultError::CleanupAfterArchive {
            archive: PathBuf::from("/tmp/20240101_000000.zip"),
            reason: "permission denied".to_string(),
        };
        assert!(err.data_is_safe());
        assert!(!EepvaultError::NoUploadPort.data_is_safe());
    }
}
