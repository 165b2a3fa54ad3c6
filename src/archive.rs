//! Backup archiving
//!
//! The Archiver bundles every file currently under the backups root into one
//! timestamped zip archive (deflate compression, entry names relative to the
//! backups root), then deletes the originals. Deletion only starts after the
//! archive has been written and closed, so an archive-write failure never
//! costs data; a deletion failure after that point is still reported as fatal
//! but the archive remains valid.
//!
//! ## Example
//!
//! ```rust,no_run
//! use eepvault::config::BackupConfig;
//! use eepvault::archive::archive_backups;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackupConfig::new("/home/user/uirb-project");
//! let outcome = archive_backups(&config, chrono::Local::now())?;
//! println!("{} files -> {:?}", outcome.files_archived, outcome.archive_path);
//! # Ok(())
//! # }
//! ```

use crate::config::BackupConfig;
use crate::error::{EepvaultError, Result};
use crate::utils;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Result of a successful archive run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveOutcome {
    /// The zip archive that was written
    pub archive_path: PathBuf,
    /// Number of files bundled into the archive
    pub files_archived: usize,
}

/// Archive all existing EEPROM backups into a timestamped zip file
///
/// Ensures the archives root exists, writes
/// `archives_root/<timestamp>.zip` containing every file under the backups
/// root (entry names relative to the backups root), and on success deletes
/// every entry directly under the backups root. An empty or missing backups
/// root produces a valid empty archive and no deletions; that is not an
/// error.
///
/// # Errors
///
/// - [`EepvaultError::Io`] if the archives root cannot be created
/// - [`EepvaultError::ArchiveFailed`] if the archive cannot be written; no
///   deletion has happened at that point
/// - [`EepvaultError::CleanupAfterArchive`] if deleting the originals fails
///   after the archive was written; the archive named in the error is valid
pub fn archive_backups(config: &BackupConfig, now: DateTime<Local>) -> Result<ArchiveOutcome> {
    fs::create_dir_all(&config.archives_root)?;

    let timestamp = utils::format_timestamp(now);
    let archive_path = config.archives_root.join(format!("{}.zip", timestamp));

    let files_archived =
        write_archive(&archive_path, &config.backups_root).map_err(|e| {
            EepvaultError::ArchiveFailed {
                archive: archive_path.clone(),
                reason: e.to_string(),
            }
        })?;
    info!(
        "All backups archived successfully to {}",
        config.display_relative(&archive_path)
    );

    delete_backups(&config.backups_root).map_err(|e| EepvaultError::CleanupAfterArchive {
        archive: archive_path.clone(),
        reason: e.to_string(),
    })?;
    info!("All original backup files and directories have been deleted.");

    Ok(ArchiveOutcome {
        archive_path,
        files_archived,
    })
}

/// Write every file under `backups_root` into a zip at `archive_path`
fn write_archive(archive_path: &Path, backups_root: &Path) -> Result<usize> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files_archived = 0usize;
    if backups_root.exists() {
        for entry in WalkDir::new(backups_root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = utils::make_relative(entry.path(), backups_root)?;
            let entry_name = utils::zip_entry_name(&relative);
            debug!("Archiving {}", entry_name);

            zip.start_file(entry_name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut zip)?;
            files_archived += 1;
        }
    }

    zip.finish()?;
    Ok(files_archived)
}

/// Delete every entry directly under the backups root
fn delete_backups(backups_root: &Path) -> Result<()> {
    if !backups_root.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(backups_root)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
