//! Utility functions shared by the backup operations

use crate::config::TIMESTAMP_FORMAT;
use crate::error::{EepvaultError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Format a timestamp the way backup directories and archives are named
///
/// Produces strings like `20240131_235959` (year, month, day, hour, minute,
/// second, underscore-separated date and time).
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Check that a string is a well-formed backup timestamp
pub fn is_well_formed_timestamp(s: &str) -> bool {
    chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).is_ok()
}

/// Make a path relative to a base path
///
/// Attempts a lexical strip first so symbolic links are preserved, and falls
/// back to canonicalizing both paths when the components differ in
/// normalization.
pub fn make_relative(path: &Path, base: &Path) -> Result<PathBuf> {
    if let Ok(relative) = path.strip_prefix(base) {
        return Ok(relative.to_path_buf());
    }

    let path_canon = path.canonicalize()?;
    let base_canon = base.canonicalize()?;

    path_canon
        .strip_prefix(&base_canon)
        .map(|p| p.to_path_buf())
        .map_err(|_| {
            EepvaultError::internal(format!(
                "Path {:?} is not relative to {:?}",
                path_canon, base_canon
            ))
        })
}

/// Remove directory if empty
pub fn remove_dir_if_empty(path: &Path) -> Result<bool> {
    if path.is_dir() && fs::read_dir(path)?.next().is_none() {
        fs::remove_dir(path)?;
        trace!("Removed empty directory: {:?}", path);
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Convert a relative path into a zip entry name with `/` separators
pub fn zip_entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_format_timestamp() {
        let dt = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(dt), "20240131_235959");
    }

    #[test]
    fn test_well_formed_timestamp() {
        assert!(is_well_formed_timestamp("20240131_235959"));
        assert!(!is_well_formed_timestamp("2024-01-31 23:59:59"));
        assert!(!is_well_formed_timestamp("20241331_000000"));
        assert!(!is_well_formed_timestamp("latest"));
    }

    #[test]
    fn test_make_relative() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        let subdir = base.join("subdir");
        let file = subdir.join("file.bin");

        fs::create_dir_all(&subdir).unwrap();
        fs::write(&file, b"test").unwrap();

        let relative = make_relative(&file, base).unwrap();
        assert_eq!(relative, PathBuf::from("subdir/file.bin"));
    }

    #[test]
    fn test_remove_dir_if_empty() {
        let temp_dir = TempDir::new().unwrap();
        let empty_dir = temp_dir.path().join("empty");
        let non_empty_dir = temp_dir.path().join("non_empty");

        fs::create_dir(&empty_dir).unwrap();
        fs::create_dir(&non_empty_dir).unwrap();
        fs::write(non_empty_dir.join("file.bin"), b"test").unwrap();

        assert!(remove_dir_if_empty(&empty_dir).unwrap());
        assert!(!empty_dir.exists());

        assert!(!remove_dir_if_empty(&non_empty_dir).unwrap());
        assert!(non_empty_dir.exists());
    }

    #[test]
    fn test_zip_entry_name() {
        assert_eq!(zip_entry_name(Path::new("a/x.bin")), "a/x.bin");
        assert_eq!(zip_entry_name(Path::new("x.bin")), "x.bin");
    }
}
