//! Empty backup directory pruning
//!
//! The Cleaner walks the backups root deepest-first and removes every
//! directory that is empty at visit time. Children are evaluated before
//! their parent, so a parent that becomes empty only once its empty children
//! are gone is itself detected and removed in the same pass.
//!
//! This operation is strictly best-effort housekeeping: a missing backups
//! root is a silent no-op, and any filesystem error is logged and swallowed.
//! It never fails its caller.

use crate::config::BackupConfig;
use crate::utils;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Delete empty directories within the backups root
///
/// Files and non-empty directories are left untouched; the backups root
/// itself is never removed. Returns the number of directories removed.
pub fn prune_empty_dirs(config: &BackupConfig) -> usize {
    if !config.backups_root.exists() {
        return 0;
    }

    let mut removed = 0usize;
    let walker = WalkDir::new(&config.backups_root)
        .contents_first(true)
        .min_depth(1);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking backup directories: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        match utils::remove_dir_if_empty(entry.path()) {
            Ok(true) => {
                info!(
                    "Deleted empty backup directory: {}",
                    config.display_relative(entry.path())
                );
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    "Error deleting empty backup directory {:?}: {}",
                    entry.path(),
                    e
                );
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir) -> BackupConfig {
        BackupConfig::builder()
            .backups_root(temp.path().join("backups"))
            .archives_root(temp.path().join("archives"))
            .build(temp.path())
    }

    #[test]
    fn test_missing_root_is_silent_noop() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        assert_eq!(prune_empty_dirs(&config), 0);
    }

    #[test]
    fn test_non_empty_dirs_survive() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        let year_dir = config.backups_root.join("2024");
        fs::create_dir_all(year_dir.join("empty_sub")).unwrap();
        fs::write(year_dir.join("data.bin"), b"data").unwrap();

        let removed = prune_empty_dirs(&config);

        assert_eq!(removed, 1);
        assert!(!year_dir.join("empty_sub").exists());
        assert!(year_dir.is_dir());
        assert!(year_dir.join("data.bin").is_file());
    }

    #[test]
    fn test_parent_emptied_by_children_is_removed() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        fs::create_dir_all(config.backups_root.join("a/b/c")).unwrap();

        let removed = prune_empty_dirs(&config);

        assert_eq!(removed, 3);
        assert!(!config.backups_root.join("a").exists());
        // the root itself is never pruned
        assert!(config.backups_root.is_dir());
    }

    #[test]
    fn test_files_are_untouched() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        fs::create_dir_all(&config.backups_root).unwrap();
        fs::write(config.backups_root.join("stray.bin"), b"stray").unwrap();

        assert_eq!(prune_empty_dirs(&config), 0);
        assert!(config.backups_root.join("stray.bin").is_file());
    }
}
