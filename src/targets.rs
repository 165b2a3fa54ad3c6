//! Build-orchestrator target registry
//!
//! The three operations are exposed as named, externally invocable targets:
//! `{name, title, description, group, action}` records that a build
//! orchestrator (or the bundled CLI) can enumerate and dispatch by name.
//! Targets hold no state; every action is a plain function over the shared
//! [`BackupConfig`].

use crate::config::BackupConfig;
use crate::error::{EepvaultError, Result};
use crate::{archive, clean, prepare};
use chrono::Local;
use tracing::info;

/// A named, externally invocable unit of work
pub struct Target {
    /// Invocation name used for dispatch
    pub name: &'static str,
    /// Short human-readable title
    pub title: &'static str,
    /// One-line description of what the target does
    pub description: &'static str,
    /// Grouping label for orchestrator menus
    pub group: &'static str,
    /// The operation itself
    pub action: fn(&BackupConfig) -> Result<()>,
}

/// All registered targets
pub const TARGETS: &[Target] = &[
    Target {
        name: "backup",
        title: "Backup EEPROM",
        description: "Prepares a timestamped backup directory and the EEPROM read command.",
        group: "Platform",
        action: run_backup,
    },
    Target {
        name: "archive",
        title: "Archive EEPROM Backups",
        description: "Archives all EEPROM backups into a single ZIP file.",
        group: "General",
        action: run_archive,
    },
    Target {
        name: "clean",
        title: "Clean EEPROM Backups",
        description: "Deletes empty EEPROM backup directories.",
        group: "General",
        action: run_clean,
    },
];

/// Return the full target registry
pub fn registry() -> &'static [Target] {
    TARGETS
}

/// Look up a target by name
pub fn find(name: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|t| t.name == name)
}

/// Dispatch a target by name
///
/// # Errors
///
/// Returns [`EepvaultError::InvalidConfiguration`] for an unknown target
/// name, otherwise whatever the target action returns.
pub fn run(name: &str, config: &BackupConfig) -> Result<()> {
    let target = find(name)
        .ok_or_else(|| EepvaultError::config(format!("Unknown target: {}", name)))?;
    info!("Running target: {}", target.name);
    (target.action)(config)
}

fn run_backup(config: &BackupConfig) -> Result<()> {
    let prepared = prepare::prepare_backup(config, Local::now())?;
    info!("EEPROM read command: {}", prepared.read_command);
    Ok(())
}

fn run_archive(config: &BackupConfig) -> Result<()> {
    archive::archive_backups(config, Local::now())?;
    Ok(())
}

fn run_clean(config: &BackupConfig) -> Result<()> {
    clean::prune_empty_dirs(config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir) -> BackupConfig {
        BackupConfig::builder()
            .backups_root(temp.path().join("backups"))
            .archives_root(temp.path().join("archives"))
            .build(temp.path())
    }

    #[test]
    fn test_registry_names() {
        let names: Vec<&str> = registry().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["backup", "archive", "clean"]);
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        assert!(run("upload", &config).is_err());
    }

    #[test]
    fn test_run_backup_by_name() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);

        run("backup", &config).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&config.backups_root)
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_run_archive_and_clean_by_name() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp);
        std::fs::create_dir_all(config.backups_root.join("empty")).unwrap();

        run("archive", &config).unwrap();
        assert!(!config.backups_root.join("empty").exists());

        // clean on the now-empty root is a no-op that must not fail
        run("clean", &config).unwrap();
    }
}
