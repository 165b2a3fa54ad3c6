use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn eepvault(args: &[&str]) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--bin", "eepvault", "--"]);
    cmd.args(args);
    cmd
}

#[test]
fn test_cli_backup_json() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().to_str().unwrap();

    let output = eepvault(&["--project-root", path, "backup", "--json"])
        .output()
        .expect("Failed to run backup");
    assert!(output.status.success(), "CLI backup failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let prepared: serde_json::Value =
        serde_json::from_str(&stdout).expect("backup --json did not emit valid JSON");

    let backup_dir = prepared["backup_dir"].as_str().unwrap();
    assert!(std::path::Path::new(backup_dir).is_dir());
    let read_command = prepared["read_command"].as_str().unwrap();
    assert!(read_command.contains("-U eeprom:r:"), "Unexpected command: {}", read_command);
}

#[test]
fn test_cli_archive_and_clean() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().to_str().unwrap();

    // Seed a backup as the uploader would have left it
    let backups = tmp.path().join("uirb/data/eeprom/backups/20240101_120000");
    fs::create_dir_all(&backups).unwrap();
    fs::write(backups.join("eeprom.bin"), b"dump").unwrap();

    let status = eepvault(&["--project-root", path, "archive"])
        .status()
        .expect("Failed to run archive");
    assert!(status.success(), "CLI archive failed");

    let archives_root = tmp.path().join("uirb/data/eeprom/backup_archives");
    let archives: Vec<_> = fs::read_dir(&archives_root)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(archives.len(), 1, "Expected exactly one archive");
    assert!(archives[0].path().extension().unwrap() == "zip");
    assert!(!backups.exists(), "Backups were not deleted after archiving");

    let status = eepvault(&["--project-root", path, "clean"])
        .status()
        .expect("Failed to run clean");
    assert!(status.success(), "CLI clean failed");
}

#[test]
fn test_cli_project_root_from_env() {
    let tmp = TempDir::new().unwrap();

    let output = eepvault(&["backup", "--json"])
        .env("PROJECT_DIR", tmp.path())
        .output()
        .expect("Failed to run backup");
    assert!(output.status.success(), "CLI backup via PROJECT_DIR failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let prepared: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let bin_path = prepared["bin_path"].as_str().unwrap();
    assert!(bin_path.starts_with(tmp.path().to_str().unwrap()));
}

#[test]
fn test_cli_targets_listing() {
    let output = eepvault(&["targets"])
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run targets");
    assert!(output.status.success(), "CLI targets failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["backup", "archive", "clean"] {
        assert!(stdout.contains(name), "Missing target {} in: {}", name, stdout);
    }
}
