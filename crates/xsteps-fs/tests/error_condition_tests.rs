//! Tests for error handling under adverse filesystem conditions

use tempfile::tempdir;
use xsteps_fs::{NormalizedPath, io};

#[test]
fn read_text_nonexistent_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("does_not_exist.txt"));

    assert!(io::read_text(&path).is_err());
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;
    use xsteps_fs::{ConfigMap, ConfigStore};

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn failed_save_preserves_original_document() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("cmake");
        fs::create_dir(&parent).unwrap();

        let file_path = parent.join("config.yaml");
        fs::write(&file_path, "run_command: cmake\n").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = ConfigStore::new().save(&NormalizedPath::new(&file_path), &ConfigMap::new());

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));

        assert!(result.is_err(), "save into a read-only directory should fail");
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "run_command: cmake\n",
            "original content must survive a failed save"
        );
    }

    #[test]
    fn unreadable_config_is_io_error_not_missing() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        fs::write(&file_path, "run_command: cmake\n").unwrap();
        fs::set_permissions(&file_path, Permissions::from_mode(0o000)).unwrap();

        let result = ConfigStore::new().load_map(&NormalizedPath::new(&file_path));

        let _ = fs::set_permissions(&file_path, Permissions::from_mode(0o644));

        let err = result.unwrap_err();
        assert!(!err.is_not_found(), "permission errors must not trigger bootstrap");
    }
}
