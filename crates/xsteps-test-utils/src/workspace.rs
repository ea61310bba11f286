//! [`TestWorkspace`] for extension test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xsteps_fs::{ConfigMap, ConfigStore, NormalizedPath, WorkspacePath};

/// A temporary directory holding an xsteps workspace at `<tmp>/.xsteps`.
///
/// # Example
///
/// ```rust,no_run
/// use xsteps_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write_config("cmake", "package_reference: cmake/3.22.0\n");
/// ws.assert_file_contains("cmake/config.yaml", "cmake/3.22.0");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory. The workspace root itself is not
    /// created, so first-access behavior can be tested.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The directory containing the workspace.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The workspace root.
    pub fn root(&self) -> PathBuf {
        self.dir().join(WorkspacePath::DefaultRoot.as_str())
    }

    /// Directory of extension `name`.
    pub fn extension_dir(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Path of extension `name`'s config file.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.extension_dir(name).join(WorkspacePath::ConfigFile.as_str())
    }

    /// Write raw config content for extension `name`.
    pub fn write_config(&self, name: &str, content: &str) {
        let dir = self.extension_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(self.config_path(name), content).unwrap();
    }

    /// Write a file inside extension `name`'s directory.
    pub fn write_extension_file(&self, name: &str, file_name: &str, content: &str) {
        let dir = self.extension_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), content).unwrap();
    }

    /// Read and parse extension `name`'s config.
    ///
    /// # Panics
    /// Panics if the config is missing or unreadable.
    pub fn read_config(&self, name: &str) -> ConfigMap {
        ConfigStore::new()
            .load_map(&NormalizedPath::new(self.config_path(name)))
            .unwrap_or_else(|e| panic!("Could not read config for {name}: {e}"))
    }

    /// Assert that `path` (relative to the workspace root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the workspace root) contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
