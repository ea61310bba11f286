//! Per-extension storage inside a workspace.

use crate::{
    ConfigMap, ConfigStore, NormalizedPath, Result, WorkspacePath, io,
};

/// The directory and config document reserved for one extension.
///
/// Layout: `<workspace>/<name>/config.yaml`. The root store (empty name)
/// addresses the workspace directory itself.
#[derive(Debug, Clone)]
pub struct ExtensionStore {
    name: String,
    workspace: NormalizedPath,
    path: NormalizedPath,
    config_file: NormalizedPath,
    store: ConfigStore,
}

impl ExtensionStore {
    /// Open the store for extension `name`, creating its directory if absent.
    pub fn open(workspace: impl Into<NormalizedPath>, name: &str) -> Result<Self> {
        let workspace = workspace.into();
        let store = ConfigStore::new();
        let path = store.ensure_location(&workspace, name)?;
        Ok(Self::with_path(workspace, name, path, store))
    }

    /// Open the store of the workspace root itself.
    pub fn root(workspace: impl Into<NormalizedPath>) -> Result<Self> {
        let workspace = workspace.into();
        io::ensure_dir(&workspace)?;
        let path = workspace.clone();
        Ok(Self::with_path(workspace, "", path, ConfigStore::new()))
    }

    fn with_path(
        workspace: NormalizedPath,
        name: &str,
        path: NormalizedPath,
        store: ConfigStore,
    ) -> Self {
        let config_file = path.join(WorkspacePath::ConfigFile.as_str());
        Self {
            name: name.to_string(),
            workspace,
            path,
            config_file,
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workspace(&self) -> &NormalizedPath {
        &self.workspace
    }

    /// The extension's directory.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn config_file(&self) -> &NormalizedPath {
        &self.config_file
    }

    /// Path of a file inside the extension's directory.
    pub fn file(&self, file_name: &str) -> NormalizedPath {
        self.path.join(file_name)
    }

    pub fn load_config(&self) -> Result<ConfigMap> {
        self.store.load_map(&self.config_file)
    }

    pub fn save_config(&self, config: &ConfigMap) -> Result<()> {
        self.store.save(&self.config_file, config)
    }

    /// Load the stored config, merge `incoming` into it, and persist the
    /// result. A rejected merge leaves the file untouched.
    pub fn append_config(&self, incoming: &ConfigMap, allow_override: bool) -> Result<ConfigMap> {
        let current = self.load_config()?;
        let merged = ConfigStore::merge_at(&current, incoming, allow_override, &self.config_file)?;
        self.save_config(&merged)?;
        Ok(merged)
    }

    /// Load the stored config, or persist `default` and return it when no
    /// config file exists yet.
    ///
    /// Runs under an exclusive lock on the store's lock file so that two
    /// processes bootstrapping the same fresh workspace agree on one
    /// document. The flag is `true` when the default was written.
    pub fn bootstrap(&self, default: impl FnOnce() -> ConfigMap) -> Result<(ConfigMap, bool)> {
        let lock_path = self.path.join(WorkspacePath::ConfigLock.as_str());
        io::with_exclusive_lock(&lock_path, || match self.load_config() {
            Ok(config) => Ok((config, false)),
            Err(e) if e.is_not_found() => {
                tracing::warn!("Could not find config file: {}", self.config_file);
                let config = default();
                self.save_config(&config)?;
                tracing::info!("Default config file created: {}", self.config_file);
                Ok((config, true))
            }
            Err(e) => Err(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn bootstrap_writes_default_once() {
        let temp = TempDir::new().unwrap();
        let store = ExtensionStore::open(temp.path(), "cmake").unwrap();

        let (first, created) = store
            .bootstrap(|| ConfigMap::from([("run_command".to_string(), json!("cmake"))]))
            .unwrap();
        assert!(created);

        let (second, created) = store
            .bootstrap(|| ConfigMap::from([("run_command".to_string(), json!("other"))]))
            .unwrap();
        assert!(!created);
        assert_eq!(first, second);
    }

    #[test]
    fn root_store_uses_workspace_directory() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join(".xsteps");
        let store = ExtensionStore::root(workspace.as_path()).unwrap();

        assert!(workspace.is_dir());
        assert_eq!(store.path(), &NormalizedPath::new(&workspace));
        assert_eq!(store.name(), "");
    }
}
