//! CMake, installed through a package manager.

use std::path::Path;

use serde_json::Value;
use xsteps_fs::ConfigMap;

use crate::config::{PACKAGE_REFERENCE, RUN_COMMAND};
use crate::error::Result;
use crate::extension::Extension;
use crate::package_manager::{ConanClient, PackageManager};
use crate::reference;

/// Name the CMake extension is stored under.
pub const NAME: &str = "cmake";

/// Package reference installed when none is given.
pub const DEFAULT_REFERENCE: &str = "cmake/3.22.0";

/// Manifest written by the Conan `virtualenv` generator.
pub const ENVIRONMENT_FILE: &str = "environment.ps1.env";

/// The CMake tool integration.
///
/// Installation state is whatever the package manager's local cache says,
/// so a package removed behind xsteps' back is noticed on the next call.
#[derive(Debug, Clone)]
pub struct CmakeExtension<P = ConanClient> {
    package_manager: P,
}

impl<P: PackageManager> CmakeExtension<P> {
    pub fn new(package_manager: P) -> Self {
        Self { package_manager }
    }

    pub fn package_manager(&self) -> &P {
        &self.package_manager
    }
}

impl<P: PackageManager> Extension for CmakeExtension<P> {
    fn default_config(&self) -> ConfigMap {
        ConfigMap::from([
            (
                PACKAGE_REFERENCE.to_string(),
                Value::String(DEFAULT_REFERENCE.to_string()),
            ),
            (RUN_COMMAND.to_string(), Value::String("cmake".to_string())),
        ])
    }

    fn is_valid_reference(&self, reference: &str) -> bool {
        reference::is_valid(reference)
    }

    fn uses_environment_file(&self) -> bool {
        true
    }

    fn environment_file(&self) -> &str {
        ENVIRONMENT_FILE
    }

    fn is_installed(&self, reference: &str, _config: &ConfigMap) -> Result<bool> {
        self.package_manager.is_present_locally(reference)
    }

    fn is_available(&self, reference: &str) -> Result<bool> {
        let id = reference::recipe_id(reference);
        let found = self.package_manager.search(&format!("{id}*"))?;
        Ok(found.iter().any(|candidate| reference::recipe_id(candidate) == id))
    }

    fn install_into(&self, reference: &str, target: &Path) -> Result<()> {
        self.package_manager.install_into(reference, target)
    }

    fn remotes(&self) -> Vec<String> {
        self.package_manager.remotes()
    }
}
