//! Well-known keys of an extension config document and typed accessors.

use serde_json::Value;
use xsteps_fs::ConfigMap;

use crate::error::{Error, Result};

/// Package reference handed to the package manager on install.
pub const PACKAGE_REFERENCE: &str = "package_reference";
/// Executable that `execute` dispatches to.
pub const RUN_COMMAND: &str = "run_command";
/// Whether `execute` loads the environment manifest first.
pub const USES_ENVIRONMENT_FILE: &str = "uses_environment_file";
/// Explicit installation flag, set after a successful install.
pub const INSTALLED: &str = "installed";

/// Read a string entry, failing with [`Error::MissingConfigKey`] when the
/// key is absent or not a non-empty string.
pub fn require_str<'a>(config: &'a ConfigMap, name: &str, key: &str) -> Result<&'a str> {
    config
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MissingConfigKey {
            name: name.to_string(),
            key: key.to_string(),
        })
}

/// Read a boolean flag. Absent or non-boolean values count as `false`.
pub fn flag(config: &ConfigMap, key: &str) -> bool {
    config.get(key).and_then(Value::as_bool).unwrap_or(false)
}
