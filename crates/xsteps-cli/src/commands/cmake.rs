//! CMake extension commands

use std::path::Path;

use colored::Colorize;
use serde_json::Value;
use xsteps_extensions::cmake::{self, CmakeExtension};
use xsteps_extensions::{ConanClient, ExtensionHandle, InstallOutcome};
use xsteps_fs::{ConfigMap, ExtensionStore};

use crate::error::{CliError, Result};

/// Open the CMake extension in `workspace`.
///
/// With `local_conan_cache` the Conan cache lives in the workspace root.
fn open(workspace: &Path, local_conan_cache: bool) -> Result<ExtensionHandle<CmakeExtension>> {
    let mut conan = ConanClient::new();
    if local_conan_cache {
        let root = ExtensionStore::root(workspace)?;
        conan = conan.with_user_home(&root.path().to_native())?;
    }
    Ok(ExtensionHandle::open(
        workspace,
        cmake::NAME,
        CmakeExtension::new(conan),
    )?)
}

/// Run `cmake install`
pub fn run_install(workspace: &Path, local_conan_cache: bool, reference: Option<&str>) -> Result<()> {
    let mut handle = open(workspace, local_conan_cache)?;

    match handle.install(reference)? {
        InstallOutcome::Installed { reference } => {
            println!("{} Installed {}", "OK".green().bold(), reference.cyan());
        }
        InstallOutcome::AlreadyInstalled { reference } => {
            println!("{} is already installed.", reference.cyan());
        }
    }
    Ok(())
}

/// Run `cmake execute` and return the exit code of cmake.
///
/// A cmake killed by a signal reports exit code 1.
pub fn run_execute(workspace: &Path, local_conan_cache: bool, args: &[String]) -> Result<i32> {
    let mut handle = open(workspace, local_conan_cache)?;
    let status = handle.execute(args)?;
    Ok(status.code().unwrap_or(1))
}

/// Run `cmake config show`
pub fn run_config_show(workspace: &Path) -> Result<()> {
    let handle = open(workspace, false)?;
    let rendered = serde_yaml::to_string(handle.config())
        .map_err(|e| CliError::user(format!("Could not render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Run `cmake config set`
pub fn run_config_set(workspace: &Path, pairs: &[String], allow_override: bool) -> Result<()> {
    let incoming = parse_pairs(pairs)?;
    let mut handle = open(workspace, false)?;
    handle.update_config(&incoming, allow_override)?;

    for key in incoming.keys() {
        println!("{} {}", "Set".green().bold(), key);
    }
    Ok(())
}

/// Parse `KEY=VALUE` arguments into a config fragment.
fn parse_pairs(pairs: &[String]) -> Result<ConfigMap> {
    let mut incoming = ConfigMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| CliError::user(format!("Invalid entry '{pair}', expected KEY=VALUE")))?;
        incoming.insert(key.trim().to_string(), parse_scalar(value));
    }
    Ok(incoming)
}

/// Read `raw` as a YAML scalar, keeping anything else as a plain string.
fn parse_scalar(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::String(raw.to_string());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value) if !value.is_object() && !value.is_array() && !value.is_null() => value,
        _ => Value::String(raw.to_string()),
    }
}
