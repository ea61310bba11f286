//! List command for known extensions

use std::path::Path;

use colored::Colorize;
use serde_json::Value;
use xsteps_extensions::ExtensionRegistry;
use xsteps_extensions::config::{INSTALLED, PACKAGE_REFERENCE};
use xsteps_fs::{ConfigMap, ConfigStore, NormalizedPath, WorkspacePath};

use crate::error::Result;

/// Run the list command
///
/// Reads configs that already exist but never creates one.
pub fn run_list(workspace: &Path) -> Result<()> {
    let registry = ExtensionRegistry::with_known();
    let store = ConfigStore::new();

    println!("{}", "Known Extensions".bold());
    println!();

    for entry in registry.entries() {
        let config_file = NormalizedPath::new(workspace)
            .join(&entry.name)
            .join(WorkspacePath::ConfigFile.as_str());
        let config = if config_file.is_file() {
            Some(store.load_map(&config_file)?)
        } else {
            None
        };

        let (reference, state) = describe(config.as_ref(), &entry.default_reference);
        println!(
            "  {:<10} {:<16} {} ({})",
            entry.name.green(),
            reference,
            state,
            entry.description.dimmed()
        );
    }

    println!();
    println!(
        "{} {} extensions known. Use {} to install one.",
        "Total:".dimmed(),
        registry.len(),
        "xsteps <name> install".cyan()
    );

    Ok(())
}

fn describe(config: Option<&ConfigMap>, default_reference: &str) -> (String, String) {
    let Some(config) = config else {
        return (default_reference.to_string(), "not configured".to_string());
    };

    let reference = config
        .get(PACKAGE_REFERENCE)
        .and_then(Value::as_str)
        .unwrap_or(default_reference)
        .to_string();
    let installed = config.get(INSTALLED).and_then(Value::as_bool) == Some(true);
    let state = if installed { "installed" } else { "configured" };
    (reference, state.to_string())
}
