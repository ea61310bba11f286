//! The extension contract and the lifecycle shared by every extension.
//!
//! An [`Extension`] supplies the variant-specific pieces: its default
//! config, its reference syntax, and how it talks to a package manager.
//! [`ExtensionHandle`] drives the lifecycle on top of it: bootstrap the
//! config on open, install idempotently, and execute the installed tool.

use std::path::Path;

use serde_json::Value;
use xsteps_fs::{ConfigMap, ConfigStore, ExtensionStore, NormalizedPath};

use crate::config::{self, INSTALLED, PACKAGE_REFERENCE, RUN_COMMAND, USES_ENVIRONMENT_FILE};
use crate::environment::{self, Environment, ProcessEnvironment};
use crate::error::{Error, Result};
use crate::process::{CommandRunner, ExitStatus, SystemRunner};

/// Variant-specific behavior of a tool integration.
pub trait Extension {
    /// Config persisted when the extension is opened in a workspace that has
    /// no config for it yet. Must not perform I/O.
    fn default_config(&self) -> ConfigMap;

    /// Whether `reference` follows this extension's reference syntax.
    fn is_valid_reference(&self, reference: &str) -> bool;

    /// Whether the installed tool ships an environment manifest that has to
    /// be applied before it runs.
    fn uses_environment_file(&self) -> bool {
        false
    }

    /// File name of the environment manifest inside the extension directory.
    fn environment_file(&self) -> &str {
        "environment.env"
    }

    /// Whether `reference` is installed. Read-only and idempotent.
    ///
    /// The default trusts the `installed` flag recorded for the configured
    /// reference.
    fn is_installed(&self, reference: &str, config: &ConfigMap) -> Result<bool> {
        let recorded = config.get(PACKAGE_REFERENCE).and_then(Value::as_str);
        Ok(config::flag(config, INSTALLED) && recorded == Some(reference))
    }

    /// Whether `reference` can be found in the package sources.
    fn is_available(&self, reference: &str) -> Result<bool>;

    /// Install `reference` into the extension directory `target`.
    fn install_into(&self, reference: &str, target: &Path) -> Result<()>;

    /// Package sources searched by [`Extension::is_available`], for messages.
    fn remotes(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Lifecycle state of an opened extension.
///
/// Opening an extension is the transition out of the uninitialized state,
/// so a handle is always at least configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionState {
    /// Config exists on disk; the tool has not been installed by this workspace.
    Configured,
    /// A successful install has been recorded in the config.
    Installed,
}

/// Result of [`ExtensionHandle::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The package was installed and the config updated.
    Installed { reference: String },
    /// The package was already installed; nothing was changed.
    AlreadyInstalled { reference: String },
}

impl InstallOutcome {
    pub fn reference(&self) -> &str {
        match self {
            Self::Installed { reference } | Self::AlreadyInstalled { reference } => reference,
        }
    }
}

/// An extension opened in a workspace.
///
/// Holds the in-memory copy of the extension's config. Every mutation is
/// written to disk before it replaces the in-memory copy, so the two never
/// diverge.
pub struct ExtensionHandle<E> {
    name: String,
    store: ExtensionStore,
    config: ConfigMap,
    state: ExtensionState,
    extension: E,
    environment: Box<dyn Environment>,
    runner: Box<dyn CommandRunner>,
}

impl<E: Extension> ExtensionHandle<E> {
    /// Open extension `name` under `workspace`.
    ///
    /// Creates the extension directory if needed and loads its config. When
    /// no config file exists, the extension's default config is persisted
    /// and used. A corrupt config file is an error.
    pub fn open(workspace: impl Into<NormalizedPath>, name: &str, extension: E) -> Result<Self> {
        let store = ExtensionStore::open(workspace, name)?;
        let (config, created) = store.bootstrap(|| extension.default_config())?;

        let state = if config::flag(&config, INSTALLED) {
            ExtensionState::Installed
        } else {
            ExtensionState::Configured
        };
        tracing::debug!(extension = name, ?state, bootstrapped = created, "opened extension");

        Ok(Self {
            name: name.to_string(),
            store,
            config,
            state,
            extension,
            environment: Box::new(ProcessEnvironment),
            runner: Box::new(SystemRunner),
        })
    }

    /// Apply environment manifests to `environment` instead of the process.
    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Dispatch commands through `runner` instead of spawning processes.
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn state(&self) -> ExtensionState {
        self.state
    }

    pub fn store(&self) -> &ExtensionStore {
        &self.store
    }

    pub fn extension(&self) -> &E {
        &self.extension
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    /// The package reference recorded in the config.
    pub fn package_reference(&self) -> Result<&str> {
        config::require_str(&self.config, &self.name, PACKAGE_REFERENCE)
    }

    /// Whether `reference`, or the configured reference when `None`, is installed.
    pub fn is_installed(&self, reference: Option<&str>) -> Result<bool> {
        let reference = match reference {
            Some(reference) => reference,
            None => self.package_reference()?,
        };
        self.extension.is_installed(reference, &self.config)
    }

    /// Install `reference`, or the configured reference when `None`.
    ///
    /// Installing something that is already installed is a no-op reported as
    /// [`InstallOutcome::AlreadyInstalled`]. The config is only updated once
    /// the package manager reports success.
    pub fn install(&mut self, reference: Option<&str>) -> Result<InstallOutcome> {
        let reference = match reference {
            Some(reference) => reference.to_string(),
            None => self.package_reference()?.to_string(),
        };

        if !self.extension.is_valid_reference(&reference) {
            return Err(Error::InvalidReference {
                extension: self.name.clone(),
                reference,
            });
        }

        if self.extension.is_installed(&reference, &self.config)? {
            tracing::warn!("{} already installed ({})", self.name, reference);
            return Ok(InstallOutcome::AlreadyInstalled { reference });
        }

        if !self.extension.is_available(&reference)? {
            return Err(Error::PackageNotFound {
                reference,
                remotes: self.extension.remotes().join(", "),
            });
        }

        tracing::info!(extension = %self.name, %reference, "installing package");
        self.extension
            .install_into(&reference, &self.store.path().to_native())?;

        let mut updates = ConfigMap::from([
            (INSTALLED.to_string(), Value::Bool(true)),
            (PACKAGE_REFERENCE.to_string(), Value::String(reference.clone())),
            (
                USES_ENVIRONMENT_FILE.to_string(),
                Value::Bool(self.extension.uses_environment_file()),
            ),
        ]);
        if config::require_str(&self.config, &self.name, RUN_COMMAND).is_err() {
            if let Some(run_command) = self.extension.default_config().remove(RUN_COMMAND) {
                updates.insert(RUN_COMMAND.to_string(), run_command);
            }
        }

        let merged = ConfigStore::merge_at(&self.config, &updates, true, self.store.config_file())?;
        self.commit(merged)?;
        self.state = ExtensionState::Installed;
        tracing::info!(extension = %self.name, %reference, "installed");

        Ok(InstallOutcome::Installed { reference })
    }

    /// Run the installed tool with `args` and report its exit status.
    ///
    /// Installation is re-checked on every call, even when this handle has
    /// recorded an install, so changes made by other processes are noticed.
    pub fn execute(&mut self, args: &[String]) -> Result<ExitStatus> {
        let reference = self.package_reference()?.to_string();
        if !self.extension.is_installed(&reference, &self.config)? {
            return Err(Error::NotInstalled {
                name: self.name.clone(),
            });
        }

        if config::flag(&self.config, USES_ENVIRONMENT_FILE) {
            let manifest = self.store.file(self.extension.environment_file());
            environment::apply(&manifest, self.environment.as_mut())?;
        }

        let run_command = config::require_str(&self.config, &self.name, RUN_COMMAND)?;
        let command: Vec<String> = std::iter::once(run_command.to_string())
            .chain(args.iter().cloned())
            .collect();

        tracing::info!("Executing {} command: {:?}", self.name, command);
        let status = self.runner.run(&command)?;
        tracing::debug!(extension = %self.name, code = ?status.code(), "command finished");
        Ok(status)
    }

    /// Merge `incoming` into the stored config and persist it.
    ///
    /// The merge runs against the file on disk, so keys written by another
    /// process since this handle was opened take part in collision checks.
    /// Without `allow_override` any key that already exists rejects the
    /// whole update, leaving both the file and the in-memory config as they
    /// were.
    pub fn update_config(&mut self, incoming: &ConfigMap, allow_override: bool) -> Result<()> {
        self.config = self.store.append_config(incoming, allow_override)?;
        if config::flag(&self.config, INSTALLED) {
            self.state = ExtensionState::Installed;
        }
        Ok(())
    }

    fn commit(&mut self, config: ConfigMap) -> Result<()> {
        self.store.save_config(&config)?;
        self.config = config;
        Ok(())
    }
}
