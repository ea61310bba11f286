//! Extension system for xsteps.
//!
//! An extension is a tool integration with its own directory and config
//! inside an xsteps workspace. This crate defines the [`Extension`]
//! contract, the lifecycle every extension goes through
//! ([`ExtensionHandle`]), the collaborators it delegates to (package
//! manager, process runner, environment), and the built-in CMake
//! integration.

pub mod cmake;
pub mod config;
pub mod environment;
pub mod error;
pub mod extension;
pub mod package_manager;
pub mod process;
pub mod reference;
pub mod registry;

pub use cmake::CmakeExtension;
pub use environment::{Environment, EnvironmentManifest, MapEnvironment, ProcessEnvironment};
pub use error::{Error, Result};
pub use extension::{Extension, ExtensionHandle, ExtensionState, InstallOutcome};
pub use package_manager::{ConanClient, PackageManager};
pub use process::{CommandRunner, ExitStatus, SystemRunner};
pub use registry::{ExtensionEntry, ExtensionRegistry};
