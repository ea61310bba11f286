//! Workspace storage for xsteps
//!
//! Provides per-extension directories under a workspace root, atomic I/O,
//! and the format-agnostic config store every extension persists through.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use config::{ConfigMap, ConfigStore};
pub use constants::WorkspacePath;
pub use error::{Error, Result};
pub use path::{NormalizedPath, validate_path_identifier};
pub use store::ExtensionStore;
