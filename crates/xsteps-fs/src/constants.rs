//! Well-known names inside an xsteps workspace.

use std::path::Path;

/// Standard workspace filesystem entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspacePath {
    /// The default workspace root, relative to the current directory
    DefaultRoot,
    /// The per-extension config document
    ConfigFile,
    /// Advisory lock guarding config bootstrap
    ConfigLock,
}

impl WorkspacePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultRoot => ".xsteps",
            Self::ConfigFile => "config.yaml",
            Self::ConfigLock => ".config.lock",
        }
    }
}

impl AsRef<Path> for WorkspacePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WorkspacePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
