//! Error types for xsteps-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from xsteps-extensions
    #[error(transparent)]
    Extension(#[from] xsteps_extensions::Error),

    /// Error from xsteps-fs
    #[error(transparent)]
    Fs(#[from] xsteps_fs::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
