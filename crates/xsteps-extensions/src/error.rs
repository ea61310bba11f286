use std::path::PathBuf;

/// Errors that can occur in the extension system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config or workspace storage failure, including corrupt config files.
    #[error(transparent)]
    Fs(#[from] xsteps_fs::Error),

    /// Package reference does not match the extension's reference syntax.
    #[error("invalid package reference '{reference}' for extension '{extension}'")]
    InvalidReference { extension: String, reference: String },

    /// Package reference could not be found in any configured remote.
    #[error("package '{reference}' could not be found in remotes: {remotes}")]
    PackageNotFound { reference: String, remotes: String },

    /// Extension has to be installed before it can be executed.
    #[error("extension '{name}' is not installed. Run \"install\" command first.")]
    NotInstalled { name: String },

    /// A required key is missing from the extension config, or has the wrong type.
    #[error("config for extension '{name}' has no valid '{key}' entry")]
    MissingConfigKey { name: String, key: String },

    /// Environment manifest line without a `NAME=value` pair.
    #[error("malformed environment manifest {path} at line {line}: {content:?}")]
    ManifestMalformed {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// Environment manifest could not be read.
    #[error("failed to read environment manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Package manager executable is not on PATH.
    #[error("required tool '{tool}' not found on PATH{}", .hint.as_deref().unwrap_or(""))]
    PackageManagerNotFound { tool: String, hint: Option<String> },

    /// Delegated install reported failure.
    #[error("installing '{reference}' failed{}", .exit_code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    InstallFailed {
        reference: String,
        exit_code: Option<i32>,
    },

    /// A package manager command exited with an unexpected status.
    #[error("command `{command}` failed{}", .exit_code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    /// Command could not be started at all.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Command line to dispatch was empty.
    #[error("refusing to dispatch an empty command line")]
    EmptyCommand,
}

pub type Result<T> = std::result::Result<T, Error>;
