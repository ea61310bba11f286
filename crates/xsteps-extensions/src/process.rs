//! Dispatching command lines to external processes.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Final status of a dispatched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a process that ended without an exit code (killed by a signal).
    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs a command line to completion and reports its exit status.
pub trait CommandRunner {
    /// Run `command` (program followed by its arguments).
    ///
    /// The child inherits the current process environment and standard
    /// streams. Its exit status is reported, never interpreted.
    fn run(&self, command: &[String]) -> Result<ExitStatus>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &[String]) -> Result<ExitStatus> {
        let (program, args) = command.split_first().ok_or(Error::EmptyCommand)?;

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        Ok(status.into())
    }
}

/// Verify a binary is on PATH. Returns the resolved path or
/// [`Error::PackageManagerNotFound`].
pub fn check_binary_on_path(tool: &str) -> Result<PathBuf> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let extensions: Vec<String> = if cfg!(windows) {
        std::env::var("PATHEXT")
            .unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string())
            .split(';')
            .map(|s| s.to_ascii_lowercase())
            .collect()
    } else {
        vec![String::new()]
    };

    for dir in std::env::split_paths(&path_var) {
        for ext in &extensions {
            let candidate = dir.join(format!("{tool}{ext}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(Error::PackageManagerNotFound {
        tool: tool.to_string(),
        hint: install_hint(tool).map(str::to_string),
    })
}

pub(crate) fn install_hint(tool: &str) -> Option<&'static str> {
    match tool {
        "conan" => Some("\n  Install: pip install \"conan<2\""),
        "cmake" => Some("\n  Install: xsteps cmake install"),
        _ => None,
    }
}
