//! Package-manager collaborators that resolve and install tool packages.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::{Error, Result};
use crate::process::check_binary_on_path;
use crate::reference;

/// The operations an extension needs from a package manager.
///
/// Resolution, dependency handling, and remote protocols all live behind
/// this boundary.
pub trait PackageManager {
    /// Package ids available in the configured remotes that match `pattern`.
    fn search(&self, pattern: &str) -> Result<Vec<String>>;

    /// Whether `reference` is already present in the local package cache.
    fn is_present_locally(&self, reference: &str) -> Result<bool>;

    /// Install `reference` into `target_dir`. Fails if it cannot be resolved.
    fn install_into(&self, reference: &str, target_dir: &Path) -> Result<()>;

    /// Names of the remotes searched, for diagnostics.
    fn remotes(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Default remote searched by [`ConanClient`].
pub const CONAN_CENTER: &str = "conancenter";

/// Drives the Conan 1.x command line.
///
/// Installs use the `virtualenv` generator, which writes the environment
/// manifest next to the install folder.
#[derive(Debug, Clone)]
pub struct ConanClient {
    program: String,
    remotes: Vec<String>,
    user_home: Option<PathBuf>,
}

impl Default for ConanClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ConanClient {
    pub fn new() -> Self {
        Self {
            program: "conan".to_string(),
            remotes: vec![CONAN_CENTER.to_string()],
            user_home: None,
        }
    }

    /// Use a different executable than `conan` from PATH.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_remotes(mut self, remotes: Vec<String>) -> Self {
        self.remotes = remotes;
        self
    }

    /// Keep Conan's cache under `home` instead of the user's home directory.
    ///
    /// Passed as `CONAN_USER_HOME` to every Conan invocation. The path is
    /// canonicalized, so it must exist.
    pub fn with_user_home(mut self, home: &Path) -> Result<Self> {
        let home = dunce::canonicalize(home).map_err(|e| xsteps_fs::Error::io(home, e))?;
        tracing::debug!(home = %home.display(), "using isolated conan cache");
        self.user_home = Some(home);
        Ok(self)
    }

    pub fn user_home(&self) -> Option<&Path> {
        self.user_home.as_deref()
    }

    fn command(&self, args: &[&str]) -> Result<Command> {
        let program = if Path::new(&self.program).components().count() > 1 {
            PathBuf::from(&self.program)
        } else {
            check_binary_on_path(&self.program)?
        };

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(home) = &self.user_home {
            cmd.env("CONAN_USER_HOME", home);
        }
        tracing::debug!(command = %self.describe(args), "running conan");
        Ok(cmd)
    }

    fn describe(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        self.command(args)?
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

/// Recipe ids from `conan search --raw` output.
///
/// Only lines shaped like a reference are kept; banners and warnings are
/// dropped.
fn parse_search_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('/') && reference::is_valid(line))
        .map(str::to_string)
        .collect()
}

impl PackageManager for ConanClient {
    fn search(&self, pattern: &str) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for remote in &self.remotes {
            let output = self.output(&["search", pattern, "-r", remote, "--raw"])?;
            if !output.status.success() {
                tracing::debug!(
                    "Could not find any package matching pattern: {} in remote: {}.",
                    pattern,
                    remote
                );
                continue;
            }
            found.extend(parse_search_output(&String::from_utf8_lossy(&output.stdout)));
        }
        Ok(found)
    }

    fn is_present_locally(&self, reference: &str) -> Result<bool> {
        let qualified = reference::qualified(reference);
        let output = self.output(&["search", &qualified])?;
        Ok(output.status.success())
    }

    fn install_into(&self, reference: &str, target_dir: &Path) -> Result<()> {
        let qualified = reference::qualified(reference);
        let target = target_dir.to_string_lossy();
        let args = ["install", qualified.as_str(), "-g", "virtualenv", "-if", &*target];

        let status = self
            .command(&args)?
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::InstallFailed {
                reference: reference.to_string(),
                exit_code: status.code(),
            });
        }
        Ok(())
    }

    fn remotes(&self) -> Vec<String> {
        self.remotes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_output_keeps_references() {
        let stdout = "Existing package recipes:\n\ncmake/3.21.7\ncmake/3.22.0\n\nWARN: something\n";
        assert_eq!(
            parse_search_output(stdout),
            vec!["cmake/3.21.7".to_string(), "cmake/3.22.0".to_string()]
        );
    }

    #[test]
    fn test_default_remote_is_conancenter() {
        let client = ConanClient::new();
        assert_eq!(client.remotes(), vec![CONAN_CENTER.to_string()]);
        assert!(client.user_home().is_none());
    }

    #[test]
    fn test_user_home_is_canonicalized() {
        let temp = tempfile::TempDir::new().unwrap();
        let nested = temp.path().join("ws");
        std::fs::create_dir(&nested).unwrap();

        let client = ConanClient::new()
            .with_user_home(&nested.join("..").join("ws"))
            .unwrap();
        assert_eq!(
            client.user_home().unwrap(),
            dunce::canonicalize(&nested).unwrap()
        );
    }

    #[test]
    fn test_missing_binary_reports_package_manager_not_found() {
        let client = ConanClient::new().with_program("nonexistent_conan_xyz_12345");
        let err = client.search("cmake/3.22.0*").unwrap_err();
        assert!(
            matches!(err, Error::PackageManagerNotFound { ref tool, .. } if tool == "nonexistent_conan_xyz_12345"),
            "got: {err:?}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_search_skips_remote_without_match() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("fake-conan");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$4\" = \"good\" ]; then echo cmake/3.22.0; exit 0; fi\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let client = ConanClient::new()
            .with_program(script.to_string_lossy().into_owned())
            .with_remotes(vec!["bad".to_string(), "good".to_string()]);

        assert_eq!(client.search("cmake/3.22.0*").unwrap(), vec!["cmake/3.22.0"]);
    }
}
