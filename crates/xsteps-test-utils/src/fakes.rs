//! Recording fakes for the collaborators an extension delegates to.
//!
//! Clones share state, so a test can keep one clone for assertions while
//! the extension owns another.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use xsteps_extensions::{CommandRunner, Error, ExitStatus, PackageManager, Result};

#[derive(Debug, Default)]
struct PackageState {
    remote: Vec<String>,
    local: BTreeSet<String>,
    searches: Vec<String>,
    installs: Vec<(String, PathBuf)>,
    manifest: Option<(String, String)>,
    fail_installs: bool,
}

/// In-memory package manager.
///
/// `search` matches remote ids by prefix, treating a trailing `*` in the
/// pattern as a wildcard. A successful install marks the reference as
/// present locally and, if configured, writes a manifest file into the
/// target directory like a real generator would.
#[derive(Debug, Clone, Default)]
pub struct FakePackageManager {
    state: Rc<RefCell<PackageState>>,
}

impl FakePackageManager {
    /// A package manager whose remotes offer `ids`.
    pub fn with_remote<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fake = Self::default();
        fake.state.borrow_mut().remote = ids.into_iter().map(Into::into).collect();
        fake
    }

    /// Write `content` to `file_name` in the target directory on install.
    pub fn writing_manifest(self, file_name: &str, content: &str) -> Self {
        self.state.borrow_mut().manifest = Some((file_name.to_string(), content.to_string()));
        self
    }

    /// Make every install fail.
    pub fn failing_installs(self) -> Self {
        self.state.borrow_mut().fail_installs = true;
        self
    }

    /// Mark `reference` as present in the local cache.
    pub fn mark_installed(&self, reference: &str) {
        self.state.borrow_mut().local.insert(reference.to_string());
    }

    /// Remove `reference` from the local cache.
    pub fn remove_installed(&self, reference: &str) {
        self.state.borrow_mut().local.remove(reference);
    }

    /// Patterns passed to `search`, in call order.
    pub fn searches(&self) -> Vec<String> {
        self.state.borrow().searches.clone()
    }

    /// References and target directories passed to `install_into`.
    pub fn installs(&self) -> Vec<(String, PathBuf)> {
        self.state.borrow().installs.clone()
    }
}

impl PackageManager for FakePackageManager {
    fn search(&self, pattern: &str) -> Result<Vec<String>> {
        let mut state = self.state.borrow_mut();
        state.searches.push(pattern.to_string());
        let found = match pattern.strip_suffix('*') {
            Some(prefix) => state
                .remote
                .iter()
                .filter(|id| id.starts_with(prefix))
                .cloned()
                .collect(),
            None => state.remote.iter().filter(|id| *id == pattern).cloned().collect(),
        };
        Ok(found)
    }

    fn is_present_locally(&self, reference: &str) -> Result<bool> {
        Ok(self.state.borrow().local.contains(reference))
    }

    fn install_into(&self, reference: &str, target_dir: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state
            .installs
            .push((reference.to_string(), target_dir.to_path_buf()));

        if state.fail_installs {
            return Err(Error::InstallFailed {
                reference: reference.to_string(),
                exit_code: Some(1),
            });
        }

        if let Some((file_name, content)) = &state.manifest {
            fs::write(target_dir.join(file_name), content).unwrap();
        }
        state.local.insert(reference.to_string());
        Ok(())
    }

    fn remotes(&self) -> Vec<String> {
        vec!["fake-remote".to_string()]
    }
}

/// Command runner that records command lines instead of running them.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    commands: Rc<RefCell<Vec<Vec<String>>>>,
    exit_code: i32,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::with_exit_code(0)
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that reports `code` for every command.
    pub fn with_exit_code(code: i32) -> Self {
        Self {
            commands: Rc::default(),
            exit_code: code,
        }
    }

    /// Command lines dispatched so far.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &[String]) -> Result<ExitStatus> {
        self.commands.borrow_mut().push(command.to_vec());
        Ok(ExitStatus::from_code(self.exit_code))
    }
}
