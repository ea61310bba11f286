//! Normalized path handling for cross-platform workspace paths

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A workspace path stored with forward slashes on every platform.
///
/// Workspace paths are compared and logged in this form and converted
/// to platform-native form only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Normalize `path`, turning backslashes into forward slashes.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let inner = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner }
    }

    /// The normalized form.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The path in native form, for handing to `std::fs`.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append `segment`. An empty segment yields the path unchanged.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        if self.inner.is_empty() {
            return Self {
                inner: segment.to_string(),
            };
        }
        let inner = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner }
    }

    /// Parent path, or `None` at a root or for a single relative component.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Last component, if any.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Extension of the last component.
    ///
    /// Dotfiles such as `.config.lock` count their leading dot as part of the
    /// name, so only the trailing suffix is returned.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Whether anything exists at this path.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Whether a directory exists at this path.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Whether a regular file exists at this path.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Validate that `value` can be used as a single directory name inside a
/// workspace.
///
/// Extension names become directory names, so anything that could escape
/// the workspace root or address more than one component is rejected.
pub fn validate_path_identifier(value: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidIdentifier {
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    if value.is_empty() {
        return reject("must not be empty");
    }
    if value == "." || value == ".." {
        return reject("must not be a relative path marker");
    }
    if value.contains(['/', '\\']) {
        return reject("must not contain path separators");
    }
    if value.contains('\0') {
        return reject("must not contain NUL bytes");
    }
    if value.trim() != value {
        return reject("must not start or end with whitespace");
    }
    Ok(())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
