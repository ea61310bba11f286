//! Environment manifests produced by installed tools.
//!
//! A manifest is a list of `NAME=value` lines. A value containing the
//! [`PREPEND_MARKER`] prepends its left-hand fragment to the variable named
//! after the marker, for example `PATH="/opt/cmake/bin":$env:PATH`.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use xsteps_fs::NormalizedPath;

use crate::error::{Error, Result};

/// Marker that turns an assignment into a prepend onto an existing variable.
pub const PREPEND_MARKER: &str = ":$env:";

/// Separator between entries of PATH-like variables on this platform.
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Read and write access to a set of environment variables.
///
/// Values are OS strings: a variable that is not valid UTF-8 is still a
/// value to prepend to, not an unset one.
pub trait Environment {
    fn var(&self, name: &str) -> Option<OsString>;
    fn set_var(&mut self, name: &str, value: &OsStr);
}

/// The environment of the current process.
///
/// Changes are process-wide and stay in effect for the rest of the
/// process's life; child processes inherit them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn set_var(&mut self, name: &str, value: &OsStr) {
        // SAFETY: xsteps runs single-threaded; no other thread reads or
        // writes the environment while the manifest is applied. Names and
        // values are free of NUL bytes, which `EnvironmentManifest::parse`
        // rejects.
        unsafe { std::env::set_var(name, value) };
    }
}

/// An in-memory environment, for callers that must not touch the process.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnvironment {
    vars: BTreeMap<String, OsString>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vars(&self) -> &BTreeMap<String, OsString> {
        &self.vars
    }
}

impl<K: Into<String>, V: Into<OsString>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<OsString> {
        self.vars.get(name).cloned()
    }

    fn set_var(&mut self, name: &str, value: &OsStr) {
        self.vars.insert(name.to_string(), value.to_os_string());
    }
}

/// One parsed manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// `NAME=value`: set the variable verbatim.
    Set { name: String, value: String },
    /// `NAME=segment:$env:OTHER`: set `NAME` to `segment` followed by the
    /// current value of `OTHER`.
    Prepend {
        name: String,
        segment: String,
        referenced: String,
    },
}

impl ManifestEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Set { name, .. } | Self::Prepend { name, .. } => name,
        }
    }
}

/// A parsed environment manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentManifest {
    entries: Vec<ManifestEntry>,
}

impl EnvironmentManifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let native = path.to_native();
        let content = std::fs::read_to_string(&native).map_err(|source| Error::ManifestRead {
            path: native.clone(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse manifest `content`; `path` only names the source in errors.
    ///
    /// Each line is split on its first `=`. Blank lines are skipped. A NUL
    /// byte anywhere in a line makes it malformed, since no environment
    /// variable can hold one.
    pub fn parse(path: &NormalizedPath, content: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let malformed = || Error::ManifestMalformed {
                path: path.to_native(),
                line: idx + 1,
                content: line.to_string(),
            };

            if line.contains('\0') {
                return Err(malformed());
            }

            let (name, value) = line.split_once('=').ok_or_else(malformed)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed());
            }

            let entry = match value.split_once(PREPEND_MARKER) {
                Some((segment, referenced)) => {
                    let referenced = referenced.trim();
                    if referenced.is_empty() {
                        return Err(malformed());
                    }
                    ManifestEntry::Prepend {
                        name: name.to_string(),
                        segment: unquote(segment).to_string(),
                        referenced: referenced.to_string(),
                    }
                }
                None => ManifestEntry::Set {
                    name: name.to_string(),
                    value: unquote(value).to_string(),
                },
            };
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every entry to `env`, in manifest order.
    ///
    /// A prepend reads the referenced variable at the moment it is applied,
    /// so earlier lines of the same manifest are visible to later ones.
    pub fn apply(&self, env: &mut dyn Environment) {
        for entry in &self.entries {
            match entry {
                ManifestEntry::Set { name, value } => {
                    tracing::debug!(variable = %name, "setting environment variable");
                    env.set_var(name, OsStr::new(value));
                }
                ManifestEntry::Prepend {
                    name,
                    segment,
                    referenced,
                } => {
                    let mut value = OsString::from(segment);
                    if let Some(current) = env.var(referenced).filter(|v| !v.is_empty()) {
                        value.push(PATH_LIST_SEPARATOR.to_string());
                        value.push(current);
                    }
                    tracing::debug!(variable = %name, from = %referenced, "prepending to environment variable");
                    env.set_var(name, &value);
                }
            }
        }
    }
}

/// Load the manifest at `path` and apply it to `env`.
///
/// The whole file is parsed before anything is applied, so a malformed
/// manifest leaves `env` unchanged.
pub fn apply(path: &NormalizedPath, env: &mut dyn Environment) -> Result<()> {
    let manifest = EnvironmentManifest::load(path)?;
    tracing::info!(path = %path, variables = manifest.entries().len(), "applying environment manifest");
    manifest.apply(env);
    Ok(())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
