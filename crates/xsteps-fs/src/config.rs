//! Format-agnostic configuration loading, saving, and merging

use std::collections::BTreeMap;
use std::io::ErrorKind;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io, path::validate_path_identifier};

/// A flat config document: string keys mapped to scalar or structured values.
pub type ConfigMap = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn detect(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic configuration store.
///
/// Detects the document format from the file extension and owns the on-disk
/// representation of every extension's config.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Return the directory reserved for extension `name` under `workspace`,
    /// creating it if necessary.
    ///
    /// Repeated calls never fail on, or reset, an existing directory.
    pub fn ensure_location(&self, workspace: &NormalizedPath, name: &str) -> Result<NormalizedPath> {
        validate_path_identifier(name)?;
        let location = workspace.join(name);
        io::ensure_dir(&location)?;
        Ok(location)
    }

    /// Load and deserialize the document at `path`.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    ///
    /// A missing file is [`Error::ConfigNotFound`]; content that does not
    /// deserialize into `T` is [`Error::ConfigCorrupt`].
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::detect(path)?;
        let content = match io::read_text(path) {
            Ok(content) => content,
            Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound {
                    path: path.to_native(),
                });
            }
            Err(e) => return Err(e),
        };

        let corrupt = |message: String| Error::ConfigCorrupt {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            Format::Toml => toml::from_str(&content).map_err(|e| corrupt(e.to_string())),
            Format::Json => serde_json::from_str(&content).map_err(|e| corrupt(e.to_string())),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| corrupt(e.to_string())),
        }
    }

    /// Load the document at `path` as a flat [`ConfigMap`].
    ///
    /// Anything other than a mapping at the top level (a list, a scalar, an
    /// empty document) is reported as [`Error::ConfigCorrupt`].
    pub fn load_map(&self, path: &NormalizedPath) -> Result<ConfigMap> {
        self.load(path).map_err(|e| match e {
            Error::ConfigCorrupt {
                path,
                format,
                message,
            } => Error::ConfigCorrupt {
                path,
                format,
                message: format!("expected a mapping of keys to values: {message}"),
            },
            other => other,
        })
    }

    /// Serialize `value` and atomically replace the file at `path`.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = Format::detect(path)?;
        let serialize_error = |message: String| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        let content = match format {
            Format::Toml => toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?,
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?
            }
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))?,
        };

        io::write_atomic(path, content.as_bytes())
    }

    /// Compute `existing` updated with every key of `incoming`.
    ///
    /// With `allow_override` disabled the merge fails when the key count of
    /// the result is smaller than the two key counts added together. Any
    /// shared key counts as a collision, even when both sides hold the same
    /// value. `existing` is never modified.
    pub fn merge(existing: &ConfigMap, incoming: &ConfigMap, allow_override: bool) -> Result<ConfigMap> {
        Self::merge_at(existing, incoming, allow_override, &NormalizedPath::new(""))
    }

    /// Same as [`ConfigStore::merge`], naming `path` in the rejection error.
    pub fn merge_at(
        existing: &ConfigMap,
        incoming: &ConfigMap,
        allow_override: bool,
        path: &NormalizedPath,
    ) -> Result<ConfigMap> {
        let mut merged = existing.clone();
        merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));

        if !allow_override {
            let before = existing.len() + incoming.len();
            let after = merged.len();
            if before != after {
                return Err(Error::OverrideRejected {
                    path: path.to_native(),
                    collisions: before - after,
                });
            }
        }

        Ok(merged)
    }
}
