//! Module manifest (`module.json`) record.
//!
//! The manifest is kept as an ordered JSON object so that descriptor fields
//! this tool knows nothing about survive a rewrite untouched and in place.

pub mod format;

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

pub use format::{to_string_compact, CompactOptions};

/// File names baked into the derived URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNames {
    /// Manifest file name served from the latest release (`module.json`)
    pub manifest_file: String,
    /// Artifact attached to each versioned release (`module.zip`)
    pub artifact_file: String,
}

impl Default for ReleaseNames {
    fn default() -> Self {
        ReleaseNames {
            manifest_file: "module.json".to_string(),
            artifact_file: "module.zip".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Manifest { fields }),
            _ => Err(ReleaseError::invalid_manifest("top level is not a JSON object")),
        }
    }

    /// Reads the manifest at `path`.
    ///
    /// # Returns
    /// * `Err(MissingManifest)` - if the file does not exist
    /// * `Err(Json)` - if it is not valid JSON
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReleaseError::MissingManifest(path.to_path_buf()));
        }
        debug!(path = %path.display(), "reading manifest");
        let text = fs::read_to_string(path)?;
        Manifest::from_value(serde_json::from_str(&text)?)
    }

    /// Writes the manifest with the pretty-compact layout.
    pub fn save(&self, path: &Path, options: &CompactOptions) -> Result<()> {
        let text = self.to_string_compact(options)?;
        debug!(path = %path.display(), bytes = text.len(), "writing manifest");
        fs::write(path, text)?;
        Ok(())
    }

    pub fn to_string_compact(&self, options: &CompactOptions) -> Result<String> {
        to_string_compact(&Value::Object(self.fields.clone()), options)
    }

    /// The version currently recorded, which must be a string.
    pub fn version(&self) -> Result<&str> {
        self.str_field("version")
            .ok_or_else(|| ReleaseError::invalid_manifest("missing string field 'version'"))
    }

    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    pub fn manifest_url(&self) -> Option<&str> {
        self.str_field("manifest")
    }

    pub fn download_url(&self) -> Option<&str> {
        self.str_field("download")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Existing keys keep their position; new keys are appended.
    fn set(&mut self, key: &str, value: String) {
        self.fields.insert(key.to_string(), Value::String(value));
    }
}

/// Rewrites the version and the URLs derived from it.
///
/// - `version`  = `target`
/// - `url`      = `repository_url`
/// - `manifest` = `{repository_url}/releases/latest/download/{manifest_file}`
/// - `download` = `{repository_url}/releases/download/v{target}/{artifact_file}`
///
/// # Returns
/// * `Err(MissingConfiguration)` - if `repository_url` is absent or blank
pub fn apply_version(
    mut manifest: Manifest,
    target: &Version,
    repository_url: Option<&str>,
    names: &ReleaseNames,
) -> Result<Manifest> {
    let repository_url = repository_url
        .map(|url| url.trim_end_matches('/'))
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ReleaseError::missing_config("repository URL is not configured"))?;

    manifest.set("version", target.to_string());
    manifest.set("url", repository_url.to_string());
    manifest.set(
        "manifest",
        format!(
            "{}/releases/latest/download/{}",
            repository_url, names.manifest_file
        ),
    );
    manifest.set(
        "download",
        format!(
            "{}/releases/download/v{}/{}",
            repository_url, target, names.artifact_file
        ),
    );

    Ok(manifest)
}
