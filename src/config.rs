use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ReleaseError, Result};
use crate::manifest::ReleaseNames;

const PROJECT_CONFIG: &str = "release.toml";
const LEGACY_CONFIG: &str = "foundryconfig.json";
const USER_CONFIG: &str = ".module-release.toml";

/// Represents the complete configuration for module-release.
///
/// Built once at startup and passed to every operation. Paths are relative to
/// `project_root`, which is not part of the file format.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Repository web URL, e.g. `https://github.com/owner/module`
    pub repository: Option<String>,

    /// Base URL for raw file access
    #[serde(alias = "rawURL")]
    pub raw_url: Option<String>,

    /// Module name; defaults to the project directory's name
    pub name: Option<String>,

    /// The host application's user-data directory, used by `link`
    #[serde(alias = "dataPath")]
    pub data_path: Option<PathBuf>,

    pub dist_dir: PathBuf,
    pub manifest_file: String,
    pub package_file: String,
    pub artifact_file: String,

    /// Files and directories copied into the dist folder by `build`
    pub statics: Vec<String>,

    #[serde(skip)]
    pub project_root: PathBuf,
}

/// Returns the default list of static entries copied into the bundle.
fn default_statics() -> Vec<String> {
    vec![
        "images".to_string(),
        "module.json".to_string(),
        "packs".to_string(),
        "README.md".to_string(),
    ]
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        let names = ReleaseNames::default();
        ReleaseConfig {
            repository: None,
            raw_url: None,
            name: None,
            data_path: None,
            dist_dir: PathBuf::from("dist"),
            manifest_file: names.manifest_file,
            package_file: "package.json".to_string(),
            artifact_file: names.artifact_file,
            statics: default_statics(),
            project_root: PathBuf::from("."),
        }
    }
}

impl ReleaseConfig {
    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.manifest_file)
    }

    pub fn package_path(&self) -> PathBuf {
        self.project_root.join(&self.package_file)
    }

    pub fn dist_path(&self) -> PathBuf {
        self.project_root.join(&self.dist_dir)
    }

    pub fn release_names(&self) -> ReleaseNames {
        ReleaseNames {
            manifest_file: self.manifest_file.clone(),
            artifact_file: self.artifact_file.clone(),
        }
    }

    /// Configured name, or the base name of the project directory.
    pub fn project_name(&self) -> Result<String> {
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            return Ok(name.clone());
        }
        let root = self.project_root.canonicalize()?;
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ReleaseError::missing_config(format!(
                    "cannot derive a module name from '{}'",
                    root.display()
                ))
            })
    }

    /// Both repository URLs are needed before a manifest may be rewritten.
    pub fn require_urls(&self) -> Result<(&str, &str)> {
        match (non_blank(&self.repository), non_blank(&self.raw_url)) {
            (Some(repository), Some(raw_url)) => Ok((repository, raw_url)),
            _ => Err(ReleaseError::missing_config(
                "repository URLs not configured (need 'repository' and 'raw_url')",
            )),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Parses a configuration file, choosing JSON or TOML by extension.
pub fn parse_config_file(path: &Path) -> Result<ReleaseConfig> {
    let text = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&text)
            .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))
    } else {
        toml::from_str(&text).map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the project root
/// 3. `foundryconfig.json` in the project root
/// 4. `.module-release.toml` in the user config directory
/// 5. Default configuration if no file found
///
/// The returned value has `project_root` set to `project_root`.
pub fn load_config(project_root: &Path, config_path: Option<&Path>) -> Result<ReleaseConfig> {
    let candidates = [
        Some(project_root.join(PROJECT_CONFIG)),
        Some(project_root.join(LEGACY_CONFIG)),
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG)),
    ];

    let source = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => candidates.into_iter().flatten().find(|p| p.is_file()),
    };

    let mut config = match source {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            parse_config_file(&path)?
        }
        None => {
            debug!("no configuration file found, using defaults");
            ReleaseConfig::default()
        }
    };

    config.project_root = project_root.to_path_buf();
    Ok(config)
}
