//! Sync configuration
//!
//! A configuration file lists the subtrees to keep in sync. Each entry maps a
//! slash-delimited group path inside the project to a directory on disk and
//! names the target whose build phases receive the files.
//!
//! ```json
//! [
//!   { "groupPath": "App/Views", "filePath": "Views", "target": "App" }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One synchronization instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Logical path of the synced group, e.g. `App/Views`
    pub group_path: String,

    /// Directory on disk, relative to the source root
    pub file_path: String,

    /// Target whose Sources/Resources phases receive the files
    pub target: String,
}

impl Configuration {
    pub fn new(group_path: &str, file_path: &str, target: &str) -> Self {
        Self {
            group_path: group_path.to_string(),
            file_path: file_path.to_string(),
            target: target.to_string(),
        }
    }

    /// Last component of the group path
    pub fn name(&self) -> Option<&str> {
        self.group_path.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Group path components leading to the synced group, leaf excluded
    pub fn parent_components(&self) -> Vec<&str> {
        parent_components(&self.group_path)
    }

    /// Load every configuration from a file, picking the format by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, ConfigFormat::from_path(path)).map_err(|message| {
            ConfigError::Decode {
                path: path.to_path_buf(),
                message,
            }
        })
    }

    /// Decode configurations from text in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Vec<Self>, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str::<TomlConfigurations>(content)
                .map(|file| file.configuration)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Components of a slash-delimited group path, leaf excluded
pub fn parent_components(group_path: &str) -> Vec<&str> {
    let mut components: Vec<&str> = group_path.split('/').collect();
    components.pop();
    components
}

/// TOML has no top-level arrays, so entries live under `[[configuration]]`
#[derive(Debug, Deserialize)]
struct TomlConfigurations {
    #[serde(default)]
    configuration: Vec<Configuration>,
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// JSON unless the extension says otherwise
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Errors raised while loading configurations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode configuration file {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}
