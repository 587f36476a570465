//! Errors of a sync run

use std::path::PathBuf;

use crate::graph::GraphError;
use crate::pbxproj::PbxprojError;
use crate::types::ConfigError;

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Every failure of a sync run; all of them abort the run
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Parent reference not found for group path '{0}'")]
    ParentReferenceNotFound(String),

    #[error("Group path '{0}' does not end in a group name")]
    EmptyGroupName(String),

    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Project(#[from] PbxprojError),

    #[error("Failed to sync '{group_path}'")]
    Configuration {
        group_path: String,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the group path of the configuration that failed
    pub fn in_configuration(self, group_path: &str) -> Self {
        Self::Configuration {
            group_path: group_path.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping configuration context
    pub fn root_cause(&self) -> &SyncError {
        match self {
            Self::Configuration { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
