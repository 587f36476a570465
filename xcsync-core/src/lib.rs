//! xcsync Core Library
//!
//! This crate provides the core functionality for xcsync:
//! - Xcode project descriptor (`project.pbxproj`) parsing and writing
//! - The project object graph and its reference ids
//! - Sync configuration loading (JSON, YAML, TOML)
//! - Directory to group synchronization, localized resources included

pub mod disk;
pub mod error;
pub mod file_type;
pub mod graph;
pub mod path_utils;
pub mod pbxproj;
pub mod sync;
pub mod types;

#[cfg(test)]
mod test_fixtures;

// Re-export commonly used types
pub use error::{Result, SyncError};
pub use file_type::{last_known_file_type, FileType};
pub use graph::{GraphError, IdGenerator, ProjectGraph};
pub use pbxproj::{PbxprojError, Project};
pub use sync::{
    resolve_parent, run, sync_all, sync_configuration, ConfigurationReport, SyncOptions,
    SyncReport, SyncStats,
};
pub use types::{
    BuildFile, BuildPhase, BuildPhaseKind, ConfigError, ConfigFormat, Configuration,
    FileReference, Group, Object, ObjectId, RawObject, SourceTree, Target,
};
pub use path_utils::{normalize_path, path_to_string};
