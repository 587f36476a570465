//! Project store for Xcode `project.pbxproj` descriptors
//!
//! Loads a descriptor into a [`ProjectGraph`] and writes it back. Objects the
//! sync engine does not edit, and fields it does not interpret, are written
//! back exactly as they were read.

pub mod codec;
pub mod plist;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::{IdGenerator, ProjectGraph};
use crate::types::ObjectId;

use plist::{Dictionary, Value};

/// File name of the descriptor inside an `.xcodeproj` bundle
pub const DESCRIPTOR_FILE_NAME: &str = "project.pbxproj";

/// Errors raised while reading or writing a descriptor
#[derive(Debug, thiserror::Error)]
pub enum PbxprojError {
    #[error("Failed to access project file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project file syntax error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Project file is malformed: {0}")]
    Malformed(String),

    #[error("Invalid object {id}: {message}")]
    InvalidObject { id: String, message: String },
}

/// A loaded project descriptor
#[derive(Debug, Clone)]
pub struct Project {
    /// Top-level entries other than `objects` (`archiveVersion`, `rootObject`, ...)
    pub attributes: Dictionary,
    /// Every object of the descriptor
    pub graph: ProjectGraph,
    /// Name of the `.xcodeproj` bundle, used for comments when writing
    pub name: Option<String>,
}

impl Project {
    /// Load from an `.xcodeproj` bundle or a `project.pbxproj` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PbxprojError> {
        let descriptor = descriptor_path(path.as_ref());
        let content = fs::read_to_string(&descriptor).map_err(|source| PbxprojError::Io {
            path: descriptor.clone(),
            source,
        })?;
        let mut project = Self::parse(&content)?;
        project.name = project_name(path.as_ref());
        tracing::debug!(
            "Loaded {} objects from {}",
            project.graph.len(),
            descriptor.display()
        );
        Ok(project)
    }

    /// Decode descriptor text
    pub fn parse(content: &str) -> Result<Self, PbxprojError> {
        let mut attributes = plist::parse(content)?
            .into_dictionary()
            .ok_or_else(|| PbxprojError::Malformed("root is not a dictionary".to_string()))?;

        let objects = match attributes.remove("objects") {
            Some(Value::Dictionary(objects)) => objects,
            Some(_) => return Err(PbxprojError::Malformed("`objects` is not a dictionary".to_string())),
            None => return Err(PbxprojError::Malformed("missing `objects`".to_string())),
        };

        let mut graph = ProjectGraph::with_id_generator(IdGenerator::Random);
        for (id, value) in objects {
            let fields = value.into_dictionary().ok_or_else(|| PbxprojError::InvalidObject {
                id: id.clone(),
                message: "object is not a dictionary".to_string(),
            })?;
            let object = codec::decode_object(fields)
                .map_err(|message| PbxprojError::InvalidObject { id: id.clone(), message })?;
            graph.insert(ObjectId::new(id), object);
        }

        Ok(Self {
            attributes,
            graph,
            name: None,
        })
    }

    /// Encode as descriptor text
    pub fn to_pbxproj(&self) -> String {
        writer::write_project(&self.attributes, &self.graph, self.name.as_deref())
    }

    /// Write to an `.xcodeproj` bundle or a `project.pbxproj` file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PbxprojError> {
        let descriptor = descriptor_path(path.as_ref());
        fs::write(&descriptor, self.to_pbxproj()).map_err(|source| PbxprojError::Io {
            path: descriptor.clone(),
            source,
        })?;
        tracing::debug!("Wrote {} objects to {}", self.graph.len(), descriptor.display());
        Ok(())
    }

    /// Id of the `PBXProject` root object
    pub fn root_object(&self) -> Option<ObjectId> {
        self.attributes
            .get("rootObject")
            .and_then(Value::as_str)
            .map(ObjectId::new)
    }
}

/// Resolve the descriptor file for a bundle or file path
pub fn descriptor_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DESCRIPTOR_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

fn project_name(path: &Path) -> Option<String> {
    let bundle = if path.is_dir() { Some(path) } else { path.parent() };
    bundle
        .filter(|dir| dir.extension().is_some_and(|ext| ext == "xcodeproj"))
        .and_then(|dir| dir.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
}
