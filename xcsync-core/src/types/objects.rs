//! Project descriptor objects
//!
//! Every entity of a project lives in the [`ProjectGraph`](crate::ProjectGraph)
//! arena under a reference id. The entities the sync engine edits are typed;
//! everything else is carried through as a [`RawObject`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pbxproj::plist::Dictionary;

/// Opaque reference id of a graph entity (24 hex characters in Xcode projects)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anchor a path is resolved against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceTree {
    /// Relative to the enclosing group (`<group>`)
    #[default]
    Group,
    Absolute,
    SourceRoot,
    BuiltProductsDir,
    SdkRoot,
    DeveloperDir,
    Other(String),
}

impl SourceTree {
    pub fn as_str(&self) -> &str {
        match self {
            SourceTree::Group => "<group>",
            SourceTree::Absolute => "<absolute>",
            SourceTree::SourceRoot => "SOURCE_ROOT",
            SourceTree::BuiltProductsDir => "BUILT_PRODUCTS_DIR",
            SourceTree::SdkRoot => "SDKROOT",
            SourceTree::DeveloperDir => "DEVELOPER_DIR",
            SourceTree::Other(other) => other,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "<group>" => SourceTree::Group,
            "<absolute>" => SourceTree::Absolute,
            "SOURCE_ROOT" => SourceTree::SourceRoot,
            "BUILT_PRODUCTS_DIR" => SourceTree::BuiltProductsDir,
            "SDKROOT" => SourceTree::SdkRoot,
            "DEVELOPER_DIR" => SourceTree::DeveloperDir,
            other => SourceTree::Other(other.to_string()),
        }
    }
}

/// Logical folder (`PBXGroup`), also the payload of a variant group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub name: Option<String>,
    pub path: Option<String>,
    pub children: Vec<ObjectId>,
    pub source_tree: SourceTree,
    /// Fields the engine does not interpret
    pub extra: Dictionary,
}

impl Group {
    /// A group whose name and path are both `name`
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            path: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// A variant group carries a name but no path of its own
    pub fn variant(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Groups are addressed by either their name or their path
    pub fn matches(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name) || self.path.as_deref() == Some(name)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }
}

/// Leaf pointing at one file on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReference {
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: SourceTree,
    pub last_known_file_type: Option<String>,
    pub extra: Dictionary,
}

impl FileReference {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    pub fn with_file_type(mut self, file_type: Option<&str>) -> Self {
        self.last_known_file_type = file_type.map(str::to_string);
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }
}

/// Membership record linking a file reference or variant group to a phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFile {
    pub file_ref: Option<ObjectId>,
    pub extra: Dictionary,
}

impl BuildFile {
    pub fn new(file_ref: ObjectId) -> Self {
        Self {
            file_ref: Some(file_ref),
            extra: Dictionary::new(),
        }
    }
}

/// Kind of a build phase, mapped one-to-one onto its `isa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPhaseKind {
    Sources,
    Resources,
    Frameworks,
    Headers,
    CopyFiles,
    ShellScript,
}

impl BuildPhaseKind {
    pub const ALL: [BuildPhaseKind; 6] = [
        BuildPhaseKind::Sources,
        BuildPhaseKind::Resources,
        BuildPhaseKind::Frameworks,
        BuildPhaseKind::Headers,
        BuildPhaseKind::CopyFiles,
        BuildPhaseKind::ShellScript,
    ];

    pub fn isa(&self) -> &'static str {
        match self {
            BuildPhaseKind::Sources => "PBXSourcesBuildPhase",
            BuildPhaseKind::Resources => "PBXResourcesBuildPhase",
            BuildPhaseKind::Frameworks => "PBXFrameworksBuildPhase",
            BuildPhaseKind::Headers => "PBXHeadersBuildPhase",
            BuildPhaseKind::CopyFiles => "PBXCopyFilesBuildPhase",
            BuildPhaseKind::ShellScript => "PBXShellScriptBuildPhase",
        }
    }

    pub fn from_isa(isa: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.isa() == isa)
    }

    /// Name Xcode shows for an unnamed phase of this kind
    pub fn default_name(&self) -> &'static str {
        match self {
            BuildPhaseKind::Sources => "Sources",
            BuildPhaseKind::Resources => "Resources",
            BuildPhaseKind::Frameworks => "Frameworks",
            BuildPhaseKind::Headers => "Headers",
            BuildPhaseKind::CopyFiles => "CopyFiles",
            BuildPhaseKind::ShellScript => "ShellScript",
        }
    }
}

/// Ordered list of build files processed for a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub kind: BuildPhaseKind,
    pub files: Vec<ObjectId>,
    pub extra: Dictionary,
}

impl BuildPhase {
    pub fn new(kind: BuildPhaseKind) -> Self {
        Self {
            kind,
            files: Vec::new(),
            extra: Dictionary::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.extra
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| self.kind.default_name())
    }
}

/// Named buildable unit owning build phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// `PBXNativeTarget`, `PBXAggregateTarget` or `PBXLegacyTarget`
    pub isa: String,
    pub name: String,
    pub build_phases: Vec<ObjectId>,
    pub extra: Dictionary,
}

impl Target {
    pub const ISAS: [&'static str; 3] = ["PBXNativeTarget", "PBXAggregateTarget", "PBXLegacyTarget"];

    pub fn native(name: &str) -> Self {
        Self {
            isa: "PBXNativeTarget".to_string(),
            name: name.to_string(),
            build_phases: Vec::new(),
            extra: Dictionary::new(),
        }
    }
}

/// Any object the engine does not interpret, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub isa: String,
    pub fields: Dictionary,
}

/// Tagged union over every entity kind stored in the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Group(Group),
    VariantGroup(Group),
    FileReference(FileReference),
    BuildFile(BuildFile),
    BuildPhase(BuildPhase),
    Target(Target),
    Other(RawObject),
}

impl Object {
    pub fn isa(&self) -> &str {
        match self {
            Object::Group(_) => "PBXGroup",
            Object::VariantGroup(_) => "PBXVariantGroup",
            Object::FileReference(_) => "PBXFileReference",
            Object::BuildFile(_) => "PBXBuildFile",
            Object::BuildPhase(phase) => phase.kind.isa(),
            Object::Target(target) => &target.isa,
            Object::Other(raw) => &raw.isa,
        }
    }

    /// Human-readable label, used as id hint and as comment in the descriptor
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Object::Group(group) | Object::VariantGroup(group) => group.display_name(),
            Object::FileReference(file) => file.display_name(),
            Object::BuildFile(_) => None,
            Object::BuildPhase(phase) => Some(phase.display_name()),
            Object::Target(target) => Some(&target.name),
            Object::Other(raw) if raw.isa == "PBXProject" => Some("Project object"),
            Object::Other(raw) => raw.fields.get("name").and_then(|v| v.as_str()),
        }
    }

    /// Children of a group or variant group
    pub fn children(&self) -> Option<&[ObjectId]> {
        match self {
            Object::Group(group) | Object::VariantGroup(group) => Some(&group.children),
            _ => None,
        }
    }
}
