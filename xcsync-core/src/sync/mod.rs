//! Sync engine
//!
//! For every configuration, the group it owns is removed from the project
//! graph and rebuilt from the directory on disk. The project file is written
//! once, after every configuration succeeded.

mod build;
mod localization;
mod remove;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SyncError};
use crate::graph::ProjectGraph;
use crate::pbxproj::Project;
use crate::types::{parent_components, Configuration, ObjectId};

pub use build::build_subtree;
pub use localization::build_localizations;
pub use remove::{clear_build_phases, is_variant_name, remove_subtree, VARIANT_GROUP_SUFFIXES};

/// Counters collected while syncing one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub removed_objects: usize,
    pub groups: usize,
    pub source_files: usize,
    pub resource_files: usize,
    pub variant_groups: usize,
    /// Files kept out of the build because the target lacks the phase
    pub unregistered_files: usize,
}

/// Mutable state threaded through removal and building
pub struct SyncContext<'a> {
    pub graph: &'a mut ProjectGraph,
    pub stats: SyncStats,
}

impl<'a> SyncContext<'a> {
    pub fn new(graph: &'a mut ProjectGraph) -> Self {
        Self {
            graph,
            stats: SyncStats::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationReport {
    pub group_path: String,
    pub target: String,
    pub group: ObjectId,
    pub stats: SyncStats,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub configurations: Vec<ConfigurationReport>,
    /// Whether the project file was written
    pub persisted: bool,
}

impl SyncReport {
    pub fn totals(&self) -> SyncStats {
        self.configurations
            .iter()
            .fold(SyncStats::default(), |mut totals, report| {
                totals.removed_objects += report.stats.removed_objects;
                totals.groups += report.stats.groups;
                totals.source_files += report.stats.source_files;
                totals.resource_files += report.stats.resource_files;
                totals.variant_groups += report.stats.variant_groups;
                totals.unregistered_files += report.stats.unregistered_files;
                totals
            })
    }
}

/// Resolve the group that contains the leaf of `group_path`
///
/// Each component except the last is looked up by name, the first in the
/// whole graph and every following one among the previous match's children.
/// A path with a single component has no parent and is rejected.
pub fn resolve_parent(graph: &ProjectGraph, group_path: &str) -> Result<ObjectId> {
    let not_found = || SyncError::ParentReferenceNotFound(group_path.to_string());

    let mut parent: Option<ObjectId> = None;
    for component in parent_components(group_path) {
        let found = graph.find_group(component, parent.as_ref()).ok_or_else(not_found)?;
        parent = Some(found);
    }
    parent.ok_or_else(not_found)
}

/// Last component of the group path, which names the synced group
pub(crate) fn leaf_name(configuration: &Configuration) -> Result<&str> {
    configuration
        .name()
        .ok_or_else(|| SyncError::EmptyGroupName(configuration.group_path.clone()))
}

/// Replace the group of one configuration with a fresh copy of its directory
pub fn sync_configuration(
    graph: &mut ProjectGraph,
    configuration: &Configuration,
    src_root: &Path,
) -> Result<ConfigurationReport> {
    let mut ctx = SyncContext::new(graph);
    let parent = remove_subtree(&mut ctx, configuration)?;

    let name = leaf_name(configuration)?;
    let disk_path = src_root.join(&configuration.file_path);
    let group = build_subtree(&mut ctx, &disk_path, &parent, name, &configuration.target)?;

    tracing::info!("Synced: {}", configuration.group_path);
    Ok(ConfigurationReport {
        group_path: configuration.group_path.clone(),
        target: configuration.target.clone(),
        group,
        stats: ctx.stats,
    })
}

/// Sync every configuration in order, stopping at the first failure
pub fn sync_all(
    graph: &mut ProjectGraph,
    configurations: &[Configuration],
    src_root: &Path,
) -> Result<Vec<ConfigurationReport>> {
    configurations
        .iter()
        .map(|configuration| {
            sync_configuration(graph, configuration, src_root)
                .map_err(|e| e.in_configuration(&configuration.group_path))
        })
        .collect()
}

/// Inputs of a run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory that configuration file paths are relative to
    pub src_root: PathBuf,
    /// `.xcodeproj` bundle or its `project.pbxproj`
    pub project_path: PathBuf,
    pub configuration_path: PathBuf,
    /// Sync in memory without writing the project file
    pub dry_run: bool,
}

/// Load the project and configurations, sync everything, then save
///
/// Any failure aborts before the project file is touched.
pub fn run(options: &SyncOptions) -> Result<SyncReport> {
    let mut project = Project::load(&options.project_path)?;
    let configurations = Configuration::from_file(&options.configuration_path)?;
    tracing::debug!(
        "Syncing {} configurations from {}",
        configurations.len(),
        options.configuration_path.display()
    );

    let reports = sync_all(&mut project.graph, &configurations, &options.src_root)?;

    if options.dry_run {
        tracing::info!("Dry run, {} left unchanged", options.project_path.display());
    } else {
        project.save(&options.project_path)?;
    }

    Ok(SyncReport {
        configurations: reports,
        persisted: !options.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbxproj::DESCRIPTOR_FILE_NAME;
    use crate::test_fixtures::{fixture_project, write_tree, APP_GROUP, FIXTURE, MAIN_GROUP};
    use crate::types::Object;
    use std::fs;
    use tempfile::TempDir;

    fn file_ref_ids(graph: &ProjectGraph) -> Vec<ObjectId> {
        graph
            .iter()
            .filter(|(_, object)| matches!(object, Object::FileReference(_)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Registered file references, by name
    fn registered_names(graph: &ProjectGraph) -> Vec<String> {
        let mut names: Vec<String> = graph
            .iter()
            .filter_map(|(id, object)| match object {
                Object::BuildFile(bf) if graph.is_registered(id) => bf.file_ref.as_ref(),
                _ => None,
            })
            .filter_map(|file_ref| graph.get(file_ref).and_then(Object::display_name))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// Depth-first (depth, isa, name, build file count) listing of a group
    fn group_shape(
        graph: &ProjectGraph,
        id: &ObjectId,
        depth: usize,
        out: &mut Vec<(usize, String, String, usize)>,
    ) {
        let Some(object) = graph.get(id) else {
            return;
        };
        out.push((
            depth,
            object.isa().to_string(),
            object.display_name().unwrap_or_default().to_string(),
            graph.build_files_referencing(id).len(),
        ));
        if let Ok(group) = graph.container(id) {
            for child in &group.children {
                group_shape(graph, child, depth + 1, out);
            }
        }
    }

    /// Write the fixture bundle and a json configuration file
    fn write_workspace(root: &Path, configurations: &str) -> SyncOptions {
        let bundle = root.join("App.xcodeproj");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join(DESCRIPTOR_FILE_NAME), FIXTURE).unwrap();
        let configuration_path = root.join("xcsync.json");
        fs::write(&configuration_path, configurations).unwrap();
        SyncOptions {
            src_root: root.to_path_buf(),
            project_path: bundle,
            configuration_path,
            dry_run: false,
        }
    }

    #[test]
    fn test_resolve_parent() {
        let project = fixture_project();
        let graph = &project.graph;

        assert_eq!(resolve_parent(graph, "App/Views").unwrap(), ObjectId::new(APP_GROUP));
        assert_eq!(
            resolve_parent(graph, "App/Views/Cells").unwrap_err().to_string(),
            "Parent reference not found for group path 'App/Views/Cells'"
        );
        assert!(matches!(
            resolve_parent(graph, "Views"),
            Err(SyncError::ParentReferenceNotFound(_))
        ));
        assert!(matches!(
            resolve_parent(graph, "Missing/Views"),
            Err(SyncError::ParentReferenceNotFound(_))
        ));
    }

    #[test]
    fn test_sync_replaces_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift", "Views/B.png"]);
        let configuration = Configuration::new("App/Views", "Views", "App");
        let mut project = fixture_project();

        let first = sync_configuration(&mut project.graph, &configuration, temp_dir.path()).unwrap();
        assert_eq!(registered_names(&project.graph), vec!["A.swift", "B.png"]);

        fs::remove_file(temp_dir.path().join("Views/B.png")).unwrap();
        write_tree(temp_dir.path(), &["Views/C.swift"]);
        let second = sync_configuration(&mut project.graph, &configuration, temp_dir.path()).unwrap();

        assert!(!project.graph.contains(&first.group));
        assert_eq!(registered_names(&project.graph), vec!["A.swift", "C.swift"]);
        let app = project.graph.container(&ObjectId::new(APP_GROUP)).unwrap();
        assert_eq!(app.children.iter().filter(|c| **c == second.group).count(), 1);
        assert!(project.graph.validate_tree().is_ok());
    }

    #[test]
    fn test_resync_of_unchanged_tree_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(
            temp_dir.path(),
            &[
                "Views/A.swift",
                "Views/B.png",
                "Views/Sub/C.m",
                "Views/Sub/D.json",
                "Views/Base.lproj/Localizable.strings",
                "Views/fr.lproj/Localizable.strings",
            ],
        );
        let configuration = Configuration::new("App/Views", "Views", "App");
        let mut project = fixture_project();

        let first = sync_configuration(&mut project.graph, &configuration, temp_dir.path()).unwrap();
        let mut first_shape = Vec::new();
        group_shape(&project.graph, &first.group, 0, &mut first_shape);
        let first_len = project.graph.len();

        let second = sync_configuration(&mut project.graph, &configuration, temp_dir.path()).unwrap();
        let mut second_shape = Vec::new();
        group_shape(&project.graph, &second.group, 0, &mut second_shape);

        assert_ne!(first.group, second.group);
        assert_eq!(first_shape, second_shape);
        assert_eq!(project.graph.len(), first_len);
        assert_eq!(first.stats.groups, second.stats.groups);
        assert_eq!(second.stats.variant_groups, 1);
        assert!(first_shape.iter().any(|(_, isa, name, count)| {
            isa == "PBXVariantGroup" && name == "Localizable.strings" && *count == 1
        }));
        assert!(project.graph.validate_tree().is_ok());
    }

    #[test]
    fn test_clearing_drops_files_outside_the_subtree() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift"]);
        let mut project = fixture_project();

        sync_configuration(
            &mut project.graph,
            &Configuration::new("App/Views", "Views", "App"),
            temp_dir.path(),
        )
        .unwrap();

        // AppDelegate.swift stays referenced but is no longer compiled
        assert_eq!(registered_names(&project.graph), vec!["A.swift"]);
        assert!(project.graph.find_group("App", None).is_some());
    }

    #[test]
    fn test_every_new_file_is_registered() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(
            temp_dir.path(),
            &["Views/A.swift", "Views/Sub/B.m", "Views/Sub/C.png", "Views/D.json"],
        );
        let mut project = fixture_project();
        let before = file_ref_ids(&project.graph);

        sync_configuration(
            &mut project.graph,
            &Configuration::new("App/Views", "Views", "App"),
            temp_dir.path(),
        )
        .unwrap();

        let added: Vec<ObjectId> = file_ref_ids(&project.graph)
            .into_iter()
            .filter(|id| !before.contains(id))
            .collect();
        assert_eq!(added.len(), 4);
        for file_ref in &added {
            let build_files = project.graph.build_files_referencing(file_ref);
            assert_eq!(build_files.len(), 1);
            assert!(project.graph.is_registered(&build_files[0]));
        }
    }

    #[test]
    fn test_nested_group_path() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift", "Cells/Cell.swift"]);
        let mut project = fixture_project();

        let configurations = vec![
            Configuration::new("App/Views", "Views", "App"),
            Configuration::new("App/Views/Cells", "Cells", "Tool"),
        ];
        let reports = sync_all(&mut project.graph, &configurations, temp_dir.path()).unwrap();

        let views = &reports[0].group;
        let cells = project.graph.find_group("Cells", Some(views)).unwrap();
        assert_eq!(cells, reports[1].group);
        assert!(project.graph.validate_tree().is_ok());
        assert!(project
            .graph
            .parents_of(&ObjectId::new(APP_GROUP))
            .contains(&ObjectId::new(MAIN_GROUP)));
    }

    #[test]
    fn test_sync_all_reports_failing_configuration() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift"]);
        let mut project = fixture_project();

        let configurations = vec![
            Configuration::new("App/Views", "Views", "App"),
            Configuration::new("Nowhere/Models", "Models", "App"),
        ];
        let err = sync_all(&mut project.graph, &configurations, temp_dir.path()).unwrap_err();

        assert_eq!(err.to_string(), "Failed to sync 'Nowhere/Models'");
        assert!(matches!(err.root_cause(), SyncError::ParentReferenceNotFound(_)));
    }

    #[test]
    fn test_empty_leaf_name_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift"]);
        let mut project = fixture_project();
        let before = project.to_pbxproj();

        for group_path in ["App/", ""] {
            let configuration = Configuration::new(group_path, "Views", "App");
            let err = sync_configuration(&mut project.graph, &configuration, temp_dir.path()).unwrap_err();
            assert!(matches!(err, SyncError::EmptyGroupName(ref path) if path == group_path));
        }
        assert_eq!(project.to_pbxproj(), before);
    }

    #[test]
    fn test_run_writes_project_once() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift", "Views/B.png"]);
        let options = write_workspace(
            temp_dir.path(),
            r#"[{"groupPath": "App/Views", "filePath": "Views", "target": "App"}]"#,
        );

        let report = run(&options).unwrap();
        assert!(report.persisted);
        assert_eq!(report.totals().source_files, 1);
        assert_eq!(report.totals().resource_files, 1);

        let reloaded = Project::load(&options.project_path).unwrap();
        assert_eq!(registered_names(&reloaded.graph), vec!["A.swift", "B.png"]);
        let written = fs::read_to_string(options.project_path.join(DESCRIPTOR_FILE_NAME)).unwrap();
        assert!(written.contains("/* A.swift in Sources */"));
        assert!(written.contains("/* B.png in Resources */"));
    }

    #[test]
    fn test_dry_run_leaves_project_untouched() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift"]);
        let mut options = write_workspace(
            temp_dir.path(),
            r#"[{"groupPath": "App/Views", "filePath": "Views", "target": "App"}]"#,
        );
        options.dry_run = true;

        let report = run(&options).unwrap();
        assert!(!report.persisted);
        assert_eq!(report.configurations.len(), 1);

        let written = fs::read_to_string(options.project_path.join(DESCRIPTOR_FILE_NAME)).unwrap();
        assert_eq!(written, FIXTURE);
    }

    #[test]
    fn test_failed_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(temp_dir.path(), &["Views/A.swift"]);
        let options = write_workspace(
            temp_dir.path(),
            r#"[
                {"groupPath": "App/Views", "filePath": "Views", "target": "App"},
                {"groupPath": "App/Models", "filePath": "Models", "target": "App"}
            ]"#,
        );

        let err = run(&options).unwrap_err();
        assert!(matches!(err.root_cause(), SyncError::Io { .. }));

        let written = fs::read_to_string(options.project_path.join(DESCRIPTOR_FILE_NAME)).unwrap();
        assert_eq!(written, FIXTURE);
    }

    #[test]
    fn test_missing_configuration_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = write_workspace(temp_dir.path(), "[]");
        options.configuration_path = temp_dir.path().join("missing.json");

        assert!(matches!(run(&options), Err(SyncError::Config(_))));
    }
}
