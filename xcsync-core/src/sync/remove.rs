//! Subtree removal
//!
//! Deletes a previously synced group and everything beneath it, children
//! before parents, unregistering every build file that points into it.

use crate::error::Result;
use crate::graph::ProjectGraph;
use crate::types::{BuildPhaseKind, Configuration, Object, ObjectId};

use super::{leaf_name, resolve_parent, SyncContext};

/// Leaf names that denote a variant group rather than a plain group
pub const VARIANT_GROUP_SUFFIXES: [&str; 1] = [".strings"];

pub fn is_variant_name(name: &str) -> bool {
    VARIANT_GROUP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Remove the group a configuration owns, returning its resolved parent
///
/// The parent is resolved before anything is touched, so an unknown group
/// path fails with the graph unchanged. The target's Sources and Resources
/// phases are emptied entirely; a group that does not exist is not an error.
pub fn remove_subtree(ctx: &mut SyncContext<'_>, configuration: &Configuration) -> Result<ObjectId> {
    let name = leaf_name(configuration)?;
    let parent = resolve_parent(ctx.graph, &configuration.group_path)?;

    let cleared = clear_build_phases(ctx.graph, &configuration.target)?;
    ctx.stats.removed_objects += cleared;

    let variant = is_variant_name(name);
    let existing = ctx.graph.child_containers_named(&parent, name, variant)?;
    if existing.is_empty() {
        tracing::debug!("No existing group for {}, nothing to remove", configuration.group_path);
    }
    for id in existing {
        if variant {
            remove_variant_group(ctx, &parent, &id)?;
        } else {
            remove_group(ctx, &parent, &id)?;
        }
    }
    Ok(parent)
}

/// Empty the Sources and Resources phases of a target
///
/// Build files that no phase lists afterwards are deleted. Returns how many.
pub fn clear_build_phases(graph: &mut ProjectGraph, target: &str) -> Result<usize> {
    let phases: Vec<ObjectId> = [BuildPhaseKind::Sources, BuildPhaseKind::Resources]
        .into_iter()
        .filter_map(|kind| graph.target_phase(target, kind))
        .collect();
    if phases.is_empty() {
        tracing::debug!("Target '{}' has no Sources or Resources phase to clear", target);
        return Ok(0);
    }

    let mut cleared = Vec::new();
    for phase in &phases {
        cleared.append(&mut std::mem::take(&mut graph.build_phase_mut(phase)?.files));
    }

    let mut removed = 0;
    for build_file in cleared {
        if !graph.is_registered(&build_file) && graph.remove(&build_file).is_some() {
            removed += 1;
        }
    }
    tracing::debug!("Cleared build phases of '{}' ({} build files deleted)", target, removed);
    Ok(removed)
}

/// Delete a group, its descendants, and detach it from `parent`
fn remove_group(ctx: &mut SyncContext<'_>, parent: &ObjectId, id: &ObjectId) -> Result<()> {
    let children = children_of(ctx.graph, id);
    for child in &children {
        match ctx.graph.get(child) {
            Some(Object::Group(_)) => remove_group(ctx, id, child)?,
            Some(Object::VariantGroup(_)) => remove_variant_group(ctx, id, child)?,
            Some(_) => remove_leaf(ctx, id, child)?,
            None => {
                tracing::warn!("Group {} lists missing child {}", id, child);
                ctx.graph.detach_child(id, child)?;
            }
        }
    }
    delete(ctx, parent, id)
}

/// Delete a variant group; each child is one locale's file reference
fn remove_variant_group(ctx: &mut SyncContext<'_>, parent: &ObjectId, id: &ObjectId) -> Result<()> {
    for child in &children_of(ctx.graph, id) {
        remove_leaf(ctx, id, child)?;
    }
    delete(ctx, parent, id)
}

fn remove_leaf(ctx: &mut SyncContext<'_>, parent: &ObjectId, id: &ObjectId) -> Result<()> {
    delete(ctx, parent, id)
}

/// Detach `id` from `parent`, drop its build files, then drop the object
fn delete(ctx: &mut SyncContext<'_>, parent: &ObjectId, id: &ObjectId) -> Result<()> {
    ctx.graph.detach_child(parent, id)?;
    ctx.stats.removed_objects += ctx.graph.unregister(id);
    if ctx.graph.remove(id).is_some() {
        ctx.stats.removed_objects += 1;
    }
    Ok(())
}

fn children_of(graph: &ProjectGraph, id: &ObjectId) -> Vec<ObjectId> {
    graph
        .get(id)
        .and_then(Object::children)
        .map(<[ObjectId]>::to_vec)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::test_fixtures::{
        fixture_project, write_tree, APP_DELEGATE_REF, APP_GROUP, RESOURCES_PHASE, SOURCES_PHASE,
    };
    use crate::types::{FileReference, Group};
    use crate::sync::build_subtree;
    use tempfile::TempDir;

    fn views_config() -> Configuration {
        Configuration::new("App/Views", "Views", "App")
    }

    #[test]
    fn test_is_variant_name() {
        assert!(is_variant_name("Localizable.strings"));
        assert!(!is_variant_name("Views"));
    }

    #[test]
    fn test_remove_absent_group_is_idempotent() {
        let mut project = fixture_project();
        let mut ctx = SyncContext::new(&mut project.graph);
        let parent = remove_subtree(&mut ctx, &views_config()).unwrap();
        assert_eq!(parent, ObjectId::new(APP_GROUP));

        let after_first = project.graph.clone();
        let mut ctx = SyncContext::new(&mut project.graph);
        remove_subtree(&mut ctx, &views_config()).unwrap();
        assert_eq!(ctx.stats.removed_objects, 0);
        assert!(project.graph.iter().eq(after_first.iter()));
    }

    #[test]
    fn test_clearing_phases_drops_orphaned_build_files() {
        let mut project = fixture_project();
        let removed = clear_build_phases(&mut project.graph, "App").unwrap();
        assert_eq!(removed, 1);

        let sources = project.graph.build_phase(&ObjectId::new(SOURCES_PHASE)).unwrap();
        assert!(sources.files.is_empty());
        assert!(project
            .graph
            .build_files_referencing(&ObjectId::new(APP_DELEGATE_REF))
            .is_empty());
        // The file itself stays in its group
        assert!(project.graph.contains(&ObjectId::new(APP_DELEGATE_REF)));

        assert_eq!(clear_build_phases(&mut project.graph, "Missing").unwrap(), 0);
    }

    #[test]
    fn test_remove_built_subtree_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(
            temp_dir.path(),
            &[
                "Views/A.swift",
                "Views/B.png",
                "Views/Cells/Cell.swift",
                "Views/Base.lproj/Localizable.strings",
                "Views/fr.lproj/Localizable.strings",
            ],
        );
        let mut project = fixture_project();
        let app = ObjectId::new(APP_GROUP);

        clear_build_phases(&mut project.graph, "App").unwrap();
        let baseline = project.graph.clone();

        let mut ctx = SyncContext::new(&mut project.graph);
        build_subtree(&mut ctx, &temp_dir.path().join("Views"), &app, "Views", "App").unwrap();
        assert!(project.graph.len() > baseline.len());

        let mut ctx = SyncContext::new(&mut project.graph);
        remove_subtree(&mut ctx, &views_config()).unwrap();

        assert!(project.graph.iter().eq(baseline.iter()));
        assert!(project.graph.find_group("Views", Some(&app)).is_none());
        assert!(project.graph.build_phase(&ObjectId::new(RESOURCES_PHASE)).unwrap().files.is_empty());
        assert!(project.graph.validate_tree().is_ok());
    }

    #[test]
    fn test_remove_variant_group_by_leaf_name() {
        let mut project = fixture_project();
        let app = ObjectId::new(APP_GROUP);
        let graph = &mut project.graph;

        let base = graph.add(Object::FileReference(FileReference::new(
            "Localizable",
            "Base.lproj/Localizable.strings",
        )));
        let fr = graph.add(Object::FileReference(FileReference::new(
            "fr",
            "fr.lproj/Localizable.strings",
        )));
        let mut variant = Group::variant("Localizable.strings");
        variant.children = vec![base.clone(), fr.clone()];
        let variant = graph.add(Object::VariantGroup(variant));
        graph.append_child(&app, variant.clone()).unwrap();
        let phase = ObjectId::new(RESOURCES_PHASE);
        let build_file = graph.add_build_file(&phase, variant.clone()).unwrap();

        let mut ctx = SyncContext::new(&mut project.graph);
        remove_subtree(&mut ctx, &Configuration::new("App/Localizable.strings", "Strings", "Other"))
            .unwrap();

        for id in [&base, &fr, &variant, &build_file] {
            assert!(!project.graph.contains(id), "{} should be gone", id);
        }
        assert!(project.graph.build_phase(&phase).unwrap().files.is_empty());
        assert!(!project.graph.container(&app).unwrap().children.contains(&variant));
    }

    #[test]
    fn test_unknown_parent_leaves_graph_untouched() {
        let mut project = fixture_project();
        let before = project.graph.clone();

        let mut ctx = SyncContext::new(&mut project.graph);
        let err = remove_subtree(&mut ctx, &Configuration::new("Missing/Views", "Views", "App"))
            .unwrap_err();

        assert!(matches!(err, SyncError::ParentReferenceNotFound(path) if path == "Missing/Views"));
        assert!(project.graph.iter().eq(before.iter()));
    }
}
