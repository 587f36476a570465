//! Subtree builder
//!
//! Mirrors a directory into a fresh group: subdirectories become nested
//! groups, files become file references registered in the target's Sources
//! or Resources phase, and locale directories are folded into variant groups.

use std::path::Path;

use crate::disk::{self, DiskEntry};
use crate::error::Result;
use crate::file_type::{last_known_file_type, FileType};
use crate::path_utils::is_hidden;
use crate::types::{BuildPhaseKind, FileReference, Group, Object, ObjectId};

use super::localization::build_localizations;
use super::SyncContext;

/// Create group `name` under `parent` for the directory at `disk_path`
///
/// The group is attached before the directory is listed, so a listing
/// failure leaves a partially built subtree in the graph. Callers abort the
/// run in that case and nothing is persisted.
pub fn build_subtree(
    ctx: &mut SyncContext<'_>,
    disk_path: &Path,
    parent: &ObjectId,
    name: &str,
    target: &str,
) -> Result<ObjectId> {
    let group = ctx.graph.add(Object::Group(Group::new(name)));
    ctx.graph.append_child(parent, group.clone())?;
    ctx.stats.groups += 1;

    let contents = disk::list_directory(disk_path)?;
    tracing::trace!("Building group {} from {} entries", name, contents.len());

    let mut localized = false;
    for entry in &contents {
        let Some(kind) = disk::classify(disk_path, entry) else {
            tracing::debug!("Skipping vanished entry {}", disk_path.join(entry).display());
            continue;
        };
        match kind {
            DiskEntry::Directory => {
                build_subtree(ctx, &disk_path.join(entry), &group, entry, target)?;
            }
            DiskEntry::LinkedDirectory => {
                tracing::warn!("Not following directory link {}", disk_path.join(entry).display());
            }
            DiskEntry::BaseLocale if !localized => {
                localized = true;
                build_localizations(ctx, disk_path, &contents, &group, target)?;
            }
            DiskEntry::BaseLocale | DiskEntry::OtherLocale => {}
            DiskEntry::File(FileType::Source) => {
                register_file(ctx, &group, entry, BuildPhaseKind::Sources, target)?;
            }
            DiskEntry::File(FileType::Resource) if !is_hidden(entry) => {
                register_file(ctx, &group, entry, BuildPhaseKind::Resources, target)?;
            }
            DiskEntry::File(_) => tracing::trace!("Ignoring {}", entry),
        }
    }

    Ok(group)
}

/// Add a file reference for `file_name` to `group` and register it in `kind`
pub(crate) fn register_file(
    ctx: &mut SyncContext<'_>,
    group: &ObjectId,
    file_name: &str,
    kind: BuildPhaseKind,
    target: &str,
) -> Result<ObjectId> {
    let file_ref = FileReference::new(file_name, file_name)
        .with_file_type(last_known_file_type(file_name));
    let file_ref = ctx.graph.add(Object::FileReference(file_ref));
    ctx.graph.append_child(group, file_ref.clone())?;

    match kind {
        BuildPhaseKind::Sources => ctx.stats.source_files += 1,
        _ => ctx.stats.resource_files += 1,
    }
    register_in_phase(ctx, &file_ref, kind, target, file_name)?;
    Ok(file_ref)
}

/// Create a build file for `file_ref` in the target's phase of `kind`
///
/// A missing target or phase is not an error: the reference stays in its
/// group, out of the build, and a warning is logged.
pub(crate) fn register_in_phase(
    ctx: &mut SyncContext<'_>,
    file_ref: &ObjectId,
    kind: BuildPhaseKind,
    target: &str,
    label: &str,
) -> Result<Option<ObjectId>> {
    match ctx.graph.target_phase(target, kind) {
        Some(phase) => Ok(Some(ctx.graph.add_build_file(&phase, file_ref.clone())?)),
        None => {
            tracing::warn!(
                "Target '{}' has no {} phase, {} is not part of the build",
                target,
                kind.default_name(),
                label
            );
            ctx.stats.unregistered_files += 1;
            Ok(None)
        }
    }
}
