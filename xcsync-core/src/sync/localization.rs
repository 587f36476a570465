//! Localized resources
//!
//! The base locale directory (`Base.lproj`, otherwise `en.lproj`) decides
//! which files are localized. Every base file that has a counterpart in
//! another locale directory becomes a variant group with one file reference
//! per locale, registered in the Resources phase as a single unit.

use std::path::Path;

use crate::disk::{self, BASE_LOCALES};
use crate::error::Result;
use crate::file_type::last_known_file_type;
use crate::path_utils::{descriptor_join, stem_before_first_dot};
use crate::types::{BuildPhaseKind, FileReference, Group, Object, ObjectId};

use super::build::register_in_phase;
use super::SyncContext;

/// Locale directories found next to each other
#[derive(Debug)]
struct LocaleLayout<'a> {
    base: &'a str,
    others: Vec<&'a str>,
}

impl<'a> LocaleLayout<'a> {
    fn detect(siblings: &'a [String]) -> Option<Self> {
        let base = BASE_LOCALES
            .iter()
            .copied()
            .find(|base| siblings.iter().any(|s| s == base))?;
        let others = siblings
            .iter()
            .map(String::as_str)
            .filter(|name| disk::is_locale_bundle(name) && !disk::is_base_locale(name))
            .collect();
        Some(Self { base, others })
    }
}

/// Add variant groups for the locale directories among `siblings`
///
/// `siblings` is the listing of `containing`. Returns the number of variant
/// groups created. Nothing is created when the target has no Resources phase.
pub fn build_localizations(
    ctx: &mut SyncContext<'_>,
    containing: &Path,
    siblings: &[String],
    parent: &ObjectId,
    target: &str,
) -> Result<usize> {
    if ctx.graph.target_phase(target, BuildPhaseKind::Resources).is_none() {
        tracing::warn!(
            "Target '{}' has no Resources phase, skipping localizations in {}",
            target,
            containing.display()
        );
        return Ok(0);
    }
    let Some(layout) = LocaleLayout::detect(siblings) else {
        return Ok(0);
    };
    if layout.others.is_empty() {
        return Ok(0);
    }
    let base_files = disk::list_directory(&containing.join(layout.base))?;
    localize_files(ctx, containing, &layout, &base_files, parent, target)
}

fn localize_files(
    ctx: &mut SyncContext<'_>,
    containing: &Path,
    layout: &LocaleLayout<'_>,
    base_files: &[String],
    parent: &ObjectId,
    target: &str,
) -> Result<usize> {
    let mut created = 0;
    for file in base_files {
        let counterparts: Vec<&str> = layout
            .others
            .iter()
            .copied()
            .filter(|locale| containing.join(locale).join(file).exists())
            .collect();
        // The first untranslated base file ends localization of this directory
        if counterparts.is_empty() {
            tracing::debug!(
                "{} has no translations, stopping localization in {}",
                file,
                containing.display()
            );
            break;
        }

        let file_type = last_known_file_type(file);
        let mut children = Vec::with_capacity(counterparts.len() + 1);
        children.push(ctx.graph.add(Object::FileReference(
            FileReference::new(stem_before_first_dot(file), &descriptor_join(layout.base, file))
                .with_file_type(file_type),
        )));
        for locale in &counterparts {
            children.push(ctx.graph.add(Object::FileReference(
                FileReference::new(stem_before_first_dot(locale), &descriptor_join(locale, file))
                    .with_file_type(file_type),
            )));
        }

        let mut group = Group::variant(file);
        group.children = children;
        let variant = ctx.graph.add(Object::VariantGroup(group));
        ctx.graph.append_child(parent, variant.clone())?;
        ctx.stats.variant_groups += 1;
        created += 1;

        register_in_phase(ctx, &variant, BuildPhaseKind::Resources, target, file)?;
        tracing::debug!("Localized {} in {} languages", file, counterparts.len() + 1);
    }
    Ok(created)
}
