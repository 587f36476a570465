//! Disk walker
//!
//! Thin wrappers over directory listing plus the classification of each
//! entry into what the subtree builder does with it.

use std::fs;
use std::path::Path;

use crate::error::SyncError;
use crate::file_type::FileType;

/// Suffix of per-language resource directories
pub const LOCALE_BUNDLE_SUFFIX: &str = ".lproj";

/// Suffix of asset catalogs, which are bundled whole instead of walked
pub const ASSET_CATALOG_SUFFIX: &str = ".xcassets";

/// Locale directories holding the canonical variant, in order of preference
pub const BASE_LOCALES: [&str; 2] = ["Base.lproj", "en.lproj"];

/// What a path on disk is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// Symbolic link resolving to a directory
    LinkedDirectory,
    File,
}

/// What the builder should do with a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskEntry {
    /// Plain directory, becomes a group
    Directory,
    /// Symbolic link to a directory, never walked
    LinkedDirectory,
    /// `Base.lproj` or `en.lproj`
    BaseLocale,
    /// Any other `*.lproj` directory, only read as a sibling of the base
    OtherLocale,
    /// File (or bundle directory such as an asset catalog) with its build role
    File(FileType),
}

/// Names of the immediate entries of `path`, in the order the OS returns them
pub fn list_directory(path: &Path) -> Result<Vec<String>, SyncError> {
    let entries = fs::read_dir(path).map_err(|source| SyncError::io(path, source))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SyncError::io(path, source))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => tracing::warn!("Skipping non UTF-8 file name {:?} in {}", name, path.display()),
        }
    }
    Ok(names)
}

/// Whether `path` exists, and if so whether it is a directory
///
/// Links are resolved, but a link to a directory is reported apart so the
/// walk cannot loop through it.
pub fn entry_kind(path: &Path) -> Option<EntryKind> {
    let link = fs::symlink_metadata(path).ok()?;
    if !link.file_type().is_symlink() {
        return Some(if link.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        });
    }
    let metadata = fs::metadata(path).ok()?;
    Some(if metadata.is_dir() {
        EntryKind::LinkedDirectory
    } else {
        EntryKind::File
    })
}

pub fn is_locale_bundle(name: &str) -> bool {
    name.ends_with(LOCALE_BUNDLE_SUFFIX)
}

pub fn is_base_locale(name: &str) -> bool {
    BASE_LOCALES.contains(&name)
}

/// Classify `dir/name`; `None` when the entry vanished or is a dangling link
pub fn classify(dir: &Path, name: &str) -> Option<DiskEntry> {
    let kind = entry_kind(&dir.join(name))?;
    let entry = match kind {
        EntryKind::Directory | EntryKind::LinkedDirectory if is_locale_bundle(name) => {
            if is_base_locale(name) {
                DiskEntry::BaseLocale
            } else {
                DiskEntry::OtherLocale
            }
        }
        EntryKind::Directory if !name.ends_with(ASSET_CATALOG_SUFFIX) => DiskEntry::Directory,
        EntryKind::LinkedDirectory if !name.ends_with(ASSET_CATALOG_SUFFIX) => {
            DiskEntry::LinkedDirectory
        }
        // Files named like locale bundles are not walked nor registered
        EntryKind::File if is_locale_bundle(name) => DiskEntry::OtherLocale,
        _ => DiskEntry::File(FileType::from_name(name)),
    };
    Some(entry)
}
