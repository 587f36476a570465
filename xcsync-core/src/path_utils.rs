//! Path helpers shared by the disk walker and the builders
//!
//! Descriptor paths always use forward slashes, whatever the host platform
//! uses on disk.

use std::path::Path;

/// Normalize path to forward slashes
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a path to a normalized string
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Descriptor path of `file` inside the directory `dir` (`fr.lproj/Main.strings`)
pub fn descriptor_join(dir: &str, file: &str) -> String {
    path_to_string(&Path::new(dir).join(file))
}

/// Name up to the first dot (`Main.storyboard` → `Main`, `fr.lproj` → `fr`)
pub fn stem_before_first_dot(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Dot-files are never registered in a build phase
#[inline]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
