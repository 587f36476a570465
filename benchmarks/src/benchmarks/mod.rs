pub mod pbxproj;
pub mod sync_tree;
