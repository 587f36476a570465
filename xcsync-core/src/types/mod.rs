//! Project object model and sync configuration types
//!
//! Typed entities of a project descriptor plus the externally supplied
//! configuration that drives a sync pass.

mod configuration;
mod objects;

pub use configuration::*;
pub use objects::*;
