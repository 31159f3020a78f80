//! Template registry
//!
//! Walks the template root, composes one template per directory and keeps the
//! published set behind a reader/writer lock for atomic reloads.

mod set;
mod temple;
mod walker;

pub use set::TemplateSet;
pub use temple::Temple;
pub use walker::build;
