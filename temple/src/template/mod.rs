//! Composed templates
//!
//! A [`Template`] merges fragment files from one directory, its partials
//! directories and its ancestors into a single handlebars engine, and renders
//! its entry fragment on `execute`.

mod compose;
mod composed;
mod fragment;
mod options;

pub use compose::compose;
pub use composed::{BASE_FRAGMENT, Template};
pub use options::{HelperFactory, OnTemplate, TempleOptions};
