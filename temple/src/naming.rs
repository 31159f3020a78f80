//! Name derivation for fragments and template scopes
//!
//! - A fragment file is any file whose name contains the layout marker
//!   (`.temple` by default). Its fragment name is the text before the marker,
//!   lower-cased: `Welcome.temple.html` is `welcome`.
//! - A directory is partial-marked when its name starts with the partial
//!   prefix (`_` by default).
//! - A scope's logical name is its path relative to the root with segments
//!   joined by `.` and the partial prefix stripped from every segment:
//!   `a/_shared/c` is `a.shared.c`.

use std::path::{Component, Path};

use crate::config::LayoutConfig;

/// Whether a file name follows the fragment-file convention
pub fn is_fragment_file(file_name: &str, layout: &LayoutConfig) -> bool {
    file_name.contains(&layout.marker)
}

/// Fragment name for a file: base name up to the marker, lower-cased
///
/// Returns `None` if the marker does not occur in the base name.
pub fn fragment_name(path: impl AsRef<Path>, layout: &LayoutConfig) -> Option<String> {
    let base = path.as_ref().file_name()?.to_string_lossy();
    let end = base.find(&layout.marker)?;
    Some(base[..end].to_lowercase())
}

/// Fragment name for a file found inside a partials directory
///
/// Only the final segment counts, with the partial prefix stripped first, so
/// `_partials/_nav.temple` and `_partials/deep/nav.temple` both yield `nav`.
pub fn partial_fragment_name(path: impl AsRef<Path>, layout: &LayoutConfig) -> Option<String> {
    let base = path.as_ref().file_name()?.to_string_lossy();
    let stripped = strip_partial_prefix(&base, layout);
    fragment_name(stripped, layout)
}

/// Dotted logical name of a directory relative to the root
pub fn logical_name(relative: impl AsRef<Path>, layout: &LayoutConfig) -> String {
    segments(relative.as_ref())
        .map(|seg| strip_partial_prefix(&seg, layout).to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether a single directory name is partial-marked
pub fn is_partial_dir_name(name: &str, layout: &LayoutConfig) -> bool {
    name.starts_with(&layout.partial_prefix)
}

/// Whether any segment of a root-relative path is partial-marked
pub fn is_partial_path(relative: impl AsRef<Path>, layout: &LayoutConfig) -> bool {
    segments(relative.as_ref()).any(|seg| is_partial_dir_name(&seg, layout))
}

fn strip_partial_prefix<'a>(segment: &'a str, layout: &LayoutConfig) -> &'a str {
    segment.strip_prefix(layout.partial_prefix.as_str()).unwrap_or(segment)
}

fn segments(path: &Path) -> impl Iterator<Item = std::borrow::Cow<'_, str>> {
    path.components().filter_map(|c| match c {
        Component::Normal(seg) => Some(seg.to_string_lossy()),
        _ => None,
    })
}
