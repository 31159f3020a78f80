//! Tree walking: one template per directory under the root

use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use super::set::TemplateSet;
use crate::error::{Result, TempleError};
use crate::naming::{is_partial_dir_name, logical_name};
use crate::template::{TempleOptions, compose};

/// Build a template for every directory below `root`
///
/// Partial-marked directories are pruned from the walk, so neither they nor
/// anything beneath them becomes an addressable template. The first failing
/// composition aborts the whole build.
pub fn build(root: &Path, options: &TempleOptions) -> Result<TemplateSet> {
    let layout = &options.layout;
    let mut set = TemplateSet::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !(e.file_type().is_dir() && is_partial_dir_name(&e.file_name().to_string_lossy(), layout))
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            TempleError::io(path, e.into())
        })?;

        // Skip the root and plain files
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        let relative = dir.strip_prefix(root).map_err(|_| TempleError::OutsideRoot {
            path: dir.to_path_buf(),
            root: root.to_path_buf(),
        })?;
        let name = logical_name(relative, layout);

        let template = compose(root, dir, true, options)?;
        debug!(%name, entry = %template.entry_name(), "build: composed template");
        set.insert(name, template);
    }

    info!(root = %root.display(), templates = set.len(), files = set.files.len(), "Built template set");
    Ok(set)
}
