//! Directory composition
//!
//! Builds one [`Template`] for a target directory:
//!
//! 1. Every partial-marked subdirectory is walked (whole subtree, lexical
//!    order) and its fragments are merged under their file names.
//! 2. Fragment files directly in the directory are merged; the first one
//!    becomes the entry unless a `base` fragment shows up.
//! 3. With `climb`, the parent directory is processed the same way, up to and
//!    including the root. Names already defined closer to the target win.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::composed::Template;
use super::options::TempleOptions;
use crate::error::{Result, TempleError};
use crate::naming::{fragment_name, is_fragment_file, is_partial_dir_name, partial_fragment_name};

/// Compose the template for `dir`, merging ancestors up to `root` when `climb` is set
pub fn compose(root: &Path, dir: &Path, climb: bool, options: &TempleOptions) -> Result<Template> {
    let composer = Composer { root, options };
    composer.compose(dir, climb)
}

struct Composer<'a> {
    root: &'a Path,
    options: &'a TempleOptions,
}

/// A directory entry classified without following symlinks
struct DirEntry {
    name: OsString,
    path: PathBuf,
    is_dir: bool,
}

impl Composer<'_> {
    fn compose(&self, dir: &Path, climb: bool) -> Result<Template> {
        if !dir.starts_with(self.root) {
            return Err(TempleError::OutsideRoot {
                path: dir.to_path_buf(),
                root: self.root.to_path_buf(),
            });
        }

        let mut template = Template::new(self.options)?;
        let mut current = dir;
        let mut steps = 0;

        loop {
            self.merge_directory(&mut template, current)?;

            if !climb || current == self.root {
                break;
            }

            steps += 1;
            if steps > self.options.layout.max_depth {
                return Err(TempleError::ClimbTooDeep {
                    path: dir.to_path_buf(),
                    max_depth: self.options.layout.max_depth,
                });
            }

            current = match current.parent() {
                Some(parent) if parent.starts_with(self.root) => parent,
                _ => {
                    return Err(TempleError::OutsideRoot {
                        path: current.to_path_buf(),
                        root: self.root.to_path_buf(),
                    });
                }
            };
        }

        debug!(
            dir = %dir.display(),
            entry = %template.entry_name(),
            fragments = template.defined.len(),
            "Composer::compose: complete"
        );
        Ok(template)
    }

    fn merge_directory(&self, template: &mut Template, dir: &Path) -> Result<()> {
        let layout = &self.options.layout;
        let entries = list_dir(dir)?;

        for entry in entries.iter().filter(|e| e.is_dir) {
            if is_partial_dir_name(&entry.name.to_string_lossy(), layout) {
                self.merge_partials(template, &entry.path)?;
            }
        }

        for entry in entries.iter().filter(|e| !e.is_dir) {
            if !is_fragment_file(&entry.name.to_string_lossy(), layout) {
                continue;
            }
            let Some(name) = fragment_name(&entry.path, layout) else {
                continue;
            };
            if name.is_empty() {
                warn!(path = %entry.path.display(), "Skipping fragment with an empty name");
                continue;
            }
            if template.load_fragment(&name, &entry.path)? {
                template.set_default_entry(&name);
            }
        }
        Ok(())
    }

    fn merge_partials(&self, template: &mut Template, dir: &Path) -> Result<()> {
        let layout = &self.options.layout;
        debug!(dir = %dir.display(), "Composer::merge_partials: called");

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                TempleError::io(path, e.into())
            })?;

            if entry.file_type().is_dir() {
                continue;
            }
            if !is_fragment_file(&entry.file_name().to_string_lossy(), layout) {
                continue;
            }
            let Some(name) = partial_fragment_name(entry.path(), layout) else {
                continue;
            };
            if name.is_empty() {
                warn!(path = %entry.path().display(), "Skipping partial with an empty name");
                continue;
            }
            template.load_fragment(&name, entry.path())?;
        }
        Ok(())
    }
}

/// List a directory sorted by file name
fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| TempleError::io(dir, e))? {
        let entry = entry.map_err(|e| TempleError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| TempleError::io(&path, e))?;
        entries.push(DirEntry {
            name: entry.file_name(),
            is_dir: file_type.is_dir(),
            path,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
