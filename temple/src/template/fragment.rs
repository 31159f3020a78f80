//! Fragment loading
//!
//! A fragment file's text becomes a named handlebars template inside the
//! composed template's engine, so any fragment can be the entry point or be
//! pulled into another one with `{{> name}}`.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::composed::{BASE_FRAGMENT, Template};
use crate::error::{Result, TempleError};

impl Template {
    /// Merge the fragment at `path` under `name`
    ///
    /// Returns `Ok(false)` without touching the file if `name` is already
    /// defined; the first definition of a name always wins.
    pub(crate) fn load_fragment(&mut self, name: &str, path: &Path) -> Result<bool> {
        if self.defined.contains(name) {
            debug!(%name, path = %path.display(), "Template::load_fragment: already defined, skipping");
            return Ok(false);
        }

        let text = fs::read_to_string(path).map_err(|e| TempleError::io(path, e))?;
        self.engine
            .register_template_string(name, text)
            .map_err(|e| TempleError::Parse {
                name: name.to_string(),
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;

        debug!(%name, path = %path.display(), "Template::load_fragment: registered");
        self.defined.insert(name.to_string());
        self.record_file(path);

        if name == BASE_FRAGMENT {
            self.entry_name = BASE_FRAGMENT.to_string();
        }
        Ok(true)
    }
}
