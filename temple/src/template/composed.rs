//! A composed template: fragments merged from a directory and its ancestors

use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::options::TempleOptions;
use crate::error::{Result, TempleError};

/// Fragment name that always becomes the entry point
pub const BASE_FRAGMENT: &str = "base";

/// A set of named fragments plus the entry fragment rendered by `execute`
pub struct Template {
    pub(crate) entry_name: String,
    pub(crate) defined: HashSet<String>,
    pub(crate) files: Vec<PathBuf>,
    pub(crate) engine: Handlebars<'static>,
}

impl Template {
    /// Create an empty template with its engine prepared from the options
    pub(crate) fn new(options: &TempleOptions) -> Result<Self> {
        Ok(Self {
            entry_name: String::new(),
            defined: HashSet::new(),
            files: Vec::new(),
            engine: options.new_engine()?,
        })
    }

    /// Name of the fragment rendered by `execute`; empty if none was found
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Files merged into this template, in merge order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Names of every fragment merged into this template, sorted
    pub fn fragment_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defined.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn has_fragment(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    /// Render the entry fragment with `data`, writing the output to `writer`
    pub fn execute<W, T>(&self, writer: W, data: &T) -> Result<()>
    where
        W: Write,
        T: Serialize,
    {
        if self.entry_name.is_empty() {
            return Err(TempleError::NoEntry);
        }
        debug!(entry = %self.entry_name, "Template::execute: called");
        self.engine
            .render_to_write(&self.entry_name, data, writer)
            .map_err(|e| TempleError::Render {
                entry: self.entry_name.clone(),
                source: Box::new(e),
            })
    }

    /// Render the entry fragment with `data` into a string
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.execute(&mut buf, data)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Make `name` the entry unless one is already chosen
    pub(crate) fn set_default_entry(&mut self, name: &str) {
        if self.entry_name.is_empty() {
            self.entry_name = name.to_string();
        }
    }

    pub(crate) fn record_file(&mut self, path: &Path) {
        self.files.push(path.to_path_buf());
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("entry_name", &self.entry_name)
            .field("fragments", &self.fragment_names())
            .field("files", &self.files)
            .finish()
    }
}
