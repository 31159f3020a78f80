//! One published state of the registry

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::template::Template;

/// Templates keyed by dotted logical name, plus every file that went into them
///
/// A set is immutable once built; reloading replaces it wholesale.
#[derive(Debug, Default)]
pub struct TemplateSet {
    pub(crate) templates: HashMap<String, Arc<Template>>,
    pub(crate) files: Vec<PathBuf>,
}

impl TemplateSet {
    pub fn get(&self, name: &str) -> Option<Arc<Template>> {
        self.templates.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Logical names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Contributing files of every template, flattened in walk order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Template>)> {
        self.templates.iter().map(|(name, tpl)| (name.as_str(), tpl))
    }

    pub(crate) fn insert(&mut self, name: String, template: Template) {
        self.files.extend(template.files().iter().cloned());
        self.templates.insert(name, Arc::new(template));
    }
}
