//! The template registry

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use tracing::{debug, info};

use super::set::TemplateSet;
use super::walker::build;
use crate::config::TempleConfig;
use crate::error::Result;
use crate::template::{Template, TempleOptions};

/// Templates built from a directory tree, keyed by dotted logical name
///
/// Lookups are cheap and never block each other. `reload` rebuilds the whole
/// set from disk and swaps it in atomically, so a reader sees either the old
/// set or the new one, never a mixture.
#[derive(Debug)]
pub struct Temple {
    root: PathBuf,
    options: TempleOptions,
    current: RwLock<Arc<TemplateSet>>,
    reload_lock: Mutex<()>,
}

impl Temple {
    /// Build a registry from `root` with default options
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_options(root, TempleOptions::default())
    }

    /// Build a registry from `root`, applying `options` to every template
    pub fn with_options(root: impl Into<PathBuf>, options: TempleOptions) -> Result<Self> {
        options.layout.validate()?;
        let temple = Self {
            root: root.into(),
            options,
            current: RwLock::new(Arc::new(TemplateSet::default())),
            reload_lock: Mutex::new(()),
        };
        temple.reload()?;
        Ok(temple)
    }

    /// Build a registry from a loaded configuration
    pub fn from_config(config: &TempleConfig) -> Result<Self> {
        config.validate()?;
        Self::with_options(config.root.clone(), TempleOptions::from_config(config))
    }

    /// Root directory of the template tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &TempleOptions {
        &self.options
    }

    /// Look up a template by logical name
    pub fn get(&self, name: &str) -> Option<Arc<Template>> {
        self.snapshot().get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot().contains(name)
    }

    /// Logical names of all templates, sorted
    pub fn names(&self) -> Vec<String> {
        self.snapshot().names()
    }

    /// Every file that contributed to the current templates
    pub fn files(&self) -> Vec<PathBuf> {
        self.snapshot().files().to_vec()
    }

    /// The current template set, for consistent multi-template lookups
    pub fn snapshot(&self) -> Arc<TemplateSet> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Rebuild every template from disk and publish the result
    ///
    /// On error the current set stays in place and the error is returned.
    pub fn reload(&self) -> Result<()> {
        let _reloading = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(root = %self.root.display(), "Temple::reload: called");

        let started = Instant::now();
        let set = Arc::new(build(&self.root, &self.options)?);
        let (templates, files) = (set.len(), set.files().len());

        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = set;
        }

        info!(
            root = %self.root.display(),
            templates,
            files,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Templates reloaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_new_builds_templates() {
        let temp = tempdir().unwrap();
        write(temp.path(), "site/welcome/welcome.temple", "<base>Welcome</base>");

        let temple = Temple::new(temp.path()).unwrap();
        assert_eq!(temple.root(), temp.path());
        assert!(temple.contains("site.welcome"));
        assert!(temple.get("site.missing").is_none());
    }

    #[test]
    fn test_new_fails_on_bad_template() {
        let temp = tempdir().unwrap();
        write(temp.path(), "site/broken.temple", "{{/if}}");

        assert!(Temple::new(temp.path()).is_err());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let temp = tempdir().unwrap();
        write(temp.path(), "page/body.temple", "v1");

        let temple = Temple::new(temp.path()).unwrap();
        assert_eq!(temple.get("page").unwrap().render(&json!({})).unwrap(), "v1");

        write(temp.path(), "page/body.temple", "v2");
        temple.reload().unwrap();
        assert_eq!(temple.get("page").unwrap().render(&json!({})).unwrap(), "v2");
    }

    #[test]
    fn test_reload_failure_keeps_previous_set() {
        let temp = tempdir().unwrap();
        write(temp.path(), "page/body.temple", "v1");

        let temple = Temple::new(temp.path()).unwrap();
        let before = temple.snapshot();

        write(temp.path(), "page/body.temple", "{{#each items}}");
        assert!(temple.reload().unwrap_err().is_parse());

        assert!(Arc::ptr_eq(&before, &temple.snapshot()));
        assert_eq!(temple.get("page").unwrap().render(&json!({})).unwrap(), "v1");
    }

    #[test]
    fn test_held_template_survives_reload() {
        let temp = tempdir().unwrap();
        write(temp.path(), "page/body.temple", "old");

        let temple = Temple::new(temp.path()).unwrap();
        let held = temple.get("page").unwrap();

        write(temp.path(), "page/body.temple", "new");
        temple.reload().unwrap();

        assert_eq!(held.render(&json!({})).unwrap(), "old");
        assert_eq!(temple.get("page").unwrap().render(&json!({})).unwrap(), "new");
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let temp = tempdir().unwrap();
        let mut options = TempleOptions::default();
        options.layout.marker = String::new();

        assert!(Temple::with_options(temp.path(), options).is_err());
    }
}
