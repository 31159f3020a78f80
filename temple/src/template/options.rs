//! Construction options shared by every template in a registry

use std::fmt;
use std::sync::Arc;

use handlebars::{Handlebars, HelperDef};
use tracing::debug;

use crate::config::{LayoutConfig, TempleConfig};
use crate::error::Result;

/// Produces a fresh helper instance for each template's engine
pub type HelperFactory = Arc<dyn Fn() -> Box<dyn HelperDef + Send + Sync> + Send + Sync>;

/// Customizes a template's engine before any fragment is merged in
pub type OnTemplate = Arc<dyn Fn(&mut Handlebars<'static>) -> Result<()> + Send + Sync>;

/// Options applied when composing templates
#[derive(Clone, Default)]
pub struct TempleOptions {
    /// Filesystem naming conventions
    pub layout: LayoutConfig,
    helpers: Vec<(String, HelperFactory)>,
    on_template: Option<OnTemplate>,
}

impl TempleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying the layout from a loaded configuration
    pub fn from_config(config: &TempleConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Register a custom helper usable from every fragment
    ///
    /// The factory runs once per composed template, since each template owns
    /// its own engine.
    pub fn helper<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn HelperDef + Send + Sync> + Send + Sync + 'static,
    {
        self.helpers.push((name.into(), Arc::new(factory)));
        self
    }

    /// Set the hook invoked once per template before fragments are parsed
    pub fn on_template<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Handlebars<'static>) -> Result<()> + Send + Sync + 'static,
    {
        self.on_template = Some(Arc::new(hook));
        self
    }

    /// Names of the registered custom helpers
    pub fn helper_names(&self) -> Vec<&str> {
        self.helpers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Build the engine handle for a new template
    pub(crate) fn new_engine(&self) -> Result<Handlebars<'static>> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(self.layout.strict_mode);

        for (name, factory) in &self.helpers {
            debug!(%name, "TempleOptions::new_engine: registering helper");
            hbs.register_helper(name, factory());
        }

        if let Some(hook) = &self.on_template {
            hook(&mut hbs)?;
        }

        Ok(hbs)
    }
}

impl fmt::Debug for TempleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempleOptions")
            .field("layout", &self.layout)
            .field("helpers", &self.helper_names())
            .field("on_template", &self.on_template.is_some())
            .finish()
    }
}
