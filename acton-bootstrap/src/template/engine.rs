//! Template environment with an ordered directory search path

use indexmap::IndexMap;
use minijinja::{Environment, ErrorKind, Value};
use parking_lot::RwLock;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::EngineSettings;

/// Errors that can occur when loading or rendering templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A file could not be read
    #[error("failed to read '{}': {source}", path.display())]
    ReadFailed {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// No config directory holds the requested file
    #[error("config file not found in any config directory: {0}")]
    ConfigNotFound(String),

    /// A config file is not valid TOML
    #[error("invalid config file '{}': {source}", path.display())]
    InvalidConfig {
        /// File being parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// Template loading or rendering failed
    #[error("template render error: {0}")]
    RenderError(#[from] minijinja::Error),
}

/// minijinja environment whose loader searches template directories in order
///
/// The first directory containing the requested template wins. Changing the
/// directories drops every template loaded so far.
#[derive(Debug)]
pub struct TemplateEngine {
    env: Environment<'static>,
    search_path: Arc<RwLock<IndexMap<String, PathBuf>>>,
}

impl TemplateEngine {
    /// Create an engine searching `dirs` in order
    #[must_use]
    pub fn new(dirs: IndexMap<String, PathBuf>, settings: &EngineSettings) -> Self {
        let search_path = Arc::new(RwLock::new(dirs));

        let mut env = Environment::new();
        env.set_trim_blocks(settings.trim_blocks);
        env.set_lstrip_blocks(settings.lstrip_blocks);

        let loader_path = Arc::clone(&search_path);
        env.set_loader(move |name| load_template(&loader_path.read(), name));

        Self { env, search_path }
    }

    /// Template directories, in search order
    #[must_use]
    pub fn template_dirs(&self) -> IndexMap<String, PathBuf> {
        self.search_path.read().clone()
    }

    /// Replace the template directories
    pub fn set_template_dirs(&mut self, dirs: IndexMap<String, PathBuf>) {
        *self.search_path.write() = dirs;
        self.env.clear_templates();
        tracing::debug!("Template search path changed, loaded templates dropped");
    }

    /// Path a template would be loaded from
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        resolve(&self.search_path.read(), name)
    }

    /// Access the environment, e.g. to register filters or functions
    pub const fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns error if the template is not found or rendering fails.
    pub fn render(
        &self,
        name: &str,
        ctx: &IndexMap<String, Value>,
    ) -> Result<String, TemplateError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }

    /// Render a template into `out`
    ///
    /// # Errors
    ///
    /// Returns error if the template is not found, rendering fails or `out`
    /// cannot be written.
    pub fn render_to_write<W: io::Write>(
        &self,
        name: &str,
        ctx: &IndexMap<String, Value>,
        out: W,
    ) -> Result<(), TemplateError> {
        let template = self.env.get_template(name)?;
        template.render_to_write(ctx, out)?;
        Ok(())
    }
}

/// Read a TOML config file from the first config directory that has it
///
/// Each top-level key becomes one template variable.
pub(crate) fn read_config_vars(
    dirs: &IndexMap<String, PathBuf>,
    name: &str,
) -> Result<IndexMap<String, Value>, TemplateError> {
    let path = resolve(dirs, name)
        .ok_or_else(|| TemplateError::ConfigNotFound(name.to_string()))?;
    let text = fs::read_to_string(&path).map_err(|source| TemplateError::ReadFailed {
        path: path.clone(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&text)
        .map_err(|source| TemplateError::InvalidConfig { path, source })?;

    Ok(table
        .into_iter()
        .map(|(key, value)| (key, Value::from_serialize(&value)))
        .collect())
}

fn resolve(dirs: &IndexMap<String, PathBuf>, name: &str) -> Option<PathBuf> {
    if !is_relative_name(name) {
        return None;
    }
    let mut candidates = dirs.values().map(|dir| dir.join(name));
    candidates.find(|path| path.is_file())
}

// Only plain relative names; `..` or absolute paths could escape the directories
fn is_relative_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

fn load_template(
    dirs: &IndexMap<String, PathBuf>,
    name: &str,
) -> Result<Option<String>, minijinja::Error> {
    let Some(path) = resolve(dirs, name) else {
        return Ok(None);
    };

    let read_failed = |e: io::Error| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("could not read template '{}'", path.display()),
        )
        .with_source(e)
    };
    fs::read_to_string(&path).map(Some).map_err(read_failed)
}
