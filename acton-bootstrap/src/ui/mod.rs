//! The page facade: directories, asset registries and messages over minijinja
//!
//! [`BootstrapUi`] is built once by the application's entry point and passed
//! by reference to whatever renders pages. Only one may be alive per process.
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_bootstrap::prelude::*;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = BootstrapUiConfig::load_for_service("my-app")?
//!     .with_template_dir("./templates")
//!     .with_request_path("/reports/attendance.php");
//! let mut ui = BootstrapUi::new(config)?;
//!
//! ui.add_message("Saved", r#"Back to <a href="/reports">reports</a>"#, MessageLevel::Success);
//! ui.enable(MODULE_DATEPICKER)?;
//! ui.assign("form_action", "/reports/attendance.php");
//!
//! let html = ui.display("form-page.html")?;
//! # Ok(())
//! # }
//! ```

mod instance;

use indexmap::IndexMap;
use minijinja::{context, Value};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

use crate::assets::{AssetInput, AssetKind, AssetRegistry};
use crate::config::BootstrapUiConfig;
use crate::directory::{
    ensure_readable, ensure_writable, merge_keyed, merge_scalar, APP_KEY, UI_KEY,
};
use crate::error::Result;
use crate::message::{MessageLevel, NotificationMessage};
use crate::modules::{UiModule, MODULE_COLORPICKER, MODULE_DATEPICKER, MODULE_SORTABLE};
use crate::template::{read_config_vars, PageMeta, TemplateEngine, TemplateError};

use instance::InstanceSlot;

/// Template variable holding the pending messages
pub const VAR_MESSAGES: &str = "ui_messages";
/// Template variable holding the stylesheets, as `{key, url}` entries
pub const VAR_STYLESHEETS: &str = "ui_stylesheets";
/// Template variable holding the scripts, as `{key, url}` entries
pub const VAR_SCRIPTS: &str = "ui_scripts";
/// Template variable holding the script snippets, as `{key, code}` entries
pub const VAR_SCRIPT_SNIPPETS: &str = "ui_script_snippets";
/// Template variable holding the base URL of the UI files
pub const VAR_URL: &str = "bootstrap_ui_url";
/// Template variable holding the page name
pub const VAR_NAME: &str = "name";
/// Template variable holding the page category
pub const VAR_CATEGORY: &str = "category";
/// Template variable naming the active navbar entry (`false` when none)
pub const VAR_NAVBAR_ACTIVE: &str = "navbar_active";

/// Bootstrap UI page facade
///
/// Neither `Clone` nor `Copy`: the single instance is shared by reference.
#[derive(Debug)]
pub struct BootstrapUi {
    engine: TemplateEngine,
    config_dirs: IndexMap<String, PathBuf>,
    compile_dir: PathBuf,
    cache_dir: PathBuf,
    url: String,
    asset_root: String,
    default_template: String,
    messages: Vec<NotificationMessage>,
    stylesheets: AssetRegistry,
    scripts: AssetRegistry,
    snippets: AssetRegistry,
    context: IndexMap<String, Value>,
    // Declared last so the slot is released after everything else is dropped
    _slot: InstanceSlot,
}

impl BootstrapUi {
    /// Build the facade
    ///
    /// Merges the configured directories with the built-in ones, validates
    /// them, registers the base stylesheet and assigns the initial template
    /// variables. Nothing is left behind if any step fails.
    ///
    /// # Errors
    ///
    /// - [`SingletonViolation`](crate::error::BootstrapUiError::SingletonViolation) if
    ///   another instance is alive
    /// - any directory error from [`ensure_readable`] or [`ensure_writable`]
    /// - [`NotAUrl`](crate::error::BootstrapUiError::NotAUrl) if the site settings
    ///   produce an unusable base URL
    pub fn new(config: BootstrapUiConfig) -> Result<Self> {
        let slot = InstanceSlot::claim()?;

        let dirs = &config.directories;
        let template_dirs = merge_keyed(dirs.template.as_ref(), &dirs.default_template_dirs());
        let config_dirs = merge_keyed(dirs.config.as_ref(), &dirs.default_config_dirs());
        let compile_dir = merge_scalar(dirs.compile.as_deref(), &dirs.default_compile_dir());
        let cache_dir = merge_scalar(dirs.cache.as_deref(), &dirs.default_cache_dir());

        for dir in template_dirs.values().chain(config_dirs.values()) {
            ensure_readable(dir)?;
        }
        ensure_writable(&compile_dir)?;
        ensure_writable(&cache_dir)?;

        let url = config.site.base_url();
        let asset_root = format!("{url}{}", config.site.asset_prefix.trim_end_matches('/'));

        let mut ui = Self {
            engine: TemplateEngine::new(template_dirs, &config.engine),
            config_dirs,
            compile_dir,
            cache_dir,
            url,
            asset_root,
            default_template: config.engine.default_template,
            messages: Vec::new(),
            stylesheets: AssetRegistry::stylesheets(),
            scripts: AssetRegistry::scripts(),
            snippets: AssetRegistry::snippets(),
            context: IndexMap::new(),
            _slot: slot,
        };

        let base_stylesheet = format!("{}/css/bootstrap-ui.css", ui.url);
        ui.stylesheets.add(base_stylesheet, Some(UI_KEY))?;

        ui.assign(VAR_URL, ui.url.clone());
        ui.set_page_meta(
            config
                .site
                .request_path
                .as_deref()
                .map(PageMeta::from_request_path)
                .unwrap_or_default(),
        );
        ui.assign(VAR_NAVBAR_ACTIVE, false);
        ui.assign("module_datepicker", MODULE_DATEPICKER);
        ui.assign("module_colorpicker", MODULE_COLORPICKER);
        ui.assign("module_sortable", MODULE_SORTABLE);

        tracing::info!(
            url = %ui.url,
            templates = ui.engine.template_dirs().len(),
            configs = ui.config_dirs.len(),
            "BootstrapUi ready"
        );
        Ok(ui)
    }

    /// Whether a facade is currently alive in this process
    #[must_use]
    pub fn is_live() -> bool {
        InstanceSlot::is_claimed()
    }

    // =========================================================================
    // Directories
    // =========================================================================

    /// Template directories, in search order
    #[must_use]
    pub fn template_dirs(&self) -> IndexMap<String, PathBuf> {
        self.engine.template_dirs()
    }

    /// Add a template directory
    ///
    /// Without a key the directory is stored under `app`. An existing key is
    /// replaced in place; a new key is searched before every other directory.
    ///
    /// # Errors
    ///
    /// Returns the [`ensure_readable`] error if the directory is unusable; the
    /// search path is then left unchanged.
    pub fn add_template_dir(&mut self, dir: impl Into<PathBuf>, key: Option<&str>) -> Result<()> {
        let dir = dir.into();
        ensure_readable(&dir)?;

        let mut dirs = self.engine.template_dirs();
        insert_dir(&mut dirs, key, dir);
        self.engine.set_template_dirs(dirs);
        Ok(())
    }

    /// Config directories, in search order
    #[must_use]
    pub const fn config_dirs(&self) -> &IndexMap<String, PathBuf> {
        &self.config_dirs
    }

    /// Add a config directory, with the same key rules as [`Self::add_template_dir`]
    ///
    /// # Errors
    ///
    /// Returns the [`ensure_readable`] error if the directory is unusable.
    pub fn add_config_dir(&mut self, dir: impl Into<PathBuf>, key: Option<&str>) -> Result<()> {
        let dir = dir.into();
        ensure_readable(&dir)?;
        insert_dir(&mut self.config_dirs, key, dir);
        Ok(())
    }

    /// Compile directory
    #[must_use]
    pub fn compile_dir(&self) -> &Path {
        &self.compile_dir
    }

    /// Cache directory
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// URL of the UI files
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.url
    }

    // =========================================================================
    // Assets
    // =========================================================================

    /// Add stylesheet URL(s), see [`AssetRegistry::add`]
    ///
    /// # Errors
    ///
    /// Returns [`NotAUrl`](crate::error::BootstrapUiError::NotAUrl)
    /// if a value is not a URL; no stylesheet is added then.
    pub fn add_stylesheet(
        &mut self,
        stylesheet: impl Into<AssetInput>,
        key: Option<&str>,
    ) -> Result<()> {
        self.stylesheets.add(stylesheet, key)
    }

    /// Stylesheets whose key is `key` or `key-<n>`; all of them without a key
    #[must_use]
    pub fn stylesheets(&self, key: Option<&str>) -> IndexMap<String, String> {
        self.stylesheets.select(key)
    }

    /// Add script URL(s), loaded after jQuery and Bootstrap
    ///
    /// # Errors
    ///
    /// Returns [`NotAUrl`](crate::error::BootstrapUiError::NotAUrl)
    /// if a value is not a URL.
    pub fn add_script(&mut self, script: impl Into<AssetInput>, key: Option<&str>) -> Result<()> {
        self.scripts.add(script, key)
    }

    /// Scripts whose key is `key` or `key-<n>`; all of them without a key
    #[must_use]
    pub fn scripts(&self, key: Option<&str>) -> IndexMap<String, String> {
        self.scripts.select(key)
    }

    /// Add JavaScript snippet(s), run once the scripts are loaded
    ///
    /// # Errors
    ///
    /// Snippets are not checked; this only fails for symmetry with the URL
    /// registries and currently always succeeds.
    pub fn add_script_snippet(
        &mut self,
        snippet: impl Into<AssetInput>,
        key: Option<&str>,
    ) -> Result<()> {
        self.snippets.add(snippet, key)
    }

    /// Snippets whose key is `key` or `key-<n>`; all of them without a key
    #[must_use]
    pub fn script_snippets(&self, key: Option<&str>) -> IndexMap<String, String> {
        self.snippets.select(key)
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// Enable a widget module by identifier
    ///
    /// Returns `false`, changing nothing, for an unknown identifier. Enabling
    /// a module twice leaves the registries as after the first time.
    ///
    /// # Errors
    ///
    /// Returns [`NotAUrl`](crate::error::BootstrapUiError::NotAUrl)
    /// if the asset URLs cannot be built from the site settings; the
    /// registries are then left unchanged.
    pub fn enable(&mut self, module: &str) -> Result<bool> {
        let Some(module) = UiModule::from_identifier(module) else {
            tracing::debug!(module, "Unknown UI module, nothing enabled");
            return Ok(false);
        };
        self.enable_module(module)?;
        Ok(true)
    }

    /// Enable a widget module
    ///
    /// # Errors
    ///
    /// See [`Self::enable`].
    pub fn enable_module(&mut self, module: UiModule) -> Result<()> {
        let descriptor = module.descriptor();
        let key = module.identifier();

        let mut stylesheets = self.stylesheets.clone();
        let mut scripts = self.scripts.clone();
        let mut snippets = self.snippets.clone();

        let stylesheet = self.asset_url(descriptor.stylesheet);
        stylesheets.add(stylesheet, Some(key))?;
        for script in descriptor.scripts {
            let script_key = module.script_key(script);
            scripts.add(self.asset_url(script.path), Some(&script_key))?;
        }
        if let Some(snippet) = descriptor.snippet {
            snippets.add(snippet, Some(key))?;
        }

        self.stylesheets = stylesheets;
        self.scripts = scripts;
        self.snippets = snippets;
        tracing::debug!(module = key, "UI module enabled");
        Ok(())
    }

    fn asset_url(&self, path: &str) -> String {
        format!("{}/{path}", self.asset_root)
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Queue a message for display
    pub fn add_message(&mut self, title: &str, content: &str, level: impl Into<MessageLevel>) {
        let message = NotificationMessage::new(title, content, level);
        self.messages.push(message);
    }

    /// Queue an already built message
    pub fn push_message(&mut self, message: NotificationMessage) {
        self.messages.push(message);
    }

    /// Pending messages, in the order they were added
    #[must_use]
    pub fn messages(&self) -> &[NotificationMessage] {
        &self.messages
    }

    /// Drop every pending message
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    // =========================================================================
    // Template variables
    // =========================================================================

    /// Assign a template variable
    pub fn assign(&mut self, name: impl Into<String>, value: impl Serialize) {
        let value = Value::from_serialize(&value);
        self.context.insert(name.into(), value);
    }

    /// Assign a template variable holding trusted HTML, which is not escaped
    pub fn assign_html(&mut self, name: impl Into<String>, html: impl Into<String>) {
        let html = Value::from_safe_string(html.into());
        self.context.insert(name.into(), html);
    }

    /// Current value of a template variable
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.context.get(name)
    }

    /// Re-derive the page name and category from a request path
    pub fn set_request_path(&mut self, request_path: &str) {
        self.set_page_meta(PageMeta::from_request_path(request_path));
    }

    fn set_page_meta(&mut self, page: PageMeta) {
        self.assign(VAR_NAME, page.name);
        self.assign(VAR_CATEGORY, page.category);
    }

    /// Assign every top-level key of a TOML file found in the config directories
    ///
    /// # Errors
    ///
    /// Returns error if no config directory holds `name`, or it cannot be read
    /// or parsed.
    pub fn load_config_file(&mut self, name: &str) -> std::result::Result<(), TemplateError> {
        let vars = read_config_vars(&self.config_dirs, name)?;
        tracing::debug!(file = name, variables = vars.len(), "Config file loaded");
        self.context.extend(vars);
        Ok(())
    }

    /// The template engine, e.g. to register filters
    pub const fn engine_mut(&mut self) -> &mut TemplateEngine {
        &mut self.engine
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render a template with the messages and asset registries assigned
    ///
    /// # Errors
    ///
    /// Returns error if the template is not found or rendering fails.
    pub fn display(&mut self, template: &str) -> std::result::Result<String, TemplateError> {
        self.publish_ui_state();
        tracing::debug!(template, "Rendering page");
        self.engine.render(template, &self.context)
    }

    /// Render the default template (`page.html` unless configured otherwise)
    ///
    /// # Errors
    ///
    /// Returns error if the template is not found or rendering fails.
    pub fn display_page(&mut self) -> std::result::Result<String, TemplateError> {
        let template = self.default_template.clone();
        self.display(&template)
    }

    /// Render a template into `out`
    ///
    /// # Errors
    ///
    /// Returns error if the template is not found, rendering fails or `out`
    /// cannot be written.
    pub fn display_to<W: io::Write>(
        &mut self,
        template: &str,
        out: W,
    ) -> std::result::Result<(), TemplateError> {
        self.publish_ui_state();
        tracing::debug!(template, "Rendering page");
        self.engine.render_to_write(template, &self.context, out)
    }

    fn publish_ui_state(&mut self) {
        let messages: Vec<Value> = self
            .messages
            .iter()
            .map(|message| {
                context! {
                    title => Value::from_safe_string(message.title().to_string()),
                    content => Value::from_safe_string(message.content().to_string()),
                    class => message.css_class(),
                }
            })
            .collect();

        let stylesheets = registry_entries(&self.stylesheets);
        let scripts = registry_entries(&self.scripts);
        let snippets = registry_entries(&self.snippets);

        let context = &mut self.context;
        context.insert(VAR_MESSAGES.to_string(), Value::from(messages));
        context.insert(VAR_STYLESHEETS.to_string(), stylesheets);
        context.insert(VAR_SCRIPTS.to_string(), scripts);
        context.insert(VAR_SCRIPT_SNIPPETS.to_string(), snippets);
    }
}

/// Registry snapshot as a list of `{key, url}` or `{key, code}` maps, in registry order
fn registry_entries(registry: &AssetRegistry) -> Value {
    registry
        .entries()
        .iter()
        .map(|(key, value)| {
            let value = Value::from_safe_string(value.clone());
            match registry.kind() {
                AssetKind::Url => context! { key => key, url => value },
                AssetKind::Snippet => context! { key => key, code => value },
            }
        })
        .collect::<Vec<_>>()
        .into()
}

fn insert_dir(dirs: &mut IndexMap<String, PathBuf>, key: Option<&str>, dir: PathBuf) {
    let key = key.filter(|k| !k.is_empty()).unwrap_or(APP_KEY);
    if dirs.contains_key(key) {
        dirs.insert(key.to_string(), dir);
    } else {
        dirs.shift_insert(0, key.to_string(), dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dir_replaces_in_place() {
        let mut dirs = IndexMap::from([
            ("app".to_string(), PathBuf::from("/old")),
            ("BootstrapUi".to_string(), PathBuf::from("/ui")),
        ]);
        insert_dir(&mut dirs, None, PathBuf::from("/new"));
        assert_eq!(
            dirs.get_index(0),
            Some((&"app".to_string(), &PathBuf::from("/new")))
        );
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn test_insert_dir_puts_new_key_first() {
        let mut dirs = IndexMap::from([("BootstrapUi".to_string(), PathBuf::from("/ui"))]);
        insert_dir(&mut dirs, Some("admin"), PathBuf::from("/admin"));
        let keys: Vec<_> = dirs.keys().map(String::as_str).collect();
        assert_eq!(keys, ["admin", "BootstrapUi"]);
    }

    #[test]
    fn test_registry_entries_keep_order() {
        let mut registry = AssetRegistry::scripts();
        registry.add("/js/b.js", Some("b")).unwrap();
        registry.add("/js/a.js", Some("a")).unwrap();

        let value = registry_entries(&registry);
        let keys: Vec<String> = value
            .try_iter()
            .unwrap()
            .map(|entry| entry.get_attr("key").unwrap().to_string())
            .collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
