//! Configuration management for acton-bootstrap
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_BOOTSTRAP_` prefix,
//!    `__` for nesting)
//! 2. `./bootstrap-ui.toml` (development)
//! 3. `~/.config/acton-bootstrap/{service_name}/config.toml` (user config, XDG)
//! 4. `/etc/acton-bootstrap/{service_name}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # bootstrap-ui.toml
//! [directories]
//! template = "./templates"
//! compile = "/var/lib/my-app/templates_c"
//!
//! [directories.config]
//! site = "./configs"
//!
//! [site]
//! secure = true
//! server_name = "www.example.com"
//! context_prefix = "/~me"
//! ui_path = "/my-app"
//!
//! [engine]
//! default_template = "page.html"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_bootstrap::config::BootstrapUiConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = BootstrapUiConfig::load_for_service("my-app")?;
//! println!("Assets served from {}", config.site.base_url());
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::directory::{DirectorySpec, UI_KEY};

/// Prefix of environment overrides; `__` separates nested keys
const ENV_PREFIX: &str = "ACTON_BOOTSTRAP_";

/// Directory holding system-wide service configs
const SYSTEM_CONFIG_ROOT: &str = "/etc/acton-bootstrap";

/// Config file picked up from the working directory
const LOCAL_CONFIG: &str = "./bootstrap-ui.toml";

/// Where the engine finds and stores its files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Root of the built-in UI files (`templates/`, `configs/`, `templates_c/`, `cache/`)
    pub ui_root: PathBuf,

    /// Application template directories, searched before the built-in ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<DirectorySpec>,

    /// Application config directories, searched before the built-in ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<DirectorySpec>,

    /// Replacement for the built-in compile directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile: Option<PathBuf>,

    /// Replacement for the built-in cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<PathBuf>,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            ui_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            template: None,
            config: None,
            compile: None,
            cache: None,
        }
    }
}

impl DirectorySettings {
    /// Built-in template directories
    #[must_use]
    pub fn default_template_dirs(&self) -> IndexMap<String, PathBuf> {
        IndexMap::from([(UI_KEY.to_string(), self.ui_root.join("templates"))])
    }

    /// Built-in config directories
    #[must_use]
    pub fn default_config_dirs(&self) -> IndexMap<String, PathBuf> {
        IndexMap::from([(UI_KEY.to_string(), self.ui_root.join("configs"))])
    }

    /// Built-in compile directory
    #[must_use]
    pub fn default_compile_dir(&self) -> PathBuf {
        self.ui_root.join("templates_c")
    }

    /// Built-in cache directory
    #[must_use]
    pub fn default_cache_dir(&self) -> PathBuf {
        self.ui_root.join("cache")
    }
}

/// How the page is reached, used to build asset URLs and page metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Serve over HTTPS
    pub secure: bool,

    /// Host name of the server
    pub server_name: String,

    /// Prefix the server maps in front of the document root (e.g. `/~user`)
    pub context_prefix: String,

    /// Path of the UI files below the document root
    pub ui_path: String,

    /// Path of vendored front-end packages below the UI path
    pub asset_prefix: String,

    /// Path of the current request, used for the page name and category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_path: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            secure: false,
            server_name: "localhost".to_string(),
            context_prefix: String::new(),
            ui_path: String::new(),
            asset_prefix: "/vendor".to_string(),
            request_path: None,
        }
    }
}

impl SiteSettings {
    /// URL of the UI files, without a trailing slash
    ///
    /// # Example
    ///
    /// ```rust
    /// use acton_bootstrap::config::SiteSettings;
    ///
    /// let site = SiteSettings {
    ///     secure: true,
    ///     server_name: "example.com".to_string(),
    ///     context_prefix: "/~me".to_string(),
    ///     ui_path: "/app/".to_string(),
    ///     ..SiteSettings::default()
    /// };
    /// assert_eq!(site.base_url(), "https://example.com/~me/app");
    /// ```
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let url = format!(
            "{scheme}://{}{}{}",
            self.server_name, self.context_prefix, self.ui_path
        );
        url.trim_end_matches('/').to_string()
    }
}

/// Template engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Template rendered by [`BootstrapUi::display_page`](crate::ui::BootstrapUi::display_page)
    pub default_template: String,

    /// Remove the first newline after a block tag
    pub trim_blocks: bool,

    /// Strip leading whitespace before a block tag
    pub lstrip_blocks: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_template: "page.html".to_string(),
            trim_blocks: true,
            lstrip_blocks: true,
        }
    }
}

/// Complete acton-bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapUiConfig {
    /// Directory settings
    #[serde(default)]
    pub directories: DirectorySettings,

    /// Site settings
    #[serde(default)]
    pub site: SiteSettings,

    /// Template engine settings
    #[serde(default)]
    pub engine: EngineSettings,
}

impl BootstrapUiConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another root for the built-in UI files
    #[must_use]
    pub fn with_ui_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.directories.ui_root = root.into();
        self
    }

    /// Set the application template directories
    #[must_use]
    pub fn with_template_dir(mut self, dirs: impl Into<DirectorySpec>) -> Self {
        self.directories.template = Some(dirs.into());
        self
    }

    /// Set the application config directories
    #[must_use]
    pub fn with_config_dir(mut self, dirs: impl Into<DirectorySpec>) -> Self {
        self.directories.config = Some(dirs.into());
        self
    }

    /// Replace the compile directory
    #[must_use]
    pub fn with_compile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.compile = Some(dir.into());
        self
    }

    /// Replace the cache directory
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.cache = Some(dir.into());
        self
    }

    /// Set the path of the current request
    #[must_use]
    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.site.request_path = Some(path.into());
        self
    }

    /// Load the configuration of `service_name`
    ///
    /// Files are applied in order, each existing one overriding the last:
    /// `/etc/acton-bootstrap/{service_name}/config.toml`,
    /// [`Self::recommended_path`], then `./bootstrap-ui.toml`.
    /// `ACTON_BOOTSTRAP_*` variables override every file.
    ///
    /// # Errors
    ///
    /// Returns error if a file cannot be parsed or a value has the wrong type.
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let candidates = [
            Path::new(SYSTEM_CONFIG_ROOT)
                .join(service_name)
                .join("config.toml"),
            Self::recommended_path(service_name),
            PathBuf::from(LOCAL_CONFIG),
        ];
        Self::extract(candidates.iter().filter(|path| path.is_file()))
    }

    /// Load the defaults overridden by one TOML file, then the environment
    ///
    /// A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be parsed or a value has the wrong
    /// type.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_bootstrap::config::BootstrapUiConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = BootstrapUiConfig::load_from("./deploy/bootstrap-ui.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        Self::extract([Path::new(path)])
    }

    /// Per-user config file of `service_name`
    ///
    /// `{config_dir}/acton-bootstrap/{service_name}/config.toml`, or
    /// `./bootstrap-ui.toml` where the platform has no config directory.
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(LOCAL_CONFIG),
            |config_dir| {
                config_dir
                    .join("acton-bootstrap")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }

    fn extract<P: AsRef<Path>>(files: impl IntoIterator<Item = P>) -> anyhow::Result<Self> {
        let defaults = Toml::string(&toml::to_string(&Self::default())?);
        let figment = files
            .into_iter()
            .fold(Figment::new().merge(defaults), |figment, file| {
                figment.merge(Toml::file(file.as_ref()))
            })
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        Ok(figment.extract()?)
    }
}
