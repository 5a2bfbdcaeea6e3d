//! acton-bootstrap: Bootstrap UI defaults for minijinja-rendered pages
//!
//! A thin layer over minijinja that adds what a Bootstrap 3 page needs:
//! - **Directories**: template, config, compile and cache directories merged
//!   with the built-in UI root and checked once at startup
//! - **Assets**: ordered, keyed stylesheet, script and snippet registries
//! - **Modules**: one-call enabling of bundled widget plugins
//! - **Messages**: dismissible alert boxes with styled links
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_bootstrap::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     acton_bootstrap::observability::init()?;
//!
//!     let config = BootstrapUiConfig::load_for_service("my-app")?
//!         .with_template_dir("./templates")
//!         .with_request_path("/forms/sign-up.php");
//!     let mut ui = BootstrapUi::new(config)?;
//!
//!     ui.add_message("Welcome", "Fill in the form below.", MessageLevel::Info);
//!     ui.enable(MODULE_DATEPICKER)?;
//!
//!     println!("{}", ui.display_page()?);
//!     Ok(())
//! }
//! ```
//!
//! # Template variables
//!
//! On every render the facade assigns `ui_messages`, `ui_stylesheets`,
//! `ui_scripts` and `ui_script_snippets`. `bootstrap_ui_url`, `name`,
//! `category`, `navbar_active` and the `module_*` identifiers are assigned
//! at construction.

pub mod assets;
pub mod config;
pub mod directory;
pub mod error;
pub mod message;
pub mod modules;
pub mod observability;
pub mod template;
pub mod ui;

pub mod prelude {
    //! Convenience re-exports for common types
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_bootstrap::prelude::*;
    //! ```

    pub use crate::assets::{AssetInput, AssetKind, AssetRegistry};
    pub use crate::config::BootstrapUiConfig;
    pub use crate::directory::DirectorySpec;
    pub use crate::error::{BootstrapUiError, Result};
    pub use crate::message::{MessageLevel, NotificationMessage};
    pub use crate::modules::{UiModule, MODULE_COLORPICKER, MODULE_DATEPICKER, MODULE_SORTABLE};
    pub use crate::template::{TemplateEngine, TemplateError};
    pub use crate::ui::BootstrapUi;

    pub use indexmap::IndexMap;
    pub use minijinja;
}
