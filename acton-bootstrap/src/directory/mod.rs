//! Directory resolution and validation
//!
//! The facade works with four directories:
//!
//! - **template** directories, searched in order when a template is loaded
//! - **config** directories, searched in order by
//!   [`BootstrapUi::load_config_file`](crate::ui::BootstrapUi::load_config_file)
//! - a **compile** directory and a **cache** directory, which must be writable
//!
//! Application-supplied directories are merged with the built-in defaults
//! (see [`merge`]) and validated once (see [`guard`]).

pub mod guard;
pub mod merge;

pub use guard::{ensure_readable, ensure_writable, READABLE_MODE, WRITABLE_MODE};
pub use merge::{merge_keyed, merge_scalar, DirectorySpec};

/// Key of the application entry in template and config directory lists
pub const APP_KEY: &str = "app";

/// Key of the built-in entry in template and config directory lists
pub const UI_KEY: &str = "BootstrapUi";
