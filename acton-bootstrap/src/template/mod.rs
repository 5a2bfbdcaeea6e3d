//! minijinja integration
//!
//! This module provides:
//! - [`TemplateEngine`]: a minijinja environment whose loader searches an
//!   ordered list of template directories
//! - [`PageMeta`]: page name and category derived from the request path
//! - [`TemplateError`]: failures reported by the engine
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_bootstrap::config::EngineSettings;
//! use acton_bootstrap::template::TemplateEngine;
//! use indexmap::IndexMap;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), acton_bootstrap::template::TemplateError> {
//! let dirs = IndexMap::from([("app".to_string(), PathBuf::from("./templates"))]);
//! let engine = TemplateEngine::new(dirs, &EngineSettings::default());
//!
//! let context = IndexMap::from([("name".to_string(), minijinja::Value::from("Home"))]);
//! let html = engine.render("page.html", &context)?;
//! # Ok(())
//! # }
//! ```

mod engine;
mod page;

pub use engine::{TemplateEngine, TemplateError};
pub use page::PageMeta;

pub(crate) use engine::read_config_vars;
