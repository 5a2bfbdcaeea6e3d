//! Ordered, keyed registries of stylesheets, scripts and script snippets
//!
//! Each registry maps a unique key to a URL (stylesheets, scripts) or to
//! inline JavaScript (snippets). Keys keep their first insertion position;
//! adding under an existing key replaces the value in place.
//!
//! # Examples
//!
//! ```rust
//! use acton_bootstrap::assets::AssetRegistry;
//!
//! let mut stylesheets = AssetRegistry::stylesheets();
//! stylesheets.add("/css/app.css", None)?;
//! stylesheets.add(vec!["/css/print.css", "/css/forms.css"], Some("extra"))?;
//!
//! let keys: Vec<_> = stylesheets.entries().keys().map(String::as_str).collect();
//! assert_eq!(keys, ["app", "extra-1", "extra-2"]);
//! assert_eq!(stylesheets.select(Some("extra")).len(), 2);
//! # Ok::<(), acton_bootstrap::error::BootstrapUiError>(())
//! ```

use indexmap::IndexMap;
use regex::Regex;
use std::collections::BTreeSet;

use crate::directory::APP_KEY;
use crate::error::{BootstrapUiError, Result};

/// What a registry stores, which decides how values are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Stylesheet or script URLs
    Url,
    /// Inline JavaScript, never checked
    Snippet,
}

/// Value(s) handed to [`AssetRegistry::add`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetInput {
    /// One URL or snippet
    Single(String),
    /// Unkeyed values, numbered under the add key
    List(Vec<String>),
    /// Values under caller-chosen keys, added as-is
    Keyed(IndexMap<String, String>),
}

impl From<&str> for AssetInput {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for AssetInput {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for AssetInput {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for AssetInput {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AssetInput {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<IndexMap<String, String>> for AssetInput {
    fn from(values: IndexMap<String, String>) -> Self {
        Self::Keyed(values)
    }
}

/// Ordered, uniquely keyed collection of asset entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRegistry {
    kind: AssetKind,
    default_key: String,
    entries: IndexMap<String, String>,
}

impl AssetRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(kind: AssetKind, default_key: impl Into<String>) -> Self {
        Self {
            kind,
            default_key: default_key.into(),
            entries: IndexMap::new(),
        }
    }

    /// Registry of stylesheet URLs
    #[must_use]
    pub fn stylesheets() -> Self {
        Self::new(AssetKind::Url, APP_KEY)
    }

    /// Registry of script URLs
    #[must_use]
    pub fn scripts() -> Self {
        Self::new(AssetKind::Url, APP_KEY)
    }

    /// Registry of inline script snippets
    #[must_use]
    pub fn snippets() -> Self {
        Self::new(AssetKind::Snippet, APP_KEY)
    }

    /// Add one or more entries
    ///
    /// - A single value is stored under `key`, or the registry's default key.
    /// - A list is stored under `{key}-{n}`, continuing after the highest
    ///   number already used for `key`. Once that number is `usize::MAX`
    ///   the lowest unused numbers are taken instead.
    /// - A keyed map is merged as-is; its values are not checked.
    ///
    /// An empty `key` is the same as no key. On error the registry is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapUiError::NotAUrl`] if a single or listed value of a
    /// URL registry is not a URL.
    pub fn add(&mut self, input: impl Into<AssetInput>, key: Option<&str>) -> Result<()> {
        let key = key
            .filter(|k| !k.is_empty())
            .unwrap_or(&self.default_key)
            .to_string();

        match input.into() {
            AssetInput::Single(value) => {
                self.check(&value)?;
                self.entries.insert(key, value);
            }
            AssetInput::List(values) => {
                for value in &values {
                    self.check(value)?;
                }
                let numbers = self.next_numbers(&key, values.len());
                for (number, value) in numbers.into_iter().zip(values) {
                    self.entries.insert(format!("{key}-{number}"), value);
                }
            }
            AssetInput::Keyed(values) => self.entries.extend(values),
        }
        Ok(())
    }

    /// Entries matching `filter`, in insertion order
    ///
    /// Without a filter every entry is returned. With a filter, entries whose
    /// key is exactly `filter` or `filter-<digits>` are returned.
    #[must_use]
    pub fn select(&self, filter: Option<&str>) -> IndexMap<String, String> {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return self.entries.clone();
        };

        let numbered = numbered_key(filter);
        self.entries
            .iter()
            .filter(|(key, _)| key.as_str() == filter || numbered.is_match(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// All entries, in insertion order
    #[must_use]
    pub const fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    /// Value stored under exactly `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// What this registry stores
    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        self.kind
    }

    fn check(&self, value: &str) -> Result<()> {
        if self.kind == AssetKind::Url && !looks_like_url(value) {
            return Err(BootstrapUiError::NotAUrl(value.to_string()));
        }
        Ok(())
    }

    /// Numbers for `count` new `{key}-{n}` entries
    ///
    /// Numbering continues after the highest number in use. If that would
    /// overflow, the lowest unused numbers are taken instead.
    fn next_numbers(&self, key: &str, count: usize) -> Vec<usize> {
        let numbered = numbered_key(key);
        let used: BTreeSet<usize> = self
            .entries
            .keys()
            .filter_map(|existing| numbered.captures(existing))
            .filter_map(|caps| caps[1].parse::<usize>().ok())
            .collect();

        let span = count.saturating_sub(1);
        let start = used.last().map_or(Some(1), |n| n.checked_add(1));
        match start.and_then(|s| s.checked_add(span).map(|last| (s, last))) {
            Some((start, last)) if count > 0 => (start..=last).collect(),
            _ => {
                let free = (1..=usize::MAX).filter(|n| !used.contains(n));
                free.take(count).collect()
            }
        }
    }
}

fn numbered_key(key: &str) -> Regex {
    // Escaped input always yields a valid pattern
    Regex::new(&format!(r"^{}-(\d+)$", regex::escape(key)))
        .unwrap_or_else(|_| unreachable!("escaped key produced an invalid pattern"))
}

/// Loose URL shape check: absolute or relative, but never blank or spaced
fn looks_like_url(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c.is_whitespace() || c.is_control())
}
