//! Merging application directories with the built-in defaults

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::APP_KEY;

/// Application-supplied directory specification
///
/// Configuration files may give a single path, a list of paths or a table of
/// named paths:
///
/// ```toml
/// [directories]
/// config = ["./configs", "./shared/configs"]
///
/// [directories.template]
/// admin = "./admin/templates"
/// public = "./templates"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectorySpec {
    /// One directory, keyed as [`APP_KEY`] once merged
    Single(PathBuf),
    /// Ordered directories, keyed `app-1`, `app-2`, ... once merged
    List(Vec<PathBuf>),
    /// Directories under caller-chosen keys
    Keyed(IndexMap<String, PathBuf>),
}

impl DirectorySpec {
    /// Whether no directory is named at all
    ///
    /// Empty paths count as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(path) => path.as_os_str().is_empty(),
            Self::List(paths) => paths.iter().all(|p| p.as_os_str().is_empty()),
            Self::Keyed(map) => map.values().all(|p| p.as_os_str().is_empty()),
        }
    }

    /// Flatten into keyed entries, in declaration order
    fn into_keyed(self) -> IndexMap<String, PathBuf> {
        match self {
            Self::Single(path) => IndexMap::from([(APP_KEY.to_string(), path)]),
            Self::List(paths) => paths
                .into_iter()
                .filter(|p| !p.as_os_str().is_empty())
                .enumerate()
                .map(|(i, p)| (format!("{APP_KEY}-{}", i + 1), p))
                .collect(),
            Self::Keyed(map) => map
                .into_iter()
                .filter(|(_, p)| !p.as_os_str().is_empty())
                .collect(),
        }
    }
}

impl From<PathBuf> for DirectorySpec {
    fn from(path: PathBuf) -> Self {
        Self::Single(path)
    }
}

impl From<&Path> for DirectorySpec {
    fn from(path: &Path) -> Self {
        Self::Single(path.to_path_buf())
    }
}

impl From<&str> for DirectorySpec {
    fn from(path: &str) -> Self {
        Self::Single(PathBuf::from(path))
    }
}

impl From<Vec<PathBuf>> for DirectorySpec {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::List(paths)
    }
}

impl From<IndexMap<String, PathBuf>> for DirectorySpec {
    fn from(map: IndexMap<String, PathBuf>) -> Self {
        Self::Keyed(map)
    }
}

/// Union application directories with the defaults
///
/// Application entries come first so they are searched first. When a key is
/// present on both sides, the application's path is kept. Absent or empty
/// application directories yield the defaults unchanged.
///
/// # Examples
///
/// ```rust
/// use acton_bootstrap::directory::{merge_keyed, DirectorySpec};
/// use indexmap::IndexMap;
/// use std::path::PathBuf;
///
/// let defaults = IndexMap::from([("BootstrapUi".to_string(), PathBuf::from("/ui/templates"))]);
/// let merged = merge_keyed(Some(&DirectorySpec::from("./templates")), &defaults);
/// let keys: Vec<_> = merged.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["app", "BootstrapUi"]);
/// ```
#[must_use]
pub fn merge_keyed(
    app: Option<&DirectorySpec>,
    defaults: &IndexMap<String, PathBuf>,
) -> IndexMap<String, PathBuf> {
    let Some(app) = app.filter(|dirs| !dirs.is_empty()) else {
        return defaults.clone();
    };

    let mut merged = app.clone().into_keyed();
    for (key, path) in defaults {
        merged.entry(key.clone()).or_insert_with(|| path.clone());
    }
    merged
}

/// Pick the application directory, or the default when none was given
#[must_use]
pub fn merge_scalar(app: Option<&Path>, default: &Path) -> PathBuf {
    match app {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => default.to_path_buf(),
    }
}
