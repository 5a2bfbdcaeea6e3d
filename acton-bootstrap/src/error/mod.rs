//! Error types and error handling

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or mutating a [`BootstrapUi`](crate::ui::BootstrapUi)
///
/// Every failure of the facade core maps to exactly one of these kinds. None
/// of them are retried internally.
#[derive(Debug, Error)]
pub enum BootstrapUiError {
    /// A second facade was constructed while one is still alive
    #[error("BootstrapUi already exists; pass that instance by reference")]
    SingletonViolation,

    /// A directory that needs to be readable is not
    #[error("the directory '{}' is not readable", path.display())]
    UnreadableDirectory {
        /// Offending directory
        path: PathBuf,
    },

    /// A directory that needs to be writable is not
    #[error("the directory '{}' is not writable", path.display())]
    UnwritableDirectory {
        /// Offending directory
        path: PathBuf,
    },

    /// A directory that should have existed (and been populated) did not
    #[error("the directory '{}' was missing and created empty", path.display())]
    MissingFiles {
        /// Directory that was created
        path: PathBuf,
    },

    /// A URL was expected, but not received
    #[error("'{0}' is not a URL")]
    NotAUrl(String),
}

impl BootstrapUiError {
    /// Directory involved in the failure, if any
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::UnreadableDirectory { path }
            | Self::UnwritableDirectory { path }
            | Self::MissingFiles { path } => Some(path),
            Self::SingletonViolation | Self::NotAUrl(_) => None,
        }
    }
}

/// Result alias for facade operations
pub type Result<T> = std::result::Result<T, BootstrapUiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_directory() {
        let err = BootstrapUiError::MissingFiles {
            path: PathBuf::from("/srv/ui/templates"),
        };
        assert!(err.to_string().contains("/srv/ui/templates"));
        assert_eq!(err.path(), Some(std::path::Path::new("/srv/ui/templates")));
    }

    #[test]
    fn test_not_a_url_has_no_path() {
        let err = BootstrapUiError::NotAUrl("not a url".to_string());
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "'not a url' is not a URL");
    }
}
