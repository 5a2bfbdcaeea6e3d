//! Readability and writability checks for the directories the engine uses
//!
//! The checks fail with an error _rather than_ returning `false`: no page can
//! be displayed when these directories are unusable, so an application that
//! can work around a missing directory has to handle the error explicitly.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{BootstrapUiError, Result};

/// Mode applied when repairing a directory that must be readable
pub const READABLE_MODE: u32 = 0o550;

/// Mode applied when repairing a directory that must be writable
pub const WRITABLE_MODE: u32 = 0o770;

/// Check that `path` is a readable directory
///
/// A missing directory is created, but the check still fails with
/// [`BootstrapUiError::MissingFiles`]: its contents were expected to exist.
/// An unreadable directory gets one permission repair ([`READABLE_MODE`]).
///
/// # Errors
///
/// - [`BootstrapUiError::MissingFiles`] if the directory did not exist
/// - [`BootstrapUiError::UnreadableDirectory`] if the path is not a directory
///   or cannot be made readable
pub fn ensure_readable(path: &Path) -> Result<()> {
    if !path.exists() {
        match fs::create_dir_all(path) {
            Ok(()) => tracing::warn!(path = %path.display(), "Created missing directory"),
            Err(e) => tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to create missing directory"
            ),
        }
        return Err(BootstrapUiError::MissingFiles {
            path: path.to_path_buf(),
        });
    }

    if !path.is_dir() {
        tracing::error!(
            path = %path.display(),
            "Expected a readable directory, found a file"
        );
        return Err(BootstrapUiError::UnreadableDirectory {
            path: path.to_path_buf(),
        });
    }

    if is_readable(path) {
        tracing::debug!(path = %path.display(), "Directory is readable");
        return Ok(());
    }

    tracing::warn!(
        path = %path.display(),
        mode = format_args!("{READABLE_MODE:o}"),
        "Repairing directory permissions"
    );
    if repair(path, READABLE_MODE).is_ok() && is_readable(path) {
        Ok(())
    } else {
        tracing::error!(path = %path.display(), "Directory is not readable");
        Err(BootstrapUiError::UnreadableDirectory {
            path: path.to_path_buf(),
        })
    }
}

/// Check that `path` is a writable directory
///
/// A missing directory is created. An unwritable directory gets one
/// permission repair ([`WRITABLE_MODE`]).
///
/// # Errors
///
/// Returns [`BootstrapUiError::UnwritableDirectory`] if the directory cannot
/// be created, is not a directory, or cannot be made writable.
pub fn ensure_writable(path: &Path) -> Result<()> {
    let unwritable = || BootstrapUiError::UnwritableDirectory {
        path: path.to_path_buf(),
    };

    if !path.exists() {
        return match fs::create_dir_all(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Created writable directory");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to create directory"
                );
                Err(unwritable())
            }
        };
    }

    if !path.is_dir() {
        tracing::error!(
            path = %path.display(),
            "Expected a writable directory, found a file"
        );
        return Err(unwritable());
    }

    if is_writable(path) {
        tracing::debug!(path = %path.display(), "Directory is writable");
        return Ok(());
    }

    tracing::warn!(
        path = %path.display(),
        mode = format_args!("{WRITABLE_MODE:o}"),
        "Repairing directory permissions"
    );
    if repair(path, WRITABLE_MODE).is_ok() && is_writable(path) {
        Ok(())
    } else {
        tracing::error!(path = %path.display(), "Directory is not writable");
        Err(unwritable())
    }
}

fn is_readable(path: &Path) -> bool {
    fs::read_dir(path).is_ok()
}

// The check file is removed when it goes out of scope.
fn is_writable(path: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(".acton-bootstrap-write-check")
        .tempfile_in(path)
        .is_ok()
}

#[cfg(unix)]
fn repair(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn repair(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_directory_is_readable_and_writable() {
        let temp = TempDir::new().unwrap();
        assert!(ensure_readable(temp.path()).is_ok());
        assert!(ensure_writable(temp.path()).is_ok());
    }

    #[test]
    fn test_missing_writable_directory_is_created() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("templates_c");

        ensure_writable(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_missing_readable_directory_is_created_but_fails() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("templates");

        let err = ensure_readable(&dir).unwrap_err();
        assert!(matches!(err, BootstrapUiError::MissingFiles { .. }));
        assert_eq!(err.path(), Some(dir.as_path()));
        assert!(dir.is_dir());

        // Now that it exists, the directory passes
        assert!(ensure_readable(&dir).is_ok());
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("page.html");
        fs::write(&file, "<p>page</p>").unwrap();

        assert!(matches!(
            ensure_readable(&file),
            Err(BootstrapUiError::UnreadableDirectory { .. })
        ));
        assert!(matches!(
            ensure_writable(&file),
            Err(BootstrapUiError::UnwritableDirectory { .. })
        ));
    }

    /// Uid the tests run as, taken from a file they create
    #[cfg(unix)]
    fn current_uid(temp: &TempDir) -> u32 {
        use std::os::unix::fs::MetadataExt;

        let marker = temp.path().join("owner");
        fs::write(&marker, "").unwrap();
        fs::metadata(&marker).unwrap().uid()
    }

    #[cfg(unix)]
    #[test]
    fn test_repair_applies_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        // root passes the checks without any repair
        if current_uid(&temp) == 0 {
            return;
        }

        let readable = temp.path().join("configs");
        let writable = temp.path().join("cache");
        fs::create_dir(&readable).unwrap();
        fs::create_dir(&writable).unwrap();
        fs::set_permissions(&readable, fs::Permissions::from_mode(0o000)).unwrap();
        fs::set_permissions(&writable, fs::Permissions::from_mode(0o500)).unwrap();

        ensure_readable(&readable).unwrap();
        ensure_writable(&writable).unwrap();

        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&readable), READABLE_MODE);
        assert_eq!(mode(&writable), WRITABLE_MODE);
        assert!(fs::read_dir(&readable).is_ok());
        assert!(fs::write(writable.join("entry"), "x").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_unrepairable_directory_is_unwritable() {
        use std::os::unix::fs::MetadataExt;

        let temp = TempDir::new().unwrap();
        let uid = current_uid(&temp);
        let root_dir = Path::new("/");
        // Needs a user that can neither write to nor chmod `/`
        if uid == 0 || fs::metadata(root_dir).unwrap().uid() == uid {
            return;
        }

        let err = ensure_writable(root_dir).unwrap_err();
        assert!(matches!(err, BootstrapUiError::UnwritableDirectory { .. }));
        assert_eq!(err.path(), Some(root_dir));
    }
}
