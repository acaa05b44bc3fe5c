use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::AppError;

/// Filesystem primitives the creation flow and cleanup rely on
pub(crate) trait FileSystem: Send + Sync {
    /// `Ok(false)` only for "not found"; other stat failures are errors
    fn exists(&self, path: &Path) -> Result<bool, AppError>;

    fn write(&self, path: &Path, content: &str) -> Result<(), AppError>;

    /// `Ok(true)` when removed, `Ok(false)` when it was already gone
    fn delete(&self, path: &Path) -> Result<bool, AppError>;

    /// Create `path` and its parents if needed
    fn ensure_dir(&self, path: &Path) -> Result<(), AppError>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> Result<bool, AppError> {
        path.try_exists().map_err(|source| AppError::PathAccess {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), AppError> {
        fs::write(path, content).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn delete(&self, path: &Path) -> Result<bool, AppError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::Delete {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), AppError> {
        fs::create_dir_all(path).map_err(|source| AppError::Directory {
            path: path.to_path_buf(),
            source,
        })
    }
}
