//! Async file I/O helpers used by the file-backed store

use std::io;
use std::path::Path;

use tokio::fs as tokio_fs;

use crate::error::{QaError, Result};

/// Read file content, returning `None` if the file does not exist.
pub async fn read_file_if_exists(path: &Path) -> Result<Option<String>> {
    match tokio_fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(QaError::StorageError {
            operation: "read",
            item_type: "file",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write file atomically using temp file and rename.
///
/// The original file is never left in a partially written state.
pub async fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path).await?;

    let temp_path = path.with_extension("tmp");

    tokio_fs::write(&temp_path, content)
        .await
        .map_err(|e| QaError::StorageError {
            operation: "write",
            item_type: "file",
            path: temp_path.clone(),
            source: e,
        })?;

    tokio_fs::rename(&temp_path, path)
        .await
        .map_err(|e| QaError::StorageError {
            operation: "rename",
            item_type: "file",
            path: path.to_path_buf(),
            source: e,
        })
}

/// Ensure parent directory exists
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio_fs::create_dir_all(parent)
            .await
            .map_err(|e| QaError::StorageError {
                operation: "create",
                item_type: "directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    Ok(())
}

/// Delete a file. Returns `false` if it was already gone.
pub async fn delete_file(path: &Path) -> Result<bool> {
    match tokio_fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(QaError::StorageError {
            operation: "delete",
            item_type: "file",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
