pub mod id;
pub mod validation;

use std::io;
use std::path::Path;

use crate::error::QaError;
use crate::paths::qatrack_root;

pub use id::{generate_case_id, generate_hash, generate_unique_case_id};
pub use validation::{validate_text, validate_title};

/// Format a path for display by making it relative to the qatrack root directory.
///
/// Used for user-facing output (error messages, CLI output) to avoid exposing
/// home directories and other internal paths.
pub fn format_relative_path(path: &Path) -> String {
    path.strip_prefix(qatrack_root())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

/// Wrap an IO error with the action and path that produced it.
pub fn io_context(error: io::Error, action: &str, path: &Path) -> QaError {
    QaError::Io(io::Error::new(
        error.kind(),
        format!("Failed to {action} {}: {error}", format_relative_path(path)),
    ))
}
