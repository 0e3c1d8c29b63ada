use std::path::PathBuf;

use crate::types::QATRACK_DIR;

/// Returns the root qatrack directory path.
///
/// Resolution order:
/// 1. `QATRACK_ROOT` environment variable (if set)
/// 2. Current working directory + `.qatrack`
pub fn qatrack_root() -> PathBuf {
    if let Ok(root) = std::env::var("QATRACK_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(QATRACK_DIR)
    }
}

/// Returns the directory holding one sub-directory per user scope.
pub fn scopes_dir() -> PathBuf {
    qatrack_root().join("scopes")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    qatrack_root().join("config.yaml")
}
