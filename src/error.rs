use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("test case '{0}' not found")]
    NotFound(String),

    #[error("ambiguous ID '{0}' matches multiple test cases: {matches}", matches = .1.join(", "))]
    AmbiguousId(String, Vec<String>),

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("title is too long ({actual} characters, max {max})")]
    TitleTooLong { max: usize, actual: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid test case ID '{0}'")]
    InvalidId(String),

    #[error("invalid user scope '{0}': {1}")]
    InvalidScope(String, String),

    #[error("no active user. Pass --user, set QATRACK_USER, or run: qatrack config set user <name>")]
    NoActiveUser,

    #[error("invalid status '{0}'. Must be one of: pass, fail, unset")]
    InvalidStatus(String),

    #[error("invalid sort key '{0}'")]
    InvalidSortKey(String),

    #[error("invalid export format '{0}'. Must be one of: csv, table")]
    InvalidExportFormat(String),

    #[error("failed to {operation} {item_type} at {}: {source}", crate::utils::format_relative_path(.path))]
    StorageError {
        operation: &'static str,
        item_type: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, QaError>;
