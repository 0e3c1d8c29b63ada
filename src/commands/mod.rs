mod add;
mod config;
mod critical;
mod edit;
mod history;
mod interchange;
mod ls;
mod rm;
mod show;
mod stats;

pub use add::cmd_add;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use critical::cmd_critical;
pub use edit::cmd_edit;
pub use history::{cmd_history, cmd_trend};
pub use interchange::{cmd_export, cmd_import};
pub use ls::{LsOptions, cmd_ls};
pub use rm::{cmd_clear, cmd_rm};
pub use show::cmd_show;
pub use stats::cmd_stats;

use std::sync::Arc;

use serde_json::{Value, json};

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use crate::store::{FileStore, RecordStore};
use crate::types::{TestCase, TestStatus, normalize_priority};

/// Editable fields shared by `add` and `edit`.
#[derive(Debug, Clone, Default)]
pub struct CaseFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub expected: Option<String>,
    pub status: Option<TestStatus>,
    pub notes: Option<String>,
    pub priority: Option<String>,
}

impl CaseFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.steps.is_none()
            && self.expected.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.priority.is_none()
    }
}

/// Result of a command, printable as text or JSON.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        CommandOutput { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load configuration, resolve the active scope and log in.
pub async fn open_session(user: Option<&str>) -> Result<(Config, Session)> {
    let config = Config::load()?;
    let scope = config.active_scope(user)?;
    let store: Arc<dyn RecordStore> = Arc::new(FileStore::from_env());
    let session = Session::login(store, scope)
        .await?
        .with_trend_capacity(config.trend_capacity);
    Ok((config, session))
}

/// Warn when a priority is not one of the configured labels.
pub(crate) fn check_priority(config: &Config, raw: &str) {
    let priority = normalize_priority(raw);
    if !priority.is_empty() && !config.priorities.iter().any(|p| *p == priority) {
        tracing::warn!(
            priority = %priority,
            known = %config.priorities.join(", "),
            "priority is not one of the configured labels"
        );
    }
}

/// Compact JSON form of a record for command results.
pub fn case_minimal_json(case: &TestCase) -> Value {
    json!({
        "id": case.id,
        "title": case.title,
        "status": case.status.label(),
        "priority": case.priority,
    })
}
