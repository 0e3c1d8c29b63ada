use serde_json::json;

use super::{CommandOutput, open_session};
use crate::cli::OutputOptions;
use crate::error::{QaError, Result};

/// Delete a single test case
pub async fn cmd_rm(user: Option<&str>, id: &str, output: OutputOptions) -> Result<()> {
    let (_, mut session) = open_session(user).await?;
    let removed = session.delete(id).await?;

    CommandOutput::new(json!({
        "id": removed.id,
        "title": removed.title,
        "action": "deleted",
    }))
    .with_text(format!("Deleted {} ({})", removed.id, removed.title))
    .print(output)
}

/// Delete every test case of the active user
pub async fn cmd_clear(user: Option<&str>, force: bool, output: OutputOptions) -> Result<()> {
    if !force {
        return Err(QaError::InvalidInput(
            "refusing to delete all test cases without --force".to_string(),
        ));
    }

    let (_, mut session) = open_session(user).await?;
    let removed = session.delete_all().await?;

    CommandOutput::new(json!({
        "scope": session.scope().as_str(),
        "removed": removed,
    }))
    .with_text(format!("Deleted {removed} test case(s)"))
    .print(output)
}
