use serde_json::json;

use super::{CommandOutput, case_minimal_json, open_session};
use crate::cli::OutputOptions;
use crate::error::Result;

/// Mark a test case as critical
pub async fn cmd_critical(user: Option<&str>, id: &str, output: OutputOptions) -> Result<()> {
    let (_, mut session) = open_session(user).await?;
    let case = session.set_critical(id).await?;

    CommandOutput::new(json!({
        "case": case_minimal_json(&case),
        "action": "priority_changed",
    }))
    .with_text(format!("{} is now {}", case.id, case.priority))
    .print(output)
}
