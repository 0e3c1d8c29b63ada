use serde_json::json;

use super::{CaseFields, CommandOutput, check_priority, open_session};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::types::TestCaseDraft;

/// Create a new test case
pub async fn cmd_add(user: Option<&str>, fields: CaseFields, output: OutputOptions) -> Result<()> {
    let (config, mut session) = open_session(user).await?;
    if let Some(priority) = fields.priority.as_deref() {
        check_priority(&config, priority);
    }

    let draft = TestCaseDraft {
        id: None,
        title: fields.title.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        steps: fields.steps.unwrap_or_default(),
        expected_result: fields.expected.unwrap_or_default(),
        status: fields.status.unwrap_or_default(),
        priority: fields.priority.unwrap_or_default(),
        notes: fields.notes.unwrap_or_default(),
    };
    let case = session.save(draft).await?;

    CommandOutput::new(json!({
        "id": case.id,
        "title": case.title,
        "status": case.status.label(),
        "priority": case.priority,
        "created": case.created.to_string(),
    }))
    .with_text(case.id.to_string())
    .print(output)
}
