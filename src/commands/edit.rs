use serde_json::json;

use super::{CaseFields, CommandOutput, check_priority, open_session};
use crate::cli::OutputOptions;
use crate::error::{QaError, Result};
use crate::types::TestCaseDraft;

/// Overwrite fields of an existing test case
pub async fn cmd_edit(
    user: Option<&str>,
    id: &str,
    fields: CaseFields,
    output: OutputOptions,
) -> Result<()> {
    if fields.is_empty() {
        return Err(QaError::InvalidInput(
            "nothing to change. Pass at least one field, e.g. --status pass".to_string(),
        ));
    }

    let (config, mut session) = open_session(user).await?;
    if let Some(priority) = fields.priority.as_deref() {
        check_priority(&config, priority);
    }
    let mut draft = TestCaseDraft::from(session.resolve(id)?);

    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(steps) = fields.steps {
        draft.steps = steps;
    }
    if let Some(expected) = fields.expected {
        draft.expected_result = expected;
    }
    if let Some(status) = fields.status {
        draft.status = status;
    }
    if let Some(notes) = fields.notes {
        draft.notes = notes;
    }
    if let Some(priority) = fields.priority {
        draft.priority = priority;
    }

    let case = session.save(draft).await?;
    let detail = case
        .history
        .last()
        .map(|entry| entry.detail.clone())
        .unwrap_or_default();

    CommandOutput::new(json!({
        "id": case.id,
        "action": "edited",
        "changed": detail,
    }))
    .with_text(format!("Updated {}: {detail}", case.id))
    .print(output)
}
