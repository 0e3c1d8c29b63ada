use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::{CommandOutput, open_session};
use crate::cli::OutputOptions;
use crate::display::format_status_colored;
use crate::error::Result;

fn section(title: &str, body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    format!(
        "\n\n{}\n{}",
        title.if_supports_color(Stream::Stdout, |s| s.bold()),
        body.trim_end()
    )
}

/// Display a test case with all of its fields and history
pub async fn cmd_show(user: Option<&str>, id: &str, output: OutputOptions) -> Result<()> {
    let (_, session) = open_session(user).await?;
    let case = session.resolve(id)?;

    let json_output = json!({
        "id": case.id,
        "title": case.title,
        "description": case.description,
        "steps": case.steps,
        "expected_result": case.expected_result,
        "status": case.status.label(),
        "priority": case.priority,
        "notes": case.notes,
        "created": case.created.to_string(),
        "history": case.history,
    });

    let priority = if case.priority.is_empty() {
        "-"
    } else {
        case.priority.as_str()
    };
    let mut text = format!(
        "{} {} {}\nPriority: {priority}\nCreated: {}",
        case.id.if_supports_color(Stream::Stdout, |s| s.cyan()),
        format_status_colored(case.status),
        case.title,
        case.created.strftime("%Y-%m-%d %H:%M:%S"),
    );
    text.push_str(&section("## Description", &case.description));
    text.push_str(&section("## Steps", &case.steps));
    text.push_str(&section("## Expected Result", &case.expected_result));
    text.push_str(&section("## Notes", &case.notes));

    let history: Vec<String> = case.history.iter().map(|e| format!("- {e}")).collect();
    text.push_str(&section("## History", &history.join("\n")));

    CommandOutput::new(json_output).with_text(text).print(output)
}
