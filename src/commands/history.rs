use serde_json::json;

use super::{CommandOutput, open_session};
use crate::cli::OutputOptions;
use crate::display::BAR_WIDTH;
use crate::error::Result;

/// Show the change history of a test case, oldest first
pub async fn cmd_history(user: Option<&str>, id: &str, output: OutputOptions) -> Result<()> {
    let (_, session) = open_session(user).await?;
    let case_id = session.resolve(id)?.id.clone();
    let history = session.history(id)?;

    let text = if history.is_empty() {
        "No history recorded.".to_string()
    } else {
        history
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!({
        "id": case_id,
        "history": history,
    }))
    .with_text(text)
    .print(output)
}

/// Show how the collection size changed over recent writes
pub async fn cmd_trend(user: Option<&str>, output: OutputOptions) -> Result<()> {
    let (_, session) = open_session(user).await?;
    let points = session.trend().await?;

    let text = if points.is_empty() {
        "No trend data yet.".to_string()
    } else {
        let widest = points.iter().map(|p| p.total).max().unwrap_or(0).max(1);
        points
            .iter()
            .map(|p| {
                let width = p.total * BAR_WIDTH / widest;
                format!(
                    "{}  {:>4} {}",
                    p.at.strftime("%Y-%m-%d %H:%M:%S"),
                    p.total,
                    "▇".repeat(width)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!({ "points": points }))
        .with_text(text)
        .print(output)
}
