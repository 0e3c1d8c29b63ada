use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::{CommandOutput, open_session};
use crate::cli::OutputOptions;
use crate::display::{BAR_WIDTH, format_bar, format_summary_line};
use crate::error::Result;

/// Show pass/fail statistics over all test cases
pub async fn cmd_stats(user: Option<&str>, output: OutputOptions) -> Result<()> {
    let (_, session) = open_session(user).await?;
    let view = session.view();

    let mut text = format_summary_line(&view.stats);
    for (label, percent) in [
        ("Pass", view.bars.pass),
        ("Fail", view.bars.fail),
        ("Unset", view.bars.unknown),
    ] {
        text.push_str(&format!(
            "\n{label:<6} {} {percent:>5.1}%",
            format_bar(percent, BAR_WIDTH).if_supports_color(Stream::Stdout, |s| s.dimmed())
        ));
    }

    CommandOutput::new(json!({
        "scope": session.scope().as_str(),
        "stats": view.stats,
        "total": view.stats.total(),
        "bars": view.bars,
    }))
    .with_text(text)
    .print(output)
}
