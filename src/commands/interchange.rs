use std::io::Write;
use std::path::Path;

use serde_json::json;

use super::{CommandOutput, open_session};
use crate::cli::OutputOptions;
use crate::error::{QaError, Result};
use crate::fs::{read_file_if_exists, write_file_atomic};
use crate::interchange::ExportFormat;
use crate::utils::format_relative_path;

/// Import test cases from a CSV file
pub async fn cmd_import(user: Option<&str>, path: &Path, output: OutputOptions) -> Result<()> {
    let text = read_file_if_exists(path)
        .await?
        .ok_or_else(|| QaError::InvalidInput(format!("file not found: {}", path.display())))?;

    let (_, mut session) = open_session(user).await?;
    let report = session.import_csv(&text).await?;

    let mut message = format!("Imported {} test case(s)", report.imported);
    if report.skipped > 0 {
        message.push_str(&format!(", skipped {} row(s)", report.skipped));
    }

    CommandOutput::new(json!({
        "scope": session.scope().as_str(),
        "imported": report.imported,
        "skipped": report.skipped,
    }))
    .with_text(message)
    .print(output)
}

/// Export all test cases to a file or stdout
pub async fn cmd_export(
    user: Option<&str>,
    format: ExportFormat,
    out: Option<&Path>,
    output: OutputOptions,
) -> Result<()> {
    let (_, session) = open_session(user).await?;
    let content = match format {
        ExportFormat::Csv => session.export_csv()?,
        ExportFormat::Table => session.export_table(),
    };

    let Some(path) = out else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writeln!(stdout)?;
        }
        return Ok(());
    };

    write_file_atomic(path, &content).await?;
    let count = session.cases().len();
    tracing::info!(path = %path.display(), count, %format, "exported test cases");

    CommandOutput::new(json!({
        "path": path.display().to_string(),
        "format": format.to_string(),
        "count": count,
    }))
    .with_text(format!(
        "Exported {count} test case(s) to {}",
        format_relative_path(path)
    ))
    .print(output)
}
