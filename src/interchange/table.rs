//! Printable tabular document export.

use tabled::builder::Builder;
use tabled::settings::Style;

use super::delimited::EXPORT_HEADERS;
use crate::types::TestCase;

fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Render records as a Markdown table with the same columns as the
/// delimited export. An empty collection yields just the header.
pub fn to_markdown_table<'a, I>(cases: I) -> String
where
    I: IntoIterator<Item = &'a TestCase>,
{
    let mut builder = Builder::default();
    builder.push_record(EXPORT_HEADERS.iter().map(|h| h.to_string()));
    for case in cases {
        builder.push_record(case.interchange_fields().iter().map(|f| escape_cell(f)));
    }

    let mut table = builder.build();
    table.with(Style::markdown());
    format!("{table}\n")
}
