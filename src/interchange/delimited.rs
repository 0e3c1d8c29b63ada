//! Delimited-text import and export.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};

use crate::error::{QaError, Result};
use crate::types::{TestCase, TestCaseDraft, TestStatus};

/// Header line written on export. Imports skip whatever header they find.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Title",
    "Description",
    "Steps",
    "Expected Result",
    "Status",
    "Notes",
    "Priority",
];

/// Rows recovered from a delimited file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    pub rows: Vec<TestCaseDraft>,
    /// Data rows dropped because their title was empty.
    pub skipped: usize,
}

fn draft_from_record(record: &StringRecord) -> TestCaseDraft {
    let field = |index: usize| record.get(index).unwrap_or_default().to_string();
    TestCaseDraft {
        id: None,
        title: field(0),
        description: field(1),
        steps: field(2),
        expected_result: field(3),
        status: TestStatus::normalize(&field(4)),
        notes: field(5),
        priority: field(6),
    }
}

/// Parse delimited text into drafts.
///
/// The first line is a header. Blank lines are ignored, quoted fields may
/// contain commas, doubled quotes and newlines, every field is trimmed, and
/// missing trailing fields are empty.
pub fn parse_csv(text: &str) -> Result<ParsedImport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut parsed = ParsedImport::default();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let draft = draft_from_record(&record);
        if draft.title.is_empty() {
            parsed.skipped += 1;
            continue;
        }
        parsed.rows.push(draft);
    }
    Ok(parsed)
}

/// Render records as delimited text with every data field quoted.
pub fn to_csv<'a, I>(cases: I) -> Result<String>
where
    I: IntoIterator<Item = &'a TestCase>,
{
    let mut out = EXPORT_HEADERS.join(",").into_bytes();
    out.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    for case in cases {
        writer.write_record(case.interchange_fields())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| QaError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| QaError::InvalidInput(format!("export is not UTF-8: {e}")))
}
