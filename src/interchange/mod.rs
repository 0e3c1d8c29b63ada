//! Bulk import and export of test cases.

use crate::error::QaError;

pub mod delimited;
pub mod table;

pub use delimited::{EXPORT_HEADERS, ParsedImport, parse_csv, to_csv};
pub use table::to_markdown_table;

/// Output format of the export command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Table,
}

impl ExportFormat {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &["csv", "table"];

    /// Conventional file name for an export in this format.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "testcases.csv",
            ExportFormat::Table => "testcases.md",
        }
    }
}

enum_display_fromstr!(ExportFormat, QaError::InvalidExportFormat, {
    Csv => "csv",
    Table => "table",
});
