//! Render surfaces for the computed view model.

use std::io::Write;

use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::model::ViewViewModel;
use crate::display::{BAR_WIDTH, format_bar, format_cell, format_summary_line};
use crate::error::Result;
use crate::query::SortKey;

/// Columns shown by the table renderer, in order.
const TABLE_COLUMNS: &[(SortKey, &str)] = &[
    (SortKey::Id, "ID"),
    (SortKey::Title, "Title"),
    (SortKey::Status, "Status"),
    (SortKey::Priority, "Priority"),
    (SortKey::Steps, "Steps"),
    (SortKey::Expected, "Expected"),
];

const CELL_WIDTH: usize = 40;

/// Something that can display a computed view model.
pub trait Render {
    fn render(&mut self, view: &ViewViewModel<'_>) -> Result<()>;
}

/// Table plus statistics panel for a terminal.
pub struct TableRenderer<W: Write> {
    out: W,
    show_stats: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        TableRenderer {
            out,
            show_stats: true,
        }
    }

    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_table(&mut self, view: &ViewViewModel<'_>) -> Result<()> {
        if view.is_empty() {
            if view.is_filtered && view.total_all_cases > 0 {
                writeln!(self.out, "No test cases match the current filters.")?;
            } else {
                writeln!(self.out, "No test cases found.")?;
            }
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(
            TABLE_COLUMNS
                .iter()
                .map(|(key, name)| format!("{name}{}", view.sort.indicator(*key))),
        );
        for case in &view.rows {
            builder.push_record(TABLE_COLUMNS.iter().map(|(key, _)| match key {
                SortKey::Status => case.status.label().to_string(),
                SortKey::Priority if case.priority.is_empty() => "-".to_string(),
                _ => format_cell(&key.value_of(case), CELL_WIDTH),
            }));
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        writeln!(self.out, "{table}")?;

        if view.is_filtered {
            writeln!(
                self.out,
                "\n{} of {} test case(s)",
                view.rows.len(),
                view.total_all_cases
            )?;
        } else {
            writeln!(self.out, "\n{} test case(s)", view.rows.len())?;
        }
        Ok(())
    }

    fn render_stats(&mut self, view: &ViewViewModel<'_>) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", format_summary_line(&view.stats))?;

        let bars = [
            ("Pass", view.bars.pass),
            ("Fail", view.bars.fail),
            ("Unset", view.bars.unknown),
        ];
        for (label, percent) in bars {
            let bar = format_bar(percent, BAR_WIDTH);
            let bar = match label {
                "Pass" => bar.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
                "Fail" => bar.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
                _ => bar.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string(),
            };
            writeln!(self.out, "{label:<6} {bar} {percent:>5.1}%")?;
        }
        Ok(())
    }
}

impl<W: Write> Render for TableRenderer<W> {
    fn render(&mut self, view: &ViewViewModel<'_>) -> Result<()> {
        self.render_table(view)?;
        if self.show_stats {
            self.render_stats(view)?;
        }
        Ok(())
    }
}

/// Machine-readable rendition of the same view.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        JsonRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, view: &ViewViewModel<'_>) -> Result<()> {
        let value = json!({
            "cases": view.rows,
            "stats": view.stats,
            "bars": view.bars,
            "total": view.total_all_cases,
            "filtered": view.is_filtered,
        });
        writeln!(self.out, "{}", serde_json::to_string_pretty(&value)?)?;
        Ok(())
    }
}
