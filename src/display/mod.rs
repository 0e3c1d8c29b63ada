use owo_colors::{OwoColorize, Stream};

use crate::query::Stats;
use crate::types::{CRITICAL_PRIORITY, TestStatus};

/// Width of the statistics indicator bars, in terminal cells.
pub const BAR_WIDTH: usize = 30;

pub fn format_status_colored(status: TestStatus) -> String {
    format_status_colored_with_format(status, |s| format!("[{s}]"))
}

pub fn format_status_colored_with_format<F>(status: TestStatus, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let badge = format_fn(status.label());
    match status {
        TestStatus::Pass => badge
            .if_supports_color(Stream::Stdout, |s| s.green())
            .to_string(),
        TestStatus::Fail => badge
            .if_supports_color(Stream::Stdout, |s| s.red())
            .to_string(),
        TestStatus::Unset => badge
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    }
}

/// Priority label for tables; an empty priority shows as `-`.
pub fn format_priority_colored(priority: &str) -> String {
    match priority {
        "" => "-".to_string(),
        CRITICAL_PRIORITY => priority
            .if_supports_color(Stream::Stdout, |s| s.red())
            .to_string(),
        "High" => priority
            .if_supports_color(Stream::Stdout, |s| s.yellow())
            .to_string(),
        other => other.to_string(),
    }
}

/// `Pass: p • Fail: f • Unset: u • Total: t`
pub fn format_summary_line(stats: &Stats) -> String {
    format!(
        "Pass: {} • Fail: {} • Unset: {} • Total: {}",
        stats.pass,
        stats.fail,
        stats.unknown,
        stats.total()
    )
}

/// Horizontal bar filled to `percent` of `width` cells.
pub fn format_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Collapse a multi-line field into a single table cell of at most
/// `max_chars` characters.
pub fn format_cell(text: &str, max_chars: usize) -> String {
    let flat = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let truncated: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}
