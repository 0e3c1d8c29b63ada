use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use crate::commands::{CaseFields, LsOptions};
use crate::interchange::ExportFormat;
use crate::query::{SortKey, StatusFilter};
use crate::types::{TestStatus, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "qatrack")]
#[command(about = "Per-user test case tracking with pass/fail statistics")]
#[command(version)]
pub struct Cli {
    /// User whose test cases to operate on (overrides QATRACK_USER and config)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
}

/// Field flags shared by `add` and `edit`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Free-form description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Steps to reproduce
    #[arg(long)]
    pub steps: Option<String>,

    /// Expected result
    #[arg(short, long)]
    pub expected: Option<String>,

    /// Status: pass, fail, unset (case-insensitive)
    #[arg(short, long, value_parser = parse_status)]
    pub status: Option<TestStatus>,

    /// Priority label, e.g. Low, Medium, High, Critical ("none" clears it)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl FieldArgs {
    fn into_case_fields(self, title: Option<String>) -> CaseFields {
        CaseFields {
            title,
            description: self.description,
            steps: self.steps,
            expected: self.expected,
            status: self.status,
            notes: self.notes,
            priority: self.priority,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new test case
    #[command(visible_alias = "a")]
    Add {
        /// Test case title
        title: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Change fields of a test case
    #[command(visible_alias = "e")]
    Edit {
        /// Test case ID (can be partial)
        #[arg(value_parser = parse_case_id)]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Display a test case with its history
    #[command(visible_alias = "s")]
    Show {
        /// Test case ID (can be partial)
        #[arg(value_parser = parse_case_id)]
        id: String,
    },

    /// Delete a test case
    Rm {
        /// Test case ID (can be partial)
        #[arg(value_parser = parse_case_id)]
        id: String,
    },

    /// Delete all test cases of the user
    Clear {
        /// Required confirmation
        #[arg(long)]
        force: bool,
    },

    /// List test cases
    #[command(visible_alias = "l")]
    Ls {
        /// Filter by status: all, pass, fail, unset
        #[arg(long, default_value = "all", value_parser = parse_status_filter)]
        status: StatusFilter,

        /// Filter by exact priority label ("all" disables, "none" matches unprioritized)
        #[arg(short, long)]
        priority: Option<String>,

        /// Case-insensitive search over title, description, steps and expected result
        #[arg(short, long)]
        query: Option<String>,

        /// Sort column; repeat to toggle direction (e.g. --sort title --sort title)
        #[arg(long, value_parser = parse_sort_key)]
        sort: Vec<SortKey>,

        /// Print the statistics panel below the table
        #[arg(long)]
        stats: bool,
    },

    /// Show pass/fail statistics
    Stats,

    /// Mark a test case as critical
    Critical {
        /// Test case ID (can be partial)
        #[arg(value_parser = parse_case_id)]
        id: String,
    },

    /// Show the change history of a test case
    History {
        /// Test case ID (can be partial)
        #[arg(value_parser = parse_case_id)]
        id: String,
    },

    /// Show how the number of test cases changed over recent writes
    Trend,

    /// Import test cases from a CSV file
    Import {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Export all test cases
    Export {
        /// Format: csv, table
        #[arg(short, long, default_value = "csv", value_parser = parse_export_format)]
        format: ExportFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key: user, default_sort, priorities, trend_capacity
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Key: user, default_sort, priorities, trend_capacity
        key: String,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self, user: Option<&str>, output: OutputOptions) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_add, cmd_clear, cmd_config_get, cmd_config_set, cmd_config_show, cmd_critical,
            cmd_edit, cmd_export, cmd_history, cmd_import, cmd_ls, cmd_rm, cmd_show, cmd_stats,
            cmd_trend,
        };

        match self {
            Commands::Add { title, fields } => {
                cmd_add(user, fields.into_case_fields(Some(title)), output).await
            }
            Commands::Edit { id, title, fields } => {
                cmd_edit(user, &id, fields.into_case_fields(title), output).await
            }
            Commands::Show { id } => cmd_show(user, &id, output).await,
            Commands::Rm { id } => cmd_rm(user, &id, output).await,
            Commands::Clear { force } => cmd_clear(user, force, output).await,
            Commands::Ls {
                status,
                priority,
                query,
                sort,
                stats,
            } => {
                let options = LsOptions {
                    status,
                    priority,
                    query,
                    sort,
                    stats,
                };
                cmd_ls(user, options, output).await
            }
            Commands::Stats => cmd_stats(user, output).await,
            Commands::Critical { id } => cmd_critical(user, &id, output).await,
            Commands::History { id } => cmd_history(user, &id, output).await,
            Commands::Trend => cmd_trend(user, output).await,
            Commands::Import { path } => cmd_import(user, &path, output).await,
            Commands::Export {
                format,
                output: path,
            } => cmd_export(user, format, path.as_deref(), output).await,
            Commands::Config { action } => match action {
                ConfigAction::Show => cmd_config_show(output),
                ConfigAction::Set { key, value } => cmd_config_set(&key, &value, output),
                ConfigAction::Get { key } => cmd_config_get(&key, output),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing enum values with custom error messages
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<TestStatus, String> {
    parse_with_validation(
        s,
        |v| TestStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_status_filter(s: &str) -> Result<StatusFilter, String> {
    parse_with_validation(
        s,
        |v| StatusFilter::from_str(v).map_err(|_| String::new()),
        "status filter",
        &["all", "pass", "fail", "unset"],
    )
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort key",
        SortKey::ALL_STRINGS,
    )
}

fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "export format",
        ExportFormat::ALL_STRINGS,
    )
}

fn parse_case_id(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("ID cannot be empty".to_string());
    }

    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "ID must contain only alphanumeric characters, hyphens, and underscores".to_string(),
        );
    }

    Ok(s.to_string())
}

/// Generate shell completion script and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "qatrack", &mut io::stdout());
}
