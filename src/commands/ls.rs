use std::io;

use super::open_session;
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::query::{PriorityFilter, SortKey, StatusFilter};
use crate::view::{JsonRenderer, Render, TableRenderer, ViewAction};

/// Filter and sort controls of the `ls` command.
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    pub status: StatusFilter,
    pub priority: Option<String>,
    pub query: Option<String>,
    /// Columns applied in order, like repeated header clicks.
    pub sort: Vec<SortKey>,
    pub stats: bool,
}

/// List test cases as a table
pub async fn cmd_ls(user: Option<&str>, options: LsOptions, output: OutputOptions) -> Result<()> {
    let (config, mut session) = open_session(user).await?;

    session.dispatch(ViewAction::SetStatusFilter(options.status));
    if let Some(priority) = options.priority.as_deref() {
        session.dispatch(ViewAction::SetPriorityFilter(PriorityFilter::from(priority)));
    }
    if let Some(query) = options.query {
        session.dispatch(ViewAction::UpdateSearch(query));
    }

    if options.sort.is_empty() {
        if let Some(key) = config.default_sort_key()? {
            session.sort_by(key);
        }
    } else {
        for key in options.sort {
            session.sort_by(key);
        }
    }

    let view = session.view();
    tracing::debug!(
        rows = view.rows.len(),
        total = view.total_all_cases,
        "computed list view"
    );

    let stdout = io::stdout().lock();
    if output.json {
        JsonRenderer::new(stdout).render(&view)
    } else {
        TableRenderer::new(stdout)
            .with_stats(options.stats)
            .render(&view)
    }
}
