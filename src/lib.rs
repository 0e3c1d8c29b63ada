#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod fs;
pub mod interchange;
pub mod paths;
pub mod query;
pub mod session;
pub mod store;
pub mod types;
pub mod utils;
pub mod view;

pub use config::Config;
pub use error::{QaError, Result};
pub use interchange::{ExportFormat, parse_csv, to_csv, to_markdown_table};
pub use query::{Filters, PriorityFilter, SearchQuery, SortKey, SortState, Stats, StatusFilter};
pub use session::{ImportReport, Session};
pub use store::{FileStore, MemoryStore, RecordStore, Subscription};
pub use types::{HistoryEntry, HistoryKind, Scope, TestCase, TestCaseDraft, TestCaseId, TestStatus};
pub use view::{ViewAction, ViewState, ViewViewModel, compute_view_model, reduce_view_state};
