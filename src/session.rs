//! The per-user session that owns the test case collection.
//!
//! A [`Session`] is created on login with a scope, holds the only in-memory
//! copy of that scope's records together with the table controls, and is
//! torn down on logout. Every mutation goes to the store first; the in-memory
//! collection is replaced by a fresh snapshot only after the store confirms
//! the write, so a failed write leaves the last-known-good state in place.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::error::{QaError, Result};
use crate::interchange::{parse_csv, to_csv, to_markdown_table};
use crate::query::SortKey;
use crate::store::{DEFAULT_TREND_CAPACITY, RecordStore, Subscription};
use crate::types::{
    CRITICAL_PRIORITY, HistoryEntry, HistoryKind, Scope, TestCase, TestCaseDraft, TestCaseId,
    TrendPoint,
};
use crate::utils::generate_unique_case_id;
use crate::view::{ViewAction, ViewState, ViewViewModel, compute_view_model, reduce_view_state};

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    /// Rows dropped for an empty or invalid title or field.
    pub skipped: usize,
}

pub struct Session {
    store: Arc<dyn RecordStore>,
    scope: Scope,
    state: ViewState,
    trend_capacity: usize,
}

impl Session {
    /// Open a session for `scope` and load its collection.
    pub async fn login(store: Arc<dyn RecordStore>, scope: Scope) -> Result<Self> {
        let cases = store.get_all(&scope).await?;
        tracing::debug!(scope = %scope, count = cases.len(), "session opened");
        Ok(Session {
            store,
            scope,
            state: ViewState::new(cases),
            trend_capacity: DEFAULT_TREND_CAPACITY,
        })
    }

    pub fn with_trend_capacity(mut self, capacity: usize) -> Self {
        self.trend_capacity = capacity;
        self
    }

    /// End the session, dropping the in-memory collection.
    pub fn logout(self) {
        tracing::debug!(scope = %self.scope, "session closed");
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Full collection in store order.
    pub fn cases(&self) -> &[TestCase] {
        &self.state.cases
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Run the filter, sort and count pipeline over the current state.
    pub fn view(&self) -> ViewViewModel<'_> {
        compute_view_model(&self.state)
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        self.state = reduce_view_state(std::mem::take(&mut self.state), action);
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.dispatch(ViewAction::SortBy(key));
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(ViewAction::ClearFilters);
    }

    /// Reload the collection from the store, replacing it wholesale.
    pub async fn refresh(&mut self) -> Result<()> {
        let cases = self.store.get_all(&self.scope).await?;
        self.dispatch(ViewAction::ReplaceCases(cases));
        Ok(())
    }

    /// Find a record by exact ID or unique ID prefix.
    pub fn resolve(&self, partial: &str) -> Result<&TestCase> {
        if let Some(case) = self.state.cases.iter().find(|c| c.id.as_str() == partial) {
            return Ok(case);
        }
        let matches: Vec<&TestCase> = self
            .state
            .cases
            .iter()
            .filter(|c| c.id.starts_with(partial))
            .collect();
        match matches.as_slice() {
            [] => Err(QaError::NotFound(partial.to_string())),
            [case] => Ok(case),
            _ => Err(QaError::AmbiguousId(
                partial.to_string(),
                matches.iter().map(|c| c.id.to_string()).collect(),
            )),
        }
    }

    fn is_taken(&self, id: &TestCaseId) -> bool {
        self.state.cases.iter().any(|c| &c.id == id)
    }

    /// Create a record (draft without ID) or overwrite one (draft with ID).
    pub async fn save(&mut self, draft: TestCaseDraft) -> Result<TestCase> {
        let mut draft = draft.validated()?;
        let now = Timestamp::now();

        let case = match draft.id.take() {
            None => {
                let id = generate_unique_case_id(now, |id| self.is_taken(id))?;
                TestCase::from_draft(id, draft, now, HistoryKind::Created)
            }
            Some(id) => {
                let mut existing = self
                    .store
                    .get(&self.scope, &id)
                    .await?
                    .ok_or_else(|| QaError::NotFound(id.to_string()))?;
                existing.apply_draft(draft, now);
                existing
            }
        };

        self.store.upsert(&self.scope, &case).await?;
        tracing::info!(scope = %self.scope, id = %case.id, "saved test case");
        self.after_write(now).await?;
        Ok(case)
    }

    /// Delete one record, returning it.
    pub async fn delete(&mut self, partial: &str) -> Result<TestCase> {
        let case = self.resolve(partial)?.clone();
        if !self.store.delete(&self.scope, &case.id).await? {
            return Err(QaError::NotFound(case.id.to_string()));
        }
        tracing::info!(scope = %self.scope, id = %case.id, "deleted test case");
        self.after_write(Timestamp::now()).await?;
        Ok(case)
    }

    /// Delete every record of the scope, returning how many were removed.
    pub async fn delete_all(&mut self) -> Result<usize> {
        let removed = self.store.delete_all(&self.scope).await?;
        tracing::info!(scope = %self.scope, removed, "deleted all test cases");
        self.after_write(Timestamp::now()).await?;
        Ok(removed)
    }

    /// Raise a record to the critical priority.
    pub async fn set_critical(&mut self, partial: &str) -> Result<TestCase> {
        let now = Timestamp::now();
        let mut case = self.resolve(partial)?.clone();
        case.set_priority(CRITICAL_PRIORITY, now);
        self.store.upsert(&self.scope, &case).await?;
        self.after_write(now).await?;
        Ok(case)
    }

    pub fn history(&self, partial: &str) -> Result<&[HistoryEntry]> {
        Ok(&self.resolve(partial)?.history)
    }

    pub async fn trend(&self) -> Result<Vec<TrendPoint>> {
        self.store.trend(&self.scope).await
    }

    /// Import delimited text as new records.
    ///
    /// Rows keep their file order. Rows that fail validation are counted as
    /// skipped rather than failing the whole import.
    pub async fn import_csv(&mut self, text: &str) -> Result<ImportReport> {
        let parsed = parse_csv(text)?;
        let mut report = ImportReport {
            imported: 0,
            skipped: parsed.skipped,
        };

        let start = Timestamp::now();
        let mut batch: Vec<TestCase> = Vec::with_capacity(parsed.rows.len());
        for (index, draft) in parsed.rows.into_iter().enumerate() {
            let draft = match draft.validated() {
                Ok(draft) => draft,
                Err(e) => {
                    tracing::warn!(row = index + 1, error = %e, "skipping invalid import row");
                    report.skipped += 1;
                    continue;
                }
            };
            let at = start
                .checked_add(SignedDuration::from_millis(index as i64))
                .unwrap_or(start);
            let id = generate_unique_case_id(at, |id| {
                self.is_taken(id) || batch.iter().any(|c| &c.id == id)
            })?;
            batch.push(TestCase::from_draft(id, draft, at, HistoryKind::Imported));
        }

        if !batch.is_empty() {
            self.store.upsert_many(&self.scope, &batch).await?;
            report.imported = batch.len();
            tracing::info!(
                scope = %self.scope,
                imported = report.imported,
                skipped = report.skipped,
                "imported test cases"
            );
            self.after_write(start).await?;
        }
        Ok(report)
    }

    /// The full collection as delimited text.
    pub fn export_csv(&self) -> Result<String> {
        to_csv(&self.state.cases)
    }

    /// The full collection as a Markdown table.
    pub fn export_table(&self) -> String {
        to_markdown_table(&self.state.cases)
    }

    /// Live feed of snapshots written by any session on this scope.
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.store.clone(), self.scope.clone())
    }

    async fn after_write(&mut self, at: Timestamp) -> Result<()> {
        self.refresh().await?;
        let point = TrendPoint {
            at,
            total: self.state.cases.len(),
        };
        if let Err(e) = self
            .store
            .append_trend(&self.scope, point, self.trend_capacity)
            .await
        {
            tracing::warn!(scope = %self.scope, error = %e, "failed to record trend point");
        }
        Ok(())
    }
}
