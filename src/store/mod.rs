//! Persistent record stores, partitioned by user scope.
//!
//! A store holds the test cases and the trend log of every scope. Writes bump
//! a per-scope change counter so that a [`Subscription`] can wait for the
//! next change and fetch a fresh snapshot.

use tokio::sync::watch;

use crate::error::Result;
use crate::types::{Scope, TestCase, TestCaseId, TrendPoint};

pub mod file;
pub mod memory;
pub mod subscription;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use subscription::{ChangeHub, Subscription};

/// Default number of points kept in a scope's trend log.
pub const DEFAULT_TREND_CAPACITY: usize = 20;

/// Async storage backend for test cases.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of a scope, ordered by creation time then ID.
    async fn get_all(&self, scope: &Scope) -> Result<Vec<TestCase>>;

    async fn get(&self, scope: &Scope, id: &TestCaseId) -> Result<Option<TestCase>>;

    /// Insert or replace a record, keyed by its ID.
    async fn upsert(&self, scope: &Scope, case: &TestCase) -> Result<()>;

    /// Insert or replace several records with a single change notification.
    async fn upsert_many(&self, scope: &Scope, cases: &[TestCase]) -> Result<()>;

    /// Remove a record. Returns `false` if it did not exist.
    async fn delete(&self, scope: &Scope, id: &TestCaseId) -> Result<bool>;

    /// Remove every record of a scope, returning how many were removed.
    async fn delete_all(&self, scope: &Scope) -> Result<usize>;

    /// Change counter for a scope; bumped after every successful write.
    fn subscribe(&self, scope: &Scope) -> watch::Receiver<u64>;

    /// Append a trend point, dropping the oldest points beyond `cap`.
    async fn append_trend(&self, scope: &Scope, point: TrendPoint, cap: usize) -> Result<()>;

    async fn trend(&self, scope: &Scope) -> Result<Vec<TrendPoint>>;
}

/// Listing order shared by all stores.
pub(crate) fn sort_for_listing(cases: &mut [TestCase]) {
    cases.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
}

/// Append `point` and keep only the newest `cap` points.
pub(crate) fn push_capped(log: &mut Vec<TrendPoint>, point: TrendPoint, cap: usize) {
    log.push(point);
    if log.len() > cap {
        let excess = log.len() - cap;
        log.drain(..excess);
    }
}
