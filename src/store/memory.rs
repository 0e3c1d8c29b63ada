use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::sync::watch;

use super::{ChangeHub, RecordStore, push_capped, sort_for_listing};
use crate::error::{QaError, Result};
use crate::types::{Scope, TestCase, TestCaseId, TrendPoint};

/// Volatile store keeping everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cases: RwLock<HashMap<Scope, HashMap<TestCaseId, TestCase>>>,
    trends: RwLock<HashMap<Scope, Vec<TrendPoint>>>,
    hub: ChangeHub,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(QaError::Store("store is not accepting writes".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn get_all(&self, scope: &Scope) -> Result<Vec<TestCase>> {
        let mut cases: Vec<TestCase> = self
            .cases
            .read()
            .get(scope)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        sort_for_listing(&mut cases);
        Ok(cases)
    }

    async fn get(&self, scope: &Scope, id: &TestCaseId) -> Result<Option<TestCase>> {
        Ok(self
            .cases
            .read()
            .get(scope)
            .and_then(|m| m.get(id))
            .cloned())
    }

    async fn upsert(&self, scope: &Scope, case: &TestCase) -> Result<()> {
        self.upsert_many(scope, std::slice::from_ref(case)).await
    }

    async fn upsert_many(&self, scope: &Scope, cases: &[TestCase]) -> Result<()> {
        self.check_writable()?;
        {
            let mut all = self.cases.write();
            let partition = all.entry(scope.clone()).or_default();
            for case in cases {
                partition.insert(case.id.clone(), case.clone());
            }
        }
        self.hub.notify(scope);
        Ok(())
    }

    async fn delete(&self, scope: &Scope, id: &TestCaseId) -> Result<bool> {
        self.check_writable()?;
        let removed = self
            .cases
            .write()
            .get_mut(scope)
            .and_then(|m| m.remove(id))
            .is_some();
        if removed {
            self.hub.notify(scope);
        }
        Ok(removed)
    }

    async fn delete_all(&self, scope: &Scope) -> Result<usize> {
        self.check_writable()?;
        let removed = self
            .cases
            .write()
            .remove(scope)
            .map(|m| m.len())
            .unwrap_or(0);
        self.hub.notify(scope);
        Ok(removed)
    }

    fn subscribe(&self, scope: &Scope) -> watch::Receiver<u64> {
        self.hub.receiver(scope)
    }

    async fn append_trend(&self, scope: &Scope, point: TrendPoint, cap: usize) -> Result<()> {
        self.check_writable()?;
        let mut trends = self.trends.write();
        push_capped(trends.entry(scope.clone()).or_default(), point, cap);
        Ok(())
    }

    async fn trend(&self, scope: &Scope) -> Result<Vec<TrendPoint>> {
        Ok(self.trends.read().get(scope).cloned().unwrap_or_default())
    }
}
