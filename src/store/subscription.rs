//! Change notification for record stores.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use super::RecordStore;
use crate::error::Result;
use crate::types::{Scope, TestCase};

/// Per-scope change counters shared by a store and its subscribers.
#[derive(Debug, Default)]
pub struct ChangeHub {
    channels: DashMap<Scope, watch::Sender<u64>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// A receiver that has already seen the current version.
    pub fn receiver(&self, scope: &Scope) -> watch::Receiver<u64> {
        self.channels
            .entry(scope.clone())
            .or_insert_with(|| watch::channel(0).0)
            .subscribe()
    }

    /// Bump the version of a scope, waking every receiver.
    pub fn notify(&self, scope: &Scope) {
        if let Some(sender) = self.channels.get(scope) {
            sender.send_modify(|version| *version = version.wrapping_add(1));
        }
    }

    pub fn version(&self, scope: &Scope) -> u64 {
        self.channels
            .get(scope)
            .map(|sender| *sender.borrow())
            .unwrap_or(0)
    }
}

/// A live feed of snapshots for one scope.
///
/// Each call to [`Subscription::next`] waits for the next write to the scope
/// and then returns the full collection as stored. Several writes that land
/// before the subscriber wakes up are coalesced into one snapshot.
pub struct Subscription {
    store: Arc<dyn RecordStore>,
    scope: Scope,
    changes: watch::Receiver<u64>,
    cancelled: bool,
}

impl Subscription {
    pub fn new(store: Arc<dyn RecordStore>, scope: Scope) -> Self {
        let changes = store.subscribe(&scope);
        Subscription {
            store,
            scope,
            changes,
            cancelled: false,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Wait for the next change and fetch a fresh snapshot.
    ///
    /// Returns `None` once the subscription is cancelled or the store has
    /// gone away.
    pub async fn next(&mut self) -> Option<Result<Vec<TestCase>>> {
        if self.cancelled {
            return None;
        }
        if self.changes.changed().await.is_err() {
            self.cancelled = true;
            return None;
        }
        tracing::debug!(scope = %self.scope, "change observed, reloading snapshot");
        Some(self.store.get_all(&self.scope).await)
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jiff::Timestamp;

    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{TestCase, TestCaseId};

    fn scope() -> Scope {
        Scope::new("alice").unwrap()
    }

    #[test]
    fn test_hub_versions() {
        let hub = ChangeHub::new();
        let s = scope();
        hub.notify(&s);
        assert_eq!(hub.version(&s), 0);

        let rx = hub.receiver(&s);
        hub.notify(&s);
        hub.notify(&s);
        assert_eq!(hub.version(&s), 2);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscription_receives_snapshot_after_write() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let mut sub = Subscription::new(store.clone(), scope());

        let case = TestCase::new(TestCaseId::new_unchecked("tc-1"), "Login", Timestamp::UNIX_EPOCH);
        store.upsert(&scope(), &case).await.unwrap();

        let snapshot = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .expect("subscription should wake up")
            .expect("subscription still active")
            .unwrap();
        assert_eq!(snapshot, vec![case]);
    }

    #[tokio::test]
    async fn test_subscription_ignores_other_scopes() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let mut sub = Subscription::new(store.clone(), scope());

        let other = Scope::new("bob").unwrap();
        let case = TestCase::new(TestCaseId::new_unchecked("tc-1"), "Other", Timestamp::UNIX_EPOCH);
        store.upsert(&other, &case).await.unwrap();

        let waited = tokio::time::timeout(Duration::from_millis(50), sub.next()).await;
        assert!(waited.is_err(), "no change expected for alice");
    }

    #[tokio::test]
    async fn test_cancelled_subscription_ends() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let mut sub = Subscription::new(store.clone(), scope());
        sub.cancel();
        assert!(sub.is_cancelled());
        assert!(sub.next().await.is_none());
    }
}
