//! YAML-file backed store.
//!
//! Layout under the root directory:
//!
//! ```text
//! scopes/<scope>/cases/<id>.yaml
//! scopes/<scope>/trend.yaml
//! ```

use std::path::{Path, PathBuf};

use tokio::fs as tokio_fs;
use tokio::sync::watch;

use super::{ChangeHub, RecordStore, push_capped, sort_for_listing};
use crate::error::{QaError, Result};
use crate::fs::{delete_file, read_file_if_exists, write_file_atomic};
use crate::paths::qatrack_root;
use crate::types::{Scope, TestCase, TestCaseId, TrendPoint};

const CASE_EXTENSION: &str = "yaml";

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    hub: ChangeHub,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore {
            root: root.into(),
            hub: ChangeHub::new(),
        }
    }

    /// Store rooted at `QATRACK_ROOT` or `./.qatrack`.
    pub fn from_env() -> Self {
        Self::new(qatrack_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_dir(&self, scope: &Scope) -> PathBuf {
        self.root.join("scopes").join(scope.as_str())
    }

    fn cases_dir(&self, scope: &Scope) -> PathBuf {
        self.scope_dir(scope).join("cases")
    }

    fn case_path(&self, scope: &Scope, id: &TestCaseId) -> PathBuf {
        self.cases_dir(scope)
            .join(format!("{}.{CASE_EXTENSION}", id.as_str()))
    }

    fn trend_path(&self, scope: &Scope) -> PathBuf {
        self.scope_dir(scope).join("trend.yaml")
    }

    async fn case_files(&self, scope: &Scope) -> Result<Vec<PathBuf>> {
        let dir = self.cases_dir(scope);
        let mut entries = match tokio_fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(QaError::StorageError {
                    operation: "read",
                    item_type: "directory",
                    path: dir,
                    source: e,
                });
            }
        };

        let mut files = Vec::new();
        loop {
            let entry = entries
                .next_entry()
                .await
                .map_err(|e| QaError::StorageError {
                    operation: "read",
                    item_type: "directory",
                    path: dir.clone(),
                    source: e,
                })?;
            let Some(entry) = entry else { break };
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == CASE_EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }

    async fn write_case(&self, scope: &Scope, case: &TestCase) -> Result<()> {
        let content = serde_yaml_ng::to_string(case)?;
        write_file_atomic(&self.case_path(scope, &case.id), &content).await
    }
}

/// Parse a record file. The file name wins over a stale `id` field.
fn parse_case(path: &Path, content: &str) -> Result<TestCase> {
    let mut case: TestCase = serde_yaml_ng::from_str(content)?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        && stem != case.id.as_str()
    {
        case.id = TestCaseId::new(stem)?;
    }
    Ok(case)
}

#[async_trait::async_trait]
impl RecordStore for FileStore {
    async fn get_all(&self, scope: &Scope) -> Result<Vec<TestCase>> {
        let mut cases = Vec::new();
        for path in self.case_files(scope).await? {
            let Some(content) = read_file_if_exists(&path).await? else {
                continue;
            };
            match parse_case(&path, &content) {
                Ok(case) => cases.push(case),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable test case");
                }
            }
        }
        sort_for_listing(&mut cases);
        tracing::debug!(scope = %scope, count = cases.len(), "loaded test cases");
        Ok(cases)
    }

    async fn get(&self, scope: &Scope, id: &TestCaseId) -> Result<Option<TestCase>> {
        let path = self.case_path(scope, id);
        match read_file_if_exists(&path).await? {
            Some(content) => parse_case(&path, &content).map(Some),
            None => Ok(None),
        }
    }

    async fn upsert(&self, scope: &Scope, case: &TestCase) -> Result<()> {
        self.write_case(scope, case).await?;
        tracing::debug!(scope = %scope, id = %case.id, "wrote test case");
        self.hub.notify(scope);
        Ok(())
    }

    async fn upsert_many(&self, scope: &Scope, cases: &[TestCase]) -> Result<()> {
        let mut written = 0;
        let mut result = Ok(());
        for case in cases {
            if let Err(e) = self.write_case(scope, case).await {
                result = Err(e);
                break;
            }
            written += 1;
        }
        tracing::debug!(scope = %scope, count = written, "wrote test cases");
        if written > 0 {
            self.hub.notify(scope);
        }
        result
    }

    async fn delete(&self, scope: &Scope, id: &TestCaseId) -> Result<bool> {
        let removed = delete_file(&self.case_path(scope, id)).await?;
        if removed {
            tracing::debug!(scope = %scope, id = %id, "deleted test case");
            self.hub.notify(scope);
        }
        Ok(removed)
    }

    async fn delete_all(&self, scope: &Scope) -> Result<usize> {
        let mut removed = 0;
        let mut result = Ok(());
        for path in self.case_files(scope).await? {
            match delete_file(&path).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        tracing::info!(scope = %scope, removed, "deleted all test cases");
        self.hub.notify(scope);
        result.map(|()| removed)
    }

    fn subscribe(&self, scope: &Scope) -> watch::Receiver<u64> {
        self.hub.receiver(scope)
    }

    async fn append_trend(&self, scope: &Scope, point: TrendPoint, cap: usize) -> Result<()> {
        let mut log = self.trend(scope).await?;
        push_capped(&mut log, point, cap);
        let content = serde_yaml_ng::to_string(&log)?;
        write_file_atomic(&self.trend_path(scope), &content).await
    }

    async fn trend(&self, scope: &Scope) -> Result<Vec<TrendPoint>> {
        let path = self.trend_path(scope);
        let Some(content) = read_file_if_exists(&path).await? else {
            return Ok(Vec::new());
        };
        match serde_yaml_ng::from_str::<Option<Vec<TrendPoint>>>(&content) {
            Ok(log) => Ok(log.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable trend log");
                Ok(Vec::new())
            }
        }
    }
}
