use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::error::{QaError, Result};
use crate::utils::validation::{validate_text, validate_title};

pub const QATRACK_DIR: &str = ".qatrack";

/// Last-known outcome of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TestStatus {
    Pass,
    Fail,
    #[default]
    Unset,
}

impl TestStatus {
    /// Lenient mapping used at the store and import boundaries.
    ///
    /// Anything other than `pass` or `fail` (any case) becomes `Unset`.
    pub fn normalize(raw: &str) -> Self {
        let raw = UniCase::new(raw.trim());
        if raw == UniCase::new("pass") {
            TestStatus::Pass
        } else if raw == UniCase::new("fail") {
            TestStatus::Fail
        } else {
            TestStatus::Unset
        }
    }

    /// String form used for sorting and export. `Unset` is the empty string.
    pub fn as_field_str(&self) -> &'static str {
        match self {
            TestStatus::Pass => "Pass",
            TestStatus::Fail => "Fail",
            TestStatus::Unset => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Pass => "Pass",
            TestStatus::Fail => "Fail",
            TestStatus::Unset => "Unset",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestStatus {
    type Err = QaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(TestStatus::Pass),
            "fail" => Ok(TestStatus::Fail),
            "unset" => Ok(TestStatus::Unset),
            _ => Err(QaError::InvalidStatus(s.to_string())),
        }
    }
}

impl From<Option<String>> for TestStatus {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(TestStatus::normalize).unwrap_or_default()
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        status.label().to_string()
    }
}

pub const VALID_STATUSES: &[&str] = &["pass", "fail", "unset"];

pub const CRITICAL_PRIORITY: &str = "Critical";

pub const KNOWN_PRIORITIES: &[&str] = &["Low", "Medium", "High", CRITICAL_PRIORITY];

/// Canonicalize a priority label.
///
/// Known labels take their canonical spelling, `none` means no priority, and
/// anything else is kept as typed (trimmed).
pub fn normalize_priority(raw: &str) -> String {
    let trimmed = raw.trim();
    if UniCase::new(trimmed) == UniCase::new("none") {
        return String::new();
    }
    KNOWN_PRIORITIES
        .iter()
        .find(|known| UniCase::new(**known) == UniCase::new(trimmed))
        .map(|known| known.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Opaque identifier of a test case, unique within its scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TestCaseId(String);

impl TestCaseId {
    pub const MAX_LENGTH: usize = 64;

    /// Create an ID, rejecting anything that is not safe as a file stem.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty()
            || value.len() > Self::MAX_LENGTH
            || !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(QaError::InvalidId(value));
        }
        Ok(TestCaseId(value))
    }

    pub fn new_unchecked(value: impl Into<String>) -> Self {
        TestCaseId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for TestCaseId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TestCaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TestCaseId {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self> {
        TestCaseId::new(s)
    }
}

impl TryFrom<String> for TestCaseId {
    type Error = QaError;

    fn try_from(value: String) -> Result<Self> {
        TestCaseId::new(value)
    }
}

impl From<TestCaseId> for String {
    fn from(id: TestCaseId) -> Self {
        id.0
    }
}

/// The authenticated-user partition under which test cases are stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope(String);

impl Scope {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(QaError::InvalidScope(
                value.clone(),
                "scope cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(QaError::InvalidScope(
                value.clone(),
                format!("scope must be at most {} characters", Self::MAX_LENGTH),
            ));
        }
        if trimmed.starts_with('.')
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        {
            return Err(QaError::InvalidScope(
                value.clone(),
                "use only letters, numbers, '-', '_', '.', '@' and do not start with '.'"
                    .to_string(),
            ));
        }
        Ok(Scope(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Scope {
    type Error = QaError;

    fn try_from(value: String) -> Result<Self> {
        Scope::new(value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}

/// What happened to a test case at a point in its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Created,
    Edited,
    Imported,
    PriorityChanged,
}

enum_display!(HistoryKind, {
    Created => "Created",
    Edited => "Edited",
    Imported => "Imported",
    PriorityChanged => "Priority changed",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: Timestamp,
    pub kind: HistoryKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl HistoryEntry {
    pub fn new(kind: HistoryKind, at: Timestamp, detail: impl Into<String>) -> Self {
        HistoryEntry {
            at,
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.at.strftime("%Y-%m-%d %H:%M:%S"))?;
        if !self.detail.is_empty() {
            write!(f, " ({})", self.detail)?;
        }
        Ok(())
    }
}

fn missing_id() -> TestCaseId {
    TestCaseId::new_unchecked("")
}

fn unix_epoch() -> Timestamp {
    Timestamp::UNIX_EPOCH
}

/// One row of the tracked suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Filled from the file name when absent.
    #[serde(default = "missing_id")]
    pub id: TestCaseId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub expected_result: String,
    #[serde(default)]
    pub status: TestStatus,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "unix_epoch")]
    pub created: Timestamp,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl TestCase {
    /// A bare record with only an ID and title set.
    pub fn new(id: TestCaseId, title: impl Into<String>, created: Timestamp) -> Self {
        TestCase {
            id,
            title: title.into(),
            description: String::new(),
            steps: String::new(),
            expected_result: String::new(),
            status: TestStatus::Unset,
            priority: String::new(),
            notes: String::new(),
            created,
            history: Vec::new(),
        }
    }

    /// Build a new record from a validated draft, recording its origin.
    pub fn from_draft(
        id: TestCaseId,
        draft: TestCaseDraft,
        at: Timestamp,
        origin: HistoryKind,
    ) -> Self {
        TestCase {
            id,
            title: draft.title,
            description: draft.description,
            steps: draft.steps,
            expected_result: draft.expected_result,
            status: draft.status,
            priority: draft.priority,
            notes: draft.notes,
            created: at,
            history: vec![HistoryEntry::new(origin, at, "")],
        }
    }

    /// Overwrite the editable fields from a draft and append an `Edited`
    /// history entry naming the fields that changed.
    pub fn apply_draft(&mut self, draft: TestCaseDraft, at: Timestamp) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let mut update = |name: &'static str, field: &mut String, value: String| {
            if *field != value {
                *field = value;
                changed.push(name);
            }
        };
        update("title", &mut self.title, draft.title);
        update("description", &mut self.description, draft.description);
        update("steps", &mut self.steps, draft.steps);
        update("expected_result", &mut self.expected_result, draft.expected_result);
        update("priority", &mut self.priority, draft.priority);
        update("notes", &mut self.notes, draft.notes);
        if self.status != draft.status {
            self.status = draft.status;
            changed.push("status");
        }

        let detail = if changed.is_empty() {
            "no changes".to_string()
        } else {
            changed.join(", ")
        };
        self.history
            .push(HistoryEntry::new(HistoryKind::Edited, at, detail));
        changed
    }

    pub fn set_priority(&mut self, priority: &str, at: Timestamp) {
        let previous = std::mem::replace(&mut self.priority, normalize_priority(priority));
        let from = if previous.is_empty() { "none" } else { &previous };
        self.history.push(HistoryEntry::new(
            HistoryKind::PriorityChanged,
            at,
            format!("{from} -> {}", self.priority),
        ));
    }

    /// Fields matched by free-text search.
    pub fn searchable_fields(&self) -> [&str; 4] {
        [
            &self.title,
            &self.description,
            &self.steps,
            &self.expected_result,
        ]
    }

    /// Fields carried by the delimited and tabular interchange formats, in
    /// column order.
    pub fn interchange_fields(&self) -> [&str; 7] {
        [
            &self.title,
            &self.description,
            &self.steps,
            &self.expected_result,
            self.status.as_field_str(),
            &self.notes,
            &self.priority,
        ]
    }
}

/// Editable payload of a test case, as submitted by a form or an import row.
///
/// `id` is `None` for new records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseDraft {
    pub id: Option<TestCaseId>,
    pub title: String,
    pub description: String,
    pub steps: String,
    pub expected_result: String,
    pub status: TestStatus,
    pub priority: String,
    pub notes: String,
}

impl TestCaseDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TestCaseDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Validate the title and normalize free-form fields.
    ///
    /// Every text field is stored trimmed, matching what a delimited import
    /// of the same values produces.
    ///
    /// This is the single place where defaulting rules are applied before a
    /// draft reaches the store.
    pub fn validated(mut self) -> Result<Self> {
        for field in [
            &mut self.title,
            &mut self.description,
            &mut self.steps,
            &mut self.expected_result,
            &mut self.notes,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
        validate_title(&self.title)?;
        validate_text(&self.description, "Description")?;
        validate_text(&self.steps, "Steps")?;
        validate_text(&self.expected_result, "Expected result")?;
        validate_text(&self.notes, "Notes")?;
        self.priority = normalize_priority(&self.priority);
        Ok(self)
    }
}

impl From<&TestCase> for TestCaseDraft {
    fn from(case: &TestCase) -> Self {
        TestCaseDraft {
            id: Some(case.id.clone()),
            title: case.title.clone(),
            description: case.description.clone(),
            steps: case.steps.clone(),
            expected_result: case.expected_result.clone(),
            status: case.status,
            priority: case.priority.clone(),
            notes: case.notes.clone(),
        }
    }
}

/// Snapshot of the collection size at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub at: Timestamp,
    pub total: usize,
}
