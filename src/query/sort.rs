//! Column sorting for the test case table.
//!
//! Sorting is lexicographic on the string form of a field (case-sensitive,
//! byte order), empty fields sort as the empty string, and the sort is stable
//! in both directions.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::error::QaError;
use crate::types::TestCase;

/// Column a test case list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    Title,
    Description,
    Steps,
    Expected,
    Status,
    Notes,
    Priority,
    Created,
}

impl SortKey {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &[
        "id",
        "title",
        "description",
        "steps",
        "expected",
        "status",
        "notes",
        "priority",
        "created",
    ];

    /// The string form of this column for `case`.
    pub fn value_of<'a>(&self, case: &'a TestCase) -> Cow<'a, str> {
        match self {
            SortKey::Id => Cow::Borrowed(case.id.as_str()),
            SortKey::Title => Cow::Borrowed(&case.title),
            SortKey::Description => Cow::Borrowed(&case.description),
            SortKey::Steps => Cow::Borrowed(&case.steps),
            SortKey::Expected => Cow::Borrowed(&case.expected_result),
            SortKey::Status => Cow::Borrowed(case.status.as_field_str()),
            SortKey::Notes => Cow::Borrowed(&case.notes),
            SortKey::Priority => Cow::Borrowed(&case.priority),
            SortKey::Created => Cow::Owned(case.created.to_string()),
        }
    }

    fn compare(&self, a: &TestCase, b: &TestCase) -> Ordering {
        match self {
            // RFC 3339 strings of different precision do not order correctly.
            SortKey::Created => a.created.cmp(&b.created),
            _ => self.value_of(a).cmp(&self.value_of(b)),
        }
    }
}

enum_display_fromstr!(SortKey, QaError::InvalidSortKey, {
    Id => "id",
    Title => "title",
    Description => "description",
    Steps => "steps",
    Expected => "expected",
    Status => "status",
    Notes => "notes",
    Priority => "priority",
    Created => "created",
});

/// Current sort column and direction of the table.
///
/// No column selected means the store order is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            key: None,
            ascending: true,
        }
    }
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        SortState {
            key: Some(key),
            ascending: true,
        }
    }

    /// Select a column the way a header click does: the same column flips
    /// the direction, a different column starts ascending.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.ascending = !self.ascending;
        } else {
            self.key = Some(key);
            self.ascending = true;
        }
    }

    /// Direction arrow for table headers.
    pub fn indicator(&self, key: SortKey) -> &'static str {
        match (self.key == Some(key), self.ascending) {
            (false, _) => "",
            (true, true) => " ▲",
            (true, false) => " ▼",
        }
    }
}

/// Sort a list of test case references in place according to `state`.
pub fn sort_cases(cases: &mut [&TestCase], state: &SortState) {
    let Some(key) = state.key else {
        return;
    };
    if state.ascending {
        cases.sort_by(|a, b| key.compare(a, b));
    } else {
        cases.sort_by(|a, b| key.compare(b, a));
    }
}
