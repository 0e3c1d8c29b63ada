//! Filtering and aggregation over a test case collection.
//!
//! Everything here is a pure function of its inputs: the filtered view keeps
//! the input order, and statistics are always computed over the full
//! collection rather than the filtered view.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::QaError;
use crate::types::{TestCase, TestStatus, normalize_priority};

pub mod sort;

pub use sort::{SortKey, SortState, sort_cases};

/// Trait for test case filters
pub trait CaseFilter {
    fn matches(&self, case: &TestCase) -> bool;
}

/// Filter by status; `All` keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TestStatus),
}

impl CaseFilter for StatusFilter {
    fn matches(&self, case: &TestCase) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => case.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Filter by exact priority label; `All` keeps everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(String),
}

impl CaseFilter for PriorityFilter {
    fn matches(&self, case: &TestCase) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => case.priority == *priority,
        }
    }
}

impl From<&str> for PriorityFilter {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("all") {
            PriorityFilter::All
        } else {
            PriorityFilter::Only(normalize_priority(s))
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("all"),
            PriorityFilter::Only(p) if p.is_empty() => f.write_str("none"),
            PriorityFilter::Only(p) => f.write_str(p),
        }
    }
}

/// Case-insensitive substring search over title, description, steps and
/// expected result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    raw: String,
    lowered: String,
}

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lowered = raw.to_lowercase();
        SearchQuery { raw, lowered }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl CaseFilter for SearchQuery {
    fn matches(&self, case: &TestCase) -> bool {
        self.lowered.is_empty()
            || case
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.lowered))
    }
}

/// The three filter controls of the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub query: SearchQuery,
}

impl Filters {
    pub fn new(status: StatusFilter, priority: PriorityFilter, query: impl Into<String>) -> Self {
        Filters {
            status,
            priority,
            query: SearchQuery::new(query),
        }
    }

    /// True when no filter narrows the collection.
    pub fn is_empty(&self) -> bool {
        self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
            && self.query.is_empty()
    }

    /// Reset every control to its neutral value.
    pub fn clear(&mut self) {
        *self = Filters::default();
    }
}

impl CaseFilter for Filters {
    fn matches(&self, case: &TestCase) -> bool {
        self.status.matches(case) && self.priority.matches(case) && self.query.matches(case)
    }
}

/// Keep the records matching every filter, in input order.
pub fn apply_filters<'a>(cases: &'a [TestCase], filters: &Filters) -> Vec<&'a TestCase> {
    cases.iter().filter(|case| filters.matches(case)).collect()
}

/// Exact partition of a collection by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub pass: usize,
    pub fail: usize,
    pub unknown: usize,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.unknown
    }

    pub fn bars(&self) -> StatusBars {
        StatusBars::from(*self)
    }
}

/// Count statuses over the full collection.
pub fn count_stats(cases: &[TestCase]) -> Stats {
    cases.iter().fold(Stats::default(), |mut stats, case| {
        match case.status {
            TestStatus::Pass => stats.pass += 1,
            TestStatus::Fail => stats.fail += 1,
            TestStatus::Unset => stats.unknown += 1,
        }
        stats
    })
}

/// Percentage widths of the pass/fail/unknown indicator bars.
///
/// The denominator is floored at 1 so an empty collection yields 0% bars.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StatusBars {
    pub pass: f64,
    pub fail: f64,
    pub unknown: f64,
}

impl From<Stats> for StatusBars {
    fn from(stats: Stats) -> Self {
        let total = stats.total().max(1) as f64;
        StatusBars {
            pass: stats.pass as f64 / total * 100.0,
            fail: stats.fail as f64 / total * 100.0,
            unknown: stats.unknown as f64 / total * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::types::TestCaseId;

    fn case(title: &str, status: TestStatus) -> TestCase {
        let mut case = TestCase::new(
            TestCaseId::new_unchecked(format!("tc-{}", title.to_lowercase())),
            title,
            Timestamp::UNIX_EPOCH,
        );
        case.status = status;
        case
    }

    fn sample() -> Vec<TestCase> {
        vec![
            case("A", TestStatus::Pass),
            case("B", TestStatus::Fail),
            case("C", TestStatus::Unset),
        ]
    }

    fn titles(cases: &[&TestCase]) -> Vec<String> {
        cases.iter().map(|c| c.title.clone()).collect()
    }

    #[test]
    fn test_count_stats_scenario() {
        let stats = count_stats(&sample());
        assert_eq!(
            stats,
            Stats {
                pass: 1,
                fail: 1,
                unknown: 1
            }
        );
        assert_eq!(stats.total(), 3);

        let bars = stats.bars();
        assert!((bars.pass - 33.333).abs() < 0.01);
        assert!((bars.fail - 33.333).abs() < 0.01);
        assert!((bars.unknown - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_bars_empty_collection() {
        let stats = count_stats(&[]);
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.bars(), StatusBars::default());
    }

    #[test]
    fn test_status_filter_scenario() {
        let cases = sample();
        let filters = Filters::new(
            StatusFilter::Only(TestStatus::Pass),
            PriorityFilter::All,
            "",
        );
        assert_eq!(titles(&apply_filters(&cases, &filters)), vec!["A"]);
    }

    #[test]
    fn test_unset_filter_matches_unset_only() {
        let cases = sample();
        let filters = Filters::new(
            StatusFilter::Only(TestStatus::Unset),
            PriorityFilter::All,
            "",
        );
        assert_eq!(titles(&apply_filters(&cases, &filters)), vec!["C"]);
    }

    #[test]
    fn test_priority_filter_exact_match() {
        let mut cases = sample();
        cases[0].priority = "High".to_string();
        cases[2].priority = "Low".to_string();

        let high = Filters::new(StatusFilter::All, PriorityFilter::from("high"), "");
        assert_eq!(titles(&apply_filters(&cases, &high)), vec!["A"]);

        let none = Filters::new(StatusFilter::All, PriorityFilter::from("none"), "");
        assert_eq!(titles(&apply_filters(&cases, &none)), vec!["B"]);
    }

    #[test]
    fn test_query_is_case_insensitive_over_four_fields() {
        let mut cases = sample();
        cases[0].description = "Checks the LOGIN form".to_string();
        cases[1].steps = "1. open login page".to_string();
        cases[2].notes = "login mentioned only in notes".to_string();

        let filters = Filters::new(StatusFilter::All, PriorityFilter::All, "Login");
        assert_eq!(titles(&apply_filters(&cases, &filters)), vec!["A", "B"]);
    }

    #[test]
    fn test_query_matches_expected_result() {
        let mut cases = sample();
        cases[2].expected_result = "User sees a dashboard".to_string();
        let filters = Filters::new(StatusFilter::All, PriorityFilter::All, "DASHBOARD");
        assert_eq!(titles(&apply_filters(&cases, &filters)), vec!["C"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut cases = sample();
        cases[0].priority = "High".to_string();
        cases[1].priority = "High".to_string();
        let filters = Filters::new(
            StatusFilter::Only(TestStatus::Fail),
            PriorityFilter::from("High"),
            "b",
        );
        assert_eq!(titles(&apply_filters(&cases, &filters)), vec!["B"]);
    }

    #[test]
    fn test_apply_filters_is_ordered_subset_and_idempotent() {
        let mut cases = sample();
        cases.push(case("AB", TestStatus::Pass));
        cases.push(case("BA", TestStatus::Fail));
        let filters = Filters::new(StatusFilter::All, PriorityFilter::All, "a");

        let once: Vec<TestCase> = apply_filters(&cases, &filters)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<TestCase> = apply_filters(&once, &filters)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);

        // Subset preserving relative order
        let positions: Vec<usize> = once
            .iter()
            .map(|c| cases.iter().position(|o| o.id == c.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stats_sum_to_length() {
        let mut cases = sample();
        cases.extend((0..7).map(|i| {
            case(
                &format!("X{i}"),
                [TestStatus::Pass, TestStatus::Fail, TestStatus::Unset][i % 3],
            )
        }));
        assert_eq!(count_stats(&cases).total(), cases.len());
    }

    #[test]
    fn test_filters_clear() {
        let mut filters = Filters::new(
            StatusFilter::Only(TestStatus::Fail),
            PriorityFilter::from("Low"),
            "x",
        );
        assert!(!filters.is_empty());
        filters.clear();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_status_filter_from_str() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Pass".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TestStatus::Pass)
        );
        assert!("bogus".parse::<StatusFilter>().is_err());
    }
}
