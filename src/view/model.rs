//! Test case table model types for testable state management
//!
//! This module separates state (ViewState) from view (ViewViewModel): the
//! reducer applies control changes, and `compute_view_model` derives the
//! display list and statistics from scratch on every call.

use crate::query::{
    Filters, PriorityFilter, SortKey, SortState, Stats, StatusBars, StatusFilter, apply_filters,
    count_stats, sort_cases,
};
use crate::query::SearchQuery;
use crate::types::TestCase;

/// Raw state that changes during user interaction
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// All test cases of the current scope, in store order
    pub cases: Vec<TestCase>,
    /// Status, priority and search controls
    pub filters: Filters,
    /// Selected column and direction
    pub sort: SortState,
}

impl ViewState {
    pub fn new(cases: Vec<TestCase>) -> Self {
        ViewState {
            cases,
            ..Default::default()
        }
    }
}

/// All possible actions on the view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Change the status filter
    SetStatusFilter(StatusFilter),
    /// Change the priority filter
    SetPriorityFilter(PriorityFilter),
    /// Update the search query text
    UpdateSearch(String),
    /// Header click on a column
    SortBy(SortKey),
    /// Reset status, priority and search controls
    ClearFilters,
    /// Replace the whole collection with a fresh store snapshot
    ReplaceCases(Vec<TestCase>),
}

/// Computed view model for rendering the table and the statistics panel
#[derive(Debug, Clone)]
pub struct ViewViewModel<'a> {
    /// Filtered and sorted rows to display
    pub rows: Vec<&'a TestCase>,
    /// Counts over the full collection
    pub stats: Stats,
    /// Indicator bar widths derived from `stats`
    pub bars: StatusBars,
    /// Sort state, for header indicators
    pub sort: SortState,
    /// Whether any filter narrows the collection
    pub is_filtered: bool,
    /// Total number of test cases before filtering
    pub total_all_cases: usize,
}

impl ViewViewModel<'_> {
    /// Whether the empty-state message should be shown instead of a table.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Pure function: compute view model from state
///
/// Runs the whole pipeline (filter, then sort, then count) with no
/// incremental caching.
pub fn compute_view_model(state: &ViewState) -> ViewViewModel<'_> {
    let mut rows = apply_filters(&state.cases, &state.filters);
    sort_cases(&mut rows, &state.sort);

    let stats = count_stats(&state.cases);

    ViewViewModel {
        rows,
        stats,
        bars: stats.bars(),
        sort: state.sort,
        is_filtered: !state.filters.is_empty(),
        total_all_cases: state.cases.len(),
    }
}

/// Pure function: apply action to state (reducer pattern)
///
/// Any control may change to any value at any time.
pub fn reduce_view_state(mut state: ViewState, action: ViewAction) -> ViewState {
    match action {
        ViewAction::SetStatusFilter(status) => {
            state.filters.status = status;
        }
        ViewAction::SetPriorityFilter(priority) => {
            state.filters.priority = priority;
        }
        ViewAction::UpdateSearch(query) => {
            state.filters.query = SearchQuery::new(query);
        }
        ViewAction::SortBy(key) => {
            state.sort.sort_by(key);
        }
        ViewAction::ClearFilters => {
            state.filters.clear();
        }
        ViewAction::ReplaceCases(cases) => {
            state.cases = cases;
        }
    }
    state
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::types::{TestCaseId, TestStatus};

    fn make_case(id: &str, title: &str, status: TestStatus) -> TestCase {
        let mut case = TestCase::new(TestCaseId::new_unchecked(id), title, Timestamp::UNIX_EPOCH);
        case.status = status;
        case
    }

    fn default_state() -> ViewState {
        ViewState::new(vec![
            make_case("tc-1", "Beta", TestStatus::Pass),
            make_case("tc-2", "Alpha", TestStatus::Fail),
            make_case("tc-3", "Gamma", TestStatus::Unset),
        ])
    }

    fn row_titles(vm: &ViewViewModel<'_>) -> Vec<String> {
        vm.rows.iter().map(|c| c.title.clone()).collect()
    }

    #[test]
    fn test_compute_view_model_default() {
        let state = default_state();
        let vm = compute_view_model(&state);
        assert_eq!(row_titles(&vm), vec!["Beta", "Alpha", "Gamma"]);
        assert_eq!(vm.total_all_cases, 3);
        assert!(!vm.is_filtered);
        assert_eq!(vm.stats.total(), 3);
    }

    #[test]
    fn test_stats_ignore_filters() {
        let state = reduce_view_state(
            default_state(),
            ViewAction::SetStatusFilter(StatusFilter::Only(TestStatus::Pass)),
        );
        let vm = compute_view_model(&state);
        assert_eq!(row_titles(&vm), vec!["Beta"]);
        assert!(vm.is_filtered);
        assert_eq!(vm.stats.pass, 1);
        assert_eq!(vm.stats.fail, 1);
        assert_eq!(vm.stats.unknown, 1);
    }

    #[test]
    fn test_sort_action_toggles() {
        let state = reduce_view_state(default_state(), ViewAction::SortBy(SortKey::Title));
        assert_eq!(
            row_titles(&compute_view_model(&state)),
            vec!["Alpha", "Beta", "Gamma"]
        );

        let state = reduce_view_state(state, ViewAction::SortBy(SortKey::Title));
        assert_eq!(
            row_titles(&compute_view_model(&state)),
            vec!["Gamma", "Beta", "Alpha"]
        );
    }

    #[test]
    fn test_search_and_clear() {
        let state = reduce_view_state(default_state(), ViewAction::UpdateSearch("ALP".into()));
        assert_eq!(row_titles(&compute_view_model(&state)), vec!["Alpha"]);

        let state = reduce_view_state(state, ViewAction::ClearFilters);
        assert_eq!(compute_view_model(&state).rows.len(), 3);
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let state = reduce_view_state(default_state(), ViewAction::SortBy(SortKey::Title));
        let state = reduce_view_state(state, ViewAction::UpdateSearch("a".into()));
        let state = reduce_view_state(state, ViewAction::ClearFilters);
        assert_eq!(state.sort, SortState::ascending(SortKey::Title));
    }

    #[test]
    fn test_replace_cases_reruns_pipeline() {
        let state = reduce_view_state(
            default_state(),
            ViewAction::SetPriorityFilter(PriorityFilter::from("High")),
        );
        assert!(compute_view_model(&state).is_empty());

        let mut high = make_case("tc-9", "Delta", TestStatus::Fail);
        high.priority = "High".to_string();
        let state = reduce_view_state(state, ViewAction::ReplaceCases(vec![high]));
        let vm = compute_view_model(&state);
        assert_eq!(row_titles(&vm), vec!["Delta"]);
        assert_eq!(vm.total_all_cases, 1);
        assert_eq!(vm.stats.fail, 1);
    }
}
