//! Dashboard filter state and view model computation.
//!
//! [`DashboardState`] holds what the user has typed and selected: the raw
//! search text, its debounced counterpart, and the status filter. It never owns
//! applications; the canonical list is passed in from the store whenever the
//! view is computed, so the derived view can never drift from it.
//!
//! # Example
//!
//! ```rust
//! use applytrack::app::DashboardState;
//! use applytrack::{Application, ApplicationStatus};
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let apps = vec![
//!     Application::new("Acme", "Engineer", "2024-01-05").with_id(1),
//!     Application::new("Globex", "Analyst", "2024-01-06").with_id(2),
//! ];
//! let start = Instant::now();
//! let mut state = DashboardState::new(Duration::from_millis(300));
//!
//! state.set_search_query("glob", start);
//! assert_eq!(state.visible(&apps).len(), 2);
//!
//! assert!(state.tick(start + Duration::from_millis(300)));
//! assert_eq!(state.visible(&apps).len(), 1);
//! ```

use super::debounce::DebouncedQuery;
use super::filter::filter_applications;
use crate::domain::{Application, StatusFilter};
use crate::ui::viewmodel::{
    DashboardViewModel, DisplayItem, EmptyState, SearchBarInfo, StatusSummary, EMPTY_MESSAGE,
};
use std::time::Duration;
use tokio::time::Instant;

/// Search and status selection behind the dashboard list.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Search text exactly as typed.
    pub search_query: String,
    query: DebouncedQuery<String>,
    pub status_filter: StatusFilter,
}

impl DashboardState {
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            search_query: String::new(),
            query: DebouncedQuery::new(String::new(), quiet_period),
            status_filter: StatusFilter::All,
        }
    }

    /// Records new search text typed at `now`. The list follows once the text
    /// has been stable for the quiet period (see [`tick`](Self::tick)).
    pub fn set_search_query(&mut self, query: impl Into<String>, now: Instant) {
        self.search_query = query.into();
        self.query.push(self.search_query.clone(), now);
    }

    /// Advances the debounce clock. Returns `true` if the stabilized query
    /// changed and the view must be recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.query.poll(now) {
            Some(stable) => {
                tracing::debug!(query_len = stable.len(), "search query stabilized");
                true
            }
            None => false,
        }
    }

    /// Stabilizes the typed text immediately. Returns `true` if it changed.
    pub fn commit_search(&mut self) -> bool {
        self.query.flush().is_some()
    }

    /// Instant at which pending search text stabilizes, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.query.deadline()
    }

    /// Status changes apply immediately.
    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    #[must_use]
    pub fn stabilized_query(&self) -> &str {
        self.query.stable()
    }

    /// Derived view of `applications` under the current filters.
    #[must_use]
    pub fn visible<'a>(&self, applications: &'a [Application]) -> Vec<&'a Application> {
        filter_applications(applications, self.query.stable(), self.status_filter)
    }

    /// Builds the dashboard view model over the canonical list.
    #[must_use]
    pub fn compute_viewmodel(&self, applications: &[Application]) -> DashboardViewModel {
        let _span = tracing::debug_span!(
            "compute_viewmodel",
            total = applications.len(),
            status = %self.status_filter
        )
        .entered();

        let display_items: Vec<DisplayItem> = self
            .visible(applications)
            .into_iter()
            .map(DisplayItem::from_application)
            .collect();

        let empty_state = display_items.is_empty().then(|| self.compute_empty_state(applications));

        DashboardViewModel {
            summary: StatusSummary::from_applications(applications),
            display_items,
            empty_state,
            search_bar: self.compute_search_bar(),
        }
    }

    fn is_filtering(&self) -> bool {
        !self.query.stable().is_empty() || self.status_filter != StatusFilter::All
    }

    fn compute_empty_state(&self, applications: &[Application]) -> EmptyState {
        let subtitle = if applications.is_empty() {
            "Add an application to get started"
        } else if self.is_filtering() {
            "Try a different search or status"
        } else {
            ""
        };
        EmptyState {
            message: EMPTY_MESSAGE.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        if !self.is_filtering() && !self.query.is_pending() {
            return None;
        }
        let pending = (self.query.latest() != self.query.stable()).then(|| self.query.latest().clone());
        Some(SearchBarInfo {
            query: self.query.stable().clone(),
            status: self.status_filter.to_string(),
            pending,
        })
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(super::debounce::DEFAULT_QUIET_PERIOD)
    }
}
