//! View model types representing renderable dashboard state.
//!
//! View models are computed from the canonical list and the dashboard's filter
//! state via [`DashboardState::compute_viewmodel`](crate::app::DashboardState::compute_viewmodel)
//! and consumed by the renderer. They contain no business logic, only
//! display-ready data.
//!
//! # Example
//!
//! ```rust
//! use applytrack::ui::viewmodel::{DashboardViewModel, DisplayItem, StatusSummary};
//!
//! let vm = DashboardViewModel {
//!     summary: StatusSummary::default(),
//!     display_items: vec![DisplayItem {
//!         id: Some(1),
//!         title: "Engineer @ Acme".to_string(),
//!         status: "Applied".to_string(),
//!         applied: "Jan 5, 2024".to_string(),
//!         notes: None,
//!     }],
//!     empty_state: None,
//!     search_bar: None,
//! };
//! assert_eq!(vm.display_items.len(), 1);
//! ```

use crate::domain::{Application, ApplicationStatus};

/// Message shown when the filtered view is empty.
pub const EMPTY_MESSAGE: &str = "No applications found.";

/// Complete dashboard view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardViewModel {
    /// Counts over the whole canonical list, independent of filters.
    pub summary: StatusSummary,

    /// Rows of the filtered view, in canonical order.
    pub display_items: Vec<DisplayItem>,

    /// Present when no row survives the filters.
    pub empty_state: Option<EmptyState>,

    /// Present when a search query or status filter is active.
    pub search_bar: Option<SearchBarInfo>,
}

/// Display information for a single application row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: Option<i64>,

    /// `"position @ company"`.
    pub title: String,

    pub status: String,

    /// Applied date formatted as `Jan 5, 2024`, or the raw value if it does
    /// not parse as a date.
    pub applied: String,

    /// Notes, when non-empty.
    pub notes: Option<String>,
}

impl DisplayItem {
    #[must_use]
    pub fn from_application(application: &Application) -> Self {
        let applied = application.applied_on().map_or_else(
            || application.applied_date.clone(),
            |date| date.format("%b %-d, %Y").to_string(),
        );
        let notes = (!application.notes.trim().is_empty()).then(|| application.notes.clone());

        Self {
            id: application.id,
            title: format!("{} @ {}", application.position, application.company),
            status: application.status.to_string(),
            applied,
            notes,
        }
    }
}

/// Number of applications in each pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl StatusSummary {
    #[must_use]
    pub fn from_applications(applications: &[Application]) -> Self {
        applications.iter().fold(Self::default(), |mut summary, application| {
            summary.total += 1;
            match application.status {
                ApplicationStatus::Applied => summary.applied += 1,
                ApplicationStatus::Interviewing => summary.interviewing += 1,
                ApplicationStatus::Offer => summary.offer += 1,
                ApplicationStatus::Rejected => summary.rejected += 1,
            }
            summary
        })
    }

    #[must_use]
    pub const fn count(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::Interviewing => self.interviewing,
            ApplicationStatus::Offer => self.offer,
            ApplicationStatus::Rejected => self.rejected,
        }
    }
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,

    /// Hint on how to get rows back (clear the filters, or add one).
    pub subtitle: String,
}

/// Active search and status filter, as shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Stabilized query the list is filtered by.
    pub query: String,

    pub status: String,

    /// Raw query not yet stabilized, when it differs from `query`.
    pub pending: Option<String>,
}
