//! Search and status filtering over the cached collection.
//!
//! A record is visible when the query is a case-insensitive substring of its
//! company or its position, and its status passes the status filter. The query
//! is used exactly as typed: no trimming, no tokenizing. Input order is kept.

use crate::domain::{Application, StatusFilter};

/// Returns `true` if `query` occurs in the company or position, ignoring case.
///
/// An empty query matches everything.
#[must_use]
pub fn matches_query(application: &Application, query: &str) -> bool {
    contains_needle(application, &query.to_lowercase())
}

/// `needle` must already be lowercased.
fn contains_needle(application: &Application, needle: &str) -> bool {
    needle.is_empty()
        || application.company.to_lowercase().contains(needle)
        || application.position.to_lowercase().contains(needle)
}

#[must_use]
pub fn matches_status(application: &Application, filter: StatusFilter) -> bool {
    filter.matches(application.status)
}

/// Narrows `applications` to the records matching both `query` and `filter`.
///
/// # Examples
///
/// ```
/// use applytrack::app::filter_applications;
/// use applytrack::{Application, ApplicationStatus, StatusFilter};
///
/// let all = vec![
///     Application::new("Acme", "Engineer", "2024-01-01"),
///     Application::new("Globex", "Acme Liaison", "2024-01-02").with_status(ApplicationStatus::Offer),
/// ];
///
/// assert_eq!(filter_applications(&all, "acme", StatusFilter::All).len(), 2);
/// assert_eq!(filter_applications(&all, "acme", ApplicationStatus::Offer.into()).len(), 1);
/// ```
#[must_use]
pub fn filter_applications<'a>(
    applications: &'a [Application],
    query: &str,
    filter: StatusFilter,
) -> Vec<&'a Application> {
    let needle = query.to_lowercase();
    let visible: Vec<&Application> = applications
        .iter()
        .filter(|application| matches_status(application, filter))
        .filter(|application| contains_needle(application, &needle))
        .collect();

    tracing::debug!(
        total = applications.len(),
        visible = visible.len(),
        query_len = query.len(),
        status = %filter,
        "filter applied"
    );
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApplicationStatus;

    fn sample() -> Vec<Application> {
        vec![
            Application::new("Acme", "Engineer", "2024-01-01").with_id(1),
            Application::new("Globex", "Acme Liaison", "2024-01-02")
                .with_id(2)
                .with_status(ApplicationStatus::Offer),
            Application::new("Initech", "Analyst", "2024-01-03")
                .with_id(3)
                .with_status(ApplicationStatus::Rejected),
        ]
    }

    fn ids(visible: &[&Application]) -> Vec<i64> {
        visible.iter().filter_map(|a| a.id).collect()
    }

    #[test]
    fn query_matches_company_or_position_case_insensitively() {
        let all = sample();
        assert_eq!(ids(&filter_applications(&all, "ACME", StatusFilter::All)), vec![1, 2]);
        assert_eq!(ids(&filter_applications(&all, "anal", StatusFilter::All)), vec![3]);
    }

    #[test]
    fn status_filter_combines_with_query() {
        let all = sample();
        let visible = filter_applications(&all, "acme", ApplicationStatus::Offer.into());
        assert_eq!(ids(&visible), vec![2]);
    }

    #[test]
    fn empty_query_and_all_status_keep_everything_in_order() {
        let all = sample();
        assert_eq!(ids(&filter_applications(&all, "", StatusFilter::All)), vec![1, 2, 3]);
    }

    #[test]
    fn query_is_not_trimmed() {
        let all = sample();
        assert!(filter_applications(&all, " acme", StatusFilter::All).is_empty());
        assert!(!matches_query(&all[0], "acme "));
    }

    #[test]
    fn no_match_yields_empty() {
        let all = sample();
        assert!(filter_applications(&all, "zzz", StatusFilter::All).is_empty());
        assert!(filter_applications(&[], "acme", StatusFilter::All).is_empty());
    }

    #[test]
    fn single_record_predicates_agree_with_pipeline() {
        let all = sample();
        let filters = [StatusFilter::All, ApplicationStatus::Offer.into()];
        for query in ["", "ac", "ACME", "liaison", " acme", "zzz"] {
            for filter in filters {
                let visible = ids(&filter_applications(&all, query, filter));
                let expected: Vec<i64> = all
                    .iter()
                    .filter(|a| matches_query(a, query) && matches_status(a, filter))
                    .filter_map(|a| a.id)
                    .collect();
                assert_eq!(visible, expected, "query {query:?} with {filter}");
            }
        }
    }
}
