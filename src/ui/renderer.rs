//! Plain-text rendering of the dashboard view model.
//!
//! The layout is a summary line, an optional filter line, then one table row
//! per application (or the empty state):
//!
//! ```text
//! 3 applications  Applied 1  Interviewing 1  Offer 1  Rejected 0
//! filter: "acme"  status: All
//!
//! ID    TITLE                                  STATUS        APPLIED
//! 1     Engineer @ Acme                        Applied       Jan 5, 2024
//!         recruiter call on Monday
//! ```

use crate::ui::viewmodel::{DashboardViewModel, DisplayItem, SearchBarInfo, StatusSummary};
use std::fmt::Write;

const ID_WIDTH: usize = 5;
const TITLE_WIDTH: usize = 38;
const STATUS_WIDTH: usize = 13;

/// Renders `vm` as a multi-line string.
#[must_use]
pub fn render_to_string(vm: &DashboardViewModel) -> String {
    let mut out = String::new();
    render_summary(&mut out, &vm.summary);
    if let Some(search) = &vm.search_bar {
        render_search_bar(&mut out, search);
    }
    out.push('\n');

    if let Some(empty) = &vm.empty_state {
        out.push_str(&empty.message);
        out.push('\n');
        if !empty.subtitle.is_empty() {
            let _ = writeln!(out, "  {}", empty.subtitle);
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{:<ID_WIDTH$} {:<TITLE_WIDTH$} {:<STATUS_WIDTH$} APPLIED",
        "ID", "TITLE", "STATUS"
    );
    for item in &vm.display_items {
        render_row(&mut out, item);
    }
    out
}

/// Renders `vm` to stdout.
pub fn render(vm: &DashboardViewModel) {
    print!("{}", render_to_string(vm));
}

fn render_summary(out: &mut String, summary: &StatusSummary) {
    let noun = if summary.total == 1 { "application" } else { "applications" };
    let _ = writeln!(
        out,
        "{} {noun}  Applied {}  Interviewing {}  Offer {}  Rejected {}",
        summary.total, summary.applied, summary.interviewing, summary.offer, summary.rejected
    );
}

fn render_search_bar(out: &mut String, search: &SearchBarInfo) {
    let _ = write!(out, "filter: {:?}  status: {}", search.query, search.status);
    if let Some(pending) = &search.pending {
        let _ = write!(out, "  (typing {pending:?})");
    }
    out.push('\n');
}

fn render_row(out: &mut String, item: &DisplayItem) {
    let id = item.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let _ = writeln!(
        out,
        "{id:<ID_WIDTH$} {:<TITLE_WIDTH$} {:<STATUS_WIDTH$} {}",
        truncate(&item.title, TITLE_WIDTH),
        item.status,
        item.applied
    );
    if let Some(notes) = &item.notes {
        let _ = writeln!(out, "{:ID_WIDTH$}   {notes}", "");
    }
}

/// Shortens `text` to `width` characters, ending in "..." when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
