//! Lifecycle of a single in-flight edit.
//!
//! [`EditCoordinator`] drives the [`EditState`] machine: selecting a record
//! snapshots it and opens a draft, field edits touch only the draft, and submit
//! hands the draft to [`ApplicationStore::apply_update`]. The canonical list is
//! never touched until the store reports success.

use super::modes::EditState;
use super::store::ApplicationStore;
use crate::domain::{Application, Field, Result, TrackerError};
use crate::gateway::ApplicationGateway;

/// Coordinates snapshot, draft mutation, and commit-or-discard for one record.
#[derive(Debug, Default)]
pub struct EditCoordinator {
    state: EditState,
}

impl EditCoordinator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EditState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &EditState {
        &self.state
    }

    /// Opens an edit session on `record`.
    ///
    /// The draft is an exact copy of the record; only
    /// [`display_date`](Self::display_date) hides a time component. Beginning
    /// while already editing replaces the previous draft.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Precondition`] if `record` has no id, or an update is
    ///   currently being committed
    pub fn begin(&mut self, record: &Application) -> Result<()> {
        let Some(id) = record.id else {
            return Err(TrackerError::precondition("only saved applications can be edited"));
        };
        if self.state.is_committing() {
            return Err(TrackerError::precondition("an update is already being committed"));
        }
        if let Some(previous) = self.state.snapshot().and_then(|s| s.id) {
            tracing::debug!(previous, id, "replacing open edit session");
        }

        self.state = EditState::Editing {
            snapshot: record.clone(),
            draft: record.clone(),
        };
        tracing::debug!(id, "edit session opened");
        Ok(())
    }

    /// Changes one field of the draft.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Precondition`] if no edit is open, or the value is not
    ///   valid for `field`; the draft is unchanged
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        match &mut self.state {
            EditState::Editing { draft, .. } => draft.set_field(field, value),
            EditState::Committing { .. } => Err(TrackerError::precondition(
                "the draft cannot change while it is being committed",
            )),
            EditState::Idle => Err(TrackerError::precondition("no edit is open")),
        }
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&Application> {
        self.state.draft()
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<&Application> {
        self.state.snapshot()
    }

    /// Date shown in the edit form: the draft's date without a time component.
    #[must_use]
    pub fn display_date(&self) -> Option<&str> {
        self.draft().map(|draft| crate::domain::date_only(&draft.applied_date))
    }

    /// Returns `true` if the draft differs from the snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        match (self.state.snapshot(), self.state.draft()) {
            (Some(snapshot), Some(draft)) => snapshot != draft,
            _ => false,
        }
    }

    /// Discards the draft. The canonical list is untouched.
    pub fn cancel(&mut self) {
        if let Some(id) = self.state.snapshot().and_then(|s| s.id) {
            tracing::debug!(id, "edit session cancelled");
        }
        self.state = EditState::Idle;
    }

    /// Commits the draft through `store`.
    ///
    /// On success the session closes and the updated record is returned. On
    /// failure the session returns to editing with the draft preserved, so the
    /// caller can retry or cancel.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Precondition`] if no edit is open or a required field
    ///   of the draft is blank
    /// - any error from [`ApplicationStore::apply_update`]
    #[tracing::instrument(name = "edit_submit", level = "debug", skip_all)]
    pub async fn submit<G: ApplicationGateway>(
        &mut self,
        store: &ApplicationStore<G>,
    ) -> Result<Application> {
        let (snapshot, draft) = match std::mem::take(&mut self.state) {
            EditState::Editing { snapshot, draft } => (snapshot, draft),
            other => {
                let label = other.label();
                self.state = other;
                return Err(TrackerError::precondition(format!(
                    "cannot submit while {label}"
                )));
            }
        };

        if let Err(e) = draft.validate_presence() {
            self.state = EditState::Editing { snapshot, draft };
            return Err(e);
        }

        self.state = EditState::Committing {
            snapshot: snapshot.clone(),
            draft: draft.clone(),
        };

        match store.apply_update(&draft).await {
            Ok(updated) => {
                self.state = EditState::Idle;
                tracing::info!(id = ?updated.id, "edit committed");
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(id = ?draft.id, error = %e, "edit commit failed, draft kept");
                self.state = EditState::Editing { snapshot, draft };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApplicationStatus;
    use crate::gateway::mock::{MockGateway, Op};
    use std::sync::Arc;

    async fn loaded_store() -> ApplicationStore<Arc<MockGateway>> {
        let gateway = Arc::new(MockGateway::with_records(vec![
            Application::new("Acme", "Engineer", "2024-01-01").with_id(1),
            Application::new("Globex", "Analyst", "2024-01-05T00:00:00Z")
                .with_id(2)
                .with_status(ApplicationStatus::Offer),
        ]));
        let store = ApplicationStore::new(gateway);
        store.load().await.unwrap();
        store
    }

    #[tokio::test]
    async fn display_hides_time_and_cancel_leaves_record_untouched() {
        let store = loaded_store().await;
        let before = store.get(2).unwrap();
        let mut editor = EditCoordinator::new();

        editor.begin(&before).unwrap();
        assert_eq!(editor.display_date(), Some("2024-01-05"));
        assert!(!editor.is_dirty());

        editor.set_field(Field::Notes, "scratch").unwrap();
        assert!(editor.is_dirty());
        editor.cancel();

        assert!(editor.state().is_idle());
        assert_eq!(store.get(2).unwrap(), before);
        assert_eq!(store.gateway().calls(Op::Update), 0);
    }

    #[tokio::test]
    async fn edited_date_is_sent_as_entered() {
        let store = loaded_store().await;
        let mut editor = EditCoordinator::new();
        editor.begin(&store.get(2).unwrap()).unwrap();
        assert_eq!(editor.draft().unwrap().applied_date, "2024-01-05T00:00:00Z");

        editor.set_field(Field::AppliedDate, "2024-01-09").unwrap();
        assert_eq!(editor.display_date(), Some("2024-01-09"));
        editor.submit(&store).await.unwrap();

        assert_eq!(store.get(2).unwrap().applied_date, "2024-01-09");
    }

    #[tokio::test]
    async fn field_edits_touch_only_the_draft() {
        let store = loaded_store().await;
        let record = store.get(1).unwrap();
        let mut editor = EditCoordinator::new();
        editor.begin(&record).unwrap();

        editor.set_field(Field::Status, "Interviewing").unwrap();
        editor.set_field(Field::Company, "Acme Corp").unwrap();

        assert_eq!(editor.snapshot(), Some(&record));
        assert_eq!(editor.draft().unwrap().company, "Acme Corp");
        assert_eq!(store.get(1).unwrap(), record);
    }

    #[tokio::test]
    async fn successful_submit_returns_to_idle_and_updates_list() {
        let store = loaded_store().await;
        let mut editor = EditCoordinator::new();
        editor.begin(&store.get(2).unwrap()).unwrap();
        editor.set_field(Field::Status, "Rejected").unwrap();

        let updated = editor.submit(&store).await.unwrap();

        assert!(editor.state().is_idle());
        assert_eq!(updated.status, ApplicationStatus::Rejected);
        assert_eq!(store.get(2).unwrap().status, ApplicationStatus::Rejected);
        assert_eq!(
            store.gateway().last_update().unwrap().applied_date,
            "2024-01-05T00:00:00Z"
        );
    }

    #[tokio::test]
    async fn failed_submit_returns_to_editing_with_draft() {
        let store = loaded_store().await;
        let before = store.snapshot();
        let mut editor = EditCoordinator::new();
        editor.begin(&store.get(1).unwrap()).unwrap();
        editor.set_field(Field::Notes, "follow up").unwrap();

        store.gateway().fail(Op::Update);
        assert!(editor.submit(&store).await.is_err());

        assert!(editor.state().is_editing());
        assert_eq!(editor.draft().unwrap().notes, "follow up");
        assert_eq!(store.snapshot(), before);

        store.gateway().recover(Op::Update);
        editor.submit(&store).await.unwrap();
        assert_eq!(store.get(1).unwrap().notes, "follow up");
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected_before_commit() {
        let store = loaded_store().await;
        let mut editor = EditCoordinator::new();
        editor.begin(&store.get(1).unwrap()).unwrap();
        editor.set_field(Field::Position, "  ").unwrap();

        assert!(editor.submit(&store).await.unwrap_err().is_precondition());
        assert!(editor.state().is_editing());
        assert_eq!(store.gateway().calls(Op::Update), 0);
    }

    #[tokio::test]
    async fn last_selected_record_wins() {
        let store = loaded_store().await;
        let mut editor = EditCoordinator::new();
        editor.begin(&store.get(1).unwrap()).unwrap();
        editor.set_field(Field::Notes, "dropped").unwrap();
        editor.begin(&store.get(2).unwrap()).unwrap();

        assert_eq!(editor.snapshot().and_then(|s| s.id), Some(2));
        assert_eq!(editor.draft().unwrap().notes, "");
    }

    #[test]
    fn unsaved_records_and_idle_edits_are_rejected() {
        let mut editor = EditCoordinator::new();
        assert!(editor.begin(&Application::new("A", "B", "2024-01-01")).is_err());
        assert!(editor.set_field(Field::Notes, "x").is_err());
        assert!(editor.state().is_idle());
    }

    #[test]
    fn invalid_status_leaves_draft_unchanged() {
        let mut editor = EditCoordinator::new();
        editor
            .begin(&Application::new("A", "B", "2024-01-01").with_id(3))
            .unwrap();
        assert!(editor.set_field(Field::Status, "Ghosted").is_err());
        assert_eq!(editor.draft().unwrap().status, ApplicationStatus::Applied);
    }
}
