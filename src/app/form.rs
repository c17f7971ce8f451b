//! Draft state for creating a new application.

use super::store::ApplicationStore;
use crate::domain::{Application, Field, Result};
use crate::gateway::ApplicationGateway;

/// Working copy behind the "add application" form.
///
/// The draft starts empty with status `Applied`. A successful submit resets it;
/// a failed submit keeps it so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplicationForm {
    draft: Application,
}

impl Default for NewApplicationForm {
    fn default() -> Self {
        Self {
            draft: Application::new("", "", ""),
        }
    }
}

impl NewApplicationForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn draft(&self) -> &Application {
        &self.draft
    }

    /// # Errors
    ///
    /// Returns [`crate::TrackerError::Precondition`] for an unknown status.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        self.draft.set_field(field, value)
    }

    pub fn reset(&mut self) {
        self.draft = Application::new("", "", "");
    }

    /// Creates the draft through `store` and resets the form on success.
    ///
    /// # Errors
    ///
    /// Any error from [`ApplicationStore::add`]; the draft is kept.
    pub async fn submit<G: ApplicationGateway>(
        &mut self,
        store: &ApplicationStore<G>,
    ) -> Result<Application> {
        let created = store.add(&self.draft).await?;
        self.reset();
        Ok(created)
    }
}
