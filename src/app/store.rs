//! Canonical in-memory list of applications, reconciled with the remote store.
//!
//! [`ApplicationStore`] is the single owner of the list. Every mutation goes
//! through the gateway first and touches the list only after the remote store
//! has confirmed it; a failed call leaves the list exactly as it was.
//!
//! # Ordering
//!
//! Several operations may be in flight at once (the list lock is never held
//! across an `.await`), so responses can resolve out of submission order. Each
//! operation draws a ticket from one monotonically increasing counter:
//!
//! - per record id, the ticket of the last applied update/delete is remembered,
//!   and a response carrying an older ticket is discarded;
//! - a `load` response is discarded if a newer load, or any mutation issued
//!   after the load, has already been applied;
//! - a load keeps the per-record tickets, so an update or delete issued before
//!   the load that resolves after it is still applied. The remote store
//!   acknowledged that mutation, and it may have landed after the list was read.
//!
//! Discarded responses are logged and reported to the caller, never applied.

use crate::domain::{Application, Result, TrackerError};
use crate::gateway::ApplicationGateway;
use crate::ui::viewmodel::StatusSummary;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Prompt shown before an application is deleted.
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this application?";

/// Source of explicit user confirmation for destructive operations.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Asks the user to confirm `message`. Returns `true` to proceed.
    async fn confirm(&self, message: &str) -> bool;
}

#[async_trait]
impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Outcome of [`ApplicationStore::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Deleted remotely and removed from the list.
    Removed,
    /// The user declined; no request was sent.
    Declined,
    /// Deleted remotely, but a newer operation on the same record had already
    /// been applied locally, so the list was left alone.
    Superseded,
}

#[derive(Debug, Default)]
struct StoreState {
    applications: Vec<Application>,
    next_ticket: u64,
    /// Ticket of the last applied mutation per record id.
    applied: HashMap<i64, u64>,
    last_load: Option<u64>,
    last_mutation: Option<u64>,
}

impl StoreState {
    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn is_stale(&self, id: i64, ticket: u64) -> bool {
        self.applied.get(&id).is_some_and(|&applied| applied > ticket)
    }

    fn record_mutation(&mut self, id: i64, ticket: u64) {
        self.applied.insert(id, ticket);
        self.last_mutation = Some(self.last_mutation.map_or(ticket, |last| last.max(ticket)));
    }
}

/// Single source of truth for the application list.
///
/// All operations are pessimistic: the list changes only after the gateway
/// reports success.
pub struct ApplicationStore<G = Arc<dyn ApplicationGateway>> {
    gateway: G,
    state: Mutex<StoreState>,
}

impl<G: ApplicationGateway> ApplicationStore<G> {
    /// Creates an empty store. Call [`load`](Self::load) to fill it.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ticket(&self) -> u64 {
        self.lock().ticket()
    }

    /// Replaces the list wholesale with the remote collection.
    ///
    /// Returns the number of applications now held.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error; the previous list stays intact.
    #[tracing::instrument(name = "store_load", level = "debug", skip(self))]
    pub async fn load(&self) -> Result<usize> {
        let ticket = self.ticket();
        let applications = match self.gateway.list().await {
            Ok(applications) => applications,
            Err(e) => {
                tracing::warn!(error = %e, "load failed, keeping previous list");
                return Err(e);
            }
        };

        let mut state = self.lock();
        let newer_applied = state.last_load.is_some_and(|last| last > ticket)
            || state.last_mutation.is_some_and(|last| last > ticket);
        if newer_applied {
            tracing::debug!(ticket, "discarding stale load response");
            return Ok(state.applications.len());
        }

        state.applications = applications;
        state.last_load = Some(ticket);
        let StoreState {
            applications,
            applied,
            ..
        } = &mut *state;
        applied.retain(|id, _| applications.iter().any(|a| a.id == Some(*id)));
        tracing::info!(count = state.applications.len(), "applications loaded");
        Ok(state.applications.len())
    }

    /// Creates `draft` remotely and appends the returned record.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Precondition`] if a required field is blank or the
    ///   draft already carries an id; no request is sent
    /// - [`TrackerError::Parse`] if the remote store returns an id the list
    ///   already held for another record; a load issued after the create
    ///   that already lists the new record is not a collision
    /// - any gateway error
    ///
    /// The list is unchanged on every error.
    #[tracing::instrument(name = "store_add", level = "debug", skip_all, fields(company = %draft.company))]
    pub async fn add(&self, draft: &Application) -> Result<Application> {
        draft.validate_presence()?;
        if draft.id.is_some() {
            return Err(TrackerError::precondition("a new application cannot carry an id"));
        }

        let ticket = self.ticket();
        let created = self.gateway.create(draft).await?;
        let id = created
            .id
            .ok_or_else(|| TrackerError::Parse("created application is missing its id".to_string()))?;

        let mut state = self.lock();
        let loaded_since = state.last_load.is_some_and(|last| last > ticket);
        match state.applications.iter().position(|a| a.id == Some(id)) {
            // A load issued after the create already picked the record up.
            Some(index) if loaded_since => {
                state.applications[index] = created.clone();
                tracing::debug!(id, "created application already listed by a newer load");
            }
            Some(_) => {
                return Err(TrackerError::Parse(format!(
                    "remote store assigned id {id}, which is already in use"
                )));
            }
            None => {
                state.applications.push(created.clone());
                tracing::info!(id, "application added");
            }
        }
        state.record_mutation(id, ticket);
        Ok(created)
    }

    /// Sends `updated` to the remote store and replaces the record with the
    /// same id.
    ///
    /// A response older than the last applied mutation of that record is
    /// discarded, as is a response for a record no longer in the list. The
    /// remote result is returned either way.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Precondition`] if `updated` has no id
    /// - any gateway error; the list is unchanged
    #[tracing::instrument(name = "store_update", level = "debug", skip_all, fields(id = ?updated.id))]
    pub async fn apply_update(&self, updated: &Application) -> Result<Application> {
        let id = updated
            .id
            .ok_or_else(|| TrackerError::precondition("update requires an application id"))?;

        let ticket = self.ticket();
        let result = self.gateway.update(updated).await?;

        let mut state = self.lock();
        if state.is_stale(id, ticket) {
            tracing::debug!(id, ticket, "discarding stale update response");
            return Ok(result);
        }
        match state.applications.iter_mut().find(|a| a.id == Some(id)) {
            Some(slot) => {
                *slot = result.clone();
                state.record_mutation(id, ticket);
                tracing::info!(id, "application updated");
            }
            None => tracing::warn!(id, "updated application is no longer listed"),
        }
        Ok(result)
    }

    /// Deletes the application with `id` after the user confirms.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error; the list is unchanged.
    #[tracing::instrument(name = "store_remove", level = "debug", skip(self, prompt))]
    pub async fn remove(&self, id: i64, prompt: &dyn ConfirmPrompt) -> Result<Removal> {
        if !prompt.confirm(DELETE_CONFIRMATION).await {
            tracing::debug!(id, "deletion declined");
            return Ok(Removal::Declined);
        }

        let ticket = self.ticket();
        self.gateway.remove(id).await?;

        let mut state = self.lock();
        if state.is_stale(id, ticket) {
            tracing::debug!(id, ticket, "discarding stale delete response");
            return Ok(Removal::Superseded);
        }
        state.applications.retain(|a| a.id != Some(id));
        state.record_mutation(id, ticket);
        tracing::info!(id, "application removed");
        Ok(Removal::Removed)
    }
}

impl<G> ApplicationStore<G> {
    fn read(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current list, in canonical order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Application> {
        self.read().applications.clone()
    }

    /// Runs `f` against the current list without copying it.
    pub fn with_applications<R>(&self, f: impl FnOnce(&[Application]) -> R) -> R {
        f(&self.read().applications)
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<Application> {
        self.read().applications.iter().find(|a| a.id == Some(id)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().applications.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().applications.is_empty()
    }

    /// Status counts over the whole list.
    #[must_use]
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_applications(&self.read().applications)
    }
}

impl<G> std::fmt::Debug for ApplicationStore<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
