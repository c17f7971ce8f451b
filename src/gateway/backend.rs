//! Remote gateway abstraction.
//!
//! This module defines the [`ApplicationGateway`] trait that abstracts over the
//! remote collection store. The store and coordinator only see this trait, so
//! they can be exercised against an in-memory double without any network.
//!
//! # Design Philosophy
//!
//! The trait is minimal: one method per remote operation, each issuing exactly
//! one network call. Reconciling results with local state is the store's job,
//! not the gateway's.

use crate::domain::{Application, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Typed access to the remote `/applications` collection.
///
/// # Implementations
///
/// - [`HttpGateway`](super::HttpGateway): JSON over HTTP with bearer authentication
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    /// Fetches every application, in the order the remote store returns them.
    ///
    /// An empty response body is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure or non-success status, `Parse`
    /// on a malformed body.
    async fn list(&self) -> Result<Vec<Application>>;

    /// Creates a record from a draft and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the draft already carries an id, `Transport`
    /// on network failure or non-success status, `Parse` if the response is
    /// malformed or lacks an id.
    async fn create(&self, draft: &Application) -> Result<Application>;

    /// Replaces a record and returns the updated version.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if `application.id` is missing, `Transport` on
    /// network failure or non-success status, `Parse` on a malformed body.
    async fn update(&self, application: &Application) -> Result<Application>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure or non-success status.
    async fn remove(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl<G: ApplicationGateway + ?Sized> ApplicationGateway for Arc<G> {
    async fn list(&self) -> Result<Vec<Application>> {
        (**self).list().await
    }

    async fn create(&self, draft: &Application) -> Result<Application> {
        (**self).create(draft).await
    }

    async fn update(&self, application: &Application) -> Result<Application> {
        (**self).update(application).await
    }

    async fn remove(&self, id: i64) -> Result<()> {
        (**self).remove(id).await
    }
}
