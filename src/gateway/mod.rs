//! Gateway layer to the remote collection store.
//!
//! This module provides the typed wrapper over the four remote operations on the
//! `/applications` collection, plus the login exchange that produces the bearer
//! credential those operations carry.
//!
//! # Modules
//!
//! - `backend`: [`ApplicationGateway`] trait abstraction
//! - `http`: `reqwest` implementation with per-request bearer authentication
//! - `auth`: `/auth/login` credential exchange

pub mod auth;
pub mod backend;
pub mod http;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::AuthClient;
pub use backend::ApplicationGateway;
pub use http::{build_client, HttpGateway};
