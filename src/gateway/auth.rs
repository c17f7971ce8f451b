//! Credential exchange against the remote store's login endpoint.
//!
//! `POST /auth/login` with `{email, password}` answers `{token}` on success. The
//! token is written to the durable token store under [`TOKEN_KEY`], where the
//! gateway's [`AuthContext`](crate::infrastructure::AuthContext) picks it up on
//! the next request.

use crate::domain::{Result, TrackerError};
use crate::infrastructure::{TokenStore, TOKEN_KEY};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOGIN_PATH: &str = "/auth/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Logs in and out by exchanging credentials for a bearer token.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl AuthClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Exchanges `email` and `password` for a token and stores it.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Auth`] if the remote store rejects the credentials
    /// - [`TrackerError::Transport`] if the request fails
    /// - [`TrackerError::Parse`] if the response lacks a token
    /// - [`TrackerError::Storage`] if the token cannot be persisted
    #[tracing::instrument(level = "debug", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}{LOGIN_PATH}", self.base_url))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| TrackerError::network("login", e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), "login rejected");
            return Err(TrackerError::Auth("invalid credentials".to_string()));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::Parse(format!("malformed login response: {e}")))?;

        if body.token.trim().is_empty() {
            return Err(TrackerError::Parse("login response carried an empty token".to_string()));
        }

        self.store.set(TOKEN_KEY, &body.token)?;
        tracing::info!("logged in");
        Ok(())
    }

    /// Forgets the stored token. Later requests go out anonymously.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the token store cannot be written.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Returns `true` if a non-empty token is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the token store cannot be read.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self
            .store
            .get(TOKEN_KEY)?
            .is_some_and(|token| !token.trim().is_empty()))
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
