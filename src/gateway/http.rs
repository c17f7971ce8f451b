//! JSON-over-HTTP gateway to the remote collection store.
//!
//! | Operation | Method | Path                 |
//! |-----------|--------|----------------------|
//! | list      | GET    | `/applications`      |
//! | create    | POST   | `/applications`      |
//! | update    | PUT    | `/applications/{id}` |
//! | remove    | DELETE | `/applications/{id}` |
//!
//! Every request carries `Authorization: Bearer <token>` when a token is stored.

use super::backend::ApplicationGateway;
use crate::domain::{Application, Result, TrackerError};
use crate::infrastructure::AuthContext;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Path of the remote collection, relative to the base URL.
const COLLECTION_PATH: &str = "/applications";

/// Builds the shared HTTP client.
///
/// One client is shared by the gateway and the login client so connections are
/// pooled across both.
///
/// # Errors
///
/// Returns [`TrackerError::Config`] if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("applytrack/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| TrackerError::Config(format!("failed to build HTTP client: {e}")))
}

/// [`ApplicationGateway`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl HttpGateway {
    /// Creates a gateway for the store rooted at `base_url`.
    ///
    /// A trailing slash on `base_url` is ignored.
    #[must_use]
    pub fn new(client: Client, base_url: &str, auth: AuthContext) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{COLLECTION_PATH}", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}{COLLECTION_PATH}/{id}", self.base_url)
    }

    /// Starts a request with the credential current at call time.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.auth.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => {
                tracing::debug!(url = %url, "no credential stored, sending anonymous request");
                builder
            }
        }
    }

    /// Sends a request and maps network failures and non-success statuses.
    async fn send(operation: &'static str, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| TrackerError::network(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(operation, status = status.as_u16(), "remote store rejected request");
            return Err(TrackerError::status(operation, status.as_u16()));
        }
        Ok(response)
    }

    async fn body_text(operation: &'static str, response: Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| TrackerError::network(operation, format!("failed to read body: {e}")))
    }
}

fn parse_body<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| TrackerError::Parse(format!("malformed {operation} response: {e}")))
}

#[async_trait]
impl ApplicationGateway for HttpGateway {
    #[tracing::instrument(name = "http_list", level = "debug", skip(self))]
    async fn list(&self) -> Result<Vec<Application>> {
        let response = Self::send("list", self.request(Method::GET, &self.collection_url())).await?;
        let body = Self::body_text("list", response).await?;

        if body.trim().is_empty() {
            tracing::debug!("empty list body, treating as no applications");
            return Ok(Vec::new());
        }

        let applications: Vec<Application> = parse_body("list", &body)?;
        tracing::debug!(count = applications.len(), "applications listed");
        Ok(applications)
    }

    #[tracing::instrument(name = "http_create", level = "debug", skip_all)]
    async fn create(&self, draft: &Application) -> Result<Application> {
        if draft.id.is_some() {
            return Err(TrackerError::precondition("create requires a draft without an id"));
        }

        let response = Self::send(
            "create",
            self.request(Method::POST, &self.collection_url()).json(draft),
        )
        .await?;
        let body = Self::body_text("create", response).await?;
        let created: Application = parse_body("create", &body)?;

        if created.id.is_none() {
            return Err(TrackerError::Parse(
                "created application is missing its id".to_string(),
            ));
        }

        tracing::debug!(id = ?created.id, company = %created.company, "application created");
        Ok(created)
    }

    #[tracing::instrument(name = "http_update", level = "debug", skip_all, fields(id = ?application.id))]
    async fn update(&self, application: &Application) -> Result<Application> {
        let id = application
            .id
            .ok_or_else(|| TrackerError::precondition("update requires an application id"))?;

        let response = Self::send(
            "update",
            self.request(Method::PUT, &self.item_url(id)).json(application),
        )
        .await?;
        let body = Self::body_text("update", response).await?;

        // Some stores acknowledge with an empty 200; the submitted record is then authoritative.
        if body.trim().is_empty() {
            tracing::debug!(id, "empty update body, using submitted record");
            return Ok(application.clone());
        }

        let mut updated: Application = parse_body("update", &body)?;
        match updated.id {
            None => updated.id = Some(id),
            Some(returned) if returned != id => {
                return Err(TrackerError::Parse(format!(
                    "update for id {id} returned id {returned}"
                )));
            }
            Some(_) => {}
        }

        tracing::debug!(id, "application updated");
        Ok(updated)
    }

    #[tracing::instrument(name = "http_remove", level = "debug", skip(self))]
    async fn remove(&self, id: i64) -> Result<()> {
        Self::send("remove", self.request(Method::DELETE, &self.item_url(id))).await?;
        tracing::debug!(id, "application removed");
        Ok(())
    }
}
