//! Applytrack: client-side sync and filtering for a job-application tracker.
//!
//! The crate keeps an in-memory list of job applications consistent with a
//! remote collection store reached over HTTP, and derives a filtered view of it
//! from debounced free-text search and a status selector.
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI Shim (main.rs)                                 │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - ApplicationStore (canonical list)                │
//! │  - EditCoordinator, NewApplicationForm              │
//! │  - Filtering, debouncing, dashboard state           │
//! └─────────────────────────────────────────────────────┘
//!         │                                     │
//! ┌───────────────────────┐           ┌───────────────────┐
//! │ Gateway Layer         │           │ UI Layer (ui/)    │
//! │ (gateway/)            │           │ - View models     │
//! │ - HTTP collection API │           │ - Text rendering  │
//! │ - Login exchange      │           └───────────────────┘
//! └───────────────────────┘
//!         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Token store, auth context (infrastructure/)      │
//! │  - Application model, errors (domain/)              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Store, edit session, form, filter pipeline, debouncer
//! - [`domain`]: Core domain types (Application, errors)
//! - [`gateway`]: Remote collection store client and login
//! - [`infrastructure`]: Token storage, auth context, platform paths
//! - [`ui`]: View models and plain-text rendering
//! - [`observability`]: `tracing` subscriber setup
//!
//! # Configuration
//!
//! Configuration is read from a TOML file, then overridden by `APPLYTRACK_*`
//! environment variables:
//!
//! ```toml
//! # ~/.config/applytrack/config.toml
//! api_base_url = "https://tracker.example.com/api"
//! token_path = "~/.local/share/applytrack/credentials.json"
//! debounce_ms = 300
//! request_timeout_secs = 30
//! trace_level = "info"
//! log_file = "~/.local/share/applytrack/applytrack.log"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use applytrack::{initialize, Config};
//!
//! # async fn run() -> applytrack::Result<()> {
//! let session = initialize(&Config::default())?;
//! session.store.load().await?;
//! let vm = session.dashboard.compute_viewmodel(&session.store.snapshot());
//! print!("{}", applytrack::ui::render_to_string(&vm));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod gateway;
pub mod infrastructure;
pub mod observability;
pub mod ui;

pub use app::{
    ApplicationStore, ConfirmPrompt, DashboardState, DebouncedQuery, EditCoordinator,
    NewApplicationForm, Removal,
};
pub use domain::{Application, ApplicationStatus, Field, Result, StatusFilter, TrackerError};
pub use gateway::{ApplicationGateway, AuthClient, HttpGateway};

use infrastructure::{AuthContext, FileTokenStore, TokenStore};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Prefix of the environment variables read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "APPLYTRACK_";

/// Client configuration.
///
/// # Example
///
/// ```toml
/// api_base_url = "http://localhost:8080"
/// debounce_ms = 250
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the remote store; `/applications` and `/auth/login` are
    /// resolved against it. Default: `http://localhost:8080`
    pub api_base_url: String,

    /// File holding the bearer token. Default: `credentials.json` in the
    /// platform data directory.
    pub token_path: PathBuf,

    /// Quiet period for search input, in milliseconds. Default: `300`
    pub debounce_ms: u64,

    /// Per-request timeout, in seconds. Default: `30`
    pub request_timeout_secs: u64,

    /// Tracing filter directive (`trace`, `debug`, `info`, ...). `RUST_LOG`
    /// takes precedence.
    pub trace_level: Option<String>,

    /// Log to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            token_path: infrastructure::default_token_path(),
            debounce_ms: 300,
            request_timeout_secs: 30,
            trace_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Reads configuration from a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Io`] if the file cannot be read
    /// - [`TrackerError::Config`] if it is not valid TOML for this schema
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| TrackerError::Config(format!("invalid config file {}: {e}", path.display())))?;
        config.expand_paths();
        Ok(config)
    }

    /// Defaults overridden by `APPLYTRACK_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Applies `APPLYTRACK_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(&env_overrides(std::env::vars()))
    }

    /// Applies string overrides keyed by field name.
    ///
    /// Numeric values that do not parse keep the current value. Empty strings
    /// clear optional fields.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use applytrack::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base_url".to_string(), "https://tracker.example.com".to_string());
    /// map.insert("debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::default().with_overrides(&map);
    /// assert_eq!(config.api_base_url, "https://tracker.example.com");
    /// assert_eq!(config.debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        if let Some(url) = overrides.get("api_base_url").filter(|s| !s.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(path) = overrides.get("token_path").filter(|s| !s.trim().is_empty()) {
            self.token_path = infrastructure::expand_tilde(path.trim());
        }
        if let Some(raw) = overrides.get("debounce_ms") {
            self.debounce_ms = parse_or_keep("debounce_ms", raw, self.debounce_ms);
        }
        if let Some(raw) = overrides.get("request_timeout_secs") {
            self.request_timeout_secs = parse_or_keep("request_timeout_secs", raw, self.request_timeout_secs);
        }
        if let Some(level) = overrides.get("trace_level") {
            self.trace_level = Some(level.trim().to_string()).filter(|s| !s.is_empty());
        }
        if let Some(path) = overrides.get("log_file") {
            self.log_file = Some(path.trim())
                .filter(|s| !s.is_empty())
                .map(infrastructure::expand_tilde);
        }
        self
    }

    /// Checks values that would otherwise fail on first use.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if the base URL is not http(s) or the
    /// request timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(TrackerError::Config(format!(
                "api_base_url must start with http:// or https://, got {:?}",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(TrackerError::Config("request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn expand_paths(&mut self) {
        if let Some(raw) = self.token_path.to_str() {
            self.token_path = infrastructure::expand_tilde(raw);
        }
        if let Some(raw) = self.log_file.as_deref().and_then(Path::to_str) {
            self.log_file = Some(infrastructure::expand_tilde(raw));
        }
    }
}

/// Maps `APPLYTRACK_*` variables to override keys.
///
/// `APPLYTRACK_TIMEOUT_SECS` maps to `request_timeout_secs`; every other
/// variable maps to its lowercased suffix.
pub fn env_overrides(vars: impl IntoIterator<Item = (String, String)>) -> BTreeMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| {
            let suffix = key.strip_prefix(ENV_PREFIX)?;
            let field = match suffix {
                "TIMEOUT_SECS" => "request_timeout_secs".to_string(),
                other => other.to_ascii_lowercase(),
            };
            Some((field, value))
        })
        .collect()
}

fn parse_or_keep(key: &str, raw: &str, current: u64) -> u64 {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, "ignoring unparseable config value");
        current
    })
}

/// Everything a front end needs, wired from one [`Config`].
pub struct Session {
    pub config: Config,
    pub tokens: Arc<dyn TokenStore>,
    pub auth: AuthClient,
    pub store: ApplicationStore,
    pub dashboard: DashboardState,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Builds a [`Session`] from configuration.
///
/// The token store is file-backed at `config.token_path`; the gateway and the
/// login client share one HTTP client and read the token per request, so a
/// login or logout takes effect on the next call. The store starts empty.
///
/// # Errors
///
/// - [`TrackerError::Config`] if the configuration is invalid or the HTTP
///   client cannot be built
/// - [`TrackerError::Io`] if the token directory cannot be created
pub fn initialize(config: &Config) -> Result<Session> {
    tracing::debug!(base_url = %config.api_base_url, "initializing applytrack session");
    config.validate()?;

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path.clone())?);
    let client = gateway::build_client(config.request_timeout())?;
    let gateway = HttpGateway::new(client.clone(), &config.api_base_url, AuthContext::new(Arc::clone(&tokens)));
    let auth = AuthClient::new(client, &config.api_base_url, Arc::clone(&tokens));
    let gateway: Arc<dyn ApplicationGateway> = Arc::new(gateway);

    Ok(Session {
        config: config.clone(),
        tokens,
        auth,
        store: ApplicationStore::new(gateway),
        dashboard: DashboardState::new(config.debounce()),
    })
}
