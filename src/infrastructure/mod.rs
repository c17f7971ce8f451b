//! Infrastructure layer for durable state and platform interactions.
//!
//! This module holds the pieces the core consumes but does not own: the durable
//! key-value token store, the per-request authentication context built on top
//! of it, and platform path resolution.

pub mod auth;
pub mod paths;
pub mod token_store;

pub use auth::AuthContext;
pub use paths::{default_token_path, expand_tilde, get_data_dir};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
