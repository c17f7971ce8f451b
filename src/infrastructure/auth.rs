//! Per-request access to the current bearer credential.

use super::token_store::{TokenStore, TOKEN_KEY};
use std::fmt;
use std::sync::Arc;

/// Explicit authentication context handed to the gateway.
///
/// The credential is looked up in the token store on every call rather than
/// captured once, so a login or logout is observed by the very next request.
/// A missing, empty, or unreadable token yields `None` and the request goes out
/// anonymously; the remote store decides what to do with it.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
}

impl AuthContext {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Returns the current bearer token, if one is stored.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read token store, sending anonymous request");
                None
            }
        }
    }

    /// Returns the underlying token store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("has_token", &self.bearer_token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryTokenStore;

    #[test]
    fn observes_token_changes_between_calls() {
        let store = Arc::new(MemoryTokenStore::new());
        let auth = AuthContext::new(store.clone());
        assert_eq!(auth.bearer_token(), None);

        store.set(TOKEN_KEY, "t1").unwrap();
        assert_eq!(auth.bearer_token().as_deref(), Some("t1"));

        store.set(TOKEN_KEY, "t2").unwrap();
        assert_eq!(auth.bearer_token().as_deref(), Some("t2"));

        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(auth.bearer_token(), None);
    }

    #[test]
    fn blank_token_is_anonymous() {
        let auth = AuthContext::new(Arc::new(MemoryTokenStore::with_token("  ")));
        assert_eq!(auth.bearer_token(), None);
    }
}
