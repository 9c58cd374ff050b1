//! Explicit authentication session shared by API clients.

use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user_id: Option<i64>,
}

/// Logged-in state. Clones share the same underlying session, so a logout
/// triggered by one client is seen by all of them.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    /// A logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding an access token.
    pub fn with_token(access_token: impl Into<String>) -> Self {
        let session = Self::new();
        session.login(access_token, None, None);
        session
    }

    pub fn login(
        &self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        user_id: Option<i64>,
    ) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = SessionState {
            access_token: Some(access_token.into()),
            refresh_token,
            user_id,
        };
        tracing::info!(user_id = ?user_id, "session logged in");
    }

    /// Drop all credentials.
    pub fn logout(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.access_token.is_some() {
            tracing::info!(user_id = ?state.user_id, "session logged out");
        }
        *state = SessionState::default();
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.read().user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().access_token.is_some()
    }

    /// `Authorization` header value, when logged in.
    pub fn bearer(&self) -> Option<String> {
        self.read()
            .access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
