//! Session store: the signed-in user and their bearer token.
//!
//! A thin second state shape on the same engine. Never persisted - a page
//! reload starts signed out - and the token is held as a `SecretString` so
//! it cannot leak through `Debug` output or logs.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use tamarind_core::User;

use crate::engine::{StateEngine, Subscription};

/// Authentication state.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    /// Signed-in user, if any.
    pub user: Option<User>,
    /// Bearer token for API calls. Redacted in `Debug` output.
    pub token: Option<SecretString>,
}

/// The session store.
pub struct AuthStore {
    engine: Arc<StateEngine<AuthState>>,
}

impl AuthStore {
    /// Create a signed-out session store.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            engine: StateEngine::new(AuthState::default(), None),
        })
    }

    /// Record a successful sign-in.
    pub fn set_auth(&self, user: User, token: SecretString) {
        info!(user = %user.id, "Session started");
        self.engine.set_state(move |_| AuthState {
            user: Some(user),
            token: Some(token),
        });
    }

    /// Clear the session.
    pub fn logout(&self) {
        info!("Session ended");
        self.engine.set_state(|_| AuthState::default());
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.engine.with_state(|s| s.user.clone())
    }

    /// The session token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.engine.with_state(|s| s.token.clone())
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.engine.with_state(|s| s.token.is_some())
    }

    /// Register a listener invoked with each session change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&AuthState) + Send + Sync + 'static,
    ) -> Subscription<AuthState> {
        self.engine.subscribe(listener)
    }
}
