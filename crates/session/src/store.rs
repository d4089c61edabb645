//! Session store: the signed-in state and the operations that change it

use arc_swap::ArcSwap;
use healthtrack_core::{Role, Session, TokenStorage, UserProfile};
use healthtrack_http::PublicApiClient;
use healthtrack_http::types::{AuthResponse, LoginRequest, RegisterRequest};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::SessionError;

/// Holds the session and performs the auth operations that change it.
///
/// State only changes after a call succeeds, so a failed login, register or
/// profile fetch leaves the session as it was. Overlapping calls are not
/// coordinated: whichever finishes last determines the final state.
pub struct SessionStore {
    state: ArcSwap<Session>,
    storage: Arc<dyn TokenStorage>,
    client: PublicApiClient,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load();
        f.debug_struct("SessionStore")
            .field("base_url", &self.client.base_url())
            .field("has_token", &state.token.is_some())
            .field("is_authenticated", &state.is_authenticated)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create the store, picking up a token persisted by an earlier run.
    /// The session is not authenticated until a profile is loaded. A token
    /// that cannot be read is ignored and the store starts signed out.
    pub fn new(client: PublicApiClient, storage: Arc<dyn TokenStorage>) -> Self {
        let token = storage.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable session token: {e}");
            None
        });
        debug!(has_token = token.is_some(), "Session store initialized");

        Self {
            state: ArcSwap::from_pointee(Session::with_token(token)),
            storage,
            client,
        }
    }

    /// Client for the public endpoints
    pub const fn client(&self) -> &PublicApiClient {
        &self.client
    }

    /// Current session state
    pub fn snapshot(&self) -> Arc<Session> {
        self.state.load_full()
    }

    pub fn token(&self) -> Option<String> {
        self.state.load().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.load().is_authenticated
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.load().user.clone()
    }

    pub fn user_role(&self) -> Option<Role> {
        self.state.load().user_role()
    }

    pub fn user_name(&self) -> Option<String> {
        self.state.load().user_name().map(str::to_string)
    }

    pub fn user_email(&self) -> Option<String> {
        self.state.load().user_email().map(str::to_string)
    }

    /// Persist the token and use it for subsequent authenticated requests.
    /// The token is not inspected.
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.storage.store(token)?;
        self.state.rcu(|session| {
            let mut session = Session::clone(session);
            session.set_token(token);
            session
        });
        Ok(())
    }

    /// Replace the profile and mark the session authenticated
    pub fn set_user(&self, user: UserProfile) {
        self.state.rcu(|session| {
            let mut session = Session::clone(session);
            session.set_user(user.clone());
            session
        });
    }

    /// Log in and adopt the returned token and profile. Returns the
    /// response as received.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, SessionError> {
        let response = self.client.login(credentials).await.inspect_err(|e| {
            warn!(username = %credentials.username, "Login failed: {e}");
        })?;

        self.adopt(&response)?;
        info!(username = %credentials.username, role = ?response.profile.role, "Logged in");
        Ok(response)
    }

    /// Register an account and sign in with it, like [`SessionStore::login`]
    pub async fn register(&self, user_data: &RegisterRequest) -> Result<AuthResponse, SessionError> {
        let response = self.client.register(user_data).await.inspect_err(|e| {
            warn!(username = %user_data.username, "Registration failed: {e}");
        })?;

        self.adopt(&response)?;
        info!(username = %user_data.username, role = %user_data.user_type, "Registered");
        Ok(response)
    }

    fn adopt(&self, response: &AuthResponse) -> Result<(), SessionError> {
        self.set_token(&response.token)?;
        self.set_user(response.profile.clone());
        Ok(())
    }

    /// Drop the session: memory and persisted token. Never fails; a storage
    /// error is only logged.
    pub fn logout(&self) {
        self.state.store(Arc::new(Session::default()));
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear stored token: {e}");
        }
        info!("Logged out");
    }

    /// Load the profile for the current token. Fails with
    /// [`SessionError::NoToken`] without touching the network when there is
    /// no token.
    pub async fn fetch_profile(&self) -> Result<UserProfile, SessionError> {
        let Some(token) = self.token() else {
            return Err(SessionError::NoToken);
        };

        let profile = self.client.authenticate(token).profile().await?;
        self.set_user(profile.clone());
        debug!(role = ?profile.role, "Profile loaded");
        Ok(profile)
    }

    /// Resume a session from a persisted token.
    ///
    /// Returns `None` when there is nothing to resume. A token the server
    /// rejects (401/403) is discarded through [`SessionStore::logout`];
    /// any other failure is returned and the token kept.
    pub async fn restore(&self) -> Result<Option<UserProfile>, SessionError> {
        if self.token().is_none() {
            return Ok(None);
        }

        match self.fetch_profile().await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_auth_expired() => {
                warn!("Stored token rejected, discarding session: {e}");
                self.logout();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
