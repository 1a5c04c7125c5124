use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::User;

use super::TokenStore;

/// Upper bound on a profile refetch, on top of the HTTP client's own timeout.
const DEFAULT_REFETCH_TIMEOUT_SECS: u64 = 30;

/// Backend lookup of the account behind a token.
pub trait ProfileSource {
    fn fetch_profile_with(&self, token: &str) -> impl Future<Output = Result<User>> + Send;
}

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Startup refetch still running
    Unresolved,
    Authenticated,
    Anonymous,
}

/// What screens observe: the current user and whether the session is still resolving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn state(&self) -> SessionState {
        match (&self.user, self.loading) {
            (_, true) => SessionState::Unresolved,
            (Some(_), false) => SessionState::Authenticated,
            (None, false) => SessionState::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Owns the authentication state for one application instance.
///
/// Every state change goes through `login`, `logout` or `refetch` and is
/// published to subscribers as a whole `SessionSnapshot`, so no partial
/// update is ever visible. Mutating operations take `&mut self`, so two
/// refetches can never be in flight at once.
pub struct SessionManager<S, P> {
    store: S,
    profiles: P,
    token: Option<String>,
    user: Option<User>,
    loading: bool,
    refetch_timeout: Duration,
    tx: watch::Sender<SessionSnapshot>,
}

impl<S: TokenStore, P: ProfileSource> SessionManager<S, P> {
    pub fn new(store: S, profiles: P) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            store,
            profiles,
            token: None,
            user: None,
            loading: true,
            refetch_timeout: Duration::from_secs(DEFAULT_REFETCH_TIMEOUT_SECS),
            tx,
        }
    }

    pub fn with_refetch_timeout(mut self, timeout: Duration) -> Self {
        self.refetch_timeout = timeout;
        self
    }

    /// Resolve the persisted session once at startup.
    ///
    /// `loading` stays true until the refetch completes, whatever its outcome.
    pub async fn initialize(&mut self) {
        if !self.loading {
            debug!("Session already initialized");
            return;
        }
        self.refetch().await;
        self.loading = false;
        self.publish();
        info!(state = ?self.state(), "Session initialized");
    }

    /// Resolve as anonymous without contacting the backend, dropping any
    /// persisted token. Used by flows that are about to log in anyway.
    pub fn start_fresh(&mut self) {
        self.clear_session();
        self.loading = false;
        self.publish();
        debug!("Session reset without refetch");
    }

    /// Record a successful login or signup.
    ///
    /// The token is persisted before any in-memory state changes, so a
    /// storage failure leaves the session exactly as it was.
    pub fn login(&mut self, token: String, user: User) -> Result<()> {
        if self.loading {
            anyhow::bail!("Cannot log in before the session has been resolved");
        }
        if let Some(current) = &self.user {
            anyhow::bail!("Already logged in as {}; log out first", current.email);
        }

        self.store.save(&token)?;
        self.token = Some(token);
        self.user = Some(user);
        self.publish();
        info!("Logged in");
        Ok(())
    }

    /// End the session. Safe to call when nobody is logged in.
    pub fn logout(&mut self) {
        self.clear_session();
        self.publish();
        info!("Logged out");
    }

    /// Re-derive the current user from the persisted token.
    ///
    /// Without a token nothing is fetched. Any failure of the profile call,
    /// including a timeout, invalidates the session; it is never reported
    /// to the caller.
    pub async fn refetch(&mut self) {
        let token = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, treating as logged out");
                None
            }
        };

        let Some(token) = token else {
            self.token = None;
            self.user = None;
            self.publish();
            return;
        };

        let fetched = tokio::time::timeout(
            self.refetch_timeout,
            self.profiles.fetch_profile_with(&token),
        )
        .await;

        match fetched {
            Ok(Ok(user)) => {
                debug!(user_id = %user.id, "Profile refetched");
                self.token = Some(token);
                self.user = Some(user);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to fetch profile, clearing session");
                self.clear_session();
            }
            Err(_) => {
                warn!(timeout = ?self.refetch_timeout, "Profile fetch timed out, clearing session");
                self.clear_session();
            }
        }
        self.publish();
    }

    fn clear_session(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted token");
        }
        self.token = None;
        self.user = None;
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            loading: self.loading,
        }
    }

    pub fn state(&self) -> SessionState {
        self.snapshot().state()
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Token to attach to authenticated requests
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
