//! Process-wide authentication state

use log::{debug, warn};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::credentials::{CredentialStore, MemoryCredentialStore, CREDENTIAL_KEY};
use crate::types::Resident;

/// Snapshot of the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer credential. Present without an `identity` only while a
    /// persisted credential is being restored.
    pub credential: Option<String>,
    pub identity: Option<Resident>,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    loading: bool,
}

/// Shared handle to the session
///
/// Clones observe and mutate the same state. Every component that needs the
/// current identity or credential is handed a clone at construction.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionStore {
    /// Create a session over `credentials`. A credential left by an earlier
    /// run is attached to requests right away, and the session reports
    /// loading until [`AuthClient::restore_session`](crate::AuthClient::restore_session)
    /// has checked it.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let mut state = SessionState::default();
        match credentials.load(CREDENTIAL_KEY) {
            Ok(Some(credential)) if !credential.is_empty() => {
                state.session.credential = Some(credential);
                state.loading = true;
            }
            Ok(_) => {}
            Err(e) => {
                // Unreadable storage is discarded during restoration
                debug!("Persisted credential unreadable: {}", e);
                state.loading = true;
            }
        }

        Self {
            state: Arc::new(RwLock::new(state)),
            credentials,
        }
    }

    /// Session backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    /// Record a successful authentication.
    ///
    /// Persists the credential and replaces the identity. A persistence failure
    /// is logged; the in-memory session is updated regardless.
    pub fn login(&self, credential: impl Into<String>, identity: Resident) {
        let credential = credential.into();
        if let Err(e) = self.credentials.save(CREDENTIAL_KEY, &credential) {
            warn!("Failed to persist credential: {}", e);
        }
        debug!("Session established for {}", identity.email);

        let mut state = self.write();
        state.session.credential = Some(credential);
        state.session.identity = Some(identity);
    }

    /// Forget the credential and identity. Safe to call when logged out.
    pub fn logout(&self) {
        if let Err(e) = self.credentials.remove(CREDENTIAL_KEY) {
            warn!("Failed to remove persisted credential: {}", e);
        }

        let mut state = self.write();
        if state.session.identity.is_some() {
            debug!("Session cleared");
        }
        state.session = Session::default();
    }

    pub fn current(&self) -> Session {
        self.read().session.clone()
    }

    pub fn current_identity(&self) -> Option<Resident> {
        self.read().session.identity.clone()
    }

    pub fn credential(&self) -> Option<String> {
        self.read().session.credential.clone()
    }

    /// True once an identity is known. A credential still being restored
    /// does not count.
    pub fn is_authenticated(&self) -> bool {
        self.read().session.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read()
            .session
            .identity
            .as_ref()
            .map(|identity| identity.is_admin)
            .unwrap_or(false)
    }

    /// True while a persisted credential is being checked at startup
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    /// The credential left by an earlier run. Storage that cannot be read is
    /// discarded so later logins can persist again.
    pub(crate) fn persisted_credential(&self) -> Option<String> {
        match self.credentials.load(CREDENTIAL_KEY) {
            Ok(credential) => credential.filter(|c| !c.is_empty()),
            Err(e) => {
                warn!("Discarding unreadable persisted credential: {}", e);
                if let Err(e) = self.credentials.remove(CREDENTIAL_KEY) {
                    warn!("Failed to remove persisted credential: {}", e);
                }
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.session.credential.is_some())
            .field(
                "identity",
                &state.session.identity.as_ref().map(|i| i.email.as_str()),
            )
            .field("loading", &state.loading)
            .finish()
    }
}
