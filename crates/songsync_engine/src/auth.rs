use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use songsync_logging::sync_debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

/// Delivered to every subscriber whenever the signed-in state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub signed_in: bool,
    pub user: Option<UserProfile>,
}

pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(&AuthChange) + Send + Sync>;

#[derive(Clone)]
struct Credentials {
    access_token: String,
    user: UserProfile,
}

/// Holds the catalog credentials and fans auth changes out to any number of
/// listeners. Obtaining the token is left to the caller.
#[derive(Default)]
pub struct AuthSession {
    credentials: RwLock<Option<Credentials>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(access_token: impl Into<String>, user: UserProfile) -> Self {
        let session = Self::new();
        session.store(Some(Credentials {
            access_token: access_token.into(),
            user,
        }));
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|creds| creds.is_some())
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.read(|creds| creds.as_ref().map(|c| c.user.clone()))
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.read(|creds| creds.as_ref().map(|c| c.access_token.clone()))
    }

    pub fn sign_in(&self, access_token: impl Into<String>, user: UserProfile) {
        self.store(Some(Credentials {
            access_token: access_token.into(),
            user,
        }));
        self.notify();
    }

    pub fn sign_out(&self) {
        self.store(None);
        self.notify();
    }

    /// Registers a listener and immediately calls it with the current state.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthChange) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener.clone()));
        listener(&self.snapshot());
        id
    }

    /// Returns false when the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn snapshot(&self) -> AuthChange {
        let user = self.current_user();
        AuthChange {
            signed_in: user.is_some(),
            user,
        }
    }

    fn notify(&self) {
        let change = self.snapshot();
        // Call outside the lock so listeners may subscribe or unsubscribe.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        sync_debug!(
            "Auth changed: signed_in={} listeners={}",
            change.signed_in,
            listeners.len()
        );
        for listener in listeners {
            listener(&change);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Option<Credentials>) -> T) -> T {
        let guard = self
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn store(&self, credentials: Option<Credentials>) {
        *self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = credentials;
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
