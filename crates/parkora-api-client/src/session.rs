//! Authentication session
//!
//! One [`SessionStore`] per process, shared as `Arc<SessionStore>` between the
//! API client and the route guard. The user identity is always derived from
//! the stored token; the cached user entry is written for other readers but
//! never trusted on startup.

use parkora_core::{decode_token, now_epoch_secs, ClientError, StorageKeys, UserIdentity};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::storage::KeyValueStore;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserIdentity>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    fn authenticated(user: UserIdentity, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
        }
    }
}

pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    keys: StorageKeys,
    state: RwLock<Session>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("keys", &self.keys)
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    /// Unauthenticated store. Call [`initialize`](Self::initialize) to hydrate
    /// from persisted storage.
    pub fn new(storage: Box<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            storage,
            keys,
            state: RwLock::new(Session::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn initialize(&self) -> Session {
        self.initialize_at(now_epoch_secs())
    }

    /// Hydrate from the persisted token. A missing, expired or undecodable
    /// token clears storage and leaves the session unauthenticated. Storage
    /// that cannot be read at all is wiped.
    pub fn initialize_at(&self, now: i64) -> Session {
        let stored = match self.storage.get(&self.keys.token_key) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token, resetting storage");
                if let Err(e) = self.storage.clear() {
                    tracing::warn!(error = %e, "Failed to reset persisted session");
                }
                None
            }
        };

        let restored = stored.and_then(|token| match decode_token(&token) {
            Ok(claims) if !claims.is_expired_at(now) => Some(Session::authenticated(claims.to_identity(), token)),
            Ok(claims) => {
                tracing::info!(exp = claims.exp, "Persisted token has expired");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted token could not be decoded");
                None
            }
        });

        let session = match restored {
            Some(session) => {
                tracing::info!(
                    user_id = session.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default(),
                    "Session restored"
                );
                session
            }
            None => {
                self.clear_storage();
                Session::default()
            }
        };

        *self.write() = session.clone();
        session
    }

    pub fn login(&self, token: &str) -> Result<UserIdentity, ClientError> {
        self.login_at(token, now_epoch_secs())
    }

    /// Accept a freshly issued token. The state is left untouched if the token
    /// is undecodable, already expired, or cannot be persisted.
    pub fn login_at(&self, token: &str, now: i64) -> Result<UserIdentity, ClientError> {
        let token = token.trim();
        let claims = decode_token(token)?;
        if claims.is_expired_at(now) {
            return Err(ClientError::TokenExpired);
        }
        let user = claims.to_identity();

        self.storage.set(&self.keys.token_key, token)?;
        match serde_json::to_string(&user) {
            Ok(cached) => {
                if let Err(e) = self.storage.set(&self.keys.user_key, &cached) {
                    tracing::warn!(error = %e, "Failed to cache user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize user cache"),
        }

        *self.write() = Session::authenticated(user.clone(), token.to_string());
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Drop the session. In-memory state is always cleared; a storage failure
    /// is reported afterwards.
    pub fn logout(&self) -> Result<(), ClientError> {
        *self.write() = Session::default();
        let token_result = self.storage.remove(&self.keys.token_key);
        let user_result = self.storage.remove(&self.keys.user_key);
        tracing::info!("Signed out");
        token_result.and(user_result)
    }

    fn clear_storage(&self) {
        for key in [&self.keys.token_key, &self.keys.user_key] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(error = %e, key = %key, "Failed to clear persisted session entry");
            }
        }
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn ensure_fresh(&self) -> bool {
        self.ensure_fresh_at(now_epoch_secs())
    }

    /// True if a non-expired token is held. An expired or undecodable token
    /// forces a logout.
    pub fn ensure_fresh_at(&self, now: i64) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        if !parkora_core::is_expired_at(&token, now) {
            return true;
        }

        tracing::warn!("Session token expired, signing out");
        if let Err(e) = self.logout() {
            tracing::warn!(error = %e, "Failed to clear expired session from storage");
        }
        false
    }
}
