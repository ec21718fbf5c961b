use std::sync::{Arc, RwLock};

use crate::storage::StorageState;

// Persisted field names. These are the exact keys the console frontend historically
// used, kept stable so an existing session file keeps working across upgrades.
pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const ROLE_KEY: &str = "userRole";

/// Identity
///
/// The resolved identity of the current session. The two variants make the
/// cross-field invariant structural: token, username and role are either all
/// present (Authenticated) or none are (Anonymous). There is no way to construct a
/// partially-populated identity.
///
/// Values are only built through `SessionStore` mutations or the persisted-field
/// fold, never directly by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No session. All projections read as the empty string.
    Anonymous,
    /// A logged-in session. All three fields are non-empty.
    Authenticated {
        token: String,
        username: String,
        role: String,
    },
}

impl Identity {
    /// from_fields
    ///
    /// Folds the three raw persisted fields into an identity. Any empty field
    /// demotes the whole triple to Anonymous: a partial session (for example a
    /// token left behind without a role) must never authenticate.
    pub fn from_fields(token: &str, username: &str, role: &str) -> Self {
        if token.is_empty() || username.is_empty() || role.is_empty() {
            Identity::Anonymous
        } else {
            Identity::Authenticated {
                token: token.to_string(),
                username: username.to_string(),
                role: role.to_string(),
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }

    /// The credential token, or "" for Anonymous.
    pub fn token(&self) -> &str {
        match self {
            Identity::Anonymous => "",
            Identity::Authenticated { token, .. } => token,
        }
    }

    /// The display name, or "" for Anonymous.
    pub fn username(&self) -> &str {
        match self {
            Identity::Anonymous => "",
            Identity::Authenticated { username, .. } => username,
        }
    }

    /// The role label, or "" for Anonymous. Role strings are free-form labels
    /// compared by exact equality in the guard.
    pub fn role(&self) -> &str {
        match self {
            Identity::Anonymous => "",
            Identity::Authenticated { role, .. } => role,
        }
    }
}

/// SessionStore
///
/// Single source of truth for the current identity, mirrored into the durable
/// storage backend so it survives restarts. Every mutation writes through; there is
/// no event or subscription mechanism, so readers that care about durability
/// re-read via `persisted()`.
pub struct SessionStore {
    storage: StorageState,
    current: RwLock<Identity>,
}

impl SessionStore {
    /// initialize
    ///
    /// Constructs the store by seeding the in-memory identity from the persisted
    /// fields. Absent keys read as empty strings; a partial triple folds to
    /// Anonymous.
    pub async fn initialize(storage: StorageState) -> Self {
        let identity = read_persisted(&storage).await;
        if identity.is_authenticated() {
            tracing::info!(username = %identity.username(), role = %identity.role(),
                "session restored from persisted storage");
        }
        Self {
            storage,
            current: RwLock::new(identity),
        }
    }

    /// The in-memory identity. May run ahead of the persisted fields after a
    /// failed write; see `set_identity`.
    pub fn current(&self) -> Identity {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// persisted
    ///
    /// Re-reads the persisted projection of the identity. This is what the
    /// Navigation Guard consumes: the durable fields, not the in-memory value.
    pub async fn persisted(&self) -> Identity {
        read_persisted(&self.storage).await
    }

    /// set_identity
    ///
    /// Overwrites all three fields in memory and writes all three through to
    /// storage. No preconditions: any strings are accepted, including empty ones
    /// (an all-empty call is equivalent to a clear, minus the key removal).
    ///
    /// On a persistence failure the in-memory state keeps the new value and the
    /// error is returned; memory and storage then diverge until the next
    /// successful mutation.
    pub async fn set_identity(
        &self,
        token: &str,
        username: &str,
        role: &str,
    ) -> Result<(), String> {
        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = Identity::from_fields(token, username, role);
        }

        // Raw values are persisted exactly as given; the Anonymous fold above is
        // an in-memory interpretation only.
        self.storage.set(TOKEN_KEY, token).await?;
        self.storage.set(USERNAME_KEY, username).await?;
        self.storage.set(ROLE_KEY, role).await?;

        tracing::info!(username = %username, role = %role, "session identity set");
        Ok(())
    }

    /// clear_identity
    ///
    /// Resets the identity to Anonymous and removes all three persisted keys.
    /// Idempotent: clearing an already-cleared session leaves the same state.
    pub async fn clear_identity(&self) -> Result<(), String> {
        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = Identity::Anonymous;
        }

        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USERNAME_KEY).await?;
        self.storage.remove(ROLE_KEY).await?;

        tracing::info!("session identity cleared");
        Ok(())
    }
}

/// Reads the three persisted fields (absent key ≡ empty string) and folds them
/// into an identity.
async fn read_persisted(storage: &StorageState) -> Identity {
    let token = storage.get(TOKEN_KEY).await.unwrap_or_default();
    let username = storage.get(USERNAME_KEY).await.unwrap_or_default();
    let role = storage.get(ROLE_KEY).await.unwrap_or_default();
    Identity::from_fields(&token, &username, &role)
}

/// SessionState
///
/// The concrete type used to share the Session Store across the application state.
pub type SessionState = Arc<SessionStore>;
