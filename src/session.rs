//! Ambient session identity.
//!
//! Who is using the storefront right now, and with what credentials. Cart
//! ownership is derived from this module: every cart operation re-resolves
//! the owner so that login and logout take effect immediately.

use std::{fmt, str::FromStr, sync::Arc};

use mockall::automock;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroize;

use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the bearer token.
const TOKEN_KEY: &str = "session_token";

/// Storage key holding the authenticated user id.
const USER_ID_KEY: &str = "session_user_id";

/// Bearer token material for the order service.
///
/// Redacted in debug output and zeroized on drop.
#[derive(Clone)]
pub struct AuthToken {
    raw: String,
}

impl AuthToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(**redacted**)")
    }
}

impl Drop for AuthToken {
    fn drop(&mut self) {
        self.raw.zeroize();
    }
}

/// Ambient session state: the current credentials, if any.
#[automock]
pub trait SessionSource: Send + Sync {
    /// Bearer token for the order service, when logged in.
    fn token(&self) -> Option<AuthToken>;

    /// Authenticated user id, when logged in.
    fn user_id(&self) -> Option<String>;

    /// Drop all session state, whether by logout or forced expiry.
    fn clear(&self);
}

/// Identity partition under which a cart is stored.
///
/// The absence of an authenticated user is the guest identity, not an
/// error. Each identity owns its own cart record; records are swapped on
/// identity change, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    Guest,
    User(String),
}

impl OwnerKey {
    /// Resolve the current owner from ambient session state.
    #[must_use]
    pub fn resolve(session: &dyn SessionSource) -> Self {
        session.user_id().map_or(Self::Guest, Self::User)
    }

    /// Durable storage key for this owner's cart record.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("cart_{self}")
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str("guest"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

/// Error parsing an owner key from its stored string form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid owner key: expected \"guest\" or \"user:<id>\"")]
pub struct ParseOwnerKeyError;

impl FromStr for OwnerKey {
    type Err = ParseOwnerKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == "guest" {
            return Ok(Self::Guest);
        }

        match raw.strip_prefix("user:") {
            Some(id) if !id.is_empty() => Ok(Self::User(id.to_string())),
            _ => Err(ParseOwnerKeyError),
        }
    }
}

impl Serialize for OwnerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OwnerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(de::Error::custom)
    }
}

/// Session state persisted in the same durable storage as the carts.
#[derive(Clone)]
pub struct StoredSession {
    storage: Arc<dyn KeyValueStore>,
}

impl StoredSession {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Record credentials issued by the auth service.
    ///
    /// # Errors
    ///
    /// Returns an error when the credentials cannot be written to storage.
    pub fn login(&self, token: &str, user_id: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_ID_KEY, user_id)?;

        Ok(())
    }
}

impl SessionSource for StoredSession {
    fn token(&self) -> Option<AuthToken> {
        self.storage.get(TOKEN_KEY).ok().flatten().map(AuthToken::new)
    }

    fn user_id(&self) -> Option<String> {
        self.storage.get(USER_ID_KEY).ok().flatten()
    }

    fn clear(&self) {
        for key in [TOKEN_KEY, USER_ID_KEY] {
            if let Err(error) = self.storage.remove(key) {
                warn!("failed to clear session key {key}: {error}");
            }
        }
    }
}
