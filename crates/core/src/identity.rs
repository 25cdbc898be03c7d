//! Record identity for the cache.
//!
//! A record is identified by its type name plus either a server-assigned id
//! or a locally generated client id. Client ids cover records created on the
//! client that have not been saved yet; they are replaced by a remote key once
//! a save completes.

use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Locally generated identifier for a not-yet-saved record.
pub type ClientId = u64;

/// Global counter for client ids.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates the next client id.
pub fn next_client_id() -> ClientId {
    NEXT_CLIENT_ID.fetch_add(1, Ordering::SeqCst)
}

/// The key half of a record identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Server-assigned id.
    Remote(String),
    /// Locally generated id for an unsaved record.
    Client(ClientId),
}

impl RecordKey {
    /// Returns true if this is a server-assigned key.
    #[inline]
    pub fn is_remote(&self) -> bool {
        matches!(self, RecordKey::Remote(_))
    }

    /// Returns true if this is a locally generated key.
    #[inline]
    pub fn is_client(&self) -> bool {
        matches!(self, RecordKey::Client(_))
    }

    /// Returns the remote id if this is a Remote key, None otherwise.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            RecordKey::Remote(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// Stable identity of a cached record: `(type, key)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordIdentity {
    rtype: String,
    key: RecordKey,
}

impl RecordIdentity {
    /// Creates an identity for a server-identified record.
    pub fn remote(rtype: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            rtype: rtype.into(),
            key: RecordKey::Remote(id.into()),
        }
    }

    /// Creates an identity with a freshly allocated client id.
    pub fn client(rtype: impl Into<String>) -> Self {
        Self {
            rtype: rtype.into(),
            key: RecordKey::Client(next_client_id()),
        }
    }

    /// Creates an identity from an existing key.
    pub fn new(rtype: impl Into<String>, key: RecordKey) -> Self {
        Self {
            rtype: rtype.into(),
            key,
        }
    }

    /// Returns the record type name.
    #[inline]
    pub fn record_type(&self) -> &str {
        &self.rtype
    }

    /// Returns the identity key.
    #[inline]
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Returns a copy of this identity rekeyed with a remote id.
    pub fn with_remote_key(&self, id: impl Into<String>) -> Self {
        Self {
            rtype: self.rtype.clone(),
            key: RecordKey::Remote(id.into()),
        }
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            RecordKey::Remote(id) => write!(f, "{}:{}", self.rtype, id),
            RecordKey::Client(id) => write!(f, "{}:client-{}", self.rtype, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_remote_identity() {
        let identity = RecordIdentity::remote("person", "1");
        assert_eq!(identity.record_type(), "person");
        assert!(identity.key().is_remote());
        assert_eq!(identity.key().as_remote(), Some("1"));
        assert_eq!(identity.to_string(), "person:1");
    }

    #[test]
    fn test_client_identity_is_unique() {
        let a = RecordIdentity::client("person");
        let b = RecordIdentity::client("person");
        assert!(a.key().is_client());
        assert_ne!(a, b);
    }

    #[test]
    fn test_rekey_to_remote() {
        let local = RecordIdentity::client("car");
        let saved = local.with_remote_key("9");
        assert_eq!(saved.record_type(), "car");
        assert_eq!(saved.key().as_remote(), Some("9"));
    }
}
