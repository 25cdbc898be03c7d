//! Error types for the liveset record cache.

use crate::identity::RecordIdentity;
use crate::record::CollectionId;
use alloc::string::String;
use core::fmt;

/// Result type alias for cache operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for record cache operations.
#[derive(Debug)]
pub enum Error {
    /// Collection id does not name a live collection (never existed, or
    /// already destroyed).
    CollectionNotFound {
        id: CollectionId,
    },
    /// Record not present in the identity map.
    RecordNotFound {
        identity: RecordIdentity,
    },
    /// A filtered collection's predicate failed during evaluation.
    PredicateFailed {
        collection: CollectionId,
        message: String,
    },
    /// Malformed push payload.
    InvalidPayload {
        message: String,
    },
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CollectionNotFound { id } => {
                write!(f, "Collection not found: {}", id)
            }
            Error::RecordNotFound { identity } => {
                write!(f, "Record not found: {}", identity)
            }
            Error::PredicateFailed { collection, message } => {
                write!(f, "Predicate failed for collection {}: {}", collection, message)
            }
            Error::InvalidPayload { message } => {
                write!(f, "Invalid payload: {}", message)
            }
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a collection not found error.
    pub fn collection_not_found(id: CollectionId) -> Self {
        Error::CollectionNotFound { id }
    }

    /// Creates a record not found error.
    pub fn record_not_found(identity: RecordIdentity) -> Self {
        Error::RecordNotFound { identity }
    }

    /// Creates a predicate failure error.
    pub fn predicate_failed(collection: CollectionId, message: impl Into<String>) -> Self {
        Error::PredicateFailed {
            collection,
            message: message.into(),
        }
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Error::InvalidPayload {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::collection_not_found(7);
        assert!(err.to_string().contains("7"));

        let err = Error::record_not_found(RecordIdentity::remote("person", "1"));
        assert!(err.to_string().contains("person:1"));

        let err = Error::predicate_failed(3, "missing attribute");
        assert!(err.to_string().contains("missing attribute"));
    }

    #[test]
    fn test_error_constructors() {
        let err = Error::invalid_payload("empty type name");
        match err {
            Error::InvalidPayload { message } => assert_eq!(message, "empty type name"),
            _ => panic!("Wrong error type"),
        }
    }
}
