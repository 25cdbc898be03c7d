//! Liveset Core - Core record and identity types for the liveset record cache.
//!
//! This crate provides the foundational types for the liveset client-side
//! record cache:
//!
//! - `Value`: Attribute values carried by cached records
//! - `RecordKey` / `RecordIdentity`: Stable record identity (server-assigned
//!   id, or a locally generated client id for not-yet-saved records)
//! - `RecordStatus`: Lifecycle status of a cached record
//! - `Record`: A cached record with attributes, relationship references, and
//!   the set of collections it currently belongs to
//! - `Error`: Error types for cache operations
//!
//! # Example
//!
//! ```rust
//! use liveset_core::{Record, RecordIdentity, RecordStatus, Value};
//!
//! let identity = RecordIdentity::remote("person", "1");
//! let mut record = Record::new(identity, RecordStatus::Loaded);
//! record.set_attribute("name", Value::String("Tom Dale".into()));
//!
//! assert_eq!(record.attribute("name").and_then(Value::as_str), Some("Tom Dale"));
//! assert_eq!(record.collection_count(), 0);
//! ```

#![no_std]

extern crate alloc;

mod error;
mod identity;
mod record;
mod value;

pub use error::{Error, Result};
pub use identity::{next_client_id, ClientId, RecordIdentity, RecordKey};
pub use record::{CollectionId, Record, RecordHandle, RecordStatus};
pub use value::Value;
