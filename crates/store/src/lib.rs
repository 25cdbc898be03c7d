//! Liveset Store - Record cache store and collection manager.
//!
//! This crate is the orchestrating layer of the liveset record cache:
//!
//! - `IdentityMap`: arena owning every cached record, addressed by handle
//! - `RecordArrayManager`: owns all collections, tracks pending changes per
//!   record type, and reconciles them in one batched flush
//! - `Store`: the public facade (push interface, record access, consumer
//!   collections, teardown)
//! - `PushPayload`: normalized record input from the adapter boundary
//!
//! # Example
//!
//! ```rust
//! use liveset_store::{PushPayload, Store};
//!
//! let mut store = Store::new();
//! let all_cars = store.peek_all("car");
//!
//! store.push_many(vec![
//!     PushPayload::new("car", "1").attr("make", "BMC"),
//!     PushPayload::new("car", "2").attr("make", "Jeep"),
//! ]).unwrap();
//!
//! // one flush per mutation wave, one notification per collection
//! store.flush().unwrap();
//! assert_eq!(store.collection_len(all_cars).unwrap(), 2);
//! ```

#![no_std]

extern crate alloc;

mod identity_map;
mod manager;
mod payload;
mod store;

pub use identity_map::IdentityMap;
pub use manager::RecordArrayManager;
pub use payload::PushPayload;
pub use store::Store;

// Re-export commonly used types from dependencies
pub use liveset_collections::{CollectionKind, ListenerId, Predicate, Splice};
pub use liveset_core::{
    CollectionId, Error, Record, RecordIdentity, RecordKey, RecordStatus, Result, Value,
};
