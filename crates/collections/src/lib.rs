//! Liveset Collections - Record collections and batched change notification.
//!
//! This crate implements the collection layer of the liveset record cache.
//! A collection is an ordered view over record handles; membership edits made
//! during one flush cycle are coalesced into a single `Splice` notification
//! describing one contiguous logical edit region.
//!
//! # Core Concepts
//!
//! - `Splice`: One `(start_index, removed_count, added_count)` edit region
//! - `EditBatch`: Accumulates adds/removes for one flush, with net-effect
//!   cancellation (a handle added and removed in the same batch vanishes)
//! - `ListenerSet`: Change-notification subscriptions for a collection
//! - `RecordCollection`: An ordered member sequence with a kind (live,
//!   filtered by predicate, or query-result)
//!
//! # Example
//!
//! ```rust
//! use liveset_collections::{CollectionKind, EditBatch, RecordCollection};
//!
//! let mut all = RecordCollection::new(1, "car", CollectionKind::Live);
//!
//! let mut batch = EditBatch::new();
//! batch.add(10);
//! batch.add(11);
//!
//! let splice = all.apply(&batch).unwrap();
//! assert_eq!((splice.start, splice.removed, splice.added), (0, 0, 2));
//! assert_eq!(all.members(), &[10, 11]);
//! ```

#![no_std]

extern crate alloc;

mod collection;
mod notify;
mod splice;

pub use collection::{CollectionKind, Predicate, RecordCollection};
pub use notify::{ChangeListener, ListenerId, ListenerSet};
pub use splice::{EditBatch, Splice};
