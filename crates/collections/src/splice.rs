//! Batched membership edits and the splice notification they produce.
//!
//! All membership changes a collection receives within one flush cycle are
//! buffered in an `EditBatch`. Applying the batch yields at most one `Splice`
//! describing a single contiguous logical edit region, no matter how
//! scattered the underlying adds and removes are.

use alloc::vec::Vec;
use liveset_core::RecordHandle;

/// A single contiguous logical edit to an ordered collection.
///
/// Mirrors the `(startIndex, removedCount, addedCount)` shape consumers
/// receive through their change-notification hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Splice {
    /// Index where the edit region begins.
    pub start: usize,
    /// Number of members removed.
    pub removed: usize,
    /// Number of members added.
    pub added: usize,
}

impl Splice {
    /// Creates a new splice.
    #[inline]
    pub fn new(start: usize, removed: usize, added: usize) -> Self {
        Self {
            start,
            removed,
            added,
        }
    }

    /// Returns true if the splice describes no change.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.added == 0
    }
}

/// Pending membership edits for one collection within one flush cycle.
///
/// Adds and removes cancel pairwise: a handle that is added and then removed
/// (or removed and then re-added) within the same batch produces no edit at
/// all, so a record created and deleted before a flush emits nothing.
#[derive(Debug, Default)]
pub struct EditBatch {
    added: Vec<RecordHandle>,
    removed: Vec<RecordHandle>,
}

impl EditBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a handle for addition. Cancels a pending removal of the same
    /// handle instead of recording both.
    pub fn add(&mut self, handle: RecordHandle) {
        if let Some(pos) = self.removed.iter().position(|&h| h == handle) {
            self.removed.swap_remove(pos);
            return;
        }
        if !self.added.contains(&handle) {
            self.added.push(handle);
        }
    }

    /// Queues a handle for removal. Cancels a pending addition of the same
    /// handle instead of recording both.
    pub fn remove(&mut self, handle: RecordHandle) {
        if let Some(pos) = self.added.iter().position(|&h| h == handle) {
            self.added.swap_remove(pos);
            return;
        }
        if !self.removed.contains(&handle) {
            self.removed.push(handle);
        }
    }

    /// Handles queued for addition, in arrival order.
    #[inline]
    pub fn added(&self) -> &[RecordHandle] {
        &self.added
    }

    /// Handles queued for removal.
    #[inline]
    pub fn removed(&self) -> &[RecordHandle] {
        &self.removed
    }

    /// Returns true if the batch nets out to no edits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
