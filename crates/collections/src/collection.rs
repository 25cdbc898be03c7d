//! Record collection implementation.
//!
//! A `RecordCollection` is an ordered view over record handles belonging to
//! one record type. Three kinds exist: the per-type live collection, filtered
//! collections driven by a predicate, and query-result collections whose
//! membership is installed explicitly. All three share the same member
//! storage, batching, and notification machinery; only the manager decides
//! what goes in and out.

use crate::notify::{ListenerId, ListenerSet};
use crate::splice::{EditBatch, Splice};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;
use liveset_core::{CollectionId, Record, RecordHandle, Value};

/// Membership predicate for a filtered collection.
///
/// Fallible: an `Err` aborts the flush that evaluated it, leaving the
/// collection's prior membership intact.
pub type Predicate = Box<dyn Fn(&Record) -> Result<bool, String>>;

/// What drives a collection's membership.
pub enum CollectionKind {
    /// Every live record of the type.
    Live,
    /// Records for which the predicate holds.
    Filtered { predicate: Predicate },
    /// Membership installed by an external query result.
    Query { params: Vec<(String, Value)> },
}

impl CollectionKind {
    /// Returns a short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Live => "live",
            CollectionKind::Filtered { .. } => "filtered",
            CollectionKind::Query { .. } => "query",
        }
    }
}

/// An ordered collection of record handles.
///
/// Membership is a set semantically but exposed as an ordered sequence:
/// insertion order is preserved and removals never reorder survivors.
pub struct RecordCollection {
    id: CollectionId,
    rtype: String,
    kind: CollectionKind,
    members: Vec<RecordHandle>,
    member_set: HashSet<RecordHandle>,
    listeners: ListenerSet,
}

impl RecordCollection {
    /// Creates an empty collection.
    pub fn new(id: CollectionId, rtype: impl Into<String>, kind: CollectionKind) -> Self {
        Self {
            id,
            rtype: rtype.into(),
            kind,
            members: Vec::new(),
            member_set: HashSet::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Returns the collection id.
    #[inline]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Returns the record type this collection views.
    #[inline]
    pub fn record_type(&self) -> &str {
        &self.rtype
    }

    /// Returns the collection kind.
    #[inline]
    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    /// Returns true for the per-type live collection.
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self.kind, CollectionKind::Live)
    }

    /// Returns true for a filtered collection.
    #[inline]
    pub fn is_filtered(&self) -> bool {
        matches!(self.kind, CollectionKind::Filtered { .. })
    }

    /// Returns true for a query-result collection.
    #[inline]
    pub fn is_query(&self) -> bool {
        matches!(self.kind, CollectionKind::Query { .. })
    }

    /// Returns the predicate for a filtered collection.
    pub fn predicate(&self) -> Option<&Predicate> {
        match &self.kind {
            CollectionKind::Filtered { predicate } => Some(predicate),
            _ => None,
        }
    }

    /// Returns the ordered member sequence.
    #[inline]
    pub fn members(&self) -> &[RecordHandle] {
        &self.members
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the collection has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Membership test.
    #[inline]
    pub fn contains(&self, handle: RecordHandle) -> bool {
        self.member_set.contains(&handle)
    }

    /// Installs the initial member sequence without notification.
    ///
    /// Used when a collection populates synchronously at construction; no
    /// listener can be attached yet.
    pub fn seed(&mut self, members: Vec<RecordHandle>) {
        self.member_set = members.iter().copied().collect();
        self.members = members;
    }

    /// Applies a batch of membership edits, emitting at most one splice.
    ///
    /// Listeners are notified before the edit is applied, matching the
    /// "array will change" contract. Adds of existing members and removes of
    /// absent handles are dropped, so an empty net effect produces no
    /// notification. The splice's edit region starts at the lowest affected
    /// index: the first removal position, or the post-removal length when the
    /// batch only appends.
    pub fn apply(&mut self, batch: &EditBatch) -> Option<Splice> {
        let removed_indices: Vec<usize> = self
            .members
            .iter()
            .enumerate()
            .filter(|(_, h)| batch.removed().contains(h))
            .map(|(i, _)| i)
            .collect();

        let adds: Vec<RecordHandle> = batch
            .added()
            .iter()
            .copied()
            .filter(|h| !self.member_set.contains(h))
            .collect();

        if removed_indices.is_empty() && adds.is_empty() {
            return None;
        }

        let survivors = self.members.len() - removed_indices.len();
        let start = match removed_indices.first() {
            Some(&first) if adds.is_empty() => first,
            Some(&first) => core::cmp::min(first, survivors),
            None => survivors,
        };
        let splice = Splice::new(start, removed_indices.len(), adds.len());

        self.listeners.notify_all(&splice);

        if !removed_indices.is_empty() {
            for &handle in batch.removed() {
                self.member_set.remove(&handle);
            }
            self.members.retain(|h| !batch.removed().contains(h));
        }
        for handle in adds {
            self.member_set.insert(handle);
            self.members.push(handle);
        }

        Some(splice)
    }

    /// Registers a change listener.
    pub fn observe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Splice) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Removes a change listener. Returns true if it was registered.
    pub fn unobserve(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Returns the number of attached listeners.
    #[inline]
    pub fn observer_count(&self) -> usize {
        self.listeners.len()
    }

    /// Empties the collection for teardown, returning the former members and
    /// silencing all listeners. No notification is emitted.
    pub fn drain_for_destroy(&mut self) -> Vec<RecordHandle> {
        self.listeners.clear();
        self.member_set.clear();
        core::mem::take(&mut self.members)
    }
}
