//! Cached record representation.
//!
//! A `Record` is the cache's view of a domain entity: identity, lifecycle
//! status, attribute values, relationship references, and the set of
//! collections that currently contain it. The membership set is the record
//! side of the bidirectional record/collection bookkeeping; only the
//! collection manager writes to it.

use crate::identity::RecordIdentity;
use crate::value::Value;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};

/// Unique identifier for a collection within the manager's arena.
pub type CollectionId = u64;

/// Stable handle addressing a record in the identity map.
pub type RecordHandle = u64;

/// Lifecycle status of a cached record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStatus {
    /// Created on the client, not yet saved.
    New,
    /// Loaded from a push payload or a completed save.
    Loaded,
    /// A save of local changes is in flight.
    Updating,
    /// Deleted; pending removal from every collection.
    Deleted,
}

impl RecordStatus {
    /// Returns true if the record has been deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        matches!(self, RecordStatus::Deleted)
    }
}

/// A record held in the identity map.
#[derive(Clone, Debug)]
pub struct Record {
    identity: RecordIdentity,
    status: RecordStatus,
    attributes: HashMap<String, Value>,
    relationships: HashMap<String, Vec<RecordIdentity>>,
    /// Collections this record currently belongs to.
    collections: HashSet<CollectionId>,
}

impl Record {
    /// Creates a record with no attributes or memberships.
    pub fn new(identity: RecordIdentity, status: RecordStatus) -> Self {
        Self {
            identity,
            status,
            attributes: HashMap::new(),
            relationships: HashMap::new(),
            collections: HashSet::new(),
        }
    }

    /// Returns the record identity.
    #[inline]
    pub fn identity(&self) -> &RecordIdentity {
        &self.identity
    }

    /// Replaces the identity. Used when a saved record gains its remote key.
    pub fn set_identity(&mut self, identity: RecordIdentity) {
        self.identity = identity;
    }

    /// Returns the lifecycle status.
    #[inline]
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    /// Sets the lifecycle status.
    #[inline]
    pub fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    /// Returns true if the record has been deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets an attribute value, returning the previous value if any.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(name.into(), value)
    }

    /// Returns the attribute map.
    #[inline]
    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    /// Returns the identities referenced by a named relationship.
    pub fn relationship(&self, name: &str) -> Option<&[RecordIdentity]> {
        self.relationships.get(name).map(Vec::as_slice)
    }

    /// Replaces a named relationship's identity list.
    pub fn set_relationship(&mut self, name: impl Into<String>, targets: Vec<RecordIdentity>) {
        self.relationships.insert(name.into(), targets);
    }

    /// Returns the set of collections containing this record.
    #[inline]
    pub fn collections(&self) -> &HashSet<CollectionId> {
        &self.collections
    }

    /// Returns how many collections contain this record.
    #[inline]
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Records membership in a collection. Returns false if already present.
    pub fn join_collection(&mut self, id: CollectionId) -> bool {
        self.collections.insert(id)
    }

    /// Drops membership in a collection. Removing a collection the record
    /// does not belong to is a no-op returning false.
    pub fn leave_collection(&mut self, id: CollectionId) -> bool {
        self.collections.remove(&id)
    }

    /// Clears every membership entry.
    pub fn clear_collections(&mut self) {
        self.collections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn make_record() -> Record {
        Record::new(RecordIdentity::remote("car", "1"), RecordStatus::Loaded)
    }

    #[test]
    fn test_attributes_update_in_place() {
        let mut record = make_record();
        assert!(record.set_attribute("model", Value::from("Mini Cooper")).is_none());

        let old = record.set_attribute("model", Value::from("Mini"));
        assert_eq!(old, Some(Value::from("Mini Cooper")));
        assert_eq!(record.attribute("model").and_then(Value::as_str), Some("Mini"));
    }

    #[test]
    fn test_relationships() {
        let mut record = make_record();
        let person = RecordIdentity::remote("person", "1");
        record.set_relationship("person", vec![person.clone()]);

        assert_eq!(record.relationship("person"), Some(&[person][..]));
        assert_eq!(record.relationship("owner"), None);
    }

    #[test]
    fn test_membership_set() {
        let mut record = make_record();
        assert!(record.join_collection(1));
        assert!(record.join_collection(2));
        assert!(!record.join_collection(1));
        assert_eq!(record.collection_count(), 2);

        assert!(record.leave_collection(1));
        assert!(!record.leave_collection(1));
        assert_eq!(record.collection_count(), 1);

        record.clear_collections();
        assert_eq!(record.collection_count(), 0);
    }

    #[test]
    fn test_status_transitions() {
        let mut record = make_record();
        assert!(!record.is_deleted());
        record.set_status(RecordStatus::Deleted);
        assert!(record.is_deleted());
    }
}
