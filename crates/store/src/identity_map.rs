//! Identity map: the arena owning every cached record.
//!
//! Records are addressed by stable integer handles. The map keeps a reverse
//! index from identity to handle and a per-type index in insertion order,
//! which is the order live collections expose.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use liveset_core::{Record, RecordHandle, RecordIdentity};

/// Arena of cached records.
pub struct IdentityMap {
    records: HashMap<RecordHandle, Record>,
    handles: HashMap<RecordIdentity, RecordHandle>,
    /// Record type -> handles in insertion order.
    by_type: HashMap<String, Vec<RecordHandle>>,
    next_handle: RecordHandle,
}

impl Default for IdentityMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityMap {
    /// Creates an empty identity map.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            handles: HashMap::new(),
            by_type: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Inserts a record and returns its handle.
    ///
    /// The caller must have checked that the identity is not already mapped;
    /// pushing an existing identity is an update, not an insert.
    pub fn insert(&mut self, record: Record) -> RecordHandle {
        let handle = self.next_handle;
        self.next_handle += 1;

        self.handles.insert(record.identity().clone(), handle);
        self.by_type
            .entry(String::from(record.identity().record_type()))
            .or_default()
            .push(handle);
        self.records.insert(handle, record);

        handle
    }

    /// Looks up the handle for an identity.
    pub fn handle_of(&self, identity: &RecordIdentity) -> Option<RecordHandle> {
        self.handles.get(identity).copied()
    }

    /// Returns the record for a handle.
    #[inline]
    pub fn get(&self, handle: RecordHandle) -> Option<&Record> {
        self.records.get(&handle)
    }

    /// Returns the record for a handle, mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: RecordHandle) -> Option<&mut Record> {
        self.records.get_mut(&handle)
    }

    /// Returns the record for an identity.
    pub fn get_by_identity(&self, identity: &RecordIdentity) -> Option<&Record> {
        self.handle_of(identity).and_then(|h| self.get(h))
    }

    /// Replaces a record's identity, keeping its handle stable.
    ///
    /// Used when a locally created record gains its server key. Returns false
    /// if the handle is unknown or the new identity is already mapped to a
    /// different record.
    pub fn rekey(&mut self, handle: RecordHandle, identity: RecordIdentity) -> bool {
        if let Some(&existing) = self.handles.get(&identity) {
            return existing == handle;
        }
        let record = match self.records.get_mut(&handle) {
            Some(record) => record,
            None => return false,
        };
        self.handles.remove(record.identity());
        self.handles.insert(identity.clone(), handle);
        record.set_identity(identity);
        true
    }

    /// Handles of every record of a type, in insertion order.
    pub fn handles_of_type(&self, rtype: &str) -> &[RecordHandle] {
        self.by_type.get(rtype).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the number of cached records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
