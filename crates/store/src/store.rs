//! Store facade: the public surface of the record cache.
//!
//! The store owns the identity map and the record array manager and wires
//! them together: push payloads and record mutations mark records pending and
//! schedule a flush; `flush()` is the externally driven entry point that
//! reconciles pending changes into collection membership (the cooperative
//! scheduler analog of a once-per-turn batched update).

use crate::identity_map::IdentityMap;
use crate::manager::RecordArrayManager;
use crate::payload::PushPayload;
use alloc::string::String;
use alloc::vec::Vec;
use liveset_collections::{ListenerId, Predicate, Splice};
use liveset_core::{
    CollectionId, Error, Record, RecordHandle, RecordIdentity, RecordStatus, Result, Value,
};
use log::debug;

/// Client-side record cache with live collection maintenance.
pub struct Store {
    records: IdentityMap,
    manager: RecordArrayManager,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: IdentityMap::new(),
            manager: RecordArrayManager::new(),
        }
    }

    // ------------------------------------------------------------------
    // Push interface
    // ------------------------------------------------------------------

    /// Pushes one normalized payload into the cache.
    ///
    /// A new `(type, id)` inserts a loaded record; an existing one updates
    /// attributes and relationships in place. Either way the record is marked
    /// pending and a flush is scheduled.
    pub fn push(&mut self, payload: PushPayload) -> Result<RecordIdentity> {
        if payload.record_type().is_empty() {
            return Err(Error::invalid_payload("empty record type"));
        }
        if payload.id().is_empty() {
            return Err(Error::invalid_payload("empty record id"));
        }

        let identity = payload.identity();
        let handle = match self.records.handle_of(&identity) {
            Some(handle) => handle,
            None => self
                .records
                .insert(Record::new(identity.clone(), RecordStatus::Loaded)),
        };

        if let Some(record) = self.records.get_mut(handle) {
            for (name, value) in payload.attributes() {
                record.set_attribute(name.clone(), value.clone());
            }
            for (name, targets) in payload.relationships() {
                record.set_relationship(name.clone(), targets.clone());
            }
            record.set_status(RecordStatus::Loaded);
        }

        self.manager.record_did_change(identity.record_type(), handle);
        Ok(identity)
    }

    /// Pushes a batch of payloads as one mutation wave: every record is
    /// marked pending, a single flush is scheduled.
    pub fn push_many(&mut self, payloads: Vec<PushPayload>) -> Result<Vec<RecordIdentity>> {
        let mut identities = Vec::with_capacity(payloads.len());
        for payload in payloads {
            identities.push(self.push(payload)?);
        }
        Ok(identities)
    }

    // ------------------------------------------------------------------
    // Record interface
    // ------------------------------------------------------------------

    /// Creates a client-side record with a locally generated key. Excluded
    /// from live collections until `record_saved` assigns a remote key.
    pub fn create_record(
        &mut self,
        rtype: impl Into<String>,
        attributes: Vec<(String, Value)>,
    ) -> RecordIdentity {
        let identity = RecordIdentity::client(rtype);
        let mut record = Record::new(identity.clone(), RecordStatus::New);
        for (name, value) in attributes {
            record.set_attribute(name, value);
        }
        let handle = self.records.insert(record);
        self.manager.record_did_change(identity.record_type(), handle);
        identity
    }

    /// Promotes a record to its server-assigned key after a successful save.
    /// Returns the new identity.
    pub fn record_saved(
        &mut self,
        identity: &RecordIdentity,
        remote_id: impl Into<String>,
    ) -> Result<RecordIdentity> {
        let handle = self.handle_or_err(identity)?;
        let saved = identity.with_remote_key(remote_id);
        if !self.records.rekey(handle, saved.clone()) {
            return Err(Error::invalid_operation(
                "remote id already mapped to another record",
            ));
        }
        if let Some(record) = self.records.get_mut(handle) {
            record.set_status(RecordStatus::Loaded);
        }
        self.manager.record_did_change(saved.record_type(), handle);
        Ok(saved)
    }

    /// Marks a record deleted. The next flush removes it from every
    /// collection it belongs to.
    pub fn delete_record(&mut self, identity: &RecordIdentity) -> Result<()> {
        let handle = self.handle_or_err(identity)?;
        if let Some(record) = self.records.get_mut(handle) {
            record.set_status(RecordStatus::Deleted);
        }
        self.manager.record_did_change(identity.record_type(), handle);
        Ok(())
    }

    /// Sets an attribute on a cached record and schedules a flush. A pure
    /// field change produces no membership notification on live collections.
    pub fn set_attribute(
        &mut self,
        identity: &RecordIdentity,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let handle = self.handle_or_err(identity)?;
        if let Some(record) = self.records.get_mut(handle) {
            record.set_attribute(name, value.into());
        }
        self.manager.record_did_change(identity.record_type(), handle);
        Ok(())
    }

    /// Looks up a cached record without scheduling anything.
    pub fn peek_record(&self, identity: &RecordIdentity) -> Option<&Record> {
        self.records.get_by_identity(identity)
    }

    /// Returns how many collections currently contain the record.
    pub fn membership_count(&self, identity: &RecordIdentity) -> Option<usize> {
        self.peek_record(identity).map(Record::collection_count)
    }

    /// Returns the number of cached records.
    #[inline]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    // ------------------------------------------------------------------
    // Consumer interface
    // ------------------------------------------------------------------

    /// Returns the live collection for a type, creating it on first access.
    pub fn peek_all(&mut self, rtype: &str) -> CollectionId {
        self.manager.live_collection(rtype, &mut self.records)
    }

    /// Creates an independent filtered collection over a type.
    pub fn create_filtered(&mut self, rtype: &str, predicate: Predicate) -> Result<CollectionId> {
        self.manager
            .create_filtered(rtype, predicate, &mut self.records)
    }

    /// Creates a query-result collection. Membership is installed later via
    /// `set_query_results`.
    pub fn create_query(
        &mut self,
        rtype: &str,
        params: Vec<(String, Value)>,
    ) -> CollectionId {
        self.manager.create_query(rtype, params)
    }

    /// Installs a query collection's membership from a query result.
    pub fn set_query_results(
        &mut self,
        id: CollectionId,
        results: &[RecordIdentity],
    ) -> Result<()> {
        let mut handles = Vec::with_capacity(results.len());
        for identity in results {
            handles.push(self.handle_or_err(identity)?);
        }
        self.manager
            .set_query_results(id, handles, &mut self.records)
    }

    /// Returns the number of members in a collection.
    pub fn collection_len(&self, id: CollectionId) -> Result<usize> {
        Ok(self.manager.collection(id)?.len())
    }

    /// Returns the collection's records in membership order.
    pub fn collection_records(&self, id: CollectionId) -> Result<Vec<&Record>> {
        let coll = self.manager.collection(id)?;
        Ok(coll
            .members()
            .iter()
            .filter_map(|&h| self.records.get(h))
            .collect())
    }

    /// Membership test by identity.
    pub fn collection_contains(
        &self,
        id: CollectionId,
        identity: &RecordIdentity,
    ) -> Result<bool> {
        let coll = self.manager.collection(id)?;
        Ok(self
            .records
            .handle_of(identity)
            .map_or(false, |h| coll.contains(h)))
    }

    /// Attaches a change listener to a collection. The listener receives one
    /// splice per flush cycle that changed membership.
    pub fn observe<F>(&mut self, id: CollectionId, listener: F) -> Result<ListenerId>
    where
        F: Fn(&Splice) + 'static,
    {
        Ok(self.manager.collection_mut(id)?.observe(listener))
    }

    /// Detaches a change listener.
    pub fn unobserve(&mut self, id: CollectionId, listener: ListenerId) -> Result<bool> {
        Ok(self.manager.collection_mut(id)?.unobserve(listener))
    }

    /// Returns true if a live collection exists for the type.
    pub fn has_live(&self, rtype: &str) -> bool {
        self.manager.has_live(rtype)
    }

    /// Returns the number of registered query collections.
    pub fn query_collection_count(&self) -> usize {
        self.manager.query_collections().len()
    }

    // ------------------------------------------------------------------
    // Scheduling and teardown
    // ------------------------------------------------------------------

    /// Returns true if mutations are waiting for a flush.
    #[inline]
    pub fn needs_flush(&self) -> bool {
        self.manager.needs_flush()
    }

    /// Reconciles pending record changes into collection membership,
    /// emitting at most one notification per affected collection.
    pub fn flush(&mut self) -> Result<()> {
        self.manager.flush(&mut self.records)
    }

    /// Destroys one collection. Double-destroy is a no-op returning false.
    pub fn destroy_collection(&mut self, id: CollectionId) -> bool {
        self.manager.destroy_collection(id, &mut self.records)
    }

    /// Destroys every collection and clears the manager's registries.
    /// Records stay cached, with empty membership sets.
    pub fn destroy(&mut self) {
        debug!("store teardown");
        self.manager.destroy(&mut self.records);
    }

    fn handle_or_err(&self, identity: &RecordIdentity) -> Result<RecordHandle> {
        self.records
            .handle_of(identity)
            .ok_or_else(|| Error::record_not_found(identity.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_push_inserts_then_updates() {
        let mut store = Store::new();

        let identity = store
            .push(PushPayload::new("car", "1").attr("model", "Mini Cooper"))
            .unwrap();
        assert_eq!(store.record_count(), 1);

        store
            .push(PushPayload::new("car", "1").attr("model", "Mini"))
            .unwrap();
        assert_eq!(store.record_count(), 1);

        let record = store.peek_record(&identity).unwrap();
        assert_eq!(record.attribute("model").and_then(Value::as_str), Some("Mini"));
    }

    #[test]
    fn test_push_rejects_malformed_payloads() {
        let mut store = Store::new();
        assert!(matches!(
            store.push(PushPayload::new("", "1")),
            Err(Error::InvalidPayload { .. })
        ));
        assert!(matches!(
            store.push(PushPayload::new("car", "")),
            Err(Error::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_new_record_excluded_until_saved() {
        let mut store = Store::new();
        let all = store.peek_all("car");

        let local = store.create_record("car", vec![]);
        store.flush().unwrap();
        assert_eq!(store.collection_len(all).unwrap(), 0);

        let saved = store.record_saved(&local, "5").unwrap();
        store.flush().unwrap();
        assert_eq!(store.collection_len(all).unwrap(), 1);
        assert!(store.collection_contains(all, &saved).unwrap());
        assert!(store.peek_record(&local).is_none());
    }

    #[test]
    fn test_delete_removes_membership() {
        let mut store = Store::new();
        let all = store.peek_all("car");

        let identity = store.push(PushPayload::new("car", "1")).unwrap();
        store.flush().unwrap();
        assert_eq!(store.collection_len(all).unwrap(), 1);

        store.delete_record(&identity).unwrap();
        store.flush().unwrap();
        assert_eq!(store.collection_len(all).unwrap(), 0);
        assert_eq!(store.membership_count(&identity), Some(0));
    }

    #[test]
    fn test_unknown_identity_errors() {
        let mut store = Store::new();
        let ghost = RecordIdentity::remote("car", "404");
        assert!(matches!(
            store.delete_record(&ghost),
            Err(Error::RecordNotFound { .. })
        ));
        assert!(matches!(
            store.set_attribute(&ghost, "model", "S"),
            Err(Error::RecordNotFound { .. })
        ));
        assert_eq!(store.membership_count(&ghost), None);
    }

    #[test]
    fn test_collection_ops_after_destroy_error() {
        let mut store = Store::new();
        let all = store.peek_all("car");

        assert!(store.destroy_collection(all));
        assert!(!store.destroy_collection(all));
        assert!(matches!(
            store.collection_len(all),
            Err(Error::CollectionNotFound { .. })
        ));
        assert!(matches!(
            store.observe(all, |_| {}),
            Err(Error::CollectionNotFound { .. })
        ));
    }
}
