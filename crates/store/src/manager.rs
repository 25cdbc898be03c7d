//! Record array manager: the collection orchestrator.
//!
//! The manager owns every collection in an arena keyed by `CollectionId`,
//! tracks pending record changes per type, and reconciles them into
//! collection membership in one batched flush pass. Registries mirror the
//! arena: one live collection per type, any number of filtered collections
//! per type, and query collections in creation order.
//!
//! Flush runs in two phases. Phase one is read-only: it walks the pending
//! handles and accumulates an `EditBatch` per affected collection, running
//! filtered predicates over the changed records only. A predicate error
//! aborts here, before any membership has been touched, and the pending set
//! is restored so a later flush can retry. Phase two applies each non-empty
//! batch: record membership sets and collection member sequences are updated
//! together, and each collection emits at most one splice.

use crate::identity_map::IdentityMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;
use hashbrown::{HashMap, HashSet};
use liveset_collections::{CollectionKind, EditBatch, Predicate, RecordCollection};
use liveset_core::{CollectionId, Error, Record, RecordHandle, Result, Value};
use log::{debug, trace};

/// Live-collection membership policy: a record is eligible once it exists
/// with a server-assigned key and is not deleted. Locally created records
/// stay out until their first successful save assigns a remote key.
fn live_eligible(record: &Record) -> bool {
    !record.is_deleted() && record.identity().key().is_remote()
}

/// Finds or creates the edit batch for a collection, preserving the order in
/// which collections were first touched.
fn batch_for(
    batches: &mut Vec<(CollectionId, EditBatch)>,
    id: CollectionId,
) -> &mut EditBatch {
    if let Some(pos) = batches.iter().position(|(cid, _)| *cid == id) {
        return &mut batches[pos].1;
    }
    batches.push((id, EditBatch::new()));
    let last = batches.len() - 1;
    &mut batches[last].1
}

/// Owns all collections and reconciles pending record changes into them.
pub struct RecordArrayManager {
    collections: HashMap<CollectionId, RecordCollection>,
    /// Record type -> the singleton live collection.
    live: HashMap<String, CollectionId>,
    /// Record type -> filtered collections watching it.
    filtered: HashMap<String, Vec<CollectionId>>,
    /// Query collections in creation order.
    query: Vec<CollectionId>,
    /// Record type -> handles changed since the last flush.
    pending: HashMap<String, HashSet<RecordHandle>>,
    next_id: CollectionId,
    flush_scheduled: bool,
}

impl Default for RecordArrayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordArrayManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
            live: HashMap::new(),
            filtered: HashMap::new(),
            query: Vec::new(),
            pending: HashMap::new(),
            next_id: 1,
            flush_scheduled: false,
        }
    }

    fn alloc_id(&mut self) -> CollectionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Returns the live collection for a type, creating and synchronously
    /// populating it on first access. Idempotent per type.
    pub fn live_collection(&mut self, rtype: &str, records: &mut IdentityMap) -> CollectionId {
        if let Some(&id) = self.live.get(rtype) {
            return id;
        }

        let id = self.alloc_id();
        let members: Vec<RecordHandle> = records
            .handles_of_type(rtype)
            .iter()
            .copied()
            .filter(|&h| records.get(h).map_or(false, live_eligible))
            .collect();
        for &h in &members {
            if let Some(record) = records.get_mut(h) {
                record.join_collection(id);
            }
        }

        let mut coll = RecordCollection::new(id, rtype, CollectionKind::Live);
        coll.seed(members);
        self.collections.insert(id, coll);
        self.live.insert(String::from(rtype), id);
        id
    }

    /// Creates a new filtered collection, evaluating the predicate over the
    /// current record universe for its type. Never deduplicated: every call
    /// yields an independent collection.
    ///
    /// A predicate error during the initial pass fails the call and leaves
    /// the manager unchanged.
    pub fn create_filtered(
        &mut self,
        rtype: &str,
        predicate: Predicate,
        records: &mut IdentityMap,
    ) -> Result<CollectionId> {
        let id = self.alloc_id();

        let mut members = Vec::new();
        for &h in records.handles_of_type(rtype) {
            let record = match records.get(h) {
                Some(record) if !record.is_deleted() => record,
                _ => continue,
            };
            match predicate(record) {
                Ok(true) => members.push(h),
                Ok(false) => {}
                Err(message) => return Err(Error::predicate_failed(id, message)),
            }
        }

        for &h in &members {
            if let Some(record) = records.get_mut(h) {
                record.join_collection(id);
            }
        }

        let mut coll = RecordCollection::new(id, rtype, CollectionKind::Filtered { predicate });
        coll.seed(members);
        self.collections.insert(id, coll);
        self.filtered
            .entry(String::from(rtype))
            .or_default()
            .push(id);
        Ok(id)
    }

    /// Creates a new query-result collection with empty membership. Recorded
    /// in the query registry in creation order.
    pub fn create_query(
        &mut self,
        rtype: &str,
        params: Vec<(String, Value)>,
    ) -> CollectionId {
        let id = self.alloc_id();
        let coll = RecordCollection::new(id, rtype, CollectionKind::Query { params });
        self.collections.insert(id, coll);
        self.query.push(id);
        id
    }

    /// Returns true if a live collection exists for the type.
    pub fn has_live(&self, rtype: &str) -> bool {
        self.live.contains_key(rtype)
    }

    /// Query collections currently registered, in creation order.
    #[inline]
    pub fn query_collections(&self) -> &[CollectionId] {
        &self.query
    }

    /// Returns the number of collections the manager owns.
    #[inline]
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Looks up a collection.
    pub fn collection(&self, id: CollectionId) -> Result<&RecordCollection> {
        self.collections
            .get(&id)
            .ok_or_else(|| Error::collection_not_found(id))
    }

    /// Looks up a collection, mutably.
    pub fn collection_mut(&mut self, id: CollectionId) -> Result<&mut RecordCollection> {
        self.collections
            .get_mut(&id)
            .ok_or_else(|| Error::collection_not_found(id))
    }

    /// Marks a record changed and schedules a flush. Repeated calls within
    /// one cycle coalesce into a single flush.
    pub fn record_did_change(&mut self, rtype: &str, handle: RecordHandle) {
        self.pending
            .entry(String::from(rtype))
            .or_default()
            .insert(handle);
        self.flush_scheduled = true;
    }

    /// Returns true if a flush is scheduled.
    #[inline]
    pub fn needs_flush(&self) -> bool {
        self.flush_scheduled
    }

    /// Reconciles all pending changes into collection membership.
    ///
    /// A no-op when nothing is scheduled. On predicate failure the pending
    /// set is restored and no membership changes, then the error propagates.
    pub fn flush(&mut self, records: &mut IdentityMap) -> Result<()> {
        if !self.flush_scheduled {
            return Ok(());
        }
        let pending = mem::take(&mut self.pending);
        self.flush_scheduled = false;

        debug!("flush: {} record type(s) pending", pending.len());

        let batches = match self.collect_edits(&pending, records) {
            Ok(batches) => batches,
            Err(err) => {
                // nothing applied yet; requeue so a later flush can retry
                self.pending = pending;
                self.flush_scheduled = true;
                return Err(err);
            }
        };

        for (cid, batch) in batches {
            if batch.is_empty() {
                continue;
            }
            // a collection may have been destroyed between scheduling and
            // flush; its batch is simply dropped
            let coll = match self.collections.get_mut(&cid) {
                Some(coll) => coll,
                None => continue,
            };
            for &h in batch.removed() {
                if coll.contains(h) {
                    if let Some(record) = records.get_mut(h) {
                        record.leave_collection(cid);
                    }
                }
            }
            for &h in batch.added() {
                if !coll.contains(h) {
                    if let Some(record) = records.get_mut(h) {
                        record.join_collection(cid);
                    }
                }
            }
            if let Some(splice) = coll.apply(&batch) {
                trace!(
                    "collection {} ({}): splice start={} removed={} added={}",
                    cid,
                    coll.kind().name(),
                    splice.start,
                    splice.removed,
                    splice.added
                );
            }
        }
        Ok(())
    }

    /// Phase one of flush: computes per-collection edit batches from the
    /// pending handles without mutating anything. Predicates run over the
    /// changed records only, never the whole universe.
    fn collect_edits(
        &self,
        pending: &HashMap<String, HashSet<RecordHandle>>,
        records: &IdentityMap,
    ) -> Result<Vec<(CollectionId, EditBatch)>> {
        let mut batches: Vec<(CollectionId, EditBatch)> = Vec::new();

        for (rtype, handles) in pending {
            let live_id = self.live.get(rtype).copied();
            let filtered_ids: &[CollectionId] =
                self.filtered.get(rtype).map(Vec::as_slice).unwrap_or(&[]);

            for &h in handles {
                let record = match records.get(h) {
                    Some(record) => record,
                    None => continue,
                };

                if record.is_deleted() {
                    // removal path: drop the record from every collection
                    // holding it, query collections included
                    for &cid in record.collections() {
                        batch_for(&mut batches, cid).remove(h);
                    }
                    continue;
                }

                if let Some(lid) = live_id {
                    let in_live = self
                        .collections
                        .get(&lid)
                        .map_or(false, |coll| coll.contains(h));
                    let eligible = live_eligible(record);
                    if eligible && !in_live {
                        batch_for(&mut batches, lid).add(h);
                    } else if !eligible && in_live {
                        batch_for(&mut batches, lid).remove(h);
                    }
                }

                for &fid in filtered_ids {
                    let coll = match self.collections.get(&fid) {
                        Some(coll) => coll,
                        None => continue,
                    };
                    let verdict = match coll.predicate() {
                        Some(predicate) => predicate(record)
                            .map_err(|message| Error::predicate_failed(fid, message))?,
                        None => false,
                    };
                    let is_member = coll.contains(h);
                    if verdict && !is_member {
                        batch_for(&mut batches, fid).add(h);
                    } else if !verdict && is_member {
                        batch_for(&mut batches, fid).remove(h);
                    }
                }
            }
        }

        Ok(batches)
    }

    /// Installs a query collection's membership explicitly, diffing against
    /// the current members and emitting one splice.
    pub fn set_query_results(
        &mut self,
        id: CollectionId,
        results: Vec<RecordHandle>,
        records: &mut IdentityMap,
    ) -> Result<()> {
        let coll = self
            .collections
            .get_mut(&id)
            .ok_or_else(|| Error::collection_not_found(id))?;
        if !coll.is_query() {
            return Err(Error::invalid_operation(
                "set_query_results requires a query collection",
            ));
        }

        let keep: HashSet<RecordHandle> = results.iter().copied().collect();
        let mut batch = EditBatch::new();
        for &h in coll.members() {
            if !keep.contains(&h) {
                batch.remove(h);
            }
        }
        for &h in &results {
            if !coll.contains(h) {
                batch.add(h);
            }
        }

        for &h in batch.removed() {
            if let Some(record) = records.get_mut(h) {
                record.leave_collection(id);
            }
        }
        for &h in batch.added() {
            if let Some(record) = records.get_mut(h) {
                record.join_collection(id);
            }
        }
        coll.apply(&batch);
        Ok(())
    }

    /// Destroys a collection: removes it from every member's membership set
    /// and from the registries. Destroying an already-destroyed collection is
    /// a no-op returning false.
    pub fn destroy_collection(&mut self, id: CollectionId, records: &mut IdentityMap) -> bool {
        let mut coll = match self.collections.remove(&id) {
            Some(coll) => coll,
            None => return false,
        };

        for h in coll.drain_for_destroy() {
            if let Some(record) = records.get_mut(h) {
                record.leave_collection(id);
            }
        }

        match coll.kind() {
            CollectionKind::Live => {
                self.live.remove(coll.record_type());
            }
            CollectionKind::Filtered { .. } => {
                if let Some(ids) = self.filtered.get_mut(coll.record_type()) {
                    ids.retain(|&cid| cid != id);
                    if ids.is_empty() {
                        self.filtered.remove(coll.record_type());
                    }
                }
            }
            CollectionKind::Query { .. } => {
                self.query.retain(|&cid| cid != id);
            }
        }

        debug!(
            "destroyed {} collection {} ({})",
            coll.kind().name(),
            id,
            coll.record_type()
        );
        true
    }

    /// Destroys every collection and clears all registries and pending state.
    pub fn destroy(&mut self, records: &mut IdentityMap) {
        let ids: Vec<CollectionId> = self.collections.keys().copied().collect();
        for id in ids {
            self.destroy_collection(id, records);
        }
        self.live.clear();
        self.filtered.clear();
        self.query.clear();
        self.pending.clear();
        self.flush_scheduled = false;
        debug!("record array manager destroyed");
    }
}
