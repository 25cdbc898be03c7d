//! Property tests for batched membership edits.

use liveset_collections::{CollectionKind, EditBatch, RecordCollection, Splice};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn splice_counts_match_membership_change(
        initial in proptest::collection::hash_set(0u64..50, 0..20),
        adds in proptest::collection::vec(0u64..50, 0..20),
        removes in proptest::collection::vec(0u64..50, 0..20),
    ) {
        let initial: Vec<u64> = initial.into_iter().collect();
        let mut coll = RecordCollection::new(1, "thing", CollectionKind::Live);
        coll.seed(initial);

        let mut batch = EditBatch::new();
        for &h in &adds {
            batch.add(h);
        }
        for &h in &removes {
            batch.remove(h);
        }

        let before: Vec<u64> = coll.members().to_vec();
        let splice = coll.apply(&batch);

        // members stay duplicate-free
        let mut seen = HashSet::new();
        for &h in coll.members() {
            prop_assert!(seen.insert(h));
        }

        // survivors keep their relative order
        let after: HashSet<u64> = coll.members().iter().copied().collect();
        let before_set: HashSet<u64> = before.iter().copied().collect();
        let survivors: Vec<u64> = before.iter().copied().filter(|h| after.contains(h)).collect();
        let kept: Vec<u64> = coll
            .members()
            .iter()
            .copied()
            .filter(|h| before_set.contains(h))
            .collect();
        prop_assert_eq!(survivors, kept);

        match splice {
            None => prop_assert_eq!(before.as_slice(), coll.members()),
            Some(s) => {
                prop_assert!(s.removed > 0 || s.added > 0);
                prop_assert_eq!(coll.members().len(), before.len() - s.removed + s.added);
                prop_assert!(s.start <= before.len());
            }
        }
    }

    #[test]
    fn add_then_remove_same_handles_nets_to_nothing(
        handles in proptest::collection::hash_set(0u64..100, 1..20),
    ) {
        let mut coll = RecordCollection::new(1, "thing", CollectionKind::Live);

        let mut batch = EditBatch::new();
        for &h in &handles {
            batch.add(h);
        }
        for &h in &handles {
            batch.remove(h);
        }

        prop_assert!(batch.is_empty());
        prop_assert!(coll.apply(&batch).is_none());
        prop_assert!(coll.is_empty());
    }

    #[test]
    fn pure_appends_start_at_old_length(
        initial in proptest::collection::hash_set(0u64..50, 0..20),
        adds in proptest::collection::hash_set(50u64..100, 1..20),
    ) {
        let initial: Vec<u64> = initial.into_iter().collect();
        let old_len = initial.len();
        let mut coll = RecordCollection::new(1, "thing", CollectionKind::Live);
        coll.seed(initial);

        let mut batch = EditBatch::new();
        for &h in &adds {
            batch.add(h);
        }

        let splice = coll.apply(&batch).unwrap();
        prop_assert_eq!(splice, Splice::new(old_len, 0, adds.len()));
    }
}
