//! Property tests for revision monotonicity and per-property uniqueness.

use std::collections::HashSet;

use proptest::prelude::*;
use saga_store::{InMemorySagaPersister, SagaError, SagaPersister};

use crate::support::OrderSaga;

proptest! {
    #[test]
    fn revisions_increase_by_one_per_write(updates in 0usize..20, delete in any::<bool>()) {
        let store = InMemorySagaPersister::new();
        let mut saga = OrderSaga::new("A");
        store.insert(&saga, &["order_id"]).unwrap();

        let mut last = saga.revision;
        for _ in 0..updates {
            saga.attempts += 1;
            store.update(&mut saga, &["order_id"]).unwrap();
            prop_assert_eq!(saga.revision, last + 1);
            last = saga.revision;
        }
        if delete {
            store.delete(&mut saga).unwrap();
            prop_assert_eq!(saga.revision, last + 1);
        }
        prop_assert_eq!(saga.revision, updates as u64 + u64::from(delete));
    }

    #[test]
    fn stale_update_never_changes_state(updates in 1usize..10, stale_at in 0usize..10) {
        let store = InMemorySagaPersister::new();
        let mut saga = OrderSaga::new("A");
        store.insert(&saga, &[]).unwrap();

        let mut stale = None;
        for step in 0..updates {
            if step == stale_at % updates {
                stale = Some(saga.clone());
            }
            saga.attempts += 1;
            store.update(&mut saga, &[]).unwrap();
        }

        let mut stale = stale.unwrap();
        stale.attempts = 1_000;
        let err = store.update(&mut stale, &[]).unwrap_err();
        let is_mismatch = matches!(err, SagaError::RevisionMismatch { .. });
        prop_assert!(is_mismatch);

        let stored = store.get::<OrderSaga>(saga.id).unwrap().unwrap();
        prop_assert_eq!(stored, saga);
    }

    #[test]
    fn insert_succeeds_iff_no_prior_equal_value(
        values in proptest::collection::vec(("[a-c]", "[x-z]"), 1..12)
    ) {
        let store = InMemorySagaPersister::new();
        let mut seen_foo = HashSet::new();
        let mut seen_order = HashSet::new();

        for (foo, order_id) in values {
            let saga = OrderSaga::new(&order_id).with_foo(&foo);
            let fresh = !seen_foo.contains(&foo) && !seen_order.contains(&order_id);
            let result = store.insert(&saga, &["foo", "order_id"]);

            prop_assert_eq!(result.is_ok(), fresh);
            if fresh {
                seen_foo.insert(foo);
                seen_order.insert(order_id);
            } else {
                let collided = matches!(result, Err(SagaError::CorrelationCollision { .. }));
                prop_assert!(collided);
            }
        }
        prop_assert_eq!(store.len().unwrap(), seen_foo.len());
    }
}
