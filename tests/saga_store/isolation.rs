//! Records crossing the store boundary never alias stored state.

use std::sync::{Arc, Mutex};

use saga_store::{InMemorySagaPersister, SagaPersister};

use crate::support::OrderSaga;

#[test]
fn mutating_inserted_record_does_not_touch_store() {
    let store = InMemorySagaPersister::new();
    let mut saga = OrderSaga::new("A").with_foo("bar");
    store.insert(&saga, &["foo"]).unwrap();

    saga.foo = Some("changed".into());
    saga.attempts = 99;

    let stored = store.get::<OrderSaga>(saga.id).unwrap().unwrap();
    assert_eq!(stored.foo.as_deref(), Some("bar"));
    assert_eq!(stored.attempts, 0);
}

#[test]
fn mutating_found_record_does_not_touch_store() {
    let store = InMemorySagaPersister::new();
    store
        .insert(&OrderSaga::new("A").with_foo("bar"), &["foo"])
        .unwrap();

    let mut found: OrderSaga = store.find_by_correlation("foo", "bar").unwrap().unwrap();
    found.foo = None;

    let again: OrderSaga = store.find_by_correlation("foo", "bar").unwrap().unwrap();
    assert_eq!(again.foo.as_deref(), Some("bar"));
}

#[test]
fn later_writes_do_not_change_returned_clones() {
    let store = InMemorySagaPersister::new();
    let mut saga = OrderSaga::new("A").with_foo("bar");
    store.insert(&saga, &["foo"]).unwrap();

    let before: OrderSaga = store.find_by_correlation("foo", "bar").unwrap().unwrap();

    saga.attempts = 5;
    store.update(&mut saga, &["foo"]).unwrap();

    assert_eq!(before.attempts, 0);
    assert_eq!(before.revision, 0);
}

#[test]
fn update_leaves_caller_fields_alone_except_revision() {
    let store = InMemorySagaPersister::new();
    let mut saga = OrderSaga::new("A").with_foo("bar");
    store.insert(&saga, &["foo"]).unwrap();

    saga.attempts = 3;
    store.update(&mut saga, &["foo"]).unwrap();

    saga.attempts = 4;
    let stored = store.get::<OrderSaga>(saga.id).unwrap().unwrap();
    assert_eq!(stored.attempts, 3);
    assert_eq!(stored.revision, saga.revision);
}

#[test]
fn hook_payloads_are_detached_from_store() {
    let store = InMemorySagaPersister::new();
    let captured = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&captured);
    store
        .hooks()
        .on_created(move |saga: &OrderSaga| *sink.lock().unwrap() = Some(saga.clone()));

    let mut saga = OrderSaga::new("A").with_foo("bar");
    store.insert(&saga, &["foo"]).unwrap();
    saga.attempts = 1;
    store.update(&mut saga, &["foo"]).unwrap();

    let created = captured.lock().unwrap().clone().unwrap();
    assert_eq!(created.revision, 0);
    assert_eq!(created.attempts, 0);
}
