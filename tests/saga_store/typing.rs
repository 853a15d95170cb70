//! Type scoping and the two comparison rules for property values.

use saga_store::{InMemorySagaPersister, SagaError, SagaPersister, SagasExt};

use crate::support::{OrderSaga, PaymentSaga};

#[test]
fn uniqueness_is_per_saga_type() {
    let store = InMemorySagaPersister::new();
    store
        .insert(&OrderSaga::new("A").with_foo("bar"), &["foo"])
        .unwrap();
    store
        .insert(&PaymentSaga::new("bar", 100), &["foo"])
        .unwrap();

    let order: OrderSaga = store.find_by_correlation("foo", "bar").unwrap().unwrap();
    let payment: PaymentSaga = store.find_by_correlation("foo", "bar").unwrap().unwrap();
    assert_eq!(order.order_id, "A");
    assert_eq!(payment.amount_cents, 100);
}

#[test]
fn identity_collides_across_types() {
    let store = InMemorySagaPersister::new();
    let order = OrderSaga::new("A");
    store.insert(&order, &[]).unwrap();

    let mut payment = PaymentSaga::new("bar", 1);
    payment.saga_id = order.id;
    let err = store.insert(&payment, &[]).unwrap_err();
    assert!(matches!(err, SagaError::DuplicateId { .. }));
}

#[test]
fn update_of_other_type_is_not_found() {
    let store = InMemorySagaPersister::new();
    let order = OrderSaga::new("A");
    store.insert(&order, &[]).unwrap();

    let mut payment = PaymentSaga::new("bar", 1);
    payment.saga_id = order.id;
    let err = store.update(&mut payment, &[]).unwrap_err();
    assert!(matches!(err, SagaError::NotFound { saga_type: "payment", .. }));
}

#[test]
fn lookup_coerces_to_strings() {
    let store = InMemorySagaPersister::new();
    store
        .insert(&PaymentSaga::new("bar", 2500), &[])
        .unwrap();

    let by_int: Option<PaymentSaga> = store.find_by_correlation("amount_cents", 2500_i64).unwrap();
    let by_text: Option<PaymentSaga> = store.find_by_correlation("amount_cents", "2500").unwrap();
    let by_unsigned: Option<PaymentSaga> =
        store.find_by_correlation("amount_cents", 2500_u16).unwrap();
    assert!(by_int.is_some());
    assert!(by_text.is_some());
    assert!(by_unsigned.is_some());
}

#[test]
fn missing_value_correlates_with_empty_string() {
    let store = InMemorySagaPersister::new();
    let saga = OrderSaga::new("A");
    store.insert(&saga, &[]).unwrap();

    let found: OrderSaga = store.find_by_correlation("foo", "").unwrap().unwrap();
    assert_eq!(found.id, saga.id);
    let found: OrderSaga = store.find_by_correlation("foo", None::<String>).unwrap().unwrap();
    assert_eq!(found.id, saga.id);
}

#[test]
fn uniqueness_uses_typed_equality() {
    let store = InMemorySagaPersister::new();
    store.insert(&OrderSaga::new("A"), &[]).unwrap();

    // `None` and `Some("")` render alike but are different values.
    let empty = OrderSaga::new("B").with_foo("");
    store.insert(&empty, &["foo"]).unwrap();

    let also_none = OrderSaga::new("C");
    let err = store.insert(&also_none, &["foo"]).unwrap_err();
    assert!(matches!(err, SagaError::CorrelationCollision { .. }));
}

#[test]
fn unknown_correlation_property_is_a_state_error() {
    let store = InMemorySagaPersister::new();
    let err = store
        .insert(&OrderSaga::new("A"), &["no_such_field"])
        .unwrap_err();
    assert_eq!(
        err,
        SagaError::UnknownProperty {
            saga_type: "order_saga",
            property: "no_such_field".into(),
        }
    );
    assert!(!err.is_concurrency_violation());
    assert!(store.is_empty().unwrap());
}

#[test]
fn typed_repository_wraps_store() {
    let store = InMemorySagaPersister::new();
    let payments = store.sagas::<PaymentSaga>();

    let mut payment = PaymentSaga::new("bar", 10);
    payments.insert(&payment, &["foo"]).unwrap();
    payment.amount_cents = 20;
    payments.update(&mut payment, &["foo"]).unwrap();

    let found = payments.find_by("foo", "bar").unwrap().unwrap();
    assert_eq!(found.amount_cents, 20);
    assert_eq!(found.version, 1);
}
