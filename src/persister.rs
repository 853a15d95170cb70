//! SagaPersister - the storage surface saga coordinators talk to.

use crate::error::SagaError;
use crate::saga::{PropertyValue, SagaData};

/// Correlation-aware storage for sagas with optimistic concurrency.
///
/// Every saga handed in or returned is an independent clone of the stored
/// state.
pub trait SagaPersister: Send + Sync {
    /// Find the saga of type `T` whose `property` renders to the same string
    /// as `value`. Returns `None` when nothing matches.
    fn find_by_correlation<T: SagaData>(
        &self,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Option<T>, SagaError>;

    /// Insert a new saga. Its id must be assigned and its revision must be 0.
    /// None of `correlation_properties` may collide with another saga of `T`.
    fn insert<T: SagaData>(&self, saga: &T, correlation_properties: &[&str])
        -> Result<(), SagaError>;

    /// Update an existing saga whose revision matches the stored one.
    /// On success the caller's revision is bumped to the committed value.
    fn update<T: SagaData>(
        &self,
        saga: &mut T,
        correlation_properties: &[&str],
    ) -> Result<(), SagaError>;

    /// Delete an existing saga. On success the caller's revision is bumped.
    fn delete<T: SagaData>(&self, saga: &mut T) -> Result<(), SagaError>;
}
