//! SagaRepository - Typed accessor for one saga type.

use std::marker::PhantomData;

use crate::error::SagaError;
use crate::persister::SagaPersister;
use crate::saga::{PropertyValue, SagaData};

/// Typed repository wrapper binding a [`SagaPersister`] to saga type `T`.
pub struct SagaRepository<'a, S, T> {
    store: &'a S,
    _marker: PhantomData<T>,
}

impl<'a, S: SagaPersister, T: SagaData> SagaRepository<'a, S, T> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Find a saga by a correlation property.
    pub fn find_by(
        &self,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Option<T>, SagaError> {
        self.store.find_by_correlation(property, value)
    }

    pub fn insert(&self, saga: &T, correlation_properties: &[&str]) -> Result<(), SagaError> {
        self.store.insert(saga, correlation_properties)
    }

    pub fn update(&self, saga: &mut T, correlation_properties: &[&str]) -> Result<(), SagaError> {
        self.store.update(saga, correlation_properties)
    }

    pub fn delete(&self, saga: &mut T) -> Result<(), SagaError> {
        self.store.delete(saga)
    }
}

/// Extension trait for typed saga access on any SagaPersister.
pub trait SagasExt: SagaPersister + Sized {
    /// Get a typed saga repository.
    fn sagas<T: SagaData>(&self) -> SagaRepository<'_, Self, T> {
        SagaRepository::new(self)
    }
}

impl<S: SagaPersister> SagasExt for S {}
