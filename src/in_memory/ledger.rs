//! Version ledger: current and previous version of every saga, plus the
//! conflict flags consumed by correlation lookups.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::saga::{SagaData, SagaId};

/// Type-erased view of a stored saga.
pub(crate) trait StoredSaga: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn stored_type(&self) -> &'static str;
    fn stored_revision(&self) -> u64;
}

impl<T: SagaData> StoredSaga for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn stored_type(&self) -> &'static str {
        T::SAGA_TYPE
    }

    fn stored_revision(&self) -> u64 {
        self.revision()
    }
}

/// One line of [`InMemorySagaPersister::snapshot`](crate::InMemorySagaPersister::snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SagaSnapshot {
    pub id: SagaId,
    pub saga_type: &'static str,
    pub revision: u64,
}

#[derive(Default)]
pub(crate) struct Ledger {
    current: BTreeMap<SagaId, Box<dyn StoredSaga>>,
    previous: BTreeMap<SagaId, Box<dyn StoredSaga>>,
    conflicts: BTreeSet<SagaId>,
}

impl Ledger {
    pub(crate) fn contains_current(&self, id: &SagaId) -> bool {
        self.current.contains_key(id)
    }

    pub(crate) fn has_previous(&self, id: &SagaId) -> bool {
        self.previous.contains_key(id)
    }

    pub(crate) fn current<T: SagaData>(&self, id: &SagaId) -> Option<&T> {
        self.current
            .get(id)
            .and_then(|stored| stored.as_any().downcast_ref::<T>())
    }

    pub(crate) fn previous<T: SagaData>(&self, id: &SagaId) -> Option<&T> {
        self.previous
            .get(id)
            .and_then(|stored| stored.as_any().downcast_ref::<T>())
    }

    /// Current sagas of type `T`, ordered by id.
    pub(crate) fn current_of_type<T: SagaData>(&self) -> impl Iterator<Item = &T> + '_ {
        self.current
            .values()
            .filter_map(|stored| stored.as_any().downcast_ref::<T>())
    }

    /// Makes `saga` the current version and hands back the version it replaced.
    pub(crate) fn commit<T: SagaData>(&mut self, saga: T) -> Option<Box<dyn StoredSaga>> {
        self.current.insert(saga.id(), Box::new(saga))
    }

    pub(crate) fn remove_current(&mut self, id: &SagaId) -> Option<Box<dyn StoredSaga>> {
        self.current.remove(id)
    }

    pub(crate) fn set_previous(&mut self, id: SagaId, saga: Box<dyn StoredSaga>) {
        self.previous.insert(id, saga);
    }

    pub(crate) fn clear_previous(&mut self, id: &SagaId) {
        self.previous.remove(id);
    }

    pub(crate) fn flag_conflict(&mut self, id: SagaId) {
        self.conflicts.insert(id);
    }

    pub(crate) fn is_conflict_flagged(&self, id: &SagaId) -> bool {
        self.conflicts.contains(id)
    }

    pub(crate) fn clear_conflict(&mut self, id: &SagaId) -> bool {
        self.conflicts.remove(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.current.len()
    }

    pub(crate) fn snapshot(&self) -> Vec<SagaSnapshot> {
        self.current
            .iter()
            .map(|(id, stored)| SagaSnapshot {
                id: *id,
                saga_type: stored.stored_type(),
                revision: stored.stored_revision(),
            })
            .collect()
    }
}
