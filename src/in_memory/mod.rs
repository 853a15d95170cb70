//! InMemorySagaPersister - Mutex-guarded saga store for tests and development.
//!
//! All operations run under one store-wide lock, so they are totally ordered
//! and never observe a half-applied write. Hooks fire after the lock is
//! released.
//!
//! Besides the [`SagaPersister`] operations the store can replay a stale
//! read on demand: [`InMemorySagaPersister::prepare_conflict`] makes the next
//! correlation lookup for a saga return its previous version, which lets a
//! test drive the caller's concurrency-conflict handling deterministically.

mod ledger;
mod uniqueness;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::config::SagaStoreConfig;
use crate::error::SagaError;
use crate::hooks::{HookChannel, SagaHooks};
use crate::persister::SagaPersister;
use crate::saga::{PropertyValue, SagaData, SagaId};

use ledger::Ledger;
use uniqueness::{read_property, verify_unique};

pub use ledger::SagaSnapshot;

/// In-memory saga store. Clone-friendly via Arc: clones share state and hooks.
#[derive(Clone)]
pub struct InMemorySagaPersister {
    ledger: Arc<Mutex<Ledger>>,
    hooks: Arc<SagaHooks>,
    config: SagaStoreConfig,
}

impl Default for InMemorySagaPersister {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySagaPersister {
    /// Create a new empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SagaStoreConfig::default())
    }

    pub fn with_config(config: SagaStoreConfig) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::default())),
            hooks: Arc::new(SagaHooks::new()),
            config,
        }
    }

    pub fn config(&self) -> &SagaStoreConfig {
        &self.config
    }

    /// Listener registry for created/updated/deleted/correlated/uncorrelated.
    pub fn hooks(&self) -> &SagaHooks {
        &self.hooks
    }

    /// Arrange for the next correlation lookup that matches `saga` to return
    /// its previous version instead of the current one. The flag is consumed
    /// by that lookup.
    ///
    /// Fails with [`SagaError::NoPreviousVersion`] if no previous version is
    /// recorded for the saga.
    pub fn prepare_conflict<T: SagaData>(&self, saga: &T) -> Result<(), SagaError> {
        let id = saga.id();
        let mut ledger = self.ledger("prepare_conflict")?;
        if ledger.previous::<T>(&id).is_none() {
            return Err(SagaError::NoPreviousVersion {
                saga_type: T::SAGA_TYPE,
                id,
            });
        }
        ledger.flag_conflict(id);
        debug!(saga_type = T::SAGA_TYPE, %id, "conflict prepared");
        Ok(())
    }

    /// Store a saga as-is, skipping revision, identity and uniqueness checks.
    /// A nil id is replaced by a fresh one. Fires no hooks.
    pub fn store_saga<T: SagaData>(&self, mut saga: T) -> Result<SagaId, SagaError> {
        if !saga.has_id() {
            saga.set_id(SagaId::new_v4());
        }
        let id = saga.id();

        let mut ledger = self.ledger("store_saga")?;
        if self.config.seed_previous_on_insert {
            ledger.set_previous(id, Box::new(saga.clone()));
        }
        ledger.commit(saga);
        debug!(saga_type = T::SAGA_TYPE, %id, "saga stored directly");
        Ok(id)
    }

    /// Current version of the saga with `id`, if it is a `T`.
    pub fn get<T: SagaData>(&self, id: SagaId) -> Result<Option<T>, SagaError> {
        let ledger = self.ledger("get")?;
        Ok(ledger.current::<T>(&id).cloned())
    }

    /// Clones of every current saga of type `T`, ordered by id.
    pub fn stored<T: SagaData>(&self) -> Result<Vec<T>, SagaError> {
        let ledger = self.ledger("stored")?;
        Ok(ledger.current_of_type::<T>().cloned().collect())
    }

    /// Every current saga regardless of type, ordered by id.
    pub fn snapshot(&self) -> Result<Vec<SagaSnapshot>, SagaError> {
        let ledger = self.ledger("snapshot")?;
        Ok(ledger.snapshot())
    }

    pub fn len(&self) -> Result<usize, SagaError> {
        Ok(self.ledger("len")?.len())
    }

    pub fn is_empty(&self) -> Result<bool, SagaError> {
        Ok(self.len()? == 0)
    }

    fn ledger(&self, operation: &'static str) -> Result<MutexGuard<'_, Ledger>, SagaError> {
        self.ledger
            .lock()
            .map_err(|_| SagaError::LockPoisoned(operation))
    }
}

fn next_revision<T: SagaData>(id: SagaId, revision: u64) -> Result<u64, SagaError> {
    revision.checked_add(1).ok_or(SagaError::RevisionOverflow {
        saga_type: T::SAGA_TYPE,
        id,
        revision,
    })
}

fn require_id<T: SagaData>(saga: &T) -> Result<SagaId, SagaError> {
    if saga.has_id() {
        Ok(saga.id())
    } else {
        Err(SagaError::MissingId {
            saga_type: T::SAGA_TYPE,
        })
    }
}

impl SagaPersister for InMemorySagaPersister {
    fn find_by_correlation<T: SagaData>(
        &self,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Option<T>, SagaError> {
        let wanted = value.into().render();

        let resolved = {
            let mut ledger = self.ledger("find_by_correlation")?;

            let mut matched = None;
            for saga in ledger.current_of_type::<T>() {
                if read_property(saga, property)?.render() == wanted {
                    matched = Some(saga.id());
                    break;
                }
            }

            match matched {
                Some(id) if ledger.is_conflict_flagged(&id) => {
                    let previous = ledger.previous::<T>(&id).cloned().ok_or(
                        SagaError::NoPreviousVersion {
                            saga_type: T::SAGA_TYPE,
                            id,
                        },
                    )?;
                    ledger.clear_conflict(&id);
                    debug!(saga_type = T::SAGA_TYPE, %id, "conflict replayed");
                    Some(previous)
                }
                Some(id) => ledger.current::<T>(&id).cloned(),
                None => None,
            }
        };

        match resolved {
            Some(saga) => {
                self.hooks.fire(HookChannel::Correlated, &saga);
                Ok(Some(saga))
            }
            None => {
                self.hooks.fire_uncorrelated();
                Ok(None)
            }
        }
    }

    fn insert<T: SagaData>(
        &self,
        saga: &T,
        correlation_properties: &[&str],
    ) -> Result<(), SagaError> {
        let id = require_id(saga)?;

        let created = {
            let mut ledger = self.ledger("insert")?;

            let reinsert_blocked =
                !self.config.allow_reinsert_after_delete && ledger.has_previous(&id);
            if ledger.contains_current(&id) || reinsert_blocked {
                return Err(SagaError::DuplicateId {
                    saga_type: T::SAGA_TYPE,
                    id,
                });
            }
            if saga.revision() != 0 {
                return Err(SagaError::NonZeroRevision {
                    saga_type: T::SAGA_TYPE,
                    id,
                    revision: saga.revision(),
                });
            }
            verify_unique(&ledger, saga, correlation_properties)?;

            if self.config.seed_previous_on_insert {
                ledger.set_previous(id, Box::new(saga.clone()));
            } else {
                ledger.clear_previous(&id);
            }
            ledger.commit(saga.clone());
            saga.clone()
        };

        debug!(saga_type = T::SAGA_TYPE, %id, "saga inserted");
        self.hooks.fire(HookChannel::Created, &created);
        Ok(())
    }

    fn update<T: SagaData>(
        &self,
        saga: &mut T,
        correlation_properties: &[&str],
    ) -> Result<(), SagaError> {
        let id = require_id(saga)?;

        let updated = {
            let mut ledger = self.ledger("update")?;

            let actual = ledger
                .current::<T>(&id)
                .map(|stored| stored.revision())
                .ok_or(SagaError::NotFound {
                    saga_type: T::SAGA_TYPE,
                    id,
                })?;
            verify_unique(&ledger, &*saga, correlation_properties)?;
            if actual != saga.revision() {
                return Err(SagaError::RevisionMismatch {
                    saga_type: T::SAGA_TYPE,
                    id,
                    expected: saga.revision(),
                    actual,
                });
            }

            let next = next_revision::<T>(id, actual)?;

            let mut committed = saga.clone();
            committed.set_revision(next);
            if let Some(replaced) = ledger.commit(committed.clone()) {
                ledger.set_previous(id, replaced);
            }
            committed
        };

        saga.set_revision(updated.revision());
        debug!(
            saga_type = T::SAGA_TYPE,
            %id,
            revision = updated.revision(),
            "saga updated"
        );
        self.hooks.fire(HookChannel::Updated, &updated);
        Ok(())
    }

    fn delete<T: SagaData>(&self, saga: &mut T) -> Result<(), SagaError> {
        let id = require_id(saga)?;
        let next = next_revision::<T>(id, saga.revision())?;

        let removed = {
            let mut ledger = self.ledger("delete")?;

            let removed = ledger
                .current::<T>(&id)
                .cloned()
                .ok_or(SagaError::NotFound {
                    saga_type: T::SAGA_TYPE,
                    id,
                })?;
            if let Some(stored) = ledger.remove_current(&id) {
                ledger.set_previous(id, stored);
            }
            ledger.clear_conflict(&id);
            removed
        };

        saga.set_revision(next);
        debug!(saga_type = T::SAGA_TYPE, %id, "saga deleted");
        self.hooks.fire(HookChannel::Deleted, &removed);
        Ok(())
    }
}
