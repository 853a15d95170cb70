//! Store configuration.

/// Behavioral switches for [`InMemorySagaPersister`](crate::InMemorySagaPersister).
///
/// The defaults reproduce the classic behavior of the store; the switches
/// exist for callers that want the stricter reading of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaStoreConfig {
    /// Record an inserted saga as its own previous version, so a conflict
    /// can be prepared right after insert. When off, the previous slot stays
    /// empty until the first update or delete.
    pub seed_previous_on_insert: bool,
    /// Permit inserting an id again after it was deleted. When off, such an
    /// insert fails with `SagaError::DuplicateId`.
    pub allow_reinsert_after_delete: bool,
}

impl Default for SagaStoreConfig {
    fn default() -> Self {
        Self {
            seed_previous_on_insert: true,
            allow_reinsert_after_delete: true,
        }
    }
}

impl SagaStoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_previous_on_insert(mut self, enabled: bool) -> Self {
        self.seed_previous_on_insert = enabled;
        self
    }

    pub fn allow_reinsert_after_delete(mut self, enabled: bool) -> Self {
        self.allow_reinsert_after_delete = enabled;
        self
    }
}
