//! Sagas - the records the store persists.
//!
//! A saga record carries an identity, a revision used for optimistic
//! concurrency, and any number of plain fields. Some of those fields act as
//! correlation properties: secondary keys a caller uses to locate the saga
//! and which must stay unique among sagas of the same type.
//!
//! ## Example
//!
//! ```ignore
//! use saga_store::{Saga, SagaId};
//!
//! #[derive(Clone, Debug, Saga)]
//! struct ShippingSaga {
//!     pub id: SagaId,
//!     pub revision: u64,
//!     pub order_id: String,
//!     pub shipped: bool,
//! }
//! ```

mod property;

pub use property::PropertyValue;

/// Identity of a saga record. `Uuid::nil()` means "not yet assigned".
pub type SagaId = uuid::Uuid;

/// Trait for types that can be stored as sagas.
///
/// `Clone` doubles as the record cloner: every record crossing the store
/// boundary is cloned, so `clone()` must produce a copy that shares no
/// mutable state with the original.
pub trait SagaData: PropertyReader + Clone + Send + Sync + 'static {
    /// Name of the saga type, used in errors, logs and snapshots.
    const SAGA_TYPE: &'static str;

    fn id(&self) -> SagaId;

    fn set_id(&mut self, id: SagaId);

    fn revision(&self) -> u64;

    fn set_revision(&mut self, revision: u64);

    /// Whether an identity has been assigned.
    fn has_id(&self) -> bool {
        !self.id().is_nil()
    }
}

/// Reads a named property off a record for correlation and uniqueness checks.
pub trait PropertyReader {
    /// Returns the current value of `name`, or `None` if the type has no such
    /// property.
    fn read_property(&self, name: &str) -> Option<PropertyValue>;
}
