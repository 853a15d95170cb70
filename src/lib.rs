//! In-memory saga persistence with correlation lookup, optimistic
//! concurrency, per-property uniqueness and on-demand conflict replay.
//!
//! ## Example
//!
//! ```ignore
//! use saga_store::{InMemorySagaPersister, Saga, SagaId, SagaPersister};
//!
//! #[derive(Clone, Debug, Saga)]
//! struct OrderSaga {
//!     pub id: SagaId,
//!     pub revision: u64,
//!     pub order_id: String,
//! }
//!
//! let store = InMemorySagaPersister::new();
//! let mut saga = OrderSaga { id: SagaId::new_v4(), revision: 0, order_id: "o-1".into() };
//! store.insert(&saga, &["order_id"])?;
//!
//! let found: Option<OrderSaga> = store.find_by_correlation("order_id", "o-1")?;
//! store.update(&mut saga, &["order_id"])?;
//! ```

// Lets `#[derive(Saga)]` resolve `::saga_store` inside this crate too.
extern crate self as saga_store;

mod config;
#[cfg(feature = "emitter")]
pub mod emitter;
mod error;
mod hooks;
mod in_memory;
mod persister;
mod repository;
mod saga;

pub use config::SagaStoreConfig;
pub use error::{ErrorKind, SagaError};
pub use hooks::{HookChannel, SagaHooks};
pub use in_memory::{InMemorySagaPersister, SagaSnapshot};
pub use persister::SagaPersister;
pub use repository::{SagaRepository, SagasExt};
pub use saga::{PropertyReader, PropertyValue, SagaData, SagaId};

pub use saga_store_macros::Saga;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
