//! Forwards store hooks into an `EventEmitter` for in-process subscribers.
//!
//! Typed channels are emitted as JSON envelopes
//! `{"saga_type": "...", "saga": {...}}`; the uncorrelated channel is emitted
//! with an empty payload. `EventEmitter` delivers on its own threads, so
//! subscribers observe events asynchronously.
//!
//! ```ignore
//! let bridge = EmitterBridge::new(EventEmitter::new());
//! bridge.attach::<OrderSaga>(store.hooks());
//! bridge.on(SAGA_CREATED, |payload| println!("{}", payload));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use event_emitter_rs::EventEmitter;
use serde::Serialize;
use tracing::warn;

use crate::hooks::SagaHooks;
use crate::saga::SagaData;

pub const SAGA_CREATED: &str = "SagaCreated";
pub const SAGA_UPDATED: &str = "SagaUpdated";
pub const SAGA_DELETED: &str = "SagaDeleted";
pub const SAGA_CORRELATED: &str = "SagaCorrelated";
pub const SAGA_UNCORRELATED: &str = "SagaUncorrelated";

#[derive(Serialize)]
struct Envelope<'a, T> {
    saga_type: &'static str,
    saga: &'a T,
}

/// Bridge from [`SagaHooks`] to an `event_emitter_rs::EventEmitter`.
#[derive(Clone)]
pub struct EmitterBridge {
    emitter: Arc<Mutex<EventEmitter>>,
}

impl EmitterBridge {
    pub fn new(emitter: EventEmitter) -> Self {
        Self::shared(Arc::new(Mutex::new(emitter)))
    }

    pub fn shared(emitter: Arc<Mutex<EventEmitter>>) -> Self {
        Self { emitter }
    }

    pub fn emitter(&self) -> Arc<Mutex<EventEmitter>> {
        Arc::clone(&self.emitter)
    }

    /// Subscribe to one of the forwarded events.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.lock().on(event, listener);
    }

    /// Forward created/updated/deleted/correlated events for sagas of type `T`.
    pub fn attach<T: SagaData + Serialize>(&self, hooks: &SagaHooks) {
        let bridge = self.clone();
        hooks.on_created(move |saga: &T| bridge.forward(SAGA_CREATED, saga));
        let bridge = self.clone();
        hooks.on_updated(move |saga: &T| bridge.forward(SAGA_UPDATED, saga));
        let bridge = self.clone();
        hooks.on_deleted(move |saga: &T| bridge.forward(SAGA_DELETED, saga));
        let bridge = self.clone();
        hooks.on_correlated(move |saga: &T| bridge.forward(SAGA_CORRELATED, saga));
    }

    /// Forward correlation misses. Attach once per store, not per saga type.
    pub fn attach_uncorrelated(&self, hooks: &SagaHooks) {
        let bridge = self.clone();
        hooks.on_uncorrelated(move || {
            bridge.lock().emit(SAGA_UNCORRELATED, String::new());
        });
    }

    fn forward<T: SagaData + Serialize>(&self, event: &str, saga: &T) {
        let envelope = Envelope {
            saga_type: T::SAGA_TYPE,
            saga,
        };
        match serde_json::to_string(&envelope) {
            Ok(payload) => {
                self.lock().emit(event, payload);
            }
            Err(err) => warn!(
                saga_type = T::SAGA_TYPE,
                event,
                error = %err,
                "saga could not be encoded for the emitter"
            ),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EventEmitter> {
        self.emitter.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
