//! Observer hooks fired by the store after each operation.
//!
//! Listeners for the typed channels receive a clone of the saga involved;
//! a listener registered for `T` only sees events for sagas of type `T`.
//! Listeners run synchronously on the calling thread once the store has
//! released its lock, so they may call back into the store.
//!
//! ```ignore
//! store.hooks().on_created(|saga: &OrderSaga| {
//!     println!("created {}", saga.id);
//! });
//! store.hooks().on_uncorrelated(|| println!("no saga matched"));
//! ```

use std::any::{Any, TypeId};
use std::sync::{Arc, PoisonError, RwLock};

use crate::saga::SagaData;

type TypedCallback = Arc<dyn Fn(&dyn Any) + Send + Sync>;
type PlainCallback = Arc<dyn Fn() + Send + Sync>;

/// The notification channels a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookChannel {
    Created,
    Updated,
    Deleted,
    Correlated,
    Uncorrelated,
}

struct TypedListener {
    type_id: TypeId,
    callback: TypedCallback,
}

#[derive(Default)]
struct Listeners {
    created: Vec<TypedListener>,
    updated: Vec<TypedListener>,
    deleted: Vec<TypedListener>,
    correlated: Vec<TypedListener>,
    uncorrelated: Vec<PlainCallback>,
}

impl Listeners {
    fn typed(&self, channel: HookChannel) -> &[TypedListener] {
        match channel {
            HookChannel::Created => &self.created,
            HookChannel::Updated => &self.updated,
            HookChannel::Deleted => &self.deleted,
            HookChannel::Correlated => &self.correlated,
            HookChannel::Uncorrelated => &[],
        }
    }

    fn typed_mut(&mut self, channel: HookChannel) -> Option<&mut Vec<TypedListener>> {
        match channel {
            HookChannel::Created => Some(&mut self.created),
            HookChannel::Updated => Some(&mut self.updated),
            HookChannel::Deleted => Some(&mut self.deleted),
            HookChannel::Correlated => Some(&mut self.correlated),
            HookChannel::Uncorrelated => None,
        }
    }
}

/// Registry of store listeners.
#[derive(Default)]
pub struct SagaHooks {
    listeners: RwLock<Listeners>,
}

impl SagaHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with each saga of type `T` after it is inserted.
    pub fn on_created<T, F>(&self, listener: F)
    where
        T: SagaData,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(HookChannel::Created, listener);
    }

    /// Called with each saga of type `T` after it is updated.
    pub fn on_updated<T, F>(&self, listener: F)
    where
        T: SagaData,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(HookChannel::Updated, listener);
    }

    /// Called with the removed version of each deleted saga of type `T`.
    pub fn on_deleted<T, F>(&self, listener: F)
    where
        T: SagaData,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(HookChannel::Deleted, listener);
    }

    /// Called with the saga a correlation lookup resolved to.
    pub fn on_correlated<T, F>(&self, listener: F)
    where
        T: SagaData,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(HookChannel::Correlated, listener);
    }

    /// Called whenever a correlation lookup matches nothing.
    pub fn on_uncorrelated<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.write().uncorrelated.push(Arc::new(listener));
    }

    /// Number of listeners on `channel`, across all saga types.
    pub fn listener_count(&self, channel: HookChannel) -> usize {
        let listeners = self.read();
        match channel {
            HookChannel::Uncorrelated => listeners.uncorrelated.len(),
            typed => listeners.typed(typed).len(),
        }
    }

    pub(crate) fn fire<T: SagaData>(&self, channel: HookChannel, saga: &T) {
        let callbacks: Vec<TypedCallback> = self
            .read()
            .typed(channel)
            .iter()
            .filter(|listener| listener.type_id == TypeId::of::<T>())
            .map(|listener| Arc::clone(&listener.callback))
            .collect();

        for callback in callbacks {
            callback(saga as &dyn Any);
        }
    }

    pub(crate) fn fire_uncorrelated(&self) {
        let callbacks: Vec<PlainCallback> = self.read().uncorrelated.to_vec();
        for callback in callbacks {
            callback();
        }
    }

    fn register<T, F>(&self, channel: HookChannel, listener: F)
    where
        T: SagaData,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: TypedCallback = Arc::new(move |saga: &dyn Any| {
            if let Some(saga) = saga.downcast_ref::<T>() {
                listener(saga);
            }
        });

        if let Some(list) = self.write().typed_mut(channel) {
            list.push(TypedListener {
                type_id: TypeId::of::<T>(),
                callback,
            });
        }
    }

    // Callbacks never run under the lock, so poisoning can only come from a
    // panic inside this module and the lists stay consistent.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Listeners> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Listeners> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }
}
