//! Generic persistent state engine.
//!
//! The engine owns one authoritative snapshot of a state shape. Updates are
//! pure functions from the current snapshot to the next one; after each
//! commit the engine persists a declared projection of the snapshot and then
//! notifies every subscriber with the new value, in commit order.
//!
//! Mutations are synchronous and run to completion before anything else
//! observes them, matching the cooperative single-threaded scheduling of the
//! UI runtimes that embed the store. The engine is still `Send + Sync` so it
//! can be shared behind an `Arc` without ceremony.
//!
//! Engines are constructed explicitly with a seed value - there is no global
//! singleton and no implicit reinitialization.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use tracing::error;

use crate::persist::{PersistError, StorageBackend};

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Subscriber<S> {
    token: u64,
    listener: Listener<S>,
}

/// Persistence wiring for an engine: where to write, under which key, and
/// which projection of the state to serialize.
pub struct Persistence<S> {
    backend: Arc<dyn StorageBackend>,
    key: String,
    serialize: Box<dyn Fn(&S) -> Result<String, serde_json::Error> + Send + Sync>,
}

impl<S> Persistence<S> {
    /// Persist the projection produced by `project` under `key`.
    ///
    /// The projection deliberately need not cover the whole state; fields
    /// outside it are ephemeral per session.
    pub fn new<P, F>(backend: Arc<dyn StorageBackend>, key: impl Into<String>, project: F) -> Self
    where
        P: Serialize,
        F: Fn(&S) -> P + Send + Sync + 'static,
    {
        Self {
            backend,
            key: key.into(),
            serialize: Box::new(move |state| serde_json::to_string(&project(state))),
        }
    }

    fn save(&self, state: &S) -> Result<(), PersistError> {
        let raw = (self.serialize)(state)?;
        self.backend.save(&self.key, &raw)
    }
}

/// The state engine. See the module docs for the contract.
pub struct StateEngine<S> {
    state: Mutex<S>,
    subscribers: Mutex<Vec<Subscriber<S>>>,
    next_token: AtomicU64,
    persistence: Option<Persistence<S>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: Clone + Send + 'static> StateEngine<S> {
    /// Create an engine seeded with `seed`.
    ///
    /// Restoring a persisted projection over the seed happens before
    /// construction (see `CatalogStore::open`); the engine itself only
    /// writes.
    pub fn new(seed: S, persistence: Option<Persistence<S>>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(seed),
            subscribers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(0),
            persistence,
        })
    }

    /// Clone of the current snapshot. No side effects.
    pub fn get_state(&self) -> S {
        lock(&self.state).clone()
    }

    /// Read through the current snapshot without cloning it.
    pub fn with_state<T>(&self, read: impl FnOnce(&S) -> T) -> T {
        read(&lock(&self.state))
    }

    /// Apply `updater` to produce the next snapshot, persist the projection,
    /// and notify subscribers.
    pub fn set_state(&self, updater: impl FnOnce(&S) -> S) {
        let snapshot = {
            let mut state = lock(&self.state);
            let next = updater(&state);
            *state = next;
            state.clone()
        };
        self.commit(&snapshot);
    }

    /// Validating variant of [`set_state`](Self::set_state).
    ///
    /// When `updater` returns `Err`, the snapshot is left untouched, nothing
    /// is persisted, and no subscriber is notified - the rejection is the
    /// caller's signal.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `updater`.
    pub fn try_set_state<T, E>(
        &self,
        updater: impl FnOnce(&S) -> Result<(S, T), E>,
    ) -> Result<T, E> {
        let (snapshot, value) = {
            let mut state = lock(&self.state);
            let (next, value) = updater(&state)?;
            *state = next;
            (state.clone(), value)
        };
        self.commit(&snapshot);
        Ok(value)
    }

    /// Register `listener` to be invoked with each new snapshot.
    ///
    /// Delivery is at-least-once per commit, in commit order. Dropping the
    /// returned [`Subscription`] deregisters the listener.
    pub fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(&S) + Send + Sync + 'static,
    ) -> Subscription<S> {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        lock(&self.subscribers).push(Subscriber {
            token,
            listener: Arc::new(listener),
        });
        Subscription {
            engine: Arc::downgrade(self),
            token,
        }
    }

    fn commit(&self, snapshot: &S) {
        if let Some(persistence) = &self.persistence {
            // Best-effort durability: a failed write never rolls back the
            // live session. The next commit re-persists the full projection.
            if let Err(e) = persistence.save(snapshot) {
                error!(key = %persistence.key, error = %e, "Failed to persist state");
            }
        }
        // Snapshot the listener list so a listener may subscribe or drop a
        // subscription from within its callback.
        let listeners: Vec<Listener<S>> = lock(&self.subscribers)
            .iter()
            .map(|s| Arc::clone(&s.listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl<S> StateEngine<S> {
    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    fn remove_subscriber(&self, token: u64) {
        lock(&self.subscribers).retain(|s| s.token != token);
    }
}

/// Handle returned by [`StateEngine::subscribe`]; deregisters on drop.
#[must_use = "dropping the subscription immediately deregisters the listener"]
pub struct Subscription<S> {
    engine: Weak<StateEngine<S>>,
    token: u64,
}

impl<S> Subscription<S> {
    /// Explicitly deregister the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<S> Drop for Subscription<S> {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.upgrade() {
            engine.remove_subscriber(self.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryBackend;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Counter {
        value: u32,
    }

    fn engine() -> Arc<StateEngine<Counter>> {
        StateEngine::new(Counter { value: 0 }, None)
    }

    #[test]
    fn test_set_state_applies_updater() {
        let engine = engine();
        engine.set_state(|s| Counter { value: s.value + 1 });
        assert_eq!(engine.get_state(), Counter { value: 1 });
    }

    #[test]
    fn test_subscriber_sees_each_commit_in_order() {
        let engine = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = engine.subscribe(move |s: &Counter| {
            lock(&sink).push(s.value);
        });
        for _ in 0..3 {
            engine.set_state(|s| Counter { value: s.value + 1 });
        }
        assert_eq!(*lock(&seen), vec![1, 2, 3]);
    }

    #[test]
    fn test_dropped_subscription_stops_delivery() {
        let engine = engine();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = engine.subscribe(move |_: &Counter| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        engine.set_state(|s| Counter { value: s.value + 1 });
        sub.unsubscribe();
        engine.set_state(|s| Counter { value: s.value + 1 });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.subscriber_count(), 0);
    }

    #[test]
    fn test_try_set_state_err_leaves_state_and_skips_notify() {
        let engine = engine();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = engine.subscribe(move |_: &Counter| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let result: Result<(), &str> = engine.try_set_state(|_| Err("rejected"));
        assert_eq!(result, Err("rejected"));
        assert_eq!(engine.get_state(), Counter { value: 0 });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_persistence_does_not_block_update() {
        let backend = Arc::new(MemoryBackend::failing());
        let persistence = Persistence::new(backend, "counter", Counter::clone);
        let engine = StateEngine::new(Counter { value: 0 }, Some(persistence));
        engine.set_state(|s| Counter { value: s.value + 1 });
        assert_eq!(engine.get_state(), Counter { value: 1 });
    }

    #[test]
    fn test_persistence_writes_projection_on_each_commit() {
        let backend = Arc::new(MemoryBackend::new());
        let persistence = Persistence::new(Arc::clone(&backend) as Arc<dyn StorageBackend>, "counter", Counter::clone);
        let engine = StateEngine::new(Counter { value: 0 }, Some(persistence));
        engine.set_state(|s| Counter { value: s.value + 5 });
        let raw = backend.raw("counter").expect("persisted");
        assert_eq!(raw, r#"{"value":5}"#);
    }
}
