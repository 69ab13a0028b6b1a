//! Debounced search input.
//!
//! Each keystroke submits the full query; publication to consumers is
//! deferred until a quiet period elapses. A new submission before the timer
//! fires aborts the pending task and starts a fresh one - timer reset, not
//! queuing - so the downstream filter recomputes once per pause in typing
//! instead of once per keystroke.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default quiet period before a query is published.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A cancellable delayed publisher for search queries.
///
/// Requires a tokio runtime; [`submit`](Self::submit) spawns the delay task
/// on the current runtime.
pub struct DebouncedSearch {
    delay: Duration,
    tx: Arc<watch::Sender<String>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DebouncedSearch {
    /// Create a debouncer with the given quiet period. The published value
    /// starts as the empty query.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self {
            delay,
            tx: Arc::new(tx),
            pending: Mutex::new(None),
        }
    }

    /// Receiver for settled queries. The initial value is the empty string;
    /// each settled query replaces it.
    #[must_use]
    pub fn settled(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    /// Last settled query.
    #[must_use]
    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Submit the in-progress query, superseding any pending publication.
    pub fn submit(&self, query: impl Into<String>) {
        let query = query.into();
        let delay = self.delay;
        let tx = Arc::clone(&self.tx);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(%query, "Search query settled");
            tx.send_replace(query);
        });
        if let Some(previous) = lock(&self.pending).replace(task) {
            previous.abort();
        }
    }

    /// Drop any pending publication without settling it.
    pub fn cancel(&self) {
        if let Some(previous) = lock(&self.pending).take() {
            previous.abort();
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
