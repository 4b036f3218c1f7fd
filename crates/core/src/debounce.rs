//! Debouncing: run an action only once input has been quiet for a fixed wait.
//!
//! [`DebounceGate`] is the runtime-agnostic half: a generation counter that a
//! sleeping task consults before acting. [`Debounced`] (feature `native`) wraps a
//! callback and owns the pending Tokio task itself.

use std::time::Duration;

/// Identifies one scheduled call. Only the most recently armed ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter shared by every field of one widget.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    generation: u64,
    wait: Duration,
}

impl DebounceGate {
    pub fn new(wait: Duration) -> Self {
        Self { generation: 0, wait }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Schedule a new call, superseding whatever was pending.
    pub fn arm(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    /// Whether `ticket` is still the latest scheduled call.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation == ticket.0
    }

    /// Discard the pending call without scheduling a new one.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }
}

#[cfg(feature = "native")]
pub use native::Debounced;

#[cfg(feature = "native")]
mod native {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::task::JoinHandle;

    /// A callback that fires `wait` after the last call to [`Debounced::call`],
    /// with that call's arguments.
    ///
    /// Must be called from within a Tokio runtime. Dropping the handle cancels a
    /// pending call.
    pub struct Debounced<A> {
        callback: Arc<dyn Fn(A) + Send + Sync>,
        wait: Duration,
        pending: Mutex<Option<JoinHandle<()>>>,
    }

    impl<A: Send + 'static> Debounced<A> {
        pub fn new<F>(wait: Duration, callback: F) -> Self
        where
            F: Fn(A) + Send + Sync + 'static,
        {
            Self {
                callback: Arc::new(callback),
                wait,
                pending: Mutex::new(None),
            }
        }

        pub fn call(&self, args: A) {
            let callback = Arc::clone(&self.callback);
            let wait = self.wait;
            let task = tokio::spawn(async move {
                tokio::time::sleep(wait).await;
                callback(args);
            });

            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = pending.replace(task) {
                previous.abort();
            }
        }

        /// Hand over the pending call without cancelling it. Awaiting the handle
        /// waits out the rest of the quiet period and the callback itself.
        pub fn flush(&self) -> Option<JoinHandle<()>> {
            self.pending.lock().unwrap_or_else(|e| e.into_inner()).take()
        }

        /// Drop the pending call, if any.
        pub fn cancel(&self) {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = pending.take() {
                previous.abort();
            }
        }
    }

    impl<A> Drop for Debounced<A> {
        fn drop(&mut self) {
            let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
            if let Some(task) = pending.take() {
                task.abort();
            }
        }
    }

    impl<A> std::fmt::Debug for Debounced<A> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Debounced").field("wait", &self.wait).finish_non_exhaustive()
        }
    }
}
