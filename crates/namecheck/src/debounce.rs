//! Trailing-edge debouncing
//!
//! Collapses a burst of calls into a single invocation carrying the
//! arguments of the last call, fired once the burst has been quiet for the
//! configured delay.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Debounced wrapper around a callback
///
/// Owns at most one pending timer. Scheduling while a timer is pending
/// cancels it first. The callback never runs synchronously from [`call`].
///
/// Must be used from within a Tokio runtime.
///
/// [`call`]: Debouncer::call
pub struct Debouncer<A> {
    /// Quiescence window
    delay: Duration,

    /// Wrapped function
    callback: Arc<dyn Fn(A) + Send + Sync>,

    /// Pending timer, if any
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the callback with `args`, replacing any pending call
    pub fn call(&self, args: A) {
        let mut pending = self.pending.lock();

        if let Some(handle) = pending.take() {
            if !handle.is_finished() {
                debug!("Debounce window restarted ({:?})", self.delay);
            }
            handle.abort();
        }

        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        }));
    }

    /// Cancel the pending call, if any
    ///
    /// Returns true if a call was still waiting to fire.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Check whether a call is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Calls = Arc<Mutex<Vec<(String, String)>>>;

    fn recording(delay_ms: u64) -> (Debouncer<(String, String)>, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move |args| {
            sink.lock().push(args);
        });
        (debouncer, calls)
    }

    fn args(value: &str, previous: &str) -> (String, String) {
        (value.to_string(), previous.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_arguments() {
        let (debouncer, calls) = recording(1000);

        debouncer.call(args("a", ""));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(args("ab", "a"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(args("abc", "ab"));

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(*calls.lock(), vec![args("abc", "ab")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_fires_synchronously() {
        let (debouncer, calls) = recording(0);

        debouncer.call(args("a", ""));
        assert!(calls.lock().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_fire_separately() {
        let (debouncer, calls) = recording(200);

        debouncer.call(args("a", ""));
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.call(args("b", "a"));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(*calls.lock(), vec![args("a", ""), args("b", "a")]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let (debouncer, calls) = recording(200);

        debouncer.call(args("a", ""));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_call() {
        let (debouncer, calls) = recording(200);

        debouncer.call(args("a", ""));
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(calls.lock().is_empty());
    }
}
