//! Trailing-edge debouncing on the tokio timer.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Delays a callback until calls stop arriving for `wait`.
///
/// Each [`call`](Debouncer::call) cancels the pending invocation and
/// schedules a new one with the latest argument. Must be used inside a
/// tokio runtime.
pub struct Debouncer<T> {
    wait: Duration,
    callback: Callback<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            wait,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    pub fn call(&self, arg: T) {
        let callback = Arc::clone(&self.callback);
        let wait = self.wait;
        let task = tokio::spawn(async move {
            sleep(wait).await;
            callback(arg);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(wait_ms: u64) -> (Debouncer<usize>, Arc<AtomicUsize>, Arc<Mutex<Vec<usize>>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (c, s) = (calls.clone(), seen.clone());
        let debouncer = Debouncer::new(Duration::from_millis(wait_ms), move |arg| {
            c.fetch_add(1, Ordering::SeqCst);
            s.lock().unwrap().push(arg);
        });
        (debouncer, calls, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_argument() {
        let (debouncer, calls, seen) = counting(100);

        for i in 0..5 {
            debouncer.call(i);
            sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_quiet_period() {
        let (debouncer, calls, _) = counting(100);

        debouncer.call(1);
        sleep(Duration::from_millis(99)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts() {
        let (debouncer, calls, seen) = counting(50);

        debouncer.call(1);
        sleep(Duration::from_millis(60)).await;
        debouncer.call(2);
        sleep(Duration::from_millis(60)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (debouncer, calls, _) = counting(50);

        debouncer.call(1);
        debouncer.cancel();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
