//! Keyed one-shot timers. Scheduling a key aborts whatever was pending under it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// At most one pending timer per key.
#[derive(Debug)]
pub struct TimerSet<K: Eq + Hash> {
    handles: HashMap<K, JoinHandle<()>>,
}

impl<K> TimerSet<K>
where
    K: Eq + Hash + Copy + Debug,
{
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Run `fire` after `delay`, replacing any timer pending under `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, key: K, delay: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel(key);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        });
        debug!(key = ?key, delay_ms = delay.as_millis() as u64, "Timer scheduled");
        self.handles.insert(key, handle);
    }

    /// Abort the timer under `key`. Returns true if it had not fired yet.
    pub fn cancel(&mut self, key: K) -> bool {
        match self.handles.remove(&key) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                if was_pending {
                    debug!(key = ?key, "Timer cancelled");
                }
                was_pending
            }
            None => false,
        }
    }

    /// Abort every timer.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    /// Number of timers that have not fired yet.
    pub fn pending_count(&self) -> usize {
        self.handles.values().filter(|h| !h.is_finished()).count()
    }
}

impl<K> Default for TimerSet<K>
where
    K: Eq + Hash + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Drop for TimerSet<K> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let make = move || {
            let hits = Arc::clone(&hits_clone);
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (hits, make)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let (hits, make) = counter();
        let mut timers = TimerSet::new();
        timers.schedule("a", Duration::from_millis(300), make());
        assert_eq!(timers.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(timers.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_pending_timer() {
        let (hits, make) = counter();
        let mut timers = TimerSet::new();
        timers.schedule("a", Duration::from_millis(300), make());
        tokio::time::sleep(Duration::from_millis(200)).await;
        timers.schedule("a", Duration::from_millis(300), make());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(timers.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let (hits, make) = counter();
        let mut timers = TimerSet::new();
        timers.schedule("a", Duration::from_millis(100), make());
        timers.schedule("b", Duration::from_millis(100), make());
        assert_eq!(timers.pending_count(), 2);

        assert!(timers.cancel("a"));
        assert!(!timers.cancel("a"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_and_drop_abort_everything() {
        let (hits, make) = counter();
        let mut timers = TimerSet::new();
        timers.schedule(1, Duration::from_millis(100), make());
        timers.schedule(2, Duration::from_millis(100), make());
        timers.cancel_all();
        assert_eq!(timers.pending_count(), 0);

        timers.schedule(3, Duration::from_millis(100), make());
        drop(timers);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
