//! Countdown latch for waiting on a fixed number of completions.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Blocks waiters until `count_down` has been called `count` times.
#[derive(Debug)]
pub struct CountdownLatch {
    remaining: AtomicUsize,
    notify: Notify,
}

impl CountdownLatch {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            notify: Notify::new(),
        }
    }

    /// Decrements the count, waking all waiters when it reaches zero.
    ///
    /// Has no effect once the count is already zero.
    pub fn count_down(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        if previous == Ok(1) {
            self.notify.notify_waiters();
        }
    }

    pub fn count(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Waits until the count reaches zero. There is no timeout.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent final count_down is not missed.
            notified.as_mut().enable();

            if self.count() == 0 {
                return;
            }

            notified.await;
        }
    }
}
