//! Single-value rendezvous mailbox.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::info;

/// A one-value mailbox handing data from a non-blocking producer to
/// blocking consumers.
///
/// At most one value is pending at a time: posting over an unconsumed value
/// replaces it (coalescing, newest wins). [`Mailbox::wait`] blocks the
/// calling thread without timeout until a value is present, then takes it,
/// leaving the slot empty. Exactly one waiter consumes each post.
pub struct Mailbox<T> {
    kind: &'static str,
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> Mailbox<T> {
    /// Create an empty mailbox. `kind` names the mailbox in diagnostics.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Store `value`, replacing any unconsumed previous value, and wake all
    /// waiters. Never blocks beyond the internal lock.
    pub fn post(&self, value: T) {
        let mut slot = self.lock();
        *slot = Some(value);
        self.ready.notify_all();
    }

    /// Block until a value is available, then take it.
    ///
    /// There is no timeout and no cancellation: a configurator that never
    /// posts stalls the caller forever. Emits a diagnostic when the caller
    /// starts waiting and again when it is released.
    pub fn wait(&self) -> T {
        let mut slot = self.lock();
        if slot.is_none() {
            info!(kind = self.kind, "waiting for value from configurator");
        }
        loop {
            if let Some(value) = slot.take() {
                info!(kind = self.kind, "received value from configurator");
                return value;
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the pending value without blocking, if there is one.
    pub fn try_take(&self) -> Option<T> {
        self.lock().take()
    }

    // The slot is a plain Option and is never left mid-update, so a
    // poisoned lock still holds a consistent value.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn post_then_wait_returns_the_posted_value() {
        let mailbox = Mailbox::new("test");
        mailbox.post(42u32);
        assert_eq!(mailbox.wait(), 42);
    }

    #[test]
    fn wait_blocks_until_a_post_arrives() {
        let mailbox = Arc::new(Mailbox::new("test"));

        let waiter = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || mailbox.wait())
        };

        // Give the waiter time to actually block.
        thread::sleep(Duration::from_millis(50));
        mailbox.post("late".to_string());

        assert_eq!(waiter.join().unwrap(), "late");
    }

    #[test]
    fn posts_before_consumption_coalesce_to_the_newest() {
        let mailbox = Mailbox::new("test");
        mailbox.post(1);
        mailbox.post(2);
        assert_eq!(mailbox.wait(), 2);
        assert_eq!(mailbox.try_take(), None);
    }

    #[test]
    fn try_take_is_empty_until_posted() {
        let mailbox: Mailbox<u8> = Mailbox::new("test");
        assert_eq!(mailbox.try_take(), None);
        mailbox.post(7);
        assert_eq!(mailbox.try_take(), Some(7));
        assert_eq!(mailbox.try_take(), None);
    }

    #[test]
    fn each_post_releases_exactly_one_waiter() {
        let mailbox = Arc::new(Mailbox::new("test"));
        let (tx, rx) = std::sync::mpsc::channel();

        for _ in 0..2 {
            let mailbox = Arc::clone(&mailbox);
            let tx = tx.clone();
            thread::spawn(move || tx.send(mailbox.wait()).unwrap());
        }

        // Post the second value only after the first was consumed, so the
        // two posts cannot coalesce.
        mailbox.post(10);
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        mailbox.post(20);
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let mut received = vec![first, second];
        received.sort_unstable();
        assert_eq!(received, vec![10, 20]);
    }
}
