//! Capacity-1 blocking handoff between two adjacent plant roles.

use parking_lot::{Condvar, Mutex};
use std::fmt;
use tracing::trace;

/// Returned by [`SingleSlotChannel::put`] when the channel has been stopped.
///
/// The item is handed back untouched; the caller decides whether dropping it
/// counts as waste.
#[derive(Debug, PartialEq, Eq)]
pub struct Rejected<T>(pub T);

impl<T> Rejected<T> {
    /// Takes the rejected item back.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel stopped, item rejected")
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {}

#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    stopped: bool,
}

/// A synchronous, capacity-1 buffer with a cooperative stop signal.
///
/// At most one item is resident at any time. `put` blocks while the slot is
/// full, `get` blocks while it is empty, and `signal_stop` releases every
/// waiter. After a stop, an item already in the slot can still be taken, but
/// no new item is accepted.
#[derive(Debug)]
pub struct SingleSlotChannel<T> {
    slot: Mutex<Slot<T>>,
    changed: Condvar,
}

impl<T> Default for SingleSlotChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleSlotChannel<T> {
    /// Creates an empty, running channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                item: None,
                stopped: false,
            }),
            changed: Condvar::new(),
        }
    }

    /// Stores `item`, blocking while the slot is occupied.
    ///
    /// Returns the item inside [`Rejected`] if the channel is stopped before
    /// or while waiting.
    pub fn put(&self, item: T) -> Result<(), Rejected<T>> {
        let mut slot = self.slot.lock();
        while slot.item.is_some() && !slot.stopped {
            self.changed.wait(&mut slot);
            if slot.item.is_some() && !slot.stopped {
                trace!("put woke with slot still occupied");
            }
        }
        if slot.stopped {
            return Err(Rejected(item));
        }

        slot.item = Some(item);
        self.changed.notify_all();
        Ok(())
    }

    /// Removes and returns the resident item, blocking while the slot is empty.
    ///
    /// Returns `None` once the channel is stopped and empty.
    pub fn get(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        while slot.item.is_none() && !slot.stopped {
            self.changed.wait(&mut slot);
            if slot.item.is_none() && !slot.stopped {
                trace!("get woke with slot still empty");
            }
        }

        let item = slot.item.take();
        if item.is_some() {
            self.changed.notify_all();
        }
        item
    }

    /// Non-blocking snapshot of occupancy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.lock().item.is_none()
    }

    /// Returns whether [`signal_stop`](Self::signal_stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.slot.lock().stopped
    }

    /// Marks the channel stopped and wakes every blocked `put` and `get`.
    ///
    /// Idempotent.
    pub fn signal_stop(&self) {
        let mut slot = self.slot.lock();
        if slot.stopped {
            return;
        }
        slot.stopped = true;
        self.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    const SETTLE: Duration = Duration::from_millis(50);

    #[test]
    fn test_put_then_get() {
        let channel = SingleSlotChannel::new();
        assert!(channel.is_empty());

        channel.put(1).unwrap();
        assert!(!channel.is_empty());
        assert_eq!(channel.get(), Some(1));
        assert!(channel.is_empty());
    }

    #[test]
    fn test_put_blocks_while_occupied() {
        let channel = Arc::new(SingleSlotChannel::new());
        channel.put(1).unwrap();

        let second_stored = Arc::new(AtomicBool::new(false));
        let producer = {
            let channel = channel.clone();
            let second_stored = second_stored.clone();
            thread::spawn(move || {
                channel.put(2).unwrap();
                second_stored.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(SETTLE);
        assert!(!second_stored.load(Ordering::SeqCst));

        assert_eq!(channel.get(), Some(1));
        producer.join().unwrap();
        assert!(second_stored.load(Ordering::SeqCst));
        assert_eq!(channel.get(), Some(2));
    }

    #[test]
    fn test_order_preserved_across_boundary() {
        let channel = Arc::new(SingleSlotChannel::new());
        let producer = {
            let channel = channel.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    channel.put(i).unwrap();
                }
                channel.signal_stop();
            })
        };

        let mut received = Vec::new();
        while let Some(i) = channel.get() {
            received.push(i);
        }
        producer.join().unwrap();

        assert_eq!(received, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_stop_releases_blocked_get() {
        let channel = Arc::new(SingleSlotChannel::<u32>::new());
        let consumer = {
            let channel = channel.clone();
            thread::spawn(move || channel.get())
        };

        thread::sleep(SETTLE);
        let stopped_at = Instant::now();
        channel.signal_stop();

        assert_eq!(consumer.join().unwrap(), None);
        assert!(stopped_at.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_stop_releases_blocked_put_without_storing() {
        let channel = Arc::new(SingleSlotChannel::new());
        channel.put(1).unwrap();

        let producer = {
            let channel = channel.clone();
            thread::spawn(move || channel.put(2))
        };

        thread::sleep(SETTLE);
        channel.signal_stop();

        assert_eq!(producer.join().unwrap(), Err(Rejected(2)));
        assert_eq!(channel.get(), Some(1));
        assert_eq!(channel.get(), None);
    }

    #[test]
    fn test_put_after_stop_is_rejected() {
        let channel = SingleSlotChannel::new();
        channel.signal_stop();

        let rejected = channel.put("orange").unwrap_err();
        assert_eq!(rejected.into_inner(), "orange");
        assert!(channel.is_empty());
    }

    #[test]
    fn test_stopped_channel_still_drains_resident_item() {
        let channel = SingleSlotChannel::new();
        channel.put(5).unwrap();
        channel.signal_stop();

        assert_eq!(channel.get(), Some(5));
        assert_eq!(channel.get(), None);
    }

    #[test]
    fn test_signal_stop_idempotent() {
        let channel = SingleSlotChannel::new();
        channel.put(1).unwrap();
        channel.signal_stop();
        channel.signal_stop();
        channel.signal_stop();

        assert!(channel.is_stopped());
        assert_eq!(channel.get(), Some(1));
        assert_eq!(channel.get(), None);
        assert!(channel.put(2).is_err());
    }

    #[test]
    fn test_never_more_than_one_resident() {
        let channel = Arc::new(SingleSlotChannel::new());
        let in_flight = Arc::new(std::sync::atomic::AtomicI64::new(0));

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let channel = channel.clone();
                let in_flight = in_flight.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        if channel.put(p * 100 + i).is_ok() {
                            in_flight.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        let mut taken = 0;
        while taken < 200 {
            if channel.get().is_some() {
                taken += 1;
                // Only the item just taken could have been counted without a
                // matching get, plus at most one newly stored item.
                let outstanding = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
                assert!(outstanding <= 1, "outstanding = {outstanding}");
            }
        }

        for producer in producers {
            producer.join().unwrap();
        }
        assert!(channel.is_empty());
    }

    #[test]
    fn test_rejected_display() {
        assert_eq!(Rejected(1).to_string(), "channel stopped, item rejected");
    }
}
