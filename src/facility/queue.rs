//! # Thread-safe FIFO of free spots.
//!
//! [`SpotQueue`] holds the free coordinates of one category. The facility keeps
//! one queue per active category and allocates from the head, so the spot
//! freed earliest is handed out next.
//!
//! ## Rules
//! - One [`RwLock`] guards the whole ring buffer: exclusive for `enqueue` /
//!   `dequeue`, shared for `size` / `snapshot`.
//! - Every operation is linearizable; concurrent callers never lose or
//!   duplicate an entry.
//! - `size()` always equals the number of entries held.

use std::collections::VecDeque;

use parking_lot::RwLock;

/// Lock-guarded FIFO queue.
#[derive(Debug)]
pub struct SpotQueue<T> {
    items: RwLock<VecDeque<T>>,
}

impl<T> SpotQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(VecDeque::new()),
        }
    }

    /// Appends `item` at the tail.
    pub fn enqueue(&self, item: T) {
        self.items.write().push_back(item);
    }

    /// Puts `item` back at the head, ahead of everything else.
    ///
    /// Used to return an entry that was just dequeued but not handed out.
    pub(crate) fn requeue_front(&self, item: T) {
        self.items.write().push_front(item);
    }

    /// Removes the head, or returns `None` (without side effects) when empty.
    pub fn dequeue(&self) -> Option<T> {
        self.items.write().pop_front()
    }

    /// Current number of entries.
    pub fn size(&self) -> usize {
        self.items.read().len()
    }

    /// True if no entry is held.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T: Clone> SpotQueue<T> {
    /// Copies all entries head-to-tail; the queue is left untouched.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().iter().cloned().collect()
    }

    /// Size and contents read under one shared lock.
    pub(crate) fn size_and_snapshot(&self) -> (usize, Vec<T>) {
        let items = self.items.read();
        (items.len(), items.iter().cloned().collect())
    }
}

impl<T> Default for SpotQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SpotQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn dequeues_in_enqueue_order() {
        let q = SpotQueue::new();
        q.enqueue(1);
        q.enqueue(2);
        q.enqueue(3);
        assert_eq!(q.dequeue(), Some(1));
        q.enqueue(4);
        assert_eq!(q.snapshot(), vec![2, 3, 4]);
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), Some(4));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn requeued_entry_is_next_out() {
        let q: SpotQueue<u8> = (1..=3).collect();
        let head = q.dequeue().unwrap();
        q.requeue_front(head);
        assert_eq!(q.snapshot(), vec![1, 2, 3]);
        assert_eq!(q.dequeue(), Some(1));
    }

    #[test]
    fn empty_dequeue_leaves_size_alone() {
        let q: SpotQueue<u32> = SpotQueue::new();
        assert_eq!(q.dequeue(), None);
        assert_eq!(q.size(), 0);
        assert!(q.is_empty());

        q.enqueue(9);
        assert_eq!(q.dequeue(), Some(9));
        assert_eq!(q.dequeue(), None);
        assert_eq!(q.size(), 0);
    }

    #[test]
    fn size_tracks_items_not_yet_dequeued() {
        let q = SpotQueue::new();
        let mut live = 0usize;
        for round in 0..50u32 {
            for i in 0..(round % 7) {
                q.enqueue(round * 100 + i);
                live += 1;
            }
            for _ in 0..(round % 5) {
                if q.dequeue().is_some() {
                    live -= 1;
                }
            }
            assert_eq!(q.size(), live, "round {round}");
            assert_eq!(q.snapshot().len(), live);
        }
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let q: SpotQueue<u8> = (0..5).collect();
        let first = q.snapshot();
        let second = q.snapshot();
        assert_eq!(first, second);
        assert_eq!(q.size(), 5);
        assert_eq!(q.size_and_snapshot(), (5, vec![0, 1, 2, 3, 4]));
    }

    #[test]
    fn concurrent_storm_loses_nothing() {
        const PRODUCERS: usize = 8;
        const PER_PRODUCER: usize = 2_000;
        const CONSUMERS: usize = 8;

        let q = Arc::new(SpotQueue::new());
        let barrier = Arc::new(Barrier::new(PRODUCERS + CONSUMERS));

        let taken: Vec<Vec<usize>> = thread::scope(|s| {
            for p in 0..PRODUCERS {
                let q = Arc::clone(&q);
                let barrier = Arc::clone(&barrier);
                s.spawn(move || {
                    barrier.wait();
                    for i in 0..PER_PRODUCER {
                        q.enqueue(p * PER_PRODUCER + i);
                    }
                });
            }

            let consumers: Vec<_> = (0..CONSUMERS)
                .map(|_| {
                    let q = Arc::clone(&q);
                    let barrier = Arc::clone(&barrier);
                    s.spawn(move || {
                        barrier.wait();
                        let mut got = Vec::new();
                        for _ in 0..PER_PRODUCER / 2 {
                            if let Some(v) = q.dequeue() {
                                got.push(v);
                            }
                        }
                        got
                    })
                })
                .collect();

            consumers
                .into_iter()
                .map(|h| h.join().expect("consumer panicked"))
                .collect()
        });

        let dequeued: usize = taken.iter().map(Vec::len).sum();
        assert_eq!(q.size(), PRODUCERS * PER_PRODUCER - dequeued);

        let mut seen = HashSet::new();
        for v in taken.into_iter().flatten().chain(q.snapshot()) {
            assert!(seen.insert(v), "value {v} returned twice");
        }
        assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
    }

    #[test]
    fn per_producer_order_survives_concurrency() {
        let q = Arc::new(SpotQueue::new());
        thread::scope(|s| {
            for p in 0..4u32 {
                let q = Arc::clone(&q);
                s.spawn(move || {
                    for i in 0..500u32 {
                        q.enqueue((p, i));
                    }
                });
            }
        });

        let mut last = [None::<u32>; 4];
        while let Some((p, i)) = q.dequeue() {
            let slot = &mut last[p as usize];
            if let Some(prev) = *slot {
                assert!(i > prev, "producer {p}: {i} after {prev}");
            }
            *slot = Some(i);
        }
        assert!(q.is_empty());
    }
}
