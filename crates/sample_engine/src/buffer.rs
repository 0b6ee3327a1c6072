//! Per-sensor sample buffer with atomic drain.
//!
//! Producers append from arbitrary threads while the tick handler drains
//! the whole window. The guarded Vec swap keeps a drain atomic with
//! respect to concurrent appends: every value lands in exactly one drain,
//! in insertion order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Append-only buffer of samples between two ticks.
pub struct ValueBuffer<U> {
    samples: Mutex<Vec<U>>,
    added_count: AtomicU64,
    drained_count: AtomicU64,
}

impl<U> fmt::Debug for ValueBuffer<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBuffer")
            .field("len", &self.len())
            .field("added", &self.added_count())
            .field("drained", &self.drained_count())
            .finish()
    }
}

impl<U> ValueBuffer<U> {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(Vec::new()),
            added_count: AtomicU64::new(0),
            drained_count: AtomicU64::new(0),
        }
    }

    /// Append a sample at the tail
    ///
    /// Never fails; the critical section is a Vec push.
    pub fn push(&self, value: U) {
        // A poisoned lock still guards coherent data; keep accepting values.
        let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.push(value);
        self.added_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Atomically remove and return all buffered samples in insertion order
    ///
    /// An empty buffer drains to an empty Vec; draining is idempotent.
    pub fn drain_all(&self) -> Vec<U> {
        let drained = {
            let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *samples)
        };
        self.drained_count
            .fetch_add(drained.len() as u64, Ordering::Relaxed);
        drained
    }

    /// Number of samples currently buffered
    pub fn len(&self) -> usize {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total samples ever pushed
    pub fn added_count(&self) -> u64 {
        self.added_count.load(Ordering::Relaxed)
    }

    /// Total samples ever drained
    pub fn drained_count(&self) -> u64 {
        self.drained_count.load(Ordering::Relaxed)
    }
}

impl<U> Default for ValueBuffer<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn drain_preserves_insertion_order() {
        let buffer = ValueBuffer::new();
        buffer.push(3);
        buffer.push(1);
        buffer.push(2);

        assert_eq!(buffer.drain_all(), vec![3, 1, 2]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_drain_is_idempotent() {
        let buffer: ValueBuffer<i64> = ValueBuffer::new();
        assert_eq!(buffer.drain_all(), Vec::<i64>::new());
        assert_eq!(buffer.drain_all(), Vec::<i64>::new());
        assert_eq!(buffer.drained_count(), 0);
    }

    #[test]
    fn counters_track_added_and_drained() {
        let buffer = ValueBuffer::new();
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        assert_eq!(buffer.added_count(), 2);

        buffer.drain_all();
        buffer.push("c".to_string());
        assert_eq!(buffer.added_count(), 3);
        assert_eq!(buffer.drained_count(), 2);
    }

    #[test]
    fn concurrent_pushes_are_never_lost_or_duplicated() {
        const THREADS: u64 = 4;
        const PER_THREAD: u64 = 1000;

        let buffer = Arc::new(ValueBuffer::new());
        let mut collected = Vec::new();

        let producers: Vec<_> = (0..THREADS)
            .map(|t| {
                let buffer = Arc::clone(&buffer);
                std::thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        buffer.push(t * PER_THREAD + i);
                    }
                })
            })
            .collect();

        // Drain concurrently with the producers
        while buffer.drained_count() + buffer.len() as u64 != THREADS * PER_THREAD
            || producers.iter().any(|p| !p.is_finished())
        {
            collected.extend(buffer.drain_all());
        }

        for producer in producers {
            producer.join().unwrap();
        }
        collected.extend(buffer.drain_all());

        assert_eq!(collected.len() as u64, THREADS * PER_THREAD);

        // Every value exactly once, and per-thread order preserved
        let mut seen = collected.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len() as u64, THREADS * PER_THREAD);

        for t in 0..THREADS {
            let thread_values: Vec<_> = collected
                .iter()
                .filter(|v| **v / PER_THREAD == t)
                .copied()
                .collect();
            assert!(thread_values.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
