//! Shared cursor state and memory ordering aliases.

use std::sync::atomic::AtomicUsize;

use crossbeam_utils::CachePadded;

/// Memory ordering constants for atomic operations.
///
/// Short aliases to the standard library's `Ordering` values, used
/// throughout the cursor and slot protocols.
pub mod ordering {
    pub use std::sync::atomic::Ordering::Acquire as A;
    pub use std::sync::atomic::Ordering::Relaxed as X;
    pub use std::sync::atomic::Ordering::Release as R;
}

/// The read/write cursor pair shared by both operating modes.
///
/// `head` is the next slot to read, `tail` the next slot to write. Each
/// lives on its own cache line so producers and consumers do not false-share.
/// Both indices always stay in `[0, slots)` where `slots` is the storage
/// length including the sentinel; all advancement is modulo `slots`.
pub struct Cursors {
    /// Index of the next element to be read. Mutated by dequeues only.
    pub head: CachePadded<AtomicUsize>,
    /// Index of the next free slot to be written. Mutated by enqueues only.
    pub tail: CachePadded<AtomicUsize>,
}

impl Cursors {
    #[inline]
    pub fn new() -> Self {
        Self::with(0, 0)
    }

    /// Creates a cursor pair at the given positions. Used when cloning a
    /// queue, where the source's indices are carried over as snapshots.
    #[inline]
    pub fn with(head: usize, tail: usize) -> Self {
        Self {
            head: CachePadded::new(AtomicUsize::new(head)),
            tail: CachePadded::new(AtomicUsize::new(tail)),
        }
    }

    /// Number of live elements, as a snapshot of both indices.
    ///
    /// Not linearizable with concurrent enqueues/dequeues; the result may be
    /// stale by the time the caller observes it.
    #[inline]
    pub fn count(&self, slots: usize) -> usize {
        let tail = self.tail.load(ordering::X);
        let head = self.head.load(ordering::X);
        (tail + slots - head) % slots
    }

    /// True iff the snapshot of both indices coincides.
    #[inline]
    pub fn is_empty(&self) -> bool {
        let tail = self.tail.load(ordering::X);
        let head = self.head.load(ordering::X);
        head == tail
    }

    /// True iff advancing `tail` would collide with `head`, leaving only
    /// the sentinel slot free.
    #[inline]
    pub fn is_full(&self, slots: usize) -> bool {
        let tail = self.tail.load(ordering::X);
        let head = self.head.load(ordering::X);
        (tail + 1) % slots == head
    }
}

impl Default for Cursors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cursors_are_empty() {
        let c = Cursors::new();
        assert!(c.is_empty());
        assert!(!c.is_full(8));
        assert_eq!(c.count(8), 0);
    }

    #[test]
    fn count_handles_wrapped_indices() {
        // head ahead of tail in slot space: 3 live elements in an 8-slot ring
        let c = Cursors::with(6, 1);
        assert_eq!(c.count(8), 3);
        assert!(!c.is_empty());
        assert!(!c.is_full(8));
    }

    #[test]
    fn full_leaves_the_sentinel_free() {
        let c = Cursors::with(0, 7);
        assert!(c.is_full(8));
        assert_eq!(c.count(8), 7);
    }
}
