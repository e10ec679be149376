//! Index-advancement strategies for the two operating modes.
//!
//! A queue picks one of two strategies at construction: [`PlainCursors`]
//! performs unsynchronized load/store advancement and relies on the caller
//! for mutual exclusion, while [`CasCursors`] reserves indices through a
//! compare-and-swap loop so multiple threads can contend safely. Both work
//! purely on the cursor pair; payload hand-off is the slot protocol's job.

use crate::arch::spin_loop_pause;
use crate::common::{ordering, Cursors};

/// How a queue advances its cursors.
///
/// `reserve_tail` and `reserve_head` either claim exactly one slot index and
/// advance the corresponding cursor past it, or return `None` when the ring
/// is full (respectively empty) without mutating anything. A claimed index is
/// granted to exactly one caller.
pub trait AdvancePolicy: Send + Sync {
    /// Claims the next write slot, or `None` if the ring is full.
    fn reserve_tail(&self, cursors: &Cursors, slots: usize) -> Option<usize>;

    /// Claims the next read slot, or `None` if the ring is empty.
    fn reserve_head(&self, cursors: &Cursors, slots: usize) -> Option<usize>;

    /// Whether this strategy tolerates unsynchronized callers.
    fn is_concurrent(&self) -> bool;
}

/// Unsynchronized advancement.
///
/// Correct only when the caller guarantees no concurrent mutator: a single
/// thread, or one producer and one consumer under external exclusion.
/// Unsynchronized multi-threaded use through this strategy is a data race.
pub struct PlainCursors;

/// CAS-based advancement.
///
/// Each cursor is advanced by a compare-and-swap conditioned on the value
/// just read, so concurrent enqueuers (and concurrent dequeuers) are granted
/// distinct slots in a strict total order. The loop retries while the CAS
/// fails and stops on the first success; a failed compare refreshes the
/// expected value, and the full/empty check is redone on every attempt.
pub struct CasCursors;

/// The two strategy instances queues point at.
pub static PLAIN: PlainCursors = PlainCursors;
pub static CAS: CasCursors = CasCursors;

impl AdvancePolicy for PlainCursors {
    fn reserve_tail(&self, cursors: &Cursors, slots: usize) -> Option<usize> {
        if cursors.is_full(slots) {
            return None;
        }
        let tail = cursors.tail.load(ordering::X);
        cursors.tail.store((tail + 1) % slots, ordering::X);
        Some(tail)
    }

    fn reserve_head(&self, cursors: &Cursors, slots: usize) -> Option<usize> {
        if cursors.is_empty() {
            return None;
        }
        let head = cursors.head.load(ordering::X);
        cursors.head.store((head + 1) % slots, ordering::X);
        Some(head)
    }

    fn is_concurrent(&self) -> bool {
        false
    }
}

impl AdvancePolicy for CasCursors {
    fn reserve_tail(&self, cursors: &Cursors, slots: usize) -> Option<usize> {
        let mut tail = cursors.tail.load(ordering::X);
        loop {
            let head = cursors.head.load(ordering::X);
            if (tail + 1) % slots == head {
                return None;
            }
            match cursors.tail.compare_exchange_weak(
                tail,
                (tail + 1) % slots,
                ordering::A,
                ordering::X,
            ) {
                Ok(_) => return Some(tail),
                Err(current) => {
                    tail = current;
                    spin_loop_pause();
                }
            }
        }
    }

    fn reserve_head(&self, cursors: &Cursors, slots: usize) -> Option<usize> {
        let mut head = cursors.head.load(ordering::X);
        loop {
            let tail = cursors.tail.load(ordering::X);
            if head == tail {
                return None;
            }
            match cursors.head.compare_exchange_weak(
                head,
                (head + 1) % slots,
                ordering::A,
                ordering::X,
            ) {
                Ok(_) => return Some(head),
                Err(current) => {
                    head = current;
                    spin_loop_pause();
                }
            }
        }
    }

    fn is_concurrent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn plain_reserves_sequential_indices() {
        let cursors = Cursors::new();
        for expected in 0..7 {
            assert_eq!(PLAIN.reserve_tail(&cursors, 8), Some(expected));
        }
        // Seven elements in an 8-slot ring: only the sentinel is left.
        assert_eq!(PLAIN.reserve_tail(&cursors, 8), None);

        for expected in 0..7 {
            assert_eq!(PLAIN.reserve_head(&cursors, 8), Some(expected));
        }
        assert_eq!(PLAIN.reserve_head(&cursors, 8), None);
    }

    #[test]
    fn plain_wraps_modulo_slot_count() {
        let cursors = Cursors::with(7, 7);
        assert_eq!(PLAIN.reserve_tail(&cursors, 8), Some(7));
        assert_eq!(cursors.tail.load(Ordering::Relaxed), 0);
        assert_eq!(PLAIN.reserve_head(&cursors, 8), Some(7));
        assert_eq!(cursors.head.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn cas_refuses_full_and_empty() {
        let cursors = Cursors::new();
        assert_eq!(CAS.reserve_head(&cursors, 8), None);
        for _ in 0..7 {
            assert!(CAS.reserve_tail(&cursors, 8).is_some());
        }
        assert_eq!(CAS.reserve_tail(&cursors, 8), None);
    }

    #[test]
    fn cas_grants_each_index_once() {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 200;
        // Large enough that no reservation ever fails.
        const SLOTS: usize = THREADS * PER_THREAD + 1;

        let cursors = Arc::new(Cursors::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let mut handles = Vec::with_capacity(THREADS);
        for _ in 0..THREADS {
            let cursors = Arc::clone(&cursors);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                let mut claimed = Vec::with_capacity(PER_THREAD);
                for _ in 0..PER_THREAD {
                    claimed.push(CAS.reserve_tail(&cursors, SLOTS).unwrap());
                }
                claimed
            }));
        }

        let mut all: Vec<usize> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), THREADS * PER_THREAD, "an index was granted twice");
    }
}
