//! The ring buffer queue.
//!
//! A fixed-capacity FIFO over `capacity + 1` contiguous slots; the extra
//! sentinel slot is never reported to callers and lets `head == tail` mean
//! "empty" unambiguously. The operating mode chosen at construction decides
//! how the cursors advance (the policy module); payload hand-off always
//! goes through a per-slot ready marker so a concurrent consumer never
//! observes a slot whose write has not completed.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem;

use std::sync::atomic::AtomicBool;

use crate::arch::spin_loop_pause;
use crate::common::{ordering, Cursors};
use crate::error::QueueError;
use crate::policy::{AdvancePolicy, CAS, PLAIN};

/// Logical capacity used by [`RingBufferQueue::default`].
pub const DEFAULT_CAPACITY: usize = 100;

/// One storage cell: the payload plus its publication marker.
///
/// The marker is flipped to `true` after the payload store (Release) and
/// back to `false` after the payload load (Release), so index reservation
/// and payload visibility are ordered even though they are separate atomics.
struct Slot<T> {
    ready: AtomicBool,
    value: UnsafeCell<T>,
}

impl<T: Copy + Default> Slot<T> {
    #[inline]
    fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            value: UnsafeCell::new(T::default()),
        }
    }

    /// Stores `value` once the previous occupant has been drained.
    ///
    /// The wait only spins in concurrent mode, when a consumer has been
    /// granted this slot on the previous lap but has not finished reading
    /// it; under plain-mode exclusion the marker is already clear.
    #[inline]
    fn write(&self, value: T) {
        while self.ready.load(ordering::A) {
            spin_loop_pause();
        }
        unsafe { *self.value.get() = value };
        self.ready.store(true, ordering::R);
    }

    /// Copies the payload out once the producer has published it.
    #[inline]
    fn read(&self) -> T {
        while !self.ready.load(ordering::A) {
            spin_loop_pause();
        }
        let value = unsafe { *self.value.get() };
        self.ready.store(false, ordering::R);
        value
    }

    /// Unsynchronized copy of the payload, for rendering and cloning.
    #[inline]
    fn peek(&self) -> T {
        unsafe { *self.value.get() }
    }

    fn snapshot(&self) -> Self {
        Self {
            ready: AtomicBool::new(self.ready.load(ordering::X)),
            value: UnsafeCell::new(self.peek()),
        }
    }
}

/// A fixed-capacity FIFO ring buffer with two operating modes.
///
/// In **plain** mode the queue performs no internal synchronization of its
/// cursors; callers must guarantee mutual exclusion, and unsynchronized
/// multi-threaded use is a data race. In **concurrent** mode cursors advance
/// through a CAS reservation loop and many threads may call [`enqueue`] and
/// [`dequeue`] without an external lock.
///
/// Both modes fail fast: enqueueing into a full queue and dequeueing from an
/// empty one return immediately without mutating anything. Nothing blocks.
///
/// [`enqueue`]: RingBufferQueue::enqueue
/// [`dequeue`]: RingBufferQueue::dequeue
pub struct RingBufferQueue<T: Copy + Default> {
    cursors: Cursors,
    slots: Box<[Slot<T>]>,
    policy: &'static dyn AdvancePolicy,
}

// Safety: payloads are handed between threads through the ready marker
// (Release store after the write, Acquire load before the read), and cursor
// mutation in concurrent mode goes through the CAS protocol. Plain mode
// requires external exclusion, which is a documented precondition.
unsafe impl<T: Copy + Default + Send> Send for RingBufferQueue<T> {}
unsafe impl<T: Copy + Default + Send> Sync for RingBufferQueue<T> {}

impl<T: Copy + Default> RingBufferQueue<T> {
    /// Creates a queue holding up to `capacity` elements.
    ///
    /// `concurrent` selects the CAS-based mode; the mode is fixed for the
    /// life of the queue. Storage for `capacity + 1` slots is allocated once
    /// here and never resized.
    ///
    /// Panics if storage cannot be allocated; use [`try_new`] to handle
    /// allocation failure.
    ///
    /// [`try_new`]: RingBufferQueue::try_new
    pub fn new(capacity: usize, concurrent: bool) -> Self {
        Self::try_new(capacity, concurrent).expect("ring storage allocation failed")
    }

    /// Fallible variant of [`new`](RingBufferQueue::new).
    pub fn try_new(capacity: usize, concurrent: bool) -> Result<Self, QueueError> {
        let slots = capacity
            .checked_add(1)
            .ok_or(QueueError::CapacityOverflow { capacity })?;

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(slots)
            .map_err(|_| QueueError::AllocationFailed { slots })?;
        storage.extend((0..slots).map(|_| Slot::new()));

        Ok(Self {
            cursors: Cursors::new(),
            slots: storage.into_boxed_slice(),
            policy: if concurrent { &CAS } else { &PLAIN },
        })
    }

    /// True iff only the sentinel slot is free.
    ///
    /// A snapshot: under concurrent mutation the answer may be stale by the
    /// time the caller acts on it, but a subsequent [`enqueue`] still fails
    /// or succeeds atomically on its own.
    ///
    /// [`enqueue`]: RingBufferQueue::enqueue
    pub fn is_full(&self) -> bool {
        self.cursors.is_full(self.slots.len())
    }

    /// True iff the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Number of elements currently held, as a snapshot of both cursors.
    pub fn len(&self) -> usize {
        self.cursors.count(self.slots.len())
    }

    /// Usable capacity. The sentinel slot is not counted.
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Whether this queue was constructed in the CAS-based concurrent mode.
    pub fn is_concurrent(&self) -> bool {
        self.policy.is_concurrent()
    }

    /// Appends `value` at the tail. Returns `false` without mutating
    /// anything if the queue is full.
    pub fn enqueue(&self, value: T) -> bool {
        match self.policy.reserve_tail(&self.cursors, self.slots.len()) {
            Some(index) => {
                self.slots[index].write(value);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the element at the head, or `None` if the queue
    /// is empty.
    pub fn dequeue(&self) -> Option<T> {
        let index = self.policy.reserve_head(&self.cursors, self.slots.len())?;
        Some(self.slots[index].read())
    }

    /// Moves the contents out, leaving `self` as an empty shell with zero
    /// reported capacity whose operations all fail cleanly.
    ///
    /// Must not be called while other threads are operating on the queue.
    pub fn take(&mut self) -> Self {
        let shell = Self {
            cursors: Cursors::new(),
            slots: vec![Slot::new()].into_boxed_slice(),
            policy: self.policy,
        };
        mem::replace(self, shell)
    }
}

impl<T: Copy + Default> Default for RingBufferQueue<T> {
    /// A plain-mode queue with logical capacity [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, false)
    }
}

/// Deep copy: fresh storage, every slot copied element-wise (stale ones
/// included) and the cursors carried over as plain snapshots.
///
/// Cloning a queue that is concurrently mutated is racy: the snapshot is not
/// linearizable with in-flight operations. Clone only quiescent queues.
impl<T: Copy + Default> Clone for RingBufferQueue<T> {
    fn clone(&self) -> Self {
        let slots: Vec<Slot<T>> = self.slots.iter().map(Slot::snapshot).collect();
        Self {
            cursors: Cursors::with(
                self.cursors.head.load(ordering::X),
                self.cursors.tail.load(ordering::X),
            ),
            slots: slots.into_boxed_slice(),
            policy: self.policy,
        }
    }
}

/// Renders the live contents from head to tail as `[a, b, c]`.
///
/// A human-readable debug affordance, not a stable format. Racy under
/// concurrent mutation, like any whole-queue snapshot.
impl<T: Copy + Default + fmt::Display> fmt::Display for RingBufferQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.len();
        let tail = self.cursors.tail.load(ordering::X);
        let mut next = self.cursors.head.load(ordering::X);

        write!(f, "[")?;
        let mut first = true;
        while next != tail {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.slots[next].peek())?;
            first = false;
            next = (next + 1) % slots;
        }
        write!(f, "]")
    }
}

impl<T: Copy + Default> fmt::Debug for RingBufferQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBufferQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("concurrent", &self.is_concurrent())
            .finish()
    }
}
