//! # ring_queue_rs
//!
//! A fixed-capacity FIFO ring buffer queue with two interchangeable
//! operating modes selected at construction:
//!
//! - **plain mode** — no internal synchronization; the caller coordinates
//!   access externally (a single thread, or one producer and one consumer
//!   under an external lock),
//! - **concurrent mode** — head and tail advance through atomic
//!   compare-and-swap loops, so any number of threads may enqueue and
//!   dequeue without an external lock.
//!
//! Operations never block: enqueueing into a full queue and dequeueing from
//! an empty one fail fast with the queue unchanged. One sentinel slot is
//! reserved internally so that `head == tail` unambiguously means "empty";
//! a queue of logical capacity `N` owns `N + 1` slots.
//!
//! ```
//! use ring_queue_rs::RingBufferQueue;
//!
//! let q = RingBufferQueue::<u32>::new(3, false);
//! assert!(q.enqueue(1));
//! assert!(q.enqueue(2));
//! assert_eq!(q.dequeue(), Some(1));
//! assert_eq!(q.to_string(), "[2]");
//! ```

mod arch;
mod common;
mod error;
mod policy;

pub mod queue;

// Re-exports for convenience
pub use error::QueueError;
pub use queue::{RingBufferQueue, DEFAULT_CAPACITY};
