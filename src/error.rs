//! Error types for queue construction.

use thiserror::Error;

/// Errors surfaced by fallible construction.
///
/// Full and empty conditions are not errors; enqueue/dequeue report those
/// through their return values with the queue left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The requested logical capacity leaves no room for the sentinel slot.
    #[error("capacity {capacity} overflows once the sentinel slot is added")]
    CapacityOverflow { capacity: usize },

    /// The allocator could not provide storage for the ring.
    #[error("failed to allocate {slots} slots of ring storage")]
    AllocationFailed { slots: usize },
}
