//! # Error Types

/// Errors from the training engine's core data structures and orchestration.
///
/// All variants are fatal to the calling operation: the trainer does not
/// retry. A correctly-invoked training run produces none of these; they
/// surface only for programmer bugs or misuse of the lower-level
/// [`crate::sequence::LinkedSequence`] / [`crate::heap::IndexedMaxHeap`] APIs
/// directly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// [`crate::sequence::LinkedSequence`] access on a dead or out-of-range index.
    #[error("invalid sequence index {index} (dead or out of range)")]
    InvalidIndex {
        /// The offending index.
        index: usize,
    },

    /// `peek_max`/`pop_max` called on an empty [`crate::heap::IndexedMaxHeap`].
    #[error("heap is empty")]
    EmptyHeap,

    /// `push` of a key already present in the heap's index.
    #[error("key already present in heap")]
    DuplicateKey,

    /// `delete_by_key`/`contains` lookup on a key absent from the heap's index.
    #[error("key not present in heap")]
    MissingKey,

    /// An internal consistency check failed (e.g. heap-array and key-map
    /// sizes disagree). Indicates a defect in the core; the process should
    /// not continue after this is observed.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
