use thiserror::Error;

/// Errors reported by ring buffer operations.
///
/// Reading from an empty buffer is not an error; it yields `None`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RingError {
    #[error("buffer full: {capacity} unread samples held")]
    Full { capacity: usize },

    #[error("capacity {requested} too small: {occupancy} unread samples, cursor at {cursor:?}")]
    CapacityTooSmall {
        requested: usize,
        occupancy: usize,
        cursor: Option<usize>,
    },

    #[error("seed of {len} samples exceeds capacity {capacity}")]
    SeedOverflow { len: usize, capacity: usize },

    #[error("cannot allocate storage for {capacity} samples")]
    AllocationFailed { capacity: usize },

    #[error("invalid loop factor: {0}")]
    InvalidFactor(f64),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}
