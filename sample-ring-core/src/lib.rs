//! # sample-ring-core
//!
//! Fixed-capacity circular buffer for 8-bit samples.
//!
//! Provides FIFO write/read with explicit full/empty outcomes, explicit
//! capacity changes, and loop replication: materializing a new buffer that
//! holds the current unread samples repeated to a (possibly fractional)
//! multiple of their length, without disturbing the source.
//!
//! ## Architecture
//!
//! ```text
//! sample-ring-core (this crate)
//! ├── models/       ← RingError, RingConfiguration
//! └── processing/   ← RingBuffer, Readable window, loop replication
//! ```
//!
//! A `RingBuffer` has a single owner. Callers that need to share one across
//! threads wrap it in a mutex themselves.

pub mod models;
pub mod processing;

// Re-export key types at crate root for convenience.
pub use models::config::RingConfiguration;
pub use models::error::RingError;
pub use processing::ring_buffer::{Readable, RingBuffer, Sample};
