//! Swatch core primitives
//!
//! Small building blocks shared by the token, condition and theme crates:
//!
//! - [`CallContext`]: cancellation token plus optional deadline, threaded
//!   explicitly through every long-running call
//! - [`BoundedCache`]: thread-safe LRU cache bounded by entry count and by a
//!   per-value cost budget

pub mod cache;
pub mod context;

pub use cache::{BoundedCache, CacheCost, CacheStats};
pub use context::{CallContext, Interrupted};
