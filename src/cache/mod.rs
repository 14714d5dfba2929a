//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use shared::{EntityCache, FillTicket};
pub use stats::CacheStats;
pub use store::{CacheSettings, CacheStore};

// == Public Constants ==
/// Freshness window used when nothing else is configured
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Capacity used when nothing else is configured
pub const DEFAULT_MAX_ENTRIES: usize = 5;
