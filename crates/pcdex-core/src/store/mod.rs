// ── Query cache ──
//
// Keyed storage for fetched query results, with staleness tracking,
// cross-query invalidation, and optimistic patching.

mod family;
mod mutations;
mod query_cache;

pub use family::{CachedEntry, Freshness};
pub use query_cache::QueryCache;
