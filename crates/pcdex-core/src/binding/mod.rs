// ── View bindings ──
//
// Store-aware wrappers around the remote operations: queries read
// through the cache with request de-duplication, mutations apply the
// invalidation table before caller callbacks run.

pub(crate) mod flight;
mod mutation;
mod query;
mod stream;

pub use mutation::{Mutation, MutationCallbacks, TagAssignment};
pub use query::{Query, QueryState};
pub use stream::QueryStateStream;
