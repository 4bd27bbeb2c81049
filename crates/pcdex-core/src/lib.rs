// pcdex-core: Cache and view-binding layer between pcdex-api and consumers.

pub mod binding;
pub mod config;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use binding::{Mutation, MutationCallbacks, Query, QueryState, QueryStateStream, TagAssignment};
pub use config::{InventoryConfig, TlsVerification};
pub use session::Inventory;
pub use store::{CachedEntry, Freshness, QueryCache};

// Re-export the wire model at the crate root for ergonomics.
pub use pcdex_api::{
    Disk, Error, NotesUpdate, NotesUpdated, Pc, PcDeleted, PcId, PcListParams, PcSortField,
    PcSummary, RamStick, SortOrder, Tag, TagBadge, TagCreate, TagId,
};
