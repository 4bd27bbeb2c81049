// pcdex-api: Async Rust client for the pcdex inventory REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::InventoryClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    Disk, NotesUpdate, NotesUpdated, Pc, PcDeleted, PcId, PcListParams, PcSortField, PcSummary,
    RamStick, SortOrder, Tag, TagBadge, TagCreate, TagId,
};
