// ── Central query cache ──
//
// One family per query shape. Keys are the canonical query parameters:
// `PcListParams` hashes structurally, so logically equal list queries
// share an entry no matter how the parameters were assembled.

use std::sync::Arc;

use tokio::sync::watch;

use pcdex_api::{Pc, PcId, PcListParams, PcSummary, Tag};

use super::family::{CachedEntry, QueryFamily};

/// Cache of fetched query results for all resources.
///
/// Reads are wait-free; writes use `DashMap`'s per-shard locks. Change
/// notification goes through a single revision counter: one bump per
/// logical mutation, sent only after every affected family has been
/// updated, so observers never see the invalidation table half-applied.
pub struct QueryCache {
    pub(crate) pc_lists: QueryFamily<PcListParams, Vec<PcSummary>>,
    pub(crate) pcs: QueryFamily<PcId, Pc>,
    pub(crate) tags: QueryFamily<(), Vec<Tag>>,
    pub(crate) pc_tags: QueryFamily<PcId, Vec<Tag>>,
    revision: watch::Sender<u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0u64);
        Self {
            pc_lists: QueryFamily::new(),
            pcs: QueryFamily::new(),
            tags: QueryFamily::new(),
            pc_tags: QueryFamily::new(),
            revision,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn pc_list(&self, params: &PcListParams) -> Option<CachedEntry<Vec<PcSummary>>> {
        self.pc_lists.get(params)
    }

    pub fn pc(&self, id: &PcId) -> Option<CachedEntry<Pc>> {
        self.pcs.get(id)
    }

    pub fn tag_list(&self) -> Option<CachedEntry<Vec<Tag>>> {
        self.tags.get(&())
    }

    pub fn pc_tag_list(&self, id: &PcId) -> Option<CachedEntry<Vec<Tag>>> {
        self.pc_tags.get(id)
    }

    // ── Writes (fetch results landing) ───────────────────────────────

    pub fn set_pc_list(&self, params: PcListParams, rows: Vec<PcSummary>) -> Arc<Vec<PcSummary>> {
        let value = self.pc_lists.set(params, rows);
        self.publish();
        value
    }

    /// Store a full PC record, keyed by its own id. A successful fetch
    /// or update result is the single source of truth for that id.
    pub fn set_pc(&self, pc: Pc) -> Arc<Pc> {
        let value = self.pcs.set(pc.id.clone(), pc);
        self.publish();
        value
    }

    pub fn set_tag_list(&self, tags: Vec<Tag>) -> Arc<Vec<Tag>> {
        let value = self.tags.set((), tags);
        self.publish();
        value
    }

    pub fn set_pc_tag_list(&self, id: PcId, tags: Vec<Tag>) -> Arc<Vec<Tag>> {
        let value = self.pc_tags.set(id, tags);
        self.publish();
        value
    }

    // ── Single-key invalidation (explicit refetch) ───────────────────

    pub fn invalidate_pc_list(&self, params: &PcListParams) {
        if self.pc_lists.invalidate(params) {
            self.publish();
        }
    }

    pub fn invalidate_pc(&self, id: &PcId) {
        if self.pcs.invalidate(id) {
            self.publish();
        }
    }

    pub fn invalidate_tag_list(&self) {
        if self.tags.invalidate(&()) {
            self.publish();
        }
    }

    pub fn invalidate_pc_tag_list(&self, id: &PcId) {
        if self.pc_tags.invalidate(id) {
            self.publish();
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to cache revisions. Each tick means "something changed;
    /// re-read the keys you care about".
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision counter value.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Bump the revision counter, waking all subscribers. Called once
    /// per logical mutation, after all families are updated.
    pub(crate) fn publish(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
