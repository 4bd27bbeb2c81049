// ── Mutation application ──
//
// The cross-query effects of each mutation, applied after server
// confirmation (plus the optimistic staging path for notes). Each
// method updates every affected family first and publishes exactly one
// revision, so observers see the whole effect or none of it.

use tracing::debug;

use pcdex_api::{Pc, PcId, Tag};

use super::family::CachedEntry;
use super::query_cache::QueryCache;

impl QueryCache {
    /// A tag was created: every tag list needs a refetch.
    pub fn apply_tag_created(&self) {
        self.tags.invalidate_all();
        self.publish();
    }

    /// A tag was deleted. Tag lists and PC lists go stale; every cached
    /// PC record and per-PC tag list that referenced the tag has it
    /// patched out immediately and is marked for refetch. List rows
    /// carry name-only badges, so they are scrubbed by name; the next
    /// real fetch is authoritative either way.
    pub fn apply_tag_deleted(&self, tag: &Tag) {
        self.tags.invalidate_all();
        self.pc_lists.invalidate_all();

        for key in self.pcs.keys() {
            let referenced = self.pcs.get(&key).is_some_and(|e| e.value.has_tag(tag.id));
            if referenced {
                self.pcs.patch(&key, |pc| {
                    let mut pc = pc.clone();
                    pc.tags.retain(|t| t.id != tag.id);
                    pc
                });
                self.pcs.invalidate(&key);
            }
        }

        for key in self.pc_tags.keys() {
            let referenced = self
                .pc_tags
                .get(&key)
                .is_some_and(|e| e.value.iter().any(|t| t.id == tag.id));
            if referenced {
                self.pc_tags.patch(&key, |tags| {
                    tags.iter().filter(|t| t.id != tag.id).cloned().collect()
                });
                self.pc_tags.invalidate(&key);
            }
        }

        for key in self.pc_lists.keys() {
            self.pc_lists.patch(&key, |rows| {
                rows.iter()
                    .map(|row| {
                        let mut row = row.clone();
                        row.tags.retain(|badge| badge.name != tag.name);
                        row
                    })
                    .collect()
            });
        }

        debug!(tag = %tag.id, "tag deletion cascaded through cache");
        self.publish();
    }

    /// Notes were confirmed by the server. The confirmed value is
    /// patched in and the record marked for refetch, so a divergent
    /// copy can never survive a successful update.
    pub fn apply_notes_updated(&self, pc_id: &PcId, notes: &str) {
        self.pcs.patch(pc_id, |pc| with_notes(pc, notes));
        self.pcs.invalidate(pc_id);
        self.publish();
    }

    /// A PC was deleted (server-confirmed). Its record and tag list are
    /// removed outright; every PC list goes stale.
    pub fn apply_pc_deleted(&self, pc_id: &PcId) {
        self.pcs.remove(pc_id);
        self.pc_tags.remove(pc_id);
        self.pc_lists.invalidate_all();
        self.publish();
    }

    /// A tag was attached to or detached from a PC.
    pub fn apply_pc_tags_changed(&self, pc_id: &PcId) {
        self.pc_lists.invalidate_all();
        self.pcs.invalidate(pc_id);
        self.pc_tags.invalidate(pc_id);
        self.publish();
    }

    // ── Optimistic notes staging ─────────────────────────────────────

    /// Patch the new notes into the cached record before the server
    /// answers. Returns the pre-patch entry; the caller restores it if
    /// the update fails. No-op (and `None`) when the record isn't cached.
    pub fn stage_notes(&self, pc_id: &PcId, notes: &str) -> Option<CachedEntry<Pc>> {
        let prior = self.pcs.patch(pc_id, |pc| with_notes(pc, notes));
        if prior.is_some() {
            self.publish();
        }
        prior
    }

    /// Roll a staged notes patch back to the captured entry.
    pub fn restore_pc(&self, pc_id: PcId, prior: CachedEntry<Pc>) {
        self.pcs.restore(pc_id, prior);
        self.publish();
    }
}

fn with_notes(pc: &Pc, notes: &str) -> Pc {
    let mut pc = pc.clone();
    pc.notes = Some(notes.to_owned());
    pc
}
