// ── Inventory session ──
//
// The entry point for consumers. Owns the HTTP client, the query cache,
// and the in-flight request gates; hands out query and mutation
// bindings wired to all three. Explicitly constructed and shut down --
// there is no hidden global.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use pcdex_api::{
    Error, InventoryClient, NotesUpdate, NotesUpdated, Pc, PcDeleted, PcId, PcListParams,
    PcSummary, Tag, TagCreate,
};

use crate::binding::flight::FlightDeck;
use crate::binding::{Mutation, Query, TagAssignment};
use crate::config::InventoryConfig;
use crate::store::QueryCache;

/// An inventory-server session.
///
/// Cheaply cloneable; clones share the cache and client. The cache
/// starts empty and nothing persists across sessions.
#[derive(Clone)]
pub struct Inventory {
    inner: Arc<InventoryInner>,
}

struct InventoryInner {
    client: InventoryClient,
    cache: QueryCache,
    pc_list_flights: FlightDeck<PcListParams>,
    pc_flights: FlightDeck<PcId>,
    tag_flights: FlightDeck<()>,
    pc_tag_flights: FlightDeck<PcId>,
    cancel: CancellationToken,
}

impl Inventory {
    /// Open a session against the configured server.
    pub fn new(config: &InventoryConfig) -> Result<Self, Error> {
        let client = InventoryClient::new(config.url.as_str(), &config.transport())?;
        Ok(Self::with_client(client))
    }

    /// Build a session around an existing client (tests inject a client
    /// pointed at a mock server this way).
    pub fn with_client(client: InventoryClient) -> Self {
        Self {
            inner: Arc::new(InventoryInner {
                client,
                cache: QueryCache::new(),
                pc_list_flights: FlightDeck::new(),
                pc_flights: FlightDeck::new(),
                tag_flights: FlightDeck::new(),
                pc_tag_flights: FlightDeck::new(),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// The shared query cache.
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    /// Stop all background refetch tasks spawned from this session's
    /// queries. Idempotent.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        debug!("inventory session shut down");
    }

    // ── Read-through accessors ───────────────────────────────────────

    /// Cached-or-fetched PC list for the given parameters.
    pub async fn pcs(&self, params: &PcListParams) -> Result<Arc<Vec<PcSummary>>, Error> {
        self.inner.fetch_pc_list(params.clone()).await
    }

    /// Cached-or-fetched PC record.
    pub async fn pc(&self, id: &PcId) -> Result<Arc<Pc>, Error> {
        self.inner.fetch_pc(id.clone()).await
    }

    /// Cached-or-fetched tag list.
    pub async fn tags(&self) -> Result<Arc<Vec<Tag>>, Error> {
        self.inner.fetch_tags().await
    }

    /// Cached-or-fetched tag list for one PC.
    pub async fn pc_tags(&self, id: &PcId) -> Result<Arc<Vec<Tag>>, Error> {
        self.inner.fetch_pc_tags(id.clone()).await
    }

    // ── Query bindings ───────────────────────────────────────────────

    pub fn pcs_query(&self, params: PcListParams) -> Query<Vec<PcSummary>> {
        let fetch_inner = Arc::clone(&self.inner);
        let fetch_params = params.clone();
        let probe_inner = Arc::clone(&self.inner);
        let probe_params = params.clone();
        let inv_inner = Arc::clone(&self.inner);

        Query::new(
            move || probe_inner.cache.pc_list(&probe_params),
            move || {
                let inner = Arc::clone(&fetch_inner);
                let params = fetch_params.clone();
                Box::pin(async move { inner.fetch_pc_list(params).await })
            },
            move || inv_inner.cache.invalidate_pc_list(&params),
            self.inner.cache.subscribe(),
            self.inner.cancel.clone(),
        )
    }

    pub fn pc_query(&self, id: PcId) -> Query<Pc> {
        let fetch_inner = Arc::clone(&self.inner);
        let fetch_id = id.clone();
        let probe_inner = Arc::clone(&self.inner);
        let probe_id = id.clone();
        let inv_inner = Arc::clone(&self.inner);

        Query::new(
            move || probe_inner.cache.pc(&probe_id),
            move || {
                let inner = Arc::clone(&fetch_inner);
                let id = fetch_id.clone();
                Box::pin(async move { inner.fetch_pc(id).await })
            },
            move || inv_inner.cache.invalidate_pc(&id),
            self.inner.cache.subscribe(),
            self.inner.cancel.clone(),
        )
    }

    pub fn tags_query(&self) -> Query<Vec<Tag>> {
        let fetch_inner = Arc::clone(&self.inner);
        let probe_inner = Arc::clone(&self.inner);
        let inv_inner = Arc::clone(&self.inner);

        Query::new(
            move || probe_inner.cache.tag_list(),
            move || {
                let inner = Arc::clone(&fetch_inner);
                Box::pin(async move { inner.fetch_tags().await })
            },
            move || inv_inner.cache.invalidate_tag_list(),
            self.inner.cache.subscribe(),
            self.inner.cancel.clone(),
        )
    }

    pub fn pc_tags_query(&self, id: PcId) -> Query<Vec<Tag>> {
        let fetch_inner = Arc::clone(&self.inner);
        let fetch_id = id.clone();
        let probe_inner = Arc::clone(&self.inner);
        let probe_id = id.clone();
        let inv_inner = Arc::clone(&self.inner);

        Query::new(
            move || probe_inner.cache.pc_tag_list(&probe_id),
            move || {
                let inner = Arc::clone(&fetch_inner);
                let id = fetch_id.clone();
                Box::pin(async move { inner.fetch_pc_tags(id).await })
            },
            move || inv_inner.cache.invalidate_pc_tag_list(&id),
            self.inner.cache.subscribe(),
            self.inner.cancel.clone(),
        )
    }

    // ── Mutation bindings ────────────────────────────────────────────

    /// Replace a PC's notes, optimistically patching the cached record
    /// first and rolling back if the server rejects the update.
    pub fn update_notes(&self) -> Mutation<NotesUpdate, NotesUpdated> {
        let session = Arc::clone(&self.inner);
        Mutation::new(move |update: NotesUpdate| {
            let inner = Arc::clone(&session);
            Box::pin(async move {
                if update.pc_id.is_empty() {
                    // Let the client's own guard answer; nothing staged,
                    // nothing sent.
                    return inner.client.update_notes(&update).await;
                }

                let prior = inner.cache.stage_notes(&update.pc_id, &update.notes);
                match inner.client.update_notes(&update).await {
                    Ok(confirmed) => {
                        inner.cache.apply_notes_updated(&update.pc_id, &update.notes);
                        Ok(confirmed)
                    }
                    Err(err) => {
                        if let Some(prior) = prior {
                            inner.cache.restore_pc(update.pc_id.clone(), prior);
                        }
                        Err(err)
                    }
                }
            })
        })
    }

    /// Delete a PC. The cached record is removed only after the server
    /// confirms.
    pub fn delete_pc(&self) -> Mutation<PcId, PcDeleted> {
        let session = Arc::clone(&self.inner);
        Mutation::new(move |pc_id: PcId| {
            let inner = Arc::clone(&session);
            Box::pin(async move {
                let deleted = inner.client.delete_pc(&pc_id).await?;
                inner.cache.apply_pc_deleted(&pc_id);
                Ok(deleted)
            })
        })
    }

    pub fn create_tag(&self) -> Mutation<TagCreate, Tag> {
        let session = Arc::clone(&self.inner);
        Mutation::new(move |create: TagCreate| {
            let inner = Arc::clone(&session);
            Box::pin(async move {
                let tag = inner.client.create_tag(&create).await?;
                inner.cache.apply_tag_created();
                Ok(tag)
            })
        })
    }

    /// Delete a tag. Takes the full tag so the cache cascade can scrub
    /// both ids (records) and names (list badges).
    pub fn delete_tag(&self) -> Mutation<Tag, ()> {
        let session = Arc::clone(&self.inner);
        Mutation::new(move |tag: Tag| {
            let inner = Arc::clone(&session);
            Box::pin(async move {
                inner.client.delete_tag(tag.id).await?;
                inner.cache.apply_tag_deleted(&tag);
                Ok(())
            })
        })
    }

    pub fn add_tag(&self) -> Mutation<TagAssignment, ()> {
        let session = Arc::clone(&self.inner);
        Mutation::new(move |assign: TagAssignment| {
            let inner = Arc::clone(&session);
            Box::pin(async move {
                inner.client.add_tag_to_pc(&assign.pc_id, assign.tag_id).await?;
                inner.cache.apply_pc_tags_changed(&assign.pc_id);
                Ok(())
            })
        })
    }

    pub fn remove_tag(&self) -> Mutation<TagAssignment, ()> {
        let session = Arc::clone(&self.inner);
        Mutation::new(move |assign: TagAssignment| {
            let inner = Arc::clone(&session);
            Box::pin(async move {
                inner
                    .client
                    .remove_tag_from_pc(&assign.pc_id, assign.tag_id)
                    .await?;
                inner.cache.apply_pc_tags_changed(&assign.pc_id);
                Ok(())
            })
        })
    }
}

// ── Fetch paths (cache-aware, de-duplicated) ─────────────────────────

impl InventoryInner {
    async fn fetch_pc_list(&self, params: PcListParams) -> Result<Arc<Vec<PcSummary>>, Error> {
        let gate = self.pc_list_flights.gate(&params);
        let _guard = gate.lock().await;

        // Another flight may have landed this key while we waited.
        if let Some(entry) = self.cache.pc_list(&params) {
            if entry.is_fresh() {
                return Ok(entry.value);
            }
        }

        debug!(?params, "fetching pc list");
        let rows = self.client.list_pcs(&params).await?;
        Ok(self.cache.set_pc_list(params, rows))
    }

    async fn fetch_pc(&self, id: PcId) -> Result<Arc<Pc>, Error> {
        let gate = self.pc_flights.gate(&id);
        let _guard = gate.lock().await;

        if let Some(entry) = self.cache.pc(&id) {
            if entry.is_fresh() {
                return Ok(entry.value);
            }
        }

        debug!(%id, "fetching pc");
        let pc = self.client.get_pc(&id).await?;
        Ok(self.cache.set_pc(pc))
    }

    async fn fetch_tags(&self) -> Result<Arc<Vec<Tag>>, Error> {
        let gate = self.tag_flights.gate(&());
        let _guard = gate.lock().await;

        if let Some(entry) = self.cache.tag_list() {
            if entry.is_fresh() {
                return Ok(entry.value);
            }
        }

        debug!("fetching tags");
        let tags = self.client.list_tags().await?;
        Ok(self.cache.set_tag_list(tags))
    }

    async fn fetch_pc_tags(&self, id: PcId) -> Result<Arc<Vec<Tag>>, Error> {
        let gate = self.pc_tag_flights.gate(&id);
        let _guard = gate.lock().await;

        if let Some(entry) = self.cache.pc_tag_list(&id) {
            if entry.is_fresh() {
                return Ok(entry.value);
            }
        }

        debug!(%id, "fetching pc tags");
        let tags = self.client.list_pc_tags(&id).await?;
        Ok(self.cache.set_pc_tag_list(id, tags))
    }
}
