// ── Query binding ──
//
// A handle tying one cache key to its fetch operation. Resolution reads
// through the cache (fresh hit short-circuits, stale data stays visible
// while the fetch runs) and failures surface as observable state rather
// than tearing the handle down.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use pcdex_api::Error;

use crate::store::CachedEntry;

use super::stream::QueryStateStream;

/// Observable state of one query.
#[derive(Debug)]
pub struct QueryState<T> {
    /// Most recent resolved value. Survives staleness and failed
    /// refetches until replaced.
    pub data: Option<Arc<T>>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<Arc<Error>>,
}

impl<T> QueryState<T> {
    fn initial() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_error: self.is_error,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::initial()
    }
}

type Probe<T> = Box<dyn Fn() -> Option<CachedEntry<T>> + Send + Sync>;
type Fetch<T> = Box<dyn Fn() -> BoxFuture<'static, Result<Arc<T>, Error>> + Send + Sync>;
type Invalidate = Box<dyn Fn() + Send + Sync>;

/// A view's subscription to one cached query.
///
/// Cheaply cloneable; clones share state. Dropping every clone does not
/// cancel an in-flight fetch -- the result still lands in the shared
/// cache for whoever asks next.
pub struct Query<T> {
    inner: Arc<QueryInner<T>>,
}

struct QueryInner<T> {
    state: watch::Sender<QueryState<T>>,
    probe: Probe<T>,
    fetch: Fetch<T>,
    invalidate: Invalidate,
    revision: watch::Receiver<u64>,
    cancel: CancellationToken,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> Query<T> {
    pub(crate) fn new(
        probe: impl Fn() -> Option<CachedEntry<T>> + Send + Sync + 'static,
        fetch: impl Fn() -> BoxFuture<'static, Result<Arc<T>, Error>> + Send + Sync + 'static,
        invalidate: impl Fn() + Send + Sync + 'static,
        revision: watch::Receiver<u64>,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(QueryState::initial());
        Self {
            inner: Arc::new(QueryInner {
                state,
                probe: Box::new(probe),
                fetch: Box::new(fetch),
                invalidate: Box::new(invalidate),
                revision,
                cancel,
            }),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> QueryState<T> {
        self.inner.state.borrow().clone()
    }

    /// Most recent resolved value, if any.
    pub fn data(&self) -> Option<Arc<T>> {
        self.inner.state.borrow().data.clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.inner.state.subscribe()
    }

    /// Convert into a `Stream` of state snapshots.
    pub fn into_stream(self) -> QueryStateStream<T> {
        QueryStateStream::new(self.inner.state.subscribe())
    }

    /// Ensure the bound key is resolved: a fresh cache hit returns
    /// immediately; absent or stale triggers a (de-duplicated) fetch.
    /// Stale data stays visible while the fetch is in flight, and a
    /// failed fetch keeps the prior data alongside the error.
    pub async fn resolve(&self) -> QueryState<T> {
        match (self.inner.probe)() {
            Some(entry) if entry.is_fresh() => {
                self.inner.state.send_modify(|s| {
                    s.data = Some(Arc::clone(&entry.value));
                    s.is_loading = false;
                    s.is_error = false;
                    s.error = None;
                });
                return self.state();
            }
            Some(entry) => {
                self.inner.state.send_modify(|s| {
                    s.data = Some(Arc::clone(&entry.value));
                    s.is_loading = true;
                });
            }
            None => {
                self.inner.state.send_modify(|s| s.is_loading = true);
            }
        }

        match (self.inner.fetch)().await {
            Ok(value) => self.inner.state.send_modify(|s| {
                s.data = Some(value);
                s.is_loading = false;
                s.is_error = false;
                s.error = None;
            }),
            Err(err) => self.inner.state.send_modify(|s| {
                s.is_loading = false;
                s.is_error = true;
                s.error = Some(Arc::new(err));
            }),
        }

        self.state()
    }

    /// Mark the bound key stale and resolve again.
    pub async fn refetch(&self) -> QueryState<T> {
        (self.inner.invalidate)();
        self.resolve().await
    }

    /// Spawn a background task that re-resolves whenever a cache
    /// revision leaves the bound key stale. Runs until the session is
    /// shut down or the returned handle is aborted.
    pub fn spawn_refetch(&self) -> JoinHandle<()> {
        let query = self.clone();
        let mut revision = self.inner.revision.clone();
        let cancel = self.inner.cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = revision.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let went_stale =
                            matches!((query.inner.probe)(), Some(entry) if !entry.is_fresh());
                        if went_stale {
                            query.resolve().await;
                        }
                    }
                }
            }
        })
    }
}
