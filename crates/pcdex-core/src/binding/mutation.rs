// ── Mutation binding ──
//
// A trigger handle for one write operation. The executor (built by the
// session) performs the network call and applies the cache effects, so
// by the time `on_success` runs the cache already shows post-mutation
// state. Failures leave the cache untouched.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::watch;

use pcdex_api::{Error, PcId, TagId};

/// A tag attach/detach request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAssignment {
    pub pc_id: PcId,
    pub tag_id: TagId,
}

/// Lifecycle callbacks for one trigger.
///
/// Ordering is fixed: cache effects, then `on_success` or `on_error`,
/// then `on_settled`.
pub struct MutationCallbacks<R> {
    on_success: Option<Box<dyn FnOnce(&R) + Send>>,
    on_error: Option<Box<dyn FnOnce(&Error) + Send>>,
    on_settled: Option<Box<dyn FnOnce() + Send>>,
}

impl<R> MutationCallbacks<R> {
    pub fn new() -> Self {
        Self {
            on_success: None,
            on_error: None,
            on_settled: None,
        }
    }

    pub fn on_success(mut self, f: impl FnOnce(&R) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(&Error) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_settled(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_settled = Some(Box::new(f));
        self
    }
}

impl<R> Default for MutationCallbacks<R> {
    fn default() -> Self {
        Self::new()
    }
}

type Executor<A, R> = dyn Fn(A) -> BoxFuture<'static, Result<R, Error>> + Send + Sync;

/// A trigger handle for one write operation.
///
/// Cheaply cloneable; clones share the pending counter.
pub struct Mutation<A, R> {
    pending: Arc<watch::Sender<usize>>,
    execute: Arc<Executor<A, R>>,
}

impl<A, R> Clone for Mutation<A, R> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
            execute: Arc::clone(&self.execute),
        }
    }
}

impl<A, R> Mutation<A, R> {
    pub(crate) fn new(
        execute: impl Fn(A) -> BoxFuture<'static, Result<R, Error>> + Send + Sync + 'static,
    ) -> Self {
        let (pending, _) = watch::channel(0usize);
        Self {
            pending: Arc::new(pending),
            execute: Arc::new(execute),
        }
    }

    /// Whether any trigger is currently in flight.
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow() > 0
    }

    /// Subscribe to the in-flight trigger count.
    pub fn pending_changes(&self) -> watch::Receiver<usize> {
        self.pending.subscribe()
    }

    /// Run the mutation. Cache effects are applied before this returns.
    pub async fn trigger(&self, args: A) -> Result<R, Error> {
        self.trigger_with(args, MutationCallbacks::default()).await
    }

    /// Run the mutation with lifecycle callbacks.
    pub async fn trigger_with(
        &self,
        args: A,
        callbacks: MutationCallbacks<R>,
    ) -> Result<R, Error> {
        self.pending.send_modify(|n| *n += 1);
        let result = (self.execute)(args).await;
        self.pending.send_modify(|n| *n = n.saturating_sub(1));

        match &result {
            Ok(value) => {
                if let Some(f) = callbacks.on_success {
                    f(value);
                }
            }
            Err(err) => {
                if let Some(f) = callbacks.on_error {
                    f(err);
                }
            }
        }
        if let Some(f) = callbacks.on_settled {
            f();
        }

        result
    }
}
