// ── Query state streams ──
//
// `Stream` adapter over a query's state watch, for consumers that want
// combinator-style reactivity instead of polling `state()`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::query::QueryState;

/// `Stream` adapter backed by a query's `watch::Receiver`.
///
/// Yields a new [`QueryState`] snapshot each time the query's state
/// changes (resolution started, data landed, error surfaced).
pub struct QueryStateStream<T: Send + Sync + 'static> {
    inner: WatchStream<QueryState<T>>,
}

impl<T: Send + Sync + 'static> QueryStateStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<QueryState<T>>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
        }
    }
}

impl<T: Send + Sync + 'static> Stream for QueryStateStream<T> {
    type Item = QueryState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin; QueryState is always Unpin.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
