// ── In-flight request gates ──
//
// One async mutex per query key. A fetch holds the key's gate for the
// whole round trip and re-checks freshness after acquiring it, so
// concurrent subscribers to one key produce a single network call and
// late arrivals consume the result that already landed.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

pub(crate) struct FlightDeck<K>
where
    K: Eq + Hash + Clone,
{
    gates: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Clone> FlightDeck<K> {
    pub(crate) fn new() -> Self {
        Self {
            gates: DashMap::new(),
        }
    }

    /// The gate for a key, created on first use.
    pub(crate) fn gate(&self, key: &K) -> Arc<Mutex<()>> {
        self.gates
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
