//! In-memory history cache
//!
//! Holds the single "history" entry shown to the user. Loads are
//! de-duplicated: while one fetch is outstanding every caller awaits the
//! same shared future, so the server sees at most one request at a time.

use crate::client::SentimentApi;
use crate::error::ClientError;
use crate::types::{HistoryList, SentimentResult};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cache key of the only entry this cache holds
pub const HISTORY_KEY: &str = "history";

/// Outcome shared between every caller of one fetch
pub type FetchOutcome = std::result::Result<HistoryList, Arc<ClientError>>;

type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// What presentation needs to draw the history section
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    /// First load in flight, nothing to show yet
    Loading,
    Ready,
    /// Holding an older list while a new one is fetched
    Refreshing,
    /// Last fetch failed; carries the error text
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub status: CacheStatus,
    pub list: Option<HistoryList>,
}

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct CacheEntry {
    value: Option<HistoryList>,
    stale: bool,
    error: Option<String>,
    in_flight: Option<InFlight>,
    next_fetch_id: u64,
}

/// History cache backed by one stored list and an in-flight marker
#[derive(Clone)]
pub struct HistoryCache {
    api: Arc<dyn SentimentApi>,
    entry: Arc<Mutex<CacheEntry>>,
    limit: usize,
}

impl HistoryCache {
    /// `limit` is both the fetch size and the list capacity
    pub fn new(api: Arc<dyn SentimentApi>, limit: usize) -> Self {
        Self {
            api,
            entry: Arc::new(Mutex::new(CacheEntry::default())),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current list, `None` until the first successful load or prepend
    pub fn read(&self) -> Option<HistoryList> {
        self.entry.lock().value.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.entry.lock().in_flight.is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.entry.lock().stale
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let entry = self.entry.lock();
        let status = match (&entry.value, entry.in_flight.is_some(), &entry.error) {
            (None, true, _) => CacheStatus::Loading,
            (Some(_), true, _) => CacheStatus::Refreshing,
            (_, false, Some(msg)) => CacheStatus::Failed(msg.clone()),
            (None, false, None) => CacheStatus::Loading,
            (Some(_), false, None) => CacheStatus::Ready,
        };
        HistorySnapshot {
            status,
            list: entry.value.clone(),
        }
    }

    /// Load on demand.
    ///
    /// Returns the held list when it is fresh; otherwise joins the
    /// outstanding fetch or starts one.
    pub async fn load(&self) -> FetchOutcome {
        let (id, fetch) = {
            let mut entry = self.entry.lock();
            if let (Some(list), false) = (&entry.value, entry.stale) {
                return Ok(list.clone());
            }
            self.join_or_start(&mut entry)
        };

        let outcome = fetch.await;
        self.settle(id, &outcome);
        outcome
    }

    /// Mark the list stale and fetch a replacement.
    ///
    /// The old list stays readable until the new one lands.
    pub async fn invalidate(&self) -> FetchOutcome {
        self.entry.lock().stale = true;
        tracing::debug!(key = HISTORY_KEY, "History invalidated");
        self.load().await
    }

    /// Put a freshly classified result at the front without re-fetching
    pub fn prepend(&self, result: SentimentResult) {
        let mut entry = self.entry.lock();
        let limit = self.limit;
        if entry.value.is_none() {
            // Not loaded yet: the server list still has to be fetched
            entry.stale = true;
        }
        // A written row means the list is good again, whatever the last fetch did
        entry.error = None;
        entry
            .value
            .get_or_insert_with(|| HistoryList::new(limit))
            .prepend(result);
    }

    fn join_or_start(&self, entry: &mut CacheEntry) -> (u64, SharedFetch) {
        if let Some(in_flight) = &entry.in_flight {
            tracing::debug!(key = HISTORY_KEY, id = in_flight.id, "Joining in-flight history fetch");
            return (in_flight.id, in_flight.fetch.clone());
        }

        entry.next_fetch_id += 1;
        let id = entry.next_fetch_id;
        let api = Arc::clone(&self.api);
        let limit = self.limit;

        let fetch = async move {
            api.fetch_history(limit)
                .await
                .map(|entries| HistoryList::from_entries(entries, limit))
                .map_err(Arc::new)
        }
        .boxed()
        .shared();

        tracing::debug!(key = HISTORY_KEY, id, limit, "Starting history fetch");
        entry.in_flight = Some(InFlight {
            id,
            fetch: fetch.clone(),
        });
        (id, fetch)
    }

    /// Apply a finished fetch once; later callers of the same fetch are no-ops
    fn settle(&self, id: u64, outcome: &FetchOutcome) {
        let mut entry = self.entry.lock();
        match &entry.in_flight {
            Some(in_flight) if in_flight.id == id => {}
            _ => return,
        }
        entry.in_flight = None;

        match outcome {
            Ok(list) => {
                entry.value = Some(list.clone());
                entry.stale = false;
                entry.error = None;
            }
            Err(err) => {
                tracing::warn!(key = HISTORY_KEY, error = %err, "History fetch failed");
                entry.error = Some(err.to_string());
            }
        }
    }
}
