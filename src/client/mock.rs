//! In-memory sentiment server
//!
//! Backs unit tests without network calls and the `--demo` CLI mode.
//! Classifications are stored server-side so `fetch_history` sees them,
//! like the real API.

use super::SentimentApi;
use crate::error::{ClientError, Result};
use crate::types::{HealthStatus, Sentiment, SentimentResult};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Server-side state of the mock
#[derive(Debug, Default)]
pub struct MockState {
    /// Newest first
    pub store: Vec<SentimentResult>,
    /// Errors to return from the next `classify` calls, in order
    pub classify_failures: VecDeque<ClientError>,
    /// Errors to return from the next `fetch_history` calls, in order
    pub history_failures: VecDeque<ClientError>,
    next_id: i64,
}

/// Mock API with call counters and optional latency
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
    classify_calls: Arc<AtomicUsize>,
    history_calls: Arc<AtomicUsize>,
    latency_ms: u64,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server store; `entries` are newest first
    pub fn with_history(self, entries: Vec<SentimentResult>) -> Self {
        self.state.lock().store = entries;
        self
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }

    pub fn fail_next_classify(&self, err: ClientError) {
        self.state.lock().classify_failures.push_back(err);
    }

    pub fn fail_next_history(&self, err: ClientError) {
        self.state.lock().history_failures.push_back(err);
    }

    /// Replace the server store, as if other clients had written to it
    pub fn set_history(&self, entries: Vec<SentimentResult>) {
        self.state.lock().store = entries;
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

/// Crude keyword rule so the demo gives varied labels
fn guess_sentiment(text: &str) -> (Sentiment, f64) {
    const POSITIVE: &[&str] = &["vui", "tốt", "thích", "hay", "tuyệt", "yêu"];
    const NEGATIVE: &[&str] = &["buồn", "tệ", "chán", "ghét", "dở", "không thích"];

    let lower = text.to_lowercase();
    let pos = POSITIVE.iter().filter(|w| lower.contains(*w)).count();
    let neg = NEGATIVE.iter().filter(|w| lower.contains(*w)).count();

    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => (Sentiment::Positive, 0.9),
        std::cmp::Ordering::Less => (Sentiment::Negative, 0.9),
        std::cmp::Ordering::Equal => (Sentiment::Neutral, 0.6),
    }
}

#[async_trait]
impl SentimentApi for MockApi {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let mut state = self.state.lock();
        if let Some(err) = state.classify_failures.pop_front() {
            return Err(err);
        }

        state.next_id += 1;
        let (sentiment, confidence) = guess_sentiment(text);
        let result = SentimentResult {
            text: text.to_string(),
            sentiment,
            confidence,
            created_at: Utc::now().to_rfc3339(),
            id: Some(state.next_id),
        };
        state.store.insert(0, result.clone());

        // Submission responses carry no id
        Ok(SentimentResult { id: None, ..result })
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<SentimentResult>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let mut state = self.state.lock();
        if let Some(err) = state.history_failures.pop_front() {
            return Err(err);
        }
        Ok(state.store.iter().take(limit).cloned().collect())
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
