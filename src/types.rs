//! Core types shared by the client, cache and renderers

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment label produced by the remote classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Wire form, e.g. `POSITIVE`
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

/// One classification, as returned by either endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub text: String,
    pub sentiment: Sentiment,
    /// Score in [0, 1] for the chosen label
    pub confidence: f64,
    /// ISO-8601, kept verbatim from the server
    pub created_at: String,
    /// Row id; only the history endpoint sends it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl SentimentResult {
    /// Parse `created_at`.
    ///
    /// Accepts RFC 3339 and the naive form the server stores (read as UTC).
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Default number of entries kept in the history list
pub const HISTORY_CAPACITY: usize = 20;

/// Most-recent-first list of results, never longer than its capacity
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryList {
    entries: Vec<SentimentResult>,
    capacity: usize,
}

impl HistoryList {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build from a server response, dropping anything past capacity
    pub fn from_entries(mut entries: Vec<SentimentResult>, capacity: usize) -> Self {
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Insert at the front; the oldest entries fall off the end
    pub fn prepend(&mut self, result: SentimentResult) {
        self.entries.insert(0, result);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[SentimentResult] {
        &self.entries
    }

    pub fn first(&self) -> Option<&SentimentResult> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SentimentResult> {
        self.entries.iter()
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a HistoryList {
    type Item = &'a SentimentResult;
    type IntoIter = std::slice::Iter<'a, SentimentResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
