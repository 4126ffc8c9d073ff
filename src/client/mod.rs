//! Sentiment API client
//!
//! This module provides the typed transport to the classification server:
//! - `POST /api/sentiment`: classify one sentence
//! - `GET /api/history`: most recent results, newest first
//! - `GET /api/health`: liveness probe

mod http;
pub mod mock;
#[cfg(test)]
mod tests;

pub use http::ApiClient;
pub use mock::MockApi;

use crate::error::Result;
use crate::types::{HealthStatus, SentimentResult};
use async_trait::async_trait;

/// Operations the cache and submission flow need from the server.
///
/// No retries and no caching happen behind this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentApi: Send + Sync {
    /// Classify an already-trimmed sentence
    async fn classify(&self, text: &str) -> Result<SentimentResult>;

    /// Up to `limit` most recent results from the server's store
    async fn fetch_history(&self, limit: usize) -> Result<Vec<SentimentResult>>;

    async fn health(&self) -> Result<HealthStatus>;
}
