//! reqwest-backed implementation of [`SentimentApi`]

use super::SentimentApi;
use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::types::{HealthStatus, SentimentResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for the sentiment server
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// Error body; FastAPI sends either a string or a list of validation items
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Items(Vec<DetailItem>),
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    msg: Option<String>,
}

impl ApiClient {
    /// Create a new client against `base_url` (the server root, without `/api`)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::Config("base_url is empty".to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Turn a response into a typed body or a classified error
    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let detail = extract_detail(&body);
        tracing::warn!(status = status.as_u16(), detail = ?detail, "Sentiment API returned an error");

        if status.is_client_error() {
            Err(ClientError::Rejected {
                status: status.as_u16(),
                detail,
            })
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

/// Pull a human-readable message out of an error body, if there is one
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Detail::Message(msg) if !msg.trim().is_empty() => Some(msg),
        Detail::Message(_) => None,
        Detail::Items(items) => {
            let msgs: Vec<String> = items.into_iter().filter_map(|i| i.msg).collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
    }
}

#[async_trait]
impl SentimentApi for ApiClient {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let url = self.url("sentiment");
        tracing::debug!(%url, chars = text.chars().count(), "Classifying sentence");

        let resp = self
            .http
            .post(&url)
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        Self::decode(resp).await
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<SentimentResult>> {
        let url = self.url("history");
        tracing::debug!(%url, limit, "Fetching history");

        let resp = self
            .http
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        Self::decode(resp).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let resp = self.http.get(self.url("health")).send().await?;
        Self::decode(resp).await
    }
}
