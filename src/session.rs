//! Page session
//!
//! Owns the one history cache and the submission flow bound to it. Created
//! when the front-end starts and dropped when it exits; nothing is global.

use crate::client::SentimentApi;
use crate::config::Config;
use crate::error::Result;
use crate::notify::Alert;
use crate::render::Renderer;
use crate::storage::{FetchOutcome, HistoryCache};
use crate::submission::SubmissionFlow;
use crate::types::SentimentResult;
use std::sync::Arc;

pub struct Session {
    cache: HistoryCache,
    flow: SubmissionFlow,
    renderer: Renderer,
}

impl Session {
    pub fn new(api: Arc<dyn SentimentApi>, alert: Arc<dyn Alert>, config: &Config) -> Self {
        let cache = HistoryCache::new(Arc::clone(&api), config.history.limit);
        let flow = SubmissionFlow::new(
            api,
            cache.clone(),
            alert,
            config.submission.min_text_length,
        );
        let renderer = Renderer::with_offset_minutes(config.display.utc_offset_minutes);

        Self {
            cache,
            flow,
            renderer,
        }
    }

    pub fn cache(&self) -> &HistoryCache {
        &self.cache
    }

    pub fn flow(&self) -> &SubmissionFlow {
        &self.flow
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Initial history load
    pub async fn mount(&self) -> FetchOutcome {
        tracing::debug!("Mounting session");
        self.cache.load().await
    }

    /// Manual refresh; joins the running fetch if there is one
    pub async fn refresh(&self) -> FetchOutcome {
        self.cache.invalidate().await
    }

    pub async fn submit(&self, text: &str) -> Result<SentimentResult> {
        self.flow.submit_text(text).await
    }

    /// The whole page for the current state
    pub fn render(&self) -> String {
        self.renderer
            .page(&self.flow.pending(), &self.cache.snapshot())
    }

    pub fn render_form(&self) -> String {
        self.renderer.form(&self.flow.pending())
    }

    pub fn render_history(&self) -> String {
        self.renderer.history(&self.cache.snapshot())
    }
}
