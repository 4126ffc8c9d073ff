//! Submission flow
//!
//! `Idle → Validating → Submitting → (Success | Failed) → Idle`
//!
//! Success and Failed hold until the next edit, which goes back to Idle.
//!
//! Validation happens before any network call. While a request is in
//! flight the form is locked: text edits are refused and a second submit
//! returns [`ClientError::Busy`] without reaching the API.


use crate::client::SentimentApi;
use crate::error::{ClientError, Result};
use crate::notify::Alert;
use crate::storage::HistoryCache;
use crate::types::SentimentResult;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

/// Form state the page is bound to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingSubmission {
    pub text: String,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

struct FlowInner {
    pending: PendingSubmission,
    state: SubmissionState,
}

pub struct SubmissionFlow {
    api: Arc<dyn SentimentApi>,
    cache: HistoryCache,
    alert: Arc<dyn Alert>,
    min_text_length: usize,
    inner: Mutex<FlowInner>,
}

impl SubmissionFlow {
    pub fn new(
        api: Arc<dyn SentimentApi>,
        cache: HistoryCache,
        alert: Arc<dyn Alert>,
        min_text_length: usize,
    ) -> Self {
        Self {
            api,
            cache,
            alert,
            min_text_length,
            inner: Mutex::new(FlowInner {
                pending: PendingSubmission::default(),
                state: SubmissionState::Idle,
            }),
        }
    }

    pub fn min_text_length(&self) -> usize {
        self.min_text_length
    }

    pub fn pending(&self) -> PendingSubmission {
        self.inner.lock().pending.clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.lock().state
    }

    /// The submit control is enabled only outside of a request
    pub fn can_submit(&self) -> bool {
        !self.inner.lock().pending.in_flight
    }

    /// Update the bound input; refused while a request is in flight
    pub fn set_text(&self, text: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.pending.in_flight {
            return false;
        }
        inner.pending.text = text.to_string();
        inner.state = SubmissionState::Idle;
        true
    }

    /// Replace the input and submit it
    pub async fn submit_text(&self, text: &str) -> Result<SentimentResult> {
        if !self.set_text(text) {
            return Err(ClientError::Busy);
        }
        self.submit().await
    }

    /// Validate and classify the current input
    pub async fn submit(&self) -> Result<SentimentResult> {
        let trimmed = {
            let mut inner = self.inner.lock();
            if inner.pending.in_flight {
                tracing::debug!("Submit ignored, request already in flight");
                return Err(ClientError::Busy);
            }

            inner.state = SubmissionState::Validating;
            let trimmed = inner.pending.text.trim().to_string();
            if trimmed.chars().count() < self.min_text_length {
                drop(inner);
                return Err(self.fail(ClientError::TooShort {
                    min: self.min_text_length,
                }));
            }

            inner.state = SubmissionState::Submitting;
            inner.pending.in_flight = true;
            trimmed
        };

        tracing::debug!(chars = trimmed.chars().count(), "Submitting sentence");
        let outcome = self.api.classify(&trimmed).await;

        match outcome {
            Ok(result) => {
                self.cache.prepend(result.clone());
                let mut inner = self.inner.lock();
                inner.state = SubmissionState::Success;
                inner.pending = PendingSubmission::default();
                tracing::info!(
                    sentiment = result.sentiment.as_str(),
                    confidence = result.confidence,
                    "Sentence classified"
                );
                Ok(result)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Record a failed attempt: alert, keep the input, set the inline error
    fn fail(&self, err: ClientError) -> ClientError {
        let message = err.user_message();
        tracing::warn!(error = %err, "Submission failed");

        {
            let mut inner = self.inner.lock();
            inner.state = SubmissionState::Failed;
            inner.pending.in_flight = false;
            inner.pending.last_error = Some(message.clone());
        }
        self.alert.alert(&message);
        err
    }
}
