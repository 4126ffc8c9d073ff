//! Error types for the sentiment client

use thiserror::Error;

/// Message shown when the API fails without explaining why
pub const FALLBACK_MESSAGE: &str = "Không thể phân loại ngay lúc này.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Câu quá ngắn! (>= {min} ký tự)")]
    TooShort { min: usize },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A submission is already in progress")]
    Busy,
}

impl ClientError {
    /// The single string the user gets to see for this failure.
    ///
    /// Server-supplied detail wins; transport and decode failures collapse
    /// into the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::TooShort { .. } | ClientError::Busy => self.to_string(),
            ClientError::Rejected { detail: Some(d), .. }
            | ClientError::Server { detail: Some(d), .. } => d.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// True when the failure came back from the server with a status code
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } | ClientError::Server { status, .. } => {
                Some(*status)
            }
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
