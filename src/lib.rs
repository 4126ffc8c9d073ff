//! Vietnamese Sentiment Assistant
//!
//! Client for a sentiment classification API: submit a sentence, keep a
//! bounded recent-history list in sync, and render both to the terminal.

pub mod client;
pub mod storage;
pub mod submission;
pub mod render;
pub mod notify;
pub mod session;
pub mod config;
pub mod types;
pub mod error;
