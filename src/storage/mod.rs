//! Session-scoped storage
//!
//! Nothing is persisted: the history cache lives as long as the session
//! that owns it.

pub mod cache;


pub use cache::{CacheStatus, FetchOutcome, HistoryCache, HistorySnapshot, HISTORY_KEY};
