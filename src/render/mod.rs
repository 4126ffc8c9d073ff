//! Terminal rendering
//!
//! Everything here is a pure function of the form and cache state and
//! returns a `String`; the binary decides where it goes.


use crate::storage::{CacheStatus, HistorySnapshot};
use crate::submission::PendingSubmission;
use crate::types::{parse_timestamp, Sentiment, SentimentResult};
use chrono::{FixedOffset, Offset, Utc};

pub const TITLE: &str = "Trợ lý phân loại cảm xúc tiếng Việt";
pub const SUBTITLE: &str = "Dựa trên mô hình Transformer (distilbert-base-multilingual-cased).";
pub const INPUT_PLACEHOLDER: &str = "Nhập câu tiếng Việt (ví dụ: \"Hôm nay tôi rất vui\")";
pub const SUBMIT_LABEL: &str = "Phân loại cảm xúc";
pub const SUBMITTING_LABEL: &str = "Đang phân loại...";
pub const HISTORY_TITLE: &str = "Lịch sử phân loại";
pub const REFRESH_LABEL: &str = "Làm mới";
pub const LOADING_TEXT: &str = "Đang tải...";
pub const HISTORY_ERROR_TEXT: &str = "Không thể tải lịch sử.";
pub const EMPTY_HISTORY_TEXT: &str = "Chưa có lịch sử phân loại.";

const HEADERS: [&str; 4] = ["Câu", "Nhãn", "Độ tin cậy", "Thời gian"];
const MAX_TEXT_WIDTH: usize = 48;

/// Localized label for a sentiment
pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Tích cực",
        Sentiment::Neutral => "Trung tính",
        Sentiment::Negative => "Tiêu cực",
    }
}

/// `0.97` -> `97.0%`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// vi-VN style `HH:MM:SS D/M/YYYY`; unparseable input is returned as is
pub fn format_timestamp(raw: &str, offset: FixedOffset) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts
            .with_timezone(&offset)
            .format("%H:%M:%S %-d/%-m/%Y")
            .to_string(),
        None => raw.to_string(),
    }
}

/// One display row of the history table
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub text: String,
    pub label: &'static str,
    pub confidence: String,
    pub time: String,
}

impl HistoryRow {
    pub fn from_result(result: &SentimentResult, offset: FixedOffset) -> Self {
        Self {
            text: result.text.clone(),
            label: sentiment_label(result.sentiment),
            confidence: format_confidence(result.confidence),
            time: format_timestamp(&result.created_at, offset),
        }
    }

    fn cells(&self) -> [String; 4] {
        [
            truncate(&self.text, MAX_TEXT_WIDTH),
            self.label.to_string(),
            self.confidence.clone(),
            self.time.clone(),
        ]
    }
}

/// Renders pages in a fixed timezone
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    offset: FixedOffset,
}

impl Renderer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build from an offset in minutes east of UTC; falls back to UTC
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60).unwrap_or_else(utc);
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn rows(&self, entries: &[SentimentResult]) -> Vec<HistoryRow> {
        entries
            .iter()
            .map(|r| HistoryRow::from_result(r, self.offset))
            .collect()
    }

    /// History table, or the placeholder when there is nothing to show
    pub fn table(&self, entries: &[SentimentResult]) -> String {
        if entries.is_empty() {
            return EMPTY_HISTORY_TEXT.to_string();
        }

        let rows: Vec<[String; 4]> = self.rows(entries).iter().map(HistoryRow::cells).collect();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for cells in &rows {
            for (w, cell) in widths.iter_mut().zip(cells.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let header = HEADERS.map(String::from);
        let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();

        let mut out = format_line(&header, &widths);
        out.push('\n');
        out.push_str(&separator.join("─┼─"));
        for cells in &rows {
            out.push('\n');
            out.push_str(&format_line(cells, &widths));
        }
        out
    }

    /// The input form with its button and the inline error
    pub fn form(&self, pending: &PendingSubmission) -> String {
        let mut out = String::new();
        if pending.text.is_empty() {
            out.push_str(&format!("> {}\n", INPUT_PLACEHOLDER));
        } else {
            out.push_str(&format!("> {}\n", pending.text));
        }

        if pending.in_flight {
            out.push_str(&format!("[ {} ] (đã khóa)", SUBMITTING_LABEL));
        } else {
            out.push_str(&format!("[ {} ]", SUBMIT_LABEL));
        }

        if let Some(err) = &pending.last_error {
            out.push_str(&format!("\n! {}", err));
        }
        out
    }

    /// History header, refresh control and table or state message
    pub fn history(&self, snapshot: &HistorySnapshot) -> String {
        let refreshing = matches!(snapshot.status, CacheStatus::Loading | CacheStatus::Refreshing);
        let control = if refreshing {
            format!("[ {} ] (đã khóa)", REFRESH_LABEL)
        } else {
            format!("[ {} ]", REFRESH_LABEL)
        };

        let body = match (&snapshot.status, &snapshot.list) {
            (CacheStatus::Failed(_), _) => format!("! {}", HISTORY_ERROR_TEXT),
            (_, Some(list)) => self.table(list.entries()),
            (_, None) => LOADING_TEXT.to_string(),
        };

        format!("{}  {}\n{}", HISTORY_TITLE, control, body)
    }

    /// Whole page: header, form, history
    pub fn page(&self, pending: &PendingSubmission, snapshot: &HistorySnapshot) -> String {
        format!(
            "{}\n{}\n\n{}\n\n{}",
            TITLE,
            SUBTITLE,
            self.form(pending),
            self.history(snapshot)
        )
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(utc())
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| pad(cell, *w))
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars - 1).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}
