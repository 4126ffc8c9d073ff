//! Blocking notifications
//!
//! The submission flow raises an alert for every failed attempt, on top of
//! the inline error the page keeps showing.

#[cfg(test)]
mod tests;

use std::io::Write;

/// Something that can interrupt the user with a message
#[cfg_attr(test, mockall::automock)]
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

/// Terminal alert written to stderr
#[derive(Debug, Clone)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a disabled notifier (JSON output must stay machine-readable)
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Alert for Notifier {
    fn alert(&self, message: &str) {
        if !self.enabled {
            return;
        }

        let mut stderr = std::io::stderr().lock();
        if let Err(e) = writeln!(stderr, "{}", frame(message)) {
            tracing::error!("Failed to write alert: {}", e);
        }
    }
}

/// Draw a message inside a box, one line per input line
pub fn frame(message: &str) -> String {
    let lines: Vec<&str> = message.lines().collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let bar = "═".repeat(width + 4);

    let mut out = format!("╔{}╗\n", bar);
    for line in &lines {
        let pad = width - line.chars().count();
        out.push_str(&format!("║  {}{}  ║\n", line, " ".repeat(pad)));
    }
    out.push_str(&format!("╚{}╝", bar));
    out
}
