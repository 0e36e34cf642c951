//! Output helpers shared by the CLI commands

use chrono::{DateTime, Local, Utc};

use mneme::models::WordRecord;

/// Timestamp in the local timezone, minute precision
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// When the record comes up for review, as shown to the user
pub fn format_due(record: &WordRecord, now: DateTime<Utc>) -> String {
    if record.is_due(now) {
        "now".to_string()
    } else {
        format_timestamp(record.due_at)
    }
}

/// Cap `text` at `max` characters for one-line table cells
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
