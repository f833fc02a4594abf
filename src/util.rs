use std::time::Duration;

use crate::snapshot::Timestamp;

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;

/// Local date and time of a capture, `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: Timestamp) -> String {
    chrono::DateTime::from_timestamp(ts.as_secs(), 0)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Time between two captures, negative gaps counted as zero.
pub fn gap_between(older: Timestamp, newer: Timestamp) -> Duration {
    let secs = newer.as_secs().saturating_sub(older.as_secs()).max(0);
    Duration::from_secs(secs.unsigned_abs())
}

/// Human readable duration rounded to days, or hours below a day.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let rounded = if secs >= SECS_PER_DAY {
        secs - secs % SECS_PER_DAY
    } else if secs >= SECS_PER_HOUR {
        secs - secs % SECS_PER_HOUR
    } else {
        secs
    };

    humantime::format_duration(Duration::from_secs(rounded)).to_string()
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
