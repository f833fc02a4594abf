//! Playlist snapshot model.
//!
//! A snapshot is one archived state of a playlist: its id, the instant it
//! was captured and its entries in display order. Snapshots are built once
//! (from an archive file or a fresh fetch) and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Channel placeholder recorded for unavailable entries.
pub const UNKNOWN_CHANNEL: &str = "Unknown channel";

/// Channel url placeholder recorded for unavailable entries.
pub const UNKNOWN_LINK: &str = "Unknown link";

// values with this many digits or more are millisecond timestamps
const MILLIS_MIN_DIGITS: u32 = 13;

/// Unix epoch capture time, in seconds or milliseconds.
///
/// Archives written by different tools disagree on resolution, so the raw
/// value is kept as read and normalised on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(raw: i64) -> Self {
        Timestamp(raw)
    }

    /// Current time at millisecond resolution, the way fresh dumps are stamped.
    pub fn now() -> Self {
        Timestamp(chrono::Utc::now().timestamp_millis())
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn is_millis(self) -> bool {
        digit_count(self.0) >= MILLIS_MIN_DIGITS
    }

    /// Whole seconds since the epoch.
    pub fn as_secs(self) -> i64 {
        if self.is_millis() {
            self.0.div_euclid(1000)
        } else {
            self.0
        }
    }
}

fn digit_count(value: i64) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// 1-based position in the playlist at capture time.
    pub position: u32,
    pub id: String,
    pub unavailable: bool,
    pub channel: String,
    pub channel_url: String,
    pub title: String,
}

impl Entry {
    pub fn available(position: u32, id: &str, channel: &str, channel_url: &str, title: &str) -> Self {
        Entry {
            position,
            id: id.to_string(),
            unavailable: false,
            channel: channel.to_string(),
            channel_url: channel_url.to_string(),
            title: title.to_string(),
        }
    }

    /// An entry the source could no longer play. Only the title survives,
    /// usually as a placeholder like "[Deleted video]".
    pub fn unavailable(position: u32, id: &str, title: &str) -> Self {
        Entry {
            position,
            id: id.to_string(),
            unavailable: true,
            channel: UNKNOWN_CHANNEL.to_string(),
            channel_url: UNKNOWN_LINK.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub playlist_id: String,
    pub captured_at: Timestamp,
    pub entries: Vec<Entry>,
}

impl Snapshot {
    pub fn new(playlist_id: impl Into<String>, captured_at: Timestamp, entries: Vec<Entry>) -> Self {
        Snapshot {
            playlist_id: playlist_id.into(),
            captured_at,
            entries,
        }
    }

    pub fn unavailable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.unavailable).count()
    }
}
