//! Compatibility check between two snapshots.
//!
//! Both conditions are advisory. They are returned as values and the caller
//! decides whether to go on with the comparison.

use serde::Serialize;

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    Compatible,
    /// The snapshots do not come from the same playlist.
    PlaylistMismatch,
    /// The "older" snapshot was captured at or after the "newer" one.
    ChronologyReversed,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        matches!(self, Compatibility::Compatible)
    }
}

pub fn playlist_mismatch(older: &Snapshot, newer: &Snapshot) -> bool {
    older.playlist_id != newer.playlist_id
}

pub fn chronology_reversed(older: &Snapshot, newer: &Snapshot) -> bool {
    older.captured_at.as_secs() >= newer.captured_at.as_secs()
}

/// Classify a snapshot pair. A playlist mismatch wins over reversed dates
/// when both hold.
pub fn compatible(older: &Snapshot, newer: &Snapshot) -> Compatibility {
    if playlist_mismatch(older, newer) {
        Compatibility::PlaylistMismatch
    } else if chronology_reversed(older, newer) {
        Compatibility::ChronologyReversed
    } else {
        Compatibility::Compatible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Timestamp;

    fn snapshot(id: &str, captured_at: i64) -> Snapshot {
        Snapshot::new(id, Timestamp::new(captured_at), Vec::new())
    }

    #[test]
    fn same_playlist_in_order_is_compatible() {
        let result = compatible(&snapshot("A", 1000), &snapshot("A", 2000));
        assert_eq!(result, Compatibility::Compatible);
        assert!(result.is_compatible());
    }

    #[test]
    fn mismatched_ids_detected() {
        assert_eq!(
            compatible(&snapshot("A", 1000), &snapshot("B", 2000)),
            Compatibility::PlaylistMismatch
        );
    }

    #[test]
    fn mismatch_takes_precedence_over_reversed_dates() {
        let older = snapshot("A", 2000);
        let newer = snapshot("B", 1000);

        assert!(chronology_reversed(&older, &newer));
        assert_eq!(compatible(&older, &newer), Compatibility::PlaylistMismatch);
    }

    #[test]
    fn reversed_dates_detected() {
        assert_eq!(
            compatible(&snapshot("A", 2000), &snapshot("A", 1000)),
            Compatibility::ChronologyReversed
        );
    }

    #[test]
    fn equal_dates_count_as_reversed() {
        assert_eq!(
            compatible(&snapshot("A", 1000), &snapshot("A", 1000)),
            Compatibility::ChronologyReversed
        );
    }

    #[test]
    fn mixed_resolutions_are_normalized() {
        // 1_700_000_000 s is earlier than 1_700_000_500_000 ms
        let older = snapshot("A", 1_700_000_000);
        let newer = snapshot("A", 1_700_000_500_000);
        assert_eq!(compatible(&older, &newer), Compatibility::Compatible);

        // same instant written at two resolutions
        let older = snapshot("A", 1_700_000_000_000);
        let newer = snapshot("A", 1_700_000_000);
        assert_eq!(compatible(&older, &newer), Compatibility::ChronologyReversed);
    }
}
