//! Snapshot reconciliation engine.
//!
//! Compares an older and a newer snapshot of the same playlist:
//! - Collects the entries unavailable in the newer snapshot
//! - Looks each one up by id in the older snapshot
//! - Classifies it as still lost, newly lost or recovered
//!
//! Pure functions over immutable snapshots. No I/O, no prompting.

pub mod checkup;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::snapshot::{Entry, Snapshot, Timestamp};
pub use checkup::{chronology_reversed, compatible, playlist_mismatch, Compatibility};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LostEntry {
    pub id: String,
    /// Position in the newer snapshot.
    pub position: u32,
}

/// Unavailable entries of a snapshot, keyed by id.
///
/// Ids keep the slot of their first occurrence; a repeated id overwrites the
/// position with the later one and is recorded in `duplicates`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LostEntries {
    entries: Vec<LostEntry>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl LostEntries {
    fn insert(&mut self, id: &str, position: u32) {
        if let Some(&slot) = self.index.get(id) {
            self.entries[slot].position = position;
            self.duplicates.push(id.to_string());
            return;
        }

        self.index.insert(id.to_string(), self.entries.len());
        self.entries.push(LostEntry {
            id: id.to_string(),
            position,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<u32> {
        self.index.get(id).map(|&slot| self.entries[slot].position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LostEntry> {
        self.entries.iter()
    }

    /// Ids seen more than once, once per extra occurrence.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

/// Collect every unavailable entry of `snapshot` as id -> position.
pub fn collect_unavailable(snapshot: &Snapshot) -> LostEntries {
    let mut lost = LostEntries::default();

    for entry in snapshot.entries.iter().filter(|e| e.unavailable) {
        lost.insert(&entry.id, entry.position);
    }

    for id in lost.duplicates() {
        warn!(
            playlist = %snapshot.playlist_id,
            id = %id,
            "entry id appears more than once, keeping the last position"
        );
    }

    lost
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "metadata", rename_all = "snake_case")]
pub enum Status {
    /// Already unavailable in the older snapshot.
    StillLost,
    /// Absent from the older snapshot altogether.
    NewlyLost,
    /// Available in the older snapshot, which still holds its metadata.
    Recovered(Entry),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub id: String,
    pub position: u32,
    pub status: Status,
}

/// One outcome per lost id, in the order of the lost collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    outcomes: Vec<Outcome>,
}

impl Reconciliation {
    pub fn get(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter()
    }
}

/// Look every lost id up in `older` and classify it.
pub fn reconcile(older: &Snapshot, lost: &LostEntries) -> Reconciliation {
    // first occurrence wins, same as a front-to-back scan
    let mut by_id: HashMap<&str, &Entry> = HashMap::with_capacity(older.entries.len());
    for entry in &older.entries {
        by_id.entry(entry.id.as_str()).or_insert(entry);
    }

    let outcomes = lost
        .iter()
        .map(|lost_entry| {
            let status = match by_id.get(lost_entry.id.as_str()) {
                None => Status::NewlyLost,
                Some(found) if found.unavailable => Status::StillLost,
                Some(found) => Status::Recovered((*found).clone()),
            };

            Outcome {
                id: lost_entry.id.clone(),
                position: lost_entry.position,
                status,
            }
        })
        .collect();

    Reconciliation { outcomes }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveredEntry {
    pub id: String,
    /// Position in the newer snapshot.
    pub position: u32,
    /// The entry as recorded in the older snapshot.
    pub metadata: Entry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub still_lost: Vec<LostEntry>,
    pub newly_lost: Vec<LostEntry>,
    pub recovered: Vec<RecoveredEntry>,
}

impl Summary {
    /// Number of lost ids, whatever their outcome.
    pub fn total(&self) -> usize {
        self.still_lost.len() + self.newly_lost.len() + self.recovered.len()
    }

    /// Lost ids for which no metadata could be found.
    pub fn unrecovered(&self) -> usize {
        self.still_lost.len() + self.newly_lost.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Group outcomes by status.
pub fn partition(reconciliation: Reconciliation) -> Summary {
    let mut summary = Summary::default();

    for outcome in reconciliation.outcomes {
        let Outcome { id, position, status } = outcome;
        match status {
            Status::StillLost => summary.still_lost.push(LostEntry { id, position }),
            Status::NewlyLost => summary.newly_lost.push(LostEntry { id, position }),
            Status::Recovered(metadata) => summary.recovered.push(RecoveredEntry {
                id,
                position,
                metadata,
            }),
        }
    }

    summary
}

/// Identity of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub playlist_id: String,
    pub captured_at: Timestamp,
    pub entry_count: usize,
}

impl SnapshotInfo {
    fn of(snapshot: &Snapshot) -> Self {
        SnapshotInfo {
            playlist_id: snapshot.playlist_id.clone(),
            captured_at: snapshot.captured_at,
            entry_count: snapshot.entries.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub older: SnapshotInfo,
    pub newer: SnapshotInfo,
    pub compatibility: Compatibility,
    pub playlist_mismatch: bool,
    pub chronology_reversed: bool,
    /// Unavailable ids repeated within the newer snapshot.
    pub duplicates: Vec<String>,
    pub summary: Summary,
}

/// Run the whole pipeline over two snapshots. Advisory conditions are
/// reported, never acted on.
pub fn compare(older: &Snapshot, newer: &Snapshot) -> Comparison {
    let compatibility = compatible(older, newer);
    let lost = collect_unavailable(newer);
    let reconciliation = reconcile(older, &lost);
    let summary = partition(reconciliation);

    debug!(
        lost = lost.len(),
        still_lost = summary.still_lost.len(),
        newly_lost = summary.newly_lost.len(),
        recovered = summary.recovered.len(),
        ?compatibility,
        "reconciled snapshots"
    );

    Comparison {
        older: SnapshotInfo::of(older),
        newer: SnapshotInfo::of(newer),
        compatibility,
        playlist_mismatch: playlist_mismatch(older, newer),
        chronology_reversed: chronology_reversed(older, newer),
        duplicates: lost.duplicates().to_vec(),
        summary,
    }
}
