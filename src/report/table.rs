//! Terminal rendering for comparisons.
//!
//! Formats output as plain text tables:
//! - Checkup header with both capture dates
//! - Lost videos with their category (AL already lost, NL newly lost)
//! - Recovered videos with the metadata found in the older archive
//! - Rows sorted by position in the newer snapshot

use std::time::Duration;

use crate::archive::ArchiveSummary;
use crate::reconcile::{Comparison, LostEntry, Summary};
use crate::util::{format_duration, format_timestamp, gap_between, truncate};

const ID_WIDTH: usize = 11;
const INDEX_WIDTH: usize = 5;
const TITLE_WIDTH: usize = 40;
const CHANNEL_WIDTH: usize = 24;
const URL_WIDTH: usize = 56;

pub fn render_checkup(comparison: &Comparison) -> String {
    format!(
        "\nCheckup:\n  Checking playlist {} archived on {},\n  against playlist {} archived on {}.\n",
        comparison.newer.playlist_id,
        format_timestamp(comparison.newer.captured_at),
        comparison.older.playlist_id,
        format_timestamp(comparison.older.captured_at),
    )
}

pub fn render(comparison: &Comparison, archive_interval: Option<Duration>) -> String {
    let summary = &comparison.summary;

    if summary.is_empty() {
        return String::from("\nGood news! Your playlist is healthy and every video is available.\n");
    }

    let total = summary.total();
    let mut output = String::new();
    output.push_str(&format!("\n{total} unavailable video(s) in the newer snapshot.\n"));

    if summary.unrecovered() > 0 {
        output.push_str(&format!("\nCould not recover {} of {total}:\n", summary.unrecovered()));
        output.push_str(&render_lost(summary));
        output.push_str(&render_legend(comparison, archive_interval));
    }

    if !summary.recovered.is_empty() {
        output.push_str(&format!("\nRecovered {} of {total}:\n", summary.recovered.len()));
        output.push_str(&render_recovered(summary));
    }

    if !comparison.duplicates.is_empty() {
        output.push('\n');
        for id in &comparison.duplicates {
            output.push_str(&format!(
                "note: {id} is listed more than once as unavailable, the last position is shown\n"
            ));
        }
    }

    output
}

fn render_lost(summary: &Summary) -> String {
    let mut rows: Vec<(&LostEntry, &str)> = summary
        .still_lost
        .iter()
        .map(|e| (e, "AL"))
        .chain(summary.newly_lost.iter().map(|e| (e, "NL")))
        .collect();
    rows.sort_by_key(|(entry, _)| entry.position);

    let mut output = String::new();
    output.push_str(&format!("  {:<ID_WIDTH$}  {:>INDEX_WIDTH$}  {}\n", "ID", "Index", "Category"));
    output.push_str(&format!("  {}\n", "-".repeat(ID_WIDTH + INDEX_WIDTH + 14)));

    for (entry, category) in rows {
        output.push_str(&format!(
            "  {:<ID_WIDTH$}  {:>INDEX_WIDTH$}  {category}\n",
            entry.id, entry.position
        ));
    }

    output
}

fn render_legend(comparison: &Comparison, archive_interval: Option<Duration>) -> String {
    let summary = &comparison.summary;
    let mut output = String::from("\nLegend:\n");

    if !summary.still_lost.is_empty() {
        output.push_str("  AL: already lost, unavailable in the older archive too.\n");
    }

    if !summary.newly_lost.is_empty() {
        output.push_str("  NL: newly lost, added to the playlist and lost after the older archive was made.\n");
        output.push_str("\n[tip] If you get many NL videos, archive your playlist more often.\n");

        let gap = gap_between(comparison.older.captured_at, comparison.newer.captured_at);
        if let Some(interval) = archive_interval.filter(|interval| gap > *interval) {
            output.push_str(&format!(
                "[tip] These snapshots are {} apart, more than your archive interval of {}.\n",
                format_duration(gap),
                format_duration(interval)
            ));
        }
    }

    output
}

fn render_recovered(summary: &Summary) -> String {
    let mut rows: Vec<_> = summary.recovered.iter().collect();
    rows.sort_by_key(|entry| entry.position);

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<ID_WIDTH$}  {:>INDEX_WIDTH$}  {:<TITLE_WIDTH$}  {:<CHANNEL_WIDTH$}  {}\n",
        "ID", "Index", "Title", "Channel", "Channel URL"
    ));
    output.push_str(&format!(
        "  {}\n",
        "-".repeat(ID_WIDTH + INDEX_WIDTH + TITLE_WIDTH + CHANNEL_WIDTH + URL_WIDTH + 8)
    ));

    for entry in rows {
        output.push_str(&format!(
            "  {:<ID_WIDTH$}  {:>INDEX_WIDTH$}  {:<TITLE_WIDTH$}  {:<CHANNEL_WIDTH$}  {}\n",
            entry.id,
            entry.position,
            truncate(&entry.metadata.title, TITLE_WIDTH),
            truncate(&entry.metadata.channel, CHANNEL_WIDTH),
            truncate(&entry.metadata.channel_url, URL_WIDTH),
        ));
    }

    output
}

/// What to do with each group, shown on request after the report.
pub fn render_instructions(summary: &Summary) -> String {
    let mut output = String::from("\nInstructions:\n");

    if !summary.still_lost.is_empty() || !summary.newly_lost.is_empty() {
        output.push_str("  AL / NL (lost):\n");
        output.push_str("    Look the video IDs up on https://web.archive.org or https://archive.is.\n");
        output.push_str("    Searching the web for the ID wrapped in quotes often finds pages that\n");
        output.push_str("    linked the video along with its title.\n");
    }

    if !summary.recovered.is_empty() {
        output.push_str("  Recovered:\n");
        output.push_str("    Search the titles on YouTube and add the videos back to your playlist.\n");
    }

    output.push_str("\n  Once done, remove the unavailable entries from the playlist so they do not\n");
    output.push_str("  show up again next time.\n");

    output
}

pub fn render_archives(archives: &[ArchiveSummary]) -> String {
    if archives.is_empty() {
        return String::from("No archives found. Run 'pldiff dump --id <PLAYLIST_ID>' to create one.\n");
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<20} {:<36} {:>7} {:>5}  {}\n",
        "Date", "Playlist", "Entries", "Lost", "File"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for archive in archives {
        output.push_str(&format!(
            "{:<20} {:<36} {:>7} {:>5}  {}\n",
            format_timestamp(archive.captured_at),
            truncate(&archive.playlist_id, 36),
            archive.entry_count,
            archive.unavailable_count,
            archive.path.display()
        ));
    }

    output
}
