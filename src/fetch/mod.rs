//! Remote playlist acquisition.
//!
//! A `PlaylistSource` turns a playlist id into its current ordered list of
//! entries. The only shipped source drives `yt-dlp`.

pub mod ytdlp;

use thiserror::Error;
use tracing::debug;

use crate::snapshot::{Entry, Snapshot, Timestamp};

pub use ytdlp::YtDlp;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0} not found, install it or set ytdlp_path in the config file")]
    ToolMissing(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("playlist {0} does not exist or is private")]
    PlaylistNotFound(String),

    #[error("yt-dlp failed: {0}")]
    CommandFailed(String),

    #[error("could not decode yt-dlp output: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEntry {
    pub id: String,
    pub title: String,
    pub channel: Option<String>,
    pub channel_url: Option<String>,
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPlaylist {
    pub id: String,
    pub title: String,
    pub entries: Vec<FetchedEntry>,
}

impl FetchedPlaylist {
    /// Number the entries from 1 in playlist order. Unavailable entries get
    /// placeholder channel fields whatever the source reported.
    pub fn into_snapshot(self, captured_at: Timestamp) -> Snapshot {
        let entries = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let position = u32::try_from(i + 1).unwrap_or(u32::MAX);
                if entry.unavailable {
                    Entry::unavailable(position, &entry.id, &entry.title)
                } else {
                    Entry {
                        position,
                        id: entry.id,
                        unavailable: false,
                        channel: entry.channel.unwrap_or_default(),
                        channel_url: entry.channel_url.unwrap_or_default(),
                        title: entry.title,
                    }
                }
            })
            .collect();

        Snapshot::new(self.id, captured_at, entries)
    }
}

pub trait PlaylistSource {
    fn name(&self) -> &'static str;
    fn fetch(&self, playlist_id: &str) -> Result<FetchedPlaylist, FetchError>;
}

/// A freshly fetched playlist, stamped with the time of the fetch.
pub struct Dump {
    pub title: String,
    pub snapshot: Snapshot,
}

impl Dump {
    pub fn suggested_file_name(&self, date: chrono::NaiveDate) -> String {
        crate::archive::suggested_file_name(&self.title, date)
    }
}

pub fn dump(source: &dyn PlaylistSource, playlist_id: &str) -> Result<Dump, FetchError> {
    debug!(source = source.name(), playlist = %playlist_id, "fetching playlist");

    let playlist = source.fetch(playlist_id)?;
    let title = playlist.title.clone();

    Ok(Dump {
        title,
        snapshot: playlist.into_snapshot(Timestamp::now()),
    })
}
