//! yt-dlp playlist source.
//!
//! Runs `yt-dlp --flat-playlist --dump-single-json` so that no video is
//! downloaded or even resolved individually, then decodes the single JSON
//! document it prints.
//!
//! Handles gracefully:
//! - yt-dlp not installed
//! - playlist missing or private
//! - entries without thumbnails (treated as unavailable when no channel is reported)

use std::io::ErrorKind;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, info};

use super::{FetchError, FetchedEntry, FetchedPlaylist, PlaylistSource};

/// Thumbnail YouTube serves for videos that can no longer be played.
const NO_THUMBNAIL_URL: &str = "https://i.ytimg.com/img/no_thumbnail.jpg";

/// A playlist cannot hold more than 5000 videos.
const PLAYLIST_ITEMS: &str = "1-5000";

pub struct YtDlp {
    program: String,
    browser: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistDump {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entries: Vec<Option<EntryDump>>,
}

#[derive(Debug, Deserialize)]
struct EntryDump {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    channel_url: Option<String>,
    #[serde(default)]
    thumbnails: Vec<ThumbnailDump>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailDump {
    url: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>, browser: Option<String>) -> Self {
        YtDlp {
            program: program.into(),
            browser,
        }
    }

    fn args(&self, playlist_id: &str) -> Vec<String> {
        let mut args = vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--playlist-items".to_string(),
            PLAYLIST_ITEMS.to_string(),
        ];

        if let Some(browser) = &self.browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        }

        args.push(playlist_url(playlist_id));
        args
    }
}

impl PlaylistSource for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn fetch(&self, playlist_id: &str) -> Result<FetchedPlaylist, FetchError> {
        let args = self.args(playlist_id);
        debug!(program = %self.program, ?args, "running playlist fetch");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    FetchError::ToolMissing(self.program.clone())
                } else {
                    FetchError::Spawn {
                        program: self.program.clone(),
                        source: e,
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(playlist_id, &stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let playlist = parse_dump(&stdout)?;

        info!(
            playlist = %playlist.id,
            entries = playlist.entries.len(),
            unavailable = playlist.entries.iter().filter(|e| e.unavailable).count(),
            "fetched playlist"
        );

        Ok(playlist)
    }
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={playlist_id}")
}

fn classify_failure(playlist_id: &str, stderr: &str) -> FetchError {
    if stderr.contains("does not exist") || stderr.contains("playlist is private") {
        return FetchError::PlaylistNotFound(playlist_id.to_string());
    }

    let message = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("exited with an error")
        .trim()
        .to_string();

    FetchError::CommandFailed(message)
}

fn parse_dump(json: &str) -> Result<FetchedPlaylist, FetchError> {
    let dump: PlaylistDump = serde_json::from_str(json)?;

    let mut entries = Vec::with_capacity(dump.entries.len());
    for entry in dump.entries {
        let Some(entry) = entry else {
            debug!("skipping null playlist entry");
            continue;
        };

        let unavailable = is_unavailable(&entry);
        entries.push(FetchedEntry {
            id: entry.id,
            title: entry.title.unwrap_or_default(),
            channel: entry.channel,
            channel_url: entry.channel_url,
            unavailable,
        });
    }

    Ok(FetchedPlaylist {
        id: dump.id,
        title: dump.title.unwrap_or_default(),
        entries,
    })
}

fn is_unavailable(entry: &EntryDump) -> bool {
    match entry.thumbnails.first() {
        Some(thumbnail) => thumbnail.url == NO_THUMBNAIL_URL,
        None => entry.channel.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "id": "PLtest",
        "title": "Road Trip",
        "_type": "playlist",
        "entries": [
            {
                "id": "aaaaaaaaaaa",
                "title": "Song A",
                "channel": "Artist A",
                "channel_url": "https://www.youtube.com/channel/UCa",
                "thumbnails": [{"url": "https://i.ytimg.com/vi/aaaaaaaaaaa/hqdefault.jpg", "height": 94}]
            },
            {
                "id": "bbbbbbbbbbb",
                "title": "[Deleted video]",
                "channel": null,
                "channel_url": null,
                "thumbnails": [{"url": "https://i.ytimg.com/img/no_thumbnail.jpg"}]
            },
            {
                "id": "ccccccccccc",
                "title": "[Private video]"
            },
            null
        ]
    }"#;

    #[test]
    fn parses_flat_playlist_dump() {
        let playlist = parse_dump(DUMP).unwrap();

        assert_eq!(playlist.id, "PLtest");
        assert_eq!(playlist.title, "Road Trip");
        assert_eq!(playlist.entries.len(), 3);

        assert!(!playlist.entries[0].unavailable);
        assert_eq!(playlist.entries[0].channel.as_deref(), Some("Artist A"));
        assert!(playlist.entries[1].unavailable);
        assert_eq!(playlist.entries[1].title, "[Deleted video]");
    }

    #[test]
    fn missing_thumbnail_and_channel_means_unavailable() {
        let playlist = parse_dump(DUMP).unwrap();
        assert!(playlist.entries[2].unavailable);
    }

    #[test]
    fn invalid_json_is_decode_error() {
        assert!(matches!(parse_dump("not json"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn args_include_browser_when_set() {
        let ytdlp = YtDlp::new("yt-dlp", Some("firefox".into()));
        let args = ytdlp.args("PLx");

        assert!(args.windows(2).any(|w| w[0] == "--cookies-from-browser" && w[1] == "firefox"));
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/playlist?list=PLx");
    }

    #[test]
    fn args_without_browser() {
        let args = YtDlp::new("yt-dlp", None).args("PLx");
        assert!(!args.iter().any(|a| a == "--cookies-from-browser"));
        assert!(args.windows(2).any(|w| w[0] == "--playlist-items" && w[1] == "1-5000"));
    }

    #[test]
    fn missing_playlist_is_classified() {
        let err = classify_failure("PLnope", "ERROR: [youtube:tab] PLnope: The playlist does not exist.\n");
        assert!(matches!(err, FetchError::PlaylistNotFound(id) if id == "PLnope"));
    }

    #[test]
    fn other_failures_keep_last_stderr_line() {
        let err = classify_failure("PL", "WARNING: something\nERROR: HTTP Error 429: Too Many Requests\n\n");
        match err {
            FetchError::CommandFailed(msg) => assert_eq!(msg, "ERROR: HTTP Error 429: Too Many Requests"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn missing_binary_is_tool_missing() {
        let ytdlp = YtDlp::new("pldiff-test-no-such-binary", None);
        assert!(matches!(ytdlp.fetch("PL"), Err(FetchError::ToolMissing(_))));
    }
}
