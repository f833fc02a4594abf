//! Playlist archive files.
//!
//! An archive is a small text record with two metadata lines, a column
//! header and one comma separated row per entry:
//!
//! ```text
//! Playlist ID : PLhixgUqwRTjwvBI-hmbZ2rpkAl4lutnJG
//! Archived on : 1700000000000
//! index, id, isUnavailable, channel, channelUrl, title
//! 1, dQw4w9WgXcQ, False, "Rick Astley", "https://www.youtube.com/@RickAstleyYT", "Never Gonna Give You Up"
//! 2, xxxxxxxxxxx, True, "Unknown channel", "Unknown link", "[Deleted video]"
//! ```
//!
//! Older archives produced by the browser bookmarklet wrote titles without
//! escaping their quotes, so the title column is taken as the rest of the
//! line rather than a strictly quoted field.

pub mod list;

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::snapshot::{Entry, Snapshot, Timestamp};

pub use list::{latest_for, list, ArchiveSummary};

const PLAYLIST_ID_LABEL: &str = "Playlist ID";
const ARCHIVED_ON_LABEL: &str = "Archived on";
const COLUMN_HEADER: &str = "index, id, isUnavailable, channel, channelUrl, title";

// columns before the free-form title
const LEADING_COLUMNS: usize = 5;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header on line {line}: {reason}")]
    Header { line: usize, reason: String },

    #[error("invalid entry on line {line}: {reason}")]
    Row { line: usize, reason: String },
}

/// Read and parse an archive file.
pub fn read(path: &Path) -> Result<Snapshot, ArchiveError> {
    let content = fs::read_to_string(path)?;
    let snapshot = parse(&content)?;

    debug!(
        path = %path.display(),
        playlist = %snapshot.playlist_id,
        entries = snapshot.entries.len(),
        unavailable = snapshot.unavailable_count(),
        "read archive"
    );

    Ok(snapshot)
}

/// Write `snapshot` to `path`, replacing any existing file.
pub fn write(path: &Path, snapshot: &Snapshot) -> Result<(), ArchiveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(snapshot))?;

    debug!(path = %path.display(), entries = snapshot.entries.len(), "wrote archive");
    Ok(())
}

pub fn parse(content: &str) -> Result<Snapshot, ArchiveError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));

    let playlist_id = header_value(lines.next(), 1, PLAYLIST_ID_LABEL)?;
    if playlist_id.is_empty() {
        return Err(ArchiveError::Header {
            line: 1,
            reason: "playlist id is empty".to_string(),
        });
    }

    let archived_on = header_value(lines.next(), 2, ARCHIVED_ON_LABEL)?;
    let captured_at = archived_on
        .parse::<i64>()
        .map(Timestamp::new)
        .map_err(|_| ArchiveError::Header {
            line: 2,
            reason: format!("'{archived_on}' is not a unix timestamp"),
        })?;

    // column header, content not checked
    if lines.next().is_none() {
        return Err(ArchiveError::Header {
            line: 3,
            reason: "missing column header".to_string(),
        });
    }

    let mut entries = Vec::new();
    for (line_number, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let entry = parse_row(line).map_err(|reason| ArchiveError::Row {
            line: line_number,
            reason,
        })?;
        entries.push(entry);
    }

    Ok(Snapshot::new(playlist_id, captured_at, entries))
}

fn header_value(line: Option<(usize, &str)>, number: usize, label: &str) -> Result<String, ArchiveError> {
    let Some((_, line)) = line else {
        return Err(ArchiveError::Header {
            line: number,
            reason: format!("missing '{label}' line"),
        });
    };

    line.trim_start()
        .strip_prefix(label)
        .and_then(|rest| rest.trim_start().strip_prefix(':'))
        .map(|value| value.trim().to_string())
        .ok_or_else(|| ArchiveError::Header {
            line: number,
            reason: format!("expected '{label} : <value>'"),
        })
}

fn parse_row(line: &str) -> Result<Entry, String> {
    let mut cursor = RowCursor { line, pos: 0 };

    let mut leading = Vec::with_capacity(LEADING_COLUMNS);
    for _ in 0..LEADING_COLUMNS {
        leading.push(cursor.next_field()?);
    }
    let title = unquote(cursor.rest().trim());

    let position = leading[0]
        .parse::<u32>()
        .map_err(|_| format!("index '{}' is not a positive number", leading[0]))?;

    let id = &leading[1];
    if id.is_empty() {
        return Err("empty id".to_string());
    }

    let unavailable = parse_flag(&leading[2])?;

    Ok(Entry {
        position,
        id: id.clone(),
        unavailable,
        channel: leading[3].clone(),
        channel_url: leading[4].clone(),
        title,
    })
}

fn parse_flag(value: &str) -> Result<bool, String> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("isUnavailable must be True or False, got '{value}'"))
    }
}

/// Walks the leading columns of a row. Delimiters are ASCII so byte offsets
/// always land on char boundaries.
struct RowCursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> RowCursor<'a> {
    fn skip_blanks_from(&self, mut at: usize) -> usize {
        let bytes = self.line.as_bytes();
        while at < bytes.len() && (bytes[at] == b' ' || bytes[at] == b'\t') {
            at += 1;
        }
        at
    }

    /// Parse one field and consume the comma that ends it.
    fn next_field(&mut self) -> Result<String, String> {
        let bytes = self.line.as_bytes();
        self.pos = self.skip_blanks_from(self.pos);

        if bytes.get(self.pos) != Some(&b'"') {
            let Some(offset) = self.line[self.pos..].find(',') else {
                return Err("missing columns".to_string());
            };
            let end = self.pos + offset;
            let field = self.line[self.pos..end].trim_end().to_string();
            self.pos = end + 1;
            return Ok(field);
        }

        self.pos += 1;
        let mut field = String::new();
        loop {
            let Some(offset) = self.line[self.pos..].find('"') else {
                return Err("unterminated quoted field".to_string());
            };
            let quote = self.pos + offset;
            field.push_str(&self.line[self.pos..quote]);

            if bytes.get(quote + 1) == Some(&b'"') {
                field.push('"');
                self.pos = quote + 2;
                continue;
            }

            let after = self.skip_blanks_from(quote + 1);
            match bytes.get(after) {
                Some(b',') => {
                    self.pos = after + 1;
                    return Ok(field);
                }
                None => return Err("missing columns".to_string()),
                // stray quote inside the field
                Some(_) => {
                    field.push('"');
                    self.pos = quote + 1;
                }
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }
}

fn unquote(field: &str) -> String {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render a snapshot in archive format.
pub fn render(snapshot: &Snapshot) -> String {
    let mut output = String::new();

    output.push_str(&format!("{PLAYLIST_ID_LABEL} : {}\n", snapshot.playlist_id));
    output.push_str(&format!("{ARCHIVED_ON_LABEL} : {}\n", snapshot.captured_at.raw()));
    output.push_str(COLUMN_HEADER);
    output.push('\n');

    for entry in &snapshot.entries {
        output.push_str(&format!(
            "{}, {}, {}, {}, {}, {}\n",
            entry.position,
            entry.id,
            if entry.unavailable { "True" } else { "False" },
            quote(&entry.channel),
            quote(&entry.channel_url),
            quote(&entry.title),
        ));
    }

    output
}

/// Default file name for a dump: `<playlist title> - <YYYY-MM-DD>.csv`.
pub fn suggested_file_name(title: &str, date: chrono::NaiveDate) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = if cleaned.is_empty() { "playlist" } else { cleaned.as_str() };
    format!("{stem} - {}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{UNKNOWN_CHANNEL, UNKNOWN_LINK};

    const SAMPLE: &str = "Playlist ID : PLtest123\n\
        Archived on : 1700000000000\n\
        index, id, isUnavailable, channel, channelUrl, title\n\
        1, aaaaaaaaaaa, False, \"Channel One\", \"https://www.youtube.com/@one\", \"First Song\"\n\
        2, bbbbbbbbbbb, True, \"Unknown channel\", \"Unknown link\", \"[Deleted video]\"\n";

    #[test]
    fn parses_header_and_rows() {
        let snapshot = parse(SAMPLE).unwrap();

        assert_eq!(snapshot.playlist_id, "PLtest123");
        assert_eq!(snapshot.captured_at, Timestamp::new(1_700_000_000_000));
        assert_eq!(snapshot.entries.len(), 2);

        let first = &snapshot.entries[0];
        assert_eq!(first.position, 1);
        assert_eq!(first.id, "aaaaaaaaaaa");
        assert!(!first.unavailable);
        assert_eq!(first.channel, "Channel One");
        assert_eq!(first.channel_url, "https://www.youtube.com/@one");
        assert_eq!(first.title, "First Song");

        let second = &snapshot.entries[1];
        assert!(second.unavailable);
        assert_eq!(second.channel, UNKNOWN_CHANNEL);
        assert_eq!(second.channel_url, UNKNOWN_LINK);
        assert_eq!(second.title, "[Deleted video]");
    }

    #[test]
    fn accepts_crlf_and_bom() {
        let content = format!("\u{feff}{}", SAMPLE.replace('\n', "\r\n"));
        let snapshot = parse(&content).unwrap();
        assert_eq!(snapshot.playlist_id, "PLtest123");
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[1].title, "[Deleted video]");
    }

    #[test]
    fn commas_inside_quoted_fields() {
        let content = "Playlist ID : PL\nArchived on : 1700000000\nheader\n\
            1, abc, False, \"Crosby, Stills & Nash\", \"https://x\", \"Helplessly Hoping, Live\"\n";
        let snapshot = parse(content).unwrap();
        assert_eq!(snapshot.entries[0].channel, "Crosby, Stills & Nash");
        assert_eq!(snapshot.entries[0].title, "Helplessly Hoping, Live");
    }

    #[test]
    fn legacy_unescaped_quotes_in_title() {
        let content = "Playlist ID : PL\nArchived on : 1700000000\nheader\n\
            1, abc, False, \"Chan\", \"https://x\", \"The \"Best\" Song, ever\"\n";
        let snapshot = parse(content).unwrap();
        assert_eq!(snapshot.entries[0].title, "The \"Best\" Song, ever");
    }

    #[test]
    fn stray_quote_in_channel_kept() {
        let content = "Playlist ID : PL\nArchived on : 1700000000\nheader\n\
            1, abc, False, \"DJ \"Q\" Crew\", \"https://x\", \"T\"\n";
        let snapshot = parse(content).unwrap();
        assert_eq!(snapshot.entries[0].channel, "DJ \"Q\" Crew");
    }

    #[test]
    fn render_then_parse_keeps_tricky_titles() {
        let snapshot = Snapshot::new(
            "PLround",
            Timestamp::new(1_700_000_123_456),
            vec![
                Entry::available(1, "a1", "Quote \"Channel\"", "https://y", "Say \"hi\", then \"bye\""),
                Entry::available(2, "a2", "Plain", "https://z", "ends with quote\""),
                Entry::unavailable(3, "a3", "[Private video]"),
            ],
        );

        let parsed = parse(&render(&snapshot)).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let content = format!("{SAMPLE}\n\n");
        assert_eq!(parse(&content).unwrap().entries.len(), 2);
    }

    #[test]
    fn seconds_timestamp_accepted() {
        let content = SAMPLE.replace("1700000000000", "1700000000");
        let snapshot = parse(&content).unwrap();
        assert!(!snapshot.captured_at.is_millis());
    }

    #[test]
    fn missing_playlist_label_is_header_error() {
        let err = parse("Nope\nArchived on : 1\nheader\n").unwrap_err();
        assert!(matches!(err, ArchiveError::Header { line: 1, .. }));
    }

    #[test]
    fn bad_timestamp_is_header_error() {
        let content = SAMPLE.replace("1700000000000", "yesterday");
        let err = parse(&content).unwrap_err();
        assert!(matches!(err, ArchiveError::Header { line: 2, .. }));
    }

    #[test]
    fn missing_column_header_is_error() {
        let err = parse("Playlist ID : PL\nArchived on : 1\n").unwrap_err();
        assert!(matches!(err, ArchiveError::Header { line: 3, .. }));
    }

    #[test]
    fn bad_flag_reports_line() {
        let content = SAMPLE.replace("True", "Maybe");
        let err = parse(&content).unwrap_err();
        match err {
            ArchiveError::Row { line, reason } => {
                assert_eq!(line, 5);
                assert!(reason.contains("Maybe"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_row_is_error() {
        let content = format!("{SAMPLE}3, ccc, False\n");
        let err = parse(&content).unwrap_err();
        assert!(matches!(err, ArchiveError::Row { line: 6, .. }));
    }

    #[test]
    fn flag_is_case_insensitive() {
        let content = SAMPLE.replace("False", "false").replace("True", "TRUE");
        let snapshot = parse(&content).unwrap();
        assert!(!snapshot.entries[0].unavailable);
        assert!(snapshot.entries[1].unavailable);
    }

    #[test]
    fn render_writes_header() {
        let snapshot = Snapshot::new("PLx", Timestamp::new(42), vec![Entry::unavailable(1, "id", "[Deleted video]")]);
        let text = render(&snapshot);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Playlist ID : PLx"));
        assert_eq!(lines.next(), Some("Archived on : 42"));
        assert_eq!(lines.next(), Some(COLUMN_HEADER));
        assert_eq!(
            lines.next(),
            Some("1, id, True, \"Unknown channel\", \"Unknown link\", \"[Deleted video]\"")
        );
    }

    #[test]
    fn suggested_name_is_filesystem_safe() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(suggested_file_name("Road/Trip: Mix?", date), "Road_Trip_ Mix_ - 2024-03-09.csv");
        assert_eq!(suggested_file_name("  ", date), "playlist - 2024-03-09.csv");
    }
}
