use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pldiff")]
#[command(about = "Archive YouTube playlists and recover metadata of lost videos")]
#[command(version)]
pub struct Cli {
    /// Show debug logs on stderr
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a playlist and save it as an archive
    Dump(DumpArgs),

    /// Compare an archive against the live playlist
    Upstream(UpstreamArgs),

    /// Compare two archives
    Local(LocalArgs),

    /// List archives in a directory
    Archives(ArchivesArgs),
}

#[derive(Args, Clone, Default)]
pub struct OutputArgs {
    /// Output the comparison as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Answer yes to every prompt
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct DumpArgs {
    /// Playlist ID (e.g. PLhixgUqwRTjwvBI-hmbZ2rpkAl4lutnJG)
    #[arg(long, value_name = "PLAYLIST_ID")]
    pub id: String,

    /// Browser to load cookies from, for private playlists
    #[arg(long)]
    pub browser: Option<String>,

    /// Archive path (defaults to "<title> - <date>.csv" in the archive directory)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct UpstreamArgs {
    /// Older archive to compare against (defaults to the latest archive of --id)
    #[arg(long, alias = "diff-base", value_name = "PATH")]
    pub base: Option<PathBuf>,

    /// Playlist ID to fetch instead of the one recorded in the archive
    #[arg(long, alias = "id-override", value_name = "PLAYLIST_ID")]
    pub id: Option<String>,

    /// Browser to load cookies from, for private playlists
    #[arg(long)]
    pub browser: Option<String>,

    /// Also save the fetched playlist as an archive, optionally at PATH
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub save: Option<Option<PathBuf>>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct LocalArgs {
    /// Older archive
    #[arg(long, alias = "diff-base", value_name = "PATH")]
    pub base: PathBuf,

    /// Newer archive
    #[arg(long = "with", alias = "diff-with", value_name = "PATH")]
    pub with: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct ArchivesArgs {
    /// Directory to look in (defaults to the archive directory)
    pub dir: Option<PathBuf>,
}
