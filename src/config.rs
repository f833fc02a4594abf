use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cli::{ArchivesArgs, DumpArgs, LocalArgs, OutputArgs, UpstreamArgs};
use crate::platform;

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_YTDLP: &str = "yt-dlp";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid archive_interval '{value}': {source}")]
    Interval {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Browser whose cookies yt-dlp should use, for private playlists.
    pub browser: Option<String>,
    pub ytdlp_path: Option<String>,
    /// Where dumps are written and `archives` looks by default.
    pub archive_dir: Option<PathBuf>,
    pub assume_yes: bool,
    /// How often the playlist is expected to be archived, e.g. "30d".
    pub archive_interval: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load the user's config file, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = platform::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) else {
            return Ok(FileConfig::default());
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(FileConfig::default());
        }

        debug!(path = %path.display(), "loading config file");
        Self::read(&path)
    }
}

pub struct Config {
    pub browser: Option<String>,
    pub ytdlp_path: String,
    pub archive_dir: Option<PathBuf>,
    pub assume_yes: bool,
    pub json_output: bool,
    pub archive_interval: Option<Duration>,
}

impl Config {
    pub fn from_file(file: &FileConfig) -> Result<Self, ConfigError> {
        let archive_interval = file
            .archive_interval
            .as_deref()
            .map(|value| {
                humantime::parse_duration(value).map_err(|source| ConfigError::Interval {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Config {
            browser: file.browser.clone(),
            ytdlp_path: file.ytdlp_path.clone().unwrap_or_else(|| DEFAULT_YTDLP.to_string()),
            archive_dir: file.archive_dir.as_deref().map(platform::expand_home),
            assume_yes: file.assume_yes,
            json_output: false,
            archive_interval,
        })
    }

    pub fn from_dump_args(args: &DumpArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(file)?;
        config.apply_browser(&args.browser);
        Ok(config)
    }

    pub fn from_upstream_args(args: &UpstreamArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(file)?;
        config.apply_browser(&args.browser);
        config.apply_output(&args.output);
        Ok(config)
    }

    pub fn from_local_args(args: &LocalArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(file)?;
        config.apply_output(&args.output);
        Ok(config)
    }

    pub fn from_archives_args(args: &ArchivesArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(file)?;
        if let Some(dir) = &args.dir {
            config.archive_dir = Some(dir.clone());
        }
        Ok(config)
    }

    fn apply_browser(&mut self, browser: &Option<String>) {
        if browser.is_some() {
            self.browser = browser.clone();
        }
    }

    fn apply_output(&mut self, output: &OutputArgs) {
        self.json_output = output.json;
        self.assume_yes = self.assume_yes || output.yes;
    }

    /// Directory for new dumps and archive listings.
    pub fn archive_dir_or_current(&self) -> PathBuf {
        self.archive_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
