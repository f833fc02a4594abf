use std::path::{Path, PathBuf};

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Expand a leading `~` to the home directory. Paths without one, or when
/// no home directory is known, are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Config directory (~/.config/pldiff on Linux, platform equivalent elsewhere)
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pldiff").map(|dirs| dirs.config_dir().to_path_buf())
}
