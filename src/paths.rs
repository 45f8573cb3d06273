//! Path resolution for estate data directories.
//!
//! Precedence: explicit home > `ESTATE_HOME` > `$XDG_DATA_HOME/estate` >
//! `~/.local/share/estate`.

use std::env;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "estate";
const DB_FILE: &str = "estate.db";

/// Get the data directory, honouring an explicit override.
pub fn get_data_dir(home: Option<&Path>) -> PathBuf {
    if let Some(home) = home {
        return home.to_path_buf();
    }

    if let Some(home) = env::var_os("ESTATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }

    let data_home = env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local/share")
        });

    data_home.join(APP_DIR)
}

/// Get the database file path (data_dir/estate.db).
pub fn get_db_path(home: Option<&Path>) -> PathBuf {
    get_data_dir(home).join(DB_FILE)
}
