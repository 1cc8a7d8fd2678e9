//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Default listen address for the setlist web service
pub const DEFAULT_BIND: &str = "127.0.0.1:5740";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `SETLIST_ROOT` environment variable
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("SETLIST_ROOT") {
        return PathBuf::from(path);
    }

    if let Some(value) = config_file_value("root_folder") {
        return PathBuf::from(value);
    }

    default_root_folder()
}

/// Listen address resolution, same priority order as the root folder:
/// CLI argument, then `SETLIST_BIND`, then the `bind` config key, then
/// the compiled default.
pub fn resolve_bind(cli_arg: Option<&str>) -> String {
    if let Some(bind) = cli_arg {
        return bind.to_string();
    }

    if let Ok(bind) = std::env::var("SETLIST_BIND") {
        return bind;
    }

    if let Some(value) = config_file_value("bind") {
        return value;
    }

    DEFAULT_BIND.to_string()
}

/// Database file location inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("setlist.db")
}

/// Read a string key from the TOML config file, if both exist
fn config_file_value(key: &str) -> Option<String> {
    let config_path = config_file_path().ok()?;
    let content = std::fs::read_to_string(&config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&content).ok()?;
    config.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Platform config file path: `<config dir>/setlist/config.toml`
fn config_file_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("setlist").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("setlist"))
        .unwrap_or_else(|| PathBuf::from("./setlist_data"))
}
