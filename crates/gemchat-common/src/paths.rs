//! Platform directories for gemchat.

use std::path::PathBuf;

use crate::PlatformError;

pub const APP_NAME: &str = "gemchat";

/// Returns the platform-specific configuration directory.
///
/// - macOS: `~/Library/Application Support/gemchat`
/// - Linux: `$XDG_CONFIG_HOME/gemchat` (defaults to `~/.config/gemchat`)
/// - Windows: `%APPDATA%\gemchat`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine config directory".into()))?
        .join(APP_NAME))
}

/// Returns the platform-specific data directory.
///
/// Credentials remembered between runs live here.
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Located at `config_dir()/config.toml`.
pub fn config_file() -> Result<PathBuf, PlatformError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory holding one file per remembered secret.
pub fn key_store_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("keys"))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
