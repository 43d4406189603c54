//! Where the config file and rolling logs live
//!
//! Lookup order for the base directory:
//! 1. `$TEXTEDIT_CONFIG_DIR` when set
//! 2. `$XDG_CONFIG_HOME/textedit/`, else `~/.config/textedit/` (Unix and macOS)
//! 3. `%APPDATA%\textedit\` (Windows)

use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "textedit";
const DIR_OVERRIDE_VAR: &str = "TEXTEDIT_CONFIG_DIR";

pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(DIR_OVERRIDE_VAR) {
        return Some(PathBuf::from(dir));
    }
    platform_config_root().map(|root| root.join(APP_DIR))
}

// ~/.config on macOS as well, not dirs::config_dir() (Application Support)
#[cfg(not(target_os = "windows"))]
fn platform_config_root() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

#[cfg(target_os = "windows")]
fn platform_config_root() -> Option<PathBuf> {
    dirs::config_dir()
}

pub fn config_file() -> Option<PathBuf> {
    Some(config_dir()?.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    Some(config_dir()?.join("logs"))
}

/// Create the log directory if needed and return it.
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home or config directory"))?;
    std::fs::create_dir_all(&logs)?;
    Ok(logs)
}
