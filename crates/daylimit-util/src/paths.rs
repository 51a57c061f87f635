//! Default paths for daylimit
//!
//! Everything lives in one per-user directory:
//! - State: `<config dir>/daylimit/state.json`
//! - Activity log: `<config dir>/daylimit/activity.log`
//! - Config: `<config dir>/daylimit/config.toml`
//!
//! `<config dir>` is `$XDG_CONFIG_HOME` or `~/.config` on Linux,
//! `%APPDATA%` on Windows and `~/Library/Application Support` on macOS.

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const DAYLIMIT_DATA_DIR_ENV: &str = "DAYLIMIT_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "daylimit";

/// Config filename within the application directory
const CONFIG_FILENAME: &str = "config.toml";

/// State filename within the data directory
pub const STATE_FILENAME: &str = "state.json";

/// Activity log filename within the data directory
pub const ACTIVITY_LOG_FILENAME: &str = "activity.log";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$DAYLIMIT_DATA_DIR` environment variable (if set)
/// 2. `<config dir>/daylimit`
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DAYLIMIT_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    app_dir()
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    app_dir().join(CONFIG_FILENAME)
}

fn app_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join(APP_DIR);
    }

    // No home directory at all (service accounts, stripped containers)
    std::env::temp_dir().join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dir_contains_app_name() {
        let path = app_dir();
        assert!(path.to_string_lossy().contains("daylimit"));
    }

    #[test]
    fn config_path_lives_in_app_dir() {
        let config = default_config_path();
        assert_eq!(config.file_name().unwrap(), "config.toml");
        assert_eq!(config.parent().unwrap(), app_dir());
    }
}
