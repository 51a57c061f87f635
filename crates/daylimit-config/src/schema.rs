//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Budget settings
    #[serde(default)]
    pub limits: RawLimits,

    /// Logout behavior
    #[serde(default)]
    pub logout: RawLogout,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,
}

/// Budget settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLimits {
    /// Daily budget written to a fresh state file. An existing state file
    /// keeps its own limit.
    pub default_daily_limit_seconds: Option<u64>,

    /// Remaining time at which the one-shot warning fires
    pub warning_threshold_seconds: Option<u64>,
}

/// Logout behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLogout {
    /// Simulate the logout instead of ending the OS session
    pub dry_run: Option<bool>,

    /// Log out when the user closes the shell
    pub enforce_on_close: Option<bool>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Directory holding state.json and activity.log
    pub data_dir: Option<PathBuf>,
}
