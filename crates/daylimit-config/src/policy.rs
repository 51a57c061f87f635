//! Validated policy structures

use crate::schema::RawConfig;
use daylimit_util::default_data_dir;
use std::path::PathBuf;

/// Daily budget used when neither the state file nor the config provides one
pub const DEFAULT_DAILY_LIMIT_SECONDS: u64 = 60 * 60;

/// Warning fires once remaining time drops to this many seconds
pub const DEFAULT_WARNING_THRESHOLD_SECONDS: u64 = 5 * 60;

/// Validated policy ready for use by the core engine
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub limits: LimitsPolicy,
    pub logout: LogoutPolicy,
    pub service: ServiceConfig,
}

impl Policy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let defaults = Self::default();

        Self {
            limits: LimitsPolicy {
                default_daily_limit_secs: raw
                    .limits
                    .default_daily_limit_seconds
                    .unwrap_or(defaults.limits.default_daily_limit_secs),
                warning_threshold_secs: raw
                    .limits
                    .warning_threshold_seconds
                    .unwrap_or(defaults.limits.warning_threshold_secs),
            },
            logout: LogoutPolicy {
                dry_run: raw.logout.dry_run.unwrap_or(defaults.logout.dry_run),
                enforce_on_close: raw
                    .logout
                    .enforce_on_close
                    .unwrap_or(defaults.logout.enforce_on_close),
            },
            service: ServiceConfig {
                data_dir: raw.service.data_dir.unwrap_or(defaults.service.data_dir),
            },
        }
    }
}

/// Budget settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitsPolicy {
    /// Seeds `dailyLimitSeconds` in a state file that has none
    pub default_daily_limit_secs: u64,
    pub warning_threshold_secs: u64,
}

impl Default for LimitsPolicy {
    fn default() -> Self {
        Self {
            default_daily_limit_secs: DEFAULT_DAILY_LIMIT_SECONDS,
            warning_threshold_secs: DEFAULT_WARNING_THRESHOLD_SECONDS,
        }
    }
}

/// Logout behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutPolicy {
    /// Simulate instead of ending the OS session
    pub dry_run: bool,
    /// Closing the shell counts as a logout request
    pub enforce_on_close: bool,
}

impl Default for LogoutPolicy {
    fn default() -> Self {
        Self {
            dry_run: true,
            enforce_on_close: true,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
