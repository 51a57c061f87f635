//! Config validation CLI tool
//!
//! Validates a daylimit configuration file and reports any errors.

use daylimit_util::{default_config_path, format_hms};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a daylimit configuration file.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match daylimit_config::load_config(&config_path) {
        Ok(policy) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", daylimit_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Default daily limit: {} (only used for a new state file)",
                format_hms(policy.limits.default_daily_limit_secs)
            );
            println!(
                "  Warning threshold: {}",
                format_hms(policy.limits.warning_threshold_secs)
            );
            println!(
                "  Logout mode: {}",
                if policy.logout.dry_run { "simulated" } else { "real" }
            );
            println!("  Enforce logout on close: {}", policy.logout.enforce_on_close);
            println!("  Data directory: {}", policy.service.data_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                daylimit_config::ConfigError::ValidationFailed { errors } => {
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                _ => eprintln!("  {}", e),
            }
            ExitCode::from(1)
        }
    }
}
