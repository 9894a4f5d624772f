use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup (no `set_var`/`remove_var` needed).
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let feed_url = require("LEAFDEX_FEED_URL")?;

    let env = parse_environment(&or_default("LEAFDEX_ENV", "development"));
    let bind_addr = parse_addr("LEAFDEX_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("LEAFDEX_LOG_LEVEL", "info");

    let feed_timeout_secs = parse_u64("LEAFDEX_FEED_TIMEOUT_SECS", "30")?;
    let feed_user_agent = or_default("LEAFDEX_FEED_USER_AGENT", "leafdex/0.1 (store-directory)");

    // Every 30 seconds, matching the reference refresh cadence.
    let refresh_schedule = or_default("LEAFDEX_REFRESH_SCHEDULE", "*/30 * * * * *");

    let snapshot_path = lookup("LEAFDEX_SNAPSHOT_PATH").ok().map(PathBuf::from);

    let fallback_latitude = parse_f64("LEAFDEX_FALLBACK_LAT", "48.8566")?;
    let fallback_longitude = parse_f64("LEAFDEX_FALLBACK_LNG", "2.3522")?;
    if !Coordinate::new(fallback_latitude, fallback_longitude).is_valid() {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEAFDEX_FALLBACK_LAT/LEAFDEX_FALLBACK_LNG".to_string(),
            reason: format!(
                "({fallback_latitude}, {fallback_longitude}) is not a valid coordinate"
            ),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        feed_url,
        feed_timeout_secs,
        feed_user_agent,
        refresh_schedule,
        snapshot_path,
        fallback_latitude,
        fallback_longitude,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
