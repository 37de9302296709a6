//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_SHORTCODE_LENGTH: usize = 6;
const DEFAULT_DATA_FILE: &str = "./data.json";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Length of generated short codes
    pub shortcode_length: usize,
    /// TTL in seconds applied when a create request omits one (0 = unbounded)
    pub default_ttl_seconds: i64,
    /// Click budget applied when a create request omits one (0 = unbounded)
    pub default_max_clicks: i64,
    /// Path of the JSON data file
    pub data_file: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Reaper interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHORTCODE_LENGTH` - Generated code length (default: 6)
    /// - `DEFAULT_TTL_SECONDS` - Default TTL in seconds (default: 0, unbounded)
    /// - `DEFAULT_MAX_CLICKS` - Default click budget (default: 0, unbounded)
    /// - `DATA_FILE` - Data file path (default: ./data.json)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Reaper frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            shortcode_length: env_parse::<usize>("SHORTCODE_LENGTH")
                .filter(|len| *len > 0)
                .unwrap_or(defaults.shortcode_length),
            default_ttl_seconds: env_parse::<i64>("DEFAULT_TTL_SECONDS")
                .filter(|ttl| *ttl >= 0)
                .unwrap_or(defaults.default_ttl_seconds),
            default_max_clicks: env_parse::<i64>("DEFAULT_MAX_CLICKS")
                .filter(|clicks| *clicks >= 0)
                .unwrap_or(defaults.default_max_clicks),
            data_file: env::var("DATA_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: env_parse::<u64>("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shortcode_length: DEFAULT_SHORTCODE_LENGTH,
            default_ttl_seconds: 0,
            default_max_clicks: 0,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
