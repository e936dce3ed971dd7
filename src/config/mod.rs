use std::env;

use crate::topology::LabelStyle;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub cache_capacity: usize,
    /// Upper bound on servers per request. Path search runs once per server
    /// pair, so both work and payload size grow with the square of this value.
    pub max_servers: u32,
    pub max_switches: u32,
    pub parallel_paths: bool,
    pub label_style: LabelStyle,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present) with defaults
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            listen_addr: get("LISTEN_ADDR", "0.0.0.0:4567"),
            cache_capacity: get("CACHE_CAPACITY", "64").parse().unwrap_or(64),
            max_servers: get("MAX_SERVERS", "256").parse().unwrap_or(256),
            max_switches: get("MAX_SWITCHES", "4096").parse().unwrap_or(4096),
            parallel_paths: parse_bool(&get("PARALLEL_PATHS", "true")).unwrap_or(true),
            label_style: get("LABEL_STYLE", "compact").parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to compact labels", e);
                LabelStyle::Compact
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
