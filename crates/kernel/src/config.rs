//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Origin that feed paths are resolved against (default: http://localhost:3000).
    pub site_origin: String,

    /// Path to the blocks TOML file (default: ./blocks.toml).
    pub blocks_config: PathBuf,

    /// How long fetched feeds are cached (default: 60 seconds).
    pub feed_cache_ttl: Duration,

    /// Feed path of the placeholders sheet (default: /placeholders.json).
    pub placeholders_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let site_origin = lookup("SITE_ORIGIN")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let blocks_config = lookup("BLOCKS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./blocks.toml"));

        let feed_cache_ttl = lookup("FEED_CACHE_TTL_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("FEED_CACHE_TTL_SECS must be a whole number of seconds")?;

        let placeholders_path =
            lookup("PLACEHOLDERS_PATH").unwrap_or_else(|| "/placeholders.json".to_string());

        Ok(Self {
            port,
            site_origin,
            blocks_config,
            feed_cache_ttl,
            placeholders_path,
        })
    }
}
