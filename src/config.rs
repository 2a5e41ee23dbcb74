use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend search service.
    pub api_url: String,
    /// Listen address of the web front end.
    pub bind: SocketAddr,
    pub timeout: Duration,
}

impl Config {
    /// Reads `SITE_SEARCH_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("SITE_SEARCH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let bind = lookup("SITE_SEARCH_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind
            .parse()
            .with_context(|| format!("Invalid SITE_SEARCH_BIND '{}'", bind))?;

        let timeout_secs = match lookup("SITE_SEARCH_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            bind,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid SITE_SEARCH_TIMEOUT_SECS '{}'", raw))?;
    if secs == 0 {
        return Err(anyhow!("SITE_SEARCH_TIMEOUT_SECS must be greater than zero"));
    }
    Ok(secs)
}
