use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Settings for the home-page fetch behind the WebPageRef test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound on the whole request, body included.
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: concat!("dm-match/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl FetchConfig {
    /// Defaults overlaid with `DM_FETCH_TIMEOUT_SECS` and `DM_FETCH_USER_AGENT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("DM_FETCH_TIMEOUT_SECS") {
            config.timeout = parse_timeout_secs(&raw)?;
        }
        if let Some(agent) = std::env::var("DM_FETCH_USER_AGENT")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            config.user_agent = agent;
        }
        Ok(config)
    }
}

/// Parses a positive, possibly fractional, number of seconds.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}
