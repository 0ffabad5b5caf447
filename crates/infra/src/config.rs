//! Configuration loading and representation.

use thiserror::Error;

pub const FEED_PAGE_SIZE_VAR: &str = "PORTAL_FEED_PAGE_SIZE";
pub const LOG_FILTER_VAR: &str = "PORTAL_LOG";

const DEFAULT_FEED_PAGE_SIZE: usize = 50;
const DEFAULT_LOG_FILTER: &str = memberportal_observability::DEFAULT_FILTER;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Portal runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Maximum number of items returned by one content feed.
    pub feed_page_size: usize,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            feed_page_size: DEFAULT_FEED_PAGE_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PortalConfig {
    /// Load from process environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed_page_size = match non_blank(FEED_PAGE_SIZE_VAR) {
            None => defaults.feed_page_size,
            Some(raw) => parse_page_size(&raw)?,
        };

        let config = Self {
            feed_page_size,
            log_filter: non_blank(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
        };

        tracing::debug!(
            feed_page_size = config.feed_page_size,
            log_filter = %config.log_filter,
            "portal configuration loaded"
        );

        Ok(config)
    }

    /// Install the global JSON subscriber with `log_filter`. `RUST_LOG`
    /// still takes precedence. Returns `false` if a subscriber was already
    /// installed.
    pub fn init_logging(&self) -> bool {
        memberportal_observability::init_with_filter(&self.log_filter)
    }
}

fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: FEED_PAGE_SIZE_VAR,
        value: raw.to_string(),
        reason,
    };

    let size: usize = raw.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    if size == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(size)
}
