//! Assessment runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! retrieval client and the orchestrator. Nothing below reads process-wide
//! environment variables directly: callers supply a lookup function, which keeps the
//! parsing testable without mutating the environment.

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use crate::validation::parse_int_prefix;
use std::time::Duration;

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AssessmentConfig {
    api_key: String,
    base_url: String,
    default_limit: u32,
    max_limit: u32,
    retry_attempts: u32,
    retry_base_delay: Duration,
    page_delay: Duration,
    request_timeout: Duration,
    sample_size: usize,
    submit: bool,
}

impl AssessmentConfig {
    /// Create a new `AssessmentConfig` with default tuning parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariables` for a blank `api_key`, and a URL error
    /// when `base_url` is not an absolute http(s) URL.
    pub fn new(api_key: impl Into<String>, base_url: &str) -> ConfigResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingVariables(vec!["API_KEY"]));
        }

        Ok(Self {
            api_key,
            base_url: validate_base_url(base_url)?,
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            sample_size: DEFAULT_SAMPLE_SIZE,
            submit: true,
        })
    }

    /// Resolve configuration from a variable lookup such as `std::env::var`.
    ///
    /// Unset, unparseable, or out-of-range numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVariables(vec!["API_KEY"]))?;

        let base_url = lookup("BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut cfg = Self::new(api_key, &base_url)?;
        cfg.default_limit = positive_or(lookup("DEFAULT_LIMIT"), DEFAULT_LIMIT);
        cfg.max_limit = positive_or(lookup("MAX_LIMIT"), DEFAULT_MAX_LIMIT);
        cfg.retry_attempts = positive_or(lookup("RETRY_ATTEMPTS"), DEFAULT_RETRY_ATTEMPTS);
        cfg.retry_base_delay = Duration::from_millis(non_negative_or(
            lookup("RETRY_BASE_DELAY_MS"),
            DEFAULT_RETRY_BASE_DELAY_MS,
        ));
        cfg.page_delay = Duration::from_millis(non_negative_or(
            lookup("PAGE_DELAY_MS"),
            DEFAULT_PAGE_DELAY_MS,
        ));
        cfg.request_timeout = Duration::from_millis(positive_or(
            lookup("REQUEST_TIMEOUT_MS"),
            DEFAULT_REQUEST_TIMEOUT_MS,
        ));
        cfg.sample_size = non_negative_or(lookup("SAMPLE_SIZE"), DEFAULT_SAMPLE_SIZE);
        cfg.submit = flag_or(lookup("SUBMIT"), true);

        Ok(cfg)
    }

    pub fn with_page_size(mut self, max_limit: u32) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    pub fn with_retry(mut self, attempts: u32, base_delay: Duration) -> Self {
        self.retry_attempts = attempts.max(1);
        self.retry_base_delay = base_delay;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn submit(&self) -> bool {
        self.submit
    }
}

fn validate_base_url(value: &str) -> ConfigResult<String> {
    let parsed = url::Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        source,
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    Ok(value.trim_end_matches('/').to_string())
}

fn positive_or<T>(value: Option<String>, default: T) -> T
where
    T: TryFrom<i64>,
{
    value
        .as_deref()
        .and_then(parse_int_prefix)
        .filter(|n| *n > 0)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or(default)
}

fn non_negative_or<T>(value: Option<String>, default: T) -> T
where
    T: TryFrom<i64>,
{
    value
        .as_deref()
        .and_then(parse_int_prefix)
        .filter(|n| *n >= 0)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or(default)
}

fn flag_or(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
        _ => default,
    }
}
