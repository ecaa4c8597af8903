//! Endpoint configuration parsed from environment variables.
//!
//! The reference backend listens on `127.0.0.1:8000` and answers on `/ask`.
//! Both are defaults here, not constants: every value can be overridden by
//! the environment or by CLI flags layered on top.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ASK_PATH: &str = "/ask";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const ENV_BASE_URL: &str = "QA_FORM_BASE_URL";
pub const ENV_ASK_PATH: &str = "QA_FORM_ASK_PATH";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "QA_FORM_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "QA_FORM_REQUEST_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value for {key}: `{value}` is not a whole number of seconds")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect_secs: u64,
    /// Upper bound on a whole request. `None` lets a call run until the
    /// backend answers or the connection fails.
    pub request_secs: Option<u64>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS, request_secs: None }
    }
}

impl Timeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Option<Duration> {
        self.request_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub ask_path: String,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            ask_path: DEFAULT_ASK_PATH.to_owned(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build config from process environment variables.
    ///
    /// Optional:
    /// - `QA_FORM_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `QA_FORM_ASK_PATH`: default `/ask`
    /// - `QA_FORM_CONNECT_TIMEOUT_SECS`: default 10
    /// - `QA_FORM_REQUEST_TIMEOUT_SECS`: unset means no request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a timeout is not a number or the
    /// resulting endpoint URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = non_empty(lookup(ENV_BASE_URL)) {
            config.base_url = base_url;
        }
        if let Some(ask_path) = non_empty(lookup(ENV_ASK_PATH)) {
            config.ask_path = ask_path;
        }
        if let Some(raw) = non_empty(lookup(ENV_CONNECT_TIMEOUT_SECS)) {
            config.timeouts.connect_secs = parse_secs(ENV_CONNECT_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_REQUEST_TIMEOUT_SECS)) {
            config.timeouts.request_secs = Some(parse_secs(ENV_REQUEST_TIMEOUT_SECS, &raw)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL and the full ask URL parse.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for either URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.root_url()?;
        self.ask_url()?;
        Ok(())
    }

    /// `GET` target for the backend root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the base URL does not parse.
    pub fn root_url(&self) -> Result<reqwest::Url, ConfigError> {
        parse_url(&format!("{}/", self.trimmed_base()))
    }

    /// `POST` target for questions: base URL joined with the ask path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the joined URL does not parse.
    pub fn ask_url(&self) -> Result<reqwest::Url, ConfigError> {
        let path = self.ask_path.trim();
        let url = if path.starts_with('/') {
            format!("{}{path}", self.trimmed_base())
        } else {
            format!("{}/{path}", self.trimmed_base())
        };
        parse_url(&url)
    }

    fn trimmed_base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw.to_owned() })
}

fn parse_url(url: &str) -> Result<reqwest::Url, ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl { url: url.to_owned(), reason: e.to_string() })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::InvalidUrl { url: url.to_owned(), reason: format!("unsupported scheme `{other}`") }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
