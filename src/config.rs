use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::util::is_configured;

pub const API_HOST_ENV: &str = "FEATURE_FLAGS_API_HOST";
pub const CLIENT_KEY_ENV: &str = "FEATURE_FLAGS_CLIENT_KEY";
pub const DEV_MODE_ENV: &str = "FEATURE_FLAGS_DEV_MODE";
pub const TIMEOUT_MS_ENV: &str = "FEATURE_FLAGS_TIMEOUT_MS";
pub const REFRESH_INTERVAL_MS_ENV: &str = "FEATURE_FLAGS_REFRESH_INTERVAL_MS";

const DEFAULT_API_HOST: &str = "https://cdn.growthbook.io";
const PLACEHOLDER_CLIENT_KEY: &str = "YOUR_CLIENT_KEY";
const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// ClientConfig holds the connection settings of a [crate::FeatureClient].
///
/// A `refresh_interval_ms` of zero or less disables periodic refresh; flags then only change on
/// an explicit [crate::FeatureClient::refresh_features] call.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub api_host: String,
    pub client_key: String,
    pub dev_mode: bool,
    pub timeout_ms: u64,
    pub refresh_interval_ms: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            client_key: PLACEHOLDER_CLIENT_KEY.to_string(),
            dev_mode: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            refresh_interval_ms: 0,
        }
    }
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            client_key: client_key.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON document with camelCase keys. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Applies `FEATURE_FLAGS_*` environment variables on top of this configuration.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides looked up by variable name. Unset names leave the field untouched.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_host) = lookup(API_HOST_ENV) {
            self.api_host = api_host;
        }
        if let Some(client_key) = lookup(CLIENT_KEY_ENV) {
            self.client_key = client_key;
        }
        if let Some(dev_mode) = lookup(DEV_MODE_ENV) {
            self.dev_mode = parse_override(DEV_MODE_ENV, &dev_mode, parse_bool)?;
        }
        if let Some(timeout_ms) = lookup(TIMEOUT_MS_ENV) {
            self.timeout_ms = parse_override(TIMEOUT_MS_ENV, &timeout_ms, |v| v.parse().ok())?;
        }
        if let Some(interval) = lookup(REFRESH_INTERVAL_MS_ENV) {
            self.refresh_interval_ms =
                parse_override(REFRESH_INTERVAL_MS_ENV, &interval, |v| v.parse().ok())?;
        }
        Ok(self)
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_refresh_interval_ms(mut self, refresh_interval_ms: i64) -> Self {
        self.refresh_interval_ms = refresh_interval_ms;
        self
    }

    /// Whether the client key looks like a real credential.
    pub fn is_configured(&self) -> bool {
        is_configured(&self.client_key)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        if self.refresh_interval_ms > 0 {
            Some(Duration::from_millis(self.refresh_interval_ms as u64))
        } else {
            None
        }
    }

    pub fn features_url(&self) -> String {
        format!(
            "{}/api/features/{}",
            self.api_host.trim_end_matches('/'),
            self.client_key.trim()
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_override<T, F>(name: &'static str, value: &str, parse: F) -> Result<T, ConfigError>
where
    F: FnOnce(&str) -> Option<T>,
{
    parse(value.trim()).ok_or_else(|| ConfigError::InvalidOverride {
        name,
        value: value.to_string(),
    })
}
