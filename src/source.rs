use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::SourceError;
use crate::flag_value::FlagValue;

/// Flag assignments delivered by a [FeatureSource], keyed by flag key.
pub type FeatureMap = HashMap<String, FlagValue>;

/// FeatureSource is the interface to the external service that holds the current flag
/// assignments.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Fetch the full set of flag assignments.
    async fn fetch_features(&self) -> Result<FeatureMap, SourceError>;
}

/// HttpFeatureSource reads flag definitions from a GrowthBook-compatible
/// `/api/features/{client_key}` endpoint.
#[derive(Clone, Debug)]
pub struct HttpFeatureSource {
    client: Client,
    url: String,
    dev_mode: bool,
}

impl HttpFeatureSource {
    pub fn new(config: &ClientConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            url: config.features_url(),
            dev_mode: config.dev_mode,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeatureSource for HttpFeatureSource {
    async fn fetch_features(&self) -> Result<FeatureMap, SourceError> {
        let mut request = self.client.get(&self.url);
        if self.dev_mode {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        let features = decode_features(&body)?;

        if self.dev_mode {
            debug!("fetched {} features from {}: {:?}", features.len(), self.url, features);
        } else {
            debug!("fetched {} features from {}", features.len(), self.url);
        }
        Ok(features)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeaturesPayload {
    features: Option<HashMap<String, FeatureDefinition>>,
    encrypted_features: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureDefinition {
    #[serde(default)]
    default_value: serde_json::Value,
    #[serde(default)]
    rules: Vec<FeatureRule>,
}

#[derive(Debug, Deserialize)]
struct FeatureRule {
    condition: Option<serde_json::Value>,
    coverage: Option<f64>,
    force: Option<serde_json::Value>,
}

impl FeatureRule {
    // Without evaluation attributes only unconditional, full-coverage force rules can apply.
    fn forced_value(&self) -> Option<&serde_json::Value> {
        let unconditional = match &self.condition {
            None => true,
            Some(serde_json::Value::Object(condition)) => condition.is_empty(),
            Some(_) => false,
        };
        let full_coverage = self.coverage.map_or(true, |c| c >= 1.0);
        if unconditional && full_coverage {
            self.force.as_ref()
        } else {
            None
        }
    }
}

impl FeatureDefinition {
    fn resolve(self) -> FlagValue {
        let forced = self.rules.iter().find_map(FeatureRule::forced_value).cloned();
        forced.unwrap_or(self.default_value).into()
    }
}

/// Decodes a feature endpoint response body into flag assignments.
pub fn decode_features(body: &str) -> Result<FeatureMap, SourceError> {
    let payload: FeaturesPayload =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    match payload.features {
        Some(features) => Ok(features
            .into_iter()
            .map(|(key, definition)| (key, definition.resolve()))
            .collect()),
        None if payload.encrypted_features.is_some() => Err(SourceError::Unsupported(
            "encrypted features require a decryption key".to_string(),
        )),
        None => Err(SourceError::Decode("missing `features` object".to_string())),
    }
}
