#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::SourceError;
use crate::source::{FeatureMap, FeatureSource};

pub fn configured(refresh_interval_ms: i64) -> ClientConfig {
    ClientConfig::new("https://flags.example.com", "sdk-test-key")
        .with_refresh_interval_ms(refresh_interval_ms)
}

/// Serves a fixed set of features, or a configured failure.
pub struct StaticSource {
    features: FeatureMap,
    failure: Mutex<Option<SourceError>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(features: FeatureMap) -> Self {
        Self {
            features,
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with(&self, failure: Option<SourceError>) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureSource for StaticSource {
    async fn fetch_features(&self) -> Result<FeatureMap, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(e) => Err(e),
            None => Ok(self.features.clone()),
        }
    }
}

pub struct FailingSource {
    error: SourceError,
}

impl FailingSource {
    pub fn new(error: SourceError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl FeatureSource for FailingSource {
    async fn fetch_features(&self) -> Result<FeatureMap, SourceError> {
        Err(self.error.clone())
    }
}

/// Answers after `delay` of (Tokio) time has passed.
pub struct SlowSource {
    delay: Duration,
    features: FeatureMap,
    calls: AtomicUsize,
}

impl SlowSource {
    pub fn new(delay: Duration, features: FeatureMap) -> Self {
        Self {
            delay,
            features,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureSource for SlowSource {
    async fn fetch_features(&self) -> Result<FeatureMap, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.features.clone())
    }
}
