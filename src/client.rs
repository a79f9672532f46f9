use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::catalog::{FeatureKey, FlagCatalog};
use crate::config::ClientConfig;
use crate::error::{describe_failure, SourceError};
use crate::flag_value::FlagValue;
use crate::source::{FeatureMap, FeatureSource, HttpFeatureSource};

/// LoadStatus describes where the client is in its connection lifecycle.
///
/// `Idle` until the first load starts (and forever if the client is unconfigured), `Loading`
/// while a load is in flight, then `Ready` or `Error`. Both outcomes return to `Loading` on the
/// next attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Ready => "ready",
            LoadStatus::Error => "error",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time copy of the client's state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    pub status: LoadStatus,
    pub error_message: Option<String>,
    pub refresh_tick: u64,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub features: FeatureMap,
}

struct ClientState {
    status: LoadStatus,
    error_message: Option<String>,
    features: FeatureMap,
    last_refreshed: Option<DateTime<Utc>>,
}

struct Inner {
    config: ClientConfig,
    configured: bool,
    catalog: FlagCatalog,
    // Keys outside the catalog that have already been reported.
    reported_unknown: std::sync::Mutex<HashSet<String>>,
    source: Arc<dyn FeatureSource>,
    state: RwLock<ClientState>,
    // Held for the duration of a load; at most one load is in flight.
    load_guard: Mutex<()>,
    refresh_tick: watch::Sender<u64>,
}

/// FeatureClient mediates all reads of remotely configured feature flags.
///
/// Reads never fail: when the client is unconfigured, has not loaded yet, or the flag is unknown,
/// the caller's fallback is returned. Load failures are recorded in [FeatureClient::status] and
/// [FeatureClient::error_message] rather than returned.
///
/// The client is cheap to clone; clones share state.
#[derive(Clone)]
pub struct FeatureClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for FeatureClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureClient")
            .field("api_host", &self.inner.config.api_host)
            .field("configured", &self.inner.configured)
            .field("status", &self.status())
            .field("refresh_tick", &self.refresh_tick())
            .finish()
    }
}

impl FeatureClient {
    /// Creates a client reading from `source`. Nothing is fetched and no timer is started until
    /// [FeatureClient::initialize] or [FeatureClient::start] is called.
    pub fn new(config: ClientConfig, source: Arc<dyn FeatureSource>) -> Self {
        Self::with_catalog(config, source, FlagCatalog::application().clone())
    }

    /// Like [FeatureClient::new], checking queried keys against `catalog` instead of the
    /// application catalog.
    pub fn with_catalog(
        config: ClientConfig,
        source: Arc<dyn FeatureSource>,
        catalog: FlagCatalog,
    ) -> Self {
        let configured = config.is_configured();
        if !configured {
            info!("feature flag client key is not configured; serving fallback values only");
        }
        let (refresh_tick, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                config,
                configured,
                catalog,
                reported_unknown: std::sync::Mutex::new(HashSet::new()),
                source,
                state: RwLock::new(ClientState {
                    status: LoadStatus::Idle,
                    error_message: None,
                    features: FeatureMap::new(),
                    last_refreshed: None,
                }),
                load_guard: Mutex::new(()),
                refresh_tick,
            }),
        }
    }

    /// Creates a client that reads from the HTTP feature endpoint named by `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self, SourceError> {
        let source = HttpFeatureSource::new(&config)?;
        Ok(Self::new(config, Arc::new(source)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn configured(&self) -> bool {
        self.inner.configured
    }

    pub fn status(&self) -> LoadStatus {
        self.read_state().status
    }

    /// The failure detail of the last attempt. Only present while the status is `Error`.
    pub fn error_message(&self) -> Option<String> {
        self.read_state().error_message.clone()
    }

    /// Number of successful loads so far.
    pub fn refresh_tick(&self) -> u64 {
        *self.inner.refresh_tick.borrow()
    }

    /// Subscribes to flag changes. The received value is the refresh tick, which changes after
    /// every successful load.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.refresh_tick.subscribe()
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        let state = self.read_state();
        ClientSnapshot {
            status: state.status,
            error_message: state.error_message.clone(),
            refresh_tick: self.refresh_tick(),
            last_refreshed: state.last_refreshed,
            features: state.features.clone(),
        }
    }

    /// Performs the first load, bounded by the configured timeout.
    ///
    /// Returns the resulting status. Does nothing (and stays `Idle`) if unconfigured.
    pub async fn initialize(&self) -> LoadStatus {
        self.load(Some(self.inner.config.timeout())).await
    }

    /// Re-fetches flag assignments. Unlike [FeatureClient::initialize] this is not bounded by a
    /// timeout.
    ///
    /// A call made while another load is in flight waits for that load and returns its outcome
    /// instead of contacting the service a second time.
    pub async fn refresh_features(&self) -> LoadStatus {
        self.load(None).await
    }

    /// Initializes the client, then starts periodic refresh if an interval is configured.
    pub async fn start(&self) -> Option<RefreshHandle> {
        self.initialize().await;
        self.start_auto_refresh()
    }

    /// Starts refreshing on the configured interval. Must be called within a Tokio runtime.
    ///
    /// Returns `None`, scheduling nothing, when the client is unconfigured or the interval is
    /// disabled. The timer runs until the returned handle is stopped or dropped.
    pub fn start_auto_refresh(&self) -> Option<RefreshHandle> {
        if !self.inner.configured {
            return None;
        }
        let period = self.inner.config.refresh_interval()?;

        let token = CancellationToken::new();
        let task = tokio::spawn(run_auto_refresh(self.clone(), period, token.clone()));
        debug!("auto refresh every {}ms", period.as_millis());

        Some(RefreshHandle {
            token,
            task: Some(task),
        })
    }

    /// Returns the current value of `key`, or `fallback` when the client is unconfigured, the
    /// flag is unknown, or its value is null.
    pub fn feature_value(&self, key: &str, fallback: impl Into<FlagValue>) -> FlagValue {
        let fallback = fallback.into();
        if !self.inner.catalog.contains(key) {
            self.report_unknown(key);
        }
        if !self.inner.configured {
            return fallback;
        }

        let state = self.read_state();
        match state.features.get(key) {
            Some(value) if !value.is_null() => value.clone(),
            _ => fallback,
        }
    }

    /// Returns whether `key` resolves to a truthy value.
    pub fn is_on(&self, key: &str, fallback: bool) -> bool {
        self.feature_value(key, fallback).is_truthy()
    }

    /// Returns the current value of `key`, falling back to its catalog default.
    pub fn feature(&self, key: FeatureKey) -> FlagValue {
        self.feature_value(key.as_str(), key.default_value())
    }

    pub fn is_enabled(&self, key: FeatureKey) -> bool {
        self.feature(key).is_truthy()
    }

    async fn load(&self, timeout: Option<Duration>) -> LoadStatus {
        if !self.inner.configured {
            self.write_state().status = LoadStatus::Idle;
            return LoadStatus::Idle;
        }

        let _guard = match self.inner.load_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return self.await_in_flight(timeout).await,
        };

        {
            let mut state = self.write_state();
            state.status = LoadStatus::Loading;
            state.error_message = None;
        }
        let mut in_flight = InFlight {
            client: self,
            settled: false,
        };

        let result = self.fetch(timeout).await;
        in_flight.settled = true;
        match result {
            Ok(features) => {
                info!("loaded {} feature flags", features.len());
                {
                    let mut state = self.write_state();
                    state.features = features;
                    state.status = LoadStatus::Ready;
                    state.error_message = None;
                    state.last_refreshed = Some(Utc::now());
                }
                self.inner.refresh_tick.send_modify(|tick| *tick += 1);
                LoadStatus::Ready
            }
            Err(e) => self.record_failure(&e),
        }
    }

    // Waits for the load already in flight. With a limit, gives up after it and reports a
    // timeout; the in-flight load still settles the status when it completes.
    async fn await_in_flight(&self, timeout: Option<Duration>) -> LoadStatus {
        debug!("load already in flight; waiting for it");
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, self.inner.load_guard.lock()).await {
                Ok(_) => self.status(),
                Err(_) => self.record_failure(&SourceError::Timeout(limit)),
            },
            None => {
                let _ = self.inner.load_guard.lock().await;
                self.status()
            }
        }
    }

    fn record_failure(&self, error: &SourceError) -> LoadStatus {
        let message = describe_failure(error);
        warn!("failed to load feature flags: {}", message);
        let mut state = self.write_state();
        state.status = LoadStatus::Error;
        state.error_message = Some(message);
        LoadStatus::Error
    }

    fn report_unknown(&self, key: &str) {
        let mut reported = self
            .inner
            .reported_unknown
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if reported.insert(key.to_string()) {
            warn!("feature {} is not in the flag catalog", key);
        }
    }

    async fn fetch(&self, timeout: Option<Duration>) -> Result<FeatureMap, SourceError> {
        let fetch = self.inner.source.fetch_features();
        match timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| SourceError::Timeout(limit))?,
            None => fetch.await,
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClientState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// Settles a load whose future was dropped before the fetch returned, so the status never stays
// `Loading` without a load in flight.
struct InFlight<'a> {
    client: &'a FeatureClient,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.client.write_state();
        if state.status == LoadStatus::Loading {
            state.status = LoadStatus::Error;
            state.error_message = Some(describe_failure(&SourceError::Cancelled));
        }
    }
}

async fn run_auto_refresh(client: FeatureClient, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                client.refresh_features().await;
            }
        }
    }
    debug!("auto refresh stopped");
}

/// RefreshHandle owns a running periodic refresh. Stopping or dropping it cancels the timer; a
/// refresh already in flight runs to completion.
#[derive(Debug)]
pub struct RefreshHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stops the timer and waits for its task to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("auto refresh task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_common::{configured, FailingSource, SlowSource, StaticSource};
    use maplit::hashmap;
    use spectral::prelude::*;

    fn quick_actions_on() -> FeatureMap {
        hashmap! {
            "quick_actions".to_string() => FlagValue::Bool(true),
        }
    }

    #[tokio::test]
    async fn unconfigured_client_serves_fallbacks() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let config = ClientConfig::new("https://flags.example.com", "");
        let client = FeatureClient::new(config, source.clone());

        assert_that!(client.configured()).is_false();
        assert_that!(client.feature_value("hero_variant", "studio"))
            .is_equal_to(FlagValue::Str("studio".into()));

        assert_that!(client.initialize().await).is_equal_to(LoadStatus::Idle);
        assert_that!(client.refresh_features().await).is_equal_to(LoadStatus::Idle);
        assert_that!(client.refresh_features().await).is_equal_to(LoadStatus::Idle);
        assert_that!(client.status()).is_equal_to(LoadStatus::Idle);
        assert_that!(client.is_on("quick_actions", false)).is_false();
        assert_that!(source.calls()).is_equal_to(0);
    }

    #[tokio::test]
    async fn placeholder_key_is_unconfigured() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let config = ClientConfig::default().with_refresh_interval_ms(1000);
        let client = FeatureClient::new(config, source.clone());

        assert_that!(client.configured()).is_false();
        assert_that!(client.start().await.is_none()).is_true();
        assert_that!(source.calls()).is_equal_to(0);
    }

    #[tokio::test]
    async fn successful_initialize() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let client = FeatureClient::new(configured(0), source);

        assert_that!(client.initialize().await).is_equal_to(LoadStatus::Ready);
        assert_that!(client.status()).is_equal_to(LoadStatus::Ready);
        assert_that!(client.error_message()).is_none();
        assert_that!(client.refresh_tick()).is_equal_to(1);
        assert_that!(client.is_on("quick_actions", false)).is_true();
        assert_that!(client.is_enabled(FeatureKey::QuickActions)).is_true();
        assert_that!(client.snapshot().last_refreshed).is_some();
    }

    #[tokio::test]
    async fn unknown_and_null_flags_use_fallback() {
        let features = hashmap! {
            "hero_variant".to_string() => FlagValue::Json(serde_json::Value::Null),
        };
        let client = FeatureClient::new(configured(0), Arc::new(StaticSource::new(features)));
        client.initialize().await;

        assert_that!(client.is_on("not_a_flag", false)).is_false();
        assert_that!(client.feature(FeatureKey::HeroVariant))
            .is_equal_to(FlagValue::Str("studio".into()));
        assert_that!(client.feature_value("max_items", 5i64)).is_equal_to(FlagValue::Int(5));
    }

    #[tokio::test]
    async fn failed_initialize_without_interval_schedules_nothing() {
        let source = Arc::new(FailingSource::new(SourceError::Transport(
            "connection refused".into(),
        )));
        let client = FeatureClient::new(configured(0), source);

        assert_that!(client.start().await.is_none()).is_true();
        assert_that!(client.status()).is_equal_to(LoadStatus::Error);
        assert_that!(client.error_message()).is_equal_to(Some("connection refused".to_string()));
        assert_that!(client.refresh_tick()).is_equal_to(0);
        assert_that!(client.is_on("quick_actions", false)).is_false();
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_times_out() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(10), quick_actions_on()));
        let client = FeatureClient::new(configured(0).with_timeout_ms(100), source);

        assert_that!(client.initialize().await).is_equal_to(LoadStatus::Error);
        let message = client.error_message().unwrap();
        assert_that!(message.as_str()).contains("timed out after 100ms");
        assert_that!(client.is_on("quick_actions", false)).is_false();
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_is_not_bounded_by_timeout() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(10), quick_actions_on()));
        let client = FeatureClient::new(configured(0).with_timeout_ms(100), source);

        assert_that!(client.refresh_features().await).is_equal_to(LoadStatus::Ready);
        assert_that!(client.is_on("quick_actions", false)).is_true();
    }

    #[tokio::test(start_paused = true)]
    async fn status_is_loading_while_in_flight() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(1), quick_actions_on()));
        let client = FeatureClient::new(configured(0), source);

        let background = client.clone();
        let task = tokio::spawn(async move { background.refresh_features().await });
        tokio::task::yield_now().await;

        assert_that!(client.status()).is_equal_to(LoadStatus::Loading);
        assert_that!(task.await.unwrap()).is_equal_to(LoadStatus::Ready);
    }

    #[tokio::test]
    async fn error_recovers_on_next_refresh() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let client = FeatureClient::new(configured(0), source.clone());

        client.initialize().await;
        source.fail_with(Some(SourceError::Status(503)));
        assert_that!(client.refresh_features().await).is_equal_to(LoadStatus::Error);
        assert_that!(client.error_message()).is_some();
        // assignments from the last good load stay in place
        assert_that!(client.is_on("quick_actions", false)).is_true();

        source.fail_with(None);
        assert_that!(client.refresh_features().await).is_equal_to(LoadStatus::Ready);
        assert_that!(client.error_message()).is_none();
        assert_that!(client.refresh_tick()).is_equal_to(2);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_refreshes_coalesce() {
        let source = Arc::new(SlowSource::new(Duration::from_millis(500), quick_actions_on()));
        let client = FeatureClient::new(configured(0), source.clone());

        let (first, second) = tokio::join!(client.refresh_features(), client.refresh_features());

        assert_that!(first).is_equal_to(LoadStatus::Ready);
        assert_that!(second).is_equal_to(LoadStatus::Ready);
        assert_that!(source.calls()).is_equal_to(1);
        assert_that!(client.refresh_tick()).is_equal_to(1);
    }

    #[tokio::test]
    async fn subscribers_see_successful_loads() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let client = FeatureClient::new(configured(0), source.clone());
        let mut changes = client.subscribe();

        client.refresh_features().await;
        assert_that!(changes.has_changed().unwrap()).is_true();
        assert_that!(*changes.borrow_and_update()).is_equal_to(1);

        source.fail_with(Some(SourceError::Status(500)));
        client.refresh_features().await;
        assert_that!(changes.has_changed().unwrap()).is_false();
    }

    #[tokio::test(start_paused = true)]
    async fn auto_refresh_runs_until_stopped() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let client = FeatureClient::new(configured(1000), source.clone());

        let handle = client.start_auto_refresh().unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_that!(source.calls()).is_equal_to(3);
        assert_that!(client.status()).is_equal_to(LoadStatus::Ready);

        handle.stop();
        assert_that!(handle.is_stopped()).is_true();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_that!(source.calls()).is_equal_to(3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_auto_refresh() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let client = FeatureClient::new(configured(1000), source.clone());

        let handle = client.start().await;
        assert_that!(handle.is_some()).is_true();
        assert_that!(source.calls()).is_equal_to(1);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_that!(source.calls()).is_equal_to(1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_refresh_retries_after_failure() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        source.fail_with(Some(SourceError::Status(502)));
        let client = FeatureClient::new(configured(1000), source.clone());

        let _handle = client.start().await.unwrap();
        assert_that!(client.status()).is_equal_to(LoadStatus::Error);

        source.fail_with(None);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_that!(client.status()).is_equal_to(LoadStatus::Ready);
        assert_that!(client.is_on("quick_actions", false)).is_true();
    }

    #[test]
    fn custom_catalog_replaces_default() {
        let catalog = FlagCatalog::new(vec![("dark_mode".to_string(), FlagValue::Bool(false))]);
        let source = Arc::new(StaticSource::new(FeatureMap::new()));
        let client = FeatureClient::with_catalog(configured(0), source, catalog);

        assert_that!(client.inner.catalog.contains("dark_mode")).is_true();
        assert_that!(client.inner.catalog.contains("hero_variant")).is_false();
    }

    #[test]
    fn unknown_keys_are_reported_once() {
        let source = Arc::new(StaticSource::new(FeatureMap::new()));
        let client = FeatureClient::new(configured(0), source);

        client.is_on("not_a_flag", false);
        client.is_on("not_a_flag", false);
        client.feature(FeatureKey::QuickActions);

        let reported = client.inner.reported_unknown.lock().unwrap();
        assert_that!(reported.len()).is_equal_to(1);
        assert_that!(reported.contains("not_a_flag")).is_true();
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_refresh_does_not_leave_status_loading() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(10), quick_actions_on()));
        let client = FeatureClient::new(configured(0), source);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), client.refresh_features()).await;
        assert_that!(abandoned.is_err()).is_true();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_that!(client.status()).is_equal_to(LoadStatus::Error);
        assert_that!(client.error_message()).is_some();

        // the guard is released, so the next refresh runs normally
        assert_that!(client.refresh_features().await).is_equal_to(LoadStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_waiting_on_refresh_honours_timeout() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(10), quick_actions_on()));
        let client = FeatureClient::new(configured(0).with_timeout_ms(100), source.clone());

        let background = client.clone();
        let refresh = tokio::spawn(async move { background.refresh_features().await });
        tokio::task::yield_now().await;

        let started = tokio::time::Instant::now();
        assert_that!(client.initialize().await).is_equal_to(LoadStatus::Error);
        assert_that!(started.elapsed()).is_less_than(Duration::from_secs(1));
        let message = client.error_message().unwrap();
        assert_that!(message.as_str()).contains("timed out after 100ms");

        assert_that!(refresh.await.unwrap()).is_equal_to(LoadStatus::Ready);
        assert_that!(client.status()).is_equal_to(LoadStatus::Ready);
        assert_that!(source.calls()).is_equal_to(1);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_initialize_without_interval_schedules_nothing() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(10), quick_actions_on()));
        let client = FeatureClient::new(configured(0).with_timeout_ms(100), source);

        assert_that!(client.start().await.is_none()).is_true();
        assert_that!(client.status()).is_equal_to(LoadStatus::Error);
        assert_that!(client.error_message()).is_some();
        assert_that!(client.is_on("quick_actions", false)).is_false();
    }

    #[tokio::test]
    async fn snapshot_serializes() {
        let source = Arc::new(StaticSource::new(quick_actions_on()));
        let client = FeatureClient::new(configured(0), source);
        client.initialize().await;

        let json = serde_json::to_value(client.snapshot()).unwrap();
        assert_that!(json["status"]).is_equal_to(serde_json::json!("ready"));
        assert_that!(json["refreshTick"]).is_equal_to(serde_json::json!(1));
        assert_that!(json["features"]["quick_actions"]).is_equal_to(serde_json::json!(true));
        assert_that!(json["errorMessage"].is_null()).is_true();
    }
}
