//! Presentation helpers for views that display flag state.

use serde::Serialize;

use crate::catalog::FeatureKey;
use crate::client::{FeatureClient, LoadStatus};
use crate::config::ClientConfig;
use crate::flag_value::FlagValue;

/// The hero section variant selected by the `hero_variant` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroVariant {
    Studio,
    Launch,
}

impl HeroVariant {
    /// `"studio"` selects [HeroVariant::Studio]; any other value selects [HeroVariant::Launch].
    pub fn from_value(value: &FlagValue) -> Self {
        match value {
            FlagValue::Str(s) if s == "studio" => HeroVariant::Studio,
            _ => HeroVariant::Launch,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeroVariant::Studio => "studio",
            HeroVariant::Launch => "launch",
        }
    }
}

pub fn status_label(configured: bool, status: LoadStatus) -> &'static str {
    if !configured {
        return "Add client key";
    }
    match status {
        LoadStatus::Loading => "Syncing",
        LoadStatus::Ready => "Connected",
        LoadStatus::Error => "Error",
        LoadStatus::Idle => "Idle",
    }
}

pub fn status_tone(configured: bool, status: LoadStatus) -> &'static str {
    if configured {
        status.as_str()
    } else {
        LoadStatus::Idle.as_str()
    }
}

pub fn refresh_interval_label(config: &ClientConfig) -> String {
    match config.refresh_interval() {
        Some(interval) => format!(
            "Auto refresh every {}s",
            (interval.as_millis() as f64 / 1000.0).round() as u64
        ),
        None => "Auto refresh off".to_string(),
    }
}

/// One displayed flag: its resolved value next to its default.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlagRow {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub value: String,
    pub fallback: String,
}

/// Everything a status panel shows about the client.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlagSummary {
    pub configured: bool,
    pub status: LoadStatus,
    pub status_label: &'static str,
    pub status_tone: &'static str,
    pub error_message: Option<String>,
    pub refresh_interval_label: String,
    pub hero_variant: HeroVariant,
    pub rows: Vec<FlagRow>,
}

impl FlagSummary {
    pub fn collect(client: &FeatureClient) -> Self {
        let configured = client.configured();
        let status = client.status();
        let hero_variant = HeroVariant::from_value(&client.feature(FeatureKey::HeroVariant));

        let rows = FeatureKey::ALL
            .iter()
            .map(|key| {
                let default = key.default_value();
                let value = match key {
                    FeatureKey::HeroVariant => hero_variant.as_str().to_string(),
                    _ => on_off(client.is_enabled(*key)),
                };
                FlagRow {
                    key: key.as_str(),
                    label: label(*key),
                    kind: default.kind(),
                    value,
                    fallback: display(&default),
                }
            })
            .collect();

        Self {
            configured,
            status,
            status_label: status_label(configured, status),
            status_tone: status_tone(configured, status),
            error_message: client.error_message(),
            refresh_interval_label: refresh_interval_label(client.config()),
            hero_variant,
            rows,
        }
    }
}

fn label(key: FeatureKey) -> &'static str {
    match key {
        FeatureKey::HeroVariant => "Hero variant",
        FeatureKey::QuickActions => "Quick actions",
        FeatureKey::ShowTestimonials => "Testimonials",
    }
}

fn on_off(on: bool) -> String {
    let text = if on { "on" } else { "off" };
    text.to_string()
}

fn display(value: &FlagValue) -> String {
    match value {
        FlagValue::Bool(b) => on_off(*b),
        FlagValue::Str(s) => s.clone(),
        other => other.as_json().to_string(),
    }
}
