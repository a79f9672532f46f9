use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::flag_value::FlagValue;

/// The flags this application reads. Each key carries the value used whenever the flag service
/// has nothing better to offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    HeroVariant,
    QuickActions,
    ShowTestimonials,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 3] = [
        FeatureKey::HeroVariant,
        FeatureKey::QuickActions,
        FeatureKey::ShowTestimonials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::HeroVariant => "hero_variant",
            FeatureKey::QuickActions => "quick_actions",
            FeatureKey::ShowTestimonials => "show_testimonials",
        }
    }

    pub fn default_value(&self) -> FlagValue {
        match self {
            FeatureKey::HeroVariant => FlagValue::Str("studio".to_string()),
            FeatureKey::QuickActions => FlagValue::Bool(false),
            FeatureKey::ShowTestimonials => FlagValue::Bool(false),
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref APPLICATION_CATALOG: FlagCatalog = FlagCatalog::new(
        FeatureKey::ALL
            .iter()
            .map(|key| (key.as_str().to_string(), key.default_value())),
    );
}

/// FlagCatalog maps every known flag key to its default value. It is fixed once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlagCatalog {
    defaults: HashMap<String, FlagValue>,
}

impl FlagCatalog {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, FlagValue)>,
    {
        Self {
            defaults: entries.into_iter().collect(),
        }
    }

    /// The catalog of [FeatureKey] defaults.
    pub fn application() -> &'static FlagCatalog {
        &APPLICATION_CATALOG
    }

    pub fn default_for(&self, key: &str) -> Option<&FlagValue> {
        self.defaults.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    /// Catalog keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.defaults.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}
