//! Producer settings
//!
//! The flat, persisted configuration object that producers read and update
//! during the configuration pass. Each field is tri-state: never asked,
//! asked and declined, or holding a value.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

pub mod store;

pub use store::{ConfigStore, MemoryConfigStore, TomlConfigStore};

/// Placeholder shown instead of sensitive values
pub const MASK: &str = "********";

/// Tri-state value of a single settings field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Setting {
    /// Not asked yet
    #[default]
    Unset,
    /// Asked, and the operator chose none
    Declined,
    /// A concrete value
    Present(String),
}

impl Setting {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Setting::Present(value) => Some(value),
            Setting::Unset | Setting::Declined => None,
        }
    }

    /// Whether the operator has already made a decision for this field
    pub fn is_decided(&self) -> bool {
        !matches!(self, Setting::Unset)
    }
}

static UNSET: Setting = Setting::Unset;

/// Options handed to every producer's configure step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigureOptions {
    /// Ask again even for fields that were already decided
    pub reset: bool,
}

impl ConfigureOptions {
    pub fn reset() -> Self {
        Self { reset: true }
    }
}

/// Flat mapping from field name to tri-state value.
///
/// `Unset` is never stored; absence of a key means the field was never asked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsFile", into = "SettingsFile")]
pub struct Configuration {
    fields: BTreeMap<String, Setting>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> &Setting {
        self.fields.get(field).unwrap_or(&UNSET)
    }

    /// Present value of a field, if any
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).as_value()
    }

    /// Present value parsed into `T`; `None` when absent or unparseable
    pub fn parsed<T: FromStr>(&self, field: &str) -> Option<T> {
        self.value(field).and_then(|v| v.trim().parse().ok())
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(field.into(), Setting::Present(value.into()));
    }

    pub fn decline(&mut self, field: impl Into<String>) {
        self.fields.insert(field.into(), Setting::Declined);
    }

    /// Return a field to the never-asked state
    pub fn clear(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// Builder-style `set`, handy when assembling fixtures
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Whether a configure step should prompt for `field`.
    ///
    /// Decided fields (declined or present) are only asked again on reset.
    pub fn should_ask(&self, field: &str, options: &ConfigureOptions) -> bool {
        options.reset || !self.get(field).is_decided()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display copy of every decided field with sensitive values masked
    pub fn mask(&self, sensitive: &BTreeSet<String>) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(field, setting)| {
                let shown = match setting {
                    Setting::Present(_) if sensitive.contains(field) => MASK.to_string(),
                    Setting::Present(value) => value.clone(),
                    Setting::Declined => "(declined)".to_string(),
                    Setting::Unset => "(unset)".to_string(),
                };
                (field.clone(), shown)
            })
            .collect()
    }
}

/// On-disk layout of the settings file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    declined: BTreeSet<String>,
}

impl From<SettingsFile> for Configuration {
    fn from(file: SettingsFile) -> Self {
        let mut config = Configuration::new();
        for field in file.declined {
            config.decline(field);
        }
        // A value wins over a stale declined marker for the same field
        for (field, value) in file.values {
            config.set(field, value);
        }
        config
    }
}

impl From<Configuration> for SettingsFile {
    fn from(config: Configuration) -> Self {
        let mut file = SettingsFile::default();
        for (field, setting) in config.fields {
            match setting {
                Setting::Present(value) => {
                    file.values.insert(field, value);
                }
                Setting::Declined => {
                    file.declined.insert(field);
                }
                Setting::Unset => {}
            }
        }
        file
    }
}
