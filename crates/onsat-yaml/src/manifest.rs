//! Manifest types for the statistics section.

use crate::error::ManifestError;
use onsat_core::{ObserverOptions, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default ramp duration in milliseconds.
pub const DEFAULT_DURATION_MS: u32 = 2000;

fn default_duration() -> u32 {
    DEFAULT_DURATION_MS
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_section_id() -> String {
    "stats".to_string()
}

/// Configuration of one counter: what it counts up to and how it is labelled.
///
/// ```
/// use onsat_yaml::CounterConfig;
///
/// let config = CounterConfig::new(50.0, "Countries Served").suffix("+");
/// assert_eq!(config.duration_ms, 2000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterConfig {
    /// Target value
    pub end: f64,
    /// Ramp duration in milliseconds
    #[serde(default = "default_duration", rename = "duration")]
    pub duration_ms: u32,
    /// Text appended after the number
    #[serde(default)]
    pub suffix: String,
    /// Caption under the number
    pub label: String,
}

impl CounterConfig {
    /// Create a counter config with the default duration and no suffix.
    #[must_use]
    pub fn new(end: f64, label: impl Into<String>) -> Self {
        Self {
            end,
            duration_ms: DEFAULT_DURATION_MS,
            suffix: String::new(),
            label: label.into(),
        }
    }

    /// Set the ramp duration.
    #[must_use]
    pub const fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Parse a single counter from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if !self.end.is_finite() || self.end < 0.0 {
            return Err(ManifestError::invalid(
                "end",
                format!("must be a finite non-negative number, got {}", self.end),
            ));
        }
        if self.duration_ms == 0 {
            return Err(ManifestError::invalid("duration", "must be positive"));
        }
        if self.label.trim().is_empty() {
            return Err(ManifestError::invalid("label", "must not be empty"));
        }
        Ok(())
    }
}

/// The statistics band: a heading and a row of counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsSectionConfig {
    /// DOM id of the section
    #[serde(default = "default_section_id")]
    pub id: String,
    /// Section heading
    pub heading: String,
    /// Line under the heading
    #[serde(default)]
    pub subheading: String,
    /// Visible fraction that starts a counter
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Counters, left to right
    pub counters: Vec<CounterConfig>,
}

impl StatsSectionConfig {
    /// The "Global Impact" band shipped on the landing page.
    #[must_use]
    pub fn global_impact() -> Self {
        Self {
            id: default_section_id(),
            heading: "Global Impact".to_string(),
            subheading: "Our reach and performance in numbers".to_string(),
            threshold: DEFAULT_THRESHOLD,
            counters: vec![
                CounterConfig::new(1.0, "Connected Vehicles").suffix("M+"),
                CounterConfig::new(50.0, "Countries Served").suffix("+"),
                CounterConfig::new(99.9, "Uptime Guarantee").suffix("%"),
                CounterConfig::new(30.0, "Fuel Savings").suffix("%"),
            ],
        }
    }

    /// Observer options every counter in this section uses.
    #[must_use]
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions::with_threshold(self.threshold)
    }

    /// Check the section and every counter in it.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.id.trim().is_empty() {
            return Err(ManifestError::invalid("id", "must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ManifestError::invalid(
                "threshold",
                format!("must be within [0, 1], got {}", self.threshold),
            ));
        }
        if self.counters.is_empty() {
            return Err(ManifestError::NoCounters(self.id.clone()));
        }
        for (index, counter) in self.counters.iter().enumerate() {
            counter.validate().map_err(|e| e.at_counter(index))?;
        }
        Ok(())
    }
}

/// Top-level manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsManifest {
    /// The statistics section
    pub stats: StatsSectionConfig,
}

impl Default for StatsManifest {
    fn default() -> Self {
        Self {
            stats: StatsSectionConfig::global_impact(),
        }
    }
}

impl StatsManifest {
    /// Parse and validate a manifest from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.stats.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Serialize manifest to YAML.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
stats:
  heading: Numbers
  counters:
    - end: 12
      label: Satellites
"#;

    #[test]
    fn test_parse_minimal_applies_defaults() {
        let manifest = StatsManifest::from_yaml(MINIMAL_YAML).unwrap();
        let stats = &manifest.stats;
        assert_eq!(stats.id, "stats");
        assert_eq!(stats.threshold, 0.5);
        assert_eq!(stats.subheading, "");

        let counter = &stats.counters[0];
        assert_eq!(counter.end, 12.0);
        assert_eq!(counter.duration_ms, 2000);
        assert_eq!(counter.suffix, "");
    }

    #[test]
    fn test_duration_key_is_duration() {
        let yaml = "stats:\n  heading: H\n  counters:\n    - { end: 5, duration: 500, label: L }\n";
        let manifest = StatsManifest::from_yaml(yaml).unwrap();
        assert_eq!(manifest.stats.counters[0].duration_ms, 500);
    }

    #[test]
    fn test_missing_label_is_yaml_error() {
        let yaml = "stats:\n  heading: H\n  counters:\n    - { end: 5 }\n";
        assert!(matches!(
            StatsManifest::from_yaml(yaml),
            Err(ManifestError::Yaml(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "stats:\n  heading: H\n  counters:\n    - { end: 5, label: L, colour: red }\n";
        assert!(StatsManifest::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_zero_duration_names_counter() {
        let yaml = "stats:\n  heading: H\n  counters:\n    - { end: 5, label: A }\n    - { end: 5, duration: 0, label: B }\n";
        let err = StatsManifest::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::InvalidCounter {
                index: 1,
                field: "duration",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_end_rejected() {
        let err = CounterConfig::new(-1.0, "L").validate().unwrap_err();
        assert!(matches!(err, ManifestError::InvalidValue { field: "end", .. }));
    }

    #[test]
    fn test_non_finite_end_rejected() {
        assert!(CounterConfig::new(f64::NAN, "L").validate().is_err());
        assert!(CounterConfig::new(f64::INFINITY, "L").validate().is_err());
    }

    #[test]
    fn test_blank_label_rejected() {
        assert!(CounterConfig::new(1.0, "  ").validate().is_err());
    }

    #[test]
    fn test_empty_counters_rejected() {
        let yaml = "stats:\n  heading: H\n  counters: []\n";
        assert!(matches!(
            StatsManifest::from_yaml(yaml),
            Err(ManifestError::NoCounters(_))
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = StatsSectionConfig::global_impact();
        config.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ManifestError::InvalidValue {
                field: "threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_global_impact_is_valid() {
        let config = StatsSectionConfig::global_impact();
        assert!(config.validate().is_ok());
        assert_eq!(config.counters.len(), 4);
        assert_eq!(config.counters[2].end, 99.9);
        assert_eq!(config.observer_options().threshold, 0.5);
    }

    #[test]
    fn test_counter_from_json() {
        let config =
            CounterConfig::from_json(r#"{"end": 30, "suffix": "%", "label": "Fuel Savings"}"#)
                .unwrap();
        assert_eq!(config, CounterConfig::new(30.0, "Fuel Savings").suffix("%"));

        assert!(matches!(
            CounterConfig::from_json(r#"{"end": 30}"#),
            Err(ManifestError::Json(_))
        ));
        assert!(matches!(
            CounterConfig::from_json(r#"{"end": 30, "duration": 0, "label": "x"}"#),
            Err(ManifestError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_yaml_roundtrip_default() {
        let manifest = StatsManifest::default();
        let yaml = manifest.to_yaml().unwrap();
        assert_eq!(StatsManifest::from_yaml(&yaml).unwrap(), manifest);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = StatsManifest::from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }
}
