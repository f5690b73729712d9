//! YAML manifests for the onSAT statistics section.
//!
//! A manifest describes the statistics band and its counters:
//!
//! ```
//! use onsat_yaml::StatsManifest;
//!
//! let manifest = StatsManifest::from_yaml(
//!     "stats:\n  heading: Global Impact\n  counters:\n    - { end: 50, suffix: '+', label: Countries Served }\n",
//! )
//! .expect("valid manifest");
//! assert_eq!(manifest.stats.counters[0].suffix, "+");
//! ```

mod error;
mod manifest;

pub use error::ManifestError;
pub use manifest::{
    CounterConfig, StatsManifest, StatsSectionConfig, DEFAULT_DURATION_MS,
};
