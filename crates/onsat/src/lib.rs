//! onSAT statistics counters.
//!
//! Counters that count up from zero once scrolled into view, for the
//! "Global Impact" band of the onSAT landing page.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { init_logging, mount_counter, mount_stats } from './onsat.js';
//!
//! async function main() {
//!     await init();
//!     init_logging('debug');
//!     const stats = mount_stats('stats', '');
//!     const uptime = mount_counter('uptime', '{"end": 99.9, "suffix": "%", "label": "Uptime"}');
//!     // later, when the page section is torn down:
//!     stats.unmount();
//!     uptime.unmount();
//! }
//! ```
//!
//! # Headless
//!
//! ```
//! use onsat::{Simulation, StatsSection};
//!
//! let mut section = StatsSection::global_impact();
//! let report = Simulation::default().run(&mut section);
//! assert_eq!(report.final_values(), ["1M+", "50+", "99.9%", "30%"]);
//! ```

pub use onsat_core::*;
pub use onsat_widgets as widgets;
pub use onsat_widgets::{Counter, NumberFormat, StatsSection};
pub use onsat_yaml as yaml;
pub use onsat_yaml::{CounterConfig, ManifestError, StatsManifest, StatsSectionConfig};

pub mod browser;
pub mod headless;

pub use headless::{Report, Sample, Simulation};

#[cfg(target_arch = "wasm32")]
pub use browser::{init_logging, mount_counter, mount_stats, MountHandle};
