//! Browser host for the counters.
//!
//! Visibility comes from `IntersectionObserver`, frames from
//! `requestAnimationFrame`, and counter text is written straight into the
//! DOM. Everything is torn down on `unmount()` or when the handle is freed.

#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod mount;
#[cfg(target_arch = "wasm32")]
pub mod observer;
#[cfg(target_arch = "wasm32")]
pub mod raf;

#[cfg(target_arch = "wasm32")]
pub use logger::init_logging;
#[cfg(target_arch = "wasm32")]
pub use mount::{mount_counter, mount_stats, MountHandle};
#[cfg(target_arch = "wasm32")]
pub use observer::VisibilityWatch;
#[cfg(target_arch = "wasm32")]
pub use raf::RafScheduler;
