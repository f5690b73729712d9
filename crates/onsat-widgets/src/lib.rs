//! Widgets for the onSAT statistics section.

pub mod counter;
pub mod format;
pub mod stats;
pub mod text;

pub use counter::{Counter, CounterRamp, CounterState, RampPhase, RampStep};
pub use format::NumberFormat;
pub use stats::{columns_for_width, StatsSection};
pub use text::{Text, TextTag};
