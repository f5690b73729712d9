//! Core types and traits for the onSAT site widgets.
//!
//! This crate provides the foundation shared by every widget and host:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`] with WCAG contrast calculations
//! - Layout constraints: [`Constraints`]
//! - The [`Widget`] and [`Brick`] traits, plus [`RecordingCanvas`]
//! - Host frame scheduling: [`FrameScheduler`], [`FrameQueue`], [`FrameClock`]
//! - Viewport visibility tracking: [`VisibilityObserver`]

mod brick;
mod color;
mod constraints;
pub mod draw;
mod frame;
mod geometry;
mod visibility;
pub mod widget;

pub use brick::{
    escape_html, Brick, BrickAssertion, BrickBudget, BrickVerification,
};
pub use color::Color;
pub use constraints::Constraints;
pub use draw::{DrawCommand, RecordingCanvas};
pub use frame::{Frame, FrameClock, FrameHandle, FrameQueue, FrameScheduler};
pub use geometry::{Point, Rect, Size};
pub use visibility::{ObserverOptions, VisibilityEdge, VisibilityObserver, DEFAULT_THRESHOLD};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, TypeId, Widget, WidgetId,
};
