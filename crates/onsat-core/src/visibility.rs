//! Viewport visibility tracking.
//!
//! [`VisibilityObserver`] mirrors the browser's `IntersectionObserver` for a
//! single element: feed it the element and viewport rectangles whenever
//! either moves, and it reports threshold crossings. With trigger-once
//! enabled it reports the first entry and then detaches itself.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Default fraction of an element that must be on screen.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Fraction of the element's area that must be inside the viewport.
    pub threshold: f32,
    /// Stop observing after the first entry.
    pub trigger_once: bool,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            trigger_once: true,
        }
    }
}

impl ObserverOptions {
    /// Options with the given threshold, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Enable or disable trigger-once.
    #[must_use]
    pub const fn trigger_once(mut self, once: bool) -> Self {
        self.trigger_once = once;
        self
    }

    /// Decide whether an element meets the threshold in this viewport.
    ///
    /// A zero threshold accepts an element that only touches the viewport.
    #[must_use]
    pub fn is_visible(&self, element: &Rect, viewport: &Rect) -> bool {
        if !element.touches(viewport) {
            return false;
        }
        let threshold = self.threshold.clamp(0.0, 1.0);
        threshold <= 0.0 || element.visible_fraction(viewport) >= threshold
    }
}

/// A threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEdge {
    /// The element became visible
    Entered,
    /// The element stopped being visible
    Exited,
}

/// Edge-triggered visibility observer for one element.
#[derive(Debug, Clone)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    visible: bool,
    detached: bool,
    entries: u32,
}

impl Default for VisibilityObserver {
    fn default() -> Self {
        Self::new(ObserverOptions::default())
    }
}

impl VisibilityObserver {
    /// Create an observer.
    #[must_use]
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            visible: false,
            detached: false,
            entries: 0,
        }
    }

    /// Observer options.
    #[must_use]
    pub const fn options(&self) -> ObserverOptions {
        self.options
    }

    /// Whether the observer has stopped observing.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    /// Number of `Entered` edges reported so far.
    #[must_use]
    pub const fn entries(&self) -> u32 {
        self.entries
    }

    /// Stop observing. Later observations report nothing.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Observe the element's position relative to the viewport.
    ///
    /// Returns the edge crossed since the previous observation, if any. The
    /// first observation of an already visible element reports `Entered`.
    pub fn observe(&mut self, element: &Rect, viewport: &Rect) -> Option<VisibilityEdge> {
        if self.detached {
            return None;
        }

        let visible = self.options.is_visible(element, viewport);
        let edge = match (self.visible, visible) {
            (false, true) => Some(VisibilityEdge::Entered),
            (true, false) => Some(VisibilityEdge::Exited),
            _ => None,
        };
        self.visible = visible;

        if edge == Some(VisibilityEdge::Entered) {
            self.entries += 1;
            if self.options.trigger_once {
                self.detach();
            }
        }
        edge
    }
}
