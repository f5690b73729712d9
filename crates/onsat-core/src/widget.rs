//! Widget trait and related types.
//!
//! Widgets follow a verify-measure-layout-paint cycle:
//!
//! 1. **Verify**: Check all Brick assertions pass
//! 2. **Measure**: Compute intrinsic size given constraints
//! 3. **Layout**: Position self and children within allocated bounds
//! 4. **Paint**: Generate draw commands for rendering (only if verified)
//!
//! # Examples
//!
//! ```
//! use onsat_core::{TypeId, WidgetId};
//!
//! let id = WidgetId::new(42);
//! assert_eq!(id.0, 42);
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//! ```

use crate::brick::Brick;
use crate::color::Color;
use crate::constraints::Constraints;
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Unique identifier for a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Create a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
///
/// Widget requires [`Brick`], so every widget carries assertions that must
/// hold before it paints and can render itself to HTML/CSS.
pub trait Widget: Brick + Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position children within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Get child widgets for tree traversal.
    fn children(&self) -> &[Box<dyn Widget>];

    /// Get mutable child widgets.
    fn children_mut(&mut self) -> &mut [Box<dyn Widget>];

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Canvas trait for paint operations.
///
/// A minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);
}

/// Text style for rendering.
///
/// ```
/// use onsat_core::{Color, FontWeight, TextStyle};
///
/// let style = TextStyle::default();
/// assert_eq!(style.size, 16.0);
///
/// let number = TextStyle {
///     size: 48.0,
///     color: Color::WHITE,
///     weight: FontWeight::Bold,
/// };
/// assert_eq!(number.weight, FontWeight::Bold);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Normal (400)
    Normal,
    /// Semibold (600)
    Semibold,
    /// Bold (700)
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    #[must_use]
    pub const fn css_weight(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::Semibold => 600,
            Self::Bold => 700,
        }
    }
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Heading
    Heading,
    /// Live region announcing changing values
    Status,
    /// Section landmark
    Region,
}
