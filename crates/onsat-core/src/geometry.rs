//! Geometric primitives: Point, Size, Rect.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Calculate area.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A rectangle defined by position and size.
///
/// Coordinates follow the page convention: `y` grows downwards, so a
/// viewport scrolled by `s` pixels is `Rect::new(0.0, s, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f32,
    /// Y position of top-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the origin (top-left) point.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the area.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if this rectangle overlaps or touches another.
    ///
    /// Edge-adjacent rectangles count as touching, which is how the
    /// browser decides `isIntersecting` for a zero-threshold observer.
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Calculate intersection with another rectangle.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > x && bottom > y {
            Some(Self::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Fraction of this rectangle's area that lies inside `viewport`.
    ///
    /// Returns a value in `[0.0, 1.0]`. A zero-area rectangle is fully
    /// visible when it lies inside or on the edge of the viewport.
    #[must_use]
    pub fn visible_fraction(&self, viewport: &Self) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return if self.touches(viewport) { 1.0 } else { 0.0 };
        }

        self.intersection(viewport)
            .map_or(0.0, |overlap| (overlap.area() / area).clamp(0.0, 1.0))
    }

    /// Create a new rectangle offset by `dy` vertically.
    #[must_use]
    pub fn offset_y(&self, dy: f32) -> Self {
        Self::new(self.x, self.y + dy, self.width, self.height)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_default() {
        assert_eq!(Point::default(), Point::ORIGIN);
    }

    #[test]
    fn test_point_add_sub() {
        let p = Point::new(1.0, 2.0) + Point::new(3.0, 4.0);
        assert_eq!(p, Point::new(4.0, 6.0));
        assert_eq!(p - Point::new(4.0, 6.0), Point::ORIGIN);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.origin(), Point::new(10.0, 20.0));
        assert_eq!(r.size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn test_rect_intersection_none_when_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_rect_touches_edge() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.touches(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_visible_fraction_fully_inside() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let element = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(element.visible_fraction(&viewport), 1.0);
    }

    #[test]
    fn test_visible_fraction_half() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let element = Rect::new(0.0, 750.0, 100.0, 100.0);
        assert!((element.visible_fraction(&viewport) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_visible_fraction_outside() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let element = Rect::new(0.0, 900.0, 100.0, 100.0);
        assert_eq!(element.visible_fraction(&viewport), 0.0);
    }

    #[test]
    fn test_visible_fraction_zero_area() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(Rect::new(5.0, 800.0, 0.0, 0.0).visible_fraction(&viewport), 1.0);
        assert_eq!(Rect::new(5.0, 801.0, 0.0, 0.0).visible_fraction(&viewport), 0.0);
    }

    #[test]
    fn test_offset_y() {
        let r = Rect::new(0.0, 10.0, 5.0, 5.0).offset_y(-10.0);
        assert_eq!(r.y, 0.0);
    }
}
