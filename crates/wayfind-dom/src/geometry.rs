//! Geometry APIs
//!
//! DOMRect, viewport state and scroll options.

use serde::{Deserialize, Serialize};

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create from an origin and a size
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::from_xywh(origin.x, origin.y, size.width, size.height)
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the box has no area (not laid out or collapsed)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow the rect by `pad` on every side
    pub fn inflate(&self, pad: f64) -> DOMRect {
        DOMRect::from_xywh(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// Move the rect by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Point in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, scroll_x: 0.0, scroll_y: 0.0 }
    }

    /// True when `rect` lies entirely beyond one of the viewport edges
    pub fn is_fully_outside(&self, rect: &DOMRect) -> bool {
        rect.right() < 0.0 ||
        rect.left() > self.width ||
        rect.bottom() < 0.0 ||
        rect.top() > self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Scroll behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.center_x(), 60.0);
        assert_eq!(rect.center_y(), 45.0);
    }

    #[test]
    fn test_inflate() {
        let rect = DOMRect::from_xywh(10.0, 10.0, 20.0, 20.0).inflate(8.0);
        assert_eq!(rect, DOMRect::from_xywh(2.0, 2.0, 36.0, 36.0));
    }

    #[test]
    fn test_fully_outside() {
        let vp = Viewport::new(800.0, 600.0);

        assert!(vp.is_fully_outside(&DOMRect::from_xywh(0.0, 700.0, 50.0, 50.0)));
        assert!(vp.is_fully_outside(&DOMRect::from_xywh(-100.0, 10.0, 50.0, 50.0)));
        // Partially visible is not outside
        assert!(!vp.is_fully_outside(&DOMRect::from_xywh(-25.0, 10.0, 50.0, 50.0)));
        assert!(!vp.is_fully_outside(&DOMRect::from_xywh(100.0, 100.0, 50.0, 50.0)));
    }
}
