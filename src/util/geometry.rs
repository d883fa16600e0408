// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Rectangles live in overlay-surface pixel coordinates, with the origin at
//! the top-left corner of the video frame. Extents are signed: a negative
//! width or height records a drag toward the origin.

use serde::{Deserialize, Serialize};

/// A point on the overlay surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at `(x, y)` with signed extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The corner opposite to the anchor.
    pub fn far_corner(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// The same area expressed with a top-left anchor and non-negative extents.
    pub fn normalized(&self) -> Rect {
        let far = self.far_corner();
        Rect {
            x: self.x.min(far.x),
            y: self.y.min(far.y),
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }
}

/// Build the rectangle spanned by a drag from `start` to `current`.
///
/// No clamping or sign normalization is applied.
pub fn rect_from_drag(start: Point, current: Point) -> Rect {
    Rect {
        x: start.x,
        y: start.y,
        width: current.x - start.x,
        height: current.y - start.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_toward_bottom_right() {
        let rect = rect_from_drag(Point::new(10.0, 10.0), Point::new(50.0, 40.0));
        assert_eq!(rect, Rect::new(10.0, 10.0, 40.0, 30.0));
    }

    #[test]
    fn test_drag_toward_origin_keeps_sign() {
        let rect = rect_from_drag(Point::new(50.0, 40.0), Point::new(10.0, 45.0));
        assert_eq!(rect.x, 50.0);
        assert_eq!(rect.y, 40.0);
        assert_eq!(rect.width, -40.0);
        assert_eq!(rect.height, 5.0);
    }

    #[test]
    fn test_normalized_flips_negative_extents() {
        let rect = Rect::new(50.0, 40.0, -40.0, -30.0);
        assert_eq!(rect.normalized(), Rect::new(10.0, 10.0, 40.0, 30.0));

        // Already normalized rectangles are untouched
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.normalized(), rect);
    }
}
