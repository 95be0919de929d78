//! Points and axis-aligned bounding boxes.
//!
//! The bounding box is accumulated incrementally while the layout engine
//! emits glyph vertices, then recentered so the box (and the geometry) is
//! symmetric about the origin. Scaling under an orthographic projection
//! zooms around the text's visual center only when this holds.

/// A 2D coordinate, used for vertex positions, UV corners, and box corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned box: lower-left `min`, upper-right `max`.
///
/// Invariant after layout: `min <= max` componentwise, and the box tightly
/// encloses every emitted vertex position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Lower-left corner.
    pub min: Point,
    /// Upper-right corner.
    pub max: Point,
}

impl BoundingBox {
    /// Seed a degenerate box from a single point.
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the box to include `p` (componentwise min/max).
    pub fn expand(self, p: Point) -> Self {
        Self {
            min: Point {
                x: self.min.x.min(p.x),
                y: self.min.y.min(p.y),
            },
            max: Point {
                x: self.max.x.max(p.x),
                y: self.max.y.max(p.y),
            },
        }
    }

    /// Shift both corners by `(dx, dy)`.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            min: Point { x: self.min.x + dx, y: self.min.y + dy },
            max: Point { x: self.max.x + dx, y: self.max.y + dy },
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Offset that moves a box whose lower-left sits at the origin so its
    /// center lands on the origin: `(-width/2, -height/2)`.
    pub fn center_offset(&self) -> Point {
        Point {
            x: -self.width() / 2.0,
            y: -self.height() / 2.0,
        }
    }

    /// A box with the same extents, symmetric about the origin. This is the
    /// algebraic inverse of any translation previously applied to the box.
    pub fn centered(&self) -> Self {
        let half = Point {
            x: self.width() / 2.0,
            y: self.height() / 2.0,
        };
        Self {
            min: Point { x: -half.x, y: -half.y },
            max: half,
        }
    }

    /// Whether `p` lies inside the box (inclusive). Used for click/hover
    /// hit-testing once the box has been translated to screen space.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_point_is_degenerate() {
        let b = BoundingBox::from_point(Point { x: 3.0, y: -1.0 });
        assert_eq!(b.min, b.max);
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 0.0);
    }

    #[test]
    fn test_expand_grows_both_corners() {
        let b = BoundingBox::from_point(Point { x: 0.0, y: 0.0 })
            .expand(Point { x: 5.0, y: -2.0 })
            .expand(Point { x: -1.0, y: 7.0 });
        assert_eq!(b.min, Point { x: -1.0, y: -2.0 });
        assert_eq!(b.max, Point { x: 5.0, y: 7.0 });
    }

    #[test]
    fn test_expand_inside_point_is_noop() {
        let b = BoundingBox::from_point(Point { x: 0.0, y: 0.0 })
            .expand(Point { x: 10.0, y: 10.0 });
        let same = b.expand(Point { x: 5.0, y: 5.0 });
        assert_eq!(b, same);
    }

    #[test]
    fn test_translate() {
        let b = BoundingBox {
            min: Point { x: -5.0, y: -10.0 },
            max: Point { x: 5.0, y: 10.0 },
        };
        let t = b.translate(100.0, 50.0);
        assert_eq!(t.min, Point { x: 95.0, y: 40.0 });
        assert_eq!(t.max, Point { x: 105.0, y: 60.0 });
        assert_eq!(t.width(), b.width());
        assert_eq!(t.height(), b.height());
    }

    #[test]
    fn test_center_offset() {
        let b = BoundingBox {
            min: Point { x: 0.0, y: 0.0 },
            max: Point { x: 10.0, y: 20.0 },
        };
        assert_eq!(b.center_offset(), Point { x: -5.0, y: -10.0 });
    }

    #[test]
    fn test_centered_recovers_origin_box() {
        let origin = BoundingBox {
            min: Point { x: -6.0, y: -4.0 },
            max: Point { x: 6.0, y: 4.0 },
        };
        // Whatever the box was translated by, centered() recovers it.
        let moved = origin.translate(123.0, -45.0);
        assert_eq!(moved.centered(), origin);
    }

    #[test]
    fn test_contains() {
        let b = BoundingBox {
            min: Point { x: 0.0, y: 0.0 },
            max: Point { x: 10.0, y: 10.0 },
        };
        assert!(b.contains(Point { x: 5.0, y: 5.0 }));
        assert!(b.contains(Point { x: 0.0, y: 10.0 })); // edges inclusive
        assert!(!b.contains(Point { x: -0.1, y: 5.0 }));
        assert!(!b.contains(Point { x: 5.0, y: 10.1 }));
    }
}
