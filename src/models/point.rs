/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale both coordinates by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Translate point by (dx, dy)
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing every point, or `None` for an empty slice.
    ///
    /// Edges are rounded outward so that the rectangle never clips a corner.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let left = min_x.floor();
        let top = min_y.floor();
        Some(Self {
            x: left as i32,
            y: top as i32,
            width: (max_x.ceil() - left).max(0.0) as u32,
            height: (max_y.ceil() - top).max(0.0) as u32,
        })
    }

    /// True when the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A polygon is degenerate when it cannot describe a 2D region: fewer than
/// three corners, or all corners on one horizontal/vertical line.
pub fn is_degenerate(polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return true;
    }
    Rect::enclosing(polygon).is_none_or(|r| r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_rect() {
        let pts = [
            Point::new(10.2, 5.0),
            Point::new(30.0, 4.6),
            Point::new(29.5, 20.1),
            Point::new(9.9, 19.0),
        ];
        let r = Rect::enclosing(&pts).unwrap();
        assert_eq!(r.x, 9);
        assert_eq!(r.y, 4);
        assert_eq!(r.width, 21);
        assert_eq!(r.height, 17);
        assert!(Rect::enclosing(&[]).is_none());
    }

    #[test]
    fn test_degenerate_polygons() {
        assert!(is_degenerate(&[]));
        // 1D readers report a scan line: two points, no height
        assert!(is_degenerate(&[Point::new(0.0, 10.0), Point::new(50.0, 10.0)]));
        assert!(is_degenerate(&[
            Point::new(0.0, 10.0),
            Point::new(25.0, 10.0),
            Point::new(50.0, 10.0),
        ]));
        assert!(!is_degenerate(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]));
    }

    #[test]
    fn test_scaled_point() {
        let p = Point::new(20.0, 8.0).scaled(0.5);
        assert_eq!(p, Point::new(10.0, 4.0));
        assert_eq!(p.translate(3.0, -4.0), Point::new(13.0, 0.0));
    }
}
