//! Planar geometry used by the generator: points and axis-aligned regions.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::rng::RngExt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Component-wise partial order: `a >= b` only when both coordinates of `a`
/// are at least those of `b`. Points that are greater on one axis and smaller
/// on the other are incomparable.
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.x == other.x && self.y == other.y {
            Some(Ordering::Equal)
        } else if self.x >= other.x && self.y >= other.y {
            Some(Ordering::Greater)
        } else if self.x <= other.x && self.y <= other.y {
            Some(Ordering::Less)
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle spanned by two opposite corners in any order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    p1: Point,
    p2: Point,
}

impl Region {
    /// Region anchored at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self::from_corners(Point::new(0.0, 0.0), Point::new(width, height))
    }

    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Self::from_corners(origin, Point::new(origin.x + width, origin.y + height))
    }

    pub fn width(&self) -> f64 {
        (self.p1.x - self.p2.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.p1.y - self.p2.y).abs()
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.p1.x.min(self.p2.x), self.p1.y.min(self.p2.y))
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.p1.x.max(self.p2.x), self.p1.y.max(self.p2.y))
    }

    pub fn center(&self) -> Point {
        let tl = self.top_left();
        Point::new(tl.x + self.width() / 2.0, tl.y + self.height() / 2.0)
    }

    /// Split into `horizontal * vertical` cells, rows outer and columns inner,
    /// so index `row * horizontal + column` addresses a cell.
    pub fn subdivide(&self, horizontal: usize, vertical: usize) -> Vec<Region> {
        let width = self.width();
        let height = self.height();
        let origin = self.top_left();
        let cols = horizontal as f64;
        let rows = vertical as f64;

        let mut cells = Vec::with_capacity(horizontal * vertical);
        for row in 0..vertical {
            for col in 0..horizontal {
                let (c, r) = (col as f64, row as f64);
                cells.push(Region::from_corners(
                    Point::new(
                        width * c / cols + origin.x,
                        height * r / rows + origin.y,
                    ),
                    Point::new(
                        width * (c + 1.0) / cols + origin.x,
                        height * (r + 1.0) / rows + origin.y,
                    ),
                ));
            }
        }
        cells
    }

    pub fn get_location(&self, location: Location) -> Region {
        let cells = self.subdivide(3, 3);
        assert_eq!(cells.len(), 9, "3x3 subdivision must yield nine cells");
        cells[location.index()]
    }

    /// Closed containment: points on the boundary are inside.
    pub fn contains(&self, p: Point) -> bool {
        p >= self.top_left() && p <= self.bottom_right()
    }

    pub fn choose_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let min = self.top_left();
        let max = self.bottom_right();
        let x = rng.uniform_f64(min.x, max.x);
        let y = rng.uniform_f64(min.y, max.y);
        Point::new(x, y)
    }

    /// Map a point of this region onto the same relative position in a
    /// `width x height` space anchored at the origin.
    pub fn rescale(&self, p: Point, width: f64, height: f64) -> Point {
        let origin = self.top_left();
        let sx = if self.width() > 0.0 { width / self.width() } else { 0.0 };
        let sy = if self.height() > 0.0 { height / self.height() } else { 0.0 };
        Point::new((p.x - origin.x) * sx, (p.y - origin.y) * sy)
    }
}
