//! Irregular terrain blobs built from a handful of random circles.

use rand::Rng;
use serde::Serialize;

use crate::geometry::{Point, Region};
use crate::rng::RngExt;

pub const MIN_CIRCLES: usize = 3;
pub const MAX_CIRCLES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.distance(&self.center) <= self.radius
    }
}

/// Union of disks. A point is inside when any circle covers it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    circles: Vec<Circle>,
}

impl Shape {
    /// Draws the circle count, then each circle's center and radius, from
    /// `rng` in that order. Radii never exceed the region's shorter side.
    pub fn generate<R: Rng + ?Sized>(region: &Region, rng: &mut R) -> Self {
        let max_radius = region.width().min(region.height());
        let count = rng.gen_range(MIN_CIRCLES..=MAX_CIRCLES);

        let mut circles = Vec::with_capacity(count);
        for _ in 0..count {
            let center = region.choose_point(rng);
            let radius = rng.uniform_f64(0.0, max_radius);
            circles.push(Circle::new(center, radius));
        }
        Self { circles }
    }

    pub fn from_circles(circles: Vec<Circle>) -> Self {
        Self { circles }
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn contains(&self, p: Point) -> bool {
        self.circles.iter().any(|circle| circle.contains(p))
    }
}
