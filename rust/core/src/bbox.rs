// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes, used as an O(1) pre-filter before pairwise
//! surface work between spaces.

use nalgebra::Point3;

/// An axis-aligned box in building coordinates. Starts empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl BoundingBox {
    /// Creates an empty box.
    pub fn new() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Creates a box enclosing all points.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut bbox = Self::new();
        bbox.add_points(points);
        bbox
    }

    pub fn add_point(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn add_points(&mut self, points: &[Point3<f64>]) {
        for p in points {
            self.add_point(p);
        }
    }

    /// Returns `true` if no point was added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Minimum corner, or `None` for an empty box.
    pub fn min(&self) -> Option<Point3<f64>> {
        (!self.is_empty()).then_some(self.min)
    }

    /// Maximum corner, or `None` for an empty box.
    pub fn max(&self) -> Option<Point3<f64>> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Returns `true` if the two boxes overlap or lie within `tolerance` of
    /// each other on every axis. Empty boxes intersect nothing.
    pub fn intersects(&self, other: &BoundingBox, tolerance: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
            && self.min.z <= other.max.z + tolerance
            && other.min.z <= self.max.z + tolerance
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_intersects_nothing() {
        let empty = BoundingBox::new();
        let unit = BoundingBox::from_points(&[Point3::origin(), Point3::new(1.0, 1.0, 1.0)]);
        assert!(empty.is_empty());
        assert!(empty.min().is_none());
        assert!(!empty.intersects(&unit, 0.01));
        assert!(!unit.intersects(&empty, 0.01));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = BoundingBox::from_points(&[Point3::origin(), Point3::new(3.0, 3.0, 3.0)]);
        let b = BoundingBox::from_points(&[Point3::new(3.0, 0.0, 0.0), Point3::new(6.0, 3.0, 3.0)]);
        assert!(a.intersects(&b, 0.0));
    }

    #[test]
    fn gap_within_tolerance_intersects() {
        let a = BoundingBox::from_points(&[Point3::origin(), Point3::new(1.0, 1.0, 1.0)]);
        let b = BoundingBox::from_points(&[Point3::new(1.005, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)]);
        assert!(a.intersects(&b, 0.01));
        assert!(!a.intersects(&b, 0.001));
    }

    #[test]
    fn accumulates_extremes() {
        let mut bbox = BoundingBox::new();
        bbox.add_point(&Point3::new(1.0, -2.0, 3.0));
        bbox.add_point(&Point3::new(-1.0, 5.0, 0.0));
        assert_eq!(bbox.min(), Some(Point3::new(-1.0, -2.0, 0.0)));
        assert_eq!(bbox.max(), Some(Point3::new(1.0, 5.0, 3.0)));
    }
}
