// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial hash for tolerance-based point snapping.
//!
//! Uses a grid-based spatial hash for O(1) average-case lookups. Snapping a
//! point returns the earliest previously emitted point within tolerance,
//! which is the same result a linear scan over all emitted points gives.

use nalgebra::Point3;
use rustc_hash::FxHashMap;

/// Snaps near-duplicate points onto a single representative.
///
/// The grid divides space into cubic cells of side `tolerance`; lookups check
/// the 27 neighbouring cells (3x3x3 neighbourhood) for candidates.
#[derive(Debug)]
pub struct PointSnapper {
    tolerance: f64,
    cell_size: f64,
    points: Vec<Point3<f64>>,
    grid: FxHashMap<(i64, i64, i64), Vec<usize>>,
}

impl PointSnapper {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cell_size: tolerance.max(1e-10),
            points: Vec::new(),
            grid: FxHashMap::default(),
        }
    }

    /// Returns the representative for `point`, registering it as a new
    /// representative if none lies within tolerance.
    pub fn snap(&mut self, point: &Point3<f64>) -> Point3<f64> {
        if let Some(existing) = self.find_near(point) {
            return self.points[existing];
        }

        let index = self.points.len();
        self.points.push(*point);
        let cell = self.cell_coords(point);
        self.grid.entry(cell).or_default().push(index);
        *point
    }

    /// Snaps every point of a loop.
    pub fn snap_all(&mut self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.snap(p)).collect()
    }

    /// Number of distinct representatives emitted so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn find_near(&self, point: &Point3<f64>) -> Option<usize> {
        let (cx, cy, cz) = self.cell_coords(point);
        let tol_sq = self.tolerance * self.tolerance;
        let mut best: Option<usize> = None;

        // Search 3x3x3 neighborhood
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(indices) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) {
                        for &i in indices {
                            if (self.points[i] - point).norm_squared() <= tol_sq
                                && best.map_or(true, |b| i < b)
                            {
                                best = Some(i);
                            }
                        }
                    }
                }
            }
        }

        best
    }

    fn cell_coords(&self, point: &Point3<f64>) -> (i64, i64, i64) {
        (
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
            (point.z / self.cell_size).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_within_tolerance() {
        let mut snapper = PointSnapper::new(0.01);
        let a = snapper.snap(&Point3::new(0.0, 0.0, 0.0));
        let b = snapper.snap(&Point3::new(0.005, 0.0, 0.0));
        let c = snapper.snap(&Point3::new(5.0, 5.0, 0.0));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(snapper.len(), 2);
    }

    #[test]
    fn matches_across_cell_boundaries() {
        let mut snapper = PointSnapper::new(0.01);
        let a = snapper.snap(&Point3::new(0.0099, 0.0, 0.0));
        let b = snapper.snap(&Point3::new(0.0101, 0.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn earliest_representative_wins() {
        let mut snapper = PointSnapper::new(0.01);
        let first = snapper.snap(&Point3::new(0.0, 0.0, 0.0));
        let second = snapper.snap(&Point3::new(0.015, 0.0, 0.0));
        assert_ne!(first, second);

        // Within tolerance of both; linear-scan semantics pick the first
        let snapped = snapper.snap(&Point3::new(0.008, 0.0, 0.0));
        assert_eq!(snapped, first);
    }

    #[test]
    fn snap_all_preserves_order() {
        let mut snapper = PointSnapper::new(0.01);
        let loop_a = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        snapper.snap_all(&loop_a);

        let loop_b = snapper.snap_all(&[
            Point3::new(1.004, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 1.003, 0.0),
        ]);
        assert_eq!(loop_b[0], loop_a[1]);
        assert_eq!(loop_b[2], loop_a[2]);
        assert_eq!(snapper.len(), 4);
    }
}
