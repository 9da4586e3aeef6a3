// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon helpers on vertex loops.
//!
//! A polygon is an implicitly closed `[Point3<f64>]` loop. Its outward normal
//! follows the right-hand rule relative to the vertex winding.

use nalgebra::{Point3, Vector3};

/// Computes the unit normal of a vertex loop using Newell's method.
///
/// Works for any planar polygon (convex or concave). Returns `None` for
/// fewer than three vertices or a zero-area loop.
pub fn newell_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let normal = newell_vector(points)?;
    let len = normal.norm();
    if len < 1e-12 {
        return None; // degenerate polygon
    }
    Some(normal / len)
}

/// Area of a planar vertex loop.
pub fn area(points: &[Point3<f64>]) -> f64 {
    newell_vector(points).map(|n| n.norm() / 2.0).unwrap_or(0.0)
}

fn newell_vector(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }

    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    let n = points.len();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    Some(normal)
}

/// Returns the loop with its winding reversed.
pub fn reversed(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    points.iter().rev().copied().collect()
}

/// Returns `true` if both loops describe the same polygon up to a cyclic
/// shift of the starting vertex, every vertex pair within `tolerance`.
pub fn circular_equal(a: &[Point3<f64>], b: &[Point3<f64>], tolerance: f64) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }

    let n = a.len();
    let tol_sq = tolerance * tolerance;
    (0..n).any(|offset| {
        (0..n).all(|i| (a[i] - b[(i + offset) % n]).norm_squared() <= tol_sq)
    })
}

/// Removes vertices lying within `tolerance` of the line through their two
/// neighbours, including duplicates and back-tracking spikes.
///
/// Vertex order is otherwise preserved.
pub fn remove_collinear(points: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    let mut result = points.to_vec();
    while result.len() >= 3 {
        let n = result.len();
        let redundant = (0..n).find(|&i| {
            is_redundant(&result[(i + n - 1) % n], &result[i], &result[(i + 1) % n], tolerance)
        });
        match redundant {
            Some(i) => {
                result.remove(i);
            }
            None => break,
        }
    }
    result
}

fn is_redundant(prev: &Point3<f64>, curr: &Point3<f64>, next: &Point3<f64>, tolerance: f64) -> bool {
    let base = next - prev;
    let len = base.norm();
    if len <= tolerance {
        return true;
    }
    base.cross(&(curr - prev)).norm() / len <= tolerance
}

/// Rotates the loop so it starts at its upper-left vertex: largest y, ties
/// (within `tolerance`) broken by smallest x.
pub fn reorder_upper_left(points: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    if points.is_empty() {
        return Vec::new();
    }

    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let mut start = 0;
    let mut best_x = f64::INFINITY;
    for (i, p) in points.iter().enumerate() {
        if max_y - p.y <= tolerance && p.x < best_x {
            best_x = p.x;
            start = i;
        }
    }

    let mut result = Vec::with_capacity(points.len());
    result.extend_from_slice(&points[start..]);
    result.extend_from_slice(&points[..start]);
    result
}

/// Collinear removal, upper-left reordering, then collinear removal again at
/// the new seam. Deterministic for a given input.
pub fn canonicalize(points: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    let cleaned = remove_collinear(points, tolerance);
    let reordered = reorder_upper_left(&cleaned, tolerance);
    remove_collinear(&reordered, tolerance)
}

/// Returns `true` if no three consecutive vertices are collinear within
/// `tolerance`.
pub fn is_collinear_free(points: &[Point3<f64>], tolerance: f64) -> bool {
    let n = points.len();
    n >= 3
        && (0..n).all(|i| {
            !is_redundant(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n], tolerance)
        })
}

/// A planar polygon with an outer loop and zero or more hole loops.
///
/// Holes wind opposite to the outer loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonWithHoles {
    pub outer: Vec<Point3<f64>>,
    pub holes: Vec<Vec<Point3<f64>>>,
}

impl PolygonWithHoles {
    pub fn new(outer: Vec<Point3<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.outer.len() < 3
    }

    /// Outer area minus hole areas.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| area(h)).sum();
        (area(&self.outer) - holes).max(0.0)
    }

    /// Single-loop form for consumers without hole support: the outer loop,
    /// then for each hole a repeated copy of the outer loop's last vertex
    /// followed by the hole's vertices.
    pub fn flatten_bridged(&self) -> Vec<Point3<f64>> {
        let mut result = self.outer.clone();
        let Some(&bridge) = self.outer.last() else {
            return result;
        };
        for hole in &self.holes {
            result.push(bridge);
            result.extend_from_slice(hole);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(size, 0.0, 0.0),
            Point3::new(size, size, 0.0),
            Point3::new(0.0, size, 0.0),
        ]
    }

    #[test]
    fn newell_normal_follows_winding() {
        let ccw = square(1.0);
        assert_relative_eq!(newell_normal(&ccw).unwrap(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(
            newell_normal(&reversed(&ccw)).unwrap(),
            -Vector3::z(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn degenerate_has_no_normal() {
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(newell_normal(&line).is_none());
        assert!(newell_normal(&line[..2]).is_none());
        assert_eq!(area(&line), 0.0);
    }

    #[test]
    fn area_of_square() {
        assert_relative_eq!(area(&square(3.0)), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn circular_equality_ignores_start_vertex() {
        let a = square(1.0);
        let mut b = a.clone();
        b.rotate_left(2);
        b[0].x += 0.005;

        assert!(circular_equal(&a, &b, 0.01));
        assert!(!circular_equal(&a, &b, 0.001));
        assert!(!circular_equal(&a, &reversed(&a), 0.01));
        assert!(!circular_equal(&a, &a[..3], 0.01));
    }

    #[test]
    fn collinear_points_removed() {
        let contour = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0), // collinear
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(10.0, 10.0, 0.0), // duplicate
            Point3::new(0.0, 10.0, 0.0),
        ];
        let cleaned = remove_collinear(&contour, 0.01);
        assert_eq!(cleaned.len(), 4);
        assert!(is_collinear_free(&cleaned, 0.01));
    }

    #[test]
    fn reorder_starts_upper_left() {
        let reordered = reorder_upper_left(&square(2.0), 0.01);
        assert_eq!(reordered[0], Point3::new(0.0, 2.0, 0.0));
        assert_eq!(reordered[1], Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn canonicalize_removes_seam_collinearity() {
        // Start vertex sits in the middle of the bottom edge
        let contour = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let canonical = canonicalize(&contour, 0.01);
        assert_eq!(canonical.len(), 4);
        assert_eq!(canonical[0], Point3::new(0.0, 2.0, 0.0));
        assert_eq!(canonicalize(&canonical, 0.01), canonical);
    }

    #[test]
    fn flatten_bridged_repeats_last_outer_vertex() {
        let outer = square(10.0);
        let hole = reversed(&[
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(6.0, 4.0, 0.0),
            Point3::new(6.0, 6.0, 0.0),
            Point3::new(4.0, 6.0, 0.0),
        ]);
        let poly = PolygonWithHoles {
            outer: outer.clone(),
            holes: vec![hole.clone()],
        };

        let flat = poly.flatten_bridged();
        assert_eq!(flat.len(), 4 + 1 + 4);
        assert_eq!(flat[4], outer[3]);
        assert_eq!(&flat[5..], hole.as_slice());
        assert_relative_eq!(poly.area(), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_polygon_flattens_to_nothing() {
        let poly = PolygonWithHoles::empty();
        assert!(poly.is_empty());
        assert!(poly.flatten_bridged().is_empty());
    }
}
