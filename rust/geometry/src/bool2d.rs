// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Footprints and Surface Splitting
//!
//! This module wraps the i_overlay crate for the planar work of the
//! reconciliation algorithms: the union of a space's floor polygons, and the
//! intersection and differences of two facing surfaces flattened into a
//! common face frame.

use crate::error::{Error, Result};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Epsilon for floating point comparisons in 2D operations
#[cfg(test)]
const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Hole-cutting recursion limit for [`split_holes`].
const MAX_HOLE_SPLIT_DEPTH: usize = 8;

/// A planar region: counter-clockwise outer boundary and clockwise holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Region2D {
    pub outer: Vec<Point2<f64>>,
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Region2D {
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Outer area minus hole areas.
    pub fn area(&self) -> f64 {
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        compute_signed_area(&self.outer).abs() - holes
    }
}

/// Total area of a set of regions.
pub fn total_area(regions: &[Region2D]) -> f64 {
    regions.iter().map(Region2D::area).sum()
}

/// Union of a set of contours (non-zero fill, so overlapping inputs merge).
///
/// Each input contour is taken counter-clockwise. Returns one region per
/// connected component.
pub fn union_all(contours: &[Vec<Point2<f64>>]) -> Result<Vec<Region2D>> {
    let valid: Vec<Vec<[f64; 2]>> = contours
        .iter()
        .filter(|c| is_valid_contour(c))
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    let Some((first, rest)) = valid.split_first() else {
        return Err(Error::DegenerateInput(
            "union needs at least one contour with area".to_string(),
        ));
    };

    // Start with first contour as subject, all others as clip
    let subject = vec![first.clone()];
    let clip = rest.to_vec();

    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
    let regions = shapes_to_regions(&result);
    if regions.is_empty() {
        return Err(Error::EmptyResult);
    }
    Ok(regions)
}

/// Intersection `a ∩ b` of two simple contours.
pub fn intersection(a: &[Point2<f64>], b: &[Point2<f64>]) -> Result<Vec<Region2D>> {
    overlay_pair(a, b, OverlayRule::Intersect)
}

/// Difference `a − b` of two simple contours.
pub fn difference(a: &[Point2<f64>], b: &[Point2<f64>]) -> Result<Vec<Region2D>> {
    overlay_pair(a, b, OverlayRule::Difference)
}

fn overlay_pair(a: &[Point2<f64>], b: &[Point2<f64>], rule: OverlayRule) -> Result<Vec<Region2D>> {
    if !is_valid_contour(a) || !is_valid_contour(b) {
        return Err(Error::DegenerateInput(
            "boolean operands must have at least 3 vertices and non-zero area".to_string(),
        ));
    }

    let subject = vec![contour_to_path(&ensure_ccw(a))];
    let clip = vec![contour_to_path(&ensure_ccw(b))];
    let result = subject.overlay(&clip, rule, FillRule::EvenOdd);
    Ok(shapes_to_regions(&result))
}

/// Cuts a region with holes into hole-free pieces covering the same area.
///
/// Each hole is removed by splitting the region along the vertical line
/// through the hole's vertex centroid, which always crosses the hole.
pub fn split_holes(region: &Region2D) -> Result<Vec<Vec<Point2<f64>>>> {
    split_holes_inner(region, MAX_HOLE_SPLIT_DEPTH)
}

fn split_holes_inner(region: &Region2D, depth: usize) -> Result<Vec<Vec<Point2<f64>>>> {
    let Some(hole) = region.holes.first() else {
        return Ok(vec![region.outer.clone()]);
    };
    if depth == 0 {
        return Err(Error::Unresolved(format!(
            "region still has {} holes after {} cuts",
            region.holes.len(),
            MAX_HOLE_SPLIT_DEPTH
        )));
    }

    let cut_x = hole.iter().map(|p| p.x).sum::<f64>() / hole.len() as f64;
    let (min, max) = contour_bounds(&region.outer).ok_or(Error::EmptyResult)?;
    let pad = 1.0 + (max.x - min.x).max(max.y - min.y);

    let halves = [
        rectangle(min.x - pad, min.y - pad, cut_x, max.y + pad),
        rectangle(cut_x, min.y - pad, max.x + pad, max.y + pad),
    ];

    let subject = region_to_paths(region);
    let mut pieces = Vec::new();
    for half in halves {
        let clip = vec![contour_to_path(&half)];
        let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);
        for piece in shapes_to_regions(&shapes) {
            pieces.extend(split_holes_inner(&piece, depth - 1)?);
        }
    }
    Ok(pieces)
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        // Clockwise - reverse to make counter-clockwise
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area > 0.0 {
        // Counter-clockwise - reverse to make clockwise
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if contour.is_empty() {
        return None;
    }

    let mut min = contour[0];
    let mut max = contour[0];

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Counter-clockwise axis-aligned rectangle
pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert a region to i_overlay path format (outer ccw, holes cw)
fn region_to_paths(region: &Region2D) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(1 + region.holes.len());
    paths.push(contour_to_path(&ensure_ccw(&region.outer)));
    for hole in &region.holes {
        paths.push(contour_to_path(&ensure_cw(hole)));
    }
    paths
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Convert i_overlay result shapes to regions
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_regions(shapes: &[Vec<Vec<[f64; 2]>>]) -> Vec<Region2D> {
    let mut regions = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some((outer, holes)) = shape.split_first() else {
            continue;
        };
        let outer = path_to_contour(outer);
        if !is_valid_contour(&outer) {
            continue;
        }

        let holes = holes
            .iter()
            .map(|h| path_to_contour(h))
            .filter(|h| is_valid_contour(h))
            .map(|h| ensure_cw(&h))
            .collect();

        regions.push(Region2D {
            outer: ensure_ccw(&outer),
            holes,
        });
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2<f64>> {
        rectangle(x0, y0, x0 + size, y0 + size)
    }

    #[test]
    fn test_compute_signed_area_ccw() {
        let area = compute_signed_area(&square(0.0, 0.0, 1.0));
        assert!((area - 1.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_compute_signed_area_cw() {
        let cw: Vec<_> = square(0.0, 0.0, 1.0).into_iter().rev().collect();
        let area = compute_signed_area(&cw);
        assert!((area + 1.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_ensure_ccw() {
        let cw: Vec<_> = square(0.0, 0.0, 1.0).into_iter().rev().collect();
        let ccw = ensure_ccw(&cw);
        assert!(compute_signed_area(&ccw) > 0.0);
    }

    #[test]
    fn test_is_valid_contour() {
        assert!(is_valid_contour(&square(0.0, 0.0, 1.0)));

        // Degenerate (all points collinear)
        let degenerate = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(!is_valid_contour(&degenerate));

        // Too few points
        let too_few = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(!is_valid_contour(&too_few));
    }

    #[test]
    fn test_union_overlapping_squares() {
        let result = union_all(&[square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].holes.is_empty());
        assert_relative_eq!(result[0].area(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_edge_sharing_squares() {
        let result = union_all(&[square(0.0, 0.0, 3.0), square(3.0, 0.0, 3.0)]).unwrap();
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_disjoint_squares() {
        let result = union_all(&[square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_union_frame_has_hole() {
        let frame = vec![
            rectangle(0.0, 0.0, 3.0, 1.0),
            rectangle(2.0, 0.0, 3.0, 3.0),
            rectangle(0.0, 2.0, 3.0, 3.0),
            rectangle(0.0, 0.0, 1.0, 3.0),
        ];
        let result = union_all(&frame).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes.len(), 1);
        assert!(compute_signed_area(&result[0].holes[0]) < 0.0);
        assert_relative_eq!(result[0].area(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_rejects_empty_input() {
        assert!(matches!(union_all(&[]), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_intersection_and_difference() {
        let a = rectangle(0.0, 0.0, 4.0, 2.0);
        let b = rectangle(2.0, 0.0, 6.0, 2.0);

        let inter = intersection(&a, &b).unwrap();
        assert_eq!(inter.len(), 1);
        assert_relative_eq!(total_area(&inter), 4.0, epsilon = 1e-9);

        let rest = difference(&a, &b).unwrap();
        assert_relative_eq!(total_area(&rest), 4.0, epsilon = 1e-9);

        let disjoint = intersection(&a, &rectangle(10.0, 0.0, 11.0, 1.0)).unwrap();
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_difference_of_contained_square_has_hole() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(4.0, 4.0, 2.0);
        let rest = difference(&outer, &inner).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].holes.len(), 1);
        assert_relative_eq!(rest[0].area(), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_split_holes_conserves_area() {
        let region = Region2D {
            outer: square(0.0, 0.0, 10.0),
            holes: vec![ensure_cw(&square(4.0, 4.0, 2.0))],
        };
        let pieces = split_holes(&region).unwrap();
        assert!(pieces.len() >= 2);
        let area: f64 = pieces.iter().map(|p| compute_signed_area(p).abs()).sum();
        assert_relative_eq!(area, 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_split_holes_without_holes_is_identity() {
        let region = Region2D::new(square(0.0, 0.0, 1.0));
        assert_eq!(split_holes(&region).unwrap(), vec![region.outer.clone()]);
    }
}
