// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric tolerances shared by the reconciliation algorithms.

/// Distance under which two points are the same point (model length units).
pub const POINT_TOLERANCE: f64 = 0.01;

/// Maximum z deviation between floor vertices of one space.
pub const PLANARITY_TOLERANCE: f64 = 0.01;

/// Two outward normals whose dot product is at or below this value face each
/// other (about 11° off exactly opposite).
pub const OPPOSITE_NORMAL_DOT: f64 = -0.98;

/// Polygons below this area are treated as slivers and dropped.
pub const MIN_AREA: f64 = 1e-6;

/// Safety net for the surface intersection fixed-point loop.
pub const MAX_INTERSECTION_PASSES: usize = 1000;

/// Tolerances used by footprint extraction, matching, intersection and
/// skylight placement.
///
/// ```
/// use bem_lite_core::Tolerances;
///
/// let tol = Tolerances::default().with_point(0.001);
/// assert_eq!(tol.point, 0.001);
/// assert_eq!(tol.opposite_normal_dot, -0.98);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    /// Coincidence distance for vertices (snapping, circular equality, coplanarity).
    pub point: f64,
    /// Allowed z spread of the floor surfaces of one space.
    pub planarity: f64,
    /// Maximum dot product of two normals considered opposite.
    pub opposite_normal_dot: f64,
    /// Maximum distance of a vertex from the line through its neighbours for
    /// it to be dropped as collinear.
    pub collinear: f64,
    /// Minimum polygon area kept by boolean operations.
    pub min_area: f64,
    /// Upper bound on intersection passes per space pair.
    pub max_intersection_passes: usize,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            point: POINT_TOLERANCE,
            planarity: PLANARITY_TOLERANCE,
            opposite_normal_dot: OPPOSITE_NORMAL_DOT,
            collinear: POINT_TOLERANCE,
            min_area: MIN_AREA,
            max_intersection_passes: MAX_INTERSECTION_PASSES,
        }
    }
}

impl Tolerances {
    pub fn with_point(mut self, point: f64) -> Self {
        self.point = point;
        self
    }

    pub fn with_planarity(mut self, planarity: f64) -> Self {
        self.planarity = planarity;
        self
    }

    pub fn with_opposite_normal_dot(mut self, dot: f64) -> Self {
        self.opposite_normal_dot = dot;
        self
    }

    pub fn with_collinear(mut self, collinear: f64) -> Self {
        self.collinear = collinear;
        self
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    pub fn with_max_intersection_passes(mut self, passes: usize) -> Self {
        self.max_intersection_passes = passes;
        self
    }
}
