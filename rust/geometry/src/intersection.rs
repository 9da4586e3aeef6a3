// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface intersection between two spaces.
//!
//! Partially overlapping, facing surfaces of two spaces are split along the
//! overlap boundary so both sides end up with one piece that covers exactly
//! the shared region (which [`match_surfaces`](crate::match_surfaces) can
//! then link) plus the leftover pieces.
//!
//! The search is a fixed-point iteration: every pass tests each untested
//! candidate pair, splits the ones that overlap, and appends the new pieces to
//! the working lists for the next pass. A pair that did not overlap stays
//! non-overlapping forever (splitting only shrinks surfaces), so tested pairs
//! are memoized by their key pair.

use std::ops::AddAssign;

use bem_lite_core::keys::unordered_pair;
use bem_lite_core::polygon::{self, newell_normal, remove_collinear, reversed};
use bem_lite_core::{
    BoundingBox, BuildingModel, Error as ModelError, SpaceKey, SurfaceKey, Tolerances, Transform,
};
use nalgebra::{Point2, Point3};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::bool2d::{self, Region2D};
use crate::error::{Error, Result};

/// Relative slack allowed between a surface's area and the summed area of
/// its pieces.
const AREA_CONSERVATION_TOLERANCE: f64 = 1e-6;

type Pieces = SmallVec<[Vec<Point3<f64>>; 4]>;

/// Outcome of [`intersect_surfaces`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntersectionReport {
    /// Passes run, including the final pass that found nothing to split.
    pub passes: usize,
    /// Surfaces created in the first space.
    pub new_surfaces_a: usize,
    /// Surfaces created in the second space.
    pub new_surfaces_b: usize,
}

impl IntersectionReport {
    pub fn new_surfaces(&self) -> usize {
        self.new_surfaces_a + self.new_surfaces_b
    }
}

impl AddAssign for IntersectionReport {
    fn add_assign(&mut self, rhs: Self) {
        self.passes += rhs.passes;
        self.new_surfaces_a += rhs.new_surfaces_a;
        self.new_surfaces_b += rhs.new_surfaces_b;
    }
}

/// Pieces replacing one candidate pair, in each side's local frame. The
/// shared piece comes first on both sides.
struct PairSplit {
    a: Pieces,
    b: Pieces,
}

/// Splits the partially overlapping surfaces of `a` and `b` until every
/// facing overlap between them is covered by a pair of coincident pieces.
///
/// Surfaces with sub-surfaces or an adjacent surface are not candidates.
/// Fully coincident pairs are left for matching. Pairs that cannot be
/// resolved numerically are treated as not overlapping.
pub fn intersect_surfaces(
    model: &mut BuildingModel,
    a: SpaceKey,
    b: SpaceKey,
    tol: &Tolerances,
) -> IntersectionReport {
    let mut report = IntersectionReport::default();
    if a == b {
        return report;
    }
    let Some(b_in_a) = model.relative_transform(b, a) else {
        warn!(a = ?a, b = ?b, "cannot intersect surfaces of unknown space");
        return report;
    };

    let mut surfaces_a = model.space_surfaces(a).to_vec();
    let mut surfaces_b = model.space_surfaces(b).to_vec();
    let mut tested: FxHashSet<(SurfaceKey, SurfaceKey)> = FxHashSet::default();

    loop {
        if report.passes >= tol.max_intersection_passes {
            warn!(
                a = ?a,
                b = ?b,
                passes = report.passes,
                "surface intersection stopped at the pass limit"
            );
            break;
        }
        report.passes += 1;

        let mut new_a: SmallVec<[SurfaceKey; 8]> = SmallVec::new();
        let mut new_b: SmallVec<[SurfaceKey; 8]> = SmallVec::new();

        for &sa in &surfaces_a {
            if !is_candidate(model, sa) {
                continue;
            }
            for &sb in &surfaces_b {
                if !is_candidate(model, sb) || !tested.insert(unordered_pair(sa, sb)) {
                    continue;
                }
                let Some(split) = split_pair(model, sa, sb, &b_in_a, tol) else {
                    continue;
                };
                match apply_split(model, sa, sb, split) {
                    Ok((created_a, created_b)) => {
                        trace!(
                            surface_a = ?sa,
                            surface_b = ?sb,
                            pieces_a = created_a.len() + 1,
                            pieces_b = created_b.len() + 1,
                            "split overlapping surfaces"
                        );
                        new_a.extend(created_a);
                        new_b.extend(created_b);
                    }
                    Err(err) => warn!(error = %err, "failed to apply surface split"),
                }
            }
        }

        if new_a.is_empty() && new_b.is_empty() {
            break;
        }
        report.new_surfaces_a += new_a.len();
        report.new_surfaces_b += new_b.len();
        surfaces_a.extend(new_a);
        surfaces_b.extend(new_b);
    }

    debug!(
        a = ?a,
        b = ?b,
        passes = report.passes,
        new_a = report.new_surfaces_a,
        new_b = report.new_surfaces_b,
        "intersected surfaces"
    );
    report
}

fn is_candidate(model: &BuildingModel, surface: SurfaceKey) -> bool {
    model
        .surface(surface)
        .is_some_and(|s| s.sub_surfaces().is_empty() && s.adjacent_surface().is_none())
}

/// Writes both sides of a split. A side with a single piece still takes it,
/// so the shared loop is identical on both surfaces.
fn apply_split(
    model: &mut BuildingModel,
    sa: SurfaceKey,
    sb: SurfaceKey,
    split: PairSplit,
) -> Result<(Vec<SurfaceKey>, Vec<SurfaceKey>)> {
    // Both sides are checked before either changes
    validate_pieces(model, sa, &split.a)?;
    validate_pieces(model, sb, &split.b)?;

    let created_a = model.split_surface(sa, split.a.into_vec())?;
    let created_b = model.split_surface(sb, split.b.into_vec())?;
    Ok((created_a, created_b))
}

/// Rejects exactly the inputs `split_surface` would reject.
fn validate_pieces(
    model: &BuildingModel,
    surface: SurfaceKey,
    pieces: &[Vec<Point3<f64>>],
) -> Result<()> {
    if model.surface(surface).is_none() {
        return Err(ModelError::SurfaceNotFound(surface).into());
    }
    if pieces.is_empty() {
        return Err(ModelError::EmptySplit(surface).into());
    }
    if let Some(bad) = pieces.iter().find(|p| p.len() < 3) {
        return Err(ModelError::DegenerateSurface(bad.len()).into());
    }
    Ok(())
}

/// Computes the replacement pieces for a candidate pair, or `None` when the
/// surfaces do not partially overlap.
fn split_pair(
    model: &BuildingModel,
    sa: SurfaceKey,
    sb: SurfaceKey,
    b_in_a: &Transform,
    tol: &Tolerances,
) -> Option<PairSplit> {
    let vertices_a = model.surface(sa)?.vertices().to_vec();
    let vertices_b = b_in_a.apply(model.surface(sb)?.vertices());

    let normal_a = newell_normal(&vertices_a)?;
    let normal_b = newell_normal(&vertices_b)?;
    if normal_a.dot(&normal_b) > tol.opposite_normal_dot {
        return None;
    }
    let origin = vertices_a[0];
    if vertices_b
        .iter()
        .any(|p| normal_a.dot(&(p - origin)).abs() > tol.point)
    {
        return None;
    }
    let bbox_a = BoundingBox::from_points(&vertices_a);
    if !bbox_a.intersects(&BoundingBox::from_points(&vertices_b), tol.point) {
        return None;
    }

    let face = Transform::align_face(&vertices_a)?;
    match split_in_face(&face, &vertices_a, &vertices_b, tol) {
        Ok(Some((pieces_a, pieces_b))) => {
            let a_to_b = b_in_a.inverse();
            let b = pieces_b.iter().map(|p| a_to_b.apply(&reversed(p))).collect();
            Some(PairSplit { a: pieces_a, b })
        }
        Ok(None) => None,
        Err(err) => {
            debug!(surface_a = ?sa, surface_b = ?sb, error = %err, "treating pair as disjoint");
            None
        }
    }
}

/// Overlay of two coplanar polygons in the face frame of the first.
///
/// Returns the pieces of each side in A's local frame, wound like A; the B
/// pieces still have to be reversed and moved back into B's frame.
fn split_in_face(
    face: &Transform,
    vertices_a: &[Point3<f64>],
    vertices_b: &[Point3<f64>],
    tol: &Tolerances,
) -> Result<Option<(Pieces, Pieces)>> {
    let to_face = face.inverse();
    let flatten = |points: &[Point3<f64>]| -> Vec<Point2<f64>> {
        to_face
            .apply(points)
            .iter()
            .map(|p| Point2::new(p.x, p.y))
            .collect()
    };
    let polygon_a = flatten(vertices_a);
    let polygon_b = flatten(&reversed(vertices_b));

    let shared = bool2d::intersection(&polygon_a, &polygon_b)?;
    if bool2d::total_area(&shared) <= tol.min_area {
        return Ok(None);
    }
    let rest_a = bool2d::difference(&polygon_a, &polygon_b)?;
    let rest_b = bool2d::difference(&polygon_b, &polygon_a)?;
    if bool2d::total_area(&rest_a) <= tol.min_area && bool2d::total_area(&rest_b) <= tol.min_area {
        // Coincident surfaces are matched, not split
        return Ok(None);
    }

    let shared = lift_pieces(face, &shared, tol)?;
    if shared.pieces.is_empty() {
        return Ok(None);
    }
    let rest_a = lift_pieces(face, &rest_a, tol)?;
    let rest_b = lift_pieces(face, &rest_b, tol)?;

    let mut pieces_a = shared.pieces.clone();
    pieces_a.extend(rest_a.pieces);
    let mut pieces_b = shared.pieces;
    pieces_b.extend(rest_b.pieces);

    check_area(&pieces_a, polygon::area(vertices_a), shared.slack + rest_a.slack)?;
    check_area(&pieces_b, polygon::area(vertices_b), shared.slack + rest_b.slack)?;
    Ok(Some((pieces_a, pieces_b)))
}

/// Lifted pieces plus the area they may have lost to cleanup.
struct Lifted {
    pieces: Pieces,
    slack: f64,
}

/// Hole-free 3D pieces of a set of face-frame regions.
///
/// Slivers below the minimum area are dropped, as are pieces thinner than
/// the collinear tolerance (they collapse under collinear removal). Every
/// contour that loses vertices adds `collinear × perimeter` to the slack.
fn lift_pieces(face: &Transform, regions: &[Region2D], tol: &Tolerances) -> Result<Lifted> {
    let mut lifted = Lifted {
        pieces: Pieces::new(),
        slack: 0.0,
    };
    for region in regions {
        for contour in bool2d::split_holes(region)? {
            let points: Vec<Point3<f64>> = contour
                .iter()
                .map(|p| face.apply_point(&Point3::new(p.x, p.y, 0.0)))
                .collect();
            let area = polygon::area(&points);
            if area <= tol.min_area {
                lifted.slack += area;
                continue;
            }
            let cleaned = remove_collinear(&points, tol.collinear);
            if cleaned.len() < points.len() {
                lifted.slack += tol.collinear * perimeter(&points);
            }
            if cleaned.len() < 3 {
                trace!(area, "dropping piece thinner than the collinear tolerance");
                continue;
            }
            lifted.pieces.push(cleaned);
        }
    }
    Ok(lifted)
}

fn perimeter(points: &[Point3<f64>]) -> f64 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| (q - p).norm())
        .sum()
}

fn check_area(pieces: &[Vec<Point3<f64>>], original: f64, slack: f64) -> Result<()> {
    let total: f64 = pieces.iter().map(|p| polygon::area(p)).sum();
    let allowed = AREA_CONSERVATION_TOLERANCE * original.max(1.0) + slack;
    if (total - original).abs() > allowed {
        return Err(Error::Unresolved(format!(
            "pieces cover {total:.6} of {original:.6}"
        )));
    }
    Ok(())
}
