// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor print extraction: one canonical footprint polygon per space.
//!
//! The floor surfaces of a space are merged into a single region in building
//! coordinates. Failures (non-planar floors, a union with zero or several
//! disjoint regions, degenerate output) produce an empty polygon and a
//! warning instead of an error, so a batch over many spaces keeps going.

use bem_lite_core::polygon::{self, canonicalize};
use bem_lite_core::{
    BuildingModel, PointSnapper, PolygonWithHoles, SpaceKey, SurfaceKey, SurfaceType, Tolerances,
};
use nalgebra::{Point2, Point3};
use tracing::{debug, warn};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::bool2d;

/// Footprint of a space's floor surfaces in building coordinates.
///
/// The outer loop keeps the winding of the floors (downward-facing floors give
/// a clockwise loop seen from above); holes wind the other way. Every loop
/// starts at its upper-left vertex and has no collinear vertices, so calling
/// this twice on an unchanged space returns identical vertices.
pub fn floor_print(model: &BuildingModel, space: SpaceKey, tol: &Tolerances) -> PolygonWithHoles {
    let floors = collect_floors(model, space);
    let Some((_, first)) = floors.first() else {
        warn!(space = ?space, "space has no floor surfaces");
        return PolygonWithHoles::empty();
    };

    let z0 = first[0].z;
    let planar = floors
        .iter()
        .flat_map(|(_, vertices)| vertices.iter())
        .all(|v| (v.z - z0).abs() <= tol.planarity);
    if !planar {
        warn!(space = ?space, tolerance = tol.planarity, "floor surfaces are not coplanar");
        return PolygonWithHoles::empty();
    }

    let result = if floors.len() == 1 {
        PolygonWithHoles::new(canonicalize(first, tol.collinear))
    } else {
        match union_floors(&floors, z0, tol) {
            Some(result) => result,
            None => {
                warn!(space = ?space, floors = floors.len(), "floor union is not a single region");
                return PolygonWithHoles::empty();
            }
        }
    };

    if result.is_empty() {
        warn!(space = ?space, "floor print is degenerate");
        return PolygonWithHoles::empty();
    }
    debug!(
        space = ?space,
        vertices = result.outer.len(),
        holes = result.holes.len(),
        "floor print"
    );
    result
}

/// Floor print as a single bridged loop, for consumers without hole support.
pub fn floor_print_flat(model: &BuildingModel, space: SpaceKey, tol: &Tolerances) -> Vec<Point3<f64>> {
    floor_print(model, space, tol).flatten_bridged()
}

/// Net floor print area (outer minus holes), zero when extraction fails.
pub fn floor_print_area(model: &BuildingModel, space: SpaceKey, tol: &Tolerances) -> f64 {
    floor_print(model, space, tol).area()
}

/// Floor prints of many spaces, in the order of `spaces`.
///
/// Extraction only reads the model, so spaces are processed in parallel on
/// native targets.
pub fn floor_prints(
    model: &BuildingModel,
    spaces: &[SpaceKey],
    tol: &Tolerances,
) -> Vec<PolygonWithHoles> {
    #[cfg(not(target_arch = "wasm32"))]
    let prints = spaces
        .par_iter()
        .map(|&space| floor_print(model, space, tol))
        .collect();

    #[cfg(target_arch = "wasm32")]
    let prints = spaces
        .iter()
        .map(|&space| floor_print(model, space, tol))
        .collect();

    prints
}

/// Floor surfaces with at least three vertices, in key order, in building
/// coordinates.
fn collect_floors(model: &BuildingModel, space: SpaceKey) -> Vec<(SurfaceKey, Vec<Point3<f64>>)> {
    let mut floors: Vec<(SurfaceKey, Vec<Point3<f64>>)> = model
        .space_surfaces(space)
        .iter()
        .filter(|&&key| {
            model
                .surface(key)
                .is_some_and(|s| s.surface_type == SurfaceType::Floor && s.vertices().len() >= 3)
        })
        .filter_map(|&key| Some((key, model.surface_vertices_in_building(key)?)))
        .collect();
    floors.sort_by_key(|(key, _)| *key);
    floors
}

fn union_floors(
    floors: &[(SurfaceKey, Vec<Point3<f64>>)],
    z0: f64,
    tol: &Tolerances,
) -> Option<PolygonWithHoles> {
    let mut snapper = PointSnapper::new(tol.point);
    let contours: Vec<Vec<Point2<f64>>> = floors
        .iter()
        .map(|(_, vertices)| {
            let mut contour: Vec<Point2<f64>> = Vec::with_capacity(vertices.len());
            for p in snapper.snap_all(vertices) {
                let q = Point2::new(p.x, p.y);
                if contour.last() != Some(&q) {
                    contour.push(q);
                }
            }
            if contour.len() > 1 && contour.first() == contour.last() {
                contour.pop();
            }
            contour
        })
        .collect();

    let regions = match bool2d::union_all(&contours) {
        Ok(regions) => regions,
        Err(err) => {
            debug!(error = %err, "floor union failed");
            return None;
        }
    };
    let [region] = regions.as_slice() else {
        return None;
    };

    // The union is counter-clockwise from above; restore the floors' winding.
    let faces_down = polygon::newell_normal(&floors[0].1).map_or(true, |n| n.z < 0.0);
    let lift = |contour: &[Point2<f64>]| -> Vec<Point3<f64>> {
        let points: Vec<Point3<f64>> = contour.iter().map(|p| Point3::new(p.x, p.y, z0)).collect();
        if faces_down {
            polygon::reversed(&points)
        } else {
            points
        }
    };

    let outer = canonicalize(&lift(&region.outer), tol.collinear);
    let holes = region
        .holes
        .iter()
        .map(|hole| canonicalize(&lift(hole), tol.collinear))
        .filter(|hole| hole.len() >= 3)
        .collect();
    Some(PolygonWithHoles { outer, holes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bem_lite_core::Transform;
    use nalgebra::Vector3;

    /// Downward-facing rectangle (clockwise seen from above).
    fn floor_rect(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, y1, z),
            Point3::new(x1, y1, z),
            Point3::new(x1, y0, z),
            Point3::new(x0, y0, z),
        ]
    }

    fn space_with_floors(floors: Vec<Vec<Point3<f64>>>) -> (BuildingModel, SpaceKey) {
        let mut model = BuildingModel::new();
        let space = model.add_space("Space", Transform::identity());
        for (i, vertices) in floors.into_iter().enumerate() {
            model
                .add_surface(space, format!("Floor {i}"), SurfaceType::Floor, vertices)
                .unwrap();
        }
        (model, space)
    }

    #[test]
    fn single_floor_is_returned_unchanged() {
        let mut model = BuildingModel::new();
        let space = model
            .make_box_space("Box", Point3::origin(), Vector3::new(3.0, 3.0, 3.0))
            .unwrap();
        let floor = model.space_surfaces(space)[0];

        let print = floor_print(&model, space, &Tolerances::default());
        assert_eq!(print.outer, model.surface_vertices_in_building(floor).unwrap());
        assert!(print.holes.is_empty());
    }

    #[test]
    fn single_floor_drops_collinear_vertices() {
        let mut floor = floor_rect(0.0, 0.0, 4.0, 2.0, 0.0);
        floor.insert(1, Point3::new(2.0, 2.0, 0.0));
        let (model, space) = space_with_floors(vec![floor]);

        let print = floor_print(&model, space, &Tolerances::default());
        assert_eq!(print.outer.len(), 4);
        assert!(polygon::is_collinear_free(&print.outer, 0.01));
    }

    #[test]
    fn two_floors_union_into_l_shape() {
        let (model, space) = space_with_floors(vec![
            floor_rect(0.0, 0.0, 2.0, 1.0, 0.0),
            floor_rect(0.0, 1.0, 1.0, 2.0, 0.0),
        ]);
        let tol = Tolerances::default();

        let print = floor_print(&model, space, &tol);
        assert_eq!(print.outer.len(), 6);
        assert_relative_eq!(print.outer[0], Point3::new(0.0, 2.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(print.area(), 3.0, epsilon = 1e-9);
        assert!(polygon::newell_normal(&print.outer).unwrap().z < 0.0);
        assert!(polygon::is_collinear_free(&print.outer, tol.collinear));

        // Idempotent
        assert_eq!(floor_print(&model, space, &tol), print);
    }

    #[test]
    fn near_duplicate_vertices_are_snapped() {
        let (model, space) = space_with_floors(vec![
            floor_rect(0.0, 0.0, 2.0, 2.0, 0.0),
            floor_rect(2.004, 0.0, 4.0, 2.003, 0.0),
        ]);

        let print = floor_print(&model, space, &Tolerances::default());
        assert_eq!(print.outer.len(), 4);
        assert_relative_eq!(print.area(), 8.0, epsilon = 0.01);
    }

    #[test]
    fn ring_of_floors_has_hole() {
        let (model, space) = space_with_floors(vec![
            floor_rect(0.0, 0.0, 3.0, 1.0, 0.0),
            floor_rect(2.0, 0.0, 3.0, 3.0, 0.0),
            floor_rect(0.0, 2.0, 3.0, 3.0, 0.0),
            floor_rect(0.0, 0.0, 1.0, 3.0, 0.0),
        ]);

        let print = floor_print(&model, space, &Tolerances::default());
        assert_eq!(print.outer.len(), 4);
        assert_eq!(print.holes.len(), 1);
        assert_eq!(print.holes[0].len(), 4);
        assert_relative_eq!(print.area(), 8.0, epsilon = 1e-9);

        // Holes wind opposite to the outer loop
        let outer_z = polygon::newell_normal(&print.outer).unwrap().z;
        let hole_z = polygon::newell_normal(&print.holes[0]).unwrap().z;
        assert!(outer_z * hole_z < 0.0);

        let flat = floor_print_flat(&model, space, &Tolerances::default());
        assert_eq!(flat.len(), 4 + 1 + 4);
        assert_eq!(flat[4], print.outer[3]);
    }

    #[test]
    fn non_planar_floors_give_empty_print() {
        let (model, space) = space_with_floors(vec![
            floor_rect(0.0, 0.0, 2.0, 2.0, 0.0),
            floor_rect(2.0, 0.0, 4.0, 2.0, 0.5),
        ]);
        assert!(floor_print(&model, space, &Tolerances::default()).is_empty());
    }

    #[test]
    fn disjoint_floors_give_empty_print() {
        let (model, space) = space_with_floors(vec![
            floor_rect(0.0, 0.0, 1.0, 1.0, 0.0),
            floor_rect(5.0, 5.0, 6.0, 6.0, 0.0),
        ]);
        assert!(floor_print(&model, space, &Tolerances::default()).is_empty());
        assert_eq!(floor_print_area(&model, space, &Tolerances::default()), 0.0);
    }

    #[test]
    fn space_without_floors_gives_empty_print() {
        let mut model = BuildingModel::new();
        let space = model.add_space("Empty", Transform::identity());
        assert!(floor_print(&model, space, &Tolerances::default()).is_empty());
    }

    #[test]
    fn batch_matches_single_extraction() {
        let mut model = BuildingModel::new();
        let spaces: Vec<SpaceKey> = (0..4)
            .map(|i| {
                model
                    .make_box_space(
                        &format!("S{i}"),
                        Point3::new(4.0 * i as f64, 0.0, 0.0),
                        Vector3::new(3.0, 2.0, 3.0),
                    )
                    .unwrap()
            })
            .collect();
        let tol = Tolerances::default();

        let prints = floor_prints(&model, &spaces, &tol);
        assert_eq!(prints.len(), 4);
        for (space, print) in spaces.iter().zip(&prints) {
            assert_eq!(print, &floor_print(&model, *space, &tol));
            assert_relative_eq!(print.area(), 6.0, epsilon = 1e-9);
        }
    }
}
