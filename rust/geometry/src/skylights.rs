// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Skylight layout over the outdoor roofs of a group of spaces.
//!
//! The layout is a regular grid of rectangles in a frame rotated about the
//! vertical axis. Skylight counts per axis scale with the square root of the
//! target ratio, so the covered area approximates `ratio × roof bounding
//! rectangle`.

use bem_lite_core::polygon::{self, newell_normal, remove_collinear};
use bem_lite_core::{
    BoundaryCondition, BoundingBox, BuildingModel, SpaceKey, SubSurfaceType, SurfaceKey,
    SurfaceType, Tolerances, Transform,
};
use nalgebra::{Point2, Point3};
use tracing::{debug, warn};

use crate::bool2d;

/// Lays out skylight rectangles over the outdoor roofs of `spaces`.
///
/// The building is turned clockwise by `rotation_degrees` into the grid
/// frame, so grid rows run `rotation_degrees` counter-clockwise from the
/// building x axis seen from above. Rectangles
/// are returned in building coordinates, counter-clockwise seen from above,
/// at the highest roof elevation. Returns an empty list when
/// `target_ratio` is outside `(0, 1)`, either size is not positive, `spaces`
/// is empty, there is no outdoor roof, or the skylights do not fit.
pub fn generate_skylight_pattern(
    model: &BuildingModel,
    spaces: &[SpaceKey],
    rotation_degrees: f64,
    target_ratio: f64,
    desired_width: f64,
    desired_height: f64,
) -> Vec<Vec<Point3<f64>>> {
    if !(target_ratio > 0.0 && target_ratio < 1.0) {
        warn!(target_ratio, "skylight ratio must be between 0 and 1");
        return Vec::new();
    }
    if !(desired_width > 0.0 && desired_height > 0.0) {
        warn!(desired_width, desired_height, "skylight size must be positive");
        return Vec::new();
    }
    if spaces.is_empty() {
        return Vec::new();
    }

    let grid = Transform::rotation_z((-rotation_degrees).to_radians());
    let mut bbox = BoundingBox::new();
    for &space in spaces {
        let Some(data) = model.space(space) else {
            continue;
        };
        let to_grid = grid * data.transform;
        for &key in &data.surfaces {
            let Some(surface) = model.surface(key) else {
                continue;
            };
            if surface.surface_type == SurfaceType::RoofCeiling
                && surface.boundary_condition == BoundaryCondition::Outdoors
            {
                bbox.add_points(&to_grid.apply(surface.vertices()));
            }
        }
    }
    let (Some(min), Some(max)) = (bbox.min(), bbox.max()) else {
        debug!(spaces = spaces.len(), "no outdoor roofs for skylights");
        return Vec::new();
    };

    let width = max.x - min.x;
    let height = max.y - min.y;
    let scale = target_ratio.sqrt();
    let count_x = scale * width / desired_width;
    let count_y = scale * height / desired_height;
    let spacing_x = (width - count_x * desired_width) / count_x.ceil();
    let spacing_y = (height - count_y * desired_height) / count_y.ceil();
    if !(spacing_x > 0.0 && spacing_y > 0.0) {
        warn!(spacing_x, spacing_y, "requested skylights do not fit the roof");
        return Vec::new();
    }

    let from_grid = grid.inverse();
    let x_end = max.x - spacing_x / 2.0;
    let y_end = max.y - spacing_y / 2.0;
    let mut pattern = Vec::new();

    let mut x = min.x + spacing_x / 2.0;
    while x < x_end {
        let x1 = (x + desired_width).min(x_end);
        let mut y = min.y + spacing_y / 2.0;
        while y < y_end {
            let y1 = (y + desired_height).min(y_end);
            let rectangle = [
                Point3::new(x, y, max.z),
                Point3::new(x1, y, max.z),
                Point3::new(x1, y1, max.z),
                Point3::new(x, y1, max.z),
            ];
            pattern.push(from_grid.apply(&rectangle));
            y += desired_height + spacing_y;
        }
        x += desired_width + spacing_x;
    }

    debug!(count = pattern.len(), spacing_x, spacing_y, "skylight pattern");
    pattern
}

/// Adds a skylight pattern to the outdoor roofs of `spaces`.
///
/// Each rectangle is projected vertically onto every outdoor, upward-facing
/// roof and clipped to it; each clipped piece becomes a `Skylight`
/// sub-surface wound like its roof. Returns the number of sub-surfaces added.
pub fn add_skylights(
    model: &mut BuildingModel,
    spaces: &[SpaceKey],
    pattern: &[Vec<Point3<f64>>],
    tol: &Tolerances,
) -> usize {
    let mut roofs: Vec<(SurfaceKey, String, Transform, Vec<Point3<f64>>)> = Vec::new();
    for &space in spaces {
        let Some(data) = model.space(space) else {
            continue;
        };
        for &key in &data.surfaces {
            let Some(surface) = model.surface(key) else {
                continue;
            };
            if surface.surface_type == SurfaceType::RoofCeiling
                && surface.boundary_condition == BoundaryCondition::Outdoors
            {
                roofs.push((
                    key,
                    surface.name.clone(),
                    data.transform,
                    data.transform.apply(surface.vertices()),
                ));
            }
        }
    }

    let mut added: usize = 0;
    for (roof, name, space_transform, vertices) in roofs {
        let Some(pieces) = clip_to_roof(&vertices, pattern, tol) else {
            continue;
        };
        let to_local = space_transform.inverse();
        for piece in pieces {
            let skylight_name = format!("{name} Skylight {}", added + 1);
            match model.add_sub_surface(
                roof,
                skylight_name,
                SubSurfaceType::Skylight,
                to_local.apply(&piece),
            ) {
                Ok(_) => added += 1,
                Err(err) => warn!(error = %err, "failed to add skylight"),
            }
        }
    }
    added
}

/// Pattern pieces inside one roof, in building coordinates. `None` when the
/// roof does not face up.
fn clip_to_roof(
    roof: &[Point3<f64>],
    pattern: &[Vec<Point3<f64>>],
    tol: &Tolerances,
) -> Option<Vec<Vec<Point3<f64>>>> {
    let normal = newell_normal(roof)?;
    if normal.z <= 1e-6 {
        return None;
    }
    let face = Transform::align_face(roof)?;
    let to_face = face.inverse();
    let origin = roof[0];
    let flatten = |points: &[Point3<f64>]| -> Vec<Point2<f64>> {
        to_face
            .apply(points)
            .iter()
            .map(|p| Point2::new(p.x, p.y))
            .collect()
    };
    let roof_2d = flatten(roof);

    let mut pieces = Vec::new();
    for rectangle in pattern {
        // Drop the rectangle vertically onto the roof plane
        let projected: Vec<Point3<f64>> = rectangle
            .iter()
            .map(|p| {
                let z = origin.z
                    - (normal.x * (p.x - origin.x) + normal.y * (p.y - origin.y)) / normal.z;
                Point3::new(p.x, p.y, z)
            })
            .collect();

        let regions = match bool2d::intersection(&roof_2d, &flatten(&projected)) {
            Ok(regions) => regions,
            Err(err) => {
                debug!(error = %err, "skipping skylight rectangle");
                continue;
            }
        };
        for region in &regions {
            let Ok(contours) = bool2d::split_holes(region) else {
                continue;
            };
            for contour in contours {
                let lifted: Vec<Point3<f64>> = contour
                    .iter()
                    .map(|p| face.apply_point(&Point3::new(p.x, p.y, 0.0)))
                    .collect();
                if polygon::area(&lifted) <= tol.min_area {
                    continue;
                }
                let cleaned = remove_collinear(&lifted, tol.collinear);
                if cleaned.len() >= 3 {
                    pieces.push(cleaned);
                }
            }
        }
    }
    Some(pieces)
}
