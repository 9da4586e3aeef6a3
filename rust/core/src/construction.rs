// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction and editing of spaces, surfaces and sub-surfaces.
//!
//! Every entity is created through the arena, which checks that referenced
//! parents exist and keeps the parent's child list in sync.

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::keys::*;
use crate::model::*;
use crate::transform::Transform;

impl BuildingModel {
    /// Adds an empty space with the given local-to-building transform.
    pub fn add_space(&mut self, name: impl Into<String>, transform: Transform) -> SpaceKey {
        self.spaces.insert(SpaceData {
            name: name.into(),
            transform,
            surfaces: Vec::new(),
        })
    }

    /// Adds a surface to a space. Vertices are in the space's local frame.
    ///
    /// The boundary condition defaults to `Ground` for floors at or below
    /// building z = 0 and to `Outdoors` otherwise.
    pub fn add_surface(
        &mut self,
        space: SpaceKey,
        name: impl Into<String>,
        surface_type: SurfaceType,
        vertices: Vec<Point3<f64>>,
    ) -> Result<SurfaceKey> {
        let transform = self
            .spaces
            .get(space)
            .ok_or(Error::SpaceNotFound(space))?
            .transform;
        if vertices.len() < 3 {
            return Err(Error::DegenerateSurface(vertices.len()));
        }

        let boundary_condition = default_boundary_condition(surface_type, &transform, &vertices);
        let key = self.surfaces.insert(SurfaceData {
            name: name.into(),
            space,
            surface_type,
            boundary_condition,
            vertices,
            sub_surfaces: Vec::new(),
            adjacent_surface: None,
        });
        self.spaces[space].surfaces.push(key);
        Ok(key)
    }

    /// Adds a sub-surface (window, door, skylight) to a surface. Vertices are
    /// in the owning space's local frame.
    pub fn add_sub_surface(
        &mut self,
        surface: SurfaceKey,
        name: impl Into<String>,
        sub_surface_type: SubSurfaceType,
        vertices: Vec<Point3<f64>>,
    ) -> Result<SubSurfaceKey> {
        if !self.surfaces.contains_key(surface) {
            return Err(Error::SurfaceNotFound(surface));
        }
        if vertices.len() < 3 {
            return Err(Error::DegenerateSurface(vertices.len()));
        }

        let key = self.sub_surfaces.insert(SubSurfaceData {
            name: name.into(),
            surface,
            sub_surface_type,
            vertices,
            adjacent_sub_surface: None,
        });
        self.surfaces[surface].sub_surfaces.push(key);
        Ok(key)
    }

    /// Replaces a surface's polygon. Sub-surfaces and adjacency are kept.
    pub fn set_surface_vertices(
        &mut self,
        surface: SurfaceKey,
        vertices: Vec<Point3<f64>>,
    ) -> Result<()> {
        if vertices.len() < 3 {
            return Err(Error::DegenerateSurface(vertices.len()));
        }
        let data = self
            .surfaces
            .get_mut(surface)
            .ok_or(Error::SurfaceNotFound(surface))?;
        data.vertices = vertices;
        Ok(())
    }

    /// Replaces a surface by a set of pieces lying in its plane.
    ///
    /// The surface keeps its key and takes the first piece; every other piece
    /// becomes a new surface of the same space, type and boundary condition,
    /// named `"<name> <n>"`. Returns the keys of the new surfaces. The
    /// surface is left unchanged if any piece is degenerate.
    pub fn split_surface(
        &mut self,
        surface: SurfaceKey,
        pieces: Vec<Vec<Point3<f64>>>,
    ) -> Result<Vec<SurfaceKey>> {
        let original = self
            .surfaces
            .get(surface)
            .ok_or(Error::SurfaceNotFound(surface))?
            .clone();
        if pieces.is_empty() {
            return Err(Error::EmptySplit(surface));
        }
        if let Some(bad) = pieces.iter().find(|p| p.len() < 3) {
            return Err(Error::DegenerateSurface(bad.len()));
        }

        let mut pieces = pieces.into_iter();
        if let Some(first) = pieces.next() {
            self.surfaces[surface].vertices = first;
        }

        let mut created = Vec::new();
        for (n, vertices) in pieces.enumerate() {
            let key = self.surfaces.insert(SurfaceData {
                name: format!("{} {}", original.name, n + 1),
                space: original.space,
                surface_type: original.surface_type,
                boundary_condition: original.boundary_condition,
                vertices,
                sub_surfaces: Vec::new(),
                adjacent_surface: None,
            });
            self.spaces[original.space].surfaces.push(key);
            created.push(key);
        }
        Ok(created)
    }

    /// Removes a surface together with its sub-surfaces, detaching any
    /// adjacency first.
    pub fn remove_surface(&mut self, surface: SurfaceKey) -> Result<()> {
        self.reset_adjacent_surface(surface)?;
        let data = self
            .surfaces
            .remove(surface)
            .ok_or(Error::SurfaceNotFound(surface))?;

        for sub in data.sub_surfaces {
            self.sub_surfaces.remove(sub);
        }
        if let Some(space) = self.spaces.get_mut(data.space) {
            space.surfaces.retain(|&k| k != surface);
        }
        Ok(())
    }

    /// Creates a rectangular box space with one floor, one roof and four
    /// walls, all facing outward.
    ///
    /// The space's transform is a translation to `origin`; the local box spans
    /// `[0, size.x] × [0, size.y] × [0, size.z]`.
    pub fn make_box_space(
        &mut self,
        name: &str,
        origin: Point3<f64>,
        size: Vector3<f64>,
    ) -> Result<SpaceKey> {
        let (lx, ly, lz) = (size.x, size.y, size.z);
        let space = self.add_space(name, Transform::translation(origin.x, origin.y, origin.z));

        let p = Point3::<f64>::new;
        let faces = [
            (
                "Floor",
                SurfaceType::Floor,
                vec![p(0.0, ly, 0.0), p(lx, ly, 0.0), p(lx, 0.0, 0.0), p(0.0, 0.0, 0.0)],
            ),
            (
                "Roof",
                SurfaceType::RoofCeiling,
                vec![p(0.0, ly, lz), p(0.0, 0.0, lz), p(lx, 0.0, lz), p(lx, ly, lz)],
            ),
            (
                "Wall South",
                SurfaceType::Wall,
                vec![p(0.0, 0.0, lz), p(0.0, 0.0, 0.0), p(lx, 0.0, 0.0), p(lx, 0.0, lz)],
            ),
            (
                "Wall East",
                SurfaceType::Wall,
                vec![p(lx, 0.0, lz), p(lx, 0.0, 0.0), p(lx, ly, 0.0), p(lx, ly, lz)],
            ),
            (
                "Wall North",
                SurfaceType::Wall,
                vec![p(lx, ly, lz), p(lx, ly, 0.0), p(0.0, ly, 0.0), p(0.0, ly, lz)],
            ),
            (
                "Wall West",
                SurfaceType::Wall,
                vec![p(0.0, ly, lz), p(0.0, ly, 0.0), p(0.0, 0.0, 0.0), p(0.0, 0.0, lz)],
            ),
        ];

        for (label, surface_type, vertices) in faces {
            self.add_surface(space, format!("{name} {label}"), surface_type, vertices)?;
        }
        Ok(space)
    }
}

/// Boundary condition a surface gets when it has no adjacent surface.
pub(crate) fn default_boundary_condition(
    surface_type: SurfaceType,
    transform: &Transform,
    vertices: &[Point3<f64>],
) -> BoundaryCondition {
    match surface_type {
        SurfaceType::Floor => {
            let max_z = vertices
                .iter()
                .map(|v| transform.apply_point(v).z)
                .fold(f64::NEG_INFINITY, f64::max);
            if max_z <= 0.0 {
                BoundaryCondition::Ground
            } else {
                BoundaryCondition::Outdoors
            }
        }
        SurfaceType::Wall | SurfaceType::RoofCeiling => BoundaryCondition::Outdoors,
    }
}
