// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for spaces, surfaces and sub-surfaces.
//!
//! The [`BuildingModel`] is the central owner of all geometry. Every entity
//! lives in a slot map with stable, generational keys. Downward links
//! (space → surfaces → sub-surfaces) are ordered key lists; upward links are
//! plain parent keys on each entity.

use nalgebra::{Point3, Vector3};
use slotmap::SlotMap;

use crate::bbox::BoundingBox;
use crate::keys::*;
use crate::polygon;
use crate::transform::Transform;

/// Category of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceType {
    Floor,
    Wall,
    RoofCeiling,
}

/// What lies on the outside of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryCondition {
    Outdoors,
    Ground,
    Adiabatic,
    /// Interior boundary shared with an adjacent surface.
    Surface,
}

impl BoundaryCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryCondition::Outdoors => "Outdoors",
            BoundaryCondition::Ground => "Ground",
            BoundaryCondition::Adiabatic => "Adiabatic",
            BoundaryCondition::Surface => "Surface",
        }
    }
}

impl std::fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a sub-surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubSurfaceType {
    FixedWindow,
    OperableWindow,
    Door,
    GlassDoor,
    Skylight,
}

/// Data stored for a space.
#[derive(Debug, Clone)]
pub struct SpaceData {
    pub name: String,
    /// Maps local coordinates to the building frame.
    pub transform: Transform,
    /// Surfaces in creation order.
    pub surfaces: Vec<SurfaceKey>,
}

/// Data stored for a surface. Vertices are in the owning space's local frame.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    pub name: String,
    pub space: SpaceKey,
    pub surface_type: SurfaceType,
    pub boundary_condition: BoundaryCondition,
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) sub_surfaces: Vec<SubSurfaceKey>,
    pub(crate) adjacent_surface: Option<SurfaceKey>,
}

impl SurfaceData {
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn sub_surfaces(&self) -> &[SubSurfaceKey] {
        &self.sub_surfaces
    }

    pub fn adjacent_surface(&self) -> Option<SurfaceKey> {
        self.adjacent_surface
    }

    /// Outward normal in the space's local frame, `None` if degenerate.
    pub fn outward_normal(&self) -> Option<Vector3<f64>> {
        polygon::newell_normal(&self.vertices)
    }

    pub fn area(&self) -> f64 {
        polygon::area(&self.vertices)
    }
}

/// Data stored for a sub-surface. Vertices are in the owning space's local
/// frame and lie in the parent surface's plane.
#[derive(Debug, Clone)]
pub struct SubSurfaceData {
    pub name: String,
    pub surface: SurfaceKey,
    pub sub_surface_type: SubSurfaceType,
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) adjacent_sub_surface: Option<SubSurfaceKey>,
}

impl SubSurfaceData {
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn adjacent_sub_surface(&self) -> Option<SubSurfaceKey> {
        self.adjacent_sub_surface
    }

    pub fn area(&self) -> f64 {
        polygon::area(&self.vertices)
    }
}

/// The central arena owning all spaces, surfaces and sub-surfaces.
///
/// # Example
///
/// ```
/// use bem_lite_core::{BuildingModel, SurfaceType, Transform};
/// use nalgebra::Point3;
///
/// let mut model = BuildingModel::new();
/// let space = model.add_space("Lobby", Transform::translation(10.0, 0.0, 0.0));
/// let floor = model
///     .add_surface(
///         space,
///         "Lobby Floor",
///         SurfaceType::Floor,
///         vec![
///             Point3::new(0.0, 0.0, 0.0),
///             Point3::new(0.0, 4.0, 0.0),
///             Point3::new(4.0, 4.0, 0.0),
///             Point3::new(4.0, 0.0, 0.0),
///         ],
///     )
///     .unwrap();
///
/// let building = model.surface_vertices_in_building(floor).unwrap();
/// assert_eq!(building[0], Point3::new(10.0, 0.0, 0.0));
/// ```
#[derive(Debug, Default)]
pub struct BuildingModel {
    pub(crate) spaces: SlotMap<SpaceKey, SpaceData>,
    pub(crate) surfaces: SlotMap<SurfaceKey, SurfaceData>,
    pub(crate) sub_surfaces: SlotMap<SubSurfaceKey, SubSurfaceData>,
}

impl BuildingModel {
    /// Creates a new, empty model.
    pub fn new() -> Self {
        Self {
            spaces: SlotMap::with_key(),
            surfaces: SlotMap::with_key(),
            sub_surfaces: SlotMap::with_key(),
        }
    }

    // --- Space queries ---

    pub fn space(&self, key: SpaceKey) -> Option<&SpaceData> {
        self.spaces.get(key)
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    /// All space keys in key order.
    pub fn space_keys(&self) -> Vec<SpaceKey> {
        let mut keys: Vec<SpaceKey> = self.spaces.keys().collect();
        keys.sort();
        keys
    }

    /// Surfaces of a space, empty if the space does not exist.
    pub fn space_surfaces(&self, key: SpaceKey) -> &[SurfaceKey] {
        self.spaces
            .get(key)
            .map(|s| s.surfaces.as_slice())
            .unwrap_or(&[])
    }

    pub fn space_transform(&self, key: SpaceKey) -> Option<Transform> {
        self.spaces.get(key).map(|s| s.transform)
    }

    /// Replaces a space's transform. Returns `false` if the space is unknown.
    pub fn set_space_transform(&mut self, key: SpaceKey, transform: Transform) -> bool {
        match self.spaces.get_mut(key) {
            Some(space) => {
                space.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Transform re-expressing `from`-local coordinates in `to`-local
    /// coordinates: `to.inverse() * from`.
    pub fn relative_transform(&self, from: SpaceKey, to: SpaceKey) -> Option<Transform> {
        let from = self.spaces.get(from)?.transform;
        let to = self.spaces.get(to)?.transform;
        Some(to.inverse() * from)
    }

    /// Bounding box of all surface vertices of a space in building
    /// coordinates. Empty if the space has no surfaces.
    pub fn space_bounding_box(&self, key: SpaceKey) -> BoundingBox {
        let mut bbox = BoundingBox::new();
        if let Some(space) = self.spaces.get(key) {
            for &sk in &space.surfaces {
                if let Some(surface) = self.surfaces.get(sk) {
                    bbox.add_points(&space.transform.apply(&surface.vertices));
                }
            }
        }
        bbox
    }

    // --- Surface queries ---

    pub fn surface(&self, key: SurfaceKey) -> Option<&SurfaceData> {
        self.surfaces.get(key)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn surface_sub_surfaces(&self, key: SurfaceKey) -> &[SubSurfaceKey] {
        self.surfaces
            .get(key)
            .map(|s| s.sub_surfaces.as_slice())
            .unwrap_or(&[])
    }

    /// Surface vertices expressed in the building frame.
    pub fn surface_vertices_in_building(&self, key: SurfaceKey) -> Option<Vec<Point3<f64>>> {
        let surface = self.surfaces.get(key)?;
        let space = self.spaces.get(surface.space)?;
        Some(space.transform.apply(&surface.vertices))
    }

    /// Outward normal in the building frame.
    pub fn surface_outward_normal(&self, key: SurfaceKey) -> Option<Vector3<f64>> {
        polygon::newell_normal(&self.surface_vertices_in_building(key)?)
    }

    pub fn surface_area(&self, key: SurfaceKey) -> Option<f64> {
        self.surfaces.get(key).map(|s| s.area())
    }

    // --- Sub-surface queries ---

    pub fn sub_surface(&self, key: SubSurfaceKey) -> Option<&SubSurfaceData> {
        self.sub_surfaces.get(key)
    }

    pub fn sub_surface_count(&self) -> usize {
        self.sub_surfaces.len()
    }
}
