// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BEM-Lite Core
//!
//! Geometry model for building energy simulation: spaces owning surfaces
//! (floors, walls, roofs) which in turn own sub-surfaces (windows, doors,
//! skylights).
//!
//! All entities live in a [`BuildingModel`] arena and are addressed by
//! generational keys. Each space carries a rigid [`Transform`] from its local
//! coordinates to the building frame; surface vertices are stored in the
//! space's local frame.
//!
//! Adjacency between surfaces of different spaces is a symmetric relation.
//! The only way to change it is through the arena mutators in
//! [`adjacency`](crate::adjacency), which always update both sides.
//!
//! ## Quick Start
//!
//! ```
//! use bem_lite_core::{BuildingModel, Tolerances};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut model = BuildingModel::new();
//! let office = model
//!     .make_box_space("Office", Point3::origin(), Vector3::new(3.0, 3.0, 3.0))
//!     .unwrap();
//!
//! assert_eq!(model.space_surfaces(office).len(), 6);
//! let bbox = model.space_bounding_box(office);
//! assert!(bbox.intersects(&bbox, Tolerances::default().point));
//! ```

pub mod adjacency;
pub mod bbox;
pub mod construction;
pub mod error;
pub mod keys;
pub mod model;
pub mod polygon;
pub mod spatial;
pub mod tolerance;
pub mod transform;

pub use bbox::BoundingBox;
pub use error::{Error, Result};
pub use keys::{SpaceKey, SubSurfaceKey, SurfaceKey};
pub use model::{
    BoundaryCondition, BuildingModel, SpaceData, SubSurfaceData, SubSurfaceType, SurfaceData,
    SurfaceType,
};
pub use polygon::PolygonWithHoles;
pub use spatial::PointSnapper;
pub use tolerance::Tolerances;
pub use transform::Transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
