// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model construction and mutation.

use crate::keys::{SpaceKey, SubSurfaceKey, SurfaceKey};

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a [`BuildingModel`](crate::BuildingModel).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Space key not found in the arena.
    #[error("space not found: {0:?}")]
    SpaceNotFound(SpaceKey),

    /// Surface key not found in the arena.
    #[error("surface not found: {0:?}")]
    SurfaceNotFound(SurfaceKey),

    /// Sub-surface key not found in the arena.
    #[error("sub-surface not found: {0:?}")]
    SubSurfaceNotFound(SubSurfaceKey),

    /// A surface or sub-surface polygon needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    DegenerateSurface(usize),

    /// Adjacency can only link surfaces of two different spaces.
    #[error("surfaces {0:?} and {1:?} belong to the same space")]
    SameSpace(SurfaceKey, SurfaceKey),

    /// Sub-surfaces can only be linked when their parent surfaces are adjacent.
    #[error("parent surfaces of {0:?} and {1:?} are not adjacent")]
    ParentsNotAdjacent(SubSurfaceKey, SubSurfaceKey),

    /// A split must produce at least one replacement polygon.
    #[error("split of surface {0:?} produced no pieces")]
    EmptySplit(SurfaceKey),
}
