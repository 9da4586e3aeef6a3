// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symmetric adjacency between surfaces (and sub-surfaces) of different
//! spaces.
//!
//! If `a` references `b` as adjacent, `b` references `a`. Every mutator here
//! updates both sides together; linking a new partner first detaches any
//! previous partner of either side.

use crate::construction::default_boundary_condition;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::model::*;

impl BuildingModel {
    /// Links two surfaces of different spaces as the two sides of one
    /// boundary. Both get the `Surface` boundary condition.
    pub fn set_adjacent_surface(&mut self, a: SurfaceKey, b: SurfaceKey) -> Result<()> {
        let space_a = self.surfaces.get(a).ok_or(Error::SurfaceNotFound(a))?.space;
        let space_b = self.surfaces.get(b).ok_or(Error::SurfaceNotFound(b))?.space;
        if space_a == space_b {
            return Err(Error::SameSpace(a, b));
        }

        if self.surfaces[a].adjacent_surface == Some(b) {
            return Ok(());
        }
        self.reset_adjacent_surface(a)?;
        self.reset_adjacent_surface(b)?;

        for (this, other) in [(a, b), (b, a)] {
            let data = &mut self.surfaces[this];
            data.adjacent_surface = Some(other);
            data.boundary_condition = BoundaryCondition::Surface;
        }
        Ok(())
    }

    /// Detaches a surface from its adjacent surface, if any, on both sides.
    ///
    /// Adjacent sub-surfaces of the pair are unlinked and both surfaces get
    /// their default boundary condition back. Returns `true` if a link was
    /// removed.
    pub fn reset_adjacent_surface(&mut self, surface: SurfaceKey) -> Result<bool> {
        let partner = self
            .surfaces
            .get(surface)
            .ok_or(Error::SurfaceNotFound(surface))?
            .adjacent_surface;
        let Some(partner) = partner else {
            return Ok(false);
        };

        for key in [surface, partner] {
            let subs = self
                .surfaces
                .get(key)
                .map(|s| s.sub_surfaces.clone())
                .unwrap_or_default();
            for sub in subs {
                self.reset_adjacent_sub_surface(sub)?;
            }

            let transform = match self.surfaces.get(key).and_then(|s| self.spaces.get(s.space)) {
                Some(space) => space.transform,
                None => continue,
            };
            if let Some(data) = self.surfaces.get_mut(key) {
                data.adjacent_surface = None;
                data.boundary_condition =
                    default_boundary_condition(data.surface_type, &transform, &data.vertices);
            }
        }
        Ok(true)
    }

    /// Links two sub-surfaces whose parent surfaces are adjacent to each other.
    pub fn set_adjacent_sub_surface(&mut self, a: SubSurfaceKey, b: SubSurfaceKey) -> Result<()> {
        let parent_a = self
            .sub_surfaces
            .get(a)
            .ok_or(Error::SubSurfaceNotFound(a))?
            .surface;
        let parent_b = self
            .sub_surfaces
            .get(b)
            .ok_or(Error::SubSurfaceNotFound(b))?
            .surface;
        let parents_linked = self
            .surfaces
            .get(parent_a)
            .is_some_and(|s| s.adjacent_surface == Some(parent_b));
        if !parents_linked {
            return Err(Error::ParentsNotAdjacent(a, b));
        }

        if self.sub_surfaces[a].adjacent_sub_surface == Some(b) {
            return Ok(());
        }
        self.reset_adjacent_sub_surface(a)?;
        self.reset_adjacent_sub_surface(b)?;
        self.sub_surfaces[a].adjacent_sub_surface = Some(b);
        self.sub_surfaces[b].adjacent_sub_surface = Some(a);
        Ok(())
    }

    /// Detaches a sub-surface from its adjacent sub-surface on both sides.
    pub fn reset_adjacent_sub_surface(&mut self, sub_surface: SubSurfaceKey) -> Result<bool> {
        let partner = self
            .sub_surfaces
            .get_mut(sub_surface)
            .ok_or(Error::SubSurfaceNotFound(sub_surface))?
            .adjacent_sub_surface
            .take();
        match partner {
            Some(partner) => {
                if let Some(other) = self.sub_surfaces.get_mut(partner) {
                    other.adjacent_sub_surface = None;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Space of the surface adjacent to `surface`, if any.
    pub fn adjacent_space(&self, surface: SurfaceKey) -> Option<SpaceKey> {
        let partner = self.surfaces.get(surface)?.adjacent_surface?;
        self.surfaces.get(partner).map(|s| s.space)
    }
}
