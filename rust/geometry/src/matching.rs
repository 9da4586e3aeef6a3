// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface matching between two spaces.
//!
//! Two surfaces match when they describe the same polygon seen from opposite
//! sides: outward normals nearly opposite, and the vertex loops equal up to a
//! cyclic shift once one of them is reversed. Matched surfaces (and their
//! matching sub-surfaces) are linked as adjacent on both sides.

use bem_lite_core::polygon::{circular_equal, newell_normal, reversed};
use bem_lite_core::{BuildingModel, SpaceKey, SurfaceKey, Tolerances, Transform};
use tracing::{debug, warn};

/// Links every pair of coincident, opposite-facing surfaces of `a` and `b`.
///
/// Surfaces already adjacent to a surface of a third space are left alone.
/// Surfaces already linked across `a` and `b` are tested again, so repeated
/// calls converge to the same state. Returns the number of newly linked
/// surface pairs.
pub fn match_surfaces(
    model: &mut BuildingModel,
    a: SpaceKey,
    b: SpaceKey,
    tol: &Tolerances,
) -> usize {
    if a == b {
        return 0;
    }
    let Some(b_in_a) = model.relative_transform(b, a) else {
        warn!(a = ?a, b = ?b, "cannot match surfaces of unknown space");
        return 0;
    };

    let surfaces_a = model.space_surfaces(a).to_vec();
    let surfaces_b = model.space_surfaces(b).to_vec();
    let mut linked: usize = 0;

    for &sa in &surfaces_a {
        let Some(data_a) = model.surface(sa) else {
            continue;
        };
        let current = data_a.adjacent_surface();
        if current.is_some_and(|p| model.surface(p).map(|s| s.space) != Some(b)) {
            continue;
        }
        let vertices_a = data_a.vertices().to_vec();
        let Some(normal_a) = newell_normal(&vertices_a) else {
            continue;
        };

        for &sb in &surfaces_b {
            let Some(data_b) = model.surface(sb) else {
                continue;
            };
            if data_b.adjacent_surface().is_some_and(|p| p != sa) {
                continue;
            }
            let vertices_b = b_in_a.apply(data_b.vertices());
            let Some(normal_b) = newell_normal(&vertices_b) else {
                continue;
            };
            if normal_a.dot(&normal_b) > tol.opposite_normal_dot {
                continue;
            }
            if !circular_equal(&vertices_a, &reversed(&vertices_b), tol.point) {
                continue;
            }

            if let Err(err) = model.set_adjacent_surface(sa, sb) {
                warn!(error = %err, "failed to link matching surfaces");
                continue;
            }
            if current != Some(sb) {
                linked += 1;
            }
            match_sub_surfaces(model, sa, sb, &b_in_a, tol);
            break;
        }
    }

    debug!(a = ?a, b = ?b, linked, "matched surfaces");
    linked
}

/// Links coincident sub-surfaces of two adjacent surfaces. The parents'
/// normal test already holds, so only the loops are compared.
fn match_sub_surfaces(
    model: &mut BuildingModel,
    sa: SurfaceKey,
    sb: SurfaceKey,
    b_in_a: &Transform,
    tol: &Tolerances,
) {
    let subs_a = model.surface_sub_surfaces(sa).to_vec();
    let subs_b = model.surface_sub_surfaces(sb).to_vec();

    for &ua in &subs_a {
        let Some(vertices_a) = model.sub_surface(ua).map(|s| s.vertices().to_vec()) else {
            continue;
        };
        for &ub in &subs_b {
            let Some(vertices_b) = model
                .sub_surface(ub)
                .map(|s| reversed(&b_in_a.apply(s.vertices())))
            else {
                continue;
            };
            if circular_equal(&vertices_a, &vertices_b, tol.point) {
                if let Err(err) = model.set_adjacent_sub_surface(ua, ub) {
                    warn!(error = %err, "failed to link matching sub-surfaces");
                }
                break;
            }
        }
    }
}

/// Removes every adjacency between surfaces of `a` and `b`, sub-surfaces
/// included, and restores default boundary conditions. Returns the number of
/// unlinked surface pairs.
pub fn unmatch_surfaces(model: &mut BuildingModel, a: SpaceKey, b: SpaceKey) -> usize {
    let surfaces_a = model.space_surfaces(a).to_vec();
    let mut unlinked: usize = 0;
    for sa in surfaces_a {
        if model.adjacent_space(sa) != Some(b) {
            continue;
        }
        match model.reset_adjacent_surface(sa) {
            Ok(true) => unlinked += 1,
            Ok(false) => {}
            Err(err) => warn!(error = %err, "failed to unlink surface"),
        }
    }
    unlinked
}
