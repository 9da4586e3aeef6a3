// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairwise matching and intersection over many spaces.
//!
//! Space pairs are pre-filtered by their building-frame bounding boxes, so
//! only spaces that touch or overlap run the per-surface search.

use bem_lite_core::{BoundingBox, BuildingModel, SpaceKey, Tolerances};
use tracing::debug;

use crate::intersection::{intersect_surfaces, IntersectionReport};
use crate::matching::match_surfaces;

/// Unordered pairs `(spaces[i], spaces[j])`, `i < j`, whose bounding boxes
/// intersect within `tol.point`.
pub fn overlapping_pairs(
    model: &BuildingModel,
    spaces: &[SpaceKey],
    tol: &Tolerances,
) -> Vec<(SpaceKey, SpaceKey)> {
    let boxes: Vec<BoundingBox> = spaces
        .iter()
        .map(|&space| model.space_bounding_box(space))
        .collect();

    let mut pairs = Vec::new();
    for i in 0..spaces.len() {
        for j in (i + 1)..spaces.len() {
            if spaces[i] != spaces[j] && boxes[i].intersects(&boxes[j], tol.point) {
                pairs.push((spaces[i], spaces[j]));
            }
        }
    }
    pairs
}

/// Matches surfaces across every overlapping pair of `spaces`. Returns the
/// number of newly linked surface pairs.
pub fn match_surfaces_all(model: &mut BuildingModel, spaces: &[SpaceKey], tol: &Tolerances) -> usize {
    let pairs = overlapping_pairs(model, spaces, tol);
    let linked: usize = pairs
        .iter()
        .map(|&(a, b)| match_surfaces(model, a, b, tol))
        .sum();
    debug!(pairs = pairs.len(), linked, "matched all spaces");
    linked
}

/// Intersects surfaces across every overlapping pair of `spaces`.
///
/// Bounding boxes are taken once up front; splitting never grows a space.
pub fn intersect_surfaces_all(
    model: &mut BuildingModel,
    spaces: &[SpaceKey],
    tol: &Tolerances,
) -> IntersectionReport {
    let pairs = overlapping_pairs(model, spaces, tol);
    let mut total = IntersectionReport::default();
    for (a, b) in pairs {
        total += intersect_surfaces(model, a, b, tol);
    }
    debug!(new_surfaces = total.new_surfaces(), "intersected all spaces");
    total
}
