// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid while other entities
//! are added or removed (generational indices). They are totally ordered,
//! which gives every entity a stable identity for deterministic iteration and
//! for memoizing surface pairs.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a space (a volume of the building owning surfaces).
    pub struct SpaceKey;

    /// Key for a surface (floor, wall or roof polygon of a space).
    pub struct SurfaceKey;

    /// Key for a sub-surface (window, door or skylight inside a surface).
    pub struct SubSurfaceKey;
}

/// Returns the pair ordered as `(min, max)` so `(a, b)` and `(b, a)` hash alike.
pub fn unordered_pair<K: Ord>(a: K, b: K) -> (K, K) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn unordered_pair_is_symmetric() {
        let mut map: SlotMap<SurfaceKey, ()> = SlotMap::with_key();
        let a = map.insert(());
        let b = map.insert(());

        assert_eq!(unordered_pair(a, b), unordered_pair(b, a));
        assert_eq!(unordered_pair(a, a), (a, a));
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut map: SlotMap<SpaceKey, u32> = SlotMap::with_key();
        let first = map.insert(1);
        let second = map.insert(2);
        assert!(first < second);
    }
}
