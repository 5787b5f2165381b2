// Sparse, bit-packed voxel ownership map.
//
// Each voxel's owner is a 2-bit code (0 neutral, 1 team A, 2 team B). Sixteen
// codes share one `u32` word; words live in an `FxHashMap` keyed by
// `packed_index >> 4` and are created on first write. An absent word means
// "all sixteen voxels neutral", so an untouched 512×512×64 world costs
// nothing.
//
// Per-owner counts are maintained transactionally with every write and never
// recomputed. Because untouched voxels are implicitly neutral, the neutral
// counter is the net number of transitions into neutral: claiming a fresh
// voxel takes it to -1, revoking brings it back. The three counts always sum
// to zero.
//
// See also: `types.rs` for `VoxelCoord::packed_index` and the `Owner` codes,
// `paint.rs` (claims) and `sweep.rs` (revocations) which are the only
// writers.

use crate::types::{Owner, Team, VoxelCoord};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Ownership codes per word.
const CELLS_PER_WORD: u32 = 16;
const CELL_MASK: u32 = 0b11;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnError {
    #[error("invalid owner code {0} (expected 0, 1 or 2)")]
    InvalidOwner(u8),
}

/// Authoritative voxel ownership for one match.
#[derive(Clone, Debug, Default)]
pub struct OwnershipMap {
    words: FxHashMap<u32, u32>,
    /// Indexed by `Owner::code()`.
    counts: [i64; 3],
}

impl OwnershipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the owner of a voxel.
    ///
    /// Returns `false` when the voxel already had `new_owner` (nothing
    /// changes) or when the coordinate cannot be packed; `true` otherwise.
    pub fn own(&mut self, coord: VoxelCoord, new_owner: Owner) -> bool {
        let Some(index) = coord.packed_index() else {
            return false;
        };
        let shift = (index % CELLS_PER_WORD) * 2;
        let key = index / CELLS_PER_WORD;
        let word = self.words.get(&key).copied().unwrap_or(0);

        let old_code = (word >> shift) & CELL_MASK;
        let new_code = u32::from(new_owner.code());
        if old_code == new_code {
            return false;
        }

        self.counts[old_code as usize] -= 1;
        self.counts[new_code as usize] += 1;
        self.words
            .insert(key, (word & !(CELL_MASK << shift)) | (new_code << shift));
        true
    }

    /// `own` for hosts that speak raw owner codes.
    pub fn own_code(&mut self, coord: VoxelCoord, code: u8) -> Result<bool, OwnError> {
        let owner = Owner::from_code(code).ok_or(OwnError::InvalidOwner(code))?;
        Ok(self.own(coord, owner))
    }

    /// Current owner. Unpackable coordinates read as neutral.
    pub fn owner(&self, coord: VoxelCoord) -> Owner {
        let Some(index) = coord.packed_index() else {
            return Owner::Neutral;
        };
        let shift = (index % CELLS_PER_WORD) * 2;
        let word = self
            .words
            .get(&(index / CELLS_PER_WORD))
            .copied()
            .unwrap_or(0);
        // Only codes 0..=2 are ever written.
        Owner::from_code(((word >> shift) & CELL_MASK) as u8).unwrap_or_default()
    }

    /// Number of voxels the team currently owns.
    pub fn get_score(&self, team: Team) -> i64 {
        self.count(team.owner())
    }

    /// Running counter for an owner. See the module comment for what the
    /// neutral counter means.
    pub fn count(&self, owner: Owner) -> i64 {
        self.counts[owner.code() as usize]
    }

    /// Number of materialized 16-voxel words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn fresh_map_is_neutral_and_empty() {
        let map = OwnershipMap::new();
        assert_eq!(map.owner(VoxelCoord::new(10, 10, 5)), Owner::Neutral);
        assert_eq!(map.get_score(Team::A), 0);
        assert_eq!(map.get_score(Team::B), 0);
        assert_eq!(map.count(Owner::Neutral), 0);
        assert_eq!(map.word_count(), 0);
    }

    #[test]
    fn own_is_idempotent() {
        let mut map = OwnershipMap::new();
        let c = VoxelCoord::new(10, 10, 5);
        assert!(map.own(c, Owner::TeamA));
        assert!(!map.own(c, Owner::TeamA));
        assert_eq!(map.get_score(Team::A), 1);
        assert_eq!(map.owner(c), Owner::TeamA);
    }

    #[test]
    fn claim_then_revoke_restores_counts() {
        let mut map = OwnershipMap::new();
        let c = VoxelCoord::new(3, 4, 5);
        let before = (map.count(Owner::TeamA), map.count(Owner::Neutral));
        map.own(c, Owner::TeamA);
        assert_eq!(map.count(Owner::Neutral), before.1 - 1);
        map.own(c, Owner::Neutral);
        assert_eq!((map.count(Owner::TeamA), map.count(Owner::Neutral)), before);
    }

    #[test]
    fn switching_teams_moves_one_unit() {
        let mut map = OwnershipMap::new();
        let c = VoxelCoord::new(0, 0, 0);
        map.own(c, Owner::TeamA);
        assert!(map.own(c, Owner::TeamB));
        assert_eq!(map.get_score(Team::A), 0);
        assert_eq!(map.get_score(Team::B), 1);
        assert_eq!(map.count(Owner::Neutral), -1);
    }

    #[test]
    fn neighbours_in_one_word_do_not_interfere() {
        let mut map = OwnershipMap::new();
        // x = 0..16 with y = z = 0 share a single word.
        for x in 0..16 {
            let owner = if x % 2 == 0 { Owner::TeamA } else { Owner::TeamB };
            map.own(VoxelCoord::new(x, 0, 0), owner);
        }
        assert_eq!(map.word_count(), 1);
        for x in 0..16 {
            let expected = if x % 2 == 0 { Owner::TeamA } else { Owner::TeamB };
            assert_eq!(map.owner(VoxelCoord::new(x, 0, 0)), expected);
        }
        map.own(VoxelCoord::new(15, 0, 0), Owner::Neutral);
        assert_eq!(map.owner(VoxelCoord::new(14, 0, 0)), Owner::TeamA);
        assert_eq!(map.owner(VoxelCoord::new(15, 0, 0)), Owner::Neutral);
    }

    #[test]
    fn unpackable_coords_never_alias() {
        let mut map = OwnershipMap::new();
        assert!(!map.own(VoxelCoord::new(-1, 0, 0), Owner::TeamA));
        assert!(!map.own(VoxelCoord::new(512, 0, 0), Owner::TeamA));
        assert!(!map.own(VoxelCoord::new(0, 0, 64), Owner::TeamB));
        assert_eq!(map.get_score(Team::A), 0);
        assert_eq!(map.owner(VoxelCoord::new(0, 0, 0)), Owner::Neutral);
        assert_eq!(map.word_count(), 0);
    }

    #[test]
    fn raw_codes_are_validated() {
        let mut map = OwnershipMap::new();
        let c = VoxelCoord::new(1, 2, 3);
        assert_eq!(map.own_code(c, 2), Ok(true));
        assert_eq!(map.own_code(c, 2), Ok(false));
        assert_eq!(map.own_code(c, 3), Err(OwnError::InvalidOwner(3)));
        assert_eq!(map.own_code(c, 200), Err(OwnError::InvalidOwner(200)));
        assert_eq!(map.owner(c), Owner::TeamB);
    }

    fn arb_owner() -> impl Strategy<Value = Owner> {
        prop_oneof![
            Just(Owner::Neutral),
            Just(Owner::TeamA),
            Just(Owner::TeamB)
        ]
    }

    proptest! {
        #[test]
        fn counts_match_shadow_map(
            ops in prop::collection::vec(((0..24i32, 0..24i32, 0..8i32), arb_owner()), 1..400)
        ) {
            let mut map = OwnershipMap::new();
            let mut shadow: HashMap<VoxelCoord, Owner> = HashMap::new();
            for ((x, y, z), owner) in ops {
                let c = VoxelCoord::new(x, y, z);
                let previous = shadow.get(&c).copied().unwrap_or_default();
                let changed = map.own(c, owner);
                prop_assert_eq!(changed, previous != owner);
                shadow.insert(c, owner);
            }
            let tally = |o: Owner| shadow.values().filter(|v| **v == o).count() as i64;
            prop_assert_eq!(map.get_score(Team::A), tally(Owner::TeamA));
            prop_assert_eq!(map.get_score(Team::B), tally(Owner::TeamB));
            prop_assert_eq!(
                map.count(Owner::Neutral),
                -(tally(Owner::TeamA) + tally(Owner::TeamB))
            );
            for (c, o) in &shadow {
                prop_assert_eq!(map.owner(*c), *o);
            }
        }
    }
}
