// Commands the host feeds into a match.
//
// Everything that happens in the surrounding game (a shot fired, a grenade
// going off, a player being hit, a block being built or dug out) reaches the
// engine as a `MatchCommand`. Firing cadence, hit detection and block
// placement stay with the host; the engine only reacts to the outcome.
//
// Actions:
// - `FireWeapon`: directed cone from the muzzle, painted for the shooter.
// - `GrenadeExploded`: radial burst from the (settled) detonation point.
// - `PlayerHit`: ink splatter around the victim, friendly-fire heal.
// - `BlockBuilt`: claim the new block and neutralize what it buried.
// - `BlockRemoved`: release the block's ownership immediately.
//
// See also: `sim.rs` for `apply_command()` which dispatches these.
//
// **Critical constraint: determinism.** Commands are the only external input
// to a match. Internal state changes come from scheduled timers (see
// `event.rs`).

use crate::types::{HitKind, PlayerId, Team, VoxelCoord, WeaponKind};
use serde::{Deserialize, Serialize};

/// A host-issued command for a specific tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchCommand {
    pub player_id: PlayerId,
    pub tick: u64,
    pub action: MatchAction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MatchAction {
    /// A paint gun was fired from `position` along `orientation`.
    FireWeapon {
        team: Team,
        weapon: WeaponKind,
        position: [f32; 3],
        orientation: [f32; 3],
    },
    /// A grenade thrown by `team` detonated at `position`.
    GrenadeExploded { team: Team, position: [f32; 3] },
    /// `player_id` (the shooter) hit `victim`.
    PlayerHit {
        shooter_team: Team,
        victim: PlayerId,
        victim_team: Team,
        victim_position: [f32; 3],
        hit: HitKind,
        amount: u32,
    },
    BlockBuilt { team: Team, coord: VoxelCoord },
    BlockRemoved { coord: VoxelCoord },
}
