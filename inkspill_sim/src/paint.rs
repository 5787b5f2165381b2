// Paint application: impact points in, owned and recolored voxels out.
//
// A paint call runs three phases:
//
// 1. `expand_impacts`: every impact point is expanded through the drop
//    pattern of its radius class. Each candidate is pushed twice: as-is, and
//    nudged. The nudge looks at the two neighbours of the *un-nudged*
//    candidate along each axis; when both are solid surface voxels it adds a
//    random step in {-1, 0, +1} on that axis. Nudges from all three axes
//    accumulate into the second point. This breaks up the flat discs a pure
//    octahedron leaves on walls and floors, and roughly doubles density near
//    the impact center.
// 2. `claim_voxels`: candidates that are out of bounds or not an exposed
//    solid voxel are dropped. The rest are claimed for the team and
//    collected, de-duplicated, in first-seen order.
// 3. `recolor_voxels`: each claimed voxel is blended toward the team color
//    at a random weight, written back, announced (recolor plus the
//    remove/rebuild pair observers expect), and its column is registered with
//    the sweeper.
//
// See also: `projector.rs` (where impact points come from), `drop_pattern.rs`,
// `color.rs`, `sweep.rs`.
//
// **Critical constraint: determinism.** The RNG is consumed in a fixed order:
// nudges in candidate order, then one weight per claimed voxel in claim
// order.

use crate::color::ColorBlender;
use crate::drop_pattern::{DropPatterns, RadiusClass};
use crate::event::{MatchEvent, MatchEventKind};
use crate::ownership::OwnershipMap;
use crate::prng::GameRng;
use crate::sweep::PaintedColumns;
use crate::types::{Rgb, Team, VoxelCoord};
use crate::world::PaintWorld;
use rustc_hash::FxHashSet;

/// Summary of one paint call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaintReport {
    /// Candidate voxels produced by expansion (with duplicates).
    pub candidates: usize,
    /// Voxels claimed and recolored, in claim order.
    pub updated: Vec<VoxelCoord>,
    /// Columns seen for the first time this match.
    pub new_columns: usize,
}

fn is_exposed<W: PaintWorld + ?Sized>(world: &W, coord: VoxelCoord) -> bool {
    world.is_solid(coord) && world.is_surface(coord)
}

/// Random offset per axis for a candidate whose axis neighbours are both
/// exposed solid voxels.
fn nudge<W: PaintWorld + ?Sized>(world: &W, rng: &mut GameRng, c: VoxelCoord) -> VoxelCoord {
    let mut out = c;
    if is_exposed(world, c.offset(-1, 0, 0)) && is_exposed(world, c.offset(1, 0, 0)) {
        out.x += rng.range_i32_inclusive(-1, 1);
    }
    if is_exposed(world, c.offset(0, -1, 0)) && is_exposed(world, c.offset(0, 1, 0)) {
        out.y += rng.range_i32_inclusive(-1, 1);
    }
    if is_exposed(world, c.offset(0, 0, -1)) && is_exposed(world, c.offset(0, 0, 1)) {
        out.z += rng.range_i32_inclusive(-1, 1);
    }
    out
}

/// Expand impact points through the drop pattern. Returns two candidates
/// per impact per offset.
pub fn expand_impacts<W: PaintWorld + ?Sized>(
    world: &W,
    rng: &mut GameRng,
    patterns: &DropPatterns,
    impacts: &[VoxelCoord],
    radius: RadiusClass,
) -> Vec<VoxelCoord> {
    let offsets = patterns.offsets(radius);
    let mut candidates = Vec::with_capacity(impacts.len() * offsets.len() * 2);
    for &impact in impacts {
        for &(dx, dy, dz) in offsets {
            let c = impact.offset(dx, dy, dz);
            candidates.push(c);
            candidates.push(nudge(world, rng, c));
        }
    }
    candidates
}

/// Claim every paintable candidate for `team`. Returns the distinct claimed
/// voxels in first-seen order.
pub fn claim_voxels<W: PaintWorld + ?Sized>(
    world: &W,
    ownership: &mut OwnershipMap,
    team: Team,
    candidates: &[VoxelCoord],
) -> Vec<VoxelCoord> {
    let mut seen = FxHashSet::default();
    let mut updated = Vec::new();
    for &c in candidates {
        if !c.is_paintable() || !is_exposed(world, c) {
            continue;
        }
        // Repainting your own voxel still recolors it, so whether the owner
        // actually changed does not matter here.
        let _ = ownership.own(c, team.owner());
        if seen.insert(c) {
            updated.push(c);
        }
    }
    updated
}

/// Blend each voxel toward `team_color`, emit the change events and register
/// the columns. Returns the number of newly registered columns.
#[allow(clippy::too_many_arguments)]
pub fn recolor_voxels<W: PaintWorld + ?Sized>(
    world: &mut W,
    blender: &ColorBlender,
    rng: &mut GameRng,
    painted: &mut PaintedColumns,
    team: Team,
    team_color: Rgb,
    weight_range: (u8, u8),
    updated: &[VoxelCoord],
    tick: u64,
    events: &mut Vec<MatchEvent>,
) -> usize {
    let (lo, hi) = weight_range;
    let mut new_columns = 0;
    for &coord in updated {
        let weight = rng.range_u32_inclusive(u32::from(lo), u32::from(hi)) as u8;
        let color = blender.blend(world.color(coord), team_color, weight);
        world.set_color(coord, color);

        events.push(MatchEvent {
            tick,
            kind: MatchEventKind::VoxelRecolored { coord, color, team },
        });
        events.push(MatchEvent {
            tick,
            kind: MatchEventKind::VoxelRemoved { coord },
        });
        events.push(MatchEvent {
            tick,
            kind: MatchEventKind::VoxelRebuilt { coord, color },
        });

        if painted.register(coord.column()) {
            new_columns += 1;
        }
    }
    new_columns
}
