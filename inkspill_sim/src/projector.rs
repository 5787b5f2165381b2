// Paint projection: turn a shot or a burst into impact voxels.
//
// Two modes:
// - Directed cone (gunfire). The aim vector is normalized, then each pellet
//   perturbs the base aim on every axis by `(u1 - u2) * spread` and
//   renormalizes. Rays are cast to twice the weapon range; a hit farther
//   than the range from the muzzle is discarded, never clipped.
// - Radial burst (grenades, hit splatter). Directions are isotropic Gaussian
//   samples normalized to unit length, which is uniform on the sphere. Same
//   cast-twice-keep-within-range rule.
//
// Output is an unordered impact list; duplicates are allowed and a miss just
// contributes nothing.
//
// See also: `world.rs` for `PaintWorld::cast_ray`, `paint.rs` which consumes
// the impact list.

use crate::config::WeaponParams;
use crate::prng::GameRng;
use crate::types::VoxelCoord;
use crate::world::PaintWorld;
use smallvec::SmallVec;

/// Ray directions for one shot or burst. Shotguns fire 8 pellets.
pub type Directions = SmallVec<[[f32; 3]; 8]>;

fn normalized(v: [f64; 3]) -> Option<[f32; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len.is_nan() || len <= 1e-9 {
        return None;
    }
    Some([(v[0] / len) as f32, (v[1] / len) as f32, (v[2] / len) as f32])
}

/// Per-pellet directions around `orientation`.
///
/// A degenerate aim vector yields no directions.
pub fn cone_directions(
    rng: &mut GameRng,
    orientation: [f32; 3],
    spread: f32,
    pellets: u32,
) -> Directions {
    let Some(base) = normalized(orientation.map(f64::from)) else {
        return Directions::new();
    };
    let mut out = Directions::new();
    for _ in 0..pellets {
        let mut jitter = || f64::from((rng.next_f32() - rng.next_f32()) * spread);
        let perturbed = [
            f64::from(base[0]) + jitter(),
            f64::from(base[1]) + jitter(),
            f64::from(base[2]) + jitter(),
        ];
        if let Some(dir) = normalized(perturbed) {
            out.push(dir);
        }
    }
    out
}

/// `count` unit vectors uniformly distributed on the sphere.
pub fn burst_directions(rng: &mut GameRng, count: u32) -> Directions {
    (0..count)
        .filter_map(|_| {
            normalized([rng.next_gaussian(), rng.next_gaussian(), rng.next_gaussian()])
        })
        .collect()
}

/// Cast every direction from `origin` out to `2 * range` and keep the hits
/// within `range`.
pub fn cast_within_range<W: PaintWorld + ?Sized>(
    world: &W,
    origin: [f32; 3],
    directions: &[[f32; 3]],
    range: f32,
) -> Vec<VoxelCoord> {
    let range_sq = range * range;
    directions
        .iter()
        .filter_map(|&dir| world.cast_ray(origin, dir, range * 2.0))
        .filter(|hit| hit.distance_sq_from(origin) <= range_sq)
        .collect()
}

/// Impact points of one shot from a paint gun.
pub fn directed_cone<W: PaintWorld + ?Sized>(
    world: &W,
    rng: &mut GameRng,
    origin: [f32; 3],
    orientation: [f32; 3],
    weapon: &WeaponParams,
) -> Vec<VoxelCoord> {
    let directions = cone_directions(rng, orientation, weapon.spread, weapon.pellets);
    cast_within_range(world, origin, &directions, weapon.range)
}

/// Impact points of a radial burst centered on `center`.
pub fn radial_burst<W: PaintWorld + ?Sized>(
    world: &W,
    rng: &mut GameRng,
    center: [f32; 3],
    rays: u32,
    range: f32,
) -> Vec<VoxelCoord> {
    let directions = burst_directions(rng, rays);
    cast_within_range(world, center, &directions, range)
}

/// Where a grenade's burst is cast from. When nothing is solid at the
/// grenade's voxel or at the two voxels toward -z from it, the origin moves
/// one voxel toward -z.
pub fn settle_burst_origin<W: PaintWorld + ?Sized>(world: &W, position: [f32; 3]) -> [f32; 3] {
    let base = VoxelCoord::new(
        position[0].floor() as i32,
        position[1].floor() as i32,
        position[2].floor() as i32,
    );
    let grounded = (0..3).any(|up| world.is_solid(base.offset(0, 0, -up)));
    if grounded {
        position
    } else {
        [position[0], position[1], position[2] - 1.0]
    }
}
