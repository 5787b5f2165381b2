// The voxel world as seen by the paint engine.
//
// The engine does not own map geometry. Solidity, surface status and voxel
// colors belong to the host server and are reached through the `PaintWorld`
// trait, together with the host's ray-intersection primitive.
//
// `GridWorld` is a dense implementation of that trait: a flat
// `Vec<Option<Rgb>>` indexed by `x + y * size_x + z * size_x * size_y`
// (`None` is air). Out-of-bounds reads are air, out-of-bounds writes are
// no-ops. `cast_ray` is a 3D DDA (Amanatides & Woo) that returns the first
// solid voxel along the ray. Tests, benches, and hosts without their own map
// representation use it.
//
// See also: `projector.rs` (ray casting), `paint.rs` (surface checks and
// recoloring), `sweep.rs` (solidity re-checks).

use crate::types::{Rgb, VoxelCoord};

/// Geometry oracle supplied by the host.
pub trait PaintWorld {
    fn is_solid(&self, coord: VoxelCoord) -> bool;

    /// Solid with at least one non-solid face neighbour.
    fn is_surface(&self, coord: VoxelCoord) -> bool;

    /// Color of a solid voxel. Unspecified for air.
    fn color(&self, coord: VoxelCoord) -> Rgb;

    fn set_color(&mut self, coord: VoxelCoord, color: Rgb);

    /// First solid voxel hit by the ray within `max_distance`, if any.
    fn cast_ray(
        &self,
        origin: [f32; 3],
        direction: [f32; 3],
        max_distance: f32,
    ) -> Option<VoxelCoord>;
}

/// The six face-adjacent neighbour offsets.
pub const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Traversal step cap. Any ray across a 512×512×64 map crosses fewer voxel
/// boundaries than this.
const MAX_RAY_STEPS: usize = 4096;

/// Dense voxel grid implementing `PaintWorld`.
#[derive(Clone, Debug, Default)]
pub struct GridWorld {
    /// Flat storage: index = x + y * size_x + z * size_x * size_y.
    voxels: Vec<Option<Rgb>>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl GridWorld {
    /// Create a world filled with air.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            voxels: vec![None; total],
            size_x,
            size_y,
            size_z,
        }
    }

    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let sx = self.size_x as usize;
            let sy = self.size_y as usize;
            Some(coord.x as usize + coord.y as usize * sx + coord.z as usize * sx * sy)
        } else {
            None
        }
    }

    /// Read a voxel. `None` is air (including out of bounds).
    pub fn get(&self, coord: VoxelCoord) -> Option<Rgb> {
        self.index(coord).and_then(|i| self.voxels[i])
    }

    /// Place a solid voxel of the given color. No-op out of bounds.
    pub fn set_block(&mut self, coord: VoxelCoord, color: Rgb) {
        if let Some(i) = self.index(coord) {
            self.voxels[i] = Some(color);
        }
    }

    /// Turn a voxel into air. No-op out of bounds.
    pub fn remove_block(&mut self, coord: VoxelCoord) {
        if let Some(i) = self.index(coord) {
            self.voxels[i] = None;
        }
    }

    /// Fill every voxel with `z >= from_z`: a flat slab whose top layer is
    /// the only surface.
    pub fn fill_below(&mut self, from_z: i32, color: Rgb) {
        for z in from_z.max(0)..self.size_z as i32 {
            for y in 0..self.size_y as i32 {
                for x in 0..self.size_x as i32 {
                    self.set_block(VoxelCoord::new(x, y, z), color);
                }
            }
        }
    }
}

impl PaintWorld for GridWorld {
    fn is_solid(&self, coord: VoxelCoord) -> bool {
        self.get(coord).is_some()
    }

    fn is_surface(&self, coord: VoxelCoord) -> bool {
        self.is_solid(coord)
            && FACE_OFFSETS
                .iter()
                .any(|&(dx, dy, dz)| !self.is_solid(coord.offset(dx, dy, dz)))
    }

    fn color(&self, coord: VoxelCoord) -> Rgb {
        self.get(coord).unwrap_or_default()
    }

    fn set_color(&mut self, coord: VoxelCoord, color: Rgb) {
        if let Some(Some(existing)) = self.index(coord).map(|i| &mut self.voxels[i]) {
            *existing = color;
        }
    }

    /// Uses the Amanatides & Woo voxel traversal. The voxel containing the
    /// origin is tested first, so a ray starting inside a block hits it.
    fn cast_ray(
        &self,
        origin: [f32; 3],
        direction: [f32; 3],
        max_distance: f32,
    ) -> Option<VoxelCoord> {
        let len = (direction[0] * direction[0]
            + direction[1] * direction[1]
            + direction[2] * direction[2])
            .sqrt();
        if len.is_nan() || len <= 1e-6 {
            return None;
        }
        // Unit direction, so t is measured in voxels.
        let dir = [direction[0] / len, direction[1] / len, direction[2] / len];

        let mut voxel = [
            origin[0].floor() as i32,
            origin[1].floor() as i32,
            origin[2].floor() as i32,
        ];

        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];

        for axis in 0..3 {
            if dir[axis] > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / dir[axis];
                t_max[axis] = ((voxel[axis] as f32 + 1.0) - origin[axis]) / dir[axis];
            } else if dir[axis] < 0.0 {
                step[axis] = -1;
                t_delta[axis] = 1.0 / (-dir[axis]);
                t_max[axis] = (origin[axis] - voxel[axis] as f32) / (-dir[axis]);
            }
        }

        for _ in 0..MAX_RAY_STEPS {
            let coord = VoxelCoord::new(voxel[0], voxel[1], voxel[2]);
            if self.is_solid(coord) {
                return Some(coord);
            }

            let min_axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
                0
            } else if t_max[1] <= t_max[2] {
                1
            } else {
                2
            };

            if t_max[min_axis] > max_distance {
                return None;
            }

            voxel[min_axis] += step[min_axis];
            t_max[min_axis] += t_delta[min_axis];
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STONE: Rgb = Rgb::new(90, 90, 90);

    #[test]
    fn new_world_is_all_air() {
        let world = GridWorld::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert!(!world.is_solid(VoxelCoord::new(x, y, z)));
                }
            }
        }
    }

    #[test]
    fn set_and_remove() {
        let mut world = GridWorld::new(8, 8, 8);
        let c = VoxelCoord::new(3, 5, 2);
        world.set_block(c, STONE);
        assert!(world.is_solid(c));
        assert_eq!(world.color(c), STONE);
        assert!(!world.is_solid(VoxelCoord::new(3, 5, 3)));
        world.remove_block(c);
        assert!(!world.is_solid(c));
    }

    #[test]
    fn out_of_bounds_is_air_and_writes_are_noops() {
        let mut world = GridWorld::new(4, 4, 4);
        world.set_block(VoxelCoord::new(-1, 0, 0), STONE);
        world.set_block(VoxelCoord::new(4, 0, 0), STONE);
        assert!(!world.is_solid(VoxelCoord::new(-1, 0, 0)));
        assert!(!world.is_solid(VoxelCoord::new(100, 100, 100)));
    }

    #[test]
    fn indexing_is_correct() {
        let mut world = GridWorld::new(10, 8, 6);
        let c = VoxelCoord::new(5, 3, 4);
        world.set_block(c, STONE);
        assert!(world.is_solid(c));
        assert!(!world.is_solid(VoxelCoord::new(4, 3, 4)));
        assert!(!world.is_solid(VoxelCoord::new(5, 2, 4)));
        assert!(!world.is_solid(VoxelCoord::new(5, 3, 3)));
    }

    #[test]
    fn surface_means_exposed_solid() {
        let mut world = GridWorld::new(8, 8, 8);
        world.fill_below(4, STONE);
        // Top layer of the slab is exposed.
        assert!(world.is_surface(VoxelCoord::new(3, 3, 4)));
        // One below is buried (edges aside).
        assert!(!world.is_surface(VoxelCoord::new(3, 3, 5)));
        // Air is never surface.
        assert!(!world.is_surface(VoxelCoord::new(3, 3, 3)));
        // Slab edge touches out-of-bounds air.
        assert!(world.is_surface(VoxelCoord::new(0, 3, 6)));
    }

    #[test]
    fn set_color_ignores_air() {
        let mut world = GridWorld::new(4, 4, 4);
        let c = VoxelCoord::new(1, 1, 1);
        world.set_color(c, STONE);
        assert!(!world.is_solid(c));
    }

    #[test]
    fn ray_hits_first_solid_voxel() {
        let mut world = GridWorld::new(16, 16, 16);
        world.set_block(VoxelCoord::new(8, 4, 8), STONE);
        world.set_block(VoxelCoord::new(12, 4, 8), STONE);
        let hit = world.cast_ray([0.5, 4.5, 8.5], [1.0, 0.0, 0.0], 64.0);
        assert_eq!(hit, Some(VoxelCoord::new(8, 4, 8)));
    }

    #[test]
    fn ray_respects_max_distance() {
        let mut world = GridWorld::new(16, 16, 16);
        world.set_block(VoxelCoord::new(10, 4, 8), STONE);
        assert!(world.cast_ray([0.5, 4.5, 8.5], [1.0, 0.0, 0.0], 5.0).is_none());
        assert!(world.cast_ray([0.5, 4.5, 8.5], [1.0, 0.0, 0.0], 12.0).is_some());
    }

    #[test]
    fn ray_downward_lands_on_slab() {
        let mut world = GridWorld::new(16, 16, 16);
        world.fill_below(10, STONE);
        // +z points into the ground.
        let hit = world.cast_ray([4.5, 4.5, 2.5], [0.0, 0.0, 1.0], 32.0);
        assert_eq!(hit, Some(VoxelCoord::new(4, 4, 10)));
    }

    #[test]
    fn ray_with_zero_direction_misses() {
        let mut world = GridWorld::new(4, 4, 4);
        world.set_block(VoxelCoord::new(1, 1, 1), STONE);
        assert!(world.cast_ray([1.5, 1.5, 1.5], [0.0, 0.0, 0.0], 10.0).is_none());
    }

    #[test]
    fn diagonal_ray_finds_block() {
        let mut world = GridWorld::new(16, 16, 16);
        world.set_block(VoxelCoord::new(6, 6, 6), STONE);
        let hit = world.cast_ray([0.5, 0.5, 0.5], [1.0, 1.0, 1.0], 32.0);
        assert_eq!(hit, Some(VoxelCoord::new(6, 6, 6)));
    }
}
