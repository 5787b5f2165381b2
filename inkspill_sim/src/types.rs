// Core types shared across the paint engine.
//
// Defines voxel and column coordinates (with the packed ownership index),
// teams and owners, colors, and the small enums carried by commands. All
// types derive `Serialize`/`Deserialize` so commands and events can be logged
// and replayed by the host.
//
// World extents are fixed by the packed index layout: 9 bits of x, 9 bits of
// y, then z. Painting is limited to z < 63; the ownership map and the sweeper
// also address z = 63.

use serde::{Deserialize, Serialize};
use std::fmt;

/// World extent along x (and y).
pub const WORLD_SIZE_XY: i32 = 512;

/// Number of paintable z-levels. Voxels at z >= this are never painted.
pub const WORLD_PAINT_DEPTH: i32 = 63;

/// Number of z-levels addressable by the packed index.
pub const WORLD_INDEX_DEPTH: i32 = 64;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A voxel position. x and y span the map horizontally, z is the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Componentwise offset, saturating at the `i32` bounds.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    /// Whether paint may land here: x,y in [0, 512), z in [0, 63).
    pub fn is_paintable(self) -> bool {
        (0..WORLD_SIZE_XY).contains(&self.x)
            && (0..WORLD_SIZE_XY).contains(&self.y)
            && (0..WORLD_PAINT_DEPTH).contains(&self.z)
    }

    /// Packed index `x | (y << 9) | (z << 18)`, or `None` when the coordinate
    /// does not fit the 9/9/6-bit layout.
    pub fn packed_index(self) -> Option<u32> {
        let fits = (0..WORLD_SIZE_XY).contains(&self.x)
            && (0..WORLD_SIZE_XY).contains(&self.y)
            && (0..WORLD_INDEX_DEPTH).contains(&self.z);
        fits.then(|| self.x as u32 | ((self.y as u32) << 9) | ((self.z as u32) << 18))
    }

    /// The (x, y) column this voxel belongs to.
    pub const fn column(self) -> ColumnCoord {
        ColumnCoord::new(self.x, self.y)
    }

    /// Squared Euclidean distance from a world-space point to this voxel's
    /// integer corner, the metric used for weapon range checks.
    pub fn distance_sq_from(self, point: [f32; 3]) -> f32 {
        let dx = self.x as f32 - point[0];
        let dy = self.y as f32 - point[1];
        let dz = self.z as f32 - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A vertical column of voxels, the unit the sweeper revisits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnCoord {
    pub x: i32,
    pub y: i32,
}

impl ColumnCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn voxel(self, z: i32) -> VoxelCoord {
        VoxelCoord::new(self.x, self.y, z)
    }
}

// ---------------------------------------------------------------------------
// Teams and ownership
// ---------------------------------------------------------------------------

/// One of the two competing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    /// Zero-based index into per-team tables.
    pub const fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }

    /// The ownership value this team writes when it claims a voxel.
    pub const fn owner(self) -> Owner {
        match self {
            Team::A => Owner::TeamA,
            Team::B => Owner::TeamB,
        }
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Who holds a voxel. Stored as a 2-bit code (see `ownership.rs`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Neutral,
    TeamA,
    TeamB,
}

impl Owner {
    /// The 2-bit cell code.
    pub const fn code(self) -> u8 {
        match self {
            Owner::Neutral => 0,
            Owner::TeamA => 1,
            Owner::TeamB => 2,
        }
    }

    /// Decode a cell code. Returns `None` for anything but 0, 1, 2.
    pub const fn from_code(code: u8) -> Option<Owner> {
        match code {
            0 => Some(Owner::Neutral),
            1 => Some(Owner::TeamA),
            2 => Some(Owner::TeamB),
            _ => None,
        }
    }

    pub const fn team(self) -> Option<Team> {
        match self {
            Owner::Neutral => None,
            Owner::TeamA => Some(Team::A),
            Owner::TeamB => Some(Team::B),
        }
    }
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// An 8-bit-per-channel display color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ---------------------------------------------------------------------------
// Identifiers and command enums
// ---------------------------------------------------------------------------

/// Host-assigned player identifier. Sessions are managed by the host; the
/// engine only echoes the id back in events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Paint guns, keyed into `MatchConfig::weapons`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    Rifle,
    Smg,
    Shotgun,
}

/// How a player was hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Weapon,
    Headshot,
    Melee,
    Grenade,
    Fall,
}

impl HitKind {
    /// Only gunfire splatters ink on the victim's surroundings.
    pub const fn splatters_ink(self) -> bool {
        matches!(self, HitKind::Weapon | HitKind::Headshot)
    }
}

/// What is trying to destroy a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Block tool (spade) digging.
    Spade,
    /// Gunfire aimed at the block.
    Weapon,
    /// Grenade blast.
    Grenade,
}
