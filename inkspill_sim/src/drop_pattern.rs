// Drop patterns: the voxel offsets one impact point expands into.
//
// For radius class r the pattern is every integer offset with
// |dx| + |dy| + |dz| <= r, a filled octahedron. L1 distance matches the
// face-adjacency metric the world uses for surface checks, so a radius-1 drop
// is exactly the impact voxel plus its six face neighbours.
//
// The table is built once per match and is read-only afterwards.

use serde::{Deserialize, Serialize};

/// Largest supported radius class.
pub const MAX_RADIUS: u8 = 3;

/// A validated drop radius in `0..=MAX_RADIUS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RadiusClass(u8);

impl RadiusClass {
    pub const fn new(radius: u8) -> Option<Self> {
        if radius <= MAX_RADIUS {
            Some(Self(radius))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RadiusClass {
    type Error = String;

    fn try_from(radius: u8) -> Result<Self, Self::Error> {
        Self::new(radius).ok_or_else(|| format!("radius class {radius} exceeds {MAX_RADIUS}"))
    }
}

impl From<RadiusClass> for u8 {
    fn from(radius: RadiusClass) -> u8 {
        radius.0
    }
}

/// Closed-form pattern size: the 3-D octahedral number for `r`.
pub const fn octahedral_count(r: u8) -> usize {
    let r = r as usize;
    (2 * r + 1) * (2 * r * r + 2 * r + 3) / 3
}

/// Precomputed offsets per radius class.
#[derive(Clone, Debug)]
pub struct DropPatterns {
    by_radius: Vec<Vec<(i32, i32, i32)>>,
}

impl Default for DropPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl DropPatterns {
    pub fn new() -> Self {
        let by_radius = (0..=i32::from(MAX_RADIUS))
            .map(|r| {
                let mut offsets = Vec::with_capacity(octahedral_count(r as u8));
                for dx in -r..=r {
                    for dy in -r..=r {
                        for dz in -r..=r {
                            if dx.abs() + dy.abs() + dz.abs() <= r {
                                offsets.push((dx, dy, dz));
                            }
                        }
                    }
                }
                offsets
            })
            .collect();
        Self { by_radius }
    }

    pub fn offsets(&self, radius: RadiusClass) -> &[(i32, i32, i32)] {
        &self.by_radius[radius.get() as usize]
    }
}
