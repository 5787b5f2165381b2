// Painted-column registry and the invalidation sweeper.
//
// Voxels can stop being solid through code paths the engine never sees
// (explosions, map edits, host-side digging). Their ownership would then
// linger and inflate the score. The sweeper restores the invariant "owned
// implies solid" incrementally: every sweep tick it revisits a bounded number
// of painted columns round-robin and revokes ownership of every non-solid
// voxel in them.
//
// The registry only grows during a match. Columns are kept in insertion
// order in a `Vec` (the sweep order) with an `FxHashSet` for O(1) membership.
// Worst-case revocation lag is `len / columns_per_tick` sweep ticks.
//
// See also: `paint.rs` which registers columns, `sim.rs` which schedules the
// sweep on the event queue.

use crate::ownership::OwnershipMap;
use crate::types::{ColumnCoord, Owner};
use crate::world::PaintWorld;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// What one sweep tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub columns_visited: usize,
    /// Voxels whose ownership was actually revoked.
    pub revoked: usize,
}

/// Every column that has ever been painted this match, plus the sweep cursor.
#[derive(Clone, Debug, Default)]
pub struct PaintedColumns {
    members: FxHashSet<ColumnCoord>,
    order: Vec<ColumnCoord>,
    cursor: usize,
}

impl PaintedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. Returns `false` if it was already registered.
    pub fn register(&mut self, column: ColumnCoord) -> bool {
        if self.members.insert(column) {
            self.order.push(column);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, column: ColumnCoord) -> bool {
        self.members.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Columns in registration order.
    pub fn columns(&self) -> &[ColumnCoord] {
        &self.order
    }

    /// Index of the next column the sweeper will visit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// One sweep tick: visit up to `columns_per_tick` columns from the cursor
    /// (wrapping, never visiting a column twice in one tick) and revoke every
    /// non-solid voxel in `0..levels` of each.
    pub fn sweep<W: PaintWorld + ?Sized>(
        &mut self,
        world: &W,
        ownership: &mut OwnershipMap,
        columns_per_tick: usize,
        levels: i32,
    ) -> SweepReport {
        let len = self.order.len();
        if len == 0 {
            return SweepReport::default();
        }
        let visits = columns_per_tick.min(len);
        let mut revoked = 0;
        for i in 0..visits {
            let column = self.order[(self.cursor + i) % len];
            for z in 0..levels {
                let coord = column.voxel(z);
                if !world.is_solid(coord) && ownership.own(coord, Owner::Neutral) {
                    revoked += 1;
                }
            }
        }
        self.cursor = (self.cursor + visits) % len;
        SweepReport {
            columns_visited: visits,
            revoked,
        }
    }
}
