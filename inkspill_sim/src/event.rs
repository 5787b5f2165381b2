// Match events: the internal timer queue and the host-visible output.
//
// The match runs on the same discrete event model as the rest of the sim.
// Periodic work (the invalidation sweep, capture-progress updates, score
// reports) is scheduled into a priority queue ordered by `(tick, sequence)`
// and reschedules itself when it fires. Stopping the timers at match end is
// just clearing the queue.
//
// This file defines two related but distinct concepts:
// - `ScheduledEvent`: internal timer entries that drive the match.
// - `MatchEvent`: output for the host (voxel color changes to broadcast,
//   HUD updates, heal requests, the final result).
//
// See also: `sim.rs` for the step loop that drains the queue, `paint.rs`
// which emits the voxel change events.
//
// **Critical constraint: determinism.** The `(tick, sequence)` key gives a
// total order, so two replays of the same commands emit identical events.

use crate::score::MatchOutcome;
use crate::types::{PlayerId, Rgb, Team, VoxelCoord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// ---------------------------------------------------------------------------
// Internal scheduled events (priority queue)
// ---------------------------------------------------------------------------

/// A timer entry scheduled for future processing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub tick: u64,
    /// Tiebreaker within a tick. Lower values fire first.
    pub sequence: u64,
    pub kind: ScheduledEventKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEventKind {
    /// Revisit the next batch of painted columns.
    SweepTick,
    /// Recompute the capture-rate indicator.
    CaptureUpdate,
    /// Emit the textual score line.
    ScoreReport,
    /// The match time limit ran out.
    TimeUp,
}

// Min-heap on (tick, sequence): BinaryHeap is a max-heap, so reverse.
impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.sequence == other.sequence
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .tick
            .cmp(&self.tick)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Priority queue of timer entries, earliest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventQueue {
    heap: BinaryHeap<ScheduledEvent>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, tick: u64, kind: ScheduledEventKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledEvent {
            tick,
            sequence,
            kind,
        });
    }

    pub fn peek_tick(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.tick)
    }

    /// Pop the next event if its tick is <= `up_to_tick`.
    pub fn pop_if_ready(&mut self, up_to_tick: u64) -> Option<ScheduledEvent> {
        if self.heap.peek().is_some_and(|e| e.tick <= up_to_tick) {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Host-visible events (output)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub tick: u64,
    pub kind: MatchEventKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchEventKind {
    /// A voxel took on ink.
    VoxelRecolored {
        coord: VoxelCoord,
        color: Rgb,
        team: Team,
    },
    /// Observers see a color change as a remove followed by a rebuild.
    VoxelRemoved { coord: VoxelCoord },
    VoxelRebuilt { coord: VoxelCoord, color: Rgb },
    /// Periodic capture-rate update for the HUD.
    CaptureProgress { leader: Team, team_a_share: f64 },
    /// Periodic textual score line.
    ScoreReport { message: String },
    /// A friendly hit should restore `amount` health to `victim`.
    FriendlyFireHeal { victim: PlayerId, amount: u32 },
    MatchEnded {
        outcome: MatchOutcome,
        summary: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_queue_ordering() {
        let mut queue = EventQueue::new();
        queue.schedule(100, ScheduledEventKind::ScoreReport);
        queue.schedule(50, ScheduledEventKind::SweepTick);
        queue.schedule(50, ScheduledEventKind::CaptureUpdate);

        let first = queue.pop_if_ready(200).unwrap();
        assert_eq!(first.tick, 50);
        assert_eq!(first.kind, ScheduledEventKind::SweepTick);

        let second = queue.pop_if_ready(200).unwrap();
        assert_eq!(second.tick, 50);
        assert_eq!(second.sequence, 2);

        let third = queue.pop_if_ready(200).unwrap();
        assert_eq!(third.tick, 100);

        assert!(queue.pop_if_ready(200).is_none());
    }

    #[test]
    fn pop_if_ready_respects_tick_limit() {
        let mut queue = EventQueue::new();
        queue.schedule(100, ScheduledEventKind::SweepTick);
        assert!(queue.pop_if_ready(99).is_none());
        assert!(queue.pop_if_ready(100).is_some());
    }

    #[test]
    fn clear_stops_all_timers() {
        let mut queue = EventQueue::new();
        queue.schedule(1, ScheduledEventKind::SweepTick);
        queue.schedule(2, ScheduledEventKind::CaptureUpdate);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.peek_tick(), None);
    }

    #[test]
    fn event_queue_serialization() {
        let mut queue = EventQueue::new();
        queue.schedule(10, ScheduledEventKind::SweepTick);
        queue.schedule(20, ScheduledEventKind::ScoreReport);

        let json = serde_json::to_string(&queue).unwrap();
        let mut restored: EventQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.pop_if_ready(100).unwrap().tick, 10);
    }

    #[test]
    fn match_event_serialization() {
        let event = MatchEvent {
            tick: 7,
            kind: MatchEventKind::VoxelRecolored {
                coord: VoxelCoord::new(1, 2, 3),
                color: Rgb::new(10, 20, 30),
                team: Team::B,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let restored: MatchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, restored);
    }
}
