// Top-level match state and the step loop.
//
// `MatchState` is the per-match context: the ownership map, the painted-column
// registry, the PRNG, the config, the timer queue, and the blend and drop
// tables. It is built when a match starts and dropped when the next one
// begins; nothing lives in globals.
//
// ## Stepping
//
// The host calls `step(world, commands, target_tick)` from its loop. Commands
// are applied in tick order, interleaved with the timers that fall due:
//
// - `SweepTick` every `sweep_interval_ticks`: revisit a batch of painted
//   columns and revoke ownership of voxels that are no longer solid.
// - `CaptureUpdate` every `capture_update_interval_ticks`: emit the biased
//   capture progress for the HUD.
// - `ScoreReport` every `score_report_interval_ticks` (if non-zero): emit the
//   textual score line.
// - `TimeUp` once, after `time_limit_ticks` (if non-zero): end the match.
//
// Each periodic timer reschedules itself when it fires. `end_match()` clears
// the queue, which stops all of them, and freezes the state: later commands
// are ignored.
//
// ## Paint flow
//
// A command becomes impact points via `projector.rs`, impact points become
// claimed voxels via `paint.rs`. The same `paint()` entry point is public for
// hosts that compute their own impacts.
//
// Hosts with their own timer system can skip `step()` and call the direct
// entry points (`paint`, `fire_weapon`, `sweep_now`, `block_built`, ...)
// themselves.
//
// See also: `event.rs` for the timer queue and output events, `command.rs`
// for `MatchCommand`, `config.rs` for `MatchConfig`, `score.rs` for the
// score views.
//
// **Critical constraint: determinism.** All state mutations flow through
// `MatchCommand`s or scheduled timers, and all randomness comes from the
// match's `GameRng`. Same seed + same commands + same world = same events.

use crate::color::{ColorBlender, shade};
use crate::command::{MatchAction, MatchCommand};
use crate::config::{BurstParams, ConfigError, MatchConfig};
use crate::drop_pattern::{DropPatterns, RadiusClass};
use crate::event::{EventQueue, MatchEvent, MatchEventKind, ScheduledEventKind};
use crate::ownership::OwnershipMap;
use crate::paint::{self, PaintReport};
use crate::prng::GameRng;
use crate::projector;
use crate::score::{MatchOutcome, ScoreTracker};
use crate::sweep::{PaintedColumns, SweepReport};
use crate::types::{DestroyCause, HitKind, Owner, PlayerId, Rgb, Team, VoxelCoord, WeaponKind};
use crate::world::{FACE_OFFSETS, PaintWorld};

/// The state of one match.
#[derive(Clone, Debug)]
pub struct MatchState {
    /// Current match tick.
    pub tick: u64,

    /// The match's deterministic PRNG.
    pub rng: GameRng,

    /// Match configuration (immutable after construction).
    pub config: MatchConfig,

    /// Pending timers.
    pub event_queue: EventQueue,

    /// Authoritative voxel ownership.
    pub ownership: OwnershipMap,

    /// Columns the sweeper revisits.
    pub painted: PaintedColumns,

    blender: ColorBlender,
    drop_patterns: DropPatterns,

    /// Set once the match has ended.
    outcome: Option<MatchOutcome>,
}

/// The result of processing commands and advancing the match.
pub struct StepResult {
    /// Output events emitted during this step, in order.
    pub events: Vec<MatchEvent>,
}

impl MatchState {
    /// Start a match with the default config.
    pub fn new(seed: u64) -> Self {
        Self::start(seed, MatchConfig::default())
    }

    /// Start a match with the given seed and config. The config is validated
    /// first; a zero timer interval or an inverted range is rejected here.
    pub fn with_config(seed: u64, config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(seed, config))
    }

    fn start(seed: u64, config: MatchConfig) -> Self {
        let mut event_queue = EventQueue::new();
        event_queue.schedule(config.sweep_interval_ticks, ScheduledEventKind::SweepTick);
        event_queue.schedule(
            config.capture_update_interval_ticks,
            ScheduledEventKind::CaptureUpdate,
        );
        if config.score_report_interval_ticks > 0 {
            event_queue.schedule(
                config.score_report_interval_ticks,
                ScheduledEventKind::ScoreReport,
            );
        }
        if config.time_limit_ticks > 0 {
            event_queue.schedule(config.time_limit_ticks, ScheduledEventKind::TimeUp);
        }

        log::info!(
            "match started (seed {seed}): {} vs {}",
            config.teams[0].name,
            config.teams[1].name
        );

        Self {
            tick: 0,
            rng: GameRng::new(seed),
            config,
            event_queue,
            ownership: OwnershipMap::new(),
            painted: PaintedColumns::new(),
            blender: ColorBlender::new(),
            drop_patterns: DropPatterns::new(),
            outcome: None,
        }
    }

    /// Apply commands and fire due timers up to `target_tick`.
    ///
    /// `commands` must be sorted by tick. Commands after `target_tick` are
    /// left for a later call. Commands stamped at or before the current tick
    /// are applied at the current tick, even when `target_tick` does not move
    /// the clock forward.
    pub fn step<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        commands: &[MatchCommand],
        target_tick: u64,
    ) -> StepResult {
        let mut events = Vec::new();
        let mut cmd_idx = 0;

        while self.tick < target_tick {
            let next_event_tick = self.event_queue.peek_tick();
            let next_cmd_tick = commands
                .get(cmd_idx)
                .filter(|c| c.tick <= target_tick)
                .map(|c| c.tick);

            let next_tick = match (next_event_tick, next_cmd_tick) {
                (Some(et), Some(ct)) => et.min(ct).min(target_tick),
                (Some(et), None) => et.min(target_tick),
                (None, Some(ct)) => ct.min(target_tick),
                (None, None) => target_tick,
            };

            // Commands stamped before the current tick apply now.
            self.tick = next_tick.max(self.tick);

            while cmd_idx < commands.len() && commands[cmd_idx].tick <= self.tick {
                let cmd = &commands[cmd_idx];
                cmd_idx += 1;
                self.apply_command(world, cmd, &mut events);
            }

            while let Some(event) = self.event_queue.pop_if_ready(self.tick) {
                self.process_event(world, event.kind, &mut events);
            }
        }

        // A step that does not advance still applies commands already due.
        while cmd_idx < commands.len() && commands[cmd_idx].tick <= target_tick {
            let cmd = &commands[cmd_idx];
            cmd_idx += 1;
            self.apply_command(world, cmd, &mut events);
        }

        self.tick = self.tick.max(target_tick);
        StepResult { events }
    }

    fn apply_command<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        cmd: &MatchCommand,
        events: &mut Vec<MatchEvent>,
    ) {
        if self.outcome.is_some() {
            log::debug!(
                "tick {}: ignoring command from player {} after match end",
                self.tick,
                cmd.player_id.0
            );
            return;
        }
        match &cmd.action {
            MatchAction::FireWeapon {
                team,
                weapon,
                position,
                orientation,
            } => {
                self.fire_weapon(world, *team, *weapon, *position, *orientation, events);
            }
            MatchAction::GrenadeExploded { team, position } => {
                self.grenade_exploded(world, *team, *position, events);
            }
            MatchAction::PlayerHit {
                shooter_team,
                victim,
                victim_team,
                victim_position,
                hit,
                amount,
            } => {
                let hit = PlayerHit {
                    shooter: cmd.player_id,
                    shooter_team: *shooter_team,
                    victim: *victim,
                    victim_team: *victim_team,
                    victim_position: *victim_position,
                    kind: *hit,
                    amount: *amount,
                };
                self.player_hit(world, &hit, events);
            }
            MatchAction::BlockBuilt { team, coord } => {
                self.block_built(&*world, *coord, *team);
            }
            MatchAction::BlockRemoved { coord } => {
                self.block_removed(*coord);
            }
        }
    }

    fn process_event<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        kind: ScheduledEventKind,
        events: &mut Vec<MatchEvent>,
    ) {
        match kind {
            ScheduledEventKind::SweepTick => {
                self.sweep_now(&*world);
                self.event_queue.schedule(
                    self.tick + self.config.sweep_interval_ticks,
                    ScheduledEventKind::SweepTick,
                );
            }
            ScheduledEventKind::CaptureUpdate => {
                let progress = self.scores().capture_progress();
                events.push(MatchEvent {
                    tick: self.tick,
                    kind: MatchEventKind::CaptureProgress {
                        leader: progress.leader,
                        team_a_share: progress.team_a_share,
                    },
                });
                self.event_queue.schedule(
                    self.tick + self.config.capture_update_interval_ticks,
                    ScheduledEventKind::CaptureUpdate,
                );
            }
            ScheduledEventKind::ScoreReport => {
                let message = self.scores().summary();
                log::info!("{message}");
                events.push(MatchEvent {
                    tick: self.tick,
                    kind: MatchEventKind::ScoreReport { message },
                });
                self.event_queue.schedule(
                    self.tick + self.config.score_report_interval_ticks,
                    ScheduledEventKind::ScoreReport,
                );
            }
            ScheduledEventKind::TimeUp => {
                self.end_match(events);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Painting
    // -----------------------------------------------------------------------

    /// Claim and recolor the splat of every impact point for `team`.
    pub fn paint<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        team: Team,
        impacts: &[VoxelCoord],
        radius: RadiusClass,
        events: &mut Vec<MatchEvent>,
    ) -> PaintReport {
        if impacts.is_empty() {
            return PaintReport::default();
        }
        let candidates = paint::expand_impacts(
            &*world,
            &mut self.rng,
            &self.drop_patterns,
            impacts,
            radius,
        );
        let updated = paint::claim_voxels(&*world, &mut self.ownership, team, &candidates);
        let new_columns = paint::recolor_voxels(
            world,
            &self.blender,
            &mut self.rng,
            &mut self.painted,
            team,
            self.config.team(team).color,
            self.config.paint_weight_range,
            &updated,
            self.tick,
            events,
        );
        log::trace!(
            "tick {}: {:?} painted {} voxels from {} impacts (radius {})",
            self.tick,
            team,
            updated.len(),
            impacts.len(),
            radius.get()
        );
        PaintReport {
            candidates: candidates.len(),
            updated,
            new_columns,
        }
    }

    /// One shot from a paint gun.
    pub fn fire_weapon<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        team: Team,
        weapon: WeaponKind,
        position: [f32; 3],
        orientation: [f32; 3],
        events: &mut Vec<MatchEvent>,
    ) -> PaintReport {
        let Some(params) = self.config.weapons.get(&weapon).cloned() else {
            log::debug!("tick {}: no paint parameters for {weapon:?}", self.tick);
            return PaintReport::default();
        };
        let Some(radius) = RadiusClass::new(params.drop_size) else {
            log::warn!("{weapon:?} has unsupported drop size {}", params.drop_size);
            return PaintReport::default();
        };
        let impacts = projector::directed_cone(&*world, &mut self.rng, position, orientation, &params);
        self.paint(world, team, &impacts, radius, events)
    }

    /// A grenade's ink burst.
    pub fn grenade_exploded<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        team: Team,
        position: [f32; 3],
        events: &mut Vec<MatchEvent>,
    ) -> PaintReport {
        if !position.iter().all(|v| v.is_finite()) {
            log::debug!("tick {}: ignoring grenade at non-finite {position:?}", self.tick);
            return PaintReport::default();
        }
        let origin = projector::settle_burst_origin(&*world, position);
        let burst = self.config.inknade.clone();
        self.burst(world, team, origin, &burst, events)
    }

    /// Ink splatter and friendly-fire heal for a player hit.
    ///
    /// Only gunfire on someone other than the shooter splatters. A friendly
    /// hit additionally emits `FriendlyFireHeal`; the host should restore
    /// health (capped at full) instead of applying damage.
    pub fn player_hit<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        hit: &PlayerHit,
        events: &mut Vec<MatchEvent>,
    ) -> PaintReport {
        if hit.shooter == hit.victim || !hit.kind.splatters_ink() {
            return PaintReport::default();
        }
        let report = if hit.victim_position.iter().all(|v| v.is_finite()) {
            let burst = self.config.ink_damage.clone();
            self.burst(world, hit.shooter_team, hit.victim_position, &burst, events)
        } else {
            log::debug!(
                "tick {}: no splatter for player {} at non-finite {:?}",
                self.tick,
                hit.victim.0,
                hit.victim_position
            );
            PaintReport::default()
        };

        if self.config.heal_by_friendly_fire && hit.shooter_team == hit.victim_team {
            events.push(MatchEvent {
                tick: self.tick,
                kind: MatchEventKind::FriendlyFireHeal {
                    victim: hit.victim,
                    amount: hit.amount,
                },
            });
        }
        report
    }

    fn burst<W: PaintWorld + ?Sized>(
        &mut self,
        world: &mut W,
        team: Team,
        center: [f32; 3],
        params: &BurstParams,
        events: &mut Vec<MatchEvent>,
    ) -> PaintReport {
        let drop = self.rng.range_u32_inclusive(
            u32::from(params.drop_size_min),
            u32::from(params.drop_size_max),
        );
        let Some(radius) = u8::try_from(drop).ok().and_then(RadiusClass::new) else {
            log::warn!("burst drop size {drop} is unsupported");
            return PaintReport::default();
        };
        let impacts =
            projector::radial_burst(&*world, &mut self.rng, center, params.rays, params.range);
        self.paint(world, team, &impacts, radius, events)
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    /// A block was placed by a player on `team`. Claims it, and releases the
    /// face neighbours it buried.
    pub fn block_built<W: PaintWorld + ?Sized>(
        &mut self,
        world: &W,
        coord: VoxelCoord,
        team: Team,
    ) {
        self.ownership.own(coord, team.owner());
        for &(dx, dy, dz) in &FACE_OFFSETS {
            let neighbour = coord.offset(dx, dy, dz);
            if !world.is_surface(neighbour) {
                self.ownership.own(neighbour, Owner::Neutral);
            }
        }
        // The sweeper must see built blocks too, or one that later falls
        // would keep counting.
        if coord.packed_index().is_some() {
            self.painted.register(coord.column());
        }
    }

    /// A block was removed through a path the host reports.
    pub fn block_removed(&mut self, coord: VoxelCoord) {
        self.ownership.own(coord, Owner::Neutral);
    }

    /// Color for a block a player on `team` is about to build: the team
    /// color at a random brightness.
    pub fn build_color(&mut self, team: Team) -> Rgb {
        let (lo, hi) = self.config.build_brightness_range;
        let brightness = self.rng.range_u32_inclusive(u32::from(lo), u32::from(hi)) as u8;
        shade(self.config.team(team).color, brightness)
    }

    /// Whether the host should let a block be destroyed. Guns are paint guns
    /// and grenades are ink grenades, so neither breaks blocks.
    pub fn destroy_permitted(cause: DestroyCause) -> bool {
        matches!(cause, DestroyCause::Spade)
    }

    // -----------------------------------------------------------------------
    // Sweeping, scores, match end
    // -----------------------------------------------------------------------

    /// Run one sweeper tick now.
    pub fn sweep_now<W: PaintWorld + ?Sized>(&mut self, world: &W) -> SweepReport {
        let report = self.painted.sweep(
            world,
            &mut self.ownership,
            self.config.sweep_columns_per_tick,
            self.config.sweep_levels,
        );
        if report.revoked > 0 {
            log::debug!(
                "tick {}: sweep revoked {} voxels in {} columns",
                self.tick,
                report.revoked,
                report.columns_visited
            );
        }
        report
    }

    pub fn scores(&self) -> ScoreTracker<'_> {
        ScoreTracker::new(&self.ownership, &self.config.teams, self.config.progress_bias)
    }

    /// Stop all timers, fix the outcome and emit `MatchEnded`. Calling it
    /// again returns the recorded outcome and emits nothing.
    pub fn end_match(&mut self, events: &mut Vec<MatchEvent>) -> MatchOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        self.event_queue.clear();
        let scores = self.scores();
        let outcome = scores.outcome();
        let summary = scores.summary();
        log::info!("match ended at tick {}: {summary}", self.tick);
        events.push(MatchEvent {
            tick: self.tick,
            kind: MatchEventKind::MatchEnded { outcome, summary },
        });
        self.outcome = Some(outcome);
        outcome
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }
}

/// A resolved hit, as `player_hit` consumes it.
#[derive(Clone, Copy, Debug)]
pub struct PlayerHit {
    pub shooter: PlayerId,
    pub shooter_team: Team,
    pub victim: PlayerId,
    pub victim_team: Team,
    pub victim_position: [f32; 3],
    pub kind: HitKind,
    pub amount: u32,
}
