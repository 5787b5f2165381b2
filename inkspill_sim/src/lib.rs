// inkspill_sim: voxel ownership and paint engine for team-territory matches.
//
// Two teams claim voxels of a 512×512×64 world by painting them. This crate
// holds the whole engine: the packed ownership map, paint projection and
// application, the background sweep that keeps ownership honest when blocks
// disappear, score reporting, and the per-match state that ties them
// together. The voxel world itself belongs to the host and is reached through
// the `PaintWorld` trait.
//
// Module overview:
// - `sim.rs`:          MatchState: per-match context, step loop, command/timer dispatch.
// - `command.rs`:      MatchCommand / MatchAction: everything the host feeds in.
// - `event.rs`:        EventQueue (timers) + MatchEvent output.
// - `config.rs`:       MatchConfig: all tunables, JSON loading and validation.
// - `ownership.rs`:    OwnershipMap: sparse 2-bit packed owners + running counts.
// - `projector.rs`:    Directed-cone and radial-burst ray casting into impact points.
// - `paint.rs`:        Drop expansion with nudging, claiming, recoloring.
// - `drop_pattern.rs`: Octahedral drop offsets per radius class.
// - `color.rs`:        Squared-domain color blending.
// - `sweep.rs`:        Painted-column registry + bounded round-robin invalidation sweep.
// - `score.rs`:        ScoreTracker: summary line, capture progress, outcome.
// - `world.rs`:        PaintWorld trait + GridWorld, a dense reference world with DDA ray casts.
// - `types.rs`:        VoxelCoord, Team, Owner, Rgb and the small command enums.
// - `prng`:            Re-exported from `inkspill_prng`: xoshiro256++ with SplitMix64 seeding.
//
// **Critical constraint: determinism.** A match is a pure function of its
// seed, its config, the world it paints and the commands it receives. All
// randomness comes from the seeded PRNG. Hash containers use `rustc-hash`
// (no random state) and nothing iterates them where order is observable.

pub mod color;
pub mod command;
pub mod config;
pub mod drop_pattern;
pub mod event;
pub mod ownership;
pub mod paint;
pub use inkspill_prng as prng;
pub mod projector;
pub mod score;
pub mod sim;
pub mod sweep;
pub mod types;
pub mod world;
