// Data-driven match configuration.
//
// Every tunable of the paint game mode lives in `MatchConfig`: timer cadences,
// sweeper budget, blend weights, team names and colors, per-weapon cone
// parameters and the two radial-burst profiles (grenade and hit splatter).
// The engine reads from here and never hard-codes a gameplay number.
//
// `MatchConfig::default()` is the stock tuning. Hosts load overrides from
// JSON with `MatchConfig::from_json()`, which also runs `validate()` so a bad
// file is rejected at load time instead of panicking mid-match.
//
// See also: `sim.rs` which owns the config as part of `MatchState`,
// `projector.rs` which consumes `WeaponParams`/`BurstParams`.
//
// **Critical constraint: determinism.** Replaying a match needs the same
// config as the recorded run.

use crate::drop_pattern::MAX_RADIUS;
use crate::types::{Rgb, Team, WeaponKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Display name and ink color of a team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    pub color: Rgb,
}

/// Directed-cone parameters for one paint gun.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponParams {
    /// Per-axis noise amplitude added to the unit aim vector.
    pub spread: f32,
    /// Rays per shot.
    pub pellets: u32,
    /// Impacts farther than this from the muzzle are discarded.
    pub range: f32,
    /// Radius class each impact expands with.
    pub drop_size: u8,
}

/// Radial-burst parameters (grenades, hit splatter).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BurstParams {
    pub rays: u32,
    pub range: f32,
    /// Inclusive bounds of the per-burst random radius class.
    pub drop_size_min: u8,
    pub drop_size_max: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Real-time length of one tick.
    pub tick_duration_ms: u32,

    /// Ticks between invalidation sweeps.
    pub sweep_interval_ticks: u64,
    /// Columns revisited per sweep.
    pub sweep_columns_per_tick: usize,
    /// z-levels checked per visited column.
    pub sweep_levels: i32,

    /// Ticks between capture-progress updates.
    pub capture_update_interval_ticks: u64,
    /// Ticks between textual score reports. 0 disables them.
    pub score_report_interval_ticks: u64,
    /// Match length. When it runs out the match ends and the larger territory
    /// wins. 0 leaves ending the match to the host.
    #[serde(default)]
    pub time_limit_ticks: u64,
    /// Territory below this size is padded so the progress indicator does
    /// not swing to 0% or 100% at match start.
    pub progress_bias: i64,

    /// Inclusive blend weight (out of 256) applied toward the team color.
    pub paint_weight_range: (u8, u8),
    /// Inclusive brightness (out of 256) for team-tinted built blocks.
    pub build_brightness_range: (u8, u8),

    /// Team A first, team B second.
    pub teams: [TeamConfig; 2],

    pub weapons: BTreeMap<WeaponKind, WeaponParams>,
    pub inknade: BurstParams,
    pub ink_damage: BurstParams,

    /// Friendly fire heals instead of hurting.
    pub heal_by_friendly_fire: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            WeaponKind::Rifle,
            WeaponParams {
                spread: 0.006,
                pellets: 1,
                range: 128.0,
                drop_size: 3,
            },
        );
        weapons.insert(
            WeaponKind::Smg,
            WeaponParams {
                spread: 0.012,
                pellets: 1,
                range: 128.0,
                drop_size: 2,
            },
        );
        weapons.insert(
            WeaponKind::Shotgun,
            WeaponParams {
                // Wider than the stock shotgun on purpose.
                spread: 0.08,
                pellets: 8,
                range: 40.0,
                drop_size: 2,
            },
        );

        Self {
            tick_duration_ms: 1,
            sweep_interval_ticks: 100,
            sweep_columns_per_tick: 100,
            sweep_levels: 64,
            capture_update_interval_ticks: 200,
            score_report_interval_ticks: 20_000,
            time_limit_ticks: 0,
            progress_bias: 10,
            paint_weight_range: (160, 200),
            build_brightness_range: (180, 255),
            teams: [
                TeamConfig {
                    name: "Blue".into(),
                    color: Rgb::new(0, 100, 255),
                },
                TeamConfig {
                    name: "Green".into(),
                    color: Rgb::new(0, 200, 60),
                },
            ],
            weapons,
            inknade: BurstParams {
                rays: 128,
                range: 16.0,
                drop_size_min: 1,
                drop_size_max: 3,
            },
            ink_damage: BurstParams {
                rays: 8,
                range: 16.0,
                drop_size_min: 0,
                drop_size_max: 1,
            },
            heal_by_friendly_fire: true,
        }
    }
}

impl MatchConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn team(&self, team: Team) -> &TeamConfig {
        &self.teams[team.index()]
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.sweep_interval_ticks == 0 {
            return invalid("sweep_interval_ticks must be positive".into());
        }
        if self.capture_update_interval_ticks == 0 {
            return invalid("capture_update_interval_ticks must be positive".into());
        }
        if self.sweep_columns_per_tick == 0 {
            return invalid("sweep_columns_per_tick must be positive".into());
        }
        if !(1..=64).contains(&self.sweep_levels) {
            return invalid(format!("sweep_levels {} outside 1..=64", self.sweep_levels));
        }
        if self.progress_bias < 0 {
            return invalid("progress_bias must not be negative".into());
        }
        let (lo, hi) = self.paint_weight_range;
        if lo > hi {
            return invalid(format!("paint_weight_range ({lo}, {hi}) is inverted"));
        }
        let (lo, hi) = self.build_brightness_range;
        if lo > hi {
            return invalid(format!("build_brightness_range ({lo}, {hi}) is inverted"));
        }
        for (kind, params) in &self.weapons {
            if params.pellets == 0 {
                return invalid(format!("{kind:?} fires zero pellets"));
            }
            if params.range.is_nan() || params.range <= 0.0 || !params.spread.is_finite() {
                return invalid(format!("{kind:?} has a bad range or spread"));
            }
            if params.drop_size > MAX_RADIUS {
                return invalid(format!("{kind:?} drop_size {} > {MAX_RADIUS}", params.drop_size));
            }
        }
        for (name, burst) in [("inknade", &self.inknade), ("ink_damage", &self.ink_damage)] {
            if burst.range.is_nan() || burst.range <= 0.0 {
                return invalid(format!("{name} range must be positive"));
            }
            if burst.drop_size_min > burst.drop_size_max || burst.drop_size_max > MAX_RADIUS {
                return invalid(format!(
                    "{name} drop sizes ({}, {}) must satisfy min <= max <= {MAX_RADIUS}",
                    burst.drop_size_min, burst.drop_size_max
                ));
            }
        }
        Ok(())
    }
}
