// Score reporting: a read-only view over the ownership counts.
//
// `ScoreTracker` borrows the ownership map and the team configs and turns
// the two team counts into the textual status line, the biased capture
// progress shown on the HUD, and the final match outcome. It keeps no state.
//
// Capture progress pads both scores by `max(0, bias - max(a, b))` so the
// indicator sits near 50% while territory is still tiny and does not swing
// to 0% or 100% on the first splat.

use crate::config::TeamConfig;
use crate::ownership::OwnershipMap;
use crate::types::Team;
use serde::{Deserialize, Serialize};

/// Capture-rate indicator state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureProgress {
    /// Team with the larger territory. Ties go to team A.
    pub leader: Team,
    /// Team A's biased share of the territory, in [0, 1].
    pub team_a_share: f64,
}

impl CaptureProgress {
    /// The leader's share, as the HUD displays it.
    pub fn leader_share(&self) -> f64 {
        match self.leader {
            Team::A => self.team_a_share,
            Team::B => 1.0 - self.team_a_share,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(Team),
    Draw,
}

pub struct ScoreTracker<'a> {
    ownership: &'a OwnershipMap,
    teams: &'a [TeamConfig; 2],
    bias: i64,
}

impl<'a> ScoreTracker<'a> {
    pub fn new(ownership: &'a OwnershipMap, teams: &'a [TeamConfig; 2], bias: i64) -> Self {
        Self {
            ownership,
            teams,
            bias,
        }
    }

    pub fn score(&self, team: Team) -> i64 {
        self.ownership.get_score(team)
    }

    /// `"Blue: 12 - Green: 7 (Blue leads!)"`, or `(draw)` on a tie.
    pub fn summary(&self) -> String {
        let (a, b) = (self.score(Team::A), self.score(Team::B));
        let name_a = &self.teams[Team::A.index()].name;
        let name_b = &self.teams[Team::B.index()].name;
        let verdict = match self.outcome() {
            MatchOutcome::Winner(team) => format!("{} leads!", self.teams[team.index()].name),
            MatchOutcome::Draw => "draw".to_string(),
        };
        format!("{name_a}: {a} - {name_b}: {b} ({verdict})")
    }

    pub fn capture_progress(&self) -> CaptureProgress {
        let (a, b) = (self.score(Team::A), self.score(Team::B));
        let pad = (self.bias - a.max(b)).max(0);
        let total = a + b + 2 * pad;
        let team_a_share = if total > 0 {
            (a + pad) as f64 / total as f64
        } else {
            0.5
        };
        CaptureProgress {
            leader: if a >= b { Team::A } else { Team::B },
            team_a_share,
        }
    }

    pub fn outcome(&self) -> MatchOutcome {
        let (a, b) = (self.score(Team::A), self.score(Team::B));
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => MatchOutcome::Winner(Team::A),
            std::cmp::Ordering::Less => MatchOutcome::Winner(Team::B),
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}
