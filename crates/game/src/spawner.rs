//! Round bookkeeping and spawn pacing.
//!
//! Each round has a kill quota. Zombies trickle in: every tick below quota
//! and below the population cap there is a small chance of a new one
//! appearing somewhere on a ring around the arena centre. Killing the whole
//! quota clears the round and the next, larger one begins.

use engine_core::Vec3;
use rand::prelude::*;

use crate::config::HordeTuning;

/// Round number and per-round counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// Starts at 1.
    pub round: u32,
    pub quota: u32,
    pub spawned: u32,
    pub killed: u32,
    /// Kills across all rounds.
    pub total_kills: u32,
}

impl RoundState {
    pub fn new(tuning: &HordeTuning) -> Self {
        Self {
            round: 1,
            quota: quota_for_round(1, tuning),
            spawned: 0,
            killed: 0,
            total_kills: 0,
        }
    }

    /// Record a kill. Returns true when it completes the round's quota.
    pub fn record_kill(&mut self) -> bool {
        self.total_kills += 1;
        self.killed = (self.killed + 1).min(self.quota);
        self.is_cleared()
    }

    pub fn record_spawn(&mut self) {
        self.spawned += 1;
    }

    pub fn is_cleared(&self) -> bool {
        self.killed >= self.quota
    }

    /// Move to the next round: counters reset, quota recomputed.
    pub fn advance(&mut self, tuning: &HordeTuning) {
        self.round += 1;
        self.quota = quota_for_round(self.round, tuning);
        self.spawned = 0;
        self.killed = 0;
    }

    /// Zombies this round still allowed to appear.
    pub fn remaining_spawns(&self) -> u32 {
        self.quota.saturating_sub(self.spawned)
    }
}

/// Kill quota for a round: a fixed opening quota, then `floor(base + round * step)`.
pub fn quota_for_round(round: u32, tuning: &HordeTuning) -> u32 {
    if round <= 1 {
        tuning.initial_quota
    } else {
        (tuning.quota_base + round as f32 * tuning.quota_per_round).floor() as u32
    }
}

/// Per-tick spawn gate: below quota, below the population cap, and a lucky draw.
pub fn should_spawn(rounds: &RoundState, active: usize, tuning: &HordeTuning, rng: &mut impl Rng) -> bool {
    rounds.remaining_spawns() > 0 && active < tuning.max_active && rng.gen_bool(tuning.spawn_chance.clamp(0.0, 1.0))
}

/// Random floor point on the spawn ring around the arena origin.
pub fn spawn_point(tuning: &HordeTuning, rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let (min, max) = if tuning.spawn_min_distance <= tuning.spawn_max_distance {
        (tuning.spawn_min_distance, tuning.spawn_max_distance)
    } else {
        (tuning.spawn_max_distance, tuning.spawn_min_distance)
    };
    let distance = min + rng.gen::<f32>() * (max - min);
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}
