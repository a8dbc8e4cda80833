//! HUD observables: values the UI displays, diffed so each change is
//! reported once, plus the damage overlay and end-of-game summary.

use engine_core::Health;

use crate::config::SessionTuning;
use crate::spawner::RoundState;
use crate::weapons::Weapon;

/// Everything the HUD shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub current_ammo: u32,
    pub reserve_ammo: u32,
    pub reloading: bool,
    pub health: f32,
    pub round: u32,
    pub kills: u32,
}

/// One changed HUD value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudChange {
    CurrentAmmo(u32),
    ReserveAmmo(u32),
    Reloading(bool),
    Health(f32),
    Round(u32),
    Kills(u32),
}

/// Final result shown on the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub final_round: u32,
    pub final_kills: u32,
}

impl HudSnapshot {
    pub fn capture(weapon: &Weapon, health: &Health, rounds: &RoundState) -> Self {
        Self {
            current_ammo: weapon.current_ammo,
            reserve_ammo: weapon.reserve_ammo,
            reloading: weapon.is_reloading(),
            health: health.current,
            round: rounds.round,
            kills: rounds.total_kills,
        }
    }

    /// Fields that differ from `previous` (all of them when there is none).
    pub fn diff(&self, previous: Option<&HudSnapshot>) -> Vec<HudChange> {
        let mut changes = Vec::new();
        let prev = previous.copied();
        let changed = |f: fn(&HudSnapshot) -> HudChange| prev.map_or(true, |p| f(&p) != f(self));

        if changed(|s| HudChange::CurrentAmmo(s.current_ammo)) {
            changes.push(HudChange::CurrentAmmo(self.current_ammo));
        }
        if changed(|s| HudChange::ReserveAmmo(s.reserve_ammo)) {
            changes.push(HudChange::ReserveAmmo(self.reserve_ammo));
        }
        if changed(|s| HudChange::Reloading(s.reloading)) {
            changes.push(HudChange::Reloading(self.reloading));
        }
        // Health is shown as a whole number; regen ticks below a point are not news.
        if changed(|s| HudChange::Health(s.health.ceil())) {
            changes.push(HudChange::Health(self.health.ceil()));
        }
        if changed(|s| HudChange::Round(s.round)) {
            changes.push(HudChange::Round(self.round));
        }
        if changed(|s| HudChange::Kills(s.kills)) {
            changes.push(HudChange::Kills(self.kills));
        }
        changes
    }
}

/// Damage vignette intensity: linear in missing health between the
/// configured minimum and maximum.
pub fn damage_overlay_intensity(health: &Health, tuning: &SessionTuning) -> f32 {
    tuning.overlay_min_intensity
        + health.missing_fraction() * (tuning.overlay_max_intensity - tuning.overlay_min_intensity)
}
