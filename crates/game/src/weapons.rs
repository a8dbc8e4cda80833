//! Hitscan weapon: magazine/reserve ammo, fire-rate gating and the reload
//! state machine.

use std::time::Duration;

use crate::config::WeaponTuning;

/// Weapon instance with current state.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub magazine_capacity: u32,
    pub current_ammo: u32,
    pub reserve_ammo: u32,
    pub fire_cooldown: Duration,
    pub reload_time: Duration,
    pub damage: f32,
    pub range: f32,

    // State
    last_shot_at: Option<Duration>,
    is_reloading: bool,
}

impl Weapon {
    pub fn new(tuning: &WeaponTuning) -> Self {
        Self {
            magazine_capacity: tuning.magazine_capacity,
            current_ammo: tuning.magazine_capacity,
            reserve_ammo: tuning.starting_reserve,
            fire_cooldown: Duration::from_millis(tuning.fire_cooldown_ms),
            reload_time: Duration::from_millis(tuning.reload_ms),
            damage: tuning.damage,
            range: tuning.range,
            last_shot_at: None,
            is_reloading: false,
        }
    }

    /// Check if the cooldown since the last accepted shot has elapsed.
    pub fn cooled_down(&self, now: Duration) -> bool {
        match self.last_shot_at {
            Some(last) => now.saturating_sub(last) >= self.fire_cooldown,
            None => true,
        }
    }

    /// Check if weapon can fire.
    pub fn can_fire(&self, now: Duration) -> bool {
        self.cooled_down(now) && self.current_ammo > 0 && !self.is_reloading
    }

    /// Fire the weapon, consuming one round. Returns false (and changes
    /// nothing) when cooling down, empty or reloading.
    pub fn fire(&mut self, now: Duration) -> bool {
        if !self.can_fire(now) {
            return false;
        }

        self.current_ammo -= 1;
        self.last_shot_at = Some(now);
        true
    }

    /// Begin a reload. Only starts with reserve ammo, a non-full magazine and
    /// no reload already running. The caller schedules [`Weapon::finish_reload`]
    /// after `reload_time`; there is no cancel.
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading || self.reserve_ammo == 0 || self.current_ammo >= self.magazine_capacity {
            return false;
        }

        self.is_reloading = true;
        true
    }

    /// Move `min(capacity - magazine, reserve)` rounds into the magazine.
    pub fn finish_reload(&mut self) {
        if !self.is_reloading {
            return;
        }
        let needed = self.magazine_capacity.saturating_sub(self.current_ammo);
        let available = needed.min(self.reserve_ammo);

        self.current_ammo += available;
        self.reserve_ammo -= available;
        self.is_reloading = false;
    }

    /// Check if reloading.
    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// Get ammo display string.
    pub fn ammo_display(&self) -> String {
        if self.is_reloading {
            format!("RELOADING... {}", self.reserve_ammo)
        } else {
            format!("{} / {}", self.current_ammo, self.reserve_ammo)
        }
    }
}
