//! Game configuration and balance tuning. Loaded from config.ron at startup.
//!
//! Every field has a serde default, so a partial `config.ron` only overrides
//! what it names.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Radians of look rotation per pointer unit.
    pub mouse_sensitivity: Option<f32>,
    /// Optional glTF/GLB zombie model. `None` uses the procedural body.
    pub zombie_model: Option<PathBuf>,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub horde: HordeTuning,
    pub session: SessionTuning,
    pub gibs: GibTuning,
    pub effects: EffectTuning,
    pub demo: DemoConfig,
}

/// Player movement and health.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub eye_height: f32,
    /// Horizontal velocity decay rate (per second).
    pub drag: f32,
    pub gravity: f32,
    /// Acceleration applied along the desired direction while a key is held.
    pub move_impulse: f32,
    pub sprint_multiplier: f32,
    pub jump_velocity: f32,
    pub max_health: f32,
    pub look_sensitivity: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            eye_height: 1.6,
            drag: 10.0,
            gravity: 65.0,
            move_impulse: 40.0,
            sprint_multiplier: 1.6,
            jump_velocity: 14.0,
            max_health: 100.0,
            look_sensitivity: 0.002,
        }
    }
}

/// Weapon ammo, pacing and reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub magazine_capacity: u32,
    pub starting_reserve: u32,
    /// Minimum time between accepted shots. Zero means click-limited only.
    pub fire_cooldown_ms: u64,
    pub reload_ms: u64,
    pub damage: f32,
    pub range: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            magazine_capacity: 30,
            starting_reserve: 120,
            fire_cooldown_ms: 1000,
            reload_ms: 2000,
            damage: 1.0,
            range: 1000.0,
        }
    }
}

/// How a zombie touching the player hurts them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContactDamage {
    /// Damage per second while in contact; the zombie is held at the contact boundary.
    Continuous { per_second: f32 },
    /// Flat damage every tick in contact; the zombie does not move that tick.
    /// Harsh: a single touch is lethal within a handful of frames.
    Lump { per_tick: f32 },
}

impl Default for ContactDamage {
    fn default() -> Self {
        ContactDamage::Continuous { per_second: 10.0 }
    }
}

/// Rounds, spawning and zombie stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HordeTuning {
    pub initial_quota: u32,
    pub quota_base: f32,
    pub quota_per_round: f32,
    /// Hard cap on zombies alive at once.
    pub max_active: usize,
    /// Probability per tick of a spawn attempt when below quota and cap.
    pub spawn_chance: f64,
    pub spawn_min_distance: f32,
    pub spawn_max_distance: f32,
    /// Visual height every zombie is fitted to.
    pub zombie_height: f32,
    pub health_base: f32,
    pub health_per_round: f32,
    /// Units per second.
    pub speed_base: f32,
    pub speed_per_round: f32,
    /// Horizontal distance at which a zombie is touching the player.
    pub contact_radius: f32,
    pub contact_damage: ContactDamage,
}

impl Default for HordeTuning {
    fn default() -> Self {
        Self {
            initial_quota: 6,
            quota_base: 6.0,
            quota_per_round: 1.5,
            max_active: 24,
            spawn_chance: 0.02,
            spawn_min_distance: 30.0,
            spawn_max_distance: 50.0,
            zombie_height: 1.7,
            health_base: 1.0,
            health_per_round: 0.5,
            speed_base: 0.54,
            speed_per_round: 0.09,
            contact_radius: 1.8,
            contact_damage: ContactDamage::default(),
        }
    }
}

/// Regeneration, wave reward and damage overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Health per second while alive and below max.
    pub regen_per_second: f32,
    pub round_clear_heal: f32,
    pub overlay_min_intensity: f32,
    pub overlay_max_intensity: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            regen_per_second: 6.0,
            round_clear_heal: 20.0,
            overlay_min_intensity: 0.05,
            overlay_max_intensity: 0.75,
        }
    }
}

/// Decorative debris burst on kill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GibTuning {
    pub enabled: bool,
    pub min_count: u32,
    pub max_count: u32,
    pub gravity: f32,
    pub floor_height: f32,
    pub restitution: f32,
    pub bounce_friction: f32,
    pub min_life: f32,
    pub max_life: f32,
}

impl Default for GibTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            min_count: 8,
            max_count: 12,
            gravity: 9.8,
            floor_height: 0.05,
            restitution: 0.3,
            bounce_friction: 0.6,
            min_life: 1.2,
            max_life: 1.8,
        }
    }
}

/// Lifetimes of transient shot feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub muzzle_flash_ms: u64,
    pub tracer_ms: u64,
    pub hit_flash_ms: u64,
    /// Tracer length when the shot hits nothing.
    pub miss_tracer_length: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            muzzle_flash_ms: 50,
            tracer_ms: 140,
            hit_flash_ms: 100,
            miss_tracer_length: 24.0,
        }
    }
}

/// Headless demo runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub duration_secs: f32,
    /// Pace frames against the wall clock instead of fixed 1/60 s steps.
    pub realtime: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            duration_secs: 180.0,
            realtime: false,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match Self::from_ron(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    return c;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Parse a RON document.
    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// Effective look sensitivity (top-level override wins).
    pub fn look_sensitivity(&self) -> f32 {
        self.mouse_sensitivity.unwrap_or(self.player.look_sensitivity)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
