//! Cosmetic feedback: gib debris bursts and the ids/lifetimes of one-shot
//! shot effects (muzzle flash, tracer, hit flash).
//!
//! None of this is authoritative game state.

use engine_core::{Lifetime, Vec3, Velocity};
use rand::prelude::*;
use std::time::Duration;

use crate::config::{EffectTuning, GibTuning};
use crate::presentation::{EffectId, EffectKind};

/// One piece of debris.
#[derive(Debug, Clone, Copy)]
pub struct GibParticle {
    pub position: Vec3,
    pub velocity: Velocity,
    pub life: Lifetime,
}

/// All live debris, integrated with simple gravity and a bouncy floor.
#[derive(Debug, Default)]
pub struct GibField {
    pub particles: Vec<GibParticle>,
}

impl GibField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw a burst of debris up from a kill at `at` (only x/z are used).
    pub fn spawn_burst(&mut self, at: Vec3, tuning: &GibTuning, rng: &mut impl Rng) {
        if !tuning.enabled {
            return;
        }
        let (lo, hi) = (tuning.min_count.min(tuning.max_count), tuning.min_count.max(tuning.max_count));
        let count = rng.gen_range(lo..=hi);
        for _ in 0..count {
            let position = Vec3::new(at.x, rng.gen_range(0.8..=1.4), at.z);
            let velocity = Vec3::new(
                rng.gen_range(-2.0..=2.0),
                rng.gen_range(2.0..=5.0),
                rng.gen_range(-2.0..=2.0),
            );
            let life = if tuning.max_life > tuning.min_life {
                rng.gen_range(tuning.min_life..tuning.max_life)
            } else {
                tuning.min_life
            };
            self.particles.push(GibParticle {
                position,
                velocity: Velocity::new(velocity),
                life: Lifetime::new(life),
            });
        }
    }

    /// Integrate every particle and drop the expired ones.
    pub fn update(&mut self, dt: f32, tuning: &GibTuning) {
        for p in &mut self.particles {
            let v = &mut p.velocity.linear;
            v.y -= tuning.gravity * dt;
            p.position += *v * dt;

            if p.position.y < tuning.floor_height {
                p.position.y = tuning.floor_height;
                v.y *= -tuning.restitution;
                v.x *= tuning.bounce_friction;
                v.z *= tuning.bounce_friction;
            }
        }
        self.particles.retain_mut(|p| !p.life.update(dt));
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Hands out effect ids and knows how long each kind stays on screen.
#[derive(Debug, Default)]
pub struct EffectIds {
    next: u64,
}

impl EffectIds {
    pub fn next(&mut self) -> EffectId {
        self.next += 1;
        EffectId(self.next)
    }
}

/// On-screen time of a one-shot effect.
pub fn effect_lifetime(kind: EffectKind, tuning: &EffectTuning) -> Duration {
    let ms = match kind {
        EffectKind::MuzzleFlash => tuning.muzzle_flash_ms,
        EffectKind::Tracer => tuning.tracer_ms,
        EffectKind::HitFlash => tuning.hit_flash_ms,
    };
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_size_and_initial_state() {
        let t = GibTuning::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = GibField::new();
        field.spawn_burst(Vec3::new(3.0, 0.4, -2.0), &t, &mut rng);
        assert!((8..=12).contains(&field.len()));
        for p in &field.particles {
            assert_eq!((p.position.x, p.position.z), (3.0, -2.0));
            assert!((0.8..=1.4).contains(&p.position.y));
            assert!((2.0..=5.0).contains(&p.velocity.linear.y));
            assert!((1.2..1.8).contains(&p.life.remaining));
        }
    }

    #[test]
    fn disabled_gibs_spawn_nothing() {
        let t = GibTuning { enabled: false, ..Default::default() };
        let mut field = GibField::new();
        field.spawn_burst(Vec3::ZERO, &t, &mut StdRng::seed_from_u64(1));
        assert!(field.is_empty());
    }

    #[test]
    fn particles_bounce_off_the_floor() {
        let t = GibTuning::default();
        let mut field = GibField::new();
        field.particles.push(GibParticle {
            position: Vec3::new(0.0, 0.06, 0.0),
            velocity: Velocity::new(Vec3::new(1.0, -3.0, -1.0)),
            life: Lifetime::new(1.0),
        });
        field.update(0.1, &t);
        let p = field.particles[0];
        assert_eq!(p.position.y, 0.05);
        assert!(p.velocity.linear.y > 0.0);
        assert!((p.velocity.linear.x - 0.6).abs() < 1e-6);
        assert!((p.velocity.linear.z + 0.6).abs() < 1e-6);
    }

    #[test]
    fn particles_expire() {
        let t = GibTuning::default();
        let mut field = GibField::new();
        field.spawn_burst(Vec3::ZERO, &t, &mut StdRng::seed_from_u64(5));
        for _ in 0..200 {
            field.update(1.0 / 60.0, &t);
            for p in &field.particles {
                assert!(p.position.y >= t.floor_height);
            }
        }
        assert!(field.is_empty());
    }

    #[test]
    fn effect_ids_are_unique() {
        let mut ids = EffectIds::default();
        assert_ne!(ids.next(), ids.next());
        let t = EffectTuning::default();
        assert_eq!(effect_lifetime(EffectKind::Tracer, &t), Duration::from_millis(140));
    }
}
