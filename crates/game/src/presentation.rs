//! Boundary between the simulation and whatever draws it.
//!
//! The simulation never touches meshes, materials or UI text. It reports
//! actor lifecycles, one-shot effects and HUD changes through [`Presentation`];
//! a renderer implements the trait, and [`HeadlessPresentation`] records the
//! calls for the demo binary and tests.

use engine_core::Vec3;
use std::collections::HashMap;

use crate::effects::GibParticle;
use crate::hud::{GameSummary, HudChange};
use crate::session::SessionPhase;

/// Opaque handle to a renderable actor owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub u64);

/// Identity of a transient one-shot effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    MuzzleFlash,
    /// Line from the muzzle to the hit point (or a fixed distance on a miss).
    Tracer,
    /// Brief tint on the zombie that was struck.
    HitFlash,
}

/// Calls the simulation makes into the render/UI layer.
///
/// Actor and effect methods are required; everything else defaults to a
/// no-op so a minimal host only has to place zombies.
pub trait Presentation {
    /// Create a zombie renderable standing at `position` (already lifted by
    /// `ground_offset`).
    fn spawn_zombie_actor(&mut self, position: Vec3, scale: f32, ground_offset: f32) -> ActorHandle;

    fn despawn_actor(&mut self, handle: ActorHandle);

    /// Move an actor and turn it to `facing_yaw` (radians about +Y).
    fn update_actor_transform(&mut self, handle: ActorHandle, position: Vec3, facing_yaw: f32);

    /// Start a transient effect. `end` is the tracer endpoint; other kinds ignore it.
    fn play_effect(&mut self, id: EffectId, kind: EffectKind, origin: Vec3, end: Vec3);

    /// Remove an effect whose lifetime ran out.
    fn clear_effect(&mut self, id: EffectId);

    fn sync_gibs(&mut self, _gibs: &[GibParticle]) {}

    fn hud_changed(&mut self, _change: HudChange) {}

    fn phase_changed(&mut self, _phase: SessionPhase) {}

    fn game_over(&mut self, _summary: &GameSummary) {}

    /// Human-readable zombie model status.
    fn model_status(&mut self, _message: &str) {}

    /// Damage vignette intensity in `[0, 1]`.
    fn damage_overlay(&mut self, _intensity: f32) {}

    /// Give up pointer capture (cursor lock) after the game ends.
    fn release_pointer(&mut self) {}
}

/// Presentation that keeps no scene, only bookkeeping.
#[derive(Debug, Default)]
pub struct HeadlessPresentation {
    next_actor: u64,
    /// Live actors and their last reported position and facing.
    pub actors: HashMap<ActorHandle, (Vec3, f32)>,
    pub active_effects: HashMap<EffectId, EffectKind>,
    pub effects_played: usize,
    pub actors_spawned: usize,
    pub actors_despawned: usize,
    pub gib_count: usize,
    pub hud: Vec<HudChange>,
    pub phase: Option<SessionPhase>,
    pub summary: Option<GameSummary>,
    pub model_message: Option<String>,
    pub overlay: f32,
    pub pointer_released: bool,
}

impl HeadlessPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actors currently alive on the presentation side.
    pub fn live_actors(&self) -> usize {
        self.actors.len()
    }
}

impl Presentation for HeadlessPresentation {
    fn spawn_zombie_actor(&mut self, position: Vec3, _scale: f32, _ground_offset: f32) -> ActorHandle {
        self.next_actor += 1;
        let handle = ActorHandle(self.next_actor);
        self.actors.insert(handle, (position, 0.0));
        self.actors_spawned += 1;
        handle
    }

    fn despawn_actor(&mut self, handle: ActorHandle) {
        if self.actors.remove(&handle).is_some() {
            self.actors_despawned += 1;
        } else {
            log::warn!("Despawn of unknown actor {:?}", handle);
        }
    }

    fn update_actor_transform(&mut self, handle: ActorHandle, position: Vec3, facing_yaw: f32) {
        if let Some(slot) = self.actors.get_mut(&handle) {
            *slot = (position, facing_yaw);
        }
    }

    fn play_effect(&mut self, id: EffectId, kind: EffectKind, origin: Vec3, end: Vec3) {
        log::trace!("Effect {:?} {:?} {} -> {}", id, kind, origin, end);
        self.active_effects.insert(id, kind);
        self.effects_played += 1;
    }

    fn clear_effect(&mut self, id: EffectId) {
        self.active_effects.remove(&id);
    }

    fn sync_gibs(&mut self, gibs: &[GibParticle]) {
        self.gib_count = gibs.len();
    }

    fn hud_changed(&mut self, change: HudChange) {
        self.hud.push(change);
    }

    fn phase_changed(&mut self, phase: SessionPhase) {
        self.phase = Some(phase);
    }

    fn game_over(&mut self, summary: &GameSummary) {
        self.summary = Some(*summary);
    }

    fn model_status(&mut self, message: &str) {
        self.model_message = Some(message.to_string());
    }

    fn damage_overlay(&mut self, intensity: f32) {
        self.overlay = intensity;
    }

    fn release_pointer(&mut self) {
        self.pointer_released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_handles_are_unique_and_tracked() {
        let mut p = HeadlessPresentation::new();
        let a = p.spawn_zombie_actor(Vec3::ZERO, 1.0, 0.0);
        let b = p.spawn_zombie_actor(Vec3::X, 1.0, 0.0);
        assert_ne!(a, b);
        p.update_actor_transform(a, Vec3::Z, 1.0);
        assert_eq!(p.actors[&a], (Vec3::Z, 1.0));
        p.despawn_actor(a);
        p.despawn_actor(a);
        assert_eq!(p.live_actors(), 1);
        assert_eq!(p.actors_despawned, 1);
    }

    #[test]
    fn effects_clear_by_id() {
        let mut p = HeadlessPresentation::new();
        p.play_effect(EffectId(1), EffectKind::Tracer, Vec3::ZERO, Vec3::NEG_Z);
        p.play_effect(EffectId(2), EffectKind::MuzzleFlash, Vec3::ZERO, Vec3::ZERO);
        p.clear_effect(EffectId(1));
        assert_eq!(p.active_effects.len(), 1);
        assert_eq!(p.effects_played, 2);
    }
}
