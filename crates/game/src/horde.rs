//! Zombie population manager: spawning, seek-and-contact AI, damage and
//! death, round progression.
//!
//! The horde exclusively owns the active zombie set (an ECS world) and the
//! hit-test shapes. Combat only asks it to cast rays and apply damage.

use engine_core::{Entity, Health, Transform, Vec3, World};
use physics::{PhysicsWorld, RaycastHit};
use rand::prelude::*;

use crate::assets::ModelStatus;
use crate::config::{ContactDamage, GibTuning, HordeTuning};
use crate::effects::GibField;
use crate::presentation::{ActorHandle, Presentation};
use crate::spawner::{self, RoundState};
use crate::zombie::{
    entity_of, feet_of, owner_of, BodyPart, HitBody, Zombie, ZombieBundle, ZombieStats, BODY_LAYOUT_HEIGHT,
};

/// Distance past the contact radius that still counts as touching, so
/// rounding after the push-out does not drop a tick of damage.
const CONTACT_SLACK: f32 = 1e-4;

/// What a hit did to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    Damaged { remaining: f32 },
    Killed { round_cleared: bool, position: Vec3 },
    /// Target was already gone.
    Stale,
}

/// A ray hit mapped back to a live zombie.
#[derive(Debug, Clone, Copy)]
pub struct ZombieHit {
    pub entity: Entity,
    pub actor: ActorHandle,
    pub part: BodyPart,
    pub ray: RaycastHit,
}

pub struct Horde {
    pub world: World,
    pub physics: PhysicsWorld,
    pub rounds: RoundState,
    pub gibs: GibField,
    tuning: HordeTuning,
    gib_tuning: GibTuning,
    model: ModelStatus,
    rng: StdRng,
}

impl Horde {
    pub fn new(tuning: HordeTuning, gib_tuning: GibTuning, model: ModelStatus) -> Self {
        Self::with_rng(tuning, gib_tuning, model, StdRng::from_entropy())
    }

    /// Construct with an explicit random source (seeded in tests).
    pub fn with_rng(tuning: HordeTuning, gib_tuning: GibTuning, model: ModelStatus, rng: StdRng) -> Self {
        Self {
            world: World::new(),
            physics: PhysicsWorld::new(),
            rounds: RoundState::new(&tuning),
            gibs: GibField::new(),
            tuning,
            gib_tuning,
            model,
            rng,
        }
    }

    pub fn model_status(&self) -> &ModelStatus {
        &self.model
    }

    pub fn active_count(&self) -> usize {
        self.world.query::<&Zombie>().iter().count()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.get::<&Zombie>(entity).is_ok()
    }

    /// Positions (transform origin) of every live zombie.
    pub fn positions(&self) -> Vec<(Entity, Vec3)> {
        self.world
            .query::<(&Transform, &Zombie)>()
            .iter()
            .map(|(e, (t, _))| (e, t.position))
            .collect()
    }

    /// Per-tick spawn attempt, paced by the spawn gate.
    pub fn try_spawn(&mut self, presentation: &mut dyn Presentation) -> Option<Entity> {
        if !self.model.can_spawn() {
            return None;
        }
        if !spawner::should_spawn(&self.rounds, self.active_count(), &self.tuning, &mut self.rng) {
            return None;
        }
        let point = spawner::spawn_point(&self.tuning, &mut self.rng);
        self.spawn_at(point, presentation)
    }

    /// Spawn one zombie with its feet at `ground_position`. Counts toward the
    /// round's spawn total. No-op when the model failed or the cap is reached.
    pub fn spawn_at(&mut self, ground_position: Vec3, presentation: &mut dyn Presentation) -> Option<Entity> {
        if self.active_count() >= self.tuning.max_active {
            return None;
        }
        let (scale, ground_offset) = self.model.fit(self.tuning.zombie_height, BODY_LAYOUT_HEIGHT)?;

        let stats = ZombieStats::for_round(self.rounds.round, &self.tuning);
        let lifted = Vec3::new(ground_position.x, ground_offset, ground_position.z);
        let actor = presentation.spawn_zombie_actor(lifted, scale, ground_offset);
        let mut bundle = ZombieBundle::new(ground_position, stats, scale, ground_offset, actor);
        bundle.transform.face_towards_flat(Vec3::ZERO);
        let yaw = bundle.transform.yaw();

        let entity = self.world.reserve_entity();
        let layout_scale = self.tuning.zombie_height / BODY_LAYOUT_HEIGHT;
        let feet = Vec3::new(ground_position.x, 0.0, ground_position.z);
        let body = HitBody::build(&mut self.physics, owner_of(entity), feet, yaw, layout_scale);
        bundle.spawn_at(&mut self.world, entity, body);
        presentation.update_actor_transform(actor, lifted, yaw);

        self.rounds.record_spawn();
        self.physics.update_query_pipeline();
        log::debug!(
            "Spawned zombie {:?} at ({:.1}, {:.1}) hp {:.1} speed {:.2} [{}/{}]",
            entity,
            ground_position.x,
            ground_position.z,
            stats.max_health,
            stats.speed,
            self.rounds.spawned,
            self.rounds.quota
        );
        Some(entity)
    }

    /// Advance every zombie toward the player and return the contact damage
    /// dealt this tick.
    pub fn update(&mut self, player_position: Vec3, dt: f32, presentation: &mut dyn Presentation) -> f32 {
        let radius = self.tuning.contact_radius;
        let mut damage = 0.0;

        for (_, (transform, zombie, body)) in self.world.query_mut::<(&mut Transform, &Zombie, &HitBody)>() {
            let to_player = Vec3::new(
                player_position.x - transform.position.x,
                0.0,
                player_position.z - transform.position.z,
            );
            let distance = to_player.length();
            let dir = to_player.normalize_or_zero();

            // A zombie held on the boundary is still touching.
            if distance <= radius + CONTACT_SLACK {
                match self.tuning.contact_damage {
                    ContactDamage::Continuous { per_second } => {
                        if dir != Vec3::ZERO {
                            transform.position.x = player_position.x - dir.x * radius;
                            transform.position.z = player_position.z - dir.z * radius;
                        }
                        damage += per_second * dt;
                    }
                    ContactDamage::Lump { per_tick } => damage += per_tick,
                }
            } else {
                transform.translate(dir * zombie.speed * dt);
            }

            transform.position.y = zombie.ground_offset;
            transform.face_towards_flat(player_position);
            let yaw = transform.yaw();
            body.sync(&mut self.physics, feet_of(transform, zombie), yaw);
            presentation.update_actor_transform(zombie.actor, transform.position, yaw);
        }

        let had_gibs = !self.gibs.is_empty();
        self.gibs.update(dt, &self.gib_tuning);
        if had_gibs {
            presentation.sync_gibs(&self.gibs.particles);
        }

        self.physics.update_query_pipeline();
        damage
    }

    /// Closest ray hit on a live zombie.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, range: f32) -> Option<ZombieHit> {
        self.physics
            .raycast_all(origin, direction, range)
            .into_iter()
            .find_map(|ray| self.resolve(ray))
    }

    fn resolve(&self, ray: RaycastHit) -> Option<ZombieHit> {
        let entity = entity_of(ray.owner)?;
        let zombie = self.world.get::<&Zombie>(entity).ok()?;
        let body = self.world.get::<&HitBody>(entity).ok()?;
        Some(ZombieHit {
            entity,
            actor: zombie.actor,
            part: body.part_of(ray.collider)?,
            ray,
        })
    }

    /// Damage a zombie. Killing removes it, its shapes and its actor exactly
    /// once; later calls for the same entity are [`HitOutcome::Stale`].
    pub fn apply_damage(&mut self, entity: Entity, amount: f32, presentation: &mut dyn Presentation) -> HitOutcome {
        let remaining = match self.world.get::<&mut Health>(entity) {
            Ok(mut health) => {
                health.take_damage(amount);
                health.current
            }
            Err(_) => return HitOutcome::Stale,
        };
        if remaining > 0.0 {
            return HitOutcome::Damaged { remaining };
        }

        let (position, actor, body) = match self.world.query_one_mut::<(&Transform, &Zombie, &HitBody)>(entity) {
            Ok((t, z, b)) => (feet_of(t, z), z.actor, b.clone()),
            Err(_) => return HitOutcome::Stale,
        };
        if self.world.despawn(entity).is_err() {
            return HitOutcome::Stale;
        }

        body.remove(&mut self.physics);
        self.physics.update_query_pipeline();
        presentation.despawn_actor(actor);
        self.gibs.spawn_burst(position, &self.gib_tuning, &mut self.rng);

        let round_cleared = self.rounds.record_kill();
        log::debug!(
            "Zombie {:?} killed, round {} {}/{}",
            entity,
            self.rounds.round,
            self.rounds.killed,
            self.rounds.quota
        );
        HitOutcome::Killed { round_cleared, position }
    }

    /// Start the next round and reward the player.
    pub fn advance_round(&mut self, player_health: &mut Health, heal: f32) {
        self.rounds.advance(&self.tuning);
        player_health.heal(heal);
        log::info!("Round {} begins (quota {})", self.rounds.round, self.rounds.quota);
    }
}
