//! Zombie actor components, round-scaled stats and composite hit bodies.

use engine_core::{Health, Transform, Vec3};
use physics::{ColliderHandle, HitShape, OwnerId, PhysicsWorld};

use crate::config::HordeTuning;
use crate::presentation::ActorHandle;

/// Named pieces of a zombie body. Any of them can take a hit; damage is the same for all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPart {
    Torso,
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

/// Hit layout of a 1.7-unit-tall body standing with its feet at the local origin.
/// Offsets are in actor space (+Z forward, so the body's right side is -X).
const BODY_LAYOUT: [(BodyPart, HitShape, Vec3); 6] = [
    (BodyPart::Torso, HitShape::Cuboid(Vec3::new(0.24, 0.3, 0.14)), Vec3::new(0.0, 1.05, 0.0)),
    (BodyPart::Head, HitShape::Ball { radius: 0.16 }, Vec3::new(0.0, 1.53, 0.03)),
    (BodyPart::LeftArm, HitShape::Capsule { half_height: 0.24, radius: 0.07 }, Vec3::new(0.32, 1.05, 0.08)),
    (BodyPart::RightArm, HitShape::Capsule { half_height: 0.24, radius: 0.07 }, Vec3::new(-0.32, 1.05, 0.08)),
    (BodyPart::LeftLeg, HitShape::Capsule { half_height: 0.28, radius: 0.09 }, Vec3::new(0.12, 0.39, 0.0)),
    (BodyPart::RightLeg, HitShape::Capsule { half_height: 0.28, radius: 0.09 }, Vec3::new(-0.12, 0.39, 0.0)),
];

/// Height of [`BODY_LAYOUT`] from feet to crown.
pub const BODY_LAYOUT_HEIGHT: f32 = 1.7;

/// Zombie component.
#[derive(Debug, Clone)]
pub struct Zombie {
    /// Units per second.
    pub speed: f32,
    /// Vertical correction so the feet touch the ground.
    pub ground_offset: f32,
    /// Renderable owned by the presentation layer.
    pub actor: ActorHandle,
}

/// Stats a new zombie receives in a given round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieStats {
    pub max_health: f32,
    pub speed: f32,
}

impl ZombieStats {
    /// Health and speed both grow linearly with the round number.
    pub fn for_round(round: u32, tuning: &HordeTuning) -> Self {
        let round = round.max(1) as f32;
        Self {
            max_health: tuning.health_base + (round - 1.0) * tuning.health_per_round,
            speed: tuning.speed_base + round * tuning.speed_per_round,
        }
    }
}

/// Collider handles for every body part of one zombie.
#[derive(Debug, Clone, Default)]
pub struct HitBody {
    pub parts: Vec<(BodyPart, ColliderHandle)>,
    /// Scale applied to [`BODY_LAYOUT`] (fits the body to the zombie height).
    pub layout_scale: f32,
}

impl HitBody {
    /// Insert all part shapes for `owner` into the physics world.
    pub fn build(physics: &mut PhysicsWorld, owner: OwnerId, feet: Vec3, yaw: f32, layout_scale: f32) -> Self {
        let parts = BODY_LAYOUT
            .iter()
            .map(|&(part, shape, offset)| {
                let world = part_position(feet, yaw, offset * layout_scale);
                (part, physics.add_hit_shape(owner, shape.scaled(layout_scale), world, yaw))
            })
            .collect();
        Self { parts, layout_scale }
    }

    /// Re-pose every part for a new feet position and heading.
    pub fn sync(&self, physics: &mut PhysicsWorld, feet: Vec3, yaw: f32) {
        for (&(part, handle), &(layout_part, _, offset)) in self.parts.iter().zip(BODY_LAYOUT.iter()) {
            debug_assert_eq!(part, layout_part);
            physics.set_shape_pose(handle, part_position(feet, yaw, offset * self.layout_scale), yaw);
        }
    }

    /// Which part a collider belongs to.
    pub fn part_of(&self, handle: ColliderHandle) -> Option<BodyPart> {
        self.parts.iter().find(|(_, h)| *h == handle).map(|(p, _)| *p)
    }

    /// Remove every part shape.
    pub fn remove(&self, physics: &mut PhysicsWorld) {
        for &(_, handle) in &self.parts {
            physics.remove_collider(handle);
        }
    }
}

fn part_position(feet: Vec3, yaw: f32, offset: Vec3) -> Vec3 {
    feet + glam::Quat::from_rotation_y(yaw) * offset
}

/// Bundle of components for spawning a zombie.
pub struct ZombieBundle {
    pub transform: Transform,
    pub health: Health,
    pub zombie: Zombie,
}

impl ZombieBundle {
    /// `ground_position` is on the floor (y = 0); the stored transform is lifted
    /// by the ground offset.
    pub fn new(
        ground_position: Vec3,
        stats: ZombieStats,
        scale: f32,
        ground_offset: f32,
        actor: ActorHandle,
    ) -> Self {
        let position = Vec3::new(ground_position.x, ground_offset, ground_position.z);
        Self {
            transform: Transform::from_position_scale(position, scale),
            health: Health::new(stats.max_health),
            zombie: Zombie {
                speed: stats.speed,
                ground_offset,
                actor,
            },
        }
    }

    /// Spawn into the ECS world under a reserved entity whose hit body was
    /// built with that entity as owner.
    pub fn spawn_at(self, world: &mut hecs::World, entity: hecs::Entity, body: HitBody) {
        world.spawn_at(entity, (self.transform, self.health, self.zombie, body));
    }
}

/// Feet position of a zombie whose transform sits at its ground offset.
pub fn feet_of(transform: &Transform, zombie: &Zombie) -> Vec3 {
    transform.position - Vec3::Y * zombie.ground_offset
}

/// Map an ECS entity to the owner id stored on its hit shapes.
pub fn owner_of(entity: hecs::Entity) -> OwnerId {
    OwnerId(entity.to_bits().get())
}

/// Inverse of [`owner_of`].
pub fn entity_of(owner: OwnerId) -> Option<hecs::Entity> {
    hecs::Entity::from_bits(owner.0)
}
