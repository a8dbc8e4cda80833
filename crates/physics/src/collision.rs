//! Collision groups, hit shapes and owner tagging.

use engine_core::Vec3;
use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Player character
    Player = 1 << 1,
    /// Zombie hit shapes
    Zombie = 1 << 2,
    /// Weapon rays
    PlayerRay = 1 << 3,
}

impl CollisionGroup {
    /// Membership/filter pair for zombie hit shapes.
    pub fn zombie() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Zombie as u32),
            Group::from_bits_retain(Self::PlayerRay as u32 | Self::Player as u32),
        )
    }

    /// Groups used by a weapon ray: only zombies are hittable.
    pub fn player_ray() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::PlayerRay as u32),
            Group::from_bits_retain(Self::Zombie as u32),
        )
    }
}

/// Identity of the actor that owns a hit shape.
///
/// Stored in the collider's `user_data` so a ray hit maps straight back to
/// its actor without walking any hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u64);

impl OwnerId {
    pub fn to_user_data(self) -> u128 {
        self.0 as u128
    }

    pub fn from_user_data(data: u128) -> Self {
        Self(data as u64)
    }
}

/// Primitive hit shape, expressed in actor-local units before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    /// Box with the given half extents.
    Cuboid(Vec3),
    /// Sphere.
    Ball { radius: f32 },
    /// Y-aligned capsule.
    Capsule { half_height: f32, radius: f32 },
}

impl HitShape {
    /// Uniformly scale the shape.
    pub fn scaled(self, scale: f32) -> Self {
        match self {
            HitShape::Cuboid(half) => HitShape::Cuboid(half * scale),
            HitShape::Ball { radius } => HitShape::Ball { radius: radius * scale },
            HitShape::Capsule { half_height, radius } => HitShape::Capsule {
                half_height: half_height * scale,
                radius: radius * scale,
            },
        }
    }

    pub(crate) fn builder(self) -> ColliderBuilder {
        match self {
            HitShape::Cuboid(half) => ColliderBuilder::cuboid(half.x, half.y, half.z),
            HitShape::Ball { radius } => ColliderBuilder::ball(radius),
            HitShape::Capsule { half_height, radius } => ColliderBuilder::capsule_y(half_height, radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_survives_user_data() {
        let id = OwnerId(0x0000_0001_0000_002a);
        assert_eq!(OwnerId::from_user_data(id.to_user_data()), id);
    }

    #[test]
    fn scaled_shapes_scale_every_dimension() {
        let c = HitShape::Capsule { half_height: 0.3, radius: 0.1 }.scaled(2.0);
        assert_eq!(c, HitShape::Capsule { half_height: 0.6, radius: 0.2 });
        let b = HitShape::Cuboid(Vec3::new(0.5, 1.0, 0.25)).scaled(0.5);
        assert_eq!(b, HitShape::Cuboid(Vec3::new(0.25, 0.5, 0.125)));
    }

    #[test]
    fn ray_and_zombie_groups_interact() {
        assert!(CollisionGroup::player_ray().test(CollisionGroup::zombie()));
    }
}
