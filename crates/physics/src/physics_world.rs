//! Collider storage and query pipeline for hit testing.

use crate::collision::{CollisionGroup, HitShape, OwnerId};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Holds every hit-test shape in the arena plus the acceleration structure
/// used by ray queries.
///
/// Shapes are parentless colliders posed directly each tick; there are no
/// simulated rigid bodies. Call [`PhysicsWorld::update_query_pipeline`]
/// after moving, adding or removing shapes so queries see the new layout.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
    /// True when colliders changed since the last pipeline update.
    dirty: bool,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    /// Rebuild the query acceleration structure if anything moved.
    pub fn update_query_pipeline(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }
    }

    /// Insert a hit shape owned by `owner`, posed at `translation` with heading `yaw`.
    pub fn add_hit_shape(
        &mut self,
        owner: OwnerId,
        shape: HitShape,
        translation: Vec3,
        yaw: f32,
    ) -> ColliderHandle {
        let collider = shape
            .builder()
            .position(pose(translation, yaw))
            .collision_groups(CollisionGroup::zombie())
            .user_data(owner.to_user_data())
            .build();
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Move an existing hit shape.
    pub fn set_shape_pose(&mut self, handle: ColliderHandle, translation: Vec3, yaw: f32) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_position(pose(translation, yaw));
            self.dirty = true;
        }
    }

    /// Owner recorded on a collider, if it still exists.
    pub fn owner_of(&self, handle: ColliderHandle) -> Option<OwnerId> {
        self.collider_set
            .get(handle)
            .map(|c| OwnerId::from_user_data(c.user_data))
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        if self
            .collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, false)
            .is_some()
        {
            self.dirty = true;
        } else {
            log::trace!("Collider {:?} already removed", handle);
        }
    }

    /// Number of live hit shapes.
    pub fn shape_count(&self) -> usize {
        self.collider_set.len()
    }
}

/// World pose for an upright shape: translation plus rotation about +Y.
fn pose(translation: Vec3, yaw: f32) -> Isometry<Real> {
    Isometry::new(
        vector![translation.x, translation.y, translation.z],
        vector![0.0, yaw, 0.0],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_keep_their_owner() {
        let mut world = PhysicsWorld::new();
        let h = world.add_hit_shape(OwnerId(7), HitShape::Ball { radius: 0.5 }, Vec3::ZERO, 0.0);
        assert_eq!(world.owner_of(h), Some(OwnerId(7)));
        world.remove_collider(h);
        assert_eq!(world.owner_of(h), None);
        assert_eq!(world.shape_count(), 0);
    }

    #[test]
    fn removing_twice_is_harmless() {
        let mut world = PhysicsWorld::new();
        let h = world.add_hit_shape(OwnerId(1), HitShape::Ball { radius: 0.5 }, Vec3::ZERO, 0.0);
        world.remove_collider(h);
        world.remove_collider(h);
        world.update_query_pipeline();
        assert_eq!(world.shape_count(), 0);
    }
}
