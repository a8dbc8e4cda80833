//! Raycasting for weapon hit detection.

use crate::collision::{CollisionGroup, OwnerId};
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Actor owning the collider.
    pub owner: OwnerId,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray against zombie hit shapes and return the closest hit.
    ///
    /// Equal distances resolve to the lower owner id, then the earlier added
    /// shape, so the result does not depend on the pipeline's traversal order.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        self.raycast_all(origin, direction, max_distance).into_iter().next()
    }

    /// Cast a ray and return every hit shape up to `max_distance`, closest first.
    pub fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let filter = QueryFilter::default().groups(CollisionGroup::player_ray());
        let mut hits = Vec::new();

        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
            |collider, intersection: RayIntersection| {
                if let Some(owner) = self.owner_of(collider) {
                    let point = ray.point_at(intersection.time_of_impact);
                    hits.push(RaycastHit {
                        collider,
                        owner,
                        distance: intersection.time_of_impact,
                        point: Vec3::new(point.x, point.y, point.z),
                        normal: Vec3::new(
                            intersection.normal.x,
                            intersection.normal.y,
                            intersection.normal.z,
                        ),
                    });
                }
                true // Continue searching
            },
        );

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.owner.cmp(&b.owner))
                .then(a.collider.into_raw_parts().0.cmp(&b.collider.into_raw_parts().0))
        });
        hits
    }
}
