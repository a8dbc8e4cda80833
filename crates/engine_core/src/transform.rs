//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with a uniform scale.
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Heading around world up, in radians. Actors face +Z at yaw 0.
    pub fn yaw(&self) -> f32 {
        let facing = self.rotation * Vec3::Z;
        facing.x.atan2(facing.z)
    }

    /// Turn an upright actor so its +Z faces `target`, ignoring height.
    /// Leaves the rotation untouched when the target is directly above or below.
    pub fn face_towards_flat(&mut self, target: Vec3) {
        let dx = target.x - self.position.x;
        let dz = target.z - self.position.z;
        if dx * dx + dz * dz > 1e-8 {
            self.rotation = Quat::from_rotation_y(dx.atan2(dz));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_towards_flat_stays_upright() {
        let mut t = Transform::from_position(Vec3::new(0.0, 0.5, 0.0));
        t.face_towards_flat(Vec3::new(10.0, 1.6, 0.0));
        let up = t.up();
        assert!((up - Vec3::Y).length() < 1e-5);
        assert!((t.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn face_towards_same_spot_keeps_rotation() {
        let mut t = Transform::default();
        t.rotation = Quat::from_rotation_y(1.0);
        t.face_towards_flat(Vec3::new(0.0, 5.0, 0.0));
        assert!((t.yaw() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn default_forward_is_negative_z() {
        let t = Transform::default();
        assert!((t.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((t.right() - Vec3::X).length() < 1e-6);
    }
}
