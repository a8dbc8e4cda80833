//! Player controller and state.

use engine_core::{Health, Quat, Transform, Vec2, Vec3};
use input::FrameInput;
use std::f32::consts::FRAC_PI_2;

use crate::config::PlayerTuning;

/// Camera pose produced by the controller each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    /// Eye position.
    pub position: Vec3,
    /// View direction (unit length).
    pub forward: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// First-person controller: drag/gravity integration, ground clamp, jump,
/// and yaw/pitch mouse look.
pub struct PlayerController {
    pub transform: Transform,
    pub velocity: Vec3,
    pub health: Health,
    pub can_jump: bool,
    pub sprinting: bool,
    yaw: f32,
    pitch: f32,
    tuning: PlayerTuning,
    sensitivity: f32,
}

impl PlayerController {
    pub fn new(tuning: PlayerTuning, sensitivity: f32) -> Self {
        let position = Vec3::new(0.0, tuning.eye_height, 0.0);
        Self {
            transform: Transform::from_position(position),
            velocity: Vec3::ZERO,
            health: Health::new(tuning.max_health),
            can_jump: false,
            sprinting: false,
            yaw: 0.0,
            pitch: 0.0,
            tuning,
            sensitivity,
        }
    }

    /// Apply pointer motion. Yaw turns about world up, pitch about the local
    /// right axis; pitch is clamped to ±90° so the view never inverts.
    pub fn apply_look(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.sensitivity;
        self.pitch -= delta.y * self.sensitivity;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.transform.rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
    }

    /// Set the view angles directly (pitch is clamped).
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.apply_look(Vec2::ZERO);
    }

    /// Integrate one tick of movement and return the new camera pose.
    pub fn integrate(&mut self, input: &FrameInput, dt: f32) -> PlayerPose {
        let t = &self.tuning;
        self.sprinting = input.sprint;

        // Jump is an instantaneous impulse, only from the ground.
        if input.jump && self.can_jump {
            self.velocity.y += t.jump_velocity;
            self.can_jump = false;
        }

        self.velocity.x -= self.velocity.x * t.drag * dt;
        self.velocity.z -= self.velocity.z * t.drag * dt;
        self.velocity.y -= t.gravity * dt;

        if input.movement.any() {
            let axis = input.movement.axis();
            let desired = (self.flat_forward() * axis.y + self.flat_right() * axis.x).normalize_or_zero();
            let multiplier = if input.sprint { t.sprint_multiplier } else { 1.0 };
            let impulse = desired * t.move_impulse * multiplier * dt;
            self.velocity.x += impulse.x;
            self.velocity.z += impulse.z;
        }

        self.transform.translate(self.velocity * dt);

        if self.transform.position.y < t.eye_height {
            self.velocity.y = 0.0;
            self.transform.position.y = t.eye_height;
            self.can_jump = true;
        }

        self.pose()
    }

    /// Current camera pose.
    pub fn pose(&self) -> PlayerPose {
        PlayerPose {
            position: self.transform.position,
            forward: self.transform.forward(),
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Horizontal forward derived from yaw, so movement stays planar at any pitch.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right derived from yaw.
    pub fn flat_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Get player position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Take damage.
    pub fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }

    /// Check if player is dead.
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }
}
