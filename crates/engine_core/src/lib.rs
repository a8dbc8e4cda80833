//! Core engine types and utilities for Last Light.
//!
//! This crate provides the foundational types used across the simulation:
//! - Transform and spatial helpers (yaw-only facing for upright actors)
//! - Frame timing
//! - Common component types for the ECS

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
