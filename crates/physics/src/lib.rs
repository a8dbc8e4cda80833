//! Hit-test physics for Last Light, built on Rapier3D.
//!
//! Only the query side of Rapier is used: zombies own posed collider shapes
//! that the weapon ray is cast against. Nothing here is dynamically simulated.

pub mod collision;
pub mod physics_world;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::ColliderHandle;
