//! Last Light: first-person horde survival simulation.
//!
//! [`session::GameSession`] owns the whole simulation and is ticked once per
//! frame with a [`input::FrameInput`]. Rendering, audio and UI live behind
//! [`presentation::Presentation`].

pub mod assets;
pub mod combat;
pub mod config;
pub mod effects;
pub mod horde;
pub mod hud;
pub mod player;
pub mod presentation;
pub mod schedule;
pub mod session;
pub mod spawner;
pub mod weapons;
pub mod zombie;

pub use config::GameConfig;
pub use presentation::{HeadlessPresentation, Presentation};
pub use session::{GameSession, SessionPhase};
