//! Input handling for keyboard and mouse.
//!
//! The host forwards window/device events into [`InputState`]; once per frame
//! the simulation takes a [`FrameInput`] snapshot and the per-frame edges are
//! cleared with [`InputState::begin_frame`].

use glam::Vec2;
use std::collections::HashSet;

/// Held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Axis intent: x = strafe (right positive), y = forward positive.
    pub fn axis(&self) -> Vec2 {
        Vec2::new(
            self.right as i8 as f32 - self.left as i8 as f32,
            self.forward as i8 as f32 - self.backward as i8 as f32,
        )
    }
}

/// Everything the simulation reads from input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MoveKeys,
    pub sprint: bool,
    /// Edge: jump pressed this frame.
    pub jump: bool,
    /// Edge: fire clicked this frame while the pointer is captured.
    pub fire: bool,
    /// Edge: reload pressed this frame.
    pub reload: bool,
    /// Edge: start requested this frame (start overlay).
    pub start: bool,
    /// Pointer movement since last frame; zero unless the pointer is captured.
    pub look_delta: Vec2,
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (for when cursor is locked).
    accumulated_delta: Vec2,

    /// Whether the pointer is captured (exclusive look/fire mode).
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process raw mouse movement. Ignored unless the pointer is captured.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.cursor_locked {
            return;
        }
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state. Releasing drops any look motion not yet consumed.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        if self.cursor_locked != locked {
            log::debug!("Pointer capture {}", if locked { "acquired" } else { "released" });
        }
        self.cursor_locked = locked;
        if !locked {
            self.accumulated_delta = Vec2::ZERO;
            self.mouse_delta = Vec2::ZERO;
        }
    }

    /// Held WASD keys.
    pub fn movement(&self) -> MoveKeys {
        MoveKeys {
            forward: self.is_key_held(KeyCode::KeyW),
            backward: self.is_key_held(KeyCode::KeyS),
            left: self.is_key_held(KeyCode::KeyA),
            right: self.is_key_held(KeyCode::KeyD),
        }
    }

    /// Check if sprint is held (Shift).
    pub fn is_sprinting(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Check if jump was pressed (Space).
    pub fn is_jump_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Space)
    }

    /// Check if fire was pressed this frame (Left mouse button, one shot per click).
    pub fn is_fire_pressed(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }

    /// Check if reload was pressed (R).
    pub fn is_reload_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Check if start was pressed (Enter).
    pub fn is_start_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Enter) || self.is_key_pressed(KeyCode::NumpadEnter)
    }

    /// Snapshot for the simulation tick. Fire and look require pointer capture.
    pub fn frame(&self) -> FrameInput {
        FrameInput {
            movement: self.movement(),
            sprint: self.is_sprinting(),
            jump: self.is_jump_pressed(),
            fire: self.cursor_locked && self.is_fire_pressed(),
            reload: self.is_reload_pressed(),
            start: self.is_start_pressed(),
            look_delta: if self.cursor_locked { self.mouse_delta } else { Vec2::ZERO },
        }
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_hold_is_a_level() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        let f = input.frame();
        assert!(f.jump);
        assert!(f.movement.forward);

        input.begin_frame();
        // Key repeat while held must not re-trigger the edge.
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        let f = input.frame();
        assert!(!f.jump);
        assert!(f.movement.forward);
    }

    #[test]
    fn fire_requires_pointer_capture() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(!input.frame().fire);
        input.set_cursor_locked(true);
        assert!(input.frame().fire);
    }

    #[test]
    fn mouse_motion_accumulates_until_next_frame() {
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_mouse_motion((3.0, -1.0));
        input.process_mouse_motion((2.0, 4.0));
        assert_eq!(input.frame().look_delta, Vec2::ZERO);
        input.begin_frame();
        assert_eq!(input.frame().look_delta, Vec2::new(5.0, 3.0));
        input.begin_frame();
        assert_eq!(input.frame().look_delta, Vec2::ZERO);
    }

    #[test]
    fn motion_is_ignored_without_capture() {
        let mut input = InputState::new();
        input.process_mouse_motion((10.0, 10.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn move_axis_cancels_opposites() {
        let keys = MoveKeys { forward: true, backward: true, left: false, right: true };
        assert_eq!(keys.axis(), Vec2::new(1.0, 0.0));
        assert!(keys.any());
        assert!(!MoveKeys::default().any());
    }
}
