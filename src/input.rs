//! Keyboard polling and mouse callbacks.
//!
//! Keys are tracked from window events and polled once per frame by
//! [`process_input`]. Cursor movement and scrolling go straight into the
//! camera as they arrive. Mouse buttons are only reported.

use std::collections::HashSet;

use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta},
    keyboard::KeyCode,
};

use crate::{
    camera::{CameraMovement, ProjectionMode},
    state::AppState,
};

/// Pixels per scroll line for touchpads and other pixel-precise devices.
pub const PIXELS_PER_LINE: f64 = 120.0;

const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 6] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
    (KeyCode::KeyE, CameraMovement::Up),
    (KeyCode::KeyQ, CameraMovement::Down),
];

/// Keys currently held down.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn set(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => self.press(key),
            ElementState::Released => self.release(key),
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

/// Turns absolute cursor positions into offsets.
///
/// The first position after creation or [`reset`](Self::reset) only seeds
/// the tracker, so the camera does not jump when the cursor first appears.
#[derive(Debug, Default, Clone)]
pub struct CursorTracker {
    last: Option<(f64, f64)>,
}

impl CursorTracker {
    /// Offset from the previous position. `dy` is positive when the cursor moves up.
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let (last_x, last_y) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));
        ((x - last_x) as f32, (last_y - y) as f32)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    Exit,
}

/// Apply the held keys for this frame.
///
/// Escape requests exit. Movement keys scale by the frame's delta time. P
/// selects orthographic and O perspective; when both are held O wins.
pub fn process_input(state: &mut AppState) -> InputOutcome {
    if state.keys.is_pressed(KeyCode::Escape) {
        return InputOutcome::Exit;
    }

    let dt = state.frame.delta_time;
    for (key, direction) in MOVEMENT_KEYS {
        if state.keys.is_pressed(key) {
            state.camera.process_keyboard(direction, dt);
        }
    }

    if state.keys.is_pressed(KeyCode::KeyP) {
        state.frame.projection.set_mode(ProjectionMode::Orthographic);
    }
    if state.keys.is_pressed(KeyCode::KeyO) {
        state.frame.projection.set_mode(ProjectionMode::Perspective);
    }
    InputOutcome::Continue
}

pub fn handle_cursor_moved(state: &mut AppState, x: f64, y: f64) {
    let (dx, dy) = state.cursor.offset(x, y);
    state.camera.process_mouse_movement(dx, dy);
}

pub fn scroll_offset(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
    }
}

pub fn handle_scroll(state: &mut AppState, delta: MouseScrollDelta) {
    state.camera.process_mouse_scroll(scroll_offset(delta));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButtonReport {
    Pressed(Button),
    Released(Button),
    Unhandled,
}

/// Log a mouse button event. Buttons have no effect on the scene.
pub fn report_mouse_button(button: MouseButton, state: ElementState) -> MouseButtonReport {
    let button = match button {
        MouseButton::Left => Button::Left,
        MouseButton::Middle => Button::Middle,
        MouseButton::Right => Button::Right,
        other => {
            log::warn!("Unhandled mouse button event: {:?}", other);
            return MouseButtonReport::Unhandled;
        }
    };
    let report = if state.is_pressed() {
        MouseButtonReport::Pressed(button)
    } else {
        MouseButtonReport::Released(button)
    };
    match report {
        MouseButtonReport::Pressed(b) => log::info!("{:?} mouse button pressed", b),
        MouseButtonReport::Released(b) => log::info!("{:?} mouse button released", b),
        MouseButtonReport::Unhandled => (),
    }
    report
}
