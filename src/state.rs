//! Application state that lives outside the GPU.
//!
//! [`AppState`] is handed by reference to input handling and rendering. It
//! owns the camera, the frame timing and projection, and the raw input
//! trackers. Nothing here needs a graphics context, so it can be driven
//! directly in tests.

use cgmath::Deg;

use crate::{
    camera::{Camera, Projection},
    input::{CursorTracker, KeyboardState},
    settings::Settings,
};

#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    /// Seconds elapsed between the previous frame and this one.
    pub delta_time: f32,
    pub projection: Projection,
}

#[derive(Debug)]
pub struct AppState {
    pub camera: Camera,
    pub frame: FrameState,
    pub cursor: CursorTracker,
    pub keys: KeyboardState,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let camera = Camera::new(
            settings.camera_position,
            Deg(crate::camera::DEFAULT_YAW),
            Deg(crate::camera::DEFAULT_PITCH),
        )
        .with_controls(settings.camera_speed, settings.mouse_sensitivity);
        Self {
            camera,
            frame: FrameState {
                delta_time: 0.0,
                projection: Projection::new(settings.width, settings.height),
            },
            cursor: CursorTracker::default(),
            keys: KeyboardState::default(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame.projection.resize(width, height);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
