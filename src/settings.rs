//! Startup configuration.
//!
//! Everything has a sensible default; a couple of values can be overridden
//! from the environment so the binary can be pointed at another asset folder
//! without recompiling.

use std::path::PathBuf;

use crate::camera::{DEFAULT_SENSITIVITY, DEFAULT_SPEED};

pub const RESOURCES_ENV: &str = "PLUG_SCENE_RESOURCES";
pub const UNIFORM_COMPOSITION_ENV: &str = "PLUG_SCENE_UNIFORM_TRANSFORMS";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Root folder that holds `textures/`.
    pub resources_dir: PathBuf,
    pub camera_position: [f32; 3],
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
    /// Compose every model matrix as `T * R * S`, ignoring per-object order.
    pub uniform_composition: bool,
    pub clear_colour: wgpu::Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Plug and Eraser".to_string(),
            resources_dir: PathBuf::from("./resources"),
            camera_position: [0.0, 0.0, 3.0],
            camera_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            uniform_composition: false,
            clear_colour: wgpu::Color::BLACK,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value lookup. Unparseable values are ignored.
    pub fn with_overrides<F: Fn(&str) -> Option<String>>(mut self, lookup: F) -> Self {
        if let Some(dir) = lookup(RESOURCES_ENV).filter(|dir| !dir.trim().is_empty()) {
            self.resources_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(UNIFORM_COMPOSITION_ENV) {
            match parse_flag(&flag) {
                Some(value) => self.uniform_composition = value,
                None => log::warn!(
                    "Ignoring {}={:?}: expected one of 1, 0, true, false",
                    UNIFORM_COMPOSITION_ENV,
                    flag
                ),
            }
        }
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
