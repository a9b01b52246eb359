//! plug-scene
//!
//! A small fixed 3-D scene rendered with wgpu: a plug (body and two prongs),
//! an eraser (head and body) and a cutting mat, each a textured unit cube.
//! A free-flying camera is driven by keyboard, cursor and scroll wheel, and
//! the projection can be toggled between perspective and orthographic.
//!
//! High-level modules
//! - `app`: the winit event loop and per-frame update
//! - `camera`: free-flying camera and the projection modes
//! - `context`: window, surface, device and depth buffer
//! - `data_structures`: GPU meshes, textures and model transforms
//! - `input`: keyboard polling and mouse callbacks
//! - `pipelines`: the textured render pipeline and its shader
//! - `render`: per-frame uniforms and draw submission
//! - `resources`: texture file loading and decoding
//! - `scene`: the fixed list of objects
//! - `settings`: startup configuration
//! - `state`: camera, frame timing and input state bundled together
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod state;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
pub use winit;
