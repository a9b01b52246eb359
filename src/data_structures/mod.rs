//! Engine data structures: meshes, textures and per-object transforms.
//!
//! - `mesh` holds the vertex layout, the unit cube geometry and GPU buffers
//! - `texture` contains the GPU texture wrapper and the depth buffer
//! - `transform` composes object-to-world model matrices

pub mod mesh;
pub mod texture;
pub mod transform;
