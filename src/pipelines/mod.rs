//! Render pipeline construction.
//!
//! The scene uses a single pipeline: textured, depth-tested triangles with
//! no blending or lighting.

pub mod scene;
