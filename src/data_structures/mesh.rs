//! Vertex layout and GPU-resident mesh buffers.
//!
//! Every object in the scene is drawn from the same unit cube: 36 vertices
//! (6 faces, 2 triangles each) with interleaved position and texture
//! coordinates, plus a trivial 16-bit index list.

use wgpu::util::DeviceExt;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Interleaved vertex: 3 floats of position followed by 2 floats of UV.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

pub const FLOATS_PER_POSITION: usize = 3;
pub const FLOATS_PER_UV: usize = 2;
pub const FLOATS_PER_VERTEX: usize = FLOATS_PER_POSITION + FLOATS_PER_UV;

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; FLOATS_PER_POSITION]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

const fn v(x: f32, y: f32, z: f32, u: f32, t: f32) -> MeshVertex {
    MeshVertex {
        position: [x, y, z],
        tex_coords: [u, t],
    }
}

/// The unit cube spans x and y in 0..1 and z in -1..0.
#[rustfmt::skip]
pub const CUBE_VERTICES: [MeshVertex; 36] = [
    // front
    v(0.0, 0.0, -1.0, 0.0, 0.0), v(1.0, 0.0, -1.0, 1.0, 0.0), v(0.0, 1.0, -1.0, 0.0, 1.0),
    v(1.0, 0.0, -1.0, 1.0, 0.0), v(0.0, 1.0, -1.0, 0.0, 1.0), v(1.0, 1.0, -1.0, 1.0, 1.0),
    // right
    v(1.0, 0.0, -1.0, 0.0, 0.0), v(1.0, 0.0,  0.0, 1.0, 0.0), v(1.0, 1.0, -1.0, 0.0, 1.0),
    v(1.0, 0.0,  0.0, 1.0, 0.0), v(1.0, 1.0, -1.0, 0.0, 1.0), v(1.0, 1.0,  0.0, 1.0, 1.0),
    // left
    v(0.0, 0.0,  0.0, 0.0, 0.0), v(0.0, 0.0, -1.0, 1.0, 0.0), v(0.0, 1.0,  0.0, 0.0, 1.0),
    v(0.0, 0.0, -1.0, 1.0, 0.0), v(0.0, 1.0,  0.0, 0.0, 1.0), v(0.0, 1.0, -1.0, 1.0, 1.0),
    // back
    v(0.0, 0.0,  0.0, 0.0, 0.0), v(1.0, 0.0,  0.0, 1.0, 0.0), v(0.0, 1.0,  0.0, 0.0, 1.0),
    v(1.0, 0.0,  0.0, 1.0, 0.0), v(0.0, 1.0,  0.0, 0.0, 1.0), v(1.0, 1.0,  0.0, 1.0, 1.0),
    // top
    v(0.0, 1.0, -1.0, 0.0, 0.0), v(1.0, 1.0, -1.0, 1.0, 0.0), v(0.0, 1.0,  0.0, 0.0, 1.0),
    v(1.0, 1.0, -1.0, 1.0, 0.0), v(0.0, 1.0,  0.0, 0.0, 1.0), v(1.0, 1.0,  0.0, 1.0, 1.0),
    // bottom
    v(0.0, 0.0, -1.0, 0.0, 0.0), v(1.0, 0.0, -1.0, 1.0, 0.0), v(0.0, 0.0,  0.0, 0.0, 1.0),
    v(1.0, 0.0, -1.0, 1.0, 0.0), v(0.0, 0.0,  0.0, 0.0, 1.0), v(1.0, 0.0,  0.0, 1.0, 1.0),
];

pub const CUBE_INDICES: [u16; 36] = {
    let mut indices = [0u16; 36];
    let mut i = 0;
    while i < indices.len() {
        indices[i] = i as u16;
        i += 1;
    }
    indices
};

#[derive(Debug)]
pub struct MeshBuffers {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
}

/// A static, GPU-resident mesh.
///
/// The counts survive [`destroy`](Self::destroy) so they can still be
/// inspected, but a destroyed mesh has no buffers and cannot be drawn.
#[derive(Debug, Default)]
pub struct Mesh {
    pub name: String,
    buffers: Option<MeshBuffers>,
    pub num_vertices: u32,
    pub num_elements: u32,
}

impl Mesh {
    pub fn cube(device: &wgpu::Device) -> Self {
        Self::from_geometry(device, "Cube", &CUBE_VERTICES, &CUBE_INDICES)
    }

    pub fn from_geometry(
        device: &wgpu::Device,
        name: &str,
        vertices: &[MeshVertex],
        indices: &[u16],
    ) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", name)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::info!(
            "{} mesh created ({} vertices, {} indices)",
            name,
            vertices.len(),
            indices.len()
        );
        Self {
            name: name.to_string(),
            buffers: Some(MeshBuffers { vertex, index }),
            num_vertices: vertices.len() as u32,
            num_elements: indices.len() as u32,
        }
    }

    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.buffers.is_none()
    }

    /// Release the GPU buffers. Calling this again, or on a mesh that never
    /// owned buffers, does nothing.
    pub fn destroy(&mut self) {
        if let Some(buffers) = self.buffers.take() {
            buffers.vertex.destroy();
            buffers.index.destroy();
            log::debug!("{} mesh destroyed", self.name);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        self.destroy();
    }
}
