//! Drawing the scene.
//!
//! [`SceneRenderer`] owns everything the frame needs besides the surface: the
//! pipeline, the shared cube, one texture per distinct file and one uniform
//! buffer per object. A frame is a single render pass that clears colour and
//! depth, then issues one indexed draw per object in scene order.

use std::iter;

use anyhow::Context as _;
use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    camera::{Camera, Projection},
    context::Context,
    data_structures::{mesh::Mesh, texture::Texture, transform::TransformUniform},
    pipelines::scene::{mk_scene_pipeline, transform_bind_group_layout},
    resources::{texture::load_texture, texture_path},
    scene::{SceneObject, normalize_composition, texture_files},
    settings::Settings,
    state::AppState,
};

/// GPU bindings for a single scene object.
#[derive(Debug)]
struct DrawItem {
    name: &'static str,
    uniform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    /// Index into [`SceneRenderer::textures`].
    texture: usize,
}

#[derive(Debug)]
struct LoadedTexture {
    file: &'static str,
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    cube: Mesh,
    textures: Vec<LoadedTexture>,
    objects: Vec<SceneObject>,
    items: Vec<DrawItem>,
}

/// The uniform blocks for one frame, one per object in draw order.
pub fn frame_uniforms(
    camera: &Camera,
    projection: &Projection,
    objects: &[SceneObject],
) -> Vec<TransformUniform> {
    let view = camera.view_matrix();
    let proj = projection.calc_matrix(Projection::FOVY);
    objects
        .iter()
        .map(|object| TransformUniform::new(object.model_matrix(), view, proj))
        .collect()
}

impl SceneRenderer {
    /// Build the pipeline, upload the cube and load every texture the
    /// objects reference. Any texture failure aborts loading.
    pub async fn load(
        ctx: &Context,
        settings: &Settings,
        mut objects: Vec<SceneObject>,
    ) -> anyhow::Result<Self> {
        if settings.uniform_composition {
            log::info!("Composing every model matrix as T * R * S");
            normalize_composition(&mut objects);
        }

        let texture_layout = Texture::bind_group_layout(&ctx.device);
        let transform_layout = transform_bind_group_layout(&ctx.device);
        let pipeline =
            mk_scene_pipeline(&ctx.device, &ctx.config, &texture_layout, &transform_layout);
        let cube = Mesh::cube(&ctx.device);

        let files = texture_files(&objects);
        let loaded = futures::future::try_join_all(files.iter().map(|file| {
            let path = texture_path(&settings.resources_dir, file);
            async move { load_texture(&path, &ctx.device, &ctx.queue).await }
        }))
        .await?;
        let textures: Vec<LoadedTexture> = files
            .into_iter()
            .zip(loaded)
            .map(|(file, texture)| LoadedTexture {
                file,
                bind_group: texture.bind_group(&ctx.device, &texture_layout),
                texture,
            })
            .collect();

        let items = objects
            .iter()
            .map(|object| {
                let texture = textures
                    .iter()
                    .position(|t| t.file == object.texture)
                    .with_context(|| format!("No texture loaded for {}", object.name))?;
                let uniform = TransformUniform::new(
                    object.model_matrix(),
                    Matrix4::identity(),
                    Matrix4::identity(),
                );
                let uniform_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("{} Transform Buffer", object.name)),
                            contents: bytemuck::cast_slice(&[uniform]),
                            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        });
                let transform_bind_group =
                    ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout: &transform_layout,
                        entries: &[wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        }],
                        label: Some(&format!("{} Transform Bind Group", object.name)),
                    });
                Ok(DrawItem {
                    name: object.name,
                    uniform_buffer,
                    transform_bind_group,
                    texture,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        log::info!(
            "Scene loaded: {} objects, {} textures",
            items.len(),
            textures.len()
        );
        Ok(Self {
            pipeline,
            cube,
            textures,
            objects,
            items,
        })
    }

    pub fn render(&self, ctx: &Context, state: &AppState) -> Result<(), wgpu::SurfaceError> {
        // Keep the loop going
        ctx.window().request_redraw();

        if !ctx.is_surface_configured() {
            return Ok(());
        }

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.encode(ctx, state, &view);
        output.present();
        Ok(())
    }

    /// Record and submit one frame into `target`. The depth buffer is the
    /// context's, so `target` must match the surface size.
    pub fn encode(&self, ctx: &Context, state: &AppState, target: &wgpu::TextureView) {
        let uniforms = frame_uniforms(&state.camera, &state.frame.projection, &self.objects);
        for (item, uniform) in self.items.iter().zip(&uniforms) {
            ctx.queue
                .write_buffer(&item.uniform_buffer, 0, bytemuck::cast_slice(&[*uniform]));
        }

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            match self.cube.buffers() {
                Some(buffers) => {
                    render_pass.set_pipeline(&self.pipeline);
                    render_pass.set_vertex_buffer(0, buffers.vertex.slice(..));
                    render_pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint16);
                    for item in &self.items {
                        render_pass.set_bind_group(0, &self.textures[item.texture].bind_group, &[]);
                        render_pass.set_bind_group(1, &item.transform_bind_group, &[]);
                        render_pass.draw_indexed(0..self.cube.num_elements, 0, 0..1);
                        log::trace!("Drew {}", item.name);
                    }
                }
                None => log::warn!("{} mesh was destroyed, skipping draws", self.cube.name),
            }
        }

        ctx.queue.submit(iter::once(encoder.finish()));
    }

    /// Release the mesh buffers. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.cube.destroy();
        for loaded in &self.textures {
            loaded.texture.texture.destroy();
        }
        for item in &self.items {
            item.uniform_buffer.destroy();
        }
        log::info!("Scene resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::ProjectionMode, data_structures::transform::ModelTransform,
        scene::reference_scene,
    };

    #[test]
    fn one_uniform_per_object_in_order() {
        let scene = reference_scene();
        let camera = Camera::default();
        let projection = Projection::new(800, 600);
        let uniforms = frame_uniforms(&camera, &projection, &scene);
        assert_eq!(uniforms.len(), scene.len());
        for (uniform, object) in uniforms.iter().zip(&scene) {
            let model: [[f32; 4]; 4] = object.model_matrix().into();
            assert_eq!(uniform.model, model);
        }
    }

    #[test]
    fn view_and_projection_are_shared() {
        let scene = reference_scene();
        let mut camera = Camera::default();
        camera.process_mouse_movement(30.0, -12.0);
        let projection = Projection::new(1024, 768);
        let uniforms = frame_uniforms(&camera, &projection, &scene);
        let view: [[f32; 4]; 4] = camera.view_matrix().into();
        assert!(uniforms.iter().all(|u| u.view == view));
        assert!(uniforms.windows(2).all(|w| w[0].projection == w[1].projection));
    }

    #[test]
    fn projection_follows_mode() {
        let objects = vec![SceneObject {
            name: "unit",
            texture: "unit.png",
            transform: ModelTransform::new(),
        }];
        let camera = Camera::default();
        let mut projection = Projection::new(800, 600);
        let perspective = frame_uniforms(&camera, &projection, &objects)[0];
        projection.set_mode(ProjectionMode::Orthographic);
        let orthographic = frame_uniforms(&camera, &projection, &objects)[0];
        assert_ne!(perspective.projection, orthographic.projection);
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        assert_eq!(orthographic.model, identity);
    }
}
