//! Depth-tested rendering of [`Model`]s.
//!
//! The renderer owns everything shared between models: the camera uniform
//! buffer, the bind group layouts every [`Shader`](crate::Shader) links
//! against, a pool of per-model uniform buffers and the depth buffer.
//!
//! # Bind Groups
//!
//! | Group | Contents                                   | Written          |
//! |-------|--------------------------------------------|------------------|
//! | 0     | [`CameraUniforms`]: view, proj, view_proj  | once per frame   |
//! | 1     | [`ModelUniforms`]: model, normal matrix    | once per model   |
//!
//! A frame clears color to [`CLEAR_COLOR`] and depth to 1.0, then issues one
//! indexed draw per primitive with a `Less` depth test.

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::math::Mat4;
use crate::model::Model;

/// Background color of every frame.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Camera uniforms uploaded once per frame (group 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// `proj * view`.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniforms {
    pub fn from_camera(camera: &Camera) -> Self {
        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            view_proj: (proj * view).to_cols_array_2d(),
        }
    }
}

/// Per-model uniforms (group 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for transforming normals under
    /// non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
}

impl ModelUniforms {
    pub fn from_matrix(model: Mat4) -> Self {
        let normal_matrix = glam::Mat4::from(model).inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

struct ModelSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct DepthBuffer {
    // Held so the view stays valid.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthBuffer {
    fn new(gpu: &GpuContext) -> Self {
        let size = (gpu.width().max(1), gpu.height().max(1));
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
            size,
        }
    }
}

/// Draws models into the window surface.
pub struct Renderer {
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    camera_layout: wgpu::BindGroupLayout,
    model_layout: wgpu::BindGroupLayout,
    model_slots: Vec<ModelSlot>,
    next_slot: usize,
    depth: DepthBuffer,
    pub clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = uniform_layout(device, "Camera Bind Group Layout");
        let model_layout = uniform_layout(device, "Model Bind Group Layout");

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            camera_buffer,
            camera_bind_group,
            camera_layout,
            model_layout,
            model_slots: Vec::new(),
            next_slot: 0,
            depth: DepthBuffer::new(gpu),
            clear_color: CLEAR_COLOR,
        }
    }

    /// Layouts for groups 0 and 1, in group order.
    pub fn bind_group_layouts(&self) -> [&wgpu::BindGroupLayout; 2] {
        [&self.camera_layout, &self.model_layout]
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth.size != (gpu.width().max(1), gpu.height().max(1)) {
            self.depth = DepthBuffer::new(gpu);
        }
    }

    /// Renders one frame containing `models` and presents it.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        camera: &Camera,
        models: &[&Model],
    ) -> Result<(), wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_depth_size(gpu);

        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniforms::from_camera(camera)]),
        );

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Model Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            self.next_slot = 0;
            for model in models {
                self.render_model(gpu, &mut pass, model);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Uploads `model`'s uniforms, binds its pipeline and draws each of its
    /// primitives.
    ///
    /// Group 0 must already be bound on `pass`. Each call within a frame uses
    /// its own uniform buffer, so models never overwrite each other's matrices.
    pub fn render_model(&mut self, gpu: &GpuContext, pass: &mut wgpu::RenderPass<'_>, model: &Model) {
        let slot = self.next_model_slot(gpu);

        gpu.queue.write_buffer(
            &slot.buffer,
            0,
            bytemuck::cast_slice(&[ModelUniforms::from_matrix(model.transform.model_matrix())]),
        );

        pass.set_pipeline(model.shader().pipeline());
        pass.set_bind_group(1, &slot.bind_group, &[]);

        for primitive in model.primitives() {
            pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
            pass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..primitive.index_count, 0, 0..1);
        }
    }

    fn next_model_slot(&mut self, gpu: &GpuContext) -> &ModelSlot {
        if self.next_slot == self.model_slots.len() {
            let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Model Uniforms"),
                size: std::mem::size_of::<ModelUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Bind Group"),
                layout: &self.model_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.model_slots.push(ModelSlot { buffer, bind_group });
        }

        let slot = &self.model_slots[self.next_slot];
        self.next_slot += 1;
        slot
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
