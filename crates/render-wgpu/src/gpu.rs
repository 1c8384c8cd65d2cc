use crate::error::{GpuError, validated};
use crate::shaders;
use crate::texture::{self, SlotTexture};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tilemaze_assets::TextureImages;
use tilemaze_common::TextureSlot;
use tilemaze_render::{DrawBackend, Vertex};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

/// Vertices the streaming buffer holds before its first growth.
const INITIAL_VERTEX_CAPACITY: u64 = 256;

const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

/// Mid grey, fully transparent.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 0.0,
};

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Unorm8x4,
    ];
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_SIZE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("sprite_vertex_buffer"),
        size: capacity * VERTEX_SIZE,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// GPU resources for drawing sprite strips: pipeline, camera uniform, one
/// shared streaming vertex buffer and a texture per [`TextureSlot`].
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    textures: Vec<SlotTexture>,
    surface_format: wgpu::TextureFormat,
}

impl SpriteRenderer {
    /// Compile the shader, build the pipeline and upload every slot's image.
    /// Any validation failure here is fatal to startup.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        images: &TextureImages,
    ) -> Result<Self, GpuError> {
        let shader = validated(device, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("sprite_shader"),
                source: wgpu::ShaderSource::Wgsl(shaders::SPRITE_SHADER.into()),
            })
        })
        .map_err(GpuError::Shader)?;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_uniform_buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = texture::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = validated(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("sprite_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    // Degenerate joins flip winding between quads.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })
        .map_err(GpuError::Pipeline)?;

        let textures = TextureSlot::ALL
            .into_iter()
            .map(|slot| SlotTexture::upload(device, queue, &texture_layout, slot, images.get(slot)))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(?surface_format, "sprite renderer ready");

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer: create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY),
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            textures,
            surface_format,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Pixel size of the texture bound for `slot`.
    pub fn texture_size(&self, slot: TextureSlot) -> (u32, u32) {
        self.textures[slot.index()].size
    }

    /// Start a frame targeting `view`. Feed the returned frame to
    /// [`tilemaze_render::BatchRenderer::render`], then call
    /// [`SpriteFrame::finish`].
    pub fn begin_frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
    ) -> SpriteFrame<'a> {
        SpriteFrame {
            renderer: self,
            device,
            queue,
            view,
            cleared: false,
            uploaded: 0,
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertices: u64) {
        if vertices <= self.vertex_capacity {
            return;
        }
        let capacity = vertices.next_power_of_two();
        tracing::debug!(
            from = self.vertex_capacity,
            to = capacity,
            "growing sprite vertex buffer"
        );
        self.vertex_buffer = create_vertex_buffer(device, capacity);
        self.vertex_capacity = capacity;
    }
}

/// One frame's worth of draw submissions against a [`SpriteRenderer`].
///
/// Every draw is its own submission that follows its own buffer write, so
/// each group sees exactly the vertices uploaded for it even though all
/// groups share one buffer. The first draw clears the target.
pub struct SpriteFrame<'a> {
    renderer: &'a mut SpriteRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
    cleared: bool,
    uploaded: u32,
}

impl SpriteFrame<'_> {
    fn load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        if self.cleared {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(CLEAR_COLOR)
        }
    }

    /// Clear the target if nothing was drawn this frame.
    pub fn finish(self) {
        if self.cleared {
            return;
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_clear_encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite_clear_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: self.load_op(),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl DrawBackend for SpriteFrame<'_> {
    fn set_view_projection(&mut self, view_proj: Mat4) {
        self.queue.write_buffer(
            &self.renderer.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
    }

    fn upload(&mut self, vertices: &[Vertex]) {
        self.uploaded = vertices.len() as u32;
        if vertices.is_empty() {
            return;
        }
        self.renderer
            .ensure_capacity(self.device, vertices.len() as u64);
        self.queue.write_buffer(
            &self.renderer.vertex_buffer,
            0,
            bytemuck::cast_slice(vertices),
        );
    }

    fn draw(&mut self, slot: TextureSlot, vertex_count: u32) {
        let count = vertex_count.min(self.uploaded);
        if count == 0 {
            return;
        }
        let renderer = &*self.renderer;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(slot.label()),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: self.load_op(),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_pipeline(&renderer.pipeline);
            pass.set_bind_group(0, &renderer.uniform_bind_group, &[]);
            pass.set_bind_group(1, &renderer.textures[slot.index()].bind_group, &[]);
            pass.set_vertex_buffer(
                0,
                renderer.vertex_buffer.slice(..count as u64 * VERTEX_SIZE),
            );
            pass.draw(0..count, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.cleared = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn vertex_layout_matches_struct() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 20);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(
            offsets,
            vec![
                offset_of!(Vertex, position) as u64,
                offset_of!(Vertex, tex_coord) as u64,
                offset_of!(Vertex, color) as u64,
            ]
        );
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Unorm8x4);
    }

    #[test]
    fn uniforms_hold_one_matrix() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 64);
        let m = tilemaze_render::Camera2D::default().view_projection();
        let u = Uniforms {
            view_proj: m.to_cols_array_2d(),
        };
        assert_eq!(u.view_proj[0][0], 0.1);
        assert_eq!(u.view_proj[3], [0.0, 0.0, 0.0, 1.0]);
    }
}
