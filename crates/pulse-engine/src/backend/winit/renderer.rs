use bytemuck::{Pod, Zeroable};
use wgpu::SurfaceError;

use crate::backend::ColorVertex;
use crate::coords::Viewport;
use crate::paint::Color;

use super::gpu::Gpu;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

const MIN_VERTEX_CAPACITY: usize = 256;

/// Draws one frame of triangulated primitives.
///
/// Pipeline and buffers are created lazily against the surface format of the
/// first frame and rebuilt if the format changes. The vertex buffer grows in
/// powers of two and is never shrunk.
#[derive(Default)]
pub(super) struct ImmediateRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
}

impl ImmediateRenderer {
    /// Clears the frame (to `clear`, black when `None`), draws `vertices`
    /// as a triangle list in `viewport` pixels and presents.
    pub(super) fn render(
        &mut self,
        gpu: &Gpu<'_>,
        viewport: Viewport,
        clear: Option<Color>,
        vertices: &[ColorVertex],
    ) -> Result<(), SurfaceError> {
        self.ensure_pipeline(gpu);
        self.ensure_bindings(gpu);

        let mut frame = gpu.begin_frame()?;

        let draw_count = if vertices.is_empty() || !viewport.is_valid() {
            0
        } else {
            self.write_viewport(gpu, viewport);
            self.ensure_capacity(gpu, vertices.len());
            if let Some(vbo) = self.vbo.as_ref() {
                gpu.queue().write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
            }
            vertices.len() as u32
        };

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pulse immediate pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu(clear.unwrap_or(Color::BLACK))),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (true, Some(pipeline), Some(bind_group), Some(vbo)) = (
                draw_count > 0,
                self.pipeline.as_ref(),
                self.bind_group.as_ref(),
                self.vbo.as_ref(),
            ) {
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, bind_group, &[]);
                rpass.set_vertex_buffer(0, vbo.slice(..));
                rpass.draw(0..draw_count, 0..1);
            }
        }

        gpu.submit(frame);
        Ok(())
    }

    fn ensure_pipeline(&mut self, gpu: &Gpu<'_>) {
        let format = gpu.format();
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let device = gpu.device();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pulse immediate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pulse immediate bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ViewportUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pulse immediate pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pulse immediate pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[ColorVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Fans and quads arrive with either winding.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, gpu: &Gpu<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let ubo = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("pulse viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pulse immediate bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_viewport(&self, gpu: &Gpu<'_>, viewport: Viewport) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            size: [viewport.width, viewport.height],
            _pad: [0.0; 2],
        };
        gpu.queue().write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_capacity(&mut self, gpu: &Gpu<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let cap = required.next_power_of_two().max(MIN_VERTEX_CAPACITY);
        self.vbo = Some(gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("pulse immediate vbo"),
            size: (cap * std::mem::size_of::<ColorVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = cap;
    }
}

fn to_wgpu(c: Color) -> wgpu::Color {
    let [r, g, b, a] = c.clamped().to_premul_array();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}
