//! wgpu render pipeline setup

use std::sync::Arc;

use anyhow::Context;
use glam::Vec2;
use winit::window::Window;

use super::shapes::ShapeBatch;
use super::vertex::{Vertex, colors};

/// Maps the fixed logical world onto a surface of any size.
///
/// The world keeps its aspect ratio and is centred; leftover bars stay the
/// clear colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub surface: (u32, u32),
    pub world: Vec2,
}

impl Viewport {
    pub fn new(surface: (u32, u32), world: Vec2) -> Self {
        Self { surface, world }
    }

    /// Pixels per world unit
    pub fn scale(&self) -> f32 {
        let (w, h) = self.surface_size();
        (w / self.world.x).min(h / self.world.y)
    }

    /// Top-left of the world rectangle in surface pixels
    pub fn offset(&self) -> Vec2 {
        let (w, h) = self.surface_size();
        let scale = self.scale();
        Vec2::new(
            (w - self.world.x * scale) / 2.0,
            (h - self.world.y * scale) / 2.0,
        )
    }

    /// World pixels (y down) to normalized device coordinates (y up)
    pub fn world_to_ndc(&self, p: Vec2) -> Vec2 {
        let (w, h) = self.surface_size();
        let px = p * self.scale() + self.offset();
        Vec2::new(px.x / w * 2.0 - 1.0, 1.0 - px.y / h * 2.0)
    }

    fn surface_size(&self) -> (f32, f32) {
        (self.surface.0.max(1) as f32, self.surface.1.max(1) as f32)
    }
}

/// Main render state
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertex buffer capacity, in vertices
    capacity: usize,
    viewport: Viewport,
    scratch: Vec<Vertex>,
}

impl RenderState {
    pub async fn new(window: Arc<Window>, world: Vec2) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("neon-drift-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let capacity = 4096;
        let vertex_buffer = create_vertex_buffer(&device, capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            capacity,
            viewport: Viewport::new((width, height), world),
            scratch: Vec::with_capacity(capacity),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.viewport.surface = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size, after a lost or outdated surface
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Upload the batch and present one frame
    pub fn render(&mut self, batch: &ShapeBatch) -> Result<(), wgpu::SurfaceError> {
        let viewport = self.viewport;
        self.scratch.clear();
        self.scratch.extend(batch.vertices().iter().map(|v| {
            let ndc = viewport.world_to_ndc(Vec2::from(v.position));
            Vertex::new(ndc.x, ndc.y, v.color)
        }));

        if self.scratch.len() > self.capacity {
            self.capacity = self.scratch.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.capacity);
        }
        if !self.scratch.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !self.scratch.is_empty() {
                let (x, y, w, h) = letterbox_rect(&viewport);
                render_pass.set_scissor_rect(x, y, w, h);
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.scratch.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Scissor rectangle covering the world area, clamped to the surface
fn letterbox_rect(viewport: &Viewport) -> (u32, u32, u32, u32) {
    let (sw, sh) = viewport.surface;
    let offset = viewport.offset();
    let x = (offset.x.max(0.0) as u32).min(sw.saturating_sub(1));
    let y = (offset.y.max(0.0) as u32).min(sh.saturating_sub(1));
    let w = ((viewport.world.x * viewport.scale()).round() as u32).min(sw - x).max(1);
    let h = ((viewport.world.y * viewport.scale()).round() as u32).min(sh - y).max(1);
    (x, y, w, h)
}
