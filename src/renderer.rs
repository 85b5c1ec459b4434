use anyhow::{Context, Result};
use bytemuck::Zeroable;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::config::{LightingConfig, MappingMode, ProgramKind};
use crate::model::{Model, ModelAssets};
use crate::overlay::{draw_overlay, OverlayState};
use crate::pipeline::{create_depth_view, SceneLayouts, ScenePipelines};
use crate::scene::{ModelSlot, Scene, DRAWS_PER_FRAME};
use crate::types::{DrawUniforms, GlobalUniforms};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Everything a frame needs besides the scene itself
#[derive(Debug, Clone, Copy)]
pub struct FrameSettings<'a> {
    pub program: ProgramKind,
    pub mapping_mode: MappingMode,
    pub lighting: &'a LightingConfig,
    pub overlay: OverlayState,
}

/// Rasterizes the scene's draw list with the selected program, then the egui overlay
pub struct SceneRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    layouts: SceneLayouts,
    pipelines: ScenePipelines,
    sampler: wgpu::Sampler,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
    models: HashMap<ModelSlot, Model>,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size);
        surface.configure(&device, &surface_config);
        info!(
            "Adapter {:?}, surface format {:?}",
            adapter.get_info().name,
            surface_config.format
        );

        let depth_view = create_depth_view(&device, surface_config.width, surface_config.height);
        let layouts = SceneLayouts::new(&device);
        let pipelines = ScenePipelines::new(&device, &layouts, surface_config.format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Model Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let global_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global Uniforms"),
            contents: bytemuck::bytes_of(&GlobalUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global_bind_group"),
            layout: &layouts.global,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let draw_stride = aligned_stride(
            std::mem::size_of::<DrawUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(&device, &layouts.draw, draw_stride, DRAWS_PER_FRAME);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            layouts,
            pipelines,
            sampler,
            global_buffer,
            global_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: DRAWS_PER_FRAME,
            models: HashMap::new(),
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find appropriate adapter")
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_draw_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Upload a model into its slot, replacing whatever was there
    pub fn load_model(&mut self, slot: ModelSlot, assets: &ModelAssets) {
        let model = Model::upload(
            &self.device,
            &self.queue,
            assets,
            &self.layouts.textures,
            &self.sampler,
            &format!("{:?}", slot),
        );
        info!("{:?} model uploaded: {} triangles", slot, model.triangle_count());
        self.models.insert(slot, model);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    /// Reapply the current configuration after the surface was lost or outdated
    pub fn reconfigure(&mut self) {
        self.resize(self.surface_config.width, self.surface_config.height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn write_draw_uniforms(&mut self, scene: &Scene) -> Vec<(ModelSlot, u32)> {
        let draws = scene.draw_list();
        if draws.len() > self.draw_capacity {
            debug!("Growing draw uniform buffer to {} slots", draws.len());
            let (buffer, bind_group) = Self::create_draw_buffer(
                &self.device,
                &self.layouts.draw,
                self.draw_stride,
                draws.len(),
            );
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = draws.len();
        }

        let view = scene.camera().view_matrix();
        let stride = self.draw_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        let mut issued = Vec::with_capacity(draws.len());

        for (i, draw) in draws.iter().enumerate() {
            let Some(model) = self.models.get(&draw.slot) else {
                continue;
            };
            let uniforms = DrawUniforms::new(draw.transform, view, model.material());
            let offset = i * stride;
            bytes[offset..offset + std::mem::size_of::<DrawUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
            issued.push((draw.slot, offset as u32));
        }

        self.queue.write_buffer(&self.draw_buffer, 0, &bytes);
        issued
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        settings: &FrameSettings<'_>,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let camera = scene.camera();
        let globals = GlobalUniforms::new(
            camera.view_matrix(),
            camera.proj_matrix(),
            settings.lighting,
            settings.mapping_mode.index(),
        );
        self.queue
            .write_buffer(&self.global_buffer, 0, bytemuck::bytes_of(&globals));
        let issued = self.write_draw_uniforms(scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        // Scene pass
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipelines.get(settings.program) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.global_bind_group, &[]);

                for &(slot, offset) in &issued {
                    if let Some(model) = self.models.get(&slot) {
                        render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                        model.draw(&mut render_pass, None);
                    }
                }
            }
        }

        // egui pass - overlay
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| draw_overlay(ctx, &settings.overlay));

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }
}

/// Round a uniform block size up to the device's dynamic-offset alignment
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.next_multiple_of(alignment.max(1))
}
