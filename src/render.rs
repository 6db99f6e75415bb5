//! The windowed wgpu renderer.
//!
//! Uploads the noise volume once as an `r8unorm` 3D texture with repeat
//! addressing, then draws two billboard quads per frame from the shaders in
//! [`crate::shader`]: the fire pass first with additive blending, the smoke
//! pass second with alpha blending. The pass order is load-bearing; see
//! [`crate::composite`].
//!
//! Runtime keys: `[`/`]` smoke scale, `-`/`=` fire scale, `W`/`S` smoke
//! speed, `A`/`D` fire speed, `1`/`2` flame height, `Esc` quits.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::composite::Billboard;
use crate::error::GpuError;
use crate::fire::FireParams;
use crate::shader::{self, PassUniforms};
use crate::smoke::SmokeParams;
use crate::time::FrameClock;
use crate::volume::NoiseVolume;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Additive blending for the fire pass: source scaled by its alpha, the
/// destination kept whole, so overlapping glow accumulates.
const FIRE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    fire_pipeline: wgpu::RenderPipeline,
    smoke_pipeline: wgpu::RenderPipeline,
    fire_uniform_buffer: wgpu::Buffer,
    smoke_uniform_buffer: wgpu::Buffer,
    fire_bind_group: wgpu::BindGroup,
    smoke_bind_group: wgpu::BindGroup,
    clock: FrameClock,
    pub fire: FireParams,
    pub smoke: SmokeParams,
    pub fire_board: Billboard,
    pub smoke_board: Billboard,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        volume: &NoiseVolume,
        fire: FireParams,
        smoke: SmokeParams,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Upload the volume once; both passes sample it with repeat
        // addressing, which is what makes the animation seamless.
        let n = volume.size();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Noise Volume"),
            size: wgpu::Extent3d {
                width: n,
                height: n,
                depth_or_array_layers: n,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            volume.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(n),
                rows_per_image: Some(n),
            },
            wgpu::Extent3d {
                width: n,
                height: n,
                depth_or_array_layers: n,
            },
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Noise Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Pass Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D3,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let fire_board = Billboard::fire();
        let smoke_board = Billboard::smoke();
        let aspect = config.width as f32 / config.height as f32;

        let fire_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fire Uniforms"),
            contents: bytemuck::cast_slice(&[pass_uniforms(
                0.0,
                aspect,
                fire.scale,
                fire.speed,
                fire.soft_edge,
                fire.intensity,
                &fire_board,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let smoke_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Smoke Uniforms"),
            contents: bytemuck::cast_slice(&[pass_uniforms(
                0.0,
                aspect,
                smoke.scale,
                smoke.speed,
                smoke.soft_edge,
                smoke.opacity,
                &smoke_board,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let make_bind_group = |label: &str, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&texture_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        };
        let fire_bind_group = make_bind_group("Fire Bind Group", &fire_uniform_buffer);
        let smoke_bind_group = make_bind_group("Smoke Bind Group", &smoke_uniform_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pass Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let fire_pipeline = create_pass_pipeline(
            &device,
            &pipeline_layout,
            "Fire",
            &shader::fire_source(),
            FIRE_BLEND,
            config.format,
        );
        let smoke_pipeline = create_pass_pipeline(
            &device,
            &pipeline_layout,
            "Smoke",
            &shader::smoke_source(),
            wgpu::BlendState::ALPHA_BLENDING,
            config.format,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            fire_pipeline,
            smoke_pipeline,
            fire_uniform_buffer,
            smoke_uniform_buffer,
            fire_bind_group,
            smoke_bind_group,
            clock: FrameClock::new(),
            fire,
            smoke,
            fire_board,
            smoke_board,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Adjust a tunable from a key press. Returns whether the key was used.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::BracketLeft => {
                self.smoke.scale = (self.smoke.scale - 0.1).clamp(0.5, 6.0);
            }
            KeyCode::BracketRight => {
                self.smoke.scale = (self.smoke.scale + 0.1).clamp(0.5, 6.0);
            }
            KeyCode::Minus => {
                self.fire.scale = (self.fire.scale - 0.1).clamp(0.8, 6.0);
            }
            KeyCode::Equal => {
                self.fire.scale = (self.fire.scale + 0.1).clamp(0.8, 6.0);
            }
            KeyCode::KeyS => {
                self.smoke.speed = (self.smoke.speed - 0.02).clamp(0.02, 0.8);
            }
            KeyCode::KeyW => {
                self.smoke.speed = (self.smoke.speed + 0.02).clamp(0.02, 0.8);
            }
            KeyCode::KeyA => {
                self.fire.speed = (self.fire.speed - 0.05).clamp(0.05, 2.0);
            }
            KeyCode::KeyD => {
                self.fire.speed = (self.fire.speed + 0.05).clamp(0.05, 2.0);
            }
            KeyCode::Digit1 => {
                self.fire_board.height = (self.fire_board.height - 0.05).clamp(0.3, 0.9);
            }
            KeyCode::Digit2 => {
                self.fire_board.height = (self.fire_board.height + 0.05).clamp(0.3, 0.9);
            }
            _ => return false,
        }
        true
    }

    fn update_uniforms(&mut self) {
        let time = self.clock.tick();
        let aspect = self.config.width as f32 / self.config.height as f32;

        let fire = pass_uniforms(
            time,
            aspect,
            self.fire.scale,
            self.fire.speed,
            self.fire.soft_edge,
            self.fire.intensity,
            &self.fire_board,
        );
        let smoke = pass_uniforms(
            time,
            aspect,
            self.smoke.scale,
            self.smoke.speed,
            self.smoke.soft_edge,
            self.smoke.opacity,
            &self.smoke_board,
        );
        self.queue
            .write_buffer(&self.fire_uniform_buffer, 0, bytemuck::cast_slice(&[fire]));
        self.queue
            .write_buffer(&self.smoke_uniform_buffer, 0, bytemuck::cast_slice(&[smoke]));
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Fire before smoke: glow accumulates into the background, then
            // the smoke column occludes it.
            render_pass.set_pipeline(&self.fire_pipeline);
            render_pass.set_bind_group(0, &self.fire_bind_group, &[]);
            render_pass.draw(0..6, 0..1);

            render_pass.set_pipeline(&self.smoke_pipeline);
            render_pass.set_bind_group(0, &self.smoke_bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Most recent FPS estimate from the frame clock.
    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }
}

fn pass_uniforms(
    time: f32,
    aspect: f32,
    scale: f32,
    speed: f32,
    soft_edge: f32,
    strength: f32,
    board: &Billboard,
) -> PassUniforms {
    PassUniforms {
        time,
        scale,
        speed,
        soft_edge,
        strength,
        aspect,
        width: board.width,
        height: board.height,
        offset: board.offset.to_array(),
        _pad: [0.0; 2],
    }
}

fn create_pass_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    label: &str,
    source: &str,
    blend: wgpu::BlendState,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
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
        multiview: None,
        cache: None,
    })
}

pub struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    volume: NoiseVolume,
    fire: FireParams,
    smoke: SmokeParams,
}

impl App {
    pub fn new(volume: NoiseVolume) -> Self {
        Self::with_params(volume, FireParams::default(), SmokeParams::default())
    }

    pub fn with_params(volume: NoiseVolume, fire: FireParams, smoke: SmokeParams) -> Self {
        Self {
            window: None,
            gpu_state: None,
            volume,
            fire,
            smoke,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("hearth — fire & smoke")
            .with_inner_size(winit::dpi::LogicalSize::new(900, 1200));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuState::new(
            window.clone(),
            &self.volume,
            self.fire.clone(),
            self.smoke.clone(),
        )) {
            Ok(gpu_state) => {
                self.window = Some(window);
                self.gpu_state = Some(gpu_state);
            }
            Err(e) => {
                eprintln!("GPU initialization failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.handle_key(code);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                            gpu_state.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("surface out of memory");
                            event_loop.exit();
                        }
                        Err(e) => eprintln!("surface error: {}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
