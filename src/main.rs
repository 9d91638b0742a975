// First-person walk through a procedurally carved maze standing on a
// tessellated height-field surface.
//
// main.rs is the rendering/windowing side: wgpu setup, one instanced
// pipeline shared by terrain, walls and props, and the winit loop that
// feeds input into the engine's Scene every frame.

mod engine;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use engine::{
    maze, mesh, AppConfig, ConfigError, DebugOverlay, DebugStats, FirstPersonCamera, GpuVertex,
    InputState, Scene, TerrainMesh, DEFAULT_CONFIG_PATH,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const WALL_COLOR: [f32; 4] = [0.72, 0.60, 0.45, 1.0];
const TERRAIN_COLOR: [f32; 4] = [0.58, 0.58, 0.62, 1.0];
const SOLID_PROP_COLOR: [f32; 4] = [0.65, 0.85, 0.95, 1.0];
const LIQUID_PROP_COLOR: [f32; 4] = [0.20, 0.45, 0.90, 1.0];

// ============================================================================
// ERRORS
// ============================================================================

#[derive(thiserror::Error, Debug)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

// ============================================================================
// INSTANCE DATA (per drawn object)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self { model: model.to_cols_array_2d(), color }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,  // One per instance, not per vertex
            attributes: &[
                // Model matrix columns (locations 3-6)
                wgpu::VertexAttribute { offset: 0,  shader_location: 3, format: wgpu::VertexFormat::Float32x4 },
                wgpu::VertexAttribute { offset: 16, shader_location: 4, format: wgpu::VertexFormat::Float32x4 },
                wgpu::VertexAttribute { offset: 32, shader_location: 5, format: wgpu::VertexFormat::Float32x4 },
                wgpu::VertexAttribute { offset: 48, shader_location: 6, format: wgpu::VertexFormat::Float32x4 },
                // Color (location 7)
                wgpu::VertexAttribute { offset: 64, shader_location: 7, format: wgpu::VertexFormat::Float32x4 },
            ],
        }
    }
}

/// Walls first, then every scene prop (solid or not) as a tinted cube.
fn scene_instances(scene: &Scene) -> Vec<InstanceData> {
    let walls = scene
        .wall_transforms()
        .into_iter()
        .map(|m| InstanceData::new(m, WALL_COLOR));
    let props = scene.objects().iter().map(|o| {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(o.half_extent * 2.0),
            Quat::IDENTITY,
            o.position,
        );
        InstanceData::new(model, if o.solid { SOLID_PROP_COLOR } else { LIQUID_PROP_COLOR })
    });
    walls.chain(props).collect()
}

// ============================================================================
// UNIFORM DATA
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
}

impl Uniforms {
    fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            light_dir: [-0.4, -1.0, -0.3, 0.0],
        }
    }
}

// ============================================================================
// GPU MESH
// ============================================================================

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &TerrainMesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.index_count() as u32,
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    render_pipeline: wgpu::RenderPipeline,
    cube: GpuMesh,
    terrain: GpuMesh,
    terrain_instance_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    num_instances: u32,
    max_instances: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    scene: Scene,
    camera: FirstPersonCamera,
    input: InputState,
    overlay: DebugOverlay,
    last_update: Instant,

    // Frame timing for the overlay
    fps: u32,
    frame_time_avg_ms: f32,
}

impl State {
    async fn new(window: Arc<Window>, app: &AppConfig, scene: Scene) -> Result<Self, StartupError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(StartupError::NoAdapter)?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if app.window.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let uniforms = Uniforms::new();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::desc(), InstanceData::desc()],  // Vertex + Instance buffers
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Terrain quads wind the other way from the cube faces.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let cube = GpuMesh::upload(&device, &mesh::unit_cube(), "Cube");
        let terrain = GpuMesh::upload(&device, scene.terrain(), "Terrain");

        let terrain_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Instance Buffer"),
            contents: bytemuck::cast_slice(&[InstanceData::new(Mat4::IDENTITY, TERRAIN_COLOR)]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Maze size is fixed for the run, so every regenerated maze fits.
        let max_instances =
            scene.maze().width() as usize * scene.maze().height() as usize + scene.objects().len();
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let overlay = DebugOverlay::new(&window, &device, surface_format);

        let mut camera = FirstPersonCamera::new(app.agent.move_speed, app.agent.mouse_sensitivity);
        camera.look_along(scene.start_facing());

        let mut state = Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            render_pipeline,
            cube,
            terrain,
            terrain_instance_buffer,
            instance_buffer,
            num_instances: 0,
            max_instances,
            uniform_buffer,
            uniform_bind_group,
            scene,
            camera,
            input: InputState::new(),
            overlay,
            last_update: Instant::now(),
            fps: 0,
            frame_time_avg_ms: 0.0,
        };
        state.write_instances();
        state.set_mouse_look(true);
        Ok(state)
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
        }
    }

    /// Upload wall + prop instances. Called at startup and after regeneration.
    fn write_instances(&mut self) {
        let instances = scene_instances(&self.scene);
        let count = instances.len().min(self.max_instances);
        if count < instances.len() {
            log::warn!("dropping {} instances over capacity", instances.len() - count);
        }
        self.queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances[..count]));
        self.num_instances = count as u32;
    }

    fn set_mouse_look(&mut self, enabled: bool) {
        self.camera.mouse_look = enabled;
        let grab = if enabled {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            log::warn!("cursor grab failed: {e}");
        }
        self.window.set_cursor_visible(!enabled);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;

        if self.input.was_key_pressed(KeyCode::KeyR) {
            match self.scene.regenerate(maze::entropy_seed()) {
                Ok(()) => self.write_instances(),
                Err(e) => log::error!("maze regeneration failed: {e}"),
            }
        }
        if self.input.was_key_pressed(KeyCode::F3) {
            self.overlay.toggle();
        }
        if self.input.was_key_pressed(KeyCode::Tab) {
            self.set_mouse_look(!self.camera.mouse_look);
        }

        self.camera.update_look(&self.input);
        let delta = self.camera.desired_delta(&self.input, dt);
        self.scene.update(delta);

        self.input.end_frame();
    }

    fn debug_stats(&self) -> DebugStats {
        let eye = self.scene.agent().position;
        let front = self.camera.front();
        let maze = self.scene.maze();
        DebugStats {
            fps: self.fps,
            frame_time_avg_ms: self.frame_time_avg_ms,
            resolution: (self.size.width, self.size.height),
            camera_position: (eye.x, eye.y, eye.z),
            camera_facing: (front.x, front.y, front.z),
            maze_size: (maze.width(), maze.height()),
            maze_seed: maze.seed(),
            wall_count: maze.wall_count(),
            obstacle_count: self.scene.obstacles().len(),
            terrain_vertices: self.scene.terrain().vertex_count(),
            mouse_look: self.camera.mouse_look,
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Update camera uniforms
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view_proj = self.camera.view_projection(self.scene.agent().position, aspect);
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
            ..Uniforms::new()
        };
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

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
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.04,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
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

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            // Terrain: one instance at the origin
            render_pass.set_vertex_buffer(0, self.terrain.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.terrain_instance_buffer.slice(..));
            render_pass.set_index_buffer(self.terrain.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.terrain.num_indices, 0, 0..1);

            // Walls and props: one cube per instance
            if self.num_instances > 0 {
                render_pass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.set_index_buffer(self.cube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.cube.num_indices, 0, 0..self.num_instances);
            }
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let stats = self.overlay.visible.then(|| self.debug_stats());
        self.overlay.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.window,
            &view,
            &screen_descriptor,
            stats.as_ref(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn run() -> Result<(), StartupError> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let app = AppConfig::load_or_default(&config_path)?;
    let scene = Scene::new(&app)?;

    let event_loop = EventLoop::new()?;

    let window_attributes = Window::default_attributes()
        .with_title(app.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(app.window.width, app.window.height));

    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut state = pollster::block_on(State::new(window.clone(), &app, scene))?;
    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                if !state.overlay.handle_window_event(&window, event) {
                    state.input.process_event(event);
                }

                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => control_flow.exit(),
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update();
                        match state.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("GPU out of memory, exiting");
                                control_flow.exit()
                            }
                            Err(e) => log::warn!("{:?}", e),
                        }

                        frame_count += 1;
                        let now = Instant::now();
                        let elapsed = (now - last_fps_update).as_secs_f32();
                        if elapsed >= 1.0 {
                            state.fps = frame_count;
                            state.frame_time_avg_ms = elapsed * 1000.0 / frame_count as f32;
                            log::debug!(
                                "FPS: {} | Walls: {} | Seed: {}",
                                frame_count,
                                state.scene.maze().wall_count(),
                                state.scene.seed()
                            );
                            frame_count = 0;
                            last_fps_update = now;
                        }
                    }
                    _ => {}
                }
            }
            WinitEvent::DeviceEvent { ref event, .. } => {
                state.input.process_device_event(event);
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
