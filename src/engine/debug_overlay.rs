// Debug overlay drawn with egui on top of the 3D scene.
// Toggled with F3; shows camera, maze and terrain stats.

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub resolution: (u32, u32),
    pub camera_position: (f32, f32, f32),
    pub camera_facing: (f32, f32, f32),
    pub maze_size: (u32, u32),
    pub maze_seed: u64,
    pub wall_count: usize,
    pub obstacle_count: usize,
    pub terrain_vertices: usize,
    pub mouse_look: bool,
}

pub struct DebugOverlay {
    pub visible: bool,
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let ctx = egui::Context::default();
        ctx.style_mut(|style| {
            style.visuals.override_text_color = Some(egui::Color32::WHITE);
            style.override_font_id = Some(egui::FontId::monospace(13.0));
        });

        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        // Drawn after the scene pass: no depth, no MSAA, no dithering.
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self { visible: true, ctx, winit_state, renderer }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Feed a window event to egui. Returns true when egui consumed it and
    /// the game should not see it.
    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// Render one egui frame on top of the already-drawn scene.
    /// `stats` = `None` draws nothing but still flushes egui's texture updates.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: Option<&DebugStats>,
    ) {
        let raw_input = self.winit_state.take_egui_input(window);
        let output = self.ctx.run(raw_input, |ctx| {
            if let Some(stats) = stats {
                stats_panel(ctx, stats);
            }
        });
        self.winit_state.handle_platform_output(window, output.platform_output);

        let tris = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer.update_buffers(device, queue, encoder, &tris, screen_descriptor);

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        self.renderer.render(&mut pass.forget_lifetime(), &tris, screen_descriptor);

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn stats_panel(ctx: &egui::Context, stats: &DebugStats) {
    egui::Area::new(egui::Id::new("debug_overlay"))
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                .inner_margin(egui::Margin::same(8.0))
                .rounding(4.0)
                .show(ui, |ui| {
                    let (px, py, pz) = stats.camera_position;
                    let (fx, fy, fz) = stats.camera_facing;
                    ui.label(format!("FPS: {}  ({:.2} ms)", stats.fps, stats.frame_time_avg_ms));
                    ui.label(format!("Resolution: {} x {}", stats.resolution.0, stats.resolution.1));
                    ui.label(format!("Position: ({px:.1}, {py:.1}, {pz:.1})"));
                    ui.label(format!("Facing: ({fx:.1}, {fy:.1}, {fz:.1})"));
                    ui.label(format!(
                        "Maze: {}x{}  seed {}",
                        stats.maze_size.0, stats.maze_size.1, stats.maze_seed
                    ));
                    ui.label(format!(
                        "Walls: {}  Obstacles: {}",
                        stats.wall_count, stats.obstacle_count
                    ));
                    ui.label(format!("Terrain vertices: {}", stats.terrain_vertices));
                    ui.label(if stats.mouse_look {
                        "Mouse look: on (Tab to release)"
                    } else {
                        "Mouse look: off (Tab to capture)"
                    });
                    ui.label("R: new maze   F3: hide");
                });
        });
}
