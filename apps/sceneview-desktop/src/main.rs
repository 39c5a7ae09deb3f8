use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::{Vec2, Vec4};
use sceneview_input::{InputState, Key};
use sceneview_render::RenderError;
use sceneview_render_wgpu::WgpuContext;
use sceneview_scene::{FrameInput, Scene, SceneError, ViewerConfig, build_starter_scene};
use sceneview_tools::{FrameStats, SceneInspector, UiState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "sceneview-desktop", about = "Sceneview desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width, overriding the config
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height, overriding the config
    #[arg(long)]
    height: Option<u32>,
}

/// Translate a winit key into the keys the camera listens to.
fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyX => Some(Key::X),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

/// Everything that exists once the window and GPU are up.
struct Viewer {
    window: Arc<Window>,
    gpu: WgpuContext,
    scene: Scene,
    input: InputState,
    ui: UiState,
    stats: FrameStats,
    egui_ctx: EguiContext,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    started: Instant,
    last_frame: Instant,
}

impl Viewer {
    fn new(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("sceneview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
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

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        let mut gpu = WgpuContext::new(device, queue, surface, surface_config);
        let mut scene = build_starter_scene(&mut gpu, config)?;
        scene.resize(size.width, size.height);

        let egui_ctx = EguiContext::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(gpu.device(), gpu.surface_format(), None, 1, false);

        let now = Instant::now();
        Ok(Self {
            window,
            gpu,
            ui: UiState::from_scene(&scene),
            scene,
            input: InputState::new(),
            stats: FrameStats::default(),
            egui_ctx,
            egui_winit,
            egui_renderer,
            started: now,
            last_frame: now,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size.width, size.height);
        self.scene.resize(size.width, size.height);
    }

    /// Run one update/draw cycle. Returns false once the viewer should close.
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        self.stats.record_secs(dt);

        self.input.set_capture(
            self.egui_ctx.wants_keyboard_input(),
            self.egui_ctx.wants_pointer_input(),
        );
        if self.input.key_down(Key::Escape) {
            return false;
        }

        self.scene.update(&FrameInput {
            dt,
            total_time: (now - self.started).as_secs_f32(),
            input: &self.input,
        });
        self.input.begin_frame();

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let (width, height) = self.gpu.size();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_ui(ctx, &mut self.ui, &mut self.scene, &self.stats, (width, height));
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);
        self.ui.apply(&mut self.scene);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let egui_renderer = &mut self.egui_renderer;
        let textures_delta = full_output.textures_delta;
        let result = self.scene.draw_with_overlay(&mut self.gpu, |gpu| {
            let Some(view) = gpu.frame_view() else {
                return Ok(());
            };
            let (device, queue) = (gpu.device(), gpu.queue());
            for (id, image_delta) in &textures_delta.set {
                egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
            egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            queue.submit(std::iter::once(encoder.finish()));
            for id in &textures_delta.free {
                egui_renderer.free_texture(id);
            }
            Ok::<(), RenderError>(())
        });

        match result {
            Ok(()) => {}
            Err(SceneError::Render(RenderError::Surface(e))) => {
                tracing::warn!("frame skipped: {e}");
            }
            Err(e) => tracing::error!("draw failed: {e}"),
        }
        true
    }
}

fn draw_ui(
    ctx: &EguiContext,
    ui_state: &mut UiState,
    scene: &mut Scene,
    stats: &FrameStats,
    (width, height): (u32, u32),
) {
    if !ui_state.show_inspector {
        return;
    }

    egui::Window::new("Inspector").show(ctx, |ui| {
        ui.label(format!("Window Dimensions: {width}x{height}"));
        ui.label(format!("Framerate: {:.1} fps", stats.fps()));

        let mut number = ui_state.number;
        ui.add(egui::Slider::new(&mut number, UiState::NUMBER_RANGE).text("Choose a number"));
        ui_state.set_number(number);

        let mut color = ui_state.background_color.to_array();
        ui.horizontal(|ui| {
            ui.label("Background Color");
            ui.color_edit_button_rgba_unmultiplied(&mut color);
        });
        ui_state.background_color = Vec4::from_array(color);

        if ui.button("Press to hide/show").clicked() {
            ui_state.toggle_entity_list();
        }

        ui.separator();
        ui.label(SceneInspector::summary(scene).to_string());

        if ui_state.show_entity_list {
            ui.heading("Entities");
            for entity in SceneInspector::list_entities(scene) {
                ui.small(entity.to_string());
            }

            ui.heading("Cameras");
            let mut activate = None;
            for index in 0..scene.cameras().len() {
                let Some(camera) = SceneInspector::inspect_camera(scene, index) else {
                    continue;
                };
                ui.horizontal(|ui| {
                    ui.small(camera.to_string());
                    if !camera.active && ui.small_button("Activate").clicked() {
                        activate = Some(index);
                    }
                });
            }
            if let Some(index) = activate {
                if let Err(e) = scene.activate_camera(index) {
                    tracing::warn!("camera switch failed: {e}");
                }
            }
        }

        ui.separator();
        ui.small("LMB: Look | WASD: Move | Space/X: Up/Down | Shift: Fast | Esc: Quit");
    });
}

struct App {
    config: ViewerConfig,
    viewer: Option<Viewer>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            viewer: None,
            error: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match Viewer::new(event_loop, &self.config) {
            Ok(viewer) => self.viewer = Some(viewer),
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        let _ = viewer.egui_winit.on_window_event(&viewer.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                viewer.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    match key_state {
                        ElementState::Pressed => viewer.input.press(key),
                        ElementState::Released => viewer.input.release(key),
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                viewer
                    .input
                    .set_look_held(btn_state == ElementState::Pressed);
            }
            WindowEvent::Focused(false) => {
                viewer.input = InputState::new();
            }
            WindowEvent::RedrawRequested => {
                if !viewer.frame() {
                    event_loop.exit();
                    return;
                }
                viewer.window.request_redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(viewer), DeviceEvent::MouseMotion { delta }) = (&mut self.viewer, event) {
            viewer
                .input
                .add_pointer_delta(Vec2::new(delta.0 as f32, delta.1 as f32));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    config.width = cli.width.unwrap_or(config.width);
    config.height = cli.height.unwrap_or(config.height);

    tracing::info!("sceneview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
