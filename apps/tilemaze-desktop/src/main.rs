use anyhow::{Context, Result};
use clap::Parser;
use glam::{UVec2, Vec2};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tilemaze_assets::TextureImages;
use tilemaze_common::{AppConfig, TextureSlot};
use tilemaze_input::{Action, InputEvent, Key, map_event};
use tilemaze_kernel::NavigationState;
use tilemaze_render::{BatchRenderer, Camera2D, SceneComposer};
use tilemaze_render_wgpu::SpriteRenderer;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tilemaze-desktop", about = "Explore the maze with the arrow keys")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the six texture images
    #[arg(long, default_value = ".")]
    asset_dir: PathBuf,
}

/// Game state owned by the single loop thread.
struct AppState {
    config: AppConfig,
    nav: NavigationState,
    composer: SceneComposer,
    batch: BatchRenderer,
    camera: Camera2D,
    /// Pointer in [-1,1]², y up. Tracked, not yet used by the scene.
    pointer: Vec2,
    should_quit: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(config: AppConfig) -> Self {
        let camera = Camera2D::default().with_aspect(config.width, config.height);
        Self {
            nav: NavigationState::default(),
            composer: SceneComposer::reference(&camera),
            batch: BatchRenderer::new(),
            camera,
            pointer: Vec2::ZERO,
            should_quit: false,
            last_frame: Instant::now(),
            config,
        }
    }

    fn surface_size(&self) -> UVec2 {
        UVec2::new(self.config.width, self.config.height)
    }

    fn handle_input(&mut self, event: InputEvent) {
        match map_event(event, self.surface_size()) {
            Action::Move(dir) => {
                if self.nav.apply_move(dir) {
                    let at = self.nav.current_position();
                    tracing::debug!(
                        %at,
                        banner = ?self.composer.banner_for(at),
                        visited = self.nav.visited_count(),
                        "player moved"
                    );
                }
            }
            Action::Pointer(p) => self.pointer = p,
            Action::Quit => self.should_quit = true,
            Action::Noop => {}
        }
    }

    /// Seconds since the previous frame.
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

/// Window plus everything wgpu needs to present into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    sprites: SpriteRenderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig, images: &TextureImages) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("error creating window")?,
        );
        window.set_cursor_visible(false);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("error creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no GPU adapter can present to this window")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tilemaze_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("error creating GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        // Textures are uploaded as plain RGBA8; a non-sRGB target keeps the
        // bytes as authored.
        let surface_format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no supported formats")?;

        let present_mode = if caps.present_modes.contains(&wgpu::PresentMode::FifoRelaxed) {
            wgpu::PresentMode::FifoRelaxed
        } else {
            tracing::warn!("relaxed vsync unavailable, falling back to plain vsync");
            wgpu::PresentMode::Fifo
        };

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let sprites = SpriteRenderer::new(&device, &queue, surface_format, images)
            .context("error building sprite renderer")?;

        for slot in TextureSlot::ALL {
            let (width, height) = sprites.texture_size(slot);
            tracing::debug!(%slot, width, height, "texture bound");
        }
        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?sprites.surface_format(),
            ?present_mode,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            sprites,
        })
    }
}

struct GpuApp {
    state: AppState,
    images: TextureImages,
    gpu: Option<Gpu>,
    /// Startup failure raised inside the event loop, reported after it exits.
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: AppConfig, images: TextureImages) -> Self {
        Self {
            state: AppState::new(config),
            images,
            gpu: None,
            fatal: None,
        }
    }

    fn redraw(&mut self) {
        let dt = self.state.tick();
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.surface_config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let groups = self.state.composer.compose(&self.state.nav);
        let mut frame = gpu.sprites.begin_frame(&gpu.device, &gpu.queue, &view);
        let stats = self.state.batch.render(&mut frame, &groups, &self.state.camera);
        frame.finish();

        gpu.window.pre_present_notify();
        output.present();
        tracing::trace!(dt, draw_calls = stats.draw_calls, quads = stats.quads, "frame");
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.state.config, &self.images) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.state.handle_input(InputEvent::Quit),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.state.handle_input(InputEvent::KeyDown(map_key(code))),
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_input(InputEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => self.state.handle_input(InputEvent::ButtonDown),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    /// The event queue is drained: honour the quit flag, otherwise schedule
    /// the next frame.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.should_quit {
            tracing::info!("quit requested");
            event_loop.exit();
            return;
        }
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("tilemaze-desktop starting");

    let images = TextureImages::load_dir(&cli.asset_dir)
        .with_context(|| format!("failed to load textures from {}", cli.asset_dir.display()))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppConfig::default(), images);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.fatal.take() {
        return Err(err);
    }
    tracing::info!(
        visited = app.state.nav.visited_count(),
        pointer = ?app.state.pointer,
        "tilemaze-desktop exiting"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemaze_common::TileCoord;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(map_key(KeyCode::ArrowUp), Key::Up);
        assert_eq!(map_key(KeyCode::ArrowRight), Key::Right);
        assert_eq!(map_key(KeyCode::Escape), Key::Escape);
        assert_eq!(map_key(KeyCode::KeyW), Key::Other);
    }

    #[test]
    fn key_events_drive_navigation() {
        let mut state = AppState::new(AppConfig::default());
        state.handle_input(InputEvent::KeyDown(Key::Up));
        assert_eq!(state.nav.current_position(), TileCoord::new(2, 2));
        state.handle_input(InputEvent::KeyDown(Key::Other));
        assert_eq!(state.nav.current_position(), TileCoord::new(2, 2));
        assert!(!state.should_quit);
        state.handle_input(InputEvent::KeyDown(Key::Escape));
        assert!(state.should_quit);
    }

    #[test]
    fn pointer_is_tracked_normalized() {
        let mut state = AppState::new(AppConfig::default());
        state.handle_input(InputEvent::PointerMoved { x: 239.5, y: 239.5 });
        assert!(state.pointer.abs_diff_eq(Vec2::ZERO, 1e-6));
    }

    #[test]
    fn camera_corrected_for_window_aspect() {
        let state = AppState::new(AppConfig {
            width: 960,
            ..AppConfig::default()
        });
        assert_eq!(state.camera.half_extent, Vec2::new(20.0, 10.0));
    }
}
