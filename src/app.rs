//! The event loop.
//!
//! [`App`] implements winit's [`ApplicationHandler`]. Window events update
//! the [`AppState`] as they arrive; every `RedrawRequested` is one frame:
//! measure the delta time, apply held keys, draw, present.
//!
//! Startup work that needs a window (surface, device, textures) happens in
//! `resumed`. A failure there is logged, kept, and returned from [`run`]
//! once the loop has exited.

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    context::Context,
    input::{self, InputOutcome},
    render::SceneRenderer,
    scene::reference_scene,
    settings::Settings,
    state::AppState,
};

/// Everything that only exists once a window is open.
#[derive(Debug)]
struct Graphics {
    ctx: Context,
    renderer: SceneRenderer,
}

impl Graphics {
    async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let ctx = Context::new(window, settings).await?;
        let renderer = SceneRenderer::load(&ctx, settings, reference_scene()).await?;
        Ok(Self { ctx, renderer })
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    settings: Settings,
    state: AppState,
    graphics: Option<Graphics>,
    startup_error: Option<anyhow::Error>,
    last_time: Instant,
}

impl App {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            state: AppState::new(&settings),
            settings,
            graphics: None,
            startup_error: None,
            last_time: Instant::now(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        let now = Instant::now();
        self.state.frame.delta_time = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;

        if input::process_input(&mut self.state) == InputOutcome::Exit {
            log::info!("Escape pressed, closing");
            event_loop.exit();
            return;
        }

        match graphics.renderer.render(&graphics.ctx, &self.state) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                graphics.ctx.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory while acquiring a frame");
                event_loop.exit();
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.startup_error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.state.resize(size.width, size.height);

        match self
            .async_runtime
            .block_on(Graphics::new(window, &self.settings))
        {
            Ok(graphics) => {
                log::info!("Window and context initialised");
                graphics.ctx.window().request_redraw();
                self.graphics = Some(graphics);
                self.last_time = Instant::now();
            }
            Err(e) => {
                log::error!("Startup failed: {:#}", e);
                self.startup_error = Some(e);
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
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.state.resize(size.width, size.height);
                if let Some(graphics) = &mut self.graphics {
                    graphics.ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.state.keys.set(code, state),
            WindowEvent::Focused(focused) => {
                if focused {
                    self.state.cursor.reset();
                } else {
                    self.state.keys.clear();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                input::handle_cursor_moved(&mut self.state, position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => input::handle_scroll(&mut self.state, delta),
            WindowEvent::MouseInput { state, button, .. } => {
                input::report_mouse_button(button, state);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &mut self.graphics {
            graphics.renderer.destroy();
        }
    }
}

/// Open the window and run until it is closed or Escape is pressed.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings)?;
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
