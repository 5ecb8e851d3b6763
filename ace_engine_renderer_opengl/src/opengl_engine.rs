/// OpenGL engine: window, context and event loop bootstrap
///
/// `OpenGlEngine` owns everything an exercise needs from the platform: the
/// winit event loop and window, the glutin context and surface, the
/// [`OpenGlDevice`] and the explicit window/input state. Events are pumped
/// without blocking from the exercise's own render loop.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ace_engine::ace::graphics::GraphicsDevice;
use ace_engine::ace::log::{FileLogger, LogBridge};
use ace_engine::ace::platform::{EngineConfig, EngineStatus, InputState, WindowState};
use ace_engine::ace::screenshot::{screenshot_file_name, unix_time_now, write_screenshot_png};
use ace_engine::ace::{Engine, Error, Result};
use ace_engine::{engine_bail, engine_error, engine_info, engine_warn};
use glutin::config::{Config, ConfigTemplateBuilder};
use glow::HasContext;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use crate::gl_debug;
use crate::opengl_device::OpenGlDevice;

const LOG_SOURCE: &str = "ace::Engine";

/// Requested context version (the highest macOS provides)
pub const GL_VERSION_MAJOR: u8 = 4;
pub const GL_VERSION_MINOR: u8 = 1;

/// Everything created by a successful `init`, released together.
///
/// Fields drop in declaration order: GL objects before the surface, the
/// surface before the context, the window before its event loop.
struct GpuContext {
    device: Rc<OpenGlDevice>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    event_loop: EventLoop<()>,
}

/// Window + OpenGL context owner
///
/// # Example
///
/// ```no_run
/// use ace_engine::ace::platform::EngineConfig;
/// use ace_engine_renderer_opengl::ace::OpenGlEngine;
///
/// let mut engine = OpenGlEngine::new();
/// engine.init(EngineConfig::default())?;
/// while !engine.should_close() {
///     engine.swap_buffers()?;
///     engine.poll_events();
/// }
/// # Ok::<(), ace_engine::ace::Error>(())
/// ```
pub struct OpenGlEngine {
    status: EngineStatus,
    gpu: Option<GpuContext>,
    window_state: WindowState,
    input: InputState,
    should_close: bool,
    start_time: Instant,
}

impl OpenGlEngine {
    /// Uninitialized engine; call [`OpenGlEngine::init`] before anything else
    pub fn new() -> Self {
        Self {
            status: EngineStatus::Uninitialized,
            gpu: None,
            window_state: WindowState::default(),
            input: InputState::new(),
            should_close: false,
            start_time: Instant::now(),
        }
    }

    // ===== LIFECYCLE =====

    /// Restart the log, create the window and an OpenGL 4.1 core context.
    ///
    /// A failure at any step returns the error and leaves the engine
    /// `Uninitialized` with nothing retained. Calling `init` on an
    /// initialized engine logs a warning and does nothing.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if the log file cannot be restarted
    /// - `Error::InitializationFailed` for event loop, window, context,
    ///   surface or function loading failures
    pub fn init(&mut self, config: EngineConfig) -> Result<()> {
        if self.status == EngineStatus::Initialized {
            engine_warn!(LOG_SOURCE, "Engine already initialized, ignoring init()");
            return Ok(());
        }

        let logger = FileLogger::restart(&config.log_path)?.with_console_level(config.console_log_level);
        Engine::set_logger(logger);
        // Only the first engine of the process installs the bridge
        let _ = LogBridge::install(::log::LevelFilter::Warn);

        engine_info!(LOG_SOURCE, "Starting AceEngine");
        engine_info!(
            LOG_SOURCE,
            "Setting OpenGL version hints: {}.{} core profile",
            GL_VERSION_MAJOR,
            GL_VERSION_MINOR
        );
        engine_info!(LOG_SOURCE, "Requesting OpenGL debug context");
        if config.msaa_samples > 0 {
            engine_info!(LOG_SOURCE, "Anti-aliasing set to {}x MSAA", config.msaa_samples);
        }
        engine_info!(LOG_SOURCE, "Requesting sRGB capable framebuffer");

        let gpu = create_gpu_context(&config)?;

        let device = gpu.device.as_ref();
        engine_info!(LOG_SOURCE, "Renderer: {}", device.renderer());
        engine_info!(LOG_SOURCE, "OpenGL version: {}", device.version());
        device.log_params();

        device.set_framebuffer_srgb(true);
        engine_info!(LOG_SOURCE, "sRGB gamma correction: ENABLED");
        if config.msaa_samples > 0 {
            device.set_multisample(true);
        }

        let framebuffer = gpu.window.inner_size();
        let window: LogicalSize<u32> = framebuffer.to_logical(gpu.window.scale_factor());
        let mut window_state = WindowState::new(window.width, window.height, config.title.clone());
        window_state.set_framebuffer_size(framebuffer.width, framebuffer.height);
        device.viewport(0, 0, framebuffer.width as i32, framebuffer.height as i32);
        engine_info!(
            LOG_SOURCE,
            "Initial framebuffer size: {}x{}",
            framebuffer.width,
            framebuffer.height
        );

        self.gpu = Some(gpu);
        self.window_state = window_state;
        self.input = InputState::new();
        self.should_close = false;
        self.start_time = Instant::now();
        self.status = EngineStatus::Initialized;

        engine_info!(LOG_SOURCE, "Engine initialized successfully");
        Ok(())
    }

    /// Release the context and window. No-op unless initialized.
    pub fn shutdown(&mut self) {
        if self.status != EngineStatus::Initialized {
            return;
        }

        engine_info!(LOG_SOURCE, "Shutting down engine");

        let stats = gl_debug::get_gl_error_stats();
        if stats.total_errors() > 0 || stats.total_debug_messages() > 0 {
            gl_debug::print_gl_error_report();
        }

        self.gpu = None;
        self.input.release_all();
        self.status = EngineStatus::Shutdown;
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.status == EngineStatus::Initialized
    }

    // ===== ACCESSORS =====

    fn gpu(&self) -> Result<&GpuContext> {
        self.gpu.as_ref().ok_or_else(|| {
            Error::InitializationFailed("Engine not initialized. Call OpenGlEngine::init() first.".to_string())
        })
    }

    /// OpenGL device of the current context
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` if the engine is not initialized
    pub fn device(&self) -> Result<Rc<OpenGlDevice>> {
        Ok(self.gpu()?.device.clone())
    }

    /// Same device behind the backend-agnostic trait
    pub fn graphics_device(&self) -> Result<Rc<dyn GraphicsDevice>> {
        let device: Rc<dyn GraphicsDevice> = self.device()?;
        Ok(device)
    }

    pub fn window_state(&self) -> &WindowState {
        &self.window_state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The winit window, if initialized
    pub fn window(&self) -> Option<&Window> {
        self.gpu.as_ref().map(|gpu| &gpu.window)
    }

    // ===== RENDER LOOP =====

    /// Dispatch pending window events without blocking.
    ///
    /// Starts a new input frame first, so edge queries on [`InputState`]
    /// compare against the state seen by the previous call.
    pub fn poll_events(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        self.input.end_frame();

        let mut pump = EventPump {
            window: &gpu.window,
            device: gpu.device.as_ref(),
            gl_surface: &gpu.gl_surface,
            gl_context: &gpu.gl_context,
            window_state: &mut self.window_state,
            input: &mut self.input,
            close_requested: &mut self.should_close,
        };

        if let PumpStatus::Exit(code) = gpu.event_loop.pump_app_events(Some(Duration::ZERO), &mut pump) {
            engine_info!(LOG_SOURCE, "Event loop exited with code {}", code);
            self.should_close = true;
        }
    }

    /// Present the back buffer
    ///
    /// # Errors
    ///
    /// `Error::BackendError` if the surface rejects the swap
    pub fn swap_buffers(&self) -> Result<()> {
        let gpu = self.gpu()?;
        if let Err(e) = gpu.gl_surface.swap_buffers(&gpu.gl_context) {
            engine_bail!(LOG_SOURCE, "swap_buffers failed: {}", e);
        }
        Ok(())
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window.set_title(title);
        }
        self.window_state.title = title.to_string();
    }

    /// Seconds since `init`
    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Save the framebuffer as `<name>.png`, or `screenshot_<unix time>.png`.
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` if not initialized, `Error::ImageLoad`
    /// or `Error::Io` if the file cannot be written.
    pub fn take_screenshot(&self, name: Option<&str>) -> Result<PathBuf> {
        let gpu = self.gpu()?;
        let width = self.window_state.framebuffer_width;
        let height = self.window_state.framebuffer_height;

        let path = screenshot_file_name(name, unix_time_now());
        engine_info!(LOG_SOURCE, "Taking screenshot: {}", path.display());

        let pixels = gpu.device.read_pixels_rgb(0, 0, width as i32, height as i32);
        if let Err(e) = write_screenshot_png(&path, width, height, &pixels) {
            engine_error!(LOG_SOURCE, "Could not write screenshot file {}: {}", path.display(), e);
            return Err(e);
        }

        engine_info!(LOG_SOURCE, "Screenshot saved: {} ({}x{})", path.display(), width, height);
        Ok(path)
    }
}

impl Default for OpenGlEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OpenGlEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ===== CONTEXT CREATION =====

fn init_failed(what: &str, error: impl std::fmt::Display) -> Error {
    let message = format!("{}: {}", what, error);
    engine_error!(LOG_SOURCE, "ERROR: {}", message);
    Error::InitializationFailed(message)
}

/// Ranking key for a framebuffer config: sRGB first, then the sample count
/// closest to `requested` without exceeding it.
pub(crate) fn config_rank(srgb_capable: bool, samples: u8, requested: u8) -> (bool, bool, u8) {
    let fits = samples <= requested;
    let closeness = if fits { samples } else { u8::MAX - samples };
    (srgb_capable, fits, closeness)
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>, requested_samples: u8) -> Config {
    configs
        .max_by_key(|config| config_rank(config.srgb_capable(), config.num_samples(), requested_samples))
        .expect("glutin reported a display without any framebuffer config")
}

fn create_gpu_context(config: &EngineConfig) -> Result<GpuContext> {
    let event_loop = EventLoop::new().map_err(|e| init_failed("could not start the event loop", e))?;

    let mut window_attributes = Window::default_attributes().with_title(config.title.clone());
    window_attributes = if config.fullscreen {
        window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        window_attributes.with_inner_size(LogicalSize::new(config.width, config.height))
    };

    let mut template = ConfigTemplateBuilder::new().with_alpha_size(8);
    if config.msaa_samples > 0 {
        template = template.with_multisampling(config.msaa_samples);
    }

    let requested_samples = config.msaa_samples;
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(window_attributes))
        .build(&event_loop, template, |configs| pick_config(configs, requested_samples))
        .map_err(|e| init_failed("could not create window", e))?;
    let window = window.ok_or_else(|| init_failed("could not create window", "no window returned"))?;

    let size: LogicalSize<u32> = window.inner_size().to_logical(window.scale_factor());
    if config.fullscreen {
        engine_info!(LOG_SOURCE, "Created fullscreen window: {}x{} - {}", size.width, size.height, config.title);
    } else {
        engine_info!(LOG_SOURCE, "Created windowed mode: {}x{} - {}", size.width, size.height, config.title);
    }
    engine_info!(
        LOG_SOURCE,
        "Framebuffer config: {} samples, sRGB {}",
        gl_config.num_samples(),
        gl_config.srgb_capable()
    );

    let raw_window_handle = window
        .window_handle()
        .map(|handle| handle.as_raw())
        .map_err(|e| init_failed("could not get window handle", e))?;

    let gl_display = gl_config.display();
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(GL_VERSION_MAJOR, GL_VERSION_MINOR))))
        .with_profile(GlProfile::Core)
        .with_debug(true)
        .build(Some(raw_window_handle));

    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .map_err(|e| init_failed("could not create OpenGL context", e))?;

    let surface_attributes = window
        .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new().with_srgb(Some(true)))
        .map_err(|e| init_failed("could not describe window surface", e))?;
    let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
        .map_err(|e| init_failed("could not create window surface", e))?;

    let gl_context = not_current
        .make_current(&gl_surface)
        .map_err(|e| init_failed("could not make the context current", e))?;

    let interval = if config.vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
        engine_warn!(LOG_SOURCE, "Could not set swap interval: {}", e);
    }

    let mut gl = unsafe {
        glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol).cast())
    };
    let version = gl.version();
    if version.major == 0 {
        return Err(init_failed("Failed to load OpenGL function pointers", "no GL version reported"));
    }

    gl_debug::init_debug_output(&mut gl);

    Ok(GpuContext {
        device: Rc::new(OpenGlDevice::new(gl)),
        gl_surface,
        gl_context,
        window,
        event_loop,
    })
}

// ===== EVENT HANDLING =====

/// Borrowed engine state for one `pump_app_events` call
struct EventPump<'a> {
    window: &'a Window,
    device: &'a OpenGlDevice,
    gl_surface: &'a Surface<WindowSurface>,
    gl_context: &'a PossiblyCurrentContext,
    window_state: &'a mut WindowState,
    input: &'a mut InputState,
    close_requested: &'a mut bool,
}

impl EventPump<'_> {
    fn resize(&mut self, size: PhysicalSize<u32>) {
        let window: LogicalSize<u32> = size.to_logical(self.window.scale_factor());
        if self.window_state.set_window_size(window.width, window.height) {
            engine_info!(LOG_SOURCE, "Window resized to {}x{}", window.width, window.height);
        }

        if self.window_state.set_framebuffer_size(size.width, size.height) {
            if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                self.gl_surface.resize(self.gl_context, width, height);
            }
            self.device.viewport(0, 0, size.width as i32, size.height as i32);
            engine_info!(LOG_SOURCE, "Framebuffer resized to {}x{}", size.width, size.height);
        }
    }
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                engine_info!(LOG_SOURCE, "Close requested");
                *self.close_requested = true;
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.input.press_key(key),
                        ElementState::Released => self.input.release_key(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.input.press_mouse(button),
                ElementState::Released => self.input.release_mouse(button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_cursor_position(position.x, position.y);
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "opengl_engine_tests.rs"]
mod tests;
