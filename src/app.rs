use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::error::AppError;
use crate::gpu::GpuContext;
use crate::math::Vec3;
use crate::model::{LoadOptions, Model};
use crate::render::Renderer;
use crate::shader::Shader;
use crate::transform::Transform;

/// Edge length of the procedural cube.
const CUBE_SIZE: f32 = 2.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// What the app puts in front of the camera.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelSource {
    /// A `.gltf` or `.glb` file.
    Gltf(PathBuf),
    /// A procedural cube; needs no asset files.
    Cube,
}

/// Configuration for the app window and scene.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub model: ModelSource,
    pub load_options: LoadOptions,
    pub orthographic: bool,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Radians per second added to the model's X and Y angles.
    pub spin_speed: f32,
    pub vsync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Spinview".to_string(),
            width: 800,
            height: 600,
            vertex_shader: PathBuf::from("assets/def_vs.wgsl"),
            fragment_shader: PathBuf::from("assets/def_fs.wgsl"),
            model: ModelSource::Cube,
            load_options: LoadOptions::default(),
            orthographic: false,
            fov: 45.0,
            spin_speed: 1.0,
            vsync: true,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn shaders(mut self, vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    /// Loads the model from a glTF file instead of the procedural cube.
    pub fn model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model = ModelSource::Gltf(path.into());
        self
    }

    pub fn cube(mut self) -> Self {
        self.model = ModelSource::Cube;
        self
    }

    pub fn load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }

    pub fn orthographic(mut self, orthographic: bool) -> Self {
        self.orthographic = orthographic;
        self
    }

    pub fn fov(mut self, degrees: f32) -> Self {
        self.fov = degrees;
        self
    }

    pub fn spin_speed(mut self, radians_per_second: f32) -> Self {
        self.spin_speed = radians_per_second;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    fn camera(&self) -> Camera {
        let camera = if self.orthographic {
            Camera::orthographic(NEAR, FAR)
        } else {
            Camera::perspective(self.fov, NEAR, FAR)
        };
        camera.at(Vec3::new(0.0, 0.0, -10.0))
    }
}

/// Frame timing: delta per frame, total elapsed and a once-a-second FPS count.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Marks the start of a frame and returns seconds since the previous one.
    pub fn tick(&mut self) -> f32 {
        let dt = self.tick_at(Instant::now());
        if self.window_frames == 0 {
            log::debug!("{:.0} fps", self.fps);
        }
        dt
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.window_frames += 1;
        let window = now.duration_since(self.window_start).as_secs_f32();
        if window >= 1.0 {
            self.fps = self.window_frames as f32 / window;
            self.window_frames = 0;
            self.window_start = now;
        }

        dt
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.last_frame.duration_since(self.start).as_secs_f32()
    }

    /// Frames per second over the last full second; zero until one has passed.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a running app owns, passed explicitly to update and render.
pub struct AppContext {
    pub window: Arc<Window>,
    pub gpu: GpuContext,
    pub renderer: Renderer,
    pub camera: Camera,
    pub clock: FrameClock,
    pub models: Vec<Model>,
    pub spin_speed: f32,
}

impl AppContext {
    /// Opens the window and loads the configured shader and model.
    pub fn new(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self, AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone(), config.vsync)?;
        let renderer = Renderer::new(&gpu);

        let shader = Rc::new(Shader::load(
            &gpu,
            &renderer,
            &config.vertex_shader,
            &config.fragment_shader,
        )?);

        let model = match &config.model {
            ModelSource::Gltf(path) => {
                let model = Model::load_with(&gpu, path, shader, config.load_options)?;
                log::info!(
                    "loaded {} ({} primitive(s), {} indices)",
                    path.display(),
                    model.primitives().len(),
                    model.index_count()
                );
                model
            }
            ModelSource::Cube => Model::cube(&gpu, CUBE_SIZE, shader),
        };

        Ok(Self {
            window,
            gpu,
            renderer,
            camera: config.camera(),
            clock: FrameClock::new(),
            models: vec![model],
            spin_speed: config.spin_speed,
        })
    }

    /// Advances the scene by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.camera.update(self.gpu.viewport());
        for model in &mut self.models {
            spin(&mut model.transform, self.spin_speed, dt);
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let models: Vec<&Model> = self.models.iter().collect();
        self.renderer.render(&self.gpu, &self.camera, &models)
    }

    /// One iteration of the frame loop: tick, update, render.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn frame(&mut self) -> Result<(), AppError> {
        let dt = self.clock.tick();
        self.update(dt);

        match self.render() {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.gpu.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(AppError::SurfaceOutOfMemory),
            Err(err) => {
                log::warn!("skipping frame: {err}");
                Ok(())
            }
        }
    }
}

fn spin(transform: &mut Transform, speed: f32, dt: f32) {
    transform.angles.x += speed * dt;
    transform.angles.y += speed * dt;
}

enum SpinviewApp {
    Pending(AppConfig),
    Running(Box<AppContext>),
    Exited(Option<AppError>),
}

impl ApplicationHandler for SpinviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let SpinviewApp::Pending(config) = self else {
            return;
        };

        match AppContext::new(event_loop, config) {
            Ok(ctx) => {
                ctx.window.request_redraw();
                *self = SpinviewApp::Running(Box::new(ctx));
            }
            Err(err) => {
                *self = SpinviewApp::Exited(Some(err));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let SpinviewApp::Running(ctx) = self else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                ctx.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = ctx.frame() {
                    *self = SpinviewApp::Exited(Some(err));
                    event_loop.exit();
                    return;
                }
                ctx.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Opens a window and spins the configured model until it is closed.
///
/// Returns the first error hit during startup or rendering; the binary turns
/// it into the process exit status.
///
/// # Example
/// ```no_run
/// spinview::run(spinview::AppConfig::new().title("Duck").model("assets/duck.glb"))?;
/// # Ok::<(), spinview::AppError>(())
/// ```
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SpinviewApp::Pending(config);
    event_loop.run_app(&mut app)?;

    match app {
        SpinviewApp::Exited(Some(err)) => Err(err),
        _ => Ok(()),
    }
}
