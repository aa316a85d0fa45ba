use std::time::Instant;

use anyhow::{anyhow, Result};
use glium::glutin::event::{Event, StartCause, WindowEvent};
use glium::glutin::event_loop::{ControlFlow, EventLoop};
use glium::glutin::window::{CursorGrabMode, WindowBuilder};
use glium::glutin::{Api, ContextBuilder, GlProfile, GlRequest};
use glium::{Display, Surface, SwapBuffersError};
use log::{error, info, warn};

use crate::camera::Camera;
use crate::config::Config;
use crate::float::*;
use crate::input::{Action, InputState};
use crate::quad::QuadRenderer;
use crate::screenshot;
use crate::shader::ShaderSet;
use crate::stats::FrameStats;
use crate::tracer::Tracer;

/// Everything that lives for the duration of the window
struct App {
    config: Config,
    display: Display,
    shaders: ShaderSet,
    tracer: Tracer,
    quad: QuadRenderer,
    camera: Camera,
    input: InputState,
    stats: FrameStats,
    last_frame: Instant,
}

fn create_display(config: &Config, event_loop: &EventLoop<()>) -> Result<Display> {
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(config.dimensions());
    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (4, 3)))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(config.vsync);
    let display = Display::new(window, context, event_loop)
        .map_err(|err| anyhow!("Failed to create display: {}", err))?;
    info!("OpenGL {}", display.get_opengl_version_string());
    Ok(display)
}

/// Hide the cursor and keep it inside the window so that mouse motion drives the camera
fn grab_cursor(display: &Display) {
    let gl_window = display.gl_window();
    let window = gl_window.window();
    let grab = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(err) = grab {
        warn!("Failed to grab the cursor: {}", err);
    }
    window.set_cursor_visible(false);
}

impl App {
    fn new(config: Config, display: Display) -> Result<App> {
        let shaders = ShaderSet::new(&display, &config)?;
        let tracer = Tracer::new(&display, &config)?;
        let quad = QuadRenderer::new(&display)?;
        let camera = Camera::new(&config);
        grab_cursor(&display);
        Ok(App {
            config,
            display,
            shaders,
            tracer,
            quad,
            camera,
            input: InputState::new(),
            stats: FrameStats::new(),
            last_frame: Instant::now(),
        })
    }

    fn handle_action(&mut self, action: Action, control_flow: &mut ControlFlow) {
        match action {
            Action::Quit => *control_flow = ControlFlow::Exit,
            Action::Faster => {
                self.camera.faster();
                info!("Speed: {}", self.camera.speed());
            }
            Action::Slower => {
                self.camera.slower();
                info!("Speed: {}", self.camera.speed());
            }
            Action::PrintCamera => {
                let (phi, psi) = self.camera.angles();
                info!(
                    "Camera at {:?} looking {:?} (phi {:.1}, psi {:.1})",
                    self.camera.eye,
                    self.camera.dir(),
                    phi.0,
                    psi.0
                );
            }
            Action::ReloadShaders => self.shaders.reload(&self.display, &self.config),
            Action::Screenshot => {
                match screenshot::save(self.tracer.image(), &self.config.screenshot_dir) {
                    Ok(path) => info!("Saved screenshot {}", path.display()),
                    Err(err) => error!("Screenshot failed: {:#}", err),
                }
            }
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent<'_>, control_flow: &mut ControlFlow) {
        match *event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::Focused(true) => grab_cursor(&self.display),
            _ => (),
        }
        if let Some(action) = self.input.update_window(event).and_then(Action::from_key) {
            self.handle_action(action, control_flow);
        }
    }

    /// Move the camera for dt seconds with the held keys
    fn move_camera(&mut self, dt: Float) {
        for movement in self.input.movements() {
            self.camera.advance(movement, dt);
        }
    }

    /// Trace and present one frame. Returns false if the context was lost.
    fn draw(&mut self) -> bool {
        let mut target = self.display.draw();
        let (r, g, b, a) = self.config.clear_color;
        target.clear_color(r, g, b, a);

        self.tracer.trace(&self.shaders.compute, &self.camera.uniforms());
        if let Err(err) = self
            .quad
            .render(&mut target, &self.shaders.render, self.tracer.sampled())
        {
            error!("Failed to draw the trace image: {}", err);
        }

        match target.finish() {
            Ok(()) => true,
            Err(SwapBuffersError::ContextLost) => {
                error!("OpenGL context lost");
                false
            }
            Err(err) => {
                error!("Failed to swap buffers: {:?}", err);
                true
            }
        }
    }

    fn frame(&mut self, control_flow: &mut ControlFlow) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        self.stats.record(dt);

        self.move_camera(dt.as_secs_f64().to_float());
        if !self.draw() {
            *control_flow = ControlFlow::Exit;
        }
    }

    fn handle_event(&mut self, event: Event<'_, ()>, control_flow: &mut ControlFlow) {
        match event {
            Event::NewEvents(StartCause::Init) => {
                *control_flow = ControlFlow::Poll;
                self.last_frame = Instant::now();
            }
            Event::WindowEvent { event, .. } => self.handle_window_event(&event, control_flow),
            Event::DeviceEvent { event, .. } => {
                // Pitch is clamped after every motion event
                if let Some((dx, dy)) = self.input.update_device(&event) {
                    self.camera.look(dx, dy);
                }
            }
            Event::MainEventsCleared => self.frame(control_flow),
            Event::LoopDestroyed => self.stats.print(),
            _ => (),
        }
    }
}

/// Open the window and run the trace loop until the window is closed
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new();
    let display = create_display(&config, &event_loop)?;
    let mut app = App::new(config, display)?;
    info!("Escape quits, arrows change speed, R reloads shaders, C prints the camera, F12 saves a screenshot");

    event_loop.run(move |event, _, control_flow| app.handle_event(event, control_flow))
}
