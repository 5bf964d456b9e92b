use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use glyph_glow::app::{
    map_keycode, parse_held_keys, print_final_state, print_scene_summary, simulate,
};
use glyph_glow::{
    BlockFont, GlyphMesher, InputState, KeyCode, NamedKey, ObjGlyphLibrary, Renderer, Scene,
    SceneConfig,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse(env::args().skip(1))?;
    let config = match &options.path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => SceneConfig::default(),
    };

    let glyphs: Box<dyn GlyphMesher> = match &config.font {
        Some(root) => {
            info!("loading glyph meshes from {}", root.display());
            Box::new(ObjGlyphLibrary::new(root))
        }
        None => Box::new(BlockFont),
    };
    let scene = Scene::build(&config, &*glyphs).context("failed to build scene")?;
    print_scene_summary(&scene, config.ambient_intensity());

    let input = Arc::new(InputState::new());
    for key in parse_held_keys(&options.hold)? {
        input.set_key_down(key);
    }

    if options.summary_only {
        return run_headless(scene, &input, options.frames);
    }

    let fallback = scene.clone();
    match run_interactive(scene, Arc::clone(&input)) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            run_headless(fallback, &input, options.frames)
        }
        Err(err) => Err(err),
    }
}

fn run_headless(mut scene: Scene, input: &InputState, frames: u32) -> Result<()> {
    simulate(&mut scene, input, frames);
    print_final_state(&scene);
    Ok(())
}

fn run_interactive(mut scene: Scene, input: Arc<InputState>) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| WindowInitError::from_error("event loop", err))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("glyph-glow")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let size = window.inner_size();
    scene.resize(size.width, size.height);
    let renderer = block_on(Renderer::new(Arc::clone(&window), &scene))?;

    let mut app = AppState {
        renderer,
        scene,
        input,
        last_error: None,
    };

    event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        if let Err(err) = app.process_event(&event, elwt) {
            app.last_error = Some(err);
            elwt.exit();
        }
    })?;

    print_final_state(&app.scene);

    if let Some(err) = app.last_error {
        return Err(err);
    }

    Ok(())
}

struct AppState {
    renderer: Renderer,
    scene: Scene,
    input: Arc<InputState>,
    last_error: Option<anyhow::Error>,
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                        self.scene.resize(size.width, size.height);
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = self.renderer.window().inner_size();
                        self.renderer.resize(size);
                        self.scene.resize(size.width, size.height);
                    }
                    WindowEvent::Focused(false) => self.input.clear(),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if self.handle_keyboard(event) {
                            elwt.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => self.redraw()?,
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    /// One animation step followed by one render.
    fn redraw(&mut self) -> Result<()> {
        let controls = self.input.controls(&self.scene.bindings);
        self.scene.step(&controls);
        if controls.any() {
            debug!(
                "frame {}: cube {:?}, camera {:?}",
                self.scene.animation.frame,
                self.scene.animation.cube_position,
                self.scene.animation.camera_position
            );
        }

        self.renderer.update(&self.scene);
        match self.renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.renderer.size();
                self.renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            Err(other) => {
                warn!("surface error {other:?}; retrying next frame");
            }
        }
        Ok(())
    }

    /// Returns true when the key asks the loop to exit.
    fn handle_keyboard(&self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };
        let Some(keycode) = map_keycode(code) else {
            return false;
        };
        match event.state {
            ElementState::Pressed => {
                if keycode == KeyCode::Named(NamedKey::Escape) {
                    return true;
                }
                self.input.set_key_down(keycode);
            }
            ElementState::Released => self.input.set_key_up(keycode),
        }
        false
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    path: Option<PathBuf>,
    summary_only: bool,
    frames: u32,
    hold: String,
}

impl CliOptions {
    const USAGE: &'static str =
        "Usage: glyph-glow [scene.xml] [--summary-only] [--frames N] [--hold KEYS]";

    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary-only" => options.summary_only = true,
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames needs a value. {}", Self::USAGE))?;
                    options.frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count `{value}`"))?;
                }
                "--hold" => {
                    options.hold = args
                        .next()
                        .ok_or_else(|| anyhow!("--hold needs a value. {}", Self::USAGE))?;
                }
                "-h" | "--help" => return Err(anyhow!(Self::USAGE)),
                other if other.starts_with("--") => {
                    return Err(anyhow!("Unknown argument: {other}. {}", Self::USAGE));
                }
                path if options.path.is_none() => options.path = Some(PathBuf::from(path)),
                extra => {
                    return Err(anyhow!("Unexpected argument: {extra}. {}", Self::USAGE));
                }
            }
        }
        Ok(options)
    }
}
