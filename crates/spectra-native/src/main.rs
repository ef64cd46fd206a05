mod audio;
mod cli;
mod constants;
mod input;
mod render;
mod stream;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use audio::{SampleTap, SpectrumAnalyser};
use cli::Args;
use constants::{MAX_FRAME_DT_SEC, TAP_CAPACITY, WINDOW_TITLE};
use input::{wheel_delta_px, PointerState, Press};
use render::GpuState;
use spectra_core::{AudioSource, FrameStatus, Viewport, Visualizer};

struct AudioInput {
    analyser: SpectrumAnalyser,
    _stream: cpal::Stream,
}

/// Start the audio collaborator. A file that cannot be played is fatal; a
/// missing capture device only leaves the visualizer idle.
fn start_audio(input: Option<&Path>) -> anyhow::Result<Option<AudioInput>> {
    let tap = SampleTap::new(TAP_CAPACITY);
    let stream = match input {
        Some(path) => stream::start_playback(path, tap.clone())?,
        None => match stream::start_capture(tap.clone()) {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("audio capture unavailable ({e:#}); rendering idle frames");
                return Ok(None);
            }
        },
    };
    Ok(Some(AudioInput {
        analyser: SpectrumAnalyser::new(tap),
        _stream: stream,
    }))
}

struct App {
    viz: Visualizer,
    audio: Option<AudioInput>,
    pointer: PointerState,
    params_path: Option<PathBuf>,
    started: Instant,
    last_frame: Instant,
}

impl App {
    /// Pull this frame's spectrum and advance the engine.
    fn frame(&mut self) -> FrameStatus {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_frame = now;

        let spectrum = match self.audio.as_mut() {
            Some(input) => {
                if let Some(settings) = self.viz.take_analyser_settings() {
                    input.analyser.apply_settings(settings);
                    log::debug!("analyser settings {:?}", input.analyser.settings());
                }
                Some(input.analyser.frequency_magnitudes())
            }
            None => None,
        };
        self.viz.update(dt, spectrum)
    }

    fn save_params(&self) {
        let Some(path) = &self.params_path else {
            return;
        };
        if let Err(e) = cli::save_params(path, self.viz.params()) {
            log::error!("{e:#}");
        }
    }

    fn mouse_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                let now = self.started.elapsed().as_secs_f32();
                match self.pointer.press(now) {
                    Press::Double => self.viz.reset_view(),
                    Press::Single => self.viz.pointer_down(self.pointer.x, self.pointer.y),
                }
            }
            ElementState::Released => {
                self.pointer.release();
                self.viz.pointer_up();
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    if args.list_params {
        print!("{}", cli::param_listing());
        return Ok(());
    }
    let params = args.initial_params()?;
    let audio = start_audio(args.input.as_deref())?;

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(winit::dpi::PhysicalSize::new(args.width, args.height))
        .build(&event_loop)
        .context("window")?;
    let size = window.inner_size();

    let mut state = pollster::block_on(GpuState::new(&window)).context("gpu")?;
    let now = Instant::now();
    let mut app = App {
        viz: Visualizer::new(
            params,
            Viewport {
                width: size.width.max(1),
                height: size.height.max(1),
            },
            args.seed,
        ),
        audio,
        pointer: PointerState::default(),
        params_path: args.params.clone(),
        started: now,
        last_frame: now,
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                state.resize(size);
                app.viz.resize(size.width, size.height);
            }
            WindowEvent::CloseRequested => {
                app.save_params();
                elwt.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => {
                    app.save_params();
                    elwt.exit();
                }
                Key::Character(c) if c.eq_ignore_ascii_case("r") => app.viz.reset_view(),
                Key::Character(c) if c.eq_ignore_ascii_case("s") => app.save_params(),
                _ => {}
            },
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => app.mouse_button(button_state),
            WindowEvent::CursorMoved { position, .. } => {
                app.pointer.moved(position.x as f32, position.y as f32);
                if app.pointer.down {
                    app.viz.pointer_move(app.pointer.x, app.pointer.y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => app.viz.wheel(wheel_delta_px(delta)),
            _ => {}
        },
        Event::AboutToWait => {
            let status = app.frame();
            match state.render(&app.viz, status) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::error!("frame skipped: {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
