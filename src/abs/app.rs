//! SDL2 and OpenGL window management.
//!
//! This module defines the [`Display`] trait the main loop talks to and the
//! [`App`] struct which implements it with an SDL2 window and an OpenGL
//! context.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glow::HasContext;
use log::{debug, info, warn};
use sdl2::event::{Event, WindowEvent};

use super::gl::GraphicsApi;
use crate::asset::DisplaySettings;
use crate::error::{Error, Result};

/// A window with a rendering surface.
pub trait Display {
    type Gl: GraphicsApi;

    /// The graphics context rendering into this display.
    fn gl(&self) -> &Arc<Self::Gl>;

    /// Whether the user has asked for the window to close.
    fn is_close_requested(&self) -> bool;

    /// Presents the rendered frame, waits out the rest of the frame time and
    /// processes pending window events.
    fn update(&mut self);

    /// Closes the window and destroys the rendering surface.
    fn close(self);
}

/// Sleeps so that frames are no closer together than `1 / fps` seconds.
struct FrameLimiter {
    frame_time: Option<Duration>,
    last_frame: Instant,
}

impl FrameLimiter {
    fn new(fps: u32) -> Self {
        Self {
            frame_time: (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64)),
            last_frame: Instant::now(),
        }
    }

    fn sync(&mut self) {
        if let Some(frame_time) = self.frame_time {
            let elapsed = self.last_frame.elapsed();
            if elapsed < frame_time {
                std::thread::sleep(frame_time - elapsed);
            }
        }
        self.last_frame = Instant::now();
    }
}

/// The [`App`] struct encapsulates the SDL2 window and OpenGL context.
pub struct App {
    pub gl: Arc<glow::Context>,
    pub gl_context: sdl2::video::GLContext,
    pub window: sdl2::video::Window,
    pub event_pump: sdl2::EventPump,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub sdl: sdl2::Sdl,
    close_requested: bool,
    limiter: FrameLimiter,
}

impl App {
    /// Opens a window and creates an OpenGL context as described by `settings`.
    pub fn new(settings: &DisplaySettings) -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::Sdl)?;
        let video_subsystem = sdl.video().map_err(Error::Sdl)?;

        let gl_attr = video_subsystem.gl_attr();
        let (major, minor) = settings.gl_version;
        gl_attr.set_context_version(major, minor);
        if settings.core_profile {
            gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
            gl_attr.set_context_flags().forward_compatible().set();
        } else {
            gl_attr.set_context_profile(sdl2::video::GLProfile::Compatibility);
        }

        let window = video_subsystem
            .window(&settings.title, settings.width, settings.height)
            .opengl()
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| Error::Sdl(e.to_string()))?;

        let gl_context = window.gl_create_context().map_err(Error::Sdl)?;
        window.gl_make_current(&gl_context).map_err(Error::Sdl)?;

        let interval = if settings.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            warn!("Could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let (width, height) = window.drawable_size();
        unsafe {
            gl.viewport(0, 0, width as i32, height as i32);
        }
        info!(
            "Created {}x{} window with OpenGL {}",
            width,
            height,
            unsafe { gl.get_parameter_string(glow::VERSION) }
        );

        let event_pump = sdl.event_pump().map_err(Error::Sdl)?;

        Ok(Self {
            gl: Arc::new(gl),
            gl_context,
            window,
            event_pump,
            video_subsystem,
            sdl,
            close_requested: false,
            limiter: FrameLimiter::new(settings.fps_cap),
        })
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Quit { .. }
            | Event::Window {
                win_event: WindowEvent::Close,
                ..
            } => {
                debug!("Close requested");
                self.close_requested = true;
            }
            Event::Window {
                win_event: WindowEvent::Resized(width, height),
                ..
            } => unsafe {
                self.gl.viewport(0, 0, width, height);
            },
            _ => {}
        }
    }
}

impl Display for App {
    type Gl = glow::Context;

    fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    fn update(&mut self) {
        self.window.gl_swap_window();
        self.limiter.sync();
        let events: Vec<Event> = self.event_pump.poll_iter().collect();
        for event in events {
            self.handle_event(event);
        }
    }

    fn close(self) {
        info!("Closing window");
    }
}
