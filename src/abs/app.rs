//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;

use crate::{
    config::WindowSettings,
    error::{Error, Result},
};

fn window_err(e: impl std::fmt::Display) -> Error {
    Error::Window(e.to_string())
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a window with an OpenGL 3.3 core context, a 24-bit depth buffer and an
    /// 8-bit stencil buffer.
    /// The width and height options are ignored if `fullscreen` is set.
    pub fn new(settings: &WindowSettings) -> Result<Self> {
        let sdl = sdl2::init().map_err(window_err)?;
        let video_subsystem = sdl.video().map_err(window_err)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);
        gl_attr.set_stencil_size(8);
        #[cfg(target_os = "macos")]
        gl_attr.set_context_flags().forward_compatible().set();

        let (width, height) = if settings.fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(window_err)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (settings.width, settings.height)
        };
        let mut window = video_subsystem
            .window(&settings.title, width, height)
            .opengl()
            .resizable()
            .position_centered()
            .build()
            .map_err(window_err)?;
        if settings.fullscreen {
            window
                .set_fullscreen(sdl2::video::FullscreenType::Desktop)
                .map_err(window_err)?;
        }
        let gl_context = window.gl_create_context().map_err(window_err)?;
        window.gl_make_current(&gl_context).map_err(window_err)?;

        let interval = if settings.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(window_err)?;
        let gl = Arc::new(gl);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }

    /// Logs the driver's version strings and vertex attribute limit.
    pub fn log_gl_info(&self) {
        unsafe {
            log::info!(
                "OpenGL {} on {}",
                self.gl.get_parameter_string(glow::VERSION),
                self.gl.get_parameter_string(glow::RENDERER)
            );
            log::info!(
                "max vertex attributes supported: {}",
                self.gl.get_parameter_i32(glow::MAX_VERTEX_ATTRIBS)
            );
        }
    }

    /// Hides the cursor and reports relative motion while captured.
    pub fn set_mouse_captured(&self, captured: bool) {
        self.sdl.mouse().set_relative_mouse_mode(captured);
    }

    /// The size of the drawable area in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
