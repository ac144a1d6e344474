//! Module providing the `Scene` trait and the loop every program runs it in.

use std::{sync::Arc, time::Instant};

use glam::{Mat4, Vec3};
use glow::HasContext;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use crate::{
    abs::App,
    camera::Camera,
    config::Settings,
    error::Result,
    input::{FrameTimer, InputState, UpdateContext, apply_camera_controls, apply_mouse_look},
    logging,
};

/// How often the FPS counter in the window title is refreshed, in seconds.
const TITLE_REFRESH: f32 = 0.5;

/// Width over height, with a minimised (zero-height) window treated as one pixel high.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// Everything a scene needs to draw one frame.
pub struct FrameContext<'a> {
    pub gl: &'a Arc<glow::Context>,
    pub camera: &'a Camera,
    pub settings: &'a Settings,
    /// Drawable size in pixels.
    pub width: u32,
    pub height: u32,
    pub time: f32,
    pub delta_time: f32,
}

impl FrameContext<'_> {
    pub fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.width, self.height)
    }

    pub fn view(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// Perspective projection with the camera's zoom and the configured clip planes.
    pub fn projection(&self) -> Mat4 {
        self.camera.projection(
            self.aspect_ratio(),
            self.settings.camera.near,
            self.settings.camera.far,
        )
    }
}

/// The Scene trait defines the common interface for all tutorial programs.
pub trait Scene {
    /// Whether the mouse starts captured for mouse look. Tab toggles it at runtime.
    const CAPTURE_MOUSE: bool = true;

    /// The camera the scene starts with.
    fn camera(&self) -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 3.0))
    }

    /// Handles an event.
    fn handle_event(&mut self, _gl: &Arc<glow::Context>, _event: &Event) {}

    /// Updates the scene state, after the camera has been moved for this frame.
    fn update(&mut self, _ctx: &UpdateContext, _camera: &mut Camera) {}

    /// Called with the new drawable size after the window is resized.
    fn resize(&mut self, _gl: &Arc<glow::Context>, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    /// Renders the scene.
    fn render(&mut self, frame: &FrameContext);
}

/// Opens a window titled after `title`, builds the scene and runs it until the window is
/// closed or Escape is pressed.
pub fn run<S, F>(title: &str, build: F) -> anyhow::Result<()>
where
    S: Scene,
    F: FnOnce(&Arc<glow::Context>, &Settings) -> anyhow::Result<S>,
{
    let settings = Settings::load()?;
    logging::init(settings.log_level())?;

    let mut window = settings.window.clone();
    window.title = format!("{}: {title}", window.title);
    let mut app = App::new(&window)?;
    app.log_gl_info();

    let (mut width, mut height) = app.drawable_size();
    unsafe {
        app.gl.viewport(0, 0, width as i32, height as i32);
        app.gl.enable(glow::DEPTH_TEST);
    }

    let mut scene = build(&app.gl, &settings)?;
    // The drawable can differ from the requested size (fullscreen, high DPI).
    scene.resize(&app.gl, width, height)?;
    let mut camera = scene.camera();
    camera.configure(&settings.camera);

    let mut captured = S::CAPTURE_MOUSE;
    app.set_mouse_captured(captured);

    let mut input = InputState::default();
    let mut timer = FrameTimer::new();
    let mut title_refreshed = Instant::now();

    log::info!("running {title}");

    'running: loop {
        let (delta_time, time) = timer.tick();
        input.begin_frame();

        let events: Vec<Event> = app.event_pump.poll_iter().collect();
        for event in &events {
            input.handle_event(event);
            match *event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } if key == Keycode::Escape => break 'running,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } if key == Keycode::Tab => {
                    captured = !captured;
                    app.set_mouse_captured(captured);
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    (width, height) = app.drawable_size();
                    unsafe {
                        app.gl.viewport(0, 0, width as i32, height as i32);
                    }
                    scene.resize(&app.gl, width, height)?;
                    log::debug!("resized to {width}x{height}");
                }
                _ => {}
            }
            scene.handle_event(&app.gl, event);
        }

        apply_camera_controls(&input.keyboard, &mut camera, delta_time);
        if captured {
            apply_mouse_look(&input.mouse, &mut camera);
        }
        scene.update(&UpdateContext::new(&input, delta_time, time), &mut camera);

        scene.render(&FrameContext {
            gl: &app.gl,
            camera: &camera,
            settings: &settings,
            width,
            height,
            time,
            delta_time,
        });

        if title_refreshed.elapsed().as_secs_f32() >= TITLE_REFRESH {
            title_refreshed = Instant::now();
            let title = format!("{} ({:.0} fps)", window.title, timer.fps());
            if let Err(e) = app.window.set_title(&title) {
                log::warn!("could not set window title: {e}");
            }
        }

        app.window.gl_swap_window();
    }

    log::info!("exiting after {:.1}s", timer.tick().1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(1280, 720), 1280.0 / 720.0);
        assert_eq!(aspect_ratio(800, 0), 800.0);
    }
}
