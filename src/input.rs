//! Keyboard and mouse state collected from SDL events each frame.

use std::{collections::HashSet, time::Instant};

use glam::Vec2;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};

use crate::camera::{Camera, CameraMovement};

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
    pub pressed: HashSet<Keycode>,
    pub released: HashSet<Keycode>,
}

impl KeyboardState {
    pub fn press(&mut self, key: Keycode) {
        if self.down.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Keycode) {
        if self.down.remove(&key) {
            self.released.insert(key);
        }
    }

    pub fn is_down(&self, key: Keycode) -> bool {
        self.down.contains(&key)
    }

    /// Whether `key` went down during this frame.
    pub fn just_pressed(&self, key: Keycode) -> bool {
        self.pressed.contains(&key)
    }
}

/// The current state of the mouse.
#[derive(Default)]
pub struct MouseState {
    pub position: Vec2,
    /// Relative motion this frame, SDL convention (+y is down).
    pub delta: Vec2,
    pub down: HashSet<MouseButton>,
    pub pressed: HashSet<MouseButton>,
    pub released: HashSet<MouseButton>,
    pub scroll_delta: Vec2,
}

/// Keyboard and mouse state, fed from the SDL event queue.
#[derive(Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    /// Clears everything that only lasts a single frame.
    pub fn begin_frame(&mut self) {
        self.mouse.delta = Vec2::ZERO;
        self.mouse.scroll_delta = Vec2::ZERO;
        self.mouse.pressed.clear();
        self.mouse.released.clear();
        self.keyboard.pressed.clear();
        self.keyboard.released.clear();
    }

    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::MouseMotion {
                x, y, xrel, yrel, ..
            } => {
                self.mouse.position = Vec2::new(x as f32, y as f32);
                // Several motion events can arrive in one frame.
                self.mouse.delta += Vec2::new(xrel as f32, yrel as f32);
            }
            Event::MouseWheel { x, y, .. } => {
                self.mouse.scroll_delta += Vec2::new(x as f32, y as f32);
            }
            Event::MouseButtonDown { mouse_btn, .. } => {
                self.mouse.down.insert(mouse_btn);
                self.mouse.pressed.insert(mouse_btn);
            }
            Event::MouseButtonUp { mouse_btn, .. } => {
                self.mouse.down.remove(&mouse_btn);
                self.mouse.released.insert(mouse_btn);
            }
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => self.keyboard.press(keycode),
            Event::KeyUp {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => self.keyboard.release(keycode),
            _ => {}
        }
    }
}

/// Context provided to scenes during the update phase.
pub struct UpdateContext<'a> {
    pub keyboard: &'a KeyboardState,
    pub mouse: &'a MouseState,
    pub delta_time: f32,
    /// Seconds since the program started.
    pub time: f32,
}

impl<'a> UpdateContext<'a> {
    /// Creates a new `UpdateContext` from the given input state and timings.
    pub fn new(input: &'a InputState, delta_time: f32, time: f32) -> Self {
        Self {
            keyboard: &input.keyboard,
            mouse: &input.mouse,
            delta_time,
            time,
        }
    }
}

/// The fly-camera key bindings.
pub const CAMERA_BINDINGS: [(Keycode, CameraMovement); 6] = [
    (Keycode::W, CameraMovement::Forward),
    (Keycode::S, CameraMovement::Backward),
    (Keycode::A, CameraMovement::Left),
    (Keycode::D, CameraMovement::Right),
    (Keycode::E, CameraMovement::Up),
    (Keycode::Q, CameraMovement::Down),
];

/// Moves `camera` for every held binding in [`CAMERA_BINDINGS`].
pub fn apply_camera_controls(keyboard: &KeyboardState, camera: &mut Camera, delta_time: f32) {
    for (key, movement) in CAMERA_BINDINGS {
        if keyboard.is_down(key) {
            camera.process_keyboard(movement, delta_time);
        }
    }
}

/// Applies mouse look and scroll zoom. SDL reports +y downwards, the camera wants +y up.
pub fn apply_mouse_look(mouse: &MouseState, camera: &mut Camera) {
    if mouse.delta != Vec2::ZERO {
        camera.process_mouse_movement(mouse.delta.x, -mouse.delta.y, true);
    }
    if mouse.scroll_delta.y != 0.0 {
        camera.process_mouse_scroll(mouse.scroll_delta.y);
    }
}

/// Frame timing with a smoothed frames-per-second figure.
pub struct FrameTimer {
    start: Instant,
    last_frame: Instant,
    fps: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    const SMOOTHING: f32 = 0.9;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            fps: 0.0,
        }
    }

    /// Advances to a new frame and returns `(delta_time, time)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(delta_time);
        (delta_time, now.duration_since(self.start).as_secs_f32())
    }

    fn record(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }
        let instant_fps = 1.0 / delta_time;
        self.fps = if self.fps == 0.0 {
            instant_fps
        } else {
            self.fps * Self::SMOOTHING + instant_fps * (1.0 - Self::SMOOTHING)
        };
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_press_and_release_are_per_frame() {
        let mut input = InputState::default();
        input.keyboard.press(Keycode::W);
        assert!(input.keyboard.just_pressed(Keycode::W));
        assert!(input.keyboard.is_down(Keycode::W));

        input.begin_frame();
        assert!(!input.keyboard.just_pressed(Keycode::W));
        assert!(input.keyboard.is_down(Keycode::W));

        input.keyboard.release(Keycode::W);
        assert!(!input.keyboard.is_down(Keycode::W));
        assert!(input.keyboard.released.contains(&Keycode::W));
    }

    #[test]
    fn test_pressing_a_held_key_is_not_a_new_press() {
        let mut keyboard = KeyboardState::default();
        keyboard.press(Keycode::A);
        keyboard.pressed.clear();
        keyboard.press(Keycode::A);
        assert!(!keyboard.just_pressed(Keycode::A));
    }

    #[test]
    fn test_camera_controls_follow_held_keys() {
        let mut keyboard = KeyboardState::default();
        let mut camera = Camera::new(Vec3::ZERO);
        keyboard.press(Keycode::W);
        keyboard.press(Keycode::E);
        apply_camera_controls(&keyboard, &mut camera, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 2.5, -2.5), 1e-5));
    }

    #[test]
    fn test_mouse_look_inverts_sdl_y() {
        let mut camera = Camera::new(Vec3::ZERO);
        let mouse = MouseState {
            delta: Vec2::new(0.0, -50.0),
            scroll_delta: Vec2::new(0.0, 5.0),
            ..MouseState::default()
        };
        apply_mouse_look(&mouse, &mut camera);
        assert_eq!(camera.pitch, 5.0);
        assert_eq!(camera.zoom, 40.0);
    }

    #[test]
    fn test_fps_is_smoothed() {
        let mut timer = FrameTimer::new();
        timer.record(0.5);
        assert_eq!(timer.fps(), 2.0);
        timer.record(0.1);
        assert!((timer.fps() - 2.8).abs() < 1e-4);
        timer.record(0.0);
        assert!((timer.fps() - 2.8).abs() < 1e-4);
    }
}
