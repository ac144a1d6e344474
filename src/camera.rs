//! Euler-angle fly camera.

use glam::{Mat4, Vec3};

use crate::config::CameraSettings;

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;
const PITCH_LIMIT: f32 = 89.0;

/// Directions the camera can be moved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    /// Degrees, -90 looks down -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn with_orientation(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let settings = CameraSettings::default();
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch,
            movement_speed: settings.movement_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            zoom: settings.fov,
        };
        camera.update_vectors();
        camera
    }

    /// Applies speed, sensitivity and field of view from the settings file.
    pub fn configure(&mut self, settings: &CameraSettings) {
        self.movement_speed = settings.movement_speed;
        self.mouse_sensitivity = settings.mouse_sensitivity;
        self.zoom = settings.fov.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect_ratio, near, far)
    }

    /// Moves the camera by `movement_speed * delta_time`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.world_up * velocity,
            CameraMovement::Down => self.position -= self.world_up * velocity,
        }
    }

    /// Turns the camera. A positive `y_offset` looks up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        // Past +-90 degrees the look-at basis flips.
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Narrows the field of view when scrolling up.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(camera.right().abs_diff_eq(Vec3::X, EPS));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn test_keyboard_moves_by_speed_times_delta() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Forward, 2.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPS));
        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(2.5, 0.0, -5.0), EPS));
        camera.process_keyboard(CameraMovement::Up, 0.4);
        assert!((camera.position.y - 1.0).abs() < EPS);
        camera.process_keyboard(CameraMovement::Down, 0.4);
        camera.process_keyboard(CameraMovement::Left, 1.0);
        camera.process_keyboard(CameraMovement::Backward, 2.0);
        assert!(camera.position.abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn test_pitch_is_constrained() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(camera.pitch, -89.0);
        camera.process_mouse_movement(0.0, -10_000.0, false);
        assert!(camera.pitch < -89.0);
    }

    #[test]
    fn test_positive_y_offset_looks_up() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 100.0, true);
        assert!(camera.front().y > 0.0);
        assert!((camera.front().length() - 1.0).abs() < EPS);
        assert!(camera.front().dot(camera.right()).abs() < EPS);
        assert!(camera.up().dot(camera.front()).abs() < EPS);
    }

    #[test]
    fn test_yaw_turns_right() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_movement(900.0, 0.0, true);
        assert!(camera.front().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_scroll(-10.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
        camera.process_mouse_scroll(-4.0);
        assert_eq!(camera.zoom, 5.0);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let eye = camera.view_matrix().transform_point3(camera.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, EPS));
        let ahead = camera
            .view_matrix()
            .transform_point3(camera.position + camera.front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn test_configure_clamps_fov() {
        let mut camera = Camera::default();
        camera.configure(&CameraSettings {
            movement_speed: 5.0,
            mouse_sensitivity: 0.2,
            fov: 90.0,
            ..CameraSettings::default()
        });
        assert_eq!(camera.movement_speed, 5.0);
        assert_eq!(camera.mouse_sensitivity, 0.2);
        assert_eq!(camera.zoom, MAX_ZOOM);
    }
}
