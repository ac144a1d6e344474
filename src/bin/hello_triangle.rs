//! A coloured triangle next to an indexed rectangle. F toggles wireframe mode.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use learngl::{
    abs::{Mesh, ShaderProgram},
    camera::Camera,
    input::UpdateContext,
    render::geometry::{rectangle, triangle},
    scene::{FrameContext, Scene, run},
    shader_program,
};
use sdl2::keyboard::Keycode;

struct HelloTriangle {
    shader: ShaderProgram,
    triangle: Mesh,
    rectangle: Mesh,
    wireframe: bool,
}

impl HelloTriangle {
    fn new(gl: &Arc<glow::Context>) -> anyhow::Result<Self> {
        // Shift the shapes apart in normalized device coordinates.
        let shift = |offset: Vec3| Mat4::from_translation(offset);
        let triangle = triangle().map(|mut v| {
            v.position = shift(Vec3::new(-0.5, 0.0, 0.0)).transform_point3(v.position);
            v
        });
        let (mut corners, indices) = rectangle();
        let right = shift(Vec3::new(0.5, 0.0, 0.0));
        for corner in &mut corners {
            corner.position = right.transform_point3(corner.position * 0.8);
        }

        Ok(Self {
            shader: shader_program!(color, gl)?,
            triangle: Mesh::new_unindexed(gl, &triangle, glow::TRIANGLES)?,
            rectangle: Mesh::new(gl, &corners, &indices, glow::TRIANGLES)?,
            wireframe: false,
        })
    }
}

impl Scene for HelloTriangle {
    const CAPTURE_MOUSE: bool = false;

    fn update(&mut self, ctx: &UpdateContext, _camera: &mut Camera) {
        if ctx.keyboard.just_pressed(Keycode::F) {
            self.wireframe = !self.wireframe;
            log::info!("wireframe {}", if self.wireframe { "on" } else { "off" });
        }
    }

    fn render(&mut self, frame: &FrameContext) {
        let gl = frame.gl;
        unsafe {
            gl.clear_color(0.2, 0.3, 0.3, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            let mode = if self.wireframe { glow::LINE } else { glow::FILL };
            gl.polygon_mode(glow::FRONT_AND_BACK, mode);
        }
        self.shader.use_program();
        self.triangle.draw();
        self.rectangle.draw();
        unsafe {
            gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
        }
    }
}

fn main() -> anyhow::Result<()> {
    run("Hello Triangle", |gl, _settings| HelloTriangle::new(gl))
}
