//! A rectangle blending two textures, tilted back and viewed through the fly camera.
//! Up and Down change how much of the second texture shows through, T tints it with the
//! vertex colours.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use learngl::{
    abs::{Mesh, ShaderProgram, Texture, TextureOptions},
    camera::Camera,
    config::Settings,
    input::UpdateContext,
    render::geometry::rectangle,
    scene::{FrameContext, Scene, run},
    shader_program,
};
use sdl2::keyboard::Keycode;

struct Textures {
    shader: ShaderProgram,
    rectangle: Mesh,
    container: Texture,
    face: Texture,
    mix_value: f32,
    tint: bool,
}

impl Textures {
    fn new(gl: &Arc<glow::Context>, settings: &Settings) -> anyhow::Result<Self> {
        let (vertices, indices) = rectangle();
        let options = TextureOptions::default().flipped();
        Ok(Self {
            shader: shader_program!(textured, gl)?,
            rectangle: Mesh::new(gl, &vertices, &indices, glow::TRIANGLES)?,
            container: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/container.jpg"),
                &options,
            )?,
            face: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/awesomeface.png"),
                &TextureOptions::clamped().flipped(),
            )?,
            mix_value: 0.2,
            tint: false,
        })
    }
}

impl Scene for Textures {
    fn update(&mut self, ctx: &UpdateContext, _camera: &mut Camera) {
        let step = ctx.delta_time;
        if ctx.keyboard.is_down(Keycode::Up) {
            self.mix_value = (self.mix_value + step).min(1.0);
        }
        if ctx.keyboard.is_down(Keycode::Down) {
            self.mix_value = (self.mix_value - step).max(0.0);
        }
        if ctx.keyboard.just_pressed(Keycode::T) {
            self.tint = !self.tint;
        }
    }

    fn render(&mut self, frame: &FrameContext) {
        unsafe {
            frame.gl.clear_color(0.2, 0.3, 0.3, 1.0);
            frame.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        self.container.bind(0);
        self.face.bind(1);

        self.shader.use_program();
        self.shader.set_uniform("texture1", 0);
        self.shader.set_uniform("texture2", 1);
        self.shader.set_uniform("mix_value", self.mix_value);
        self.shader.set_uniform("tint", self.tint);
        self.shader.set_uniform(
            "model",
            Mat4::from_axis_angle(Vec3::X, (-55f32).to_radians()),
        );
        self.shader.set_uniform("view", frame.view());
        self.shader.set_uniform("projection", frame.projection());
        self.rectangle.draw();
    }
}

fn main() -> anyhow::Result<()> {
    run("Textures", Textures::new)
}
