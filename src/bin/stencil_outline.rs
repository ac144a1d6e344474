//! Two cubes on a floor, outlined through the stencil buffer.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use learngl::{
    abs::{Mesh, ShaderProgram, Texture, TextureOptions},
    config::Settings,
    render::{
        geometry::{cube, plane},
        outline::{self, Outline},
    },
    scene::{FrameContext, Scene, run},
    shader_program,
};

const CUBES: [Vec3; 2] = [Vec3::new(-1.0, 0.0, -1.0), Vec3::new(2.0, 0.0, 0.0)];

struct StencilOutline {
    textured: ShaderProgram,
    solid: ShaderProgram,
    cube: Mesh,
    floor: Mesh,
    marble: Texture,
    metal: Texture,
    outline: Outline,
}

impl StencilOutline {
    fn new(gl: &Arc<glow::Context>, settings: &Settings) -> anyhow::Result<Self> {
        let options = TextureOptions::default().flipped();
        Ok(Self {
            textured: shader_program!(cubes, gl)?,
            solid: shader_program!(solid_color, gl)?,
            cube: Mesh::new_unindexed(gl, &cube(), glow::TRIANGLES)?,
            floor: Mesh::new_unindexed(gl, &plane(5.0, -0.5, 2.0), glow::TRIANGLES)?,
            marble: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/marble.jpg"),
                &options,
            )?,
            metal: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/metal.png"),
                &options,
            )?,
            outline: Outline::default(),
        })
    }

    fn draw_cubes(&self, shader: &ShaderProgram, model: impl Fn(Mat4) -> Mat4) {
        for position in CUBES {
            shader.set_uniform("model", model(Mat4::from_translation(position)));
            self.cube.draw();
        }
    }
}

impl Scene for StencilOutline {
    fn render(&mut self, frame: &FrameContext) {
        let gl = frame.gl;
        unsafe {
            gl.clear_color(0.1, 0.1, 0.1, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
        }
        let (view, projection) = (frame.view(), frame.projection());

        self.solid.use_program();
        self.solid.set_uniform("view", view);
        self.solid.set_uniform("projection", projection);
        self.outline.apply(&self.solid);

        self.textured.use_program();
        self.textured.set_uniform("texture1", 0);
        self.textured.set_uniform("texture2", 0);
        self.textured.set_uniform("mix_value", 0f32);
        self.textured.set_uniform("view", view);
        self.textured.set_uniform("projection", projection);

        outline::mask_pass(gl);
        outline::no_mask(gl);
        self.metal.bind(0);
        self.textured.set_uniform("model", Mat4::IDENTITY);
        self.floor.draw();

        outline::mask_pass(gl);
        self.marble.bind(0);
        self.draw_cubes(&self.textured, |model| model);

        outline::outline_pass(gl);
        self.solid.use_program();
        self.draw_cubes(&self.solid, |model| self.outline.model_matrix(model));
        outline::finish(gl);
    }
}

fn main() -> anyhow::Result<()> {
    run("Stencil testing", StencilOutline::new)
}
