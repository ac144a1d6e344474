//! Ten textured cubes turning at different angles, explored with the fly camera.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use learngl::{
    abs::{Mesh, ShaderProgram, Texture, TextureOptions},
    config::Settings,
    render::geometry::{CUBE_POSITIONS, cube},
    scene::{FrameContext, Scene, run},
    shader_program,
};

/// Share of the second texture in the blend.
const MIX_VALUE: f32 = 0.2;

struct CameraCubes {
    shader: ShaderProgram,
    cube: Mesh,
    container: Texture,
    face: Texture,
}

impl CameraCubes {
    fn new(gl: &Arc<glow::Context>, settings: &Settings) -> anyhow::Result<Self> {
        let options = TextureOptions::default().flipped();
        Ok(Self {
            shader: shader_program!(cubes, gl)?,
            cube: Mesh::new_unindexed(gl, &cube(), glow::TRIANGLES)?,
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
        })
    }
}

/// Every third cube spins over time, the others keep their fixed tilt.
fn cube_model(index: usize, position: Vec3, time: f32) -> Mat4 {
    let mut angle = 20.0 * index as f32;
    if index % 3 == 0 {
        angle += time * 25.0;
    }
    Mat4::from_translation(position)
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), angle.to_radians())
}

impl Scene for CameraCubes {
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
        self.shader.set_uniform("mix_value", MIX_VALUE);
        self.shader.set_uniform("view", frame.view());
        self.shader.set_uniform("projection", frame.projection());
        for (i, &position) in CUBE_POSITIONS.iter().enumerate() {
            self.shader.set_uniform("model", cube_model(i, position, frame.time));
            self.cube.draw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    run("Camera", CameraCubes::new)
}
