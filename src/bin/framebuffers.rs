//! Renders a small scene off-screen and post-processes it. Keys 1 to 6 pick the effect:
//! none, inversion, grayscale, sharpen, blur and edge detection.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use learngl::{
    abs::{Mesh, ShaderProgram, Texture, TextureOptions},
    camera::Camera,
    config::Settings,
    input::UpdateContext,
    render::{
        geometry::{cube, plane},
        postprocess::{Effect, PostProcessor},
    },
    scene::{FrameContext, Scene, run},
    shader_program,
};

const CUBES: [Vec3; 2] = [Vec3::new(-1.0, 0.0, -1.0), Vec3::new(2.0, 0.0, 0.0)];

struct Framebuffers {
    shader: ShaderProgram,
    cube: Mesh,
    floor: Mesh,
    marble: Texture,
    metal: Texture,
    post: PostProcessor,
}

impl Framebuffers {
    fn new(gl: &Arc<glow::Context>, settings: &Settings) -> anyhow::Result<Self> {
        let (width, height) = (settings.window.width, settings.window.height);
        Ok(Self {
            shader: shader_program!(cubes, gl)?,
            cube: Mesh::new_unindexed(gl, &cube(), glow::TRIANGLES)?,
            floor: Mesh::new_unindexed(gl, &plane(5.0, -0.5, 2.0), glow::TRIANGLES)?,
            marble: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/marble.jpg"),
                &TextureOptions::default().flipped(),
            )?,
            metal: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/metal.png"),
                &TextureOptions::default().flipped(),
            )?,
            post: PostProcessor::new(gl, shader_program!(screen, gl)?, width, height)?,
        })
    }
}

impl Scene for Framebuffers {
    fn update(&mut self, ctx: &UpdateContext, _camera: &mut Camera) {
        let picked = ctx
            .keyboard
            .pressed
            .iter()
            .find_map(|&key| Effect::from_key(key));
        if let Some(effect) = picked {
            if effect != self.post.effect {
                log::info!("post-processing effect: {effect:?}");
            }
            self.post.effect = effect;
        }
    }

    fn resize(&mut self, _gl: &Arc<glow::Context>, width: u32, height: u32) -> learngl::Result<()> {
        self.post.resize(width, height)
    }

    fn render(&mut self, frame: &FrameContext) {
        self.post.begin([0.1, 0.1, 0.1, 1.0]);

        self.shader.use_program();
        self.shader.set_uniform("texture1", 0);
        self.shader.set_uniform("texture2", 0);
        self.shader.set_uniform("mix_value", 0f32);
        self.shader.set_uniform("view", frame.view());
        self.shader.set_uniform("projection", frame.projection());

        self.marble.bind(0);
        for position in CUBES {
            self.shader.set_uniform("model", Mat4::from_translation(position));
            self.cube.draw();
        }
        self.metal.bind(0);
        self.shader.set_uniform("model", Mat4::IDENTITY);
        self.floor.draw();

        self.post.finish();
    }
}

fn main() -> anyhow::Result<()> {
    run("Framebuffers", Framebuffers::new)
}
