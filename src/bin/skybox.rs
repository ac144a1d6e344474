//! A cube mirroring the skybox around it. R switches between reflection and refraction.

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;
use learngl::{
    abs::{Mesh, ShaderProgram},
    camera::Camera,
    config::Settings,
    input::UpdateContext,
    render::{geometry::cube, skybox::Skybox},
    scene::{FrameContext, Scene, run},
    shader_program,
};
use sdl2::keyboard::Keycode;

/// Refractive index of glass.
const GLASS: f32 = 1.52;

struct SkyboxScene {
    environment: ShaderProgram,
    cube: Mesh,
    skybox: Skybox,
    refraction: bool,
}

impl SkyboxScene {
    fn new(gl: &Arc<glow::Context>, settings: &Settings) -> anyhow::Result<Self> {
        let cubemap = Skybox::load_cubemap(gl, &settings.asset("skybox"))?;
        Ok(Self {
            environment: shader_program!(environment, gl)?,
            cube: Mesh::new_unindexed(gl, &cube(), glow::TRIANGLES)?,
            skybox: Skybox::new(gl, cubemap, shader_program!(skybox, gl)?)?,
            refraction: false,
        })
    }
}

impl Scene for SkyboxScene {
    fn update(&mut self, ctx: &UpdateContext, _camera: &mut Camera) {
        if ctx.keyboard.just_pressed(Keycode::R) {
            self.refraction = !self.refraction;
            log::info!(
                "cube {}",
                if self.refraction { "refracts" } else { "reflects" }
            );
        }
    }

    fn render(&mut self, frame: &FrameContext) {
        unsafe {
            frame.gl.clear_color(0.1, 0.1, 0.1, 1.0);
            frame.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        let (view, projection) = (frame.view(), frame.projection());

        self.environment.use_program();
        self.environment.set_uniform("model", Mat4::IDENTITY);
        self.environment.set_uniform("view", view);
        self.environment.set_uniform("projection", projection);
        self.environment.set_uniform("camera_pos", frame.camera.position);
        self.environment.set_uniform("skybox", 0);
        self.environment.set_uniform("refraction", self.refraction);
        self.environment.set_uniform("ratio", 1.0 / GLASS);
        self.skybox.cubemap().bind(0);
        self.cube.draw();

        self.skybox.draw(view, projection);
    }
}

fn main() -> anyhow::Result<()> {
    run("Cubemaps", SkyboxScene::new)
}
