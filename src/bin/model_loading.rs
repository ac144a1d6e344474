//! Loads a Wavefront OBJ model and lights it like the multi-light scene.
//!
//! Usage: `model_loading [path/to/model.obj]`. Without an argument the settings'
//! `default_model` is loaded from the asset directory.
//!
//! The lighting shader is read from disk at startup, so edits to
//! `src/shaders/lighting/*.glsl` show up on the next run without rebuilding.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::{Mat4, Vec3};
use glow::HasContext;
use learngl::{
    abs::ShaderProgram,
    camera::Camera,
    input::UpdateContext,
    model::Model,
    render::lighting::{LightSetup, flashlight},
    scene::{FrameContext, Scene, run},
};
use sdl2::keyboard::Keycode;

struct ModelLoading {
    shader: ShaderProgram,
    model: Model,
    lights: LightSetup,
    flashlight_on: bool,
}

impl ModelLoading {
    fn new(gl: &Arc<glow::Context>, path: PathBuf) -> anyhow::Result<Self> {
        let model = Model::load(gl, &path, false)?;
        log::info!(
            "{} has {} meshes sharing {} textures",
            path.display(),
            model.meshes().len(),
            model.texture_count()
        );
        for mesh in model.meshes() {
            for texture in mesh.textures() {
                log::debug!(
                    "mesh '{}': {:?} map {} ({}x{})",
                    mesh.name,
                    texture.kind,
                    texture.path,
                    texture.texture.width(),
                    texture.texture.height()
                );
            }
        }
        let shaders = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/shaders/lighting");
        Ok(Self {
            shader: ShaderProgram::from_files(
                gl,
                shaders.join("vert.glsl"),
                shaders.join("frag.glsl"),
            )?,
            model,
            lights: LightSetup::with_point_lights(&[Vec3::new(1.5, 2.0, 3.0)]),
            flashlight_on: false,
        })
    }
}

impl Scene for ModelLoading {
    fn update(&mut self, ctx: &UpdateContext, camera: &mut Camera) {
        if ctx.keyboard.just_pressed(Keycode::F) {
            self.flashlight_on = !self.flashlight_on;
        }
        self.lights.spot = self
            .flashlight_on
            .then(|| flashlight(camera.position, camera.front()));
    }

    fn render(&mut self, frame: &FrameContext) {
        unsafe {
            frame.gl.clear_color(0.05, 0.05, 0.05, 1.0);
            frame.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        self.shader.use_program();
        self.shader.set_uniform("view", frame.view());
        self.shader.set_uniform("projection", frame.projection());
        self.shader.set_uniform("view_pos", frame.camera.position);
        self.shader.set_uniform("model", Mat4::IDENTITY);
        self.lights.apply(&self.shader);
        self.model.draw(&self.shader);
    }
}

fn main() -> anyhow::Result<()> {
    let arg = std::env::args().nth(1).map(PathBuf::from);
    run("Model loading", |gl, settings| {
        let path = arg.unwrap_or_else(|| settings.asset(&settings.default_model));
        ModelLoading::new(gl, path)
    })
}
