//! Phong lighting with diffuse and specular maps: a directional light, four point lights
//! drawn as small lamps, and a flashlight on the camera that F switches on and off.

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use learngl::{
    abs::{Mesh, ShaderProgram, Texture, TextureOptions},
    camera::Camera,
    config::Settings,
    input::UpdateContext,
    render::{
        geometry::{CUBE_POSITIONS, POINT_LIGHT_POSITIONS, cube},
        lighting::{LightSetup, flashlight},
    },
    scene::{FrameContext, Scene, run},
    shader_program,
};
use sdl2::keyboard::Keycode;

const SHININESS: f32 = 32.0;

struct Lighting {
    lit: ShaderProgram,
    lamp: ShaderProgram,
    cube: Mesh,
    diffuse: Texture,
    specular: Texture,
    lights: LightSetup,
    flashlight_on: bool,
}

impl Lighting {
    fn new(gl: &Arc<glow::Context>, settings: &Settings) -> anyhow::Result<Self> {
        let options = TextureOptions::default().flipped();
        Ok(Self {
            lit: shader_program!(lighting, gl)?,
            lamp: shader_program!(solid_color, gl)?,
            cube: Mesh::new_unindexed(gl, &cube(), glow::TRIANGLES)?,
            diffuse: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/container2.png"),
                &options,
            )?,
            specular: Texture::from_path_or_fallback(
                gl,
                settings.asset("textures/container2_specular.png"),
                &options,
            )?,
            lights: LightSetup::with_point_lights(&POINT_LIGHT_POSITIONS),
            flashlight_on: true,
        })
    }
}

impl Scene for Lighting {
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
            frame.gl.clear_color(0.1, 0.1, 0.1, 1.0);
            frame.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        let (view, projection) = (frame.view(), frame.projection());

        self.lit.use_program();
        self.lit.set_uniform("view", view);
        self.lit.set_uniform("projection", projection);
        self.lit.set_uniform("view_pos", frame.camera.position);
        self.lit.set_uniform("material.texture_diffuse0", 0);
        self.lit.set_uniform("material.texture_specular0", 1);
        self.lit.set_uniform("material.shininess", SHININESS);
        self.lights.apply(&self.lit);
        self.diffuse.bind(0);
        self.specular.bind(1);
        for (i, &position) in CUBE_POSITIONS.iter().enumerate() {
            let angle = (20.0 * i as f32).to_radians();
            let model = Mat4::from_translation(position)
                * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), angle);
            self.lit.set_uniform("model", model);
            self.cube.draw();
        }

        self.lamp.use_program();
        self.lamp.set_uniform("view", view);
        self.lamp.set_uniform("projection", projection);
        self.lamp.set_uniform("color", Vec4::ONE);
        for light in &self.lights.points {
            let model = Mat4::from_translation(light.position) * Mat4::from_scale(Vec3::splat(0.2));
            self.lamp.set_uniform("model", model);
            self.cube.draw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    run("Multiple lights", Lighting::new)
}
