//! Cube-mapped sky drawn behind everything else.

use std::{path::Path, sync::Arc};

use glam::{Mat3, Mat4};
use glow::HasContext;

use crate::{
    abs::{Cubemap, Mesh, ShaderProgram},
    error::Result,
    render::geometry::skybox_cube,
};

/// Face file names in cube map order, relative to a skybox directory.
pub const FACE_FILES: [&str; 6] = [
    "right.jpg",
    "left.jpg",
    "top.jpg",
    "bottom.jpg",
    "front.jpg",
    "back.jpg",
];

/// Drops the translation of a view matrix so the sky stays centred on the camera.
pub fn strip_translation(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

pub struct Skybox {
    gl: Arc<glow::Context>,
    cubemap: Cubemap,
    mesh: Mesh,
    shader: ShaderProgram,
}

impl Skybox {
    pub fn new(gl: &Arc<glow::Context>, cubemap: Cubemap, shader: ShaderProgram) -> Result<Self> {
        Ok(Self {
            gl: Arc::clone(gl),
            cubemap,
            mesh: Mesh::new_unindexed(gl, &skybox_cube(), glow::TRIANGLES)?,
            shader,
        })
    }

    /// Loads the six [`FACE_FILES`] from `dir`. A grey sky is used if any face is missing.
    pub fn load_cubemap(gl: &Arc<glow::Context>, dir: &Path) -> Result<Cubemap> {
        let paths = FACE_FILES.map(|name| dir.join(name));
        match Cubemap::from_paths(gl, &paths) {
            Ok(cubemap) => Ok(cubemap),
            Err(e) => {
                log::error!("skybox failed to load: {e}");
                Cubemap::solid(gl, [96, 96, 110])
            }
        }
    }

    pub fn cubemap(&self) -> &Cubemap {
        &self.cubemap
    }

    /// Draws the sky last, where nothing else has been drawn (depth == 1).
    pub fn draw(&self, view: Mat4, projection: Mat4) {
        unsafe {
            self.gl.depth_func(glow::LEQUAL);
        }
        self.shader.use_program();
        self.shader.set_uniform("view", strip_translation(view));
        self.shader.set_uniform("projection", projection);
        self.shader.set_uniform("skybox", 0);
        self.cubemap.bind(0);
        self.mesh.draw();
        unsafe {
            self.gl.depth_func(glow::LESS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_strip_translation_keeps_rotation() {
        let view = Mat4::look_at_rh(Vec3::new(4.0, 5.0, 6.0), Vec3::new(4.0, 5.0, 5.0), Vec3::Y);
        let sky = strip_translation(view);
        assert_eq!(sky.w_axis, glam::Vec4::W);
        assert!(sky.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::ZERO, 1e-6));
        let dir = Vec3::new(0.3, 0.4, 0.5);
        assert!(
            sky.transform_vector3(dir)
                .abs_diff_eq(view.transform_vector3(dir), 1e-6)
        );
    }
}
