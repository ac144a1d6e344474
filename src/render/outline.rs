//! Object outlines through the stencil buffer.
//!
//! Draw order: [`mask_pass`], the objects, [`outline_pass`], the objects again scaled
//! up with a solid colour, then [`finish`].

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;

use crate::abs::ShaderProgram;

/// Writes 1 into the stencil buffer wherever the following draws land.
pub fn mask_pass(gl: &glow::Context) {
    unsafe {
        gl.enable(glow::STENCIL_TEST);
        gl.stencil_op(glow::KEEP, glow::KEEP, glow::REPLACE);
        gl.stencil_func(glow::ALWAYS, 1, 0xFF);
        gl.stencil_mask(0xFF);
    }
}

/// Keeps the stencil buffer read-only, e.g. for the floor.
pub fn no_mask(gl: &glow::Context) {
    unsafe {
        gl.stencil_mask(0x00);
    }
}

/// Only lets the following draws through outside the masked area, on top of everything.
pub fn outline_pass(gl: &glow::Context) {
    unsafe {
        gl.stencil_func(glow::NOTEQUAL, 1, 0xFF);
        gl.stencil_mask(0x00);
        gl.disable(glow::DEPTH_TEST);
    }
}

/// Restores the state changed by the two passes.
pub fn finish(gl: &glow::Context) {
    unsafe {
        gl.stencil_mask(0xFF);
        gl.stencil_func(glow::ALWAYS, 0, 0xFF);
        gl.enable(glow::DEPTH_TEST);
        gl.disable(glow::STENCIL_TEST);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Vec4,
    /// Uniform scale of the outline copy; 1.1 gives a 5% border on each side.
    pub scale: f32,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.04, 0.28, 0.26, 1.0),
            scale: 1.1,
        }
    }
}

impl Outline {
    /// The model matrix of the scaled-up copy, scaled about the object's own origin.
    pub fn model_matrix(&self, model: Mat4) -> Mat4 {
        model * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Prepares the `solid_color` shader for outline draws.
    pub fn apply(&self, shader: &ShaderProgram) {
        shader.set_uniform("color", self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_scales_about_object_origin() {
        let outline = Outline::default();
        let model = Mat4::from_translation(Vec3::new(3.0, 0.0, -2.0));
        let scaled = outline.model_matrix(model);
        assert!(
            scaled
                .transform_point3(Vec3::ZERO)
                .abs_diff_eq(Vec3::new(3.0, 0.0, -2.0), 1e-6)
        );
        assert!(
            scaled
                .transform_point3(Vec3::X)
                .abs_diff_eq(Vec3::new(4.1, 0.0, -2.0), 1e-5)
        );
    }
}
