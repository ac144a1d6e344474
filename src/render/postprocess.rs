//! Off-screen rendering followed by a full-screen post-processing pass.

use std::sync::Arc;

use glow::HasContext;
use sdl2::keyboard::Keycode;

use crate::{
    abs::{Framebuffer, Mesh, ShaderProgram},
    error::Result,
    render::geometry::screen_quad,
};

/// Screen-space effect applied by the `screen` shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    Inversion,
    Grayscale,
    Sharpen,
    Blur,
    EdgeDetect,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::None,
        Effect::Inversion,
        Effect::Grayscale,
        Effect::Sharpen,
        Effect::Blur,
        Effect::EdgeDetect,
    ];

    /// The `effect` uniform: 0 passthrough, 1 inversion, 2 grayscale, 3 kernel.
    pub fn mode(self) -> i32 {
        match self {
            Effect::None => 0,
            Effect::Inversion => 1,
            Effect::Grayscale => 2,
            Effect::Sharpen | Effect::Blur | Effect::EdgeDetect => 3,
        }
    }

    /// Row-major 3x3 convolution kernel, for kernel effects.
    pub fn kernel(self) -> Option<[f32; 9]> {
        match self {
            Effect::Sharpen => Some([-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0]),
            Effect::Blur => Some([
                1.0 / 16.0,
                2.0 / 16.0,
                1.0 / 16.0,
                2.0 / 16.0,
                4.0 / 16.0,
                2.0 / 16.0,
                1.0 / 16.0,
                2.0 / 16.0,
                1.0 / 16.0,
            ]),
            Effect::EdgeDetect => Some([1.0, 1.0, 1.0, 1.0, -8.0, 1.0, 1.0, 1.0, 1.0]),
            Effect::None | Effect::Inversion | Effect::Grayscale => None,
        }
    }

    /// Number keys 1 to 6 pick an effect in [`Effect::ALL`] order.
    pub fn from_key(key: Keycode) -> Option<Self> {
        const KEYS: [Keycode; 6] = [
            Keycode::Num1,
            Keycode::Num2,
            Keycode::Num3,
            Keycode::Num4,
            Keycode::Num5,
            Keycode::Num6,
        ];
        KEYS.iter().position(|&k| k == key).map(|i| Self::ALL[i])
    }
}

/// Renders a scene into a colour + depth/stencil framebuffer and draws the result to the
/// window through the `screen` shader.
pub struct PostProcessor {
    gl: Arc<glow::Context>,
    framebuffer: Framebuffer,
    quad: Mesh,
    shader: ShaderProgram,
    pub effect: Effect,
}

/// Pixel offset used when sampling the 3x3 neighbourhood.
const KERNEL_OFFSET: f32 = 1.0 / 300.0;

impl PostProcessor {
    pub fn new(
        gl: &Arc<glow::Context>,
        shader: ShaderProgram,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        Ok(Self {
            gl: Arc::clone(gl),
            framebuffer: Self::target(gl, width, height)?,
            quad: Mesh::new_unindexed(gl, &screen_quad(), glow::TRIANGLES)?,
            shader,
            effect: Effect::None,
        })
    }

    fn target(gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<Framebuffer> {
        Framebuffer::new(gl, width.max(1) as i32, height.max(1) as i32)
    }

    /// Recreates the off-screen target at the new window size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.framebuffer = Self::target(&self.gl, width, height)?;
        log::debug!("post-process target resized to {width}x{height}");
        Ok(())
    }

    /// Redirects drawing into the off-screen target and clears it.
    pub fn begin(&self, clear_color: [f32; 4]) {
        self.framebuffer.bind();
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl
                .clear_color(clear_color[0], clear_color[1], clear_color[2], clear_color[3]);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
        }
    }

    /// Draws the off-screen image to the default framebuffer with the current effect.
    pub fn finish(&self) {
        Framebuffer::unbind(&self.gl);
        unsafe {
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.clear_color(1.0, 1.0, 1.0, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
        self.shader.use_program();
        self.shader.set_uniform("screen_texture", 0);
        self.shader.set_uniform("effect", self.effect.mode());
        self.shader.set_uniform("offset", KERNEL_OFFSET);
        if let Some(kernel) = self.effect.kernel() {
            self.shader.set_uniform("kernel", kernel);
        }
        self.framebuffer.texture().bind(0);
        self.quad.draw();
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_weights() {
        let sum = |e: Effect| e.kernel().unwrap().iter().sum::<f32>();
        assert!((sum(Effect::Sharpen) - 1.0).abs() < 1e-6);
        assert!((sum(Effect::Blur) - 1.0).abs() < 1e-6);
        assert!(sum(Effect::EdgeDetect).abs() < 1e-6);
    }

    #[test]
    fn test_only_kernel_effects_have_kernels() {
        for effect in Effect::ALL {
            assert_eq!(effect.kernel().is_some(), effect.mode() == 3, "{effect:?}");
        }
    }

    #[test]
    fn test_number_keys_select_effects() {
        assert_eq!(Effect::from_key(Keycode::Num1), Some(Effect::None));
        assert_eq!(Effect::from_key(Keycode::Num5), Some(Effect::Blur));
        assert_eq!(Effect::from_key(Keycode::Num6), Some(Effect::EdgeDetect));
        assert_eq!(Effect::from_key(Keycode::Num7), None);
    }
}
