//! Module to work with OpenGL framebuffers.
//!
//! This module provides functionality to create, bind, and manage OpenGL framebuffers.
//! It allows for off-screen rendering into a texture that can be sampled afterwards.

use std::sync::Arc;

use glow::HasContext;

use crate::{
    abs::Texture,
    error::{Error, Result},
};

/// Represents an OpenGL framebuffer: an RGBA8 colour texture plus a write-only
/// DEPTH24_STENCIL8 renderbuffer.
pub struct Framebuffer {
    gl: Arc<glow::Context>,
    fbo: glow::Framebuffer,
    color_tex: Texture,
    renderbuffer: glow::Renderbuffer,
}

impl Framebuffer {
    /// Creates a new framebuffer with the specified width and height.
    pub fn new(gl: &Arc<glow::Context>, width: i32, height: i32) -> Result<Self> {
        unsafe {
            let fbo = gl.create_framebuffer().map_err(Error::Gl)?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));

            let color_tex = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(color_tex));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            for (param, value) in [
                (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
                (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
                (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
            ] {
                gl.tex_parameter_i32(glow::TEXTURE_2D, param, value as i32);
            }
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color_tex),
                0,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            let rbo = gl.create_renderbuffer().map_err(Error::Gl)?;
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(rbo));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, width, height);
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_STENCIL_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(rbo),
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            // Built before the status check so a failure still frees everything.
            let framebuffer = Self {
                gl: gl.clone(),
                fbo,
                color_tex: Texture {
                    gl: gl.clone(),
                    id: color_tex,
                    width: width as u32,
                    height: height as u32,
                },
                renderbuffer: rbo,
            };

            if status != glow::FRAMEBUFFER_COMPLETE {
                return Err(Error::FramebufferIncomplete(status));
            }
            Ok(framebuffer)
        }
    }

    /// Binds the framebuffer for rendering.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
        }
    }

    /// Unbinds the framebuffer, reverting to the default framebuffer.
    pub fn unbind(gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    /// Returns the color texture of the framebuffer.
    pub fn texture(&self) -> &Texture {
        &self.color_tex
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_renderbuffer(self.renderbuffer);
            self.gl.delete_framebuffer(self.fbo);
        }
    }
}
