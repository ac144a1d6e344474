//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture,
//! and [`Cubemap`] for six-faced environment textures.

use std::{path::Path, sync::Arc};

use glow::HasContext;
use image::{DynamicImage, GenericImageView};
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Layout of the pixel data handed to OpenGL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Picks the upload format for an image with `channels` color channels.
    ///
    /// Two-channel (luma + alpha) images are expanded to RGBA.
    pub fn from_channels(channels: u8) -> Result<Self> {
        match channels {
            1 => Ok(PixelFormat::Red),
            3 => Ok(PixelFormat::Rgb),
            2 | 4 => Ok(PixelFormat::Rgba),
            n => Err(Error::UnsupportedChannels(n)),
        }
    }

    /// The `format` argument of `glTexImage2D`.
    pub fn gl_format(self) -> u32 {
        match self {
            PixelFormat::Red => glow::RED,
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }

    /// The sized internal format. `srgb` only affects color formats.
    pub fn internal_format(self, srgb: bool) -> u32 {
        match (self, srgb) {
            (PixelFormat::Red, _) => glow::R8,
            (PixelFormat::Rgb, false) => glow::RGB8,
            (PixelFormat::Rgb, true) => glow::SRGB8,
            (PixelFormat::Rgba, false) => glow::RGBA8,
            (PixelFormat::Rgba, true) => glow::SRGB8_ALPHA8,
        }
    }

    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Converts a decoded image into tightly packed 8-bit pixel rows.
pub fn pixel_data(image: &DynamicImage) -> Result<(PixelFormat, Vec<u8>)> {
    let format = PixelFormat::from_channels(image.color().channel_count())?;
    let data = match format {
        PixelFormat::Red => image.to_luma8().into_raw(),
        PixelFormat::Rgb => image.to_rgb8().into_raw(),
        PixelFormat::Rgba => image.to_rgba8().into_raw(),
    };
    Ok((format, data))
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
}

impl Wrap {
    fn gl_enum(self) -> i32 {
        (match self {
            Wrap::Repeat => glow::REPEAT,
            Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        }) as i32
    }
}

/// Minification/magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

impl Filter {
    fn gl_enum(self) -> i32 {
        (match self {
            Filter::Nearest => glow::NEAREST,
            Filter::Linear => glow::LINEAR,
            Filter::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
            Filter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }) as i32
    }
}

/// Sampling and upload options for a [`Texture`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    pub wrap: Wrap,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmaps: bool,
    /// Flip rows so the first row of the file ends up at `v = 0`.
    pub flip_vertically: bool,
    /// Treat color data as sRGB (gamma-corrected).
    pub srgb: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            wrap: Wrap::Repeat,
            min_filter: Filter::LinearMipmapLinear,
            mag_filter: Filter::Linear,
            mipmaps: true,
            flip_vertically: false,
            srgb: false,
        }
    }
}

impl TextureOptions {
    /// Edge-clamped, linear filtering. Used for sprites with transparent borders.
    pub fn clamped() -> Self {
        Self {
            wrap: Wrap::ClampToEdge,
            ..Self::default()
        }
    }

    /// Nearest-neighbour filtering for crisp pixel art.
    pub fn pixelated() -> Self {
        Self {
            min_filter: Filter::NearestMipmapNearest,
            mag_filter: Filter::Nearest,
            ..Self::default()
        }
    }

    pub fn flipped(mut self) -> Self {
        self.flip_vertically = true;
        self
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    pub(super) gl: Arc<glow::Context>,
    pub(super) id: glow::Texture,
    pub(super) width: u32,
    pub(super) height: u32,
}

impl Texture {
    /// Creates a new texture from the given [`image::DynamicImage`].
    pub fn new(
        gl: &Arc<glow::Context>,
        image: &DynamicImage,
        options: &TextureOptions,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        let (format, data) = if options.flip_vertically {
            pixel_data(&image.flipv())?
        } else {
            pixel_data(image)?
        };
        Self::from_data(gl, width, height, format, &data, options)
    }

    /// Decodes the image file at `path` and uploads it.
    pub fn from_path(
        gl: &Arc<glow::Context>,
        path: impl AsRef<Path>,
        options: &TextureOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "loaded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Self::new(gl, &image, options)
    }

    /// Creates a new texture from raw, tightly packed pixel data.
    pub fn from_data(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
        options: &TextureOptions,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(Error::Gl(format!(
                "texture data is {} bytes, expected {expected} for {width}x{height} {format:?}",
                data.len()
            )));
        }

        unsafe {
            let texture = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // RGB rows are not 4-byte aligned in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.internal_format(options.srgb) as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            if options.mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, options.wrap.gl_enum());
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, options.wrap.gl_enum());
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                options.min_filter.gl_enum(),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                options.mag_filter.gl_enum(),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    /// A 2x2 magenta/black checker that stands in for textures that failed to load.
    pub fn fallback(gl: &Arc<glow::Context>) -> Result<Self> {
        #[rustfmt::skip]
        let data = [
            255, 0, 255, 255,   0, 0, 0, 255,
            0, 0, 0, 255,       255, 0, 255, 255,
        ];
        Self::from_data(
            gl,
            2,
            2,
            PixelFormat::Rgba,
            &data,
            &TextureOptions::pixelated(),
        )
    }

    /// Loads `path`, logging and substituting [`Texture::fallback`] on failure.
    pub fn from_path_or_fallback(
        gl: &Arc<glow::Context>,
        path: impl AsRef<Path>,
        options: &TextureOptions,
    ) -> Result<Self> {
        match Self::from_path(gl, path, options) {
            Ok(texture) => Ok(texture),
            Err(e) => {
                log::error!("texture failed to load: {e}");
                Self::fallback(gl)
            }
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

/// A cube map texture, faces ordered +X, -X, +Y, -Y, +Z, -Z.
pub struct Cubemap {
    gl: Arc<glow::Context>,
    id: glow::Texture,
}

/// One decoded cube face ready for upload.
struct Face {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Cubemap {
    /// Loads six face images (right, left, top, bottom, front, back).
    ///
    /// The faces are decoded in parallel and uploaded on the calling thread.
    pub fn from_paths<P: AsRef<Path> + Sync>(
        gl: &Arc<glow::Context>,
        paths: &[P; 6],
    ) -> Result<Self> {
        let faces = paths
            .as_slice()
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                let image = image::open(path).map_err(|source| Error::Image {
                    path: path.to_path_buf(),
                    source,
                })?;
                let (width, height) = image.dimensions();
                let (format, data) = pixel_data(&image)?;
                Ok(Face {
                    width,
                    height,
                    format,
                    data,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::upload(gl, &faces)
    }

    /// A 1x1 cube map filled with a single color.
    pub fn solid(gl: &Arc<glow::Context>, rgb: [u8; 3]) -> Result<Self> {
        let face = || Face {
            width: 1,
            height: 1,
            format: PixelFormat::Rgb,
            data: rgb.to_vec(),
        };
        let faces: Vec<Face> = (0..6).map(|_| face()).collect();
        Self::upload(gl, &faces)
    }

    fn upload(gl: &Arc<glow::Context>, faces: &[Face]) -> Result<Self> {
        unsafe {
            let texture = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            for (i, face) in faces.iter().enumerate() {
                gl.tex_image_2d(
                    glow::TEXTURE_CUBE_MAP_POSITIVE_X + i as u32,
                    0,
                    face.format.internal_format(false) as i32,
                    face.width as i32,
                    face.height as i32,
                    0,
                    face.format.gl_format(),
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(Some(face.data.as_slice())),
                );
            }
            for (param, value) in [
                (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
                (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
                (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_R, glow::CLAMP_TO_EDGE),
            ] {
                gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, param, value as i32);
            }
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
            })
        }
    }

    /// Binds the cube map to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(self.id));
        }
    }
}

impl Drop for Cubemap {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn test_channel_count_picks_format() {
        assert_eq!(PixelFormat::from_channels(1).unwrap(), PixelFormat::Red);
        assert_eq!(PixelFormat::from_channels(2).unwrap(), PixelFormat::Rgba);
        assert_eq!(PixelFormat::from_channels(3).unwrap(), PixelFormat::Rgb);
        assert_eq!(PixelFormat::from_channels(4).unwrap(), PixelFormat::Rgba);
        assert!(matches!(
            PixelFormat::from_channels(5),
            Err(Error::UnsupportedChannels(5))
        ));
    }

    #[test]
    fn test_srgb_only_changes_color_formats() {
        assert_eq!(PixelFormat::Red.internal_format(true), glow::R8);
        assert_eq!(PixelFormat::Rgb.internal_format(true), glow::SRGB8);
        assert_eq!(PixelFormat::Rgba.internal_format(false), glow::RGBA8);
    }

    #[test]
    fn test_pixel_data_is_tightly_packed() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_raw(3, 1, vec![1, 2, 3]).unwrap());
        let (format, data) = pixel_data(&gray).unwrap();
        assert_eq!(format, PixelFormat::Red);
        assert_eq!(data, vec![1, 2, 3]);

        let rgb = DynamicImage::ImageRgb8(RgbImage::new(5, 3));
        let (format, data) = pixel_data(&rgb).unwrap();
        assert_eq!(format, PixelFormat::Rgb);
        assert_eq!(data.len(), 5 * 3 * 3);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        let (format, data) = pixel_data(&rgba).unwrap();
        assert_eq!(format, PixelFormat::Rgba);
        assert_eq!(data.len(), 16);
    }

    #[test]
    fn test_luma_alpha_is_expanded() {
        let la = DynamicImage::ImageLumaA8(image::GrayAlphaImage::new(2, 2));
        let (format, data) = pixel_data(&la).unwrap();
        assert_eq!(format, PixelFormat::Rgba);
        assert_eq!(data.len(), 16);
    }

    #[test]
    fn test_option_presets() {
        let clamped = TextureOptions::clamped();
        assert_eq!(clamped.wrap, Wrap::ClampToEdge);
        assert!(clamped.mipmaps);
        let pixelated = TextureOptions::pixelated().flipped();
        assert_eq!(pixelated.mag_filter, Filter::Nearest);
        assert!(pixelated.flip_vertically);
    }
}
