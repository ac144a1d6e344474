//! A series of small OpenGL 3.3 programs, from a first triangle to loaded models.
//!
//! The library holds what the programs share: thin wrappers over GL objects ([`abs`]),
//! a fly [`camera`], input state, settings, model loading and a handful of multi-pass
//! rendering helpers. Every program in `src/bin` implements [`scene::Scene`] and hands it
//! to [`scene::run`].

pub mod abs;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod render;
pub mod scene;

pub use error::{Error, Result};

/// Builds a [`abs::ShaderProgram`] from `src/shaders/<name>/vert.glsl` and `frag.glsl`,
/// embedded at compile time. Evaluates to a [`Result`].
#[macro_export]
macro_rules! shader_program {
    ($name:ident, $gl:expr) => {
        $crate::abs::ShaderProgram::from_sources(
            &$gl,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/src/shaders/",
                stringify!($name),
                "/vert.glsl"
            )),
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/src/shaders/",
                stringify!($name),
                "/frag.glsl"
            )),
        )
    };
}
