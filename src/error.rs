//! Error type shared by every module of the crate.

use std::path::PathBuf;

use crate::abs::ShaderStage;

/// Everything that can go wrong while setting up or running a tutorial.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader compilation failed:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("shader program linking failed:\n{0}")]
    ShaderLink(String),
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image has {0} color channels, expected 1 to 4")]
    UnsupportedChannels(u8),
    #[error("failed to load model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("framebuffer incomplete (status {0:#x})")]
    FramebufferIncomplete(u32),
    #[error("OpenGL: {0}")]
    Gl(String),
    #[error("window system: {0}")]
    Window(String),
    #[error("invalid settings in {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("logger already initialised: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
