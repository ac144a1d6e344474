//! Module for anything related to rendering.
//!
//! This module contains the shared geometry, the light model and the multi-pass helpers
//! (post-processing, skybox, stencil outlines) the tutorials are built from.

pub mod geometry;
pub mod lighting;
pub mod outline;
pub mod postprocess;
pub mod skybox;
