//! Models loaded from disk: a list of meshes, each with its material textures.
//!
//! [`loader`] turns the file into plain vertex/index arrays; [`Model::load`] uploads them
//! and shares every texture file between the meshes that use it.

pub mod loader;

use std::{path::Path, rc::Rc, sync::Arc, time::Instant};

use fxhash::FxBuildHasher;
use glow::HasContext;
use image::DynamicImage;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;

pub use loader::{MeshData, SceneData, TextureKind, TextureRef};

use crate::{
    abs::{Mesh, ShaderProgram, Texture, TextureOptions},
    error::{Error, Result},
};

/// Uploaded textures keyed by their path relative to the model and whether they were
/// uploaded as sRGB, in load order.
type TextureCache = IndexMap<(String, bool), Rc<Texture>, FxBuildHasher>;

/// Whether a texture of `kind` holds colour data to be linearised by the sampler.
fn is_srgb(kind: TextureKind, gamma: bool) -> bool {
    gamma && kind == TextureKind::Diffuse
}

/// Every texture upload the scene needs, in order of first use. A file used both as a
/// colour map and as a data map is uploaded once per encoding.
pub fn texture_uploads(scene: &SceneData, gamma: bool) -> Vec<(&TextureRef, bool)> {
    let mut seen = IndexSet::new();
    scene
        .meshes
        .iter()
        .flat_map(|mesh| &mesh.textures)
        .map(|tex| (tex, is_srgb(tex.kind, gamma)))
        .filter(|&(tex, srgb)| seen.insert((tex.path.as_str(), srgb)))
        .collect()
}

/// The sampler uniform for each texture: `material.<prefix><n>`, where `n` counts
/// textures of the same kind from 0.
pub fn sampler_names(kinds: impl IntoIterator<Item = TextureKind>) -> Vec<String> {
    let mut counters = [0usize; 4];
    kinds
        .into_iter()
        .map(|kind| {
            let counter = &mut counters[kind as usize];
            let name = format!("material.{}{}", kind.sampler_prefix(), counter);
            *counter += 1;
            name
        })
        .collect()
}

/// A texture as used by one mesh.
pub struct MaterialTexture {
    pub texture: Rc<Texture>,
    pub kind: TextureKind,
    pub path: String,
}

pub struct ModelMesh {
    pub name: String,
    mesh: Mesh,
    textures: Vec<MaterialTexture>,
    samplers: Vec<String>,
    shininess: f32,
}

impl ModelMesh {
    fn new(
        gl: &Arc<glow::Context>,
        data: &MeshData,
        cache: &TextureCache,
        gamma: bool,
    ) -> Result<Self> {
        let mesh = Mesh::new(gl, &data.vertices, &data.indices, glow::TRIANGLES)?;
        let textures: Vec<MaterialTexture> = data
            .textures
            .iter()
            .filter_map(|tex| {
                let key = (tex.path.clone(), is_srgb(tex.kind, gamma));
                cache.get(&key).map(|texture| MaterialTexture {
                    texture: Rc::clone(texture),
                    kind: tex.kind,
                    path: tex.path.clone(),
                })
            })
            .collect();
        let samplers = sampler_names(textures.iter().map(|t| t.kind));
        Ok(Self {
            name: data.name.clone(),
            mesh,
            textures,
            samplers,
            shininess: data.shininess,
        })
    }

    pub fn textures(&self) -> &[MaterialTexture] {
        &self.textures
    }

    /// Binds texture `i` to unit `i`, points its sampler there and draws.
    pub fn draw(&self, shader: &ShaderProgram) {
        for (unit, (texture, sampler)) in self.textures.iter().zip(&self.samplers).enumerate() {
            shader.set_uniform(sampler, unit as i32);
            texture.texture.bind(unit as u32);
        }
        shader.set_uniform("material.shininess", self.shininess);
        self.mesh.draw();
    }
}

pub struct Model {
    gl: Arc<glow::Context>,
    meshes: Vec<ModelMesh>,
    texture_count: usize,
}

impl Model {
    /// Loads the model at `path` and uploads its meshes and textures.
    ///
    /// With `gamma` set, diffuse maps are uploaded as sRGB. Textures that fail to load are
    /// logged and replaced with [`Texture::fallback`].
    pub fn load(gl: &Arc<glow::Context>, path: impl AsRef<Path>, gamma: bool) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();
        let scene = loader::load_scene(path)?;
        let cache = load_textures(gl, &scene, gamma)?;
        let meshes = scene
            .meshes
            .iter()
            .map(|data| ModelMesh::new(gl, data, &cache, gamma))
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "loaded {} ({} meshes, {} vertices, {} textures) in {:?}",
            path.display(),
            meshes.len(),
            scene.vertex_count(),
            cache.len(),
            start.elapsed()
        );
        let files = scene.unique_textures().len();
        if files != cache.len() {
            log::debug!("{files} texture files uploaded as {} textures", cache.len());
        }

        Ok(Self {
            gl: Arc::clone(gl),
            meshes,
            texture_count: cache.len(),
        })
    }

    pub fn meshes(&self) -> &[ModelMesh] {
        &self.meshes
    }

    /// Number of textures uploaded for this model.
    pub fn texture_count(&self) -> usize {
        self.texture_count
    }

    pub fn draw(&self, shader: &ShaderProgram) {
        for mesh in &self.meshes {
            mesh.draw(shader);
        }
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
        }
    }
}

/// Decodes every texture upload of the scene in parallel, then uploads them in order.
fn load_textures(gl: &Arc<glow::Context>, scene: &SceneData, gamma: bool) -> Result<TextureCache> {
    let decoded: Vec<(&TextureRef, bool, Result<DynamicImage>)> = texture_uploads(scene, gamma)
        .into_par_iter()
        .map(|(tex, srgb)| {
            let path = scene.directory.join(&tex.path);
            let image = image::open(&path).map_err(|source| Error::Image { path, source });
            (tex, srgb, image)
        })
        .collect();

    let mut cache = TextureCache::default();
    for (tex, srgb, image) in decoded {
        let options = TextureOptions {
            srgb,
            ..TextureOptions::default()
        };
        let texture = match image.and_then(|image| Texture::new(gl, &image, &options)) {
            Ok(texture) => texture,
            Err(e) => {
                log::error!("texture failed to load at path {}: {e}", tex.path);
                Texture::fallback(gl)?
            }
        };
        cache.insert((tex.path.clone(), srgb), Rc::new(texture));
    }
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_counters_are_per_kind() {
        let names = sampler_names([
            TextureKind::Diffuse,
            TextureKind::Diffuse,
            TextureKind::Specular,
            TextureKind::Specular,
            TextureKind::Normal,
            TextureKind::Height,
            TextureKind::Diffuse,
        ]);
        assert_eq!(
            names,
            vec![
                "material.texture_diffuse0",
                "material.texture_diffuse1",
                "material.texture_specular0",
                "material.texture_specular1",
                "material.texture_normal0",
                "material.texture_height0",
                "material.texture_diffuse2",
            ]
        );
    }

    #[test]
    fn test_no_textures_no_samplers() {
        assert!(sampler_names(std::iter::empty()).is_empty());
    }

    fn mesh_with(textures: &[(TextureKind, &str)]) -> MeshData {
        MeshData {
            name: "mesh".to_string(),
            vertices: Vec::new(),
            indices: Vec::new(),
            textures: textures
                .iter()
                .map(|&(kind, path)| TextureRef {
                    kind,
                    path: path.to_string(),
                })
                .collect(),
            shininess: 32.0,
        }
    }

    #[test]
    fn test_shared_file_is_uploaded_per_encoding() {
        let scene = SceneData {
            directory: "models".into(),
            meshes: vec![
                mesh_with(&[(TextureKind::Diffuse, "atlas.png")]),
                mesh_with(&[
                    (TextureKind::Diffuse, "atlas.png"),
                    (TextureKind::Specular, "atlas.png"),
                    (TextureKind::Normal, "normal.png"),
                ]),
            ],
        };

        let gamma: Vec<_> = texture_uploads(&scene, true)
            .into_iter()
            .map(|(tex, srgb)| (tex.path.as_str(), srgb))
            .collect();
        assert_eq!(
            gamma,
            vec![("atlas.png", true), ("atlas.png", false), ("normal.png", false)]
        );

        let linear: Vec<_> = texture_uploads(&scene, false)
            .into_iter()
            .map(|(tex, srgb)| (tex.path.as_str(), srgb))
            .collect();
        assert_eq!(linear, vec![("atlas.png", false), ("normal.png", false)]);
        assert_eq!(scene.unique_textures().len(), 2);
    }
}
