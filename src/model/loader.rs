//! CPU side of model loading: Wavefront OBJ/MTL files into packed vertex and index arrays.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use indexmap::IndexSet;

use crate::{
    error::{Error, Result},
    render::geometry::ModelVertex,
};

/// Shininess used when a material does not specify `Ns`.
pub const DEFAULT_SHININESS: f32 = 32.0;

/// What a material texture is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Sampler name prefix in the shaders, completed with a per-kind index.
    pub fn sampler_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

/// A texture referenced by a material, `path` relative to the model's directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub kind: TextureKind,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    /// Diffuse maps first, then specular, normal and height maps.
    pub textures: Vec<TextureRef>,
    pub shininess: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneData {
    /// Directory texture paths are resolved against.
    pub directory: PathBuf,
    pub meshes: Vec<MeshData>,
}

impl SceneData {
    /// Every referenced texture once, in order of first use.
    pub fn unique_textures(&self) -> Vec<&TextureRef> {
        let mut seen = IndexSet::new();
        self.meshes
            .iter()
            .flat_map(|mesh| &mesh.textures)
            .filter(|texture| seen.insert(texture.path.as_str()))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len()).sum()
    }
}

/// Reads an OBJ file and the materials it references.
///
/// Faces are triangulated and every vertex gets a single index. Texture V coordinates are
/// flipped because images are uploaded top row first. An unreadable material library is
/// logged and leaves the meshes untextured.
pub fn load_scene(path: &Path) -> Result<SceneData> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options).map_err(|source| Error::Model {
        path: path.to_path_buf(),
        source,
    })?;
    let materials = materials.unwrap_or_else(|e| {
        log::warn!("{}: materials unavailable: {e}", path.display());
        Vec::new()
    });

    let meshes = models
        .iter()
        .map(|model| mesh_data(model, &materials))
        .collect();

    Ok(SceneData {
        directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        meshes,
    })
}

fn mesh_data(model: &tobj::Model, materials: &[tobj::Material]) -> MeshData {
    let mesh = &model.mesh;
    let vec3 = |data: &[f32], i: usize| data.get(i * 3..i * 3 + 3).map(Vec3::from_slice);

    let mut vertices: Vec<ModelVertex> = (0..mesh.positions.len() / 3)
        .map(|i| ModelVertex {
            position: vec3(&mesh.positions, i).unwrap_or_default(),
            normal: vec3(&mesh.normals, i).unwrap_or_default(),
            tex_coords: mesh
                .texcoords
                .get(i * 2..i * 2 + 2)
                .map_or(Vec2::ZERO, |uv| Vec2::new(uv[0], 1.0 - uv[1])),
        })
        .collect();

    if mesh.normals.is_empty() {
        generate_normals(&mut vertices, &mesh.indices);
    }

    let material = mesh.material_id.and_then(|id| materials.get(id));
    if mesh.material_id.is_some() && material.is_none() {
        log::warn!("mesh '{}' references a missing material", model.name);
    }

    MeshData {
        name: model.name.clone(),
        vertices,
        indices: mesh.indices.clone(),
        textures: material.map(material_textures).unwrap_or_default(),
        shininess: material
            .and_then(|m| m.shininess)
            .filter(|s| *s > 0.0)
            .unwrap_or(DEFAULT_SHININESS),
    }
}

fn material_textures(material: &tobj::Material) -> Vec<TextureRef> {
    // tobj reads `map_Bump`/`bump` into `normal_texture`; those are height maps.
    // Tangent-space normal maps use `norm` (or `map_Kn`) and land in `unknown_param`.
    let normal_map = ["norm", "map_Kn"]
        .iter()
        .find_map(|key| material.unknown_param.get(*key))
        .map(String::as_str);
    let slots = [
        (TextureKind::Diffuse, material.diffuse_texture.as_deref()),
        (TextureKind::Specular, material.specular_texture.as_deref()),
        (TextureKind::Normal, normal_map),
        (TextureKind::Height, material.normal_texture.as_deref()),
    ];
    slots
        .into_iter()
        .filter_map(|(kind, path)| {
            let path = path?.trim();
            (!path.is_empty()).then(|| TextureRef {
                kind,
                // Exporters on Windows write backslash separators.
                path: path.replace('\\', "/"),
            })
        })
        .collect()
}

/// Smooth vertex normals: the area-weighted sum of the adjacent face normals.
pub fn generate_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    for vertex in vertices.iter_mut() {
        vertex.normal = Vec3::ZERO;
    }
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a.max(b).max(c) >= vertices.len() {
            continue;
        }
        let face = (vertices[b].position - vertices[a].position)
            .cross(vertices[c].position - vertices[a].position);
        for i in [a, b, c] {
            vertices[i].normal += face;
        }
    }
    for vertex in vertices.iter_mut() {
        vertex.normal = vertex.normal.normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A scratch directory removed when dropped.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "learngl-{name}-{}",
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &str) -> PathBuf {
            let path = self.0.join(file);
            std::fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.0).ok();
        }
    }

    const OBJ: &str = "\
mtllib scene.mtl
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl boxes
f 1/1/1 2/2/1 3/3/1 4/4/1
o tri
v 0 0 1
v 1 0 1
v 0 1 1
vt 0 0.25
usemtl boxes
f 5/5 6/5 7/5
";

    const MTL: &str = "\
newmtl boxes
Ns 64
map_Kd textures\\diffuse.png
map_Ks specular.png
map_Bump height.png
norm normal.png
disp displacement.png
";

    #[test]
    fn test_load_scene_packs_meshes() {
        let dir = ScratchDir::new("scene");
        let obj = dir.write("scene.obj", OBJ);
        dir.write("scene.mtl", MTL);

        let scene = load_scene(&obj).unwrap();
        assert_eq!(scene.directory, dir.0);
        assert_eq!(scene.meshes.len(), 2);

        let quad = &scene.meshes[0];
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices.len(), 6);
        assert_eq!(quad.shininess, 64.0);
        assert!(quad.vertices.iter().all(|v| v.normal == Vec3::Z));
        // `vt 0 1` lands at v = 0 after the flip.
        let top_left = quad
            .vertices
            .iter()
            .find(|v| v.position == Vec3::new(0.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(top_left.tex_coords, Vec2::new(0.0, 0.0));

        let tri = &scene.meshes[1];
        assert_eq!(tri.indices.len(), 3);
        assert!(tri.vertices.iter().all(|v| v.tex_coords == Vec2::new(0.0, 0.75)));
        // No `vn` lines: normals are generated from the winding.
        assert!(tri.vertices.iter().all(|v| v.normal.abs_diff_eq(Vec3::Z, 1e-6)));
        assert_eq!(scene.vertex_count(), 7);
    }

    #[test]
    fn test_material_textures_are_ordered_and_deduplicated() {
        let dir = ScratchDir::new("textures");
        let obj = dir.write("scene.obj", OBJ);
        dir.write("scene.mtl", MTL);

        let scene = load_scene(&obj).unwrap();
        let kinds: Vec<TextureKind> = scene.meshes[0].textures.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TextureKind::Diffuse,
                TextureKind::Specular,
                TextureKind::Normal,
                TextureKind::Height
            ]
        );
        let paths: Vec<&str> = scene.meshes[0]
            .textures
            .iter()
            .map(|t| t.path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["textures/diffuse.png", "specular.png", "normal.png", "height.png"]
        );

        let unique = scene.unique_textures();
        assert_eq!(unique.len(), 4);
        assert_eq!(unique[0].path, "textures/diffuse.png");
        assert_eq!(unique[3].path, "height.png");
        // Displacement maps are not sampled by any shader.
        assert!(unique.iter().all(|t| t.path != "displacement.png"));
    }

    #[test]
    fn test_map_kn_is_a_normal_map() {
        let dir = ScratchDir::new("map-kn");
        let obj = dir.write("scene.obj", OBJ);
        dir.write("scene.mtl", "newmtl boxes\nmap_Kd diffuse.png\nmap_Kn normal.png\n");

        let scene = load_scene(&obj).unwrap();
        let textures = &scene.meshes[0].textures;
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[1].kind, TextureKind::Normal);
        assert_eq!(textures[1].path, "normal.png");
    }

    #[test]
    fn test_missing_material_library_leaves_meshes_untextured() {
        let dir = ScratchDir::new("nomtl");
        let obj = dir.write("scene.obj", &OBJ.replace("scene.mtl", "missing.mtl"));

        let scene = load_scene(&obj).unwrap();
        assert_eq!(scene.meshes.len(), 2);
        assert!(scene.meshes.iter().all(|m| m.textures.is_empty()));
        assert!(scene.meshes.iter().all(|m| m.shininess == DEFAULT_SHININESS));
    }

    #[test]
    fn test_missing_file_is_a_model_error() {
        let path = std::env::temp_dir().join("learngl-no-such-model.obj");
        assert!(matches!(load_scene(&path), Err(Error::Model { .. })));
    }

    #[test]
    fn test_generated_normals_are_smoothed() {
        let vertex = |x: f32, y: f32, z: f32| ModelVertex {
            position: Vec3::new(x, y, z),
            ..ModelVertex::default()
        };
        // Two faces of a cube corner sharing the edge 0-1.
        let mut vertices = vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(0.0, 0.0, 1.0),
        ];
        generate_normals(&mut vertices, &[0, 1, 2, 0, 1, 3]);
        assert!(vertices[2].normal.abs_diff_eq(Vec3::Z, 1e-6));
        assert!(vertices[3].normal.abs_diff_eq(Vec3::NEG_Y, 1e-6));
        let shared = Vec3::new(0.0, -1.0, 1.0).normalize();
        assert!(vertices[0].normal.abs_diff_eq(shared, 1e-6));
        assert!(vertices[1].normal.abs_diff_eq(shared, 1e-6));
    }

    #[test]
    fn test_out_of_range_indices_are_skipped() {
        let mut vertices = vec![ModelVertex::default(); 2];
        generate_normals(&mut vertices, &[0, 1, 7]);
        assert!(vertices.iter().all(|v| v.normal == Vec3::ZERO));
    }
}
