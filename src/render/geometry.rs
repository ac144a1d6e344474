//! Vertex layouts and the hard-coded shapes the tutorials draw.

use std::mem::{offset_of, size_of};

use glam::{Vec2, Vec3};
use glow::HasContext;

use crate::abs::Vertex;

/// Enables attribute `index` as `size` floats at `offset` bytes into a vertex of `stride` bytes.
fn float_attrib(gl: &glow::Context, index: u32, size: i32, stride: usize, offset: usize) {
    unsafe {
        gl.enable_vertex_attrib_array(index);
        gl.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride as i32, offset as i32);
    }
}

/// Position only. Used for the skybox and light markers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl Vertex for PositionVertex {
    fn vertex_attribs(gl: &glow::Context) {
        float_attrib(gl, 0, 3, size_of::<Self>(), 0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl Vertex for ColorVertex {
    fn vertex_attribs(gl: &glow::Context) {
        let stride = size_of::<Self>();
        float_attrib(gl, 0, 3, stride, 0);
        float_attrib(gl, 1, 3, stride, offset_of!(Self, color));
    }
}

/// Position, vertex color and one set of texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct TexturedVertex {
    pub position: Vec3,
    pub color: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex for TexturedVertex {
    fn vertex_attribs(gl: &glow::Context) {
        let stride = size_of::<Self>();
        float_attrib(gl, 0, 3, stride, 0);
        float_attrib(gl, 1, 3, stride, offset_of!(Self, color));
        float_attrib(gl, 2, 2, stride, offset_of!(Self, tex_coords));
    }
}

/// Position, normal and texture coordinates: the layout of loaded models and lit cubes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct ModelVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex for ModelVertex {
    fn vertex_attribs(gl: &glow::Context) {
        let stride = size_of::<Self>();
        float_attrib(gl, 0, 3, stride, 0);
        float_attrib(gl, 1, 3, stride, offset_of!(Self, normal));
        float_attrib(gl, 2, 2, stride, offset_of!(Self, tex_coords));
    }
}

/// A vertex of the full-screen quad, in normalized device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ScreenVertex {
    pub position: Vec2,
    pub tex_coords: Vec2,
}

impl Vertex for ScreenVertex {
    fn vertex_attribs(gl: &glow::Context) {
        let stride = size_of::<Self>();
        float_attrib(gl, 0, 2, stride, 0);
        float_attrib(gl, 1, 2, stride, offset_of!(Self, tex_coords));
    }
}

/// World positions of the ten cubes in the camera and lighting scenes.
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

pub const POINT_LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

pub fn triangle() -> [ColorVertex; 3] {
    [
        ColorVertex {
            position: Vec3::new(-0.5, -0.5, 0.0),
            color: Vec3::new(1.0, 0.0, 0.0),
        },
        ColorVertex {
            position: Vec3::new(0.5, -0.5, 0.0),
            color: Vec3::new(0.0, 1.0, 0.0),
        },
        ColorVertex {
            position: Vec3::new(0.0, 0.5, 0.0),
            color: Vec3::new(0.0, 0.0, 1.0),
        },
    ]
}

/// A unit rectangle in the XY plane as four corners and two triangles.
pub fn rectangle() -> ([TexturedVertex; 4], [u32; 6]) {
    let vertex = |x: f32, y: f32, color: Vec3, u: f32, v: f32| TexturedVertex {
        position: Vec3::new(x, y, 0.0),
        color,
        tex_coords: Vec2::new(u, v),
    };
    let vertices = [
        vertex(0.5, 0.5, Vec3::X, 1.0, 1.0),        // top right
        vertex(0.5, -0.5, Vec3::Y, 1.0, 0.0),       // bottom right
        vertex(-0.5, -0.5, Vec3::Z, 0.0, 0.0),      // bottom left
        vertex(-0.5, 0.5, Vec3::new(1.0, 1.0, 0.0), 0.0, 1.0), // top left
    ];
    (vertices, [0, 1, 3, 1, 2, 3])
}

/// Outward normal and in-plane axes (u, v) of the six cube faces, counter-clockwise seen
/// from outside.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
];

/// A unit cube centred at the origin: 36 vertices, two triangles per face.
pub fn cube() -> Vec<ModelVertex> {
    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in CUBE_FACES {
        let corner = |s: f32, t: f32| ModelVertex {
            position: normal * 0.5 + u * (s - 0.5) + v * (t - 0.5),
            normal,
            tex_coords: Vec2::new(s, t),
        };
        let quad = [corner(0.0, 0.0), corner(1.0, 0.0), corner(1.0, 1.0), corner(0.0, 1.0)];
        vertices.extend([quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]);
    }
    vertices
}

/// Cube positions for the skybox, wound to be seen from inside.
pub fn skybox_cube() -> Vec<PositionVertex> {
    cube()
        .chunks_exact(3)
        .flat_map(|tri| [tri[0], tri[2], tri[1]])
        .map(|v| PositionVertex {
            position: v.position * 2.0,
        })
        .collect()
}

/// A square floor in the XZ plane at height `y`, texture repeated `repeat` times.
pub fn plane(half_size: f32, y: f32, repeat: f32) -> Vec<ModelVertex> {
    let corner = |x: f32, z: f32, s: f32, t: f32| ModelVertex {
        position: Vec3::new(x * half_size, y, z * half_size),
        normal: Vec3::Y,
        tex_coords: Vec2::new(s * repeat, t * repeat),
    };
    vec![
        corner(1.0, 1.0, 1.0, 0.0),
        corner(1.0, -1.0, 1.0, 1.0),
        corner(-1.0, -1.0, 0.0, 1.0),
        corner(1.0, 1.0, 1.0, 0.0),
        corner(-1.0, -1.0, 0.0, 1.0),
        corner(-1.0, 1.0, 0.0, 0.0),
    ]
}

/// Two triangles covering all of normalized device space.
pub fn screen_quad() -> [ScreenVertex; 6] {
    let v = |x: f32, y: f32| ScreenVertex {
        position: Vec2::new(x, y),
        tex_coords: Vec2::new((x + 1.0) / 2.0, (y + 1.0) / 2.0),
    };
    [
        v(-1.0, 1.0),
        v(-1.0, -1.0),
        v(1.0, -1.0),
        v(-1.0, 1.0),
        v(1.0, -1.0),
        v(1.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Normal of a triangle from its counter-clockwise winding.
    fn winding_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_vertex_layouts_are_tightly_packed() {
        assert_eq!(size_of::<PositionVertex>(), 12);
        assert_eq!(size_of::<ColorVertex>(), 24);
        assert_eq!(size_of::<TexturedVertex>(), 32);
        assert_eq!(size_of::<ModelVertex>(), 32);
        assert_eq!(offset_of!(ModelVertex, tex_coords), 24);
        assert_eq!(size_of::<ScreenVertex>(), 16);
    }

    #[test]
    fn test_cube_faces_wind_outwards() {
        let cube = cube();
        assert_eq!(cube.len(), 36);
        for tri in cube.chunks_exact(3) {
            let n = winding_normal(tri[0].position, tri[1].position, tri[2].position);
            assert!(n.abs_diff_eq(tri[0].normal, 1e-5), "{n} vs {}", tri[0].normal);
            for v in tri {
                assert_eq!(v.position.abs().max_element(), 0.5);
                assert_eq!(v.position.dot(v.normal), 0.5);
            }
        }
    }

    #[test]
    fn test_skybox_winds_inwards() {
        let sky = skybox_cube();
        assert_eq!(sky.len(), 36);
        for tri in sky.chunks_exact(3) {
            let n = winding_normal(tri[0].position, tri[1].position, tri[2].position);
            let centre = (tri[0].position + tri[1].position + tri[2].position) / 3.0;
            assert!(n.dot(centre) < 0.0);
        }
    }

    #[test]
    fn test_rectangle_indices_cover_both_triangles() {
        let (vertices, indices) = rectangle();
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        let mut used: Vec<u32> = indices.to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_screen_quad_maps_ndc_to_uv() {
        for v in screen_quad() {
            assert_eq!(v.tex_coords, (v.position + Vec2::ONE) / 2.0);
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let plane = plane(5.0, -0.5, 2.0);
        for tri in plane.chunks_exact(3) {
            let n = winding_normal(tri[0].position, tri[1].position, tri[2].position);
            assert!(n.abs_diff_eq(Vec3::Y, 1e-5));
        }
        assert!(plane.iter().all(|v| v.tex_coords.max_element() <= 2.0));
    }
}
