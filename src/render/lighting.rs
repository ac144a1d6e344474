//! Phong light sources and their uniform layout.
//!
//! The `lighting` shader declares `dir_light`, `point_lights[MAX_POINT_LIGHTS]`,
//! `point_light_count`, `spot_light` and `spot_light_enabled`; [`LightSetup::apply`]
//! fills all of them.

use glam::Vec3;

use crate::abs::ShaderProgram;

/// Upper bound of the `point_lights` array in the lighting shader.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

/// `(range, linear, quadratic)` rows of the usual point-light range table.
const RANGE_TABLE: [(f32, f32, f32); 12] = [
    (7.0, 0.7, 1.8),
    (13.0, 0.35, 0.44),
    (20.0, 0.22, 0.20),
    (32.0, 0.14, 0.07),
    (50.0, 0.09, 0.032),
    (65.0, 0.07, 0.017),
    (100.0, 0.045, 0.0075),
    (160.0, 0.027, 0.0028),
    (200.0, 0.022, 0.0019),
    (325.0, 0.014, 0.0007),
    (600.0, 0.007, 0.0002),
    (3250.0, 0.0014, 0.000007),
];

impl Default for Attenuation {
    fn default() -> Self {
        Self::for_range(50.0)
    }
}

impl Attenuation {
    /// Coefficients of the smallest table entry that still covers `range`.
    pub fn for_range(range: f32) -> Self {
        let (_, linear, quadratic) = RANGE_TABLE
            .iter()
            .copied()
            .find(|(r, _, _)| *r >= range)
            .unwrap_or(RANGE_TABLE[RANGE_TABLE.len() - 1]);
        Self {
            constant: 1.0,
            linear,
            quadratic,
        }
    }

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }

    fn apply(&self, shader: &ShaderProgram, name: &str) {
        shader.set_uniform(&format!("{name}.constant"), self.constant);
        shader.set_uniform(&format!("{name}.linear"), self.linear);
        shader.set_uniform(&format!("{name}.quadratic"), self.quadratic);
    }
}

/// Ambient, diffuse and specular intensity of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightColor {
    /// A white-ish light with the given diffuse strength.
    pub fn white(ambient: f32, diffuse: f32) -> Self {
        Self {
            ambient: Vec3::splat(ambient),
            diffuse: Vec3::splat(diffuse),
            specular: Vec3::ONE,
        }
    }

    fn apply(&self, shader: &ShaderProgram, name: &str) {
        shader.set_uniform(&format!("{name}.ambient"), self.ambient);
        shader.set_uniform(&format!("{name}.diffuse"), self.diffuse);
        shader.set_uniform(&format!("{name}.specular"), self.specular);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: LightColor,
}

impl DirectionalLight {
    pub fn apply(&self, shader: &ShaderProgram, name: &str) {
        shader.set_uniform(&format!("{name}.direction"), self.direction);
        self.color.apply(shader, name);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: LightColor,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn apply(&self, shader: &ShaderProgram, name: &str) {
        shader.set_uniform(&format!("{name}.position"), self.position);
        self.color.apply(shader, name);
        self.attenuation.apply(shader, name);
    }
}

/// A cone light. Cut-off angles are half-angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub color: LightColor,
    pub attenuation: Attenuation,
}

impl SpotLight {
    /// Edge softness for a fragment at `angle` degrees off the cone axis:
    /// 1 inside `cut_off`, 0 outside `outer_cut_off`, linear in cosine between.
    /// Equal cut-offs give a hard edge.
    pub fn intensity(&self, angle: f32) -> f32 {
        let theta = angle.to_radians().cos();
        let inner = self.cut_off.to_radians().cos();
        let outer = self.outer_cut_off.to_radians().cos();
        let epsilon = inner - outer;
        if epsilon.abs() < f32::EPSILON {
            return if theta >= inner { 1.0 } else { 0.0 };
        }
        ((theta - outer) / epsilon).clamp(0.0, 1.0)
    }

    /// Uploads the light; cut-offs are sent as cosines.
    pub fn apply(&self, shader: &ShaderProgram, name: &str) {
        shader.set_uniform(&format!("{name}.position"), self.position);
        shader.set_uniform(&format!("{name}.direction"), self.direction);
        shader.set_uniform(&format!("{name}.cut_off"), self.cut_off.to_radians().cos());
        shader.set_uniform(
            &format!("{name}.outer_cut_off"),
            self.outer_cut_off.to_radians().cos(),
        );
        self.color.apply(shader, name);
        self.attenuation.apply(shader, name);
    }
}

/// Every light of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSetup {
    pub directional: DirectionalLight,
    pub points: Vec<PointLight>,
    pub spot: Option<SpotLight>,
}

impl LightSetup {
    /// The lighting used by the multi-light tutorial: a dim sun, four point lights at
    /// `positions` and no flashlight.
    pub fn with_point_lights(positions: &[glam::Vec3]) -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(-0.2, -1.0, -0.3),
                color: LightColor {
                    ambient: Vec3::splat(0.05),
                    diffuse: Vec3::splat(0.4),
                    specular: Vec3::splat(0.5),
                },
            },
            points: positions
                .iter()
                .map(|&position| PointLight {
                    position,
                    color: LightColor::white(0.05, 0.8),
                    attenuation: Attenuation::for_range(50.0),
                })
                .collect(),
            spot: None,
        }
    }

    /// Uploads every light. Point lights beyond [`MAX_POINT_LIGHTS`] are dropped.
    pub fn apply(&self, shader: &ShaderProgram) {
        self.directional.apply(shader, "dir_light");
        if self.points.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights given, only the first {MAX_POINT_LIGHTS} are used",
                self.points.len()
            );
        }
        let count = self.points.len().min(MAX_POINT_LIGHTS);
        for (i, light) in self.points.iter().take(count).enumerate() {
            light.apply(shader, &format!("point_lights[{i}]"));
        }
        shader.set_uniform("point_light_count", count as i32);
        shader.set_uniform("spot_light_enabled", self.spot.is_some());
        if let Some(spot) = &self.spot {
            spot.apply(shader, "spot_light");
        }
    }
}

/// A flashlight attached to the camera.
pub fn flashlight(position: Vec3, direction: Vec3) -> SpotLight {
    SpotLight {
        position,
        direction,
        cut_off: 12.5,
        outer_cut_off: 15.0,
        color: LightColor {
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        },
        attenuation: Attenuation::for_range(50.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_table_lookup() {
        let a = Attenuation::for_range(50.0);
        assert_eq!((a.constant, a.linear, a.quadratic), (1.0, 0.09, 0.032));
        let b = Attenuation::for_range(51.0);
        assert_eq!(b.linear, 0.07);
        let c = Attenuation::for_range(1.0);
        assert_eq!(c.linear, 0.7);
        let d = Attenuation::for_range(1.0e6);
        assert_eq!(d.quadratic, 0.000007);
    }

    #[test]
    fn test_attenuation_falls_off() {
        let a = Attenuation::for_range(32.0);
        assert_eq!(a.factor(0.0), 1.0);
        assert!(a.factor(1.0) > a.factor(10.0));
        assert!(a.factor(32.0) < 0.05);
    }

    #[test]
    fn test_spot_intensity_is_soft_between_cut_offs() {
        let spot = flashlight(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(spot.intensity(0.0), 1.0);
        assert_eq!(spot.intensity(12.0), 1.0);
        let edge = spot.intensity(13.75);
        assert!(edge > 0.0 && edge < 1.0);
        assert_eq!(spot.intensity(15.5), 0.0);
        assert_eq!(spot.intensity(90.0), 0.0);
    }

    #[test]
    fn test_spot_with_equal_cut_offs_has_a_hard_edge() {
        let spot = SpotLight {
            outer_cut_off: 12.5,
            ..flashlight(Vec3::ZERO, Vec3::NEG_Z)
        };
        assert_eq!(spot.cut_off, spot.outer_cut_off);
        assert_eq!(spot.intensity(0.0), 1.0);
        assert_eq!(spot.intensity(12.0), 1.0);
        assert_eq!(spot.intensity(13.0), 0.0);
        assert!(!spot.intensity(12.5).is_nan());
    }

    #[test]
    fn test_default_setup_has_one_light_per_position() {
        let setup = LightSetup::with_point_lights(&crate::render::geometry::POINT_LIGHT_POSITIONS);
        assert_eq!(setup.points.len(), MAX_POINT_LIGHTS);
        assert!(setup.spot.is_none());
        assert_eq!(setup.points[3].position, Vec3::new(0.0, 0.0, -3.0));
    }
}
