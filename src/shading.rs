//! Per-pixel shading model shared by the text and cube materials.
//!
//! These functions are the reference for the WGSL in
//! [`crate::render::shaders`]; both must compute the same colours. Sums are
//! never clamped: values above 1.0 are expected and saturate on display.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::material::{BlinnPhong, Glow, Material};

/// Exponent of the cube's mirror highlight.
pub const GLOW_SPECULAR_POWER: i32 = 16;

/// Values the frame loop hands to every shading invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs {
    pub time: f32,
    pub light_position: Vec3,
    pub view_position: Vec3,
}

/// Interpolated geometry for a single fragment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub position: Vec3,
    pub normal: Vec3,
    /// Rim term produced by the glow material's vertex stage. Ignored by
    /// Blinn-Phong materials.
    pub glow_intensity: f32,
}

impl SurfacePoint {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            glow_intensity: 0.0,
        }
    }

    pub fn with_glow_intensity(mut self, glow_intensity: f32) -> Self {
        self.glow_intensity = glow_intensity;
        self
    }
}

/// Evaluates the material at one surface point and returns an opaque colour.
pub fn shade(material: &Material, surface: &SurfacePoint, frame: &FrameInputs) -> Vec4 {
    let color = match material {
        Material::BlinnPhong(params) => blinn_phong_terms(params, surface, frame).total(),
        Material::Glow(params) => glow_terms(params, surface, frame).total(),
    };
    color.extend(1.0)
}

/// Individual contributions of the Blinn-Phong model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinnPhongTerms {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl BlinnPhongTerms {
    pub fn total(&self) -> Vec3 {
        self.ambient + self.diffuse + self.specular
    }
}

pub fn blinn_phong_terms(
    params: &BlinnPhong,
    surface: &SurfacePoint,
    frame: &FrameInputs,
) -> BlinnPhongTerms {
    let normal = surface.normal.normalize_or_zero();
    let light_dir = (frame.light_position - surface.position).normalize_or_zero();
    let view_dir = (frame.view_position - surface.position).normalize_or_zero();
    let half_dir = (light_dir + view_dir).normalize_or_zero();

    let ambient = params.base_color * params.ambient_intensity;
    let lambert = normal.dot(light_dir).max(0.0);
    let diffuse = lambert * params.base_color;
    // A surface turned away from the light gets no highlight either.
    let specular = if lambert > 0.0 {
        normal.dot(half_dir).max(0.0).powf(params.shininess) * params.specular_tint()
    } else {
        Vec3::ZERO
    };

    BlinnPhongTerms {
        ambient,
        diffuse,
        specular,
    }
}

/// Individual contributions of the glow model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowTerms {
    pub glow: Vec3,
    pub specular: Vec3,
    pub fresnel: Vec3,
    pub ambient: Vec3,
}

impl GlowTerms {
    pub fn total(&self) -> Vec3 {
        self.glow + self.specular + self.fresnel + self.ambient
    }
}

pub fn glow_terms(params: &Glow, surface: &SurfacePoint, frame: &FrameInputs) -> GlowTerms {
    let normal = surface.normal.normalize_or_zero();
    let view_dir = (frame.view_position - surface.position).normalize_or_zero();

    let pulse = pulse_factor(frame.time);
    let fresnel = fresnel_factor(normal, view_dir);
    let reflection = reflect(-view_dir, normal);
    let spec_intensity = reflection.dot(view_dir).max(0.0).powi(GLOW_SPECULAR_POWER);
    let metal_color = mix_toward_white(params.glow_color, params.metalness);

    GlowTerms {
        glow: metal_color * surface.glow_intensity * pulse * 3.0,
        specular: metal_color * spec_intensity * (1.0 - params.roughness) * 2.0,
        fresnel: fresnel * metal_color * 0.8,
        ambient: params.ambient_light * metal_color,
    }
}

/// Brightness multiplier of the glow, oscillating in `[0.5, 1.5]` with period π.
pub fn pulse_factor(time: f32) -> f32 {
    1.0 + 0.5 * (time * 2.0).sin()
}

/// Rim-light term: 0 when looking straight at the surface, 1 at grazing angles.
pub fn fresnel_factor(normal: Vec3, view_dir: Vec3) -> f32 {
    (1.0 - normal.dot(view_dir).max(0.0)).powi(3)
}

/// Rim term computed once per vertex by the glow material.
///
/// `view_vector` is the camera position used as a direction, matching what
/// the vertex stage receives as its uniform.
pub fn glow_vertex_intensity(normal: Vec3, view_vector: Vec3) -> f32 {
    (1.0 - normal.dot(view_vector.normalize_or_zero())).powi(3)
}

/// Reflects `incident` about `normal` (which must be unit length).
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Linear blend from `color` toward white; exact at both ends.
pub fn mix_toward_white(color: Vec3, amount: f32) -> Vec3 {
    color * (1.0 - amount) + Vec3::ONE * amount
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;
    use crate::material::SpecularTint;

    const EPS: f32 = 1e-5;

    fn assert_vec_close(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, EPS),
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn red_plastic() -> BlinnPhong {
        BlinnPhong {
            base_color: Vec3::X,
            shininess: 16.0,
            ambient_intensity: 0.2,
            specular: SpecularTint::White,
        }
    }

    fn directions() -> Vec<Vec3> {
        let mut dirs = Vec::new();
        for i in 0..12 {
            for j in 0..7 {
                let theta = i as f32 / 12.0 * 2.0 * PI;
                let phi = j as f32 / 6.0 * PI;
                dirs.push(Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                ));
            }
        }
        dirs
    }

    #[test]
    fn head_on_light_matches_reference_scenario() {
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Z);
        let frame = FrameInputs {
            time: 0.0,
            light_position: Vec3::Z,
            view_position: Vec3::Z,
        };
        let terms = blinn_phong_terms(&red_plastic(), &surface, &frame);
        assert_vec_close(terms.ambient, Vec3::new(0.2, 0.0, 0.0));
        assert_vec_close(terms.diffuse, Vec3::new(1.0, 0.0, 0.0));
        assert_vec_close(terms.specular, Vec3::ONE);
        let color = shade(&Material::BlinnPhong(red_plastic()), &surface, &frame);
        assert_vec_close(color.truncate(), Vec3::new(2.2, 1.0, 1.0));
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn metal_highlight_takes_base_color() {
        let mut params = red_plastic();
        params.specular = SpecularTint::BaseColor;
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Z);
        let frame = FrameInputs {
            time: 0.0,
            light_position: Vec3::Z * 5.0,
            view_position: Vec3::Z * 30.0,
        };
        let terms = blinn_phong_terms(&params, &surface, &frame);
        assert_vec_close(terms.specular, Vec3::X);
    }

    #[test]
    fn back_facing_light_contributes_nothing() {
        let params = red_plastic();
        for normal in directions() {
            for light in directions() {
                if normal.normalize_or_zero().dot(light.normalize_or_zero()) > 0.0 {
                    continue;
                }
                for view in directions() {
                    let surface = SurfacePoint::new(Vec3::ZERO, normal);
                    let frame = FrameInputs {
                        time: 0.0,
                        light_position: light,
                        view_position: view,
                    };
                    let terms = blinn_phong_terms(&params, &surface, &frame);
                    assert_eq!(terms.diffuse, Vec3::ZERO);
                    assert_eq!(terms.specular, Vec3::ZERO);
                }
            }
        }
    }

    #[test]
    fn unnormalized_inputs_are_normalized() {
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Z * 7.0);
        let frame = FrameInputs {
            time: 0.0,
            light_position: Vec3::Z * 100.0,
            view_position: Vec3::Z * 3.0,
        };
        let terms = blinn_phong_terms(&red_plastic(), &surface, &frame);
        assert_vec_close(terms.diffuse, Vec3::X);
        assert_vec_close(terms.specular, Vec3::ONE);
    }

    #[test]
    fn light_at_fragment_yields_finite_color() {
        let surface = SurfacePoint::new(Vec3::ONE, Vec3::Y);
        let frame = FrameInputs {
            time: 0.0,
            light_position: Vec3::ONE,
            view_position: Vec3::new(1.0, 5.0, 1.0),
        };
        let color = shade(&Material::BlinnPhong(red_plastic()), &surface, &frame);
        assert!(color.is_finite());
        assert_vec_close(color.truncate(), Vec3::new(0.2, 0.0, 0.0));
    }

    #[test]
    fn pulse_is_bounded_and_periodic() {
        assert_eq!(pulse_factor(0.0), 1.0);
        assert!((pulse_factor(FRAC_PI_4) - 1.5).abs() < EPS);
        assert!((pulse_factor(3.0 * FRAC_PI_4) - 0.5).abs() < EPS);
        for step in 0..200 {
            let t = step as f32 * 0.037;
            let value = pulse_factor(t);
            assert!((0.5..=1.5).contains(&value), "pulse {value} at {t}");
            assert!((value - pulse_factor(t + PI)).abs() < 1e-4);
        }
    }

    #[test]
    fn fresnel_grows_toward_grazing_angles() {
        assert_eq!(fresnel_factor(Vec3::Z, Vec3::Z), 0.0);
        assert_eq!(fresnel_factor(Vec3::Z, Vec3::X), 1.0);
        let mut previous = -1.0;
        for step in 0..=10 {
            let angle = step as f32 / 10.0 * FRAC_PI_2;
            let view = Vec3::new(angle.sin(), 0.0, angle.cos());
            let value = fresnel_factor(Vec3::Z, view);
            assert!(value >= previous);
            previous = value;
        }
        assert!((previous - 1.0).abs() < EPS);
    }

    #[test]
    fn metal_mix_is_exact_at_the_ends() {
        let color = Vec3::new(0.3, 0.6, 0.9);
        assert_eq!(mix_toward_white(color, 0.0), color);
        assert_eq!(mix_toward_white(color, 1.0), Vec3::ONE);
        assert_vec_close(mix_toward_white(Vec3::ZERO, 0.25), Vec3::splat(0.25));
    }

    #[test]
    fn reflect_mirrors_about_normal() {
        let reflected = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_vec_close(reflected, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn ambient_only_cube_is_scaled_metal_color() {
        let params = Glow {
            glow_color: Vec3::new(0.2, 0.4, 0.8),
            ambient_light: 0.5,
            metalness: 0.5,
            roughness: 1.0,
        };
        // Head-on view removes the rim term, full roughness removes the
        // highlight and a zero vertex intensity removes the glow.
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Z);
        let frame = FrameInputs {
            time: 1.3,
            light_position: Vec3::ZERO,
            view_position: Vec3::Z * 30.0,
        };
        let terms = glow_terms(&params, &surface, &frame);
        let metal = mix_toward_white(params.glow_color, params.metalness);
        assert_eq!(terms.glow, Vec3::ZERO);
        assert_eq!(terms.specular, Vec3::ZERO);
        assert_eq!(terms.fresnel, Vec3::ZERO);
        assert_vec_close(terms.total(), 0.5 * metal);
    }

    #[test]
    fn glow_pulses_with_time() {
        let params = Glow::default();
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::X).with_glow_intensity(0.5);
        let at = |time| FrameInputs {
            time,
            light_position: Vec3::ZERO,
            view_position: Vec3::Z * 30.0,
        };
        let base = glow_terms(&params, &surface, &at(0.0)).glow;
        let peak = glow_terms(&params, &surface, &at(FRAC_PI_4)).glow;
        assert_vec_close(peak, base * 1.5);
        // A face seen edge-on shows the full rim term.
        let side = glow_terms(&params, &surface, &at(0.0));
        assert_vec_close(side.fresnel, Vec3::ONE * 0.8);
    }

    #[test]
    fn head_on_cube_face_has_full_highlight() {
        let params = Glow::default();
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Z);
        let frame = FrameInputs {
            time: 0.0,
            light_position: Vec3::ZERO,
            view_position: Vec3::Z * 30.0,
        };
        let terms = glow_terms(&params, &surface, &frame);
        assert_vec_close(terms.specular, Vec3::ONE * 0.95 * 2.0);
    }

    #[test]
    fn vertex_intensity_uses_camera_position_as_direction() {
        assert_eq!(glow_vertex_intensity(Vec3::Z, Vec3::Z * 30.0), 0.0);
        assert_eq!(glow_vertex_intensity(Vec3::X, Vec3::Z * 30.0), 1.0);
        assert_eq!(glow_vertex_intensity(-Vec3::Z, Vec3::Z * 30.0), 8.0);
    }
}
