use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Specular exponent used by the plastic text material.
pub const PLASTIC_SHININESS: f32 = 16.0;
/// Specular exponent used by the metal text material.
pub const METAL_SHININESS: f32 = 128.0;

/// Colour used to tint the Blinn-Phong specular highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecularTint {
    /// Plastic look: the highlight is white regardless of the base colour.
    White,
    /// Metal look: the highlight takes the base colour.
    BaseColor,
}

/// Parameters of the Blinn-Phong material used for the extruded text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinnPhong {
    pub base_color: Vec3,
    pub shininess: f32,
    pub ambient_intensity: f32,
    pub specular: SpecularTint,
}

impl BlinnPhong {
    pub fn specular_tint(&self) -> Vec3 {
        match self.specular {
            SpecularTint::White => Vec3::ONE,
            SpecularTint::BaseColor => self.base_color,
        }
    }
}

/// Parameters of the pulsing Fresnel glow material used for the cube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub glow_color: Vec3,
    pub ambient_light: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            glow_color: Vec3::ONE,
            ambient_light: 0.5,
            metalness: 0.95,
            roughness: 0.05,
        }
    }
}

/// Closed set of material behaviours, selected when a mesh is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    BlinnPhong(BlinnPhong),
    Glow(Glow),
}

impl Material {
    /// Plastic text material: white highlight, shininess 16.
    pub fn plastic(base_color: Vec3, ambient_intensity: f32) -> Self {
        Self::BlinnPhong(BlinnPhong {
            base_color,
            shininess: PLASTIC_SHININESS,
            ambient_intensity,
            specular: SpecularTint::White,
        })
    }

    /// Metal text material: highlight tinted by the base colour, shininess 128.
    pub fn metal(base_color: Vec3, ambient_intensity: f32) -> Self {
        Self::BlinnPhong(BlinnPhong {
            base_color,
            shininess: METAL_SHININESS,
            ambient_intensity,
            specular: SpecularTint::BaseColor,
        })
    }

    pub fn glow(glow: Glow) -> Self {
        Self::Glow(glow)
    }

    /// Short label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BlinnPhong(params) => match params.specular {
                SpecularTint::White => "plastic",
                SpecularTint::BaseColor => "metal",
            },
            Self::Glow(_) => "glow",
        }
    }

    pub fn render_state(&self) -> RenderState {
        match self {
            Self::BlinnPhong(_) => RenderState::OPAQUE,
            Self::Glow(_) => RenderState::ADDITIVE,
        }
    }

    /// Updates the ambient intensity uniform. Only Blinn-Phong materials carry
    /// one; returns whether the material changed.
    pub fn set_ambient_intensity(&mut self, value: f32) -> bool {
        match self {
            Self::BlinnPhong(params) => {
                params.ambient_intensity = value;
                true
            }
            Self::Glow(_) => false,
        }
    }
}

/// How fragments of a material are composited into the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    /// Fragment replaces the destination colour.
    Opaque,
    /// Fragment colour is summed onto the destination colour.
    Additive,
}

/// Fixed-function state the renderer needs to draw a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    pub blend: BlendMode,
    pub depth_write: bool,
    pub double_sided: bool,
}

impl RenderState {
    pub const OPAQUE: Self = Self {
        blend: BlendMode::Opaque,
        depth_write: true,
        double_sided: false,
    };

    /// Depth is tested but never written, so the surface neither occludes
    /// nor is hidden by later additive draws.
    pub const ADDITIVE: Self = Self {
        blend: BlendMode::Additive,
        depth_write: false,
        double_sided: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plastic_and_metal_differ_in_tint_and_shininess() {
        let base = Vec3::new(0.2, 0.4, 0.6);
        let Material::BlinnPhong(plastic) = Material::plastic(base, 0.3) else {
            panic!("expected blinn-phong");
        };
        let Material::BlinnPhong(metal) = Material::metal(base, 0.3) else {
            panic!("expected blinn-phong");
        };
        assert_eq!(plastic.shininess, 16.0);
        assert_eq!(metal.shininess, 128.0);
        assert_eq!(plastic.specular_tint(), Vec3::ONE);
        assert_eq!(metal.specular_tint(), base);
    }

    #[test]
    fn glow_is_additive_without_depth_write() {
        let state = Material::glow(Glow::default()).render_state();
        assert_eq!(state.blend, BlendMode::Additive);
        assert!(!state.depth_write);
        assert!(state.double_sided);
        assert!(Material::plastic(Vec3::ONE, 0.1).render_state().depth_write);
    }

    #[test]
    fn ambient_update_only_touches_text_materials() {
        let mut text = Material::metal(Vec3::ONE, 0.1);
        assert!(text.set_ambient_intensity(0.7));
        match text {
            Material::BlinnPhong(params) => assert_eq!(params.ambient_intensity, 0.7),
            Material::Glow(_) => unreachable!(),
        }
        let mut cube = Material::glow(Glow::default());
        assert!(!cube.set_ambient_intensity(0.7));
        assert_eq!(cube, Material::glow(Glow::default()));
    }
}
