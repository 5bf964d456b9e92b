use bytemuck::{Pod, Zeroable};
use glam::Mat3;

use crate::material::{Material, SpecularTint};
use crate::scene::{Scene, SceneObject};

/// Per-frame values shared by every draw. Layout matches `Globals` in the
/// shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub light_position: [f32; 4],
    pub frame: [f32; 4],
}

impl GlobalUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let camera = scene.camera.params();
        let inputs = scene.frame_inputs();
        Self {
            view_proj: camera.view_proj.to_cols_array_2d(),
            view_position: camera.position.extend(1.0).into(),
            light_position: inputs.light_position.extend(1.0).into(),
            frame: [inputs.time, 0.0, 0.0, 0.0],
        }
    }
}

/// Transform and material block of one drawable. Layout matches
/// `ObjectUniform` in the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn from_object(object: &SceneObject) -> Self {
        let model = object.model_matrix();
        let normal = Mat3::from_mat4(model).inverse().transpose();
        let (color, params) = match &object.material {
            Material::BlinnPhong(params) => {
                let tint = match params.specular {
                    SpecularTint::White => 0.0,
                    SpecularTint::BaseColor => 1.0,
                };
                (
                    params.base_color.extend(params.shininess),
                    [params.ambient_intensity, tint, 0.0, 0.0],
                )
            }
            Material::Glow(glow) => (
                glow.glow_color.extend(1.0),
                [glow.ambient_light, glow.metalness, glow.roughness, 0.0],
            ),
        };
        Self {
            model: model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal),
            color: color.into(),
            params,
        }
    }
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}
