//! Headless evaluation of the shading model over scene geometry.

use glam::{Mat3, Vec3};

use crate::material::Material;
use crate::scene::SceneObject;
use crate::shading::{glow_vertex_intensity, shade, FrameInputs, SurfacePoint};

/// Colour statistics over every vertex of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeReport {
    pub samples: usize,
    pub mean: Vec3,
    pub max: Vec3,
}

/// Shades each vertex of `object` in world space, the way the GPU would at
/// the vertex positions.
pub fn probe_object(object: &SceneObject, frame: &FrameInputs) -> ProbeReport {
    let model = object.model_matrix();
    let normal_matrix = Mat3::from_mat4(model).inverse().transpose();

    let mut sum = Vec3::ZERO;
    let mut max = Vec3::ZERO;
    for vertex in &object.mesh.vertices {
        let position = model.transform_point3(vertex.position());
        let normal = (normal_matrix * vertex.normal()).normalize_or_zero();
        let mut surface = SurfacePoint::new(position, normal);
        if let Material::Glow(_) = object.material {
            surface = surface.with_glow_intensity(glow_vertex_intensity(
                normal,
                frame.view_position,
            ));
        }
        let color = shade(&object.material, &surface, frame).truncate();
        sum += color;
        max = max.max(color);
    }

    let samples = object.mesh.vertices.len();
    let mean = if samples == 0 {
        Vec3::ZERO
    } else {
        sum / samples as f32
    };
    ProbeReport { samples, mean, max }
}
