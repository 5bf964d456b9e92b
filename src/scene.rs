use anyhow::{Context, Result};
use glam::{EulerRot, Mat4, Quat, Vec3};
use log::{debug, info};

use crate::animation::{AnimationState, Controls, FrameSteps};
use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::glyph::GlyphMesher;
use crate::input::KeyBindings;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::shading::FrameInputs;

/// What an object stands for in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRole {
    Letter(char),
    Digit(char),
    GlowCube,
}

/// Mesh, material and transform of one drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub role: ObjectRole,
    pub mesh: Mesh,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
}

impl SceneObject {
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// The one live render context of a session: camera, drawables and the
/// animation state the frame loop mutates.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub objects: Vec<SceneObject>,
    pub animation: AnimationState,
    pub bindings: KeyBindings,
    pub steps: FrameSteps,
}

impl Scene {
    /// Populates the scene. Any glyph failure aborts the build.
    pub fn build(config: &SceneConfig, glyphs: &dyn GlyphMesher) -> Result<Self> {
        config.validate()?;
        let ambient = config.ambient_intensity();
        let letter = config.letter_char();
        let digit = config.digit_char();

        let letter_mesh = glyphs
            .mesh_glyph(letter, &config.text)
            .with_context(|| format!("failed to build glyph for letter {letter:?}"))?;
        let digit_mesh = glyphs
            .mesh_glyph(digit, &config.text)
            .with_context(|| format!("failed to build glyph for digit {digit:?}"))?;

        let objects = vec![
            SceneObject {
                name: "letter".to_string(),
                role: ObjectRole::Letter(letter),
                mesh: letter_mesh,
                material: Material::plastic(config.letter.color, ambient),
                position: config.letter.position,
                rotation: Vec3::ZERO,
            },
            SceneObject {
                name: "digit".to_string(),
                role: ObjectRole::Digit(digit),
                mesh: digit_mesh,
                material: Material::metal(config.digit.color, ambient),
                position: config.digit.position,
                rotation: Vec3::ZERO,
            },
            SceneObject {
                name: "cube".to_string(),
                role: ObjectRole::GlowCube,
                mesh: Mesh::cuboid(config.cube.size),
                material: Material::glow(config.cube.glow),
                position: config.cube.position,
                rotation: Vec3::ZERO,
            },
        ];

        info!(
            "built scene: letter {letter:?}, digit {digit:?}, ambient intensity {ambient:.3}"
        );
        for object in &objects {
            debug!(
                "{} uses {} material with {} triangles",
                object.name,
                object.material.label(),
                object.mesh.triangle_count()
            );
        }

        Ok(Self {
            camera: config.camera,
            animation: AnimationState::new(config.cube.position, config.camera.position),
            objects,
            bindings: config.controls,
            steps: config.frame,
        })
    }

    /// Runs one frame step and copies the result into the cube and camera.
    pub fn step(&mut self, controls: &Controls) {
        self.animation.advance(controls, &self.steps);
        let animation = self.animation;
        for object in self
            .objects
            .iter_mut()
            .filter(|object| object.role == ObjectRole::GlowCube)
        {
            object.position = animation.cube_position;
            object.rotation = animation.cube_rotation;
        }
        self.camera.position = animation.camera_position;
    }

    pub fn frame_inputs(&self) -> FrameInputs {
        self.animation.frame_inputs()
    }

    /// Reacts to a viewport change; only the camera aspect depends on it.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.camera.set_viewport(width, height)
    }

    /// Updates the ambient term of every material that has one.
    pub fn set_ambient_intensity(&mut self, value: f32) -> usize {
        self.objects
            .iter_mut()
            .map(|object| object.material.set_ambient_intensity(value))
            .filter(|changed| *changed)
            .count()
    }

    pub fn object(&self, role: ObjectRole) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.role == role)
    }

    pub fn cube(&self) -> Option<&SceneObject> {
        self.object(ObjectRole::GlowCube)
    }
}
