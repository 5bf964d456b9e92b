use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

/// Perspective camera looking down -Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 30.0),
        }
    }
}

impl PerspectiveCamera {
    /// Recomputes the aspect ratio for a new viewport. Zero-sized viewports
    /// (minimized windows) leave the camera unchanged.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect.max(0.01),
            self.near,
            self.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn params(&self) -> CameraParams {
        CameraParams {
            view_proj: self.view_proj(),
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_recomputes_aspect() {
        let mut camera = PerspectiveCamera::default();
        assert!(camera.set_viewport(1280, 720));
        assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert!(!camera.set_viewport(0, 720));
        assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = PerspectiveCamera::default();
        let clip = camera.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!((0.0..1.0).contains(&ndc.z));
    }

    #[test]
    fn panning_keeps_view_direction() {
        let mut camera = PerspectiveCamera::default();
        camera.position.x -= 5.0;
        let clip = camera.view_proj() * Vec3::new(-5.0, 0.0, 0.0).extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
    }
}
