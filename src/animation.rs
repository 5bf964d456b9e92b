use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::shading::FrameInputs;

/// Logical commands sampled once per frame from the input source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub cube_up: bool,
    pub cube_down: bool,
    pub camera_left: bool,
    pub camera_right: bool,
}

impl Controls {
    pub fn any(&self) -> bool {
        self.cube_up || self.cube_down || self.camera_left || self.camera_right
    }
}

/// Fixed increments applied by every frame step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSteps {
    /// Seconds added to the shading clock.
    pub time_step: f32,
    /// Radians added to the cube's X and Y rotation.
    pub rotation_step: f32,
    /// World units moved while a movement command is held.
    pub move_step: f32,
}

impl Default for FrameSteps {
    fn default() -> Self {
        Self {
            time_step: 0.016,
            rotation_step: 0.005,
            move_step: 0.1,
        }
    }
}

/// The values the frame loop reads and writes between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub time: f32,
    pub frame: u64,
    pub cube_position: Vec3,
    pub cube_rotation: Vec3,
    pub camera_position: Vec3,
    pub light_position: Vec3,
}

impl AnimationState {
    pub fn new(cube_position: Vec3, camera_position: Vec3) -> Self {
        Self {
            time: 0.0,
            frame: 0,
            cube_position,
            cube_rotation: Vec3::ZERO,
            camera_position,
            light_position: cube_position,
        }
    }

    /// Performs one frame step.
    ///
    /// The light is copied from the cube before this frame's movement is
    /// applied, so it trails a moving cube by one step.
    pub fn advance(&mut self, controls: &Controls, steps: &FrameSteps) {
        self.time += steps.time_step;
        self.frame += 1;
        self.cube_rotation.x += steps.rotation_step;
        self.cube_rotation.y += steps.rotation_step;

        self.light_position = self.cube_position;

        if controls.cube_up {
            self.cube_position.y += steps.move_step;
        }
        if controls.cube_down {
            self.cube_position.y -= steps.move_step;
        }
        if controls.camera_left {
            self.camera_position.x -= steps.move_step;
        }
        if controls.camera_right {
            self.camera_position.x += steps.move_step;
        }
    }

    pub fn frame_inputs(&self) -> FrameInputs {
        FrameInputs {
            time: self.time,
            light_position: self.light_position,
            view_position: self.camera_position,
        }
    }
}
