/// Tunable constants for the projection and camera
use nalgebra::{Point3, Vector3};

use crate::projection::ProjectionMode;

/// Projection parameters and the look-at used before the camera is moved
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub mode: ProjectionMode,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Half of the visible height in world units (orthographic only)
    pub ortho_half_height: f32,
    /// Width over height of one target pixel; terminal cells are about 0.5
    pub pixel_aspect: f32,
    pub default_eye: Point3<f32>,
    pub default_target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fov_y: 30.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ortho_half_height: 10.0,
            pixel_aspect: 1.0,
            default_eye: Point3::new(0.0, 10.0, -10.0),
            default_target: Point3::new(0.0, 10.0, 10.0),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Camera controller constants and starting pose
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// World units moved per update while a direction key is held
    pub move_step: f32,
    /// Radians of rotation per pixel of pointer movement
    pub drag_sensitivity: f32,
    pub start_position: Point3<f32>,
    pub start_yaw: f32,
    pub start_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_step: 1.0,
            drag_sensitivity: 1.0 / 100.0,
            start_position: Point3::new(0.0, 10.0, -10.0),
            start_yaw: std::f32::consts::PI,
            start_pitch: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    pub projection: ProjectionConfig,
    pub camera: CameraConfig,
}

impl RenderConfig {
    /// Override the vertical field of view, given in degrees
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.projection.fov_y = degrees.to_radians();
        self
    }

    /// Place the default eye and the camera start at `eye`, looking at `target`.
    /// The start yaw and pitch are derived so the first drag continues from
    /// the same view direction.
    pub fn looking_from(mut self, eye: Point3<f32>, target: Point3<f32>) -> Self {
        self.projection.default_eye = eye;
        self.projection.default_target = target;
        self.camera.start_position = eye;

        let dir = target - eye;
        if dir.norm() > f32::EPSILON {
            let dir = dir.normalize();
            // forward = (cos(p)sin(y), -sin(p), -cos(y)cos(p))
            self.camera.start_pitch = (-dir.y).clamp(-1.0, 1.0).asin();
            self.camera.start_yaw = dir.x.atan2(-dir.z);
        }
        self
    }
}
