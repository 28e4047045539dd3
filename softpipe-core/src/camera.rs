/// Drag-to-look camera controller
///
/// The controller is a pure function of the previous state and one input
/// snapshot per update tick. The view matrix only changes while a drag is in
/// progress; until the first drag it stays all zeros and `view_matrix`
/// reports it as unset.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;
use crate::transform::Transform;

/// Discrete directional key state for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the controller reads from the input layer in one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Pointer position in window pixels
    pub pointer_x: f32,
    pub pointer_y: f32,
    /// Primary pointer button held down
    pub button_down: bool,
    pub keys: DirectionKeys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// Camera pose plus the controller's drag state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Point3<f32>,
    pub pitch: f32,
    pub yaw: f32,
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    pub drag: DragState,
    last_pointer: (f32, f32),
    view: Matrix4<f32>,
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: config.start_position,
            pitch: config.start_pitch,
            yaw: config.start_yaw,
            forward: Vector3::zeros(),
            right: Vector3::zeros(),
            up: Vector3::zeros(),
            drag: DragState::Idle,
            last_pointer: (0.0, 0.0),
            view: Matrix4::zeros(),
        }
    }

    /// The cached view matrix, or `None` while it has never been set
    pub fn view_matrix(&self) -> Option<Matrix4<f32>> {
        if self.view.determinant() == 0.0 {
            None
        } else {
            Some(self.view)
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    /// Advance the controller by one tick
    pub fn update(&self, input: &InputSnapshot, config: &CameraConfig) -> Self {
        let mut next = *self;

        if !input.button_down {
            next.drag = DragState::Idle;
            return next;
        }

        match self.drag {
            // Start dragging on this tick and move from the next one, so the
            // first pointer sample never causes a jump
            DragState::Idle => next.drag = DragState::Dragging,
            DragState::Dragging => {
                let dx = (input.pointer_x - self.last_pointer.0) * config.drag_sensitivity;
                let dy = (input.pointer_y - self.last_pointer.1) * config.drag_sensitivity;
                let limit = std::f32::consts::FRAC_PI_2;

                next.pitch = (self.pitch + dy).clamp(-limit, limit);
                next.yaw = self.yaw + dx;

                let orientation = Transform::orientation(next.pitch, next.yaw);
                let row = |i: usize| {
                    Vector3::new(orientation[(i, 0)], orientation[(i, 1)], orientation[(i, 2)])
                };
                next.right = row(0);
                next.up = row(1);
                next.forward = -row(2);

                let keys = &input.keys;
                let step = config.move_step;
                if keys.forward {
                    next.position += next.forward * step;
                } else if keys.back {
                    next.position -= next.forward * step;
                }
                if keys.right {
                    next.position += next.right * step;
                } else if keys.left {
                    next.position -= next.right * step;
                }

                next.view = Transform::view(&orientation, &next.position);
            }
        }

        next.last_pointer = (input.pointer_x, input.pointer_y);
        next
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot {
            pointer_x: x,
            pointer_y: y,
            button_down: true,
            keys: DirectionKeys::default(),
        }
    }

    #[test]
    fn test_starts_idle_and_unset() {
        let camera = CameraState::default();
        assert_eq!(camera.drag, DragState::Idle);
        assert!(camera.view_matrix().is_none());
    }

    #[test]
    fn test_first_press_does_not_move() {
        let config = CameraConfig::default();
        let camera = CameraState::default().update(&press(300.0, 200.0), &config);
        assert!(camera.is_dragging());
        assert_eq!(camera.pitch, config.start_pitch);
        assert_eq!(camera.yaw, config.start_yaw);
        assert!(camera.view_matrix().is_none());
    }

    #[test]
    fn test_drag_rotates_from_pointer_delta() {
        let config = CameraConfig::default();
        let camera = CameraState::default()
            .update(&press(300.0, 200.0), &config)
            .update(&press(350.0, 210.0), &config);

        assert!((camera.yaw - (config.start_yaw + 0.5)).abs() < 1e-6);
        assert!((camera.pitch - 0.1).abs() < 1e-6);
        let view = camera.view_matrix().expect("view set after dragging");
        let eye = view * camera.position.to_homogeneous();
        assert!(eye.xyz().norm() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let config = CameraConfig::default();
        let camera = CameraState::default()
            .update(&press(0.0, 0.0), &config)
            .update(&press(0.0, 10_000.0), &config);
        assert!((camera.pitch - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let camera = camera.update(&press(0.0, -50_000.0), &config);
        assert!((camera.pitch + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_keys_step_along_basis() {
        let config = CameraConfig::default();
        let mut input = press(10.0, 10.0);
        let camera = CameraState::default().update(&input, &config);

        input.keys.forward = true;
        input.keys.right = true;
        let moved = camera.update(&input, &config);

        // Default pose looks down +z
        assert!((moved.forward - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
        let expected = config.start_position + moved.forward + moved.right;
        assert!((moved.position - expected).norm() < 1e-5);
        // Looking down +z with y up, the right hand side is -x
        assert!((moved.right - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_keys_ignored_while_idle() {
        let config = CameraConfig::default();
        let input = InputSnapshot {
            keys: DirectionKeys {
                forward: true,
                ..DirectionKeys::default()
            },
            ..InputSnapshot::default()
        };
        let camera = CameraState::default().update(&input, &config);
        assert_eq!(camera.position, config.start_position);
    }

    #[test]
    fn test_release_returns_to_idle_and_keeps_view() {
        let config = CameraConfig::default();
        let camera = CameraState::default()
            .update(&press(0.0, 0.0), &config)
            .update(&press(5.0, 0.0), &config)
            .update(&InputSnapshot::default(), &config);
        assert_eq!(camera.drag, DragState::Idle);
        assert!(camera.view_matrix().is_some());
    }
}
