/// Matrix builders and the per-frame clip-space transform
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about the X axis
    pub fn rotation_x(angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// Rotation about the Y axis
    pub fn rotation_y(angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::y_axis(), angle)
    }

    /// Camera orientation: pitch applied after yaw
    pub fn orientation(pitch: f32, yaw: f32) -> Matrix4<f32> {
        Self::rotation_x(pitch) * Self::rotation_y(yaw)
    }

    /// Create a translation matrix
    pub fn translation(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// View matrix for a camera at `position` with the given orientation
    pub fn view(orientation: &Matrix4<f32>, position: &Point3<f32>) -> Matrix4<f32> {
        orientation * Self::translation(&-position.coords)
    }
}

/// Transform every local-space point into homogeneous clip space.
///
/// `out` is cleared first and receives exactly one position per point, at
/// the same index.
pub fn to_clip_space(
    points: &[Point3<f32>],
    projection_view: &Matrix4<f32>,
    out: &mut Vec<Vector4<f32>>,
) {
    out.clear();
    out.extend(points.iter().map(|p| projection_view * p.to_homogeneous()));
}
